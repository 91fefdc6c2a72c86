//! Dataset source collaborator: fetch the columnar blob by identifier

use bytes::Bytes;

use crate::error::Result;

/// One blocking whole-file retrieve. A non-success status or transport
/// failure is fatal to dashboard startup; there is no retry.
pub fn fetch(url: &str) -> Result<Bytes> {
    tracing::debug!("fetching dataset from {url}");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;
    tracing::debug!("fetched {} bytes", bytes.len());
    Ok(bytes)
}
