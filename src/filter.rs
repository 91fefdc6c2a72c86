//! Conjunctive filtering of decoded posting rows

use std::collections::HashSet;

use crate::error::{DashboardError, Result};
use crate::model::Posting;

/// Slider domains offered by the dashboard controls.
pub const MIN_YEARS_SLIDER_MAX: i64 = 20;
pub const MAX_YEARS_SLIDER_MAX: i64 = 30;
pub const DEFAULT_SALARY_WINDOW: (i64, i64) = (0, 200_000);

/// One filter interaction's worth of predicates.
///
/// Category sets are disjunctions; an empty set means "no restriction", not
/// "match nothing". The numeric tests always apply, and a row whose compared
/// field is null fails its test — numeric comparison against null is false,
/// matching the source data's null-propagation semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub employment_types: HashSet<String>,
    pub remote_types: HashSet<String>,
    pub min_years_floor: i64,
    pub max_years_ceiling: i64,
    /// Inclusive on both ends: kept iff salary_from >= low && salary_to <= high.
    pub salary_range: (i64, i64),
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            employment_types: HashSet::new(),
            remote_types: HashSet::new(),
            min_years_floor: 0,
            max_years_ceiling: MAX_YEARS_SLIDER_MAX,
            salary_range: DEFAULT_SALARY_WINDOW,
        }
    }
}

impl FilterSpec {
    pub fn matches(&self, row: &Posting) -> bool {
        if !self.employment_types.is_empty() {
            match &row.employment_type {
                Some(value) if self.employment_types.contains(value) => {}
                _ => return false,
            }
        }

        if !self.remote_types.is_empty() && !self.remote_types.contains(&row.remote_type) {
            return false;
        }

        let (salary_low, salary_high) = self.salary_range;
        in_range_low(row.min_years_experience, self.min_years_floor)
            && in_range_high(row.max_years_experience, self.max_years_ceiling)
            && in_range_low(row.salary_from, salary_low)
            && in_range_high(row.salary_to, salary_high)
    }
}

fn in_range_low(value: Option<f64>, low: i64) -> bool {
    value.is_some_and(|v| v >= low as f64)
}

fn in_range_high(value: Option<f64>, high: i64) -> bool {
    value.is_some_and(|v| v <= high as f64)
}

/// Apply the conjunction of all predicate groups. Cheap enough to rerun on
/// every control change; the result is never cached.
pub fn apply_filters(rows: &[Posting], spec: &FilterSpec) -> Vec<Posting> {
    rows.iter().filter(|row| spec.matches(row)).cloned().collect()
}

/// Upper bound of the salary-range control for one MSA's row set: the
/// maximum non-null salary_to, rounded down. An MSA with no usable upper
/// bound has no sensible salary domain and must surface as an error rather
/// than silently defaulting to zero.
pub fn salary_ceiling(msa: &str, rows: &[Posting]) -> Result<i64> {
    let max = rows
        .iter()
        .filter_map(|row| row.salary_to)
        .fold(f64::NEG_INFINITY, f64::max);

    if max.is_finite() {
        Ok(max.floor() as i64)
    } else {
        Err(DashboardError::EmptySalaryDomain(msa.to_string()))
    }
}

/// Domains for the filter controls, derived from one MSA's row set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub employment_types: Vec<String>,
    pub remote_types: Vec<String>,
    pub salary_ceiling: i64,
}

impl FilterOptions {
    pub fn from_rows(msa: &str, rows: &[Posting]) -> Result<Self> {
        let employment_types: Vec<String> = rows
            .iter()
            .filter_map(|row| row.employment_type.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let remote_types: Vec<String> = rows
            .iter()
            .map(|row| row.remote_type.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            employment_types,
            remote_types,
            salary_ceiling: salary_ceiling(msa, rows)?,
        })
    }
}
