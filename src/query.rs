//! Dashboard orchestration - ties together all components

use std::sync::Arc;

use bytes::Bytes;

use crate::aggregator::{
    education_mix, salary_histogram, skill_by_industry, top_companies, top_industries,
    top_occupations, top_skills, CategoryCount, HistogramBin, IndustrySkillCount,
};
use crate::cache::MemoCache;
use crate::error::Result;
use crate::filter::{apply_filters, FilterOptions, FilterSpec};
use crate::model::{columns, IndustryLevel, Posting, SkillColumn};
use crate::reader::{discover_categories, read_postings};
use crate::source;

/// Truncation applied to the bar-chart tables.
pub const TOP_N: usize = 10;
/// Bucket count of the salary histogram.
pub const SALARY_BINS: usize = 30;

/// Everything one filter interaction produces: the filtered row set (for
/// the CSV download) and the summary tables behind each chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub msa: String,
    pub filtered: Vec<Posting>,
    pub top_industries: Vec<CategoryCount>,
    pub top_occupations: Vec<CategoryCount>,
    pub salary_histogram: Vec<HistogramBin>,
    pub top_specialized_skills: Vec<CategoryCount>,
    pub top_companies: Vec<CategoryCount>,
    pub education_mix: Vec<CategoryCount>,
    pub specialized_by_industry: Vec<IndustrySkillCount>,
    pub certifications_by_industry: Vec<IndustrySkillCount>,
}

/// The exploration pipeline over one dataset source.
///
/// The two expensive stages — fetching/parsing the full table and the
/// projected per-MSA read — are memoized in explicit caches keyed by the
/// source identifier and by (source, MSA). Filtered sets are recomputed on
/// every call and never cached; filter combinations are unbounded and the
/// work is cheap.
pub struct Dashboard {
    source: String,
    raw: MemoCache<String, Bytes>,
    msa_lists: MemoCache<String, Vec<String>>,
    per_msa: MemoCache<(String, String), Vec<Posting>>,
}

impl Dashboard {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            raw: MemoCache::new(),
            msa_lists: MemoCache::new(),
            per_msa: MemoCache::new(),
        }
    }

    /// Build a dashboard over bytes already in hand, seeding the fetch
    /// cache. Lets the pipeline run against local or in-memory data.
    pub fn with_bytes(identifier: impl Into<String>, data: Bytes) -> Self {
        let dashboard = Self::new(identifier);
        dashboard.raw.insert(dashboard.source.clone(), data);
        dashboard
    }

    fn table_bytes(&self) -> Result<Arc<Bytes>> {
        self.raw
            .get_or_compute(&self.source, || source::fetch(&self.source))
    }

    /// Sorted distinct MSA names, discovered from the MSA column alone.
    pub fn available_msas(&self) -> Result<Arc<Vec<String>>> {
        self.msa_lists.get_or_compute(&self.source, || {
            let data = self.table_bytes()?;
            discover_categories(&data, columns::MSA)
        })
    }

    /// One MSA's decoded row set, read once and memoized.
    pub fn msa_rows(&self, msa: &str) -> Result<Arc<Vec<Posting>>> {
        let key = (self.source.clone(), msa.to_string());
        self.per_msa.get_or_compute(&key, || {
            let data = self.table_bytes()?;
            read_postings(&data, msa)
        })
    }

    /// Domains for the filter controls of one MSA.
    pub fn filter_options(&self, msa: &str) -> Result<FilterOptions> {
        let rows = self.msa_rows(msa)?;
        FilterOptions::from_rows(msa, &rows)
    }

    /// One full interaction: filter the MSA's rows and recompute every
    /// summary table. Pure given the cached row set.
    pub fn run(&self, msa: &str, spec: &FilterSpec) -> Result<DashboardView> {
        let rows = self.msa_rows(msa)?;
        let filtered = apply_filters(&rows, spec);
        tracing::debug!(
            "{} of {} postings in {msa} match the current filters",
            filtered.len(),
            rows.len()
        );

        Ok(DashboardView {
            msa: msa.to_string(),
            top_industries: top_industries(&filtered, IndustryLevel::L2, TOP_N),
            top_occupations: top_occupations(&filtered, TOP_N),
            salary_histogram: salary_histogram(&filtered, SALARY_BINS),
            top_specialized_skills: top_skills(&filtered, SkillColumn::Specialized, TOP_N),
            top_companies: top_companies(&filtered, TOP_N),
            education_mix: education_mix(&filtered),
            specialized_by_industry: skill_by_industry(&filtered, SkillColumn::Specialized),
            certifications_by_industry: skill_by_industry(&filtered, SkillColumn::Certifications),
            filtered,
        })
    }

    /// Drop all memoized reads; the next interaction recomputes from the
    /// source.
    pub fn invalidate(&self) {
        self.raw.invalidate();
        self.msa_lists.invalidate();
        self.per_msa.invalidate();
    }
}
