//! Summary-table aggregations over the filtered row set
//!
//! Every function here is a pure function of its inputs: no I/O, no hidden
//! state. Output tables are sorted descending by count with ties broken by
//! first-encountered category (the sort is stable over insertion order), so
//! results are reproducible for identical input.

use std::collections::HashMap;

use crate::model::{
    IndustryLevel, Posting, SkillColumn, UNCLASSIFIED_COMPANY, UNCLASSIFIED_INDUSTRY,
    UNCLASSIFIED_OCCUPATION,
};

/// One bar of a category chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// One bucket of the salary histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// One leaf of an industry/skill tree map.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustrySkillCount {
    pub industry: String,
    pub skill: String,
    pub count: u64,
}

/// Group-by-count with first-encounter insertion order, then a stable
/// descending sort so equal counts keep that order.
fn count_categories<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push(CategoryCount {
                    category: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Top hiring industries at the requested NAICS level. The unclassified
/// sentinel is data upstream but never belongs in this chart.
pub fn top_industries(rows: &[Posting], level: IndustryLevel, n: usize) -> Vec<CategoryCount> {
    let mut counts = count_categories(
        rows.iter()
            .filter_map(|row| row.industry(level))
            .filter(|industry| *industry != UNCLASSIFIED_INDUSTRY),
    );
    counts.truncate(n);
    counts
}

/// Top occupations by SOC-5 name.
pub fn top_occupations(rows: &[Posting], n: usize) -> Vec<CategoryCount> {
    let mut counts = count_categories(
        rows.iter()
            .filter_map(|row| row.occupation_name.as_deref())
            .filter(|occupation| *occupation != UNCLASSIFIED_OCCUPATION),
    );
    counts.truncate(n);
    counts
}

/// Top hiring companies.
pub fn top_companies(rows: &[Posting], n: usize) -> Vec<CategoryCount> {
    let mut counts = count_categories(
        rows.iter()
            .filter_map(|row| row.company.as_deref())
            .filter(|company| *company != UNCLASSIFIED_COMPANY),
    );
    counts.truncate(n);
    counts
}

/// Minimum-education distribution: full, untruncated, no sentinel exclusion.
pub fn education_mix(rows: &[Posting]) -> Vec<CategoryCount> {
    count_categories(rows.iter().filter_map(|row| row.min_education_level.as_deref()))
}

/// Explode one skill column and count skill mentions. A row with an empty
/// sequence contributes zero output rows, so totals equal the summed
/// sequence lengths, not the input row count.
pub fn top_skills(rows: &[Posting], column: SkillColumn, n: usize) -> Vec<CategoryCount> {
    let mut counts = count_categories(
        rows.iter()
            .flat_map(|row| row.skill_list(column).iter().map(String::as_str)),
    );
    counts.truncate(n);
    counts
}

/// Frequency distribution of per-row average salary over `bins` equal-width
/// buckets spanning the observed range. Rows missing either salary bound
/// contribute nothing; if no row contributes, the distribution is empty.
pub fn salary_histogram(rows: &[Posting], bins: usize) -> Vec<HistogramBin> {
    let averages: Vec<f64> = rows.iter().filter_map(Posting::average_salary).collect();
    if averages.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = averages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    if width == 0.0 {
        // Degenerate observed range: every value lands in one bucket
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: averages.len() as u64,
        }];
    }

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for value in averages {
        let slot = (((value - min) / width) as usize).min(bins - 1);
        histogram[slot].count += 1;
    }
    histogram
}

/// Industry/skill pairs for a tree map: explode the skill column, group by
/// (NAICS-L2, skill). Rows with a null or unclassified L2 industry are
/// excluded; output is untruncated since the tree map renders every leaf.
pub fn skill_by_industry(rows: &[Posting], column: SkillColumn) -> Vec<IndustrySkillCount> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut counts: Vec<IndustrySkillCount> = Vec::new();

    for row in rows {
        let Some(industry) = row.industry_l2.as_deref() else {
            continue;
        };
        if industry == UNCLASSIFIED_INDUSTRY {
            continue;
        }
        for skill in row.skill_list(column) {
            let key = (industry.to_string(), skill.clone());
            match index.get(&key) {
                Some(&slot) => counts[slot].count += 1,
                None => {
                    index.insert(key, counts.len());
                    counts.push(IndustrySkillCount {
                        industry: industry.to_string(),
                        skill: skill.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
