//! Typed in-memory representation of the posting table

/// Source column names, fixed by the upstream schema.
pub mod columns {
    pub const TITLE: &str = "TITLE_NAME";
    pub const SALARY_FROM: &str = "SALARY_FROM";
    pub const SALARY_TO: &str = "SALARY_TO";
    pub const MIN_YEARS: &str = "MIN_YEARS_EXPERIENCE";
    pub const MAX_YEARS: &str = "MAX_YEARS_EXPERIENCE";
    pub const SKILLS: &str = "SKILLS_NAME";
    pub const EMPLOYMENT_TYPE: &str = "EMPLOYMENT_TYPE_NAME";
    pub const REMOTE_TYPE: &str = "REMOTE_TYPE_NAME";
    pub const COMPANY: &str = "COMPANY_NAME";
    pub const MIN_EDUCATION: &str = "MIN_EDULEVELS_NAME";
    pub const OCCUPATION: &str = "SOC_2021_5_NAME";
    pub const NAICS2: &str = "NAICS2_NAME";
    pub const NAICS4: &str = "NAICS4_NAME";
    pub const NAICS6: &str = "NAICS6_NAME";
    pub const SPECIALIZED_SKILLS: &str = "SPECIALIZED_SKILLS_NAME";
    pub const CERTIFICATIONS: &str = "CERTIFICATIONS_NAME";
    pub const COMMON_SKILLS: &str = "COMMON_SKILLS_NAME";
    pub const MSA: &str = "MSA_NAME";
}

/// Columns the per-MSA read projects, in export order.
pub const PROJECTED_COLUMNS: &[&str] = &[
    columns::TITLE,
    columns::SALARY_FROM,
    columns::SALARY_TO,
    columns::MIN_YEARS,
    columns::MAX_YEARS,
    columns::SKILLS,
    columns::EMPLOYMENT_TYPE,
    columns::REMOTE_TYPE,
    columns::COMPANY,
    columns::MIN_EDUCATION,
    columns::OCCUPATION,
    columns::NAICS2,
    columns::NAICS4,
    columns::NAICS6,
    columns::SPECIALIZED_SKILLS,
    columns::CERTIFICATIONS,
    columns::COMMON_SKILLS,
    columns::MSA,
];

/// Columns whose cells are serialized list literals.
pub const LIST_COLUMNS: &[&str] = &[
    columns::SKILLS,
    columns::SPECIALIZED_SKILLS,
    columns::CERTIFICATIONS,
    columns::COMMON_SKILLS,
];

// Sentinel categories. These are data, not null: the filter stage leaves
// them in place and individual aggregations exclude their own.
pub const UNCLASSIFIED_INDUSTRY: &str = "Unclassified Industry";
pub const UNCLASSIFIED_OCCUPATION: &str = "Unclassified Occupation";
pub const UNCLASSIFIED_COMPANY: &str = "Unclassified";
pub const UNSPECIFIED_REMOTE: &str = "Unspecified";

/// One decoded posting row.
///
/// Skill columns are never null once decoded: an absent cell becomes an
/// empty vector, so explode-style aggregations never see a null sentinel.
/// `remote_type` is normalized at decode time and is likewise never null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Posting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub msa: String,
    pub employment_type: Option<String>,
    pub remote_type: String,
    pub salary_from: Option<f64>,
    pub salary_to: Option<f64>,
    pub min_years_experience: Option<f64>,
    pub max_years_experience: Option<f64>,
    pub min_education_level: Option<String>,
    pub occupation_name: Option<String>,
    pub industry_l2: Option<String>,
    pub industry_l4: Option<String>,
    pub industry_l6: Option<String>,
    pub skills: Vec<String>,
    pub specialized_skills: Vec<String>,
    pub certifications: Vec<String>,
    pub common_skills: Vec<String>,
}

impl Posting {
    /// Midpoint of the advertised salary band; None if either bound is
    /// missing, which drops the row from the histogram.
    pub fn average_salary(&self) -> Option<f64> {
        match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => Some((from + to) / 2.0),
            _ => None,
        }
    }

    pub fn industry(&self, level: IndustryLevel) -> Option<&str> {
        match level {
            IndustryLevel::L2 => self.industry_l2.as_deref(),
            IndustryLevel::L4 => self.industry_l4.as_deref(),
            IndustryLevel::L6 => self.industry_l6.as_deref(),
        }
    }

    pub fn skill_list(&self, column: SkillColumn) -> &[String] {
        match column {
            SkillColumn::Skills => &self.skills,
            SkillColumn::Specialized => &self.specialized_skills,
            SkillColumn::Certifications => &self.certifications,
            SkillColumn::Common => &self.common_skills,
        }
    }
}

/// NAICS classification granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndustryLevel {
    L2,
    L4,
    L6,
}

impl IndustryLevel {
    pub fn column(self) -> &'static str {
        match self {
            IndustryLevel::L2 => columns::NAICS2,
            IndustryLevel::L4 => columns::NAICS4,
            IndustryLevel::L6 => columns::NAICS6,
        }
    }
}

/// Which sequence-valued column an explode-style aggregation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillColumn {
    Skills,
    Specialized,
    Certifications,
    Common,
}

impl SkillColumn {
    pub fn column(self) -> &'static str {
        match self {
            SkillColumn::Skills => columns::SKILLS,
            SkillColumn::Specialized => columns::SPECIALIZED_SKILLS,
            SkillColumn::Certifications => columns::CERTIFICATIONS,
            SkillColumn::Common => columns::COMMON_SKILLS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_salary_requires_both_bounds() {
        let mut row = Posting {
            salary_from: Some(50_000.0),
            salary_to: Some(70_000.0),
            ..Default::default()
        };
        assert_eq!(row.average_salary(), Some(60_000.0));

        row.salary_to = None;
        assert_eq!(row.average_salary(), None);
    }

    #[test]
    fn test_projection_covers_list_columns() {
        for col in LIST_COLUMNS {
            assert!(PROJECTED_COLUMNS.contains(col));
        }
    }
}
