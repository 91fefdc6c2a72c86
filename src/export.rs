//! CSV serialization of the filtered row set

use std::io::Write;

use crate::error::Result;
use crate::model::{Posting, PROJECTED_COLUMNS};

/// Download name for one MSA's filtered export, spaces encoded as
/// underscores.
pub fn export_file_name(msa: &str) -> String {
    format!("filtered_jobs_{}.csv", msa.replace(' ', "_"))
}

/// Write the filtered rows as UTF-8 CSV: header row of the source column
/// names in projection order, one line per posting. Absent cells are empty
/// fields; skill columns serialize back to the list-literal form the
/// normalizer parses.
pub fn write_csv<W: Write>(writer: W, rows: &[Posting]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(PROJECTED_COLUMNS)?;

    for row in rows {
        out.write_record([
            opt_field(&row.title),
            num_field(row.salary_from),
            num_field(row.salary_to),
            num_field(row.min_years_experience),
            num_field(row.max_years_experience),
            format_string_list(&row.skills),
            opt_field(&row.employment_type),
            row.remote_type.clone(),
            opt_field(&row.company),
            opt_field(&row.min_education_level),
            opt_field(&row.occupation_name),
            opt_field(&row.industry_l2),
            opt_field(&row.industry_l4),
            opt_field(&row.industry_l6),
            format_string_list(&row.specialized_skills),
            format_string_list(&row.certifications),
            format_string_list(&row.common_skills),
            row.msa.clone(),
        ])?;
    }

    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serialize a decoded sequence back to the list-literal cell format.
pub fn format_string_list(items: &[String]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('\'');
        for c in item.chars() {
            match c {
                '\'' => out.push_str("\\'"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('\'');
    }
    out.push(']');
    out
}

fn opt_field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn num_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_string_list;

    #[test]
    fn test_export_file_name_encodes_spaces() {
        assert_eq!(
            export_file_name("Austin-Round Rock, TX"),
            "filtered_jobs_Austin-Round_Rock,_TX.csv"
        );
    }

    #[test]
    fn test_header_and_row_shape() {
        let rows = vec![Posting {
            title: Some("Data Engineer".to_string()),
            company: Some("Acme".to_string()),
            msa: "Austin, TX".to_string(),
            remote_type: "Remote".to_string(),
            salary_from: Some(90_000.0),
            specialized_skills: vec!["SQL".to_string()],
            ..Default::default()
        }];

        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("TITLE_NAME,SALARY_FROM,SALARY_TO"));
        assert!(header.ends_with("COMMON_SKILLS_NAME,MSA_NAME"));
        assert_eq!(header.split(',').count(), PROJECTED_COLUMNS.len());

        let row = lines.next().unwrap();
        assert!(row.starts_with("Data Engineer,90000,"));
        assert!(row.contains("['SQL']"));
        assert!(row.ends_with("\"Austin, TX\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_list_literal_round_trip() {
        let items = vec!["Bachelor's Degree".to_string(), "C\\C++".to_string()];
        let cell = format_string_list(&items);
        assert_eq!(parse_string_list("SKILLS_NAME", &cell).unwrap(), items);

        // Empty sequence round-trips to itself
        assert_eq!(format_string_list(&[]), "[]");
        assert_eq!(parse_string_list("SKILLS_NAME", "[]").unwrap(), Vec::<String>::new());
    }
}
