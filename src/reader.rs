//! Parquet reader with column projection and predicate pushdown

use std::collections::BTreeSet;

use arrow::array::{Array, RecordBatch, Scalar, StringArray};
use arrow::compute::kernels::cmp;
use arrow::error::ArrowError;
use bytes::Bytes;
use parquet::arrow::arrow_reader::{ArrowPredicateFn, ParquetRecordBatchReaderBuilder, RowFilter};
use parquet::arrow::ProjectionMask;

use crate::error::{DashboardError, Result};
use crate::model::{columns, Posting, PROJECTED_COLUMNS};
use crate::normalize::{normalize_list_cell, normalize_remote_type};
use crate::utils::{get_f64_column, get_string_column, opt_f64, opt_string};

const BATCH_SIZE: usize = 8192;

/// Distinct non-null values of a single column, sorted.
///
/// Only the named column is projected; the rest of the table is never
/// materialized, which keeps MSA discovery memory-bound for wide tables.
pub fn discover_categories(data: &Bytes, column: &str) -> Result<Vec<String>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(data.clone())?;
    let idx = column_index(builder.schema().fields(), column)?;
    let projection = ProjectionMask::roots(builder.parquet_schema(), vec![idx]);

    let reader = builder
        .with_projection(projection)
        .with_batch_size(BATCH_SIZE)
        .build()?;

    let mut values = BTreeSet::new();
    for batch_result in reader {
        let batch = batch_result?;
        let col = get_string_column(&batch, column)?;
        for value in col.iter().flatten() {
            values.insert(value.to_string());
        }
    }

    tracing::debug!("discovered {} distinct values in {column}", values.len());
    Ok(values.into_iter().collect())
}

/// Read exactly `columns`, with an equality predicate on one column pushed
/// into the scan. The predicate is evaluated during the read via a row
/// filter, so rows that fail it are never materialized into memory.
pub fn read_projected(
    data: &Bytes,
    columns: &[&str],
    predicate: (&str, &str),
) -> Result<Vec<RecordBatch>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(data.clone())?;
    let fields = builder.schema().fields().clone();

    let projection_indices = columns
        .iter()
        .map(|name| column_index(&fields, name))
        .collect::<Result<Vec<_>>>()?;
    let projection = ProjectionMask::roots(builder.parquet_schema(), projection_indices);

    let (predicate_column, predicate_value) = predicate;
    let predicate_idx = column_index(&fields, predicate_column)?;
    let predicate_mask = ProjectionMask::roots(builder.parquet_schema(), vec![predicate_idx]);

    let wanted = predicate_value.to_string();
    let column_name = predicate_column.to_string();
    let filter = ArrowPredicateFn::new(predicate_mask, move |batch: RecordBatch| {
        let values = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| ArrowError::CastError(format!("{column_name} is not Utf8")))?;
        let needle = Scalar::new(StringArray::from(vec![wanted.clone()]));
        // Null cells compare to null and never match, so unusable rows
        // (no MSA) are dropped at the scan.
        cmp::eq(values, &needle)
    });

    let reader = builder
        .with_projection(projection)
        .with_row_filter(RowFilter::new(vec![Box::new(filter)]))
        .with_batch_size(BATCH_SIZE)
        .build()?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(batch_result?);
    }
    Ok(batches)
}

/// The per-MSA load: projected, predicate-pushed read of the declared column
/// set, decoded into typed rows. Both normalizations (list cells, remote
/// type) run here, once, before any filtering.
pub fn read_postings(data: &Bytes, msa: &str) -> Result<Vec<Posting>> {
    let batches = read_projected(data, PROJECTED_COLUMNS, (columns::MSA, msa))?;

    let mut rows = Vec::new();
    for batch in &batches {
        if batch.num_rows() == 0 {
            continue;
        }
        decode_batch(batch, msa, &mut rows)?;
    }

    tracing::debug!("loaded {} postings for {msa}", rows.len());
    Ok(rows)
}

fn decode_batch(batch: &RecordBatch, msa: &str, rows: &mut Vec<Posting>) -> Result<()> {
    let title = get_string_column(batch, columns::TITLE)?;
    let company = get_string_column(batch, columns::COMPANY)?;
    let employment_type = get_string_column(batch, columns::EMPLOYMENT_TYPE)?;
    let remote_type = get_string_column(batch, columns::REMOTE_TYPE)?;
    let min_education = get_string_column(batch, columns::MIN_EDUCATION)?;
    let occupation = get_string_column(batch, columns::OCCUPATION)?;
    let naics2 = get_string_column(batch, columns::NAICS2)?;
    let naics4 = get_string_column(batch, columns::NAICS4)?;
    let naics6 = get_string_column(batch, columns::NAICS6)?;
    let skills = get_string_column(batch, columns::SKILLS)?;
    let specialized = get_string_column(batch, columns::SPECIALIZED_SKILLS)?;
    let certifications = get_string_column(batch, columns::CERTIFICATIONS)?;
    let common = get_string_column(batch, columns::COMMON_SKILLS)?;
    let msa_col = get_string_column(batch, columns::MSA)?;

    let salary_from = get_f64_column(batch, columns::SALARY_FROM)?;
    let salary_to = get_f64_column(batch, columns::SALARY_TO)?;
    let min_years = get_f64_column(batch, columns::MIN_YEARS)?;
    let max_years = get_f64_column(batch, columns::MAX_YEARS)?;

    for i in 0..batch.num_rows() {
        rows.push(Posting {
            title: opt_string(&title, i),
            company: opt_string(&company, i),
            // The scan predicate already matched this cell against `msa`
            msa: opt_string(&msa_col, i).unwrap_or_else(|| msa.to_string()),
            employment_type: opt_string(&employment_type, i),
            remote_type: normalize_remote_type(opt_string(&remote_type, i).as_deref()),
            salary_from: opt_f64(&salary_from, i),
            salary_to: opt_f64(&salary_to, i),
            min_years_experience: opt_f64(&min_years, i),
            max_years_experience: opt_f64(&max_years, i),
            min_education_level: opt_string(&min_education, i),
            occupation_name: opt_string(&occupation, i),
            industry_l2: opt_string(&naics2, i),
            industry_l4: opt_string(&naics4, i),
            industry_l6: opt_string(&naics6, i),
            skills: normalize_list_cell(columns::SKILLS, cell(&skills, i))?,
            specialized_skills: normalize_list_cell(columns::SPECIALIZED_SKILLS, cell(&specialized, i))?,
            certifications: normalize_list_cell(columns::CERTIFICATIONS, cell(&certifications, i))?,
            common_skills: normalize_list_cell(columns::COMMON_SKILLS, cell(&common, i))?,
        });
    }
    Ok(())
}

fn cell(array: &StringArray, row: usize) -> Option<&str> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

fn column_index(fields: &arrow::datatypes::Fields, name: &str) -> Result<usize> {
    fields
        .iter()
        .position(|f| f.name() == name)
        .ok_or_else(|| DashboardError::SourceFormat(format!("column {name} missing from source")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    fn two_column_parquet() -> Bytes {
        let schema = Arc::new(Schema::new(vec![
            Field::new("MSA_NAME", DataType::Utf8, true),
            Field::new("SALARY_TO", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(StringArray::from(vec![
                    Some("Boise, ID"),
                    Some("Austin, TX"),
                    Some("Austin, TX"),
                    None,
                ])) as ArrayRef,
                Arc::new(Float64Array::from(vec![
                    Some(90_000.0),
                    Some(120_000.0),
                    None,
                    Some(50_000.0),
                ])) as ArrayRef,
            ],
        )
        .unwrap();

        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        Bytes::from(buf)
    }

    #[test]
    fn test_discover_categories_sorted_distinct_non_null() {
        let data = two_column_parquet();
        let msas = discover_categories(&data, "MSA_NAME").unwrap();
        assert_eq!(msas, vec!["Austin, TX".to_string(), "Boise, ID".to_string()]);
    }

    #[test]
    fn test_discover_categories_missing_column() {
        let data = two_column_parquet();
        let err = discover_categories(&data, "NO_SUCH_COLUMN").unwrap_err();
        assert!(matches!(err, DashboardError::SourceFormat(_)));
    }

    #[test]
    fn test_read_projected_pushes_equality_predicate() {
        let data = two_column_parquet();
        let batches =
            read_projected(&data, &["MSA_NAME", "SALARY_TO"], ("MSA_NAME", "Austin, TX")).unwrap();

        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 2);
        for batch in &batches {
            let col = get_string_column(batch, "MSA_NAME").unwrap();
            for value in col.iter() {
                assert_eq!(value, Some("Austin, TX"));
            }
        }
    }

    #[test]
    fn test_read_projected_unmatched_value_is_empty() {
        let data = two_column_parquet();
        let batches =
            read_projected(&data, &["SALARY_TO"], ("MSA_NAME", "Nowhere, ZZ")).unwrap();
        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_not_a_parquet_blob() {
        let data = Bytes::from_static(b"definitely not parquet");
        let err = discover_categories(&data, "MSA_NAME").unwrap_err();
        assert!(matches!(err, DashboardError::SourceFormat(_)));
    }
}
