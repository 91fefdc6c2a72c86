//! Utility functions for arrow column access

use arrow::array::{Array, Float64Array, RecordBatch, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::error::Result;

/// Get a numeric column by name as Float64, casting if the source stored it
/// as another numeric physical type (Int64, Decimal128, ...).
pub fn get_f64_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let idx = batch.schema().index_of(name)?;
    let col = batch.column(idx);

    if col.data_type() == &DataType::Float64 {
        return Ok(col.as_any().downcast_ref::<Float64Array>().unwrap().clone());
    }

    // Arrow cast kernel preserves nulls through the conversion
    let cast_array = cast(col, &DataType::Float64)?;
    Ok(cast_array.as_any().downcast_ref::<Float64Array>().unwrap().clone())
}

/// Get a categorical column by name as Utf8, casting if necessary.
pub fn get_string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let idx = batch.schema().index_of(name)?;
    let col = batch.column(idx);

    if col.data_type() == &DataType::Utf8 {
        return Ok(col.as_any().downcast_ref::<StringArray>().unwrap().clone());
    }

    let cast_array = cast(col, &DataType::Utf8)?;
    Ok(cast_array.as_any().downcast_ref::<StringArray>().unwrap().clone())
}

/// Cell accessor that maps arrow nulls to None.
pub fn opt_string(array: &StringArray, row: usize) -> Option<String> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row).to_string())
    }
}

pub fn opt_f64(array: &Float64Array, row: usize) -> Option<f64> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_f64_column_cast_from_int() {
        let schema = Arc::new(Schema::new(vec![Field::new("SALARY_TO", DataType::Int64, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![Some(90_000), None])) as ArrayRef],
        )
        .unwrap();

        let col = get_f64_column(&batch, "SALARY_TO").unwrap();
        assert_eq!(opt_f64(&col, 0), Some(90_000.0));
        assert_eq!(opt_f64(&col, 1), None);
    }

    #[test]
    fn test_missing_column_is_source_format() {
        let schema = Arc::new(Schema::new(vec![Field::new("A", DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec!["x"])) as ArrayRef],
        )
        .unwrap();

        assert!(get_string_column(&batch, "B").is_err());
    }
}
