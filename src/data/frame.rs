use crate::error::InputError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

//ordered table keyed by a strictly increasing timestamp index
//columns are fixed-width numeric vectors, insertion order preserved
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: Vec<DateTime<Utc>>,
    columns: IndexMap<String, Vec<f64>>,
}

impl Frame {
    //creates an empty frame over the given index
    pub fn new(index: Vec<DateTime<Utc>>) -> Result<Self, InputError> {
        if index.is_empty() {
            return Err(InputError::Empty);
        }

        //reject out-of-order and duplicate timestamps
        for i in 1..index.len() {
            if index[i] <= index[i - 1] {
                return Err(InputError::NonMonotonicIndex(i));
            }
        }

        Ok(Frame {
            index,
            columns: IndexMap::new(),
        })
    }

    //convenience constructor for a frame holding only a close column
    pub fn with_close(index: Vec<DateTime<Utc>>, closes: Vec<f64>) -> Result<Self, InputError> {
        let mut frame = Frame::new(index)?;
        frame.insert_column("close", closes)?;
        Ok(frame)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    //inserts or replaces a column, enforcing the fixed row count
    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), InputError> {
        if values.len() != self.index.len() {
            return Err(InputError::LengthMismatch {
                name: name.to_string(),
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    //column access reporting the missing name as a typed error
    pub fn require_column(&self, name: &str) -> Result<&[f64], InputError> {
        self.column(name)
            .ok_or_else(|| InputError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    //column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use chrono::{Duration, TimeZone, Utc};

    fn daily_index(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    #[test]
    fn builds_frame_with_close_column() {
        let frame = Frame::with_close(daily_index(3), vec![100.0, 101.0, 99.0]).unwrap();
        assert_eq!(frame.len(), 3);
        assert!(frame.has_column("close"));
        assert_eq!(frame.column("close").unwrap(), &[100.0, 101.0, 99.0]);
    }

    #[test]
    fn rejects_empty_index() {
        assert!(matches!(Frame::new(vec![]), Err(InputError::Empty)));
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        //swapping rows 1 and 2 gives [d0, d2, d1]; the scan first trips at row 2
        let mut index = daily_index(3);
        index.swap(1, 2);
        assert!(matches!(
            Frame::new(index),
            Err(InputError::NonMonotonicIndex(2))
        ));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let mut index = daily_index(3);
        index[2] = index[1];
        assert!(matches!(
            Frame::new(index),
            Err(InputError::NonMonotonicIndex(2))
        ));
    }

    #[test]
    fn rejects_column_of_wrong_length() {
        let mut frame = Frame::new(daily_index(3)).unwrap();
        let err = frame.insert_column("close", vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InputError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn require_column_reports_missing_name() {
        let frame = Frame::new(daily_index(2)).unwrap();
        let err = frame.require_column("close").unwrap_err();
        assert!(matches!(err, InputError::MissingColumn(name) if name == "close"));
    }

    #[test]
    fn preserves_column_insertion_order() {
        let mut frame = Frame::new(daily_index(2)).unwrap();
        frame.insert_column("close", vec![1.0, 2.0]).unwrap();
        frame.insert_column("signal", vec![0.0, 1.0]).unwrap();
        frame.insert_column("position", vec![0.0, 0.0]).unwrap();
        let names: Vec<&str> = frame.column_names().collect();
        assert_eq!(names, vec!["close", "signal", "position"]);
    }
}
