// Recruitment dataset: loaded once at startup, read-only afterwards.
// Raw CSV cells are kept as strings; synthetic metrics are attached per row.

pub mod augment;
pub mod loader;

use serde::Serialize;
use thiserror::Error;

pub use augment::augment;
pub use loader::load_dataset;

pub const COL_DEPARTMENT: &str = "Department";
pub const COL_COUNTRY: &str = "Country";
pub const COL_GENDER: &str = "Gender";
pub const COL_NATIONALITY: &str = "Nationality";
pub const COL_JOB_ROLE: &str = "Job_Role";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Metrics the source data lacks, generated deterministically from a seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyntheticMetrics {
    /// `None` when the dataset has no `Job_Role` column.
    pub cost: Option<f64>,
    /// `None` when the dataset has no `Department` column.
    pub time_to_hire: Option<f64>,
    pub rating: f64,
    pub is_internal: bool,
    pub is_diverse: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Cell values in header order. Empty string means null.
    pub values: Vec<String>,
    pub synthetic: SyntheticMetrics,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
    /// File the rows came from, if any.
    pub source: Option<String>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, String::new());
                Record {
                    values,
                    synthetic: SyntheticMetrics::default(),
                }
            })
            .collect();

        Self {
            headers,
            rows,
            source: None,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

/// Null-aware cell lookup by column position.
pub(crate) fn cell(record: &Record, idx: usize) -> Option<&str> {
    record
        .values
        .get(idx)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["Department".into(), "Gender".into()],
            vec![
                vec!["Cabin Crew".into(), "Female".into()],
                vec!["Pilots".into()],
            ],
        )
    }

    #[test]
    fn test_new_pads_short_rows() {
        let ds = sample();
        assert_eq!(ds.rows[1].values.len(), 2);
        let gender = ds.column_index(COL_GENDER).unwrap();
        assert_eq!(cell(&ds.rows[1], gender), None);
    }

    #[test]
    fn test_column_lookup() {
        let ds = sample();
        assert_eq!(ds.column_index(COL_GENDER), Some(1));
        assert_eq!(ds.column_index(COL_COUNTRY), None);
        assert_eq!(cell(&ds.rows[0], 0), Some("Cabin Crew"));
        assert!(ds.has_column(COL_GENDER));
        assert!(!ds.has_column(COL_JOB_ROLE));
    }
}
