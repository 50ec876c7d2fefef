use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::{
    Dataset, Record, COL_COUNTRY, COL_DEPARTMENT, COL_GENDER, COL_JOB_ROLE, COL_NATIONALITY,
};

/// Columns exposed as dashboard filter dropdowns.
pub const FILTER_COLUMNS: &[&str] = &[
    COL_DEPARTMENT,
    COL_COUNTRY,
    COL_GENDER,
    COL_NATIONALITY,
    COL_JOB_ROLE,
];

/// Sorted distinct non-null values for each filter column present in the data.
pub fn filter_options(dataset: &Dataset) -> BTreeMap<String, Vec<String>> {
    let mut options = BTreeMap::new();
    if dataset.is_empty() {
        return options;
    }

    for column in FILTER_COLUMNS {
        let Some(idx) = dataset.column_index(column) else {
            continue;
        };
        let values: BTreeSet<&str> = dataset
            .rows
            .iter()
            .filter_map(|r| crate::dataset::cell(r, idx))
            .collect();
        options.insert(
            column.to_string(),
            values.into_iter().map(str::to_string).collect(),
        );
    }

    options
}

/// Query parameters accepted by `GET /api/metrics`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricFilter {
    pub dept: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub job: Option<String>,
}

impl MetricFilter {
    /// Builds a filter from raw query pairs. A repeated key keeps its last value;
    /// unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "dept" => &mut filter.dept,
                "country" => &mut filter.country,
                "gender" => &mut filter.gender,
                "job" => &mut filter.job,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        filter
    }

    /// (column index, expected value) pairs that actually constrain rows.
    /// Blank parameters and parameters for absent columns are dropped.
    fn constraints<'a>(&'a self, dataset: &Dataset) -> Vec<(usize, &'a str)> {
        [
            (COL_DEPARTMENT, &self.dept),
            (COL_COUNTRY, &self.country),
            (COL_GENDER, &self.gender),
            (COL_JOB_ROLE, &self.job),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            let value = value.as_deref().filter(|v| !v.is_empty())?;
            Some((dataset.column_index(column)?, value))
        })
        .collect()
    }

    pub fn apply<'d>(&self, dataset: &'d Dataset) -> Vec<&'d Record> {
        let constraints = self.constraints(dataset);
        dataset
            .rows
            .iter()
            .filter(|r| {
                constraints
                    .iter()
                    .all(|(idx, want)| r.values.get(*idx).map(String::as_str) == Some(*want))
            })
            .collect()
    }
}
