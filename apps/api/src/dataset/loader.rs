use std::path::Path;

use tracing::{info, warn};

use super::{Dataset, DatasetError};

/// Loads the primary dataset, falling back to the secondary path when the
/// primary file is absent. Neither file existing yields an empty dataset.
pub fn load_dataset(primary: &str, fallback: &str) -> Result<Dataset, DatasetError> {
    let path = if Path::new(primary).exists() {
        info!("Loading primary dataset: {primary}");
        primary
    } else if Path::new(fallback).exists() {
        info!("Loading fallback dataset: {fallback}");
        fallback
    } else {
        warn!("No dataset found at {primary} or {fallback}");
        return Ok(Dataset::default());
    };

    let dataset = read_csv(path)?;
    info!("Data loaded. Records: {}", dataset.len());
    Ok(dataset)
}

fn read_csv(path: &str) -> Result<Dataset, DatasetError> {
    let csv_err = |source| DatasetError::Csv {
        path: path.to_string(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let mut dataset = Dataset::new(headers, rows);
    dataset.source = Some(path.to_string());
    Ok(dataset)
}
