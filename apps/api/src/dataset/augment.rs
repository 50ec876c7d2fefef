//! Synthetic metric generation.
//!
//! The source dataset has no cost, time-to-hire, rating or internal-hire
//! columns, so they are simulated from a seeded RNG. Draws are made one
//! column at a time across all rows, in a fixed order, so a given file and
//! seed always produce the same values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{cell, Dataset, COL_DEPARTMENT, COL_GENDER, COL_JOB_ROLE};

/// Placeholder used for null cells when a string length is needed.
const NULL_TEXT: &str = "nan";
const INTERNAL_PROBABILITY: f64 = 0.3;

pub fn augment(dataset: &mut Dataset, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);

    let job_idx = dataset.column_index(COL_JOB_ROLE);
    let dept_idx = dataset.column_index(COL_DEPARTMENT);
    let gender_idx = dataset.column_index(COL_GENDER);

    if let Some(idx) = job_idx {
        for record in &mut dataset.rows {
            let len = text_len(cell(record, idx));
            let jitter = rng.gen_range(500..2000);
            record.synthetic.cost = Some((len * 150 + jitter) as f64);
        }
    }

    if let Some(idx) = dept_idx {
        for record in &mut dataset.rows {
            let len = text_len(cell(record, idx));
            let jitter = rng.gen_range(2..10);
            record.synthetic.time_to_hire = Some((len / 2 + jitter) as f64);
        }
    }

    for record in &mut dataset.rows {
        record.synthetic.rating = rng.gen_range(3.5..5.0);
    }

    for record in &mut dataset.rows {
        record.synthetic.is_internal = rng.gen_bool(INTERNAL_PROBABILITY);
    }

    match gender_idx {
        Some(idx) => {
            for record in &mut dataset.rows {
                record.synthetic.is_diverse = cell(record, idx) == Some("Female");
            }
        }
        None => {
            for record in &mut dataset.rows {
                record.synthetic.is_diverse = rng.gen_bool(0.5);
            }
        }
    }
}

fn text_len(value: Option<&str>) -> usize {
    value.unwrap_or(NULL_TEXT).chars().count()
}
