use serde::Serialize;

use crate::dataset::Record;

const SKILL_READINESS_MIN: f64 = 85.0;
const SKILL_READINESS_MAX: f64 = 97.0;
const RATING_MIN: f64 = 3.5;
const RATING_MAX: f64 = 5.0;

/// Aggregates over one filtered slice of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub total_count: usize,
    pub diversity_pct: f64,
    pub avg_cost: f64,
    pub avg_time: f64,
    pub avg_rating: f64,
    pub internal_pct: f64,
    pub skill_readiness: u32,
}

/// Returns `None` for an empty slice.
pub fn aggregate(rows: &[&Record]) -> Option<Aggregates> {
    if rows.is_empty() {
        return None;
    }
    let total = rows.len() as f64;

    let diverse = rows.iter().filter(|r| r.synthetic.is_diverse).count() as f64;
    let internal = rows.iter().filter(|r| r.synthetic.is_internal).count() as f64;
    let avg_rating = rows.iter().map(|r| r.synthetic.rating).sum::<f64>() / total;

    Some(Aggregates {
        total_count: rows.len(),
        diversity_pct: diverse / total * 100.0,
        avg_cost: mean(rows.iter().filter_map(|r| r.synthetic.cost)),
        avg_time: mean(rows.iter().filter_map(|r| r.synthetic.time_to_hire)),
        avg_rating,
        internal_pct: internal / total * 100.0,
        skill_readiness: skill_readiness(avg_rating),
    })
}

/// Mean of the values, 0 when there are none (column absent).
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Maps the slice's mean rating linearly onto [85, 97].
pub fn skill_readiness(avg_rating: f64) -> u32 {
    let t = ((avg_rating - RATING_MIN) / (RATING_MAX - RATING_MIN)).clamp(0.0, 1.0);
    (SKILL_READINESS_MIN + t * (SKILL_READINESS_MAX - SKILL_READINESS_MIN)).round() as u32
}
