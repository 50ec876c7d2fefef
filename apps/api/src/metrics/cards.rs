//! KPI card construction: red/amber/green classification, display formatting
//! and grouping into dashboard clusters.

use serde::{Deserialize, Serialize};

use crate::metrics::aggregate::Aggregates;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rag {
    Red,
    Amber,
    Green,
}

impl Rag {
    pub fn higher_is_better(value: f64, green_min: f64, amber_min: f64) -> Self {
        if value >= green_min {
            Rag::Green
        } else if value >= amber_min {
            Rag::Amber
        } else {
            Rag::Red
        }
    }

    pub fn lower_is_better(value: f64, green_max: f64, amber_max: f64) -> Self {
        if value <= green_max {
            Rag::Green
        } else if value <= amber_max {
            Rag::Amber
        } else {
            Rag::Red
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rag::Red => "red",
            Rag::Amber => "amber",
            Rag::Green => "green",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Rag::Green => "emerald",
            Rag::Amber => "amber",
            Rag::Red => "rose",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricCard {
    pub id: &'static str,
    pub title: &'static str,
    pub val: String,
    pub status: &'static str,
    pub color: &'static str,
    pub rag: Rag,
    pub threshold: &'static str,
}

impl MetricCard {
    /// `healthy` is the status label shown while the card is green.
    fn new(
        id: &'static str,
        title: &'static str,
        val: String,
        rag: Rag,
        healthy: &'static str,
        threshold: &'static str,
    ) -> Self {
        let status = match rag {
            Rag::Green => healthy,
            Rag::Amber => "Watch",
            Rag::Red => "Critical",
        };
        Self {
            id,
            title,
            val,
            status,
            color: rag.color(),
            rag,
            threshold,
        }
    }
}

/// KPI cards grouped by dashboard cluster.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub readiness: Vec<MetricCard>,
    pub momentum: Vec<MetricCard>,
    pub experience: Vec<MetricCard>,
    pub diversity: Vec<MetricCard>,
    pub economics: Vec<MetricCard>,
}

pub fn build_dashboard(agg: &Aggregates) -> Dashboard {
    let pool = agg.total_count as f64;
    let readiness = vec![
        MetricCard::new(
            "metric.readiness.qualified_pool",
            "Qualified Pool",
            format_thousands(agg.total_count as u64),
            Rag::higher_is_better(pool, 1000.0, 800.0),
            "Optimal",
            "> 1,000",
        ),
        MetricCard::new(
            "metric.readiness.skill_readiness",
            "Skill Readiness",
            format!("{}%", agg.skill_readiness),
            Rag::higher_is_better(agg.skill_readiness as f64, 90.0, 84.0),
            "High",
            "> 90%",
        ),
    ];

    let momentum = vec![
        MetricCard::new(
            "metric.momentum.time_to_next_step",
            "Time to Next Step",
            format!("{:.1}d", agg.avg_time),
            Rag::lower_is_better(agg.avg_time, 5.0, 6.0),
            "Healthy",
            "< 5.0 days",
        ),
        MetricCard::new(
            "metric.momentum.internal_candidates",
            "Internal Candidates (Employees)",
            format!("{:.1}%", agg.internal_pct),
            Rag::higher_is_better(agg.internal_pct, 25.0, 15.0),
            "Healthy",
            "> 25%",
        ),
    ];

    let experience = vec![MetricCard::new(
        "metric.experience.recruiting_experience",
        "Recruiting Experience",
        format!("{:.1} / 5", agg.avg_rating),
        Rag::higher_is_better(agg.avg_rating, 4.2, 4.0),
        "Positive",
        "> 4.2",
    )];

    let diversity = vec![MetricCard::new(
        "metric.diversity.diverse_attraction",
        "Diverse Attraction",
        format!("{:.1}%", agg.diversity_pct),
        Rag::higher_is_better(agg.diversity_pct, 40.0, 35.0),
        "Strong",
        "> 40%",
    )];

    let economics = vec![MetricCard::new(
        "metric.economics.cost_per_acquisition",
        "Cost/Acquisition",
        format!("${}", format_thousands(agg.avg_cost.round().max(0.0) as u64)),
        Rag::lower_is_better(agg.avg_cost, 4000.0, 4500.0),
        "Efficient",
        "< $4,000",
    )];

    Dashboard {
        readiness,
        momentum,
        experience,
        diversity,
        economics,
    }
}

/// Groups digits in threes with commas: 1234567 → "1,234,567".
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
