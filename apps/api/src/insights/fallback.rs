//! Deterministic responses used whenever the model is unavailable or its
//! output fails validation. The dashboard always gets something to render.

use crate::insights::models::{ClusterInsight, MetricSnapshot, Narrative};
use crate::metrics::Rag;

pub fn fallback_insight(metrics: &[MetricSnapshot]) -> ClusterInsight {
    let red = metrics.iter().filter(|m| m.rag == Rag::Red);
    let amber = metrics.iter().filter(|m| m.rag == Rag::Amber);
    let focus: Vec<&MetricSnapshot> = red.chain(amber).take(2).collect();
    let any_red = metrics.iter().any(|m| m.rag == Rag::Red);

    let bullets = if focus.is_empty() {
        vec![
            "No critical KPI movement detected in the current slice.".to_string(),
            "Use filters to narrow to a high-risk cohort.".to_string(),
        ]
    } else {
        focus
            .iter()
            .map(|m| format!("{}: {} vs target {}.", m.title, m.value_text, m.threshold_text))
            .collect()
    };

    let headline = if any_red {
        "Critical KPIs need immediate intervention"
    } else {
        "Cluster is stable with targeted watch areas"
    };

    let action = match focus.first() {
        Some(m) => format!(
            "Start with {}; assign an owner and run a 7-day corrective plan with daily tracking.",
            m.title
        ),
        None => "Prioritize one strategic KPI and set a weekly improvement target.".to_string(),
    };

    ClusterInsight {
        headline: headline.to_string(),
        bullets,
        action,
        watchouts: vec![
            "Fallback insight generated because LLM response was unavailable.".to_string(),
        ],
    }
}

pub fn fallback_narrative(metric: &MetricSnapshot) -> Narrative {
    let unavailable = metric.is_unavailable();
    let gap = if unavailable {
        "Value unavailable for the current filter slice.".to_string()
    } else {
        format!("{} vs {}.", metric.value_text, metric.threshold_text)
    };

    let alarm = match metric.rag {
        Rag::Red => format!("{} is off target. {gap}", metric.title),
        Rag::Amber => format!("{} is near threshold. {gap}", metric.title),
        Rag::Green => format!("{} is on target. {gap}", metric.title),
    };

    let evidence = metric
        .supporting_facts
        .first()
        .map(|f| format!(" Evidence: {f}."))
        .unwrap_or_default();
    let insight = if unavailable {
        format!("Data required for this KPI is missing or filtered out.{evidence}")
    } else {
        format!("Current performance is {}.{evidence}", metric.rag.as_str())
    };

    let action = if unavailable {
        "Confirm the required source columns are present or broaden filters to restore data coverage."
    } else {
        match metric.rag {
            Rag::Red => "Assign an owner and run a focused improvement sprint this week.",
            Rag::Amber => "Run one targeted improvement experiment and monitor weekly.",
            Rag::Green => "Maintain current cadence and monitor for regression.",
        }
    };

    Narrative {
        id: metric.id.clone(),
        alarm,
        insight,
        action: action.to_string(),
    }
}
