//! Plain-text rendering of screen data for the terminal.

use chrono::{DateTime, Local, Utc};
use vitals_core::risk::RiskBadge;
use vitals_core::trend::{AxisSide, Metric, TrendSeries};
use vitals_core::triage::TriageScore;
use vitals_core::{Patient, PatientMonitoringView, Prediction, Reading};

fn local(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn patient_row(patient: &Patient) -> String {
    format!(
        "ID: {}, Name: {}, Age: {}, MRN: {}, Created: {}",
        patient.id,
        patient.name,
        patient.age,
        patient.medical_record_number,
        local(&patient.created_at)
    )
}

pub fn reading_line(reading: &Reading) -> String {
    format!(
        "{}  BP {} mmHg  HR {} bpm  Temp {}°F  SpO2 {}%",
        local(&reading.recorded_at),
        reading.blood_pressure,
        reading.heart_rate,
        reading.temperature,
        reading.oxygen_saturation
    )
}

/// The store keeps a flagged reading; staff are told so it can be rechecked.
pub fn auditor_warning(warning: &str) -> String {
    format!("Warning: {warning}")
}

pub fn risk_line(badge: &RiskBadge) -> String {
    format!(
        "Risk: {} [{}] ({}%)",
        badge.label, badge.category, badge.score_percent
    )
}

fn prediction_block(prediction: &Prediction) -> Vec<String> {
    let mut lines = vec![
        risk_line(&RiskBadge::for_prediction(prediction)),
        format!("Recommendation: {}", prediction.recommendation),
    ];
    if let Some(analysis) = &prediction.baseline_analysis {
        lines.push(format!("Baseline analysis: {analysis}"));
    }
    lines.push(format!("Assessed: {}", local(&prediction.created_at)));
    lines
}

/// Patient header, latest assessment and the reading history (most recent first).
pub fn monitoring_view(view: &PatientMonitoringView) -> Vec<String> {
    let mut lines = vec![patient_row(view.patient())];

    match view.latest_prediction() {
        Some(prediction) => lines.extend(prediction_block(prediction)),
        None => lines.push("No risk assessment yet".into()),
    }

    if view.has_readings() {
        lines.push(format!("Readings ({}):", view.readings().len()));
        lines.extend(
            view.readings_latest_first()
                .into_iter()
                .map(|r| format!("  {}", reading_line(r))),
        );
    } else {
        lines.push("No readings recorded".into());
    }
    lines
}

pub fn trend_series(series: &TrendSeries) -> Vec<String> {
    let mut lines = Vec::new();
    for side in [AxisSide::Left, AxisSide::Right] {
        let domain = series.domain(side);
        let legends: Vec<String> = Metric::ALL
            .into_iter()
            .filter(|m| m.axis() == side)
            .map(Metric::legend)
            .collect();
        lines.push(format!(
            "{:?} axis [{}, {}]: {}",
            side,
            domain.min,
            domain.max,
            legends.join(", ")
        ));
    }

    for point in &series.points {
        let tooltip = point.tooltip();
        lines.push(format!("#{} {}  {}", point.index, tooltip.title, tooltip.lines.join("  ")));
    }
    lines.push(series.caption());
    lines
}

pub fn triage_row(rank: usize, score: &TriageScore) -> String {
    format!(
        "{rank}. {} (ID: {})  urgency {:.3}  {}",
        score.name, score.patient_id, score.urgency_score, score.reason
    )
}
