//! Urgency ranking across loaded patient views.
//!
//! `urgency = min(current_risk * 0.5 + min(velocity, 0.5), 1.0)`
//!
//! `current_risk` is the latest prediction's score (0.5 when the patient has none). `velocity`
//! comes from the heart rate change per hour between the two most recent readings, normalised
//! so that 20 bpm/h saturates at 1.0.

use crate::view::PatientMonitoringView;
use vitals_types::PatientId;

const UNASSESSED_RISK: f64 = 0.5;
const SATURATING_BPM_PER_HOUR: f64 = 20.0;
const TREND_THRESHOLD_BPM_PER_HOUR: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Deteriorating,
    Improving,
    Stable,
    Unknown,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Deteriorating => "Deteriorating",
            Trend::Improving => "Improving",
            Trend::Stable => "Stable",
            Trend::Unknown => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriageScore {
    pub patient_id: PatientId,
    pub name: String,
    pub urgency_score: f64,
    pub current_risk: f64,
    pub trend: Trend,
    pub reason: String,
}

pub fn score(view: &PatientMonitoringView) -> TriageScore {
    let patient = view.patient();
    let recent = view.readings_latest_first();

    if recent.is_empty() {
        return TriageScore {
            patient_id: patient.id.clone(),
            name: patient.name.to_string(),
            urgency_score: 0.0,
            current_risk: 0.0,
            trend: Trend::Unknown,
            reason: "Insufficient data".into(),
        };
    }

    let current_risk = view
        .latest_prediction()
        .map_or(UNASSESSED_RISK, |p| p.risk_score);

    let mut velocity = 0.0;
    let mut trend = Trend::Stable;
    if let [newest, previous, ..] = recent.as_slice() {
        let hours =
            (newest.recorded_at - previous.recorded_at).num_milliseconds() as f64 / 3_600_000.0;
        if hours > 0.0 {
            let rate = (f64::from(newest.heart_rate) - f64::from(previous.heart_rate)) / hours;
            velocity = (rate.abs() / SATURATING_BPM_PER_HOUR).min(1.0);
            if rate > TREND_THRESHOLD_BPM_PER_HOUR {
                trend = Trend::Deteriorating;
                velocity *= 1.5;
            } else if rate < -TREND_THRESHOLD_BPM_PER_HOUR {
                trend = Trend::Improving;
                velocity *= 0.5;
            }
        }
    }

    let urgency = (current_risk * 0.5 + velocity.min(0.5)).min(1.0);

    TriageScore {
        patient_id: patient.id.clone(),
        name: patient.name.to_string(),
        urgency_score: (urgency * 1000.0).round() / 1000.0,
        current_risk,
        trend,
        reason: format!("{} trend, Current risk: {current_risk:.2}", trend.as_str()),
    }
}

/// Scores every view and orders them most urgent first.
pub fn rank<'a, I>(views: I) -> Vec<TriageScore>
where
    I: IntoIterator<Item = &'a PatientMonitoringView>,
{
    let mut scores: Vec<TriageScore> = views.into_iter().map(score).collect();
    scores.sort_by(|a, b| b.urgency_score.total_cmp(&a.urgency_score));
    scores
}
