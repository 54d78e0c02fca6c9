//! Risk classification for display.

use crate::model::Prediction;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// Case-insensitive match on `low`/`medium`/`high`.
    ///
    /// Anything else, including a missing or blank value, is `Low`: an unrecognised level must
    /// never render as more severe than the service said.
    pub fn classify(level: Option<&str>) -> Self {
        match level.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("medium") => RiskCategory::Medium,
            Some("high") => RiskCategory::High,
            _ => RiskCategory::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the presentation layer renders for a prediction.
///
/// `category` drives styling; `label` is the service's own text, kept so that an unexpected
/// value is still visible to staff even though it is styled as low.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskBadge {
    pub category: RiskCategory,
    pub label: String,
    /// Risk score as a whole percentage.
    pub score_percent: u8,
}

impl RiskBadge {
    pub fn for_prediction(prediction: &Prediction) -> Self {
        let category = RiskCategory::classify(prediction.risk_level.as_deref());
        let label = prediction
            .risk_level
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| category.as_str().to_ascii_uppercase());
        let score_percent = (prediction.risk_score.clamp(0.0, 1.0) * 100.0).round() as u8;

        Self {
            category,
            label,
            score_percent,
        }
    }
}
