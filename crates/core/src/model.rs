//! Domain records as held by the client.
//!
//! Every record here is an immutable snapshot of what the backend store returned on the last
//! fetch. None of them are edited in place; a mutation is followed by a fresh load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitals_types::{BloodPressure, NonEmptyText, PatientId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: u8,
    pub medical_record_number: NonEmptyText,
    #[serde(with = "utc_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// One timestamped vital-sign measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub patient_id: PatientId,
    pub blood_pressure: BloodPressure,
    pub heart_rate: u16,
    /// Degrees Fahrenheit.
    pub temperature: f64,
    /// Percent.
    pub oxygen_saturation: f64,
    #[serde(with = "utc_timestamp")]
    pub recorded_at: DateTime<Utc>,
}

/// The store's reply to create-reading.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedReading {
    pub reading: Reading,
    /// Set when the store's data auditor flagged the values as implausible, e.g.
    /// "Data flagged as suspicious: ...". The reading is stored either way.
    pub warning: Option<String>,
}

/// Ordered oldest first. Shared by the view and the trend projector.
pub(crate) fn chronological(readings: &[Reading]) -> Vec<&Reading> {
    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by_key(|r| r.recorded_at);
    ordered
}

/// A risk assessment generated from the patient's readings at `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub patient_id: PatientId,
    /// Free text from the prediction service; see [`crate::risk::RiskCategory::classify`].
    #[serde(default)]
    pub risk_level: Option<String>,
    /// Fraction in `[0, 1]`.
    pub risk_score: f64,
    pub recommendation: String,
    #[serde(default)]
    pub baseline_analysis: Option<String>,
    #[serde(with = "utc_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Input for create-patient, produced by [`crate::validation::validate_new_patient`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub age: u8,
    pub medical_record_number: NonEmptyText,
}

/// Input for create-reading, produced by [`crate::validation::validate_vitals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingInput {
    pub blood_pressure: BloodPressure,
    pub heart_rate: u16,
    pub temperature: f64,
    pub oxygen_saturation: f64,
}

/// The store's get-patient response: the patient with both histories, in store order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatientRecord {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// One page of the patient collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientPage {
    pub items: Vec<Patient>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Serde adapter for backend timestamps.
///
/// Accepts RFC 3339 with an offset, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` which is taken as UTC.
pub mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
    }
}
