//! The patient monitoring view.
//!
//! A view is the read-only composite of one patient with its full reading and prediction
//! histories. It is never patched: after any mutation the caller obtains a new one from
//! [`MonitoringService::load_view`](crate::MonitoringService::load_view).

use crate::model::{self, Patient, PatientRecord, Prediction, Reading};
use vitals_types::PatientId;

#[derive(Debug, Clone, PartialEq)]
pub struct PatientMonitoringView {
    patient: Patient,
    readings: Vec<Reading>,
    predictions: Vec<Prediction>,
}

impl PatientMonitoringView {
    /// Builds a view from whatever the store returned, keeping its order.
    pub fn from_record(record: PatientRecord) -> Self {
        Self {
            patient: record.patient,
            readings: record.readings,
            predictions: record.predictions,
        }
    }

    pub fn patient(&self) -> &Patient {
        &self.patient
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient.id
    }

    /// Readings in store order. Use [`Self::readings_chronological`] or
    /// [`Self::readings_latest_first`] when order matters.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn has_readings(&self) -> bool {
        !self.readings.is_empty()
    }

    /// The reading with the greatest `recorded_at`, whatever position it holds.
    pub fn latest_reading(&self) -> Option<&Reading> {
        self.readings.iter().max_by_key(|r| r.recorded_at)
    }

    /// The prediction with the greatest `created_at`: the active assessment.
    pub fn latest_prediction(&self) -> Option<&Prediction> {
        self.predictions.iter().max_by_key(|p| p.created_at)
    }

    /// Oldest first, for trend charting.
    pub fn readings_chronological(&self) -> Vec<&Reading> {
        model::chronological(&self.readings)
    }

    /// Newest first, for history display.
    pub fn readings_latest_first(&self) -> Vec<&Reading> {
        let mut ordered = self.readings_chronological();
        ordered.reverse();
        ordered
    }
}
