//! Patient record aggregation.
//!
//! `MonitoringService` is the only component that talks to the store. Every mutating operation
//! follows the same sequence: call the store, await it, then unconditionally reload the patient
//! and hand back the fresh view. The store's reply to the mutation itself is logged and dropped,
//! apart from an auditor warning on a new reading, which is passed along as advice.

use crate::model::{NewPatient, Patient, PatientPage, ReadingInput};
use crate::store::PatientStore;
use crate::view::PatientMonitoringView;
use crate::{MonitorError, MonitorResult};
use std::sync::Arc;
use vitals_types::PatientId;

/// Outcome of [`MonitoringService::submit_reading`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedReading {
    /// Reloaded after the write; the source of truth for display.
    pub view: PatientMonitoringView,
    /// The store's data auditor flag for the submitted values, if any.
    pub warning: Option<String>,
}

pub struct MonitoringService<S> {
    store: Arc<S>,
}

impl<S> Clone for MonitoringService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PatientStore> MonitoringService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches the patient with both histories and assembles a fresh view.
    ///
    /// # Errors
    ///
    /// `NotFound` when the store has no such patient; `Transport`/`Upstream` otherwise.
    pub async fn load_view(&self, id: &PatientId) -> MonitorResult<PatientMonitoringView> {
        let record = self.store.get_patient(id).await?;
        tracing::debug!(
            patient_id = %id,
            readings = record.readings.len(),
            predictions = record.predictions.len(),
            "loaded patient view"
        );
        Ok(PatientMonitoringView::from_record(record))
    }

    /// Records a validated reading, then reloads the view.
    pub async fn submit_reading(
        &self,
        id: &PatientId,
        reading: &ReadingInput,
    ) -> MonitorResult<SubmittedReading> {
        let recorded = self.store.create_reading(id, reading).await?;
        tracing::info!(
            patient_id = %id,
            recorded_at = %recorded.reading.recorded_at,
            "recorded vital signs"
        );
        if let Some(warning) = &recorded.warning {
            tracing::warn!(patient_id = %id, %warning, "reading flagged by data auditor");
        }

        let view = self.load_view(id).await?;
        Ok(SubmittedReading {
            view,
            warning: recorded.warning,
        })
    }

    /// Requests a new risk prediction for the patient shown in `current`, then reloads.
    ///
    /// Refuses with `NoReadings`, without calling the store, when `current` has no readings.
    pub async fn request_prediction(
        &self,
        current: &PatientMonitoringView,
    ) -> MonitorResult<PatientMonitoringView> {
        let id = current.patient_id();
        if !current.has_readings() {
            tracing::warn!(patient_id = %id, "prediction refused: no readings");
            return Err(MonitorError::NoReadings);
        }

        let prediction = self.store.create_prediction(id).await?;
        tracing::info!(
            patient_id = %id,
            risk_level = prediction.risk_level.as_deref().unwrap_or("-"),
            "prediction generated"
        );
        self.load_view(id).await
    }

    pub async fn create_patient(&self, patient: &NewPatient) -> MonitorResult<Patient> {
        match self.store.create_patient(patient).await {
            Ok(created) => {
                tracing::info!(patient_id = %created.id, "patient created");
                Ok(created)
            }
            Err(err @ MonitorError::DuplicateRecord(_)) => {
                tracing::warn!("create patient rejected: medical record number already registered");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn list_patients(&self, page: u32, page_size: u32) -> MonitorResult<PatientPage> {
        let page = self.store.list_patients(page, page_size).await?;
        tracing::debug!(page = page.page, total = page.total, "listed patients");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::{Call, FakeStore};
    use crate::validation::{validate_new_patient, validate_vitals};

    fn service(store: FakeStore) -> MonitoringService<FakeStore> {
        MonitoringService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_load_view_unknown_patient_is_not_found() {
        let svc = service(FakeStore::new());
        let err = svc.load_view(&PatientId::new("404")).await.unwrap_err();
        assert!(matches!(err, MonitorError::NotFound(id) if id.as_str() == "404"));
    }

    #[tokio::test]
    async fn test_submit_reading_creates_then_reloads() {
        let (store, id) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);

        let input = validate_vitals("120/80", "72", "98.6", "98").unwrap();
        let submitted = svc.submit_reading(&id, &input).await.unwrap();

        assert_eq!(svc.store().calls(), vec![Call::CreateReading, Call::GetPatient]);
        assert_eq!(submitted.warning, None);
        let latest = submitted.view.latest_reading().unwrap();
        assert_eq!(latest.blood_pressure.as_str(), "120/80");
        assert_eq!(latest.heart_rate, 72);
        assert_eq!(latest.temperature, 98.6);
        assert_eq!(latest.oxygen_saturation, 98.0);
    }

    #[tokio::test]
    async fn test_latest_reading_after_several_submissions() {
        let (store, id) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);

        for hr in ["70", "80", "90"] {
            let input = validate_vitals("120/80", hr, "98.6", "98").unwrap();
            svc.submit_reading(&id, &input).await.unwrap();
        }
        let view = svc.load_view(&id).await.unwrap();
        assert_eq!(view.readings().len(), 3);
        assert_eq!(view.latest_reading().unwrap().heart_rate, 90);
    }

    #[tokio::test]
    async fn test_prediction_without_readings_never_reaches_store() {
        let (store, id) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);

        let view = svc.load_view(&id).await.unwrap();
        let err = svc.request_prediction(&view).await.unwrap_err();

        assert!(matches!(err, MonitorError::NoReadings));
        assert_eq!(svc.store().calls(), vec![Call::GetPatient]);
    }

    #[tokio::test]
    async fn test_prediction_refreshes_view() {
        let (store, id) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);

        let input = validate_vitals("120/80", "72", "98.6", "98").unwrap();
        let submitted = svc.submit_reading(&id, &input).await.unwrap();
        let view = svc.request_prediction(&submitted.view).await.unwrap();

        assert_eq!(view.predictions().len(), 1);
        assert!(view.latest_prediction().is_some());
        assert_eq!(
            svc.store().calls(),
            vec![
                Call::CreateReading,
                Call::GetPatient,
                Call::CreatePrediction,
                Call::GetPatient
            ]
        );
    }

    #[tokio::test]
    async fn test_auditor_warning_accompanies_reloaded_view() {
        let (store, id) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);
        svc.store()
            .flag_next("Data flagged as suspicious: heart rate 290 is implausible");

        let input = validate_vitals("120/80", "290", "98.6", "98").unwrap();
        let submitted = svc.submit_reading(&id, &input).await.unwrap();

        assert!(submitted
            .warning
            .as_deref()
            .is_some_and(|w| w.starts_with("Data flagged as suspicious")));
        assert_eq!(submitted.view.latest_reading().unwrap().heart_rate, 290);
        assert_eq!(svc.store().calls(), vec![Call::CreateReading, Call::GetPatient]);
    }

    #[tokio::test]
    async fn test_failed_mutation_skips_reload() {
        let (store, id) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);
        svc.store().fail_next(MonitorError::Transport("timed out".into()));

        let input = validate_vitals("120/80", "72", "98.6", "98").unwrap();
        let err = svc.submit_reading(&id, &input).await.unwrap_err();

        assert!(matches!(err, MonitorError::Transport(_)));
        assert_eq!(svc.store().calls(), vec![Call::CreateReading]);
    }

    #[tokio::test]
    async fn test_duplicate_record_is_not_swallowed() {
        let (store, _) = FakeStore::new().with_patient("Ada", "MRN-1");
        let svc = service(store);

        let dup = validate_new_patient("Bob", "40", "MRN-1").unwrap();
        let err = svc.create_patient(&dup).await.unwrap_err();
        assert!(matches!(err, MonitorError::DuplicateRecord(mrn) if mrn == "MRN-1"));

        let fresh = validate_new_patient("Bob", "40", "MRN-2").unwrap();
        let created = svc.create_patient(&fresh).await.unwrap();
        assert_eq!(created.name.as_str(), "Bob");
    }
}
