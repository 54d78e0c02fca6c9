//! Port to the backend store.
//!
//! The pipeline consumes exactly these five operations. Adapters (see the `vitals-http` crate)
//! translate their own failures into [`MonitorError`](crate::MonitorError) before returning, so
//! the aggregator never needs to know which transport it is talking to.

use crate::model::{
    NewPatient, Patient, PatientPage, PatientRecord, Prediction, RecordedReading, ReadingInput,
};
use crate::MonitorResult;
use vitals_types::PatientId;

#[async_trait::async_trait]
pub trait PatientStore: Send + Sync {
    /// Fails with `DuplicateRecord` when the medical record number is already taken.
    async fn create_patient(&self, patient: &NewPatient) -> MonitorResult<Patient>;

    async fn list_patients(&self, page: u32, page_size: u32) -> MonitorResult<PatientPage>;

    /// Fails with `NotFound` when no patient has this id.
    async fn get_patient(&self, id: &PatientId) -> MonitorResult<PatientRecord>;

    /// The reply may carry an auditor warning; the reading is stored regardless.
    async fn create_reading(
        &self,
        id: &PatientId,
        reading: &ReadingInput,
    ) -> MonitorResult<RecordedReading>;

    async fn create_prediction(&self, id: &PatientId) -> MonitorResult<Prediction>;
}
