use crate::wire::{map_failure, CreateReadingResponse, Operation, PaginatedPatients, PredictionRequest};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use vitals_core::{
    CoreConfig, MonitorError, MonitorResult, NewPatient, Patient, PatientId, PatientPage,
    PatientRecord, PatientStore, Prediction, Reading, ReadingInput, RecordedReading,
};

/// [`PatientStore`] backed by the monitoring backend's REST API.
#[derive(Clone, Debug)]
pub struct HttpPatientStore {
    client: Client,
    base_url: Url,
}

impl HttpPatientStore {
    /// Builds a client whose every request is bounded by the configured timeout.
    pub fn new(cfg: &CoreConfig) -> MonitorResult<Self> {
        let client = Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| MonitorError::InvalidConfig(format!("failed to build http client: {e}")))?;

        let base_url = Url::parse(cfg.api_base_url())
            .map_err(|e| MonitorError::InvalidConfig(format!("invalid api base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MonitorError::InvalidConfig(format!(
                "api base url cannot take a path: {base_url}"
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path, percent-encoding each one, so an id can never
    /// add path components of its own.
    fn url(&self, segments: &[&str]) -> MonitorResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                MonitorError::InvalidConfig(format!("api base url cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends `request` and decodes a success body into `T`.
    ///
    /// Connection failures, timeouts and undecodable bodies are `Transport`; non-success
    /// statuses go through [`map_failure`].
    async fn execute<T: DeserializeOwned>(
        &self,
        op: Operation,
        request: RequestBuilder,
        patient: Option<&PatientId>,
    ) -> MonitorResult<T> {
        tracing::debug!(operation = op.as_str(), "sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(operation = op.as_str(), error = %e, "request failed");
            MonitorError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MonitorError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let err = map_failure(op, status.as_u16(), &body, patient);
            tracing::warn!(operation = op.as_str(), status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            MonitorError::Transport(format!("invalid {} response: {e}", op.as_str()))
        })
    }
}

#[async_trait::async_trait]
impl PatientStore for HttpPatientStore {
    async fn create_patient(&self, patient: &NewPatient) -> MonitorResult<Patient> {
        let request = self.client.post(self.url(&["patients"])?).json(patient);
        self.execute(Operation::CreatePatient, request, None).await
    }

    async fn list_patients(&self, page: u32, page_size: u32) -> MonitorResult<PatientPage> {
        let request = self
            .client
            .get(self.url(&["patients"])?)
            .query(&[("page", page), ("per_page", page_size)]);
        let wire: PaginatedPatients = self
            .execute(Operation::ListPatients, request, None)
            .await?;
        Ok(wire.into())
    }

    async fn get_patient(&self, id: &PatientId) -> MonitorResult<PatientRecord> {
        let request = self.client.get(self.url(&["patients", id.as_str()])?);
        self.execute(Operation::GetPatient, request, Some(id)).await
    }

    async fn create_reading(
        &self,
        id: &PatientId,
        reading: &ReadingInput,
    ) -> MonitorResult<RecordedReading> {
        let request = self
            .client
            .post(self.url(&["patients", id.as_str(), "metrics"])?)
            .json(reading);
        let response: CreateReadingResponse = self
            .execute(Operation::CreateReading, request, Some(id))
            .await?;

        Ok(match response {
            CreateReadingResponse::Reading(stored) => RecordedReading {
                reading: stored,
                warning: None,
            },
            CreateReadingResponse::Acknowledged {
                status,
                message,
                warning,
            } => {
                tracing::debug!(%status, %message, "reading acknowledged without body");
                RecordedReading {
                    reading: Reading {
                        patient_id: id.clone(),
                        blood_pressure: reading.blood_pressure.clone(),
                        heart_rate: reading.heart_rate,
                        temperature: reading.temperature,
                        oxygen_saturation: reading.oxygen_saturation,
                        recorded_at: chrono::Utc::now(),
                    },
                    warning,
                }
            }
        })
    }

    async fn create_prediction(&self, id: &PatientId) -> MonitorResult<Prediction> {
        let request = self
            .client
            .post(self.url(&["predictions"])?)
            .json(&PredictionRequest::for_patient(id));
        self.execute(Operation::CreatePrediction, request, Some(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store(base_url: &str) -> HttpPatientStore {
        let cfg = CoreConfig::new(base_url.to_string(), Duration::from_secs(1)).unwrap();
        HttpPatientStore::new(&cfg).unwrap()
    }

    #[test]
    fn test_routes_are_relative_to_base_url() {
        let s = store("http://localhost:8000/api/v1");
        assert_eq!(
            s.url(&["patients", "3"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/patients/3"
        );
        assert_eq!(
            s.url(&["patients", "3", "metrics"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/patients/3/metrics"
        );
    }

    #[test]
    fn test_patient_id_cannot_change_the_route() {
        let s = store("http://localhost:8000/api/v1");
        assert_eq!(
            s.url(&["patients", "3/metrics"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/patients/3%2Fmetrics"
        );
        assert_eq!(
            s.url(&["patients", "a b?"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/patients/a%20b%3F"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is not expected to be listening.
        let s = store("http://127.0.0.1:9/api/v1");
        let err = s.get_patient(&PatientId::new("1")).await.unwrap_err();
        assert!(matches!(err, MonitorError::Transport(_)), "{err:?}");
    }
}
