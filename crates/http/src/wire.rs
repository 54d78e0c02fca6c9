//! Wire shapes of the backend REST contract and the status-code mapping into the monitor
//! error taxonomy.

use serde::{Deserialize, Serialize};
use vitals_core::{MonitorError, Patient, PatientId, PatientPage, Reading, ValidationError};

/// Which store operation a response belongs to; status codes mean different things per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    CreatePatient,
    ListPatients,
    GetPatient,
    CreateReading,
    CreatePrediction,
}

impl Operation {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Operation::CreatePatient => "create-patient",
            Operation::ListPatients => "list-patients",
            Operation::GetPatient => "get-patient",
            Operation::CreateReading => "create-reading",
            Operation::CreatePrediction => "create-prediction",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaginatedPatients {
    pub patients: Vec<Patient>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl From<PaginatedPatients> for PatientPage {
    fn from(wire: PaginatedPatients) -> Self {
        PatientPage {
            items: wire.patients,
            page: wire.page,
            page_size: wire.per_page,
            total: wire.total,
            total_pages: wire.total_pages,
        }
    }
}

/// Body of a successful create-reading call.
///
/// The contract returns the stored reading; the current backend only acknowledges with
/// `{"status", "message", "data": {"reading_id"}, "warning"}`. `warning` carries the data
/// auditor's note when the values look implausible.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreateReadingResponse {
    Reading(Reading),
    Acknowledged {
        status: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        warning: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictionRequest {
    pub patient_id: serde_json::Value,
}

impl PredictionRequest {
    /// The backend keys patients by integer; send the id as a number when it is one.
    pub(crate) fn for_patient(id: &PatientId) -> Self {
        let patient_id = match id.as_str().parse::<u64>() {
            Ok(n) => serde_json::Value::from(n),
            Err(_) => serde_json::Value::from(id.as_str()),
        };
        Self { patient_id }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// The backend sends `{"detail": "..."}` for its own errors and
/// `{"detail": [{"msg": "..."}, ...]}` for schema validation failures.
pub(crate) fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.trim().to_string();
    };

    match parsed.detail {
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Maps a non-success status into the error taxonomy.
pub(crate) fn map_failure(
    op: Operation,
    status: u16,
    body: &str,
    patient: Option<&PatientId>,
) -> MonitorError {
    let detail = error_detail(body);

    if let (404, Some(id)) = (status, patient) {
        return MonitorError::NotFound(id.clone());
    }

    match (op, status) {
        (Operation::CreatePatient, 400) if detail.contains("already exists") => {
            MonitorError::DuplicateRecord(detail)
        }
        (Operation::CreatePatient | Operation::CreateReading, 400 | 422) => {
            MonitorError::Validation(ValidationError::Rejected(detail))
        }
        (Operation::CreatePrediction, _) => {
            MonitorError::Upstream(format!("prediction failed ({status}): {detail}"))
        }
        _ => MonitorError::Upstream(format!("{} returned {status}: {detail}", op.as_str())),
    }
}
