use vitals_types::PatientId;

/// A client-detectable input violation.
///
/// The `Display` text of each rule is what the user is shown when a form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("blood pressure must be in format systolic/diastolic")]
    BloodPressureFormat,
    #[error("heart rate must be between 30 and 300")]
    HeartRateRange,
    #[error("temperature must be between 90 and 110")]
    TemperatureRange,
    #[error("oxygen saturation must be between 70 and 100")]
    OxygenSaturationRange,
    #[error("name is required")]
    NameRequired,
    #[error("age must be between 0 and 150")]
    AgeRange,
    #[error("medical record number is required")]
    MedicalRecordNumberRequired,
    /// The store rejected the input with its own message.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MonitorError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("duplicate record: {0}")]
    DuplicateRecord(String),
    #[error("patient {0} not found")]
    NotFound(PatientId),
    #[error("no readings available")]
    NoReadings,
    #[error("another action is still in progress")]
    Busy,
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// What the presentation layer should do with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keep the form open and show the rule text.
    Reprompt,
    /// The referenced patient is gone; leave the detail view.
    ExitView,
    /// Show a retryable message and keep whatever is already loaded.
    Retry,
}

impl MonitorError {
    pub fn disposition(&self) -> Disposition {
        match self {
            MonitorError::Validation(_)
            | MonitorError::DuplicateRecord(_)
            | MonitorError::NoReadings
            | MonitorError::InvalidConfig(_) => Disposition::Reprompt,
            MonitorError::NotFound(_) => Disposition::ExitView,
            MonitorError::Busy | MonitorError::Upstream(_) | MonitorError::Transport(_) => {
                Disposition::Retry
            }
        }
    }
}

pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
