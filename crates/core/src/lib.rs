//! # Vitals Core
//!
//! The patient monitoring pipeline behind the vitals client:
//! - raw vital-sign and new-patient input validated into typed records ([`validation`])
//! - a patient's reading/prediction history assembled into a fresh view after every
//!   mutation ([`monitoring`], [`view`])
//! - the history projected into a dual-axis chart series ([`trend`])
//! - prediction risk levels mapped to display categories ([`risk`])
//! - page windows over the patient list ([`pagination`])
//! - per-screen state machines tying these together ([`screen`])
//!
//! **No transport concerns**: the backend is reached through the [`PatientStore`] port, which
//! `vitals-http` implements over REST.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod monitoring;
pub mod pagination;
pub mod risk;
pub mod screen;
pub mod store;
pub mod trend;
pub mod triage;
pub mod validation;
pub mod view;

pub use config::CoreConfig;
pub use error::{Disposition, MonitorError, MonitorResult, ValidationError};
pub use model::{
    NewPatient, Patient, PatientPage, PatientRecord, Prediction, Reading, ReadingInput,
    RecordedReading,
};
pub use monitoring::{MonitoringService, SubmittedReading};
pub use pagination::PageWindow;
pub use risk::{RiskBadge, RiskCategory};
pub use screen::{PatientDetailScreen, PatientListScreen, ScreenState};
pub use store::PatientStore;
pub use trend::{TrendProjection, TrendSeries};
pub use view::PatientMonitoringView;

pub use vitals_types::{BloodPressure, NonEmptyText, PatientId, TypeError};
