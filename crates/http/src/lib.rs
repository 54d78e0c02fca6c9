//! # Vitals HTTP
//!
//! REST transport for the vitals client.
//!
//! Implements [`vitals_core::PatientStore`] against the monitoring backend:
//! - `POST /patients`, `GET /patients?page=&per_page=`, `GET /patients/{id}`
//! - `POST /patients/{id}/metrics`, `POST /predictions`
//!
//! All status-code interpretation lives here; the core only ever sees
//! [`vitals_core::MonitorError`].

#![warn(rust_2018_idioms)]

mod client;
mod wire;

pub use client::HttpPatientStore;
