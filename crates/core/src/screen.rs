//! Per-screen state machines for the presentation layer.
//!
//! A screen moves `Idle -> Loading -> Ready | Failed` and only a completed store operation
//! moves it out of `Loading`. While `Loading`, any further action is refused with
//! [`MonitorError::Busy`], so at most one composite action runs per screen. A failure keeps the
//! last loaded value so the screen can keep showing it next to a retryable message.
//!
//! An action's future may be dropped before it completes (the caller gave up waiting); the
//! screen then returns to the value it showed before the action began.

use crate::constants::PAGE_SIZE;
use crate::model::{Patient, PatientPage};
use crate::monitoring::MonitoringService;
use crate::pagination::PageWindow;
use crate::risk::RiskBadge;
use crate::store::PatientStore;
use crate::trend::{self, TrendProjection};
use crate::validation::{validate_new_patient, validate_vitals};
use crate::view::PatientMonitoringView;
use crate::{MonitorError, MonitorResult};
use chrono::TimeZone;
use std::fmt::Display;
use vitals_types::PatientId;

#[derive(Debug, Clone)]
pub enum ScreenState<T> {
    Idle,
    Loading {
        previous: Option<T>,
    },
    Ready(T),
    Failed {
        error: MonitorError,
        previous: Option<T>,
    },
}

impl<T> Default for ScreenState<T> {
    fn default() -> Self {
        ScreenState::Idle
    }
}

impl<T> ScreenState<T> {
    pub fn is_busy(&self) -> bool {
        matches!(self, ScreenState::Loading { .. })
    }

    /// The value to display: the ready value, or the last one loaded before a reload/failure.
    pub fn current(&self) -> Option<&T> {
        match self {
            ScreenState::Idle => None,
            ScreenState::Ready(value) => Some(value),
            ScreenState::Loading { previous } | ScreenState::Failed { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    pub fn error(&self) -> Option<&MonitorError> {
        match self {
            ScreenState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    fn take_current(&mut self) -> Option<T> {
        match std::mem::take(self) {
            ScreenState::Idle => None,
            ScreenState::Ready(value) => Some(value),
            ScreenState::Loading { previous } | ScreenState::Failed { previous, .. } => previous,
        }
    }

    /// Enters `Loading`, or refuses with `Busy` if an action is already pending.
    pub fn begin(&mut self) -> MonitorResult<()> {
        if self.is_busy() {
            tracing::warn!("action refused: screen is busy");
            return Err(MonitorError::Busy);
        }
        let previous = self.take_current();
        *self = ScreenState::Loading { previous };
        Ok(())
    }

    /// Leaves `Loading` with the outcome of the store operation.
    ///
    /// On success the new value replaces the old one wholesale.
    pub fn finish(&mut self, result: MonitorResult<T>) -> MonitorResult<&T> {
        match result {
            Ok(value) => {
                *self = ScreenState::Ready(value);
            }
            Err(error) => {
                let previous = self.take_current();
                *self = ScreenState::Failed {
                    error: error.clone(),
                    previous,
                };
                return Err(error);
            }
        }
        match &*self {
            ScreenState::Ready(value) => Ok(value),
            _ => unreachable!("state was just set to Ready"),
        }
    }

    /// Leaves `Loading` as if the action never started, returning `error` for the caller to
    /// show next to the form that triggered it.
    pub fn abort(&mut self, error: MonitorError) -> MonitorError {
        self.restore();
        error
    }

    fn restore(&mut self) {
        *self = match self.take_current() {
            Some(value) => ScreenState::Ready(value),
            None => ScreenState::Idle,
        };
    }
}

/// Holds a screen in `Loading` across an await. Dropped without [`InFlight::settle`], which
/// only happens when the action's future is cancelled, it restores the previous value.
struct InFlight<'a, T>(&'a mut ScreenState<T>);

impl<'a, T> InFlight<'a, T> {
    fn begin(state: &'a mut ScreenState<T>) -> MonitorResult<Self> {
        state.begin()?;
        Ok(Self(state))
    }

    fn current(&self) -> Option<&T> {
        self.0.current()
    }

    /// The action completed; the caller finishes or aborts the state itself.
    fn settle(self) {
        std::mem::forget(self);
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.0.is_busy() {
            tracing::debug!("action dropped before completion; restoring screen");
            self.0.restore();
        }
    }
}

/// Detail screen for one patient: the view, logging vitals and requesting predictions.
pub struct PatientDetailScreen<S> {
    service: MonitoringService<S>,
    patient_id: PatientId,
    state: ScreenState<PatientMonitoringView>,
    reading_warning: Option<String>,
}

impl<S: PatientStore> PatientDetailScreen<S> {
    pub fn new(service: MonitoringService<S>, patient_id: PatientId) -> Self {
        Self {
            service,
            patient_id,
            state: ScreenState::Idle,
            reading_warning: None,
        }
    }

    pub fn state(&self) -> &ScreenState<PatientMonitoringView> {
        &self.state
    }

    pub fn view(&self) -> Option<&PatientMonitoringView> {
        self.state.current()
    }

    /// The data auditor's flag on the most recently logged reading, shown next to the view.
    pub fn reading_warning(&self) -> Option<&str> {
        self.reading_warning.as_deref()
    }

    /// Loads (or reloads) the view. `NotFound` means the caller should leave this screen.
    pub async fn open(&mut self) -> MonitorResult<&PatientMonitoringView> {
        let pending = InFlight::begin(&mut self.state)?;
        self.reading_warning = None;
        let result = self.service.load_view(&self.patient_id).await;
        pending.settle();
        self.state.finish(result)
    }

    /// Validates the raw form and, only if it passes, submits it and reloads.
    ///
    /// A validation failure leaves the screen state untouched.
    pub async fn log_vitals(
        &mut self,
        blood_pressure: &str,
        heart_rate: &str,
        temperature: &str,
        oxygen_saturation: &str,
    ) -> MonitorResult<&PatientMonitoringView> {
        let reading = validate_vitals(blood_pressure, heart_rate, temperature, oxygen_saturation)?;
        let pending = InFlight::begin(&mut self.state)?;
        self.reading_warning = None;
        let result = match self.service.submit_reading(&self.patient_id, &reading).await {
            Ok(submitted) => {
                self.reading_warning = submitted.warning;
                Ok(submitted.view)
            }
            Err(err) => Err(err),
        };
        pending.settle();
        self.state.finish(result)
    }

    /// Requests a prediction from the current view and reloads.
    ///
    /// Refused with `NoReadings`, before any state change or store call, when the loaded view
    /// has no readings (or nothing is loaded yet).
    pub async fn request_prediction(&mut self) -> MonitorResult<&PatientMonitoringView> {
        if self.state.is_busy() {
            return Err(MonitorError::Busy);
        }
        if !self.view().is_some_and(PatientMonitoringView::has_readings) {
            tracing::warn!(patient_id = %self.patient_id, "prediction refused: no readings");
            return Err(MonitorError::NoReadings);
        }

        let pending = InFlight::begin(&mut self.state)?;
        let result = match pending.current() {
            Some(view) => self.service.request_prediction(view).await,
            None => Err(MonitorError::NoReadings),
        };
        pending.settle();
        self.state.finish(result)
    }

    pub fn trend<Tz>(&self, tz: &Tz) -> TrendProjection
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self.view() {
            Some(view) => trend::project(view.readings(), tz),
            None => TrendProjection::NoData,
        }
    }

    pub fn risk_badge(&self) -> Option<RiskBadge> {
        self.view()
            .and_then(PatientMonitoringView::latest_prediction)
            .map(RiskBadge::for_prediction)
    }
}

/// Paged patient list with add-patient.
pub struct PatientListScreen<S> {
    service: MonitoringService<S>,
    state: ScreenState<PatientPage>,
}

impl<S: PatientStore> PatientListScreen<S> {
    pub fn new(service: MonitoringService<S>) -> Self {
        Self {
            service,
            state: ScreenState::Idle,
        }
    }

    pub fn state(&self) -> &ScreenState<PatientPage> {
        &self.state
    }

    pub fn page(&self) -> Option<&PatientPage> {
        self.state.current()
    }

    pub fn window(&self) -> Option<PageWindow> {
        self.page().map(|p| PageWindow::new(p.total, p.page))
    }

    /// "Showing N of T patients".
    pub fn summary(&self) -> Option<String> {
        self.page()
            .map(|p| format!("Showing {} of {} patients", p.items.len(), p.total))
    }

    pub async fn load(&mut self, page: u32) -> MonitorResult<&PatientPage> {
        let pending = InFlight::begin(&mut self.state)?;
        let result = self.service.list_patients(page, PAGE_SIZE).await;
        pending.settle();
        self.state.finish(result)
    }

    /// Moves to the next page, or returns `None` without any store call if already on the last.
    pub async fn next(&mut self) -> MonitorResult<Option<&PatientPage>> {
        match self.window().and_then(|w| w.next()) {
            Some(page) => self.load(page).await.map(Some),
            None => Ok(None),
        }
    }

    /// Moves to the previous page, or returns `None` if already on the first.
    pub async fn previous(&mut self) -> MonitorResult<Option<&PatientPage>> {
        match self.window().and_then(|w| w.previous()) {
            Some(page) => self.load(page).await.map(Some),
            None => Ok(None),
        }
    }

    /// Validates and creates a patient, then reloads the current page.
    ///
    /// If the store rejects the patient (e.g. `DuplicateRecord`), the list is left as it was.
    pub async fn add_patient(
        &mut self,
        name: &str,
        age: &str,
        medical_record_number: &str,
    ) -> MonitorResult<Patient> {
        let new_patient = validate_new_patient(name, age, medical_record_number)?;
        let pending = InFlight::begin(&mut self.state)?;

        let created = match self.service.create_patient(&new_patient).await {
            Ok(created) => created,
            Err(err) => {
                pending.settle();
                return Err(self.state.abort(err));
            }
        };

        let page = pending.current().map_or(1, |p| p.page);
        let result = self.service.list_patients(page, PAGE_SIZE).await;
        pending.settle();
        self.state.finish(result)?;
        Ok(created)
    }
}
