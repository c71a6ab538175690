use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::calendar::{AllDayEvent, CalendarError, CalendarGateway};
use super::domain::{LeaveDraft, LeaveRequest, LeaveRequestId};
use super::intake::{parse_submission, validate_submission, IntakeError};
use super::notify::{dispatch_notifications, Mailer, NotificationReport};
use super::query::{project_requests, summarize, LeaveRequestView, LeaveStats};
use super::store::{LeaveStore, StoreError};
use crate::config::LeaveConfig;

/// Service composing the record store, calendar, and mailer around leave intake.
pub struct LeaveRequestService<S, C, M> {
    store: Arc<S>,
    calendar: Arc<C>,
    mailer: Arc<M>,
    config: Arc<LeaveConfig>,
}

/// What happened during a successful submission. Side-effect failures are kept
/// here for inspection only; they never turn a recorded request into an error.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub request: LeaveRequest,
    pub calendar_event: Result<String, CalendarError>,
    pub notifications: NotificationReport,
}

impl SubmissionReceipt {
    pub fn request_id(&self) -> &LeaveRequestId {
        &self.request.id
    }

    pub fn calendar_event_id(&self) -> Option<&str> {
        self.calendar_event.as_deref().ok()
    }
}

impl<S, C, M> LeaveRequestService<S, C, M>
where
    S: LeaveStore + 'static,
    C: CalendarGateway + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, calendar: Arc<C>, mailer: Arc<M>, config: LeaveConfig) -> Self {
        Self {
            store,
            calendar,
            mailer,
            config: Arc::new(config),
        }
    }

    /// Submit serialized request text, as received from the intake form.
    pub fn submit_raw(&self, raw: &str) -> Result<SubmissionReceipt, LeaveServiceError> {
        let draft = parse_submission(raw)?;
        self.record(draft)
    }

    /// Submit an already-decoded payload.
    pub fn submit(
        &self,
        payload: &Map<String, Value>,
    ) -> Result<SubmissionReceipt, LeaveServiceError> {
        let draft = validate_submission(payload)?;
        self.record(draft)
    }

    fn record(&self, draft: LeaveDraft) -> Result<SubmissionReceipt, LeaveServiceError> {
        let request = self.store.append(&draft).map_err(|err| {
            error!(error = %err, "failed to record leave request");
            LeaveServiceError::StoreUnavailable(err)
        })?;
        info!(
            request_id = %request.id,
            leave_days = request.leave_days,
            "leave request recorded"
        );

        let calendar_event = self.create_calendar_event(&request);
        let notifications = dispatch_notifications(self.mailer.as_ref(), &request, &self.config);
        if !notifications.all_delivered() {
            warn!(
                request_id = %request.id,
                failed = notifications.failures().count(),
                "leave notifications incomplete"
            );
        }

        Ok(SubmissionReceipt {
            request,
            calendar_event,
            notifications,
        })
    }

    fn create_calendar_event(&self, request: &LeaveRequest) -> Result<String, CalendarError> {
        let outcome = AllDayEvent::for_request(request, &self.config.company_name)
            .and_then(|event| self.calendar.create_all_day_event(&event));

        match &outcome {
            Ok(event_id) => info!(request_id = %request.id, %event_id, "leave calendar event created"),
            Err(err) => warn!(
                request_id = %request.id,
                calendar_id = %self.config.calendar_id,
                error = %err,
                "leave calendar event failed"
            ),
        }
        outcome
    }

    /// Every recorded request, newest first.
    pub fn list_requests(&self) -> Result<Vec<LeaveRequestView>, LeaveServiceError> {
        let rows = self.store.read_all()?;
        Ok(project_requests(&rows))
    }

    /// Dashboard counters; `today` decides which month counts as current.
    pub fn compute_stats(&self, today: NaiveDate) -> Result<LeaveStats, LeaveServiceError> {
        let rows = self.store.read_all()?;
        Ok(summarize(&rows, today))
    }
}

/// Error raised by the leave request service.
#[derive(Debug, thiserror::Error)]
pub enum LeaveServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("leave store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
