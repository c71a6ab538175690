use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Local;
use serde_json::{json, Map, Value};

use crate::config::LeaveConfig;
use crate::workflows::leave::calendar::{AllDayEvent, CalendarError, CalendarGateway};
use crate::workflows::leave::domain::{LeaveDraft, LeaveRequest, LeaveRequestId};
use crate::workflows::leave::notify::{MailError, Mailer, OutgoingMail};
use crate::workflows::leave::store::{LeaveSheetRow, LeaveStore, StoreError};
use crate::workflows::leave::LeaveRequestService;

pub(super) type TestService = LeaveRequestService<MemoryStore, RecordingCalendar, RecordingMailer>;

pub(super) fn leave_config() -> LeaveConfig {
    LeaveConfig {
        company_name: "Acme Corp".to_string(),
        department_head_email: "hod@acme.test".to_string(),
        hr_email: "hr@acme.test".to_string(),
        sender_name: "Acme Leave Desk".to_string(),
        calendar_id: "leave-calendar@acme.test".to_string(),
    }
}

pub(super) fn payload_value() -> Value {
    json!({
        "name": "Test User",
        "email": "test@company.com",
        "department": "IT",
        "leaveType": "Annual Leave",
        "startDate": "2024-02-01",
        "endDate": "2024-02-03",
        "reason": "Testing the system"
    })
}

pub(super) fn payload() -> Map<String, Value> {
    match payload_value() {
        Value::Object(map) => map,
        _ => unreachable!("payload fixture is an object"),
    }
}

pub(super) fn payload_text() -> String {
    payload_value().to_string()
}

pub(super) fn sheet_row(id: &str, timestamp: &str, status: &str, leave_days: &str) -> LeaveSheetRow {
    LeaveSheetRow {
        request_id: id.to_string(),
        timestamp: timestamp.to_string(),
        employee_name: format!("Employee {id}"),
        email: "employee@acme.test".to_string(),
        department: "Operations".to_string(),
        leave_type: "Annual Leave".to_string(),
        start_date: "2024-02-01".to_string(),
        end_date: "2024-02-03".to_string(),
        leave_days: leave_days.to_string(),
        reason: "Rest".to_string(),
        status: status.to_string(),
        ..LeaveSheetRow::default()
    }
}

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryStore>,
    Arc<RecordingCalendar>,
    Arc<RecordingMailer>,
) {
    let store = Arc::new(MemoryStore::default());
    let calendar = Arc::new(RecordingCalendar::default());
    let mailer = Arc::new(RecordingMailer::default());
    let service = LeaveRequestService::new(
        store.clone(),
        calendar.clone(),
        mailer.clone(),
        leave_config(),
    );
    (service, store, calendar, mailer)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    rows: Mutex<Vec<LeaveSheetRow>>,
    appends: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn with_rows(rows: Vec<LeaveSheetRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            appends: AtomicUsize::new(0),
        }
    }

    pub(super) fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub(super) fn rows(&self) -> Vec<LeaveSheetRow> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }
}

impl LeaveStore for MemoryStore {
    fn append(&self, draft: &LeaveDraft) -> Result<LeaveRequest, StoreError> {
        let request = LeaveRequest::pending(LeaveRequestId::generate(), Local::now(), draft);
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .push(LeaveSheetRow::from_request(&request));
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(request)
    }

    fn read_all(&self) -> Result<Vec<LeaveSheetRow>, StoreError> {
        Ok(self.rows())
    }
}

pub(super) struct UnavailableStore;

impl LeaveStore for UnavailableStore {
    fn append(&self, _draft: &LeaveDraft) -> Result<LeaveRequest, StoreError> {
        Err(StoreError::Unavailable("sheet offline".to_string()))
    }

    fn read_all(&self) -> Result<Vec<LeaveSheetRow>, StoreError> {
        Err(StoreError::Unavailable("sheet offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingCalendar {
    events: Mutex<Vec<AllDayEvent>>,
}

impl RecordingCalendar {
    pub(super) fn events(&self) -> Vec<AllDayEvent> {
        self.events.lock().expect("calendar mutex poisoned").clone()
    }
}

impl CalendarGateway for RecordingCalendar {
    fn create_all_day_event(&self, event: &AllDayEvent) -> Result<String, CalendarError> {
        let mut guard = self.events.lock().expect("calendar mutex poisoned");
        guard.push(event.clone());
        Ok(format!("evt-{}", guard.len()))
    }
}

#[derive(Default)]
pub(super) struct FailingCalendar {
    attempts: AtomicUsize,
}

impl FailingCalendar {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl CalendarGateway for FailingCalendar {
    fn create_all_day_event(&self, _event: &AllDayEvent) -> Result<String, CalendarError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CalendarError::CalendarNotFound(
            "leave-calendar@acme.test".to_string(),
        ))
    }
}

/// Records every attempted send; recipients in `failing` get a transport error.
#[derive(Default)]
pub(super) struct RecordingMailer {
    attempts: Mutex<Vec<OutgoingMail>>,
    failing: HashSet<String>,
}

impl RecordingMailer {
    pub(super) fn failing_for(recipients: &[&str]) -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            failing: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub(super) fn attempts(&self) -> Vec<OutgoingMail> {
        self.attempts.lock().expect("mailer mutex poisoned").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.attempts
            .lock()
            .expect("mailer mutex poisoned")
            .push(mail.clone());
        if self.failing.contains(&mail.to) {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
