use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use serde::Serialize;

use super::domain::{LeaveDraft, LeaveRequest, LeaveRequestId};

/// Column layout of the leave sheet. Approvers edit the last four columns by hand.
pub const LEAVE_SHEET_HEADERS: [&str; 14] = [
    "Request ID",
    "Timestamp",
    "Employee Name",
    "Email",
    "Department",
    "Leave Type",
    "Start Date",
    "End Date",
    "Leave Days",
    "Reason",
    "Status",
    "HOD Approval",
    "HR Approval",
    "Comments",
];

/// Append-only persistence for leave requests.
///
/// `append` owns identifier and timestamp assignment; `read_all` returns rows
/// in insertion order exactly as stored, including edits made outside this crate.
pub trait LeaveStore: Send + Sync {
    fn append(&self, draft: &LeaveDraft) -> Result<LeaveRequest, StoreError>;
    fn read_all(&self) -> Result<Vec<LeaveSheetRow>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("leave sheet i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leave sheet is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("leave store unavailable: {0}")]
    Unavailable(String),
}

/// One raw sheet row. Cells stay text because approvers may write anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaveSheetRow {
    pub request_id: String,
    pub timestamp: String,
    pub employee_name: String,
    pub email: String,
    pub department: String,
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    pub leave_days: String,
    pub reason: String,
    pub status: String,
    pub hod_approval: String,
    pub hr_approval: String,
    pub comments: String,
}

impl LeaveSheetRow {
    pub fn from_request(request: &LeaveRequest) -> Self {
        Self {
            request_id: request.id.to_string(),
            timestamp: request.submitted_at.to_rfc3339(),
            employee_name: request.name.clone(),
            email: request.email.clone(),
            department: request.department.clone(),
            leave_type: request.leave_type.clone(),
            start_date: request.start_date.format("%Y-%m-%d").to_string(),
            end_date: request.end_date.format("%Y-%m-%d").to_string(),
            leave_days: request.leave_days.to_string(),
            reason: request.reason.clone(),
            status: request.status.label().to_string(),
            hod_approval: request.hod_approval.clone(),
            hr_approval: request.hr_approval.clone(),
            comments: request.comments.clone(),
        }
    }

    /// Builds a row from positional cells; short rows are padded with blanks.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cells = cells.into_iter().map(|cell| cell.as_ref().to_string());
        let mut next = move || cells.next().unwrap_or_default();
        Self {
            request_id: next(),
            timestamp: next(),
            employee_name: next(),
            email: next(),
            department: next(),
            leave_type: next(),
            start_date: next(),
            end_date: next(),
            leave_days: next(),
            reason: next(),
            status: next(),
            hod_approval: next(),
            hr_approval: next(),
            comments: next(),
        }
    }

    pub fn cells(&self) -> [&str; 14] {
        [
            &self.request_id,
            &self.timestamp,
            &self.employee_name,
            &self.email,
            &self.department,
            &self.leave_type,
            &self.start_date,
            &self.end_date,
            &self.leave_days,
            &self.reason,
            &self.status,
            &self.hod_approval,
            &self.hr_approval,
            &self.comments,
        ]
    }
}

/// CSV-file backed leave sheet.
#[derive(Debug)]
pub struct CsvLeaveStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvLeaveStore {
    /// Opens the sheet at `path`, creating the file and header row when absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        store.ensure_sheet()?;
        Ok(store)
    }

    fn ensure_sheet(&self) -> Result<(), StoreError> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if file.metadata()?.len() == 0 {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(LEAVE_SHEET_HEADERS)?;
            writer.flush()?;
        }
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Unavailable("leave sheet lock poisoned".to_string()))
    }
}

impl LeaveStore for CsvLeaveStore {
    fn append(&self, draft: &LeaveDraft) -> Result<LeaveRequest, StoreError> {
        let _guard = self.guard()?;
        self.ensure_sheet()?;

        let request = LeaveRequest::pending(LeaveRequestId::generate(), Local::now(), draft);
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(LeaveSheetRow::from_request(&request).cells())?;
        writer.flush()?;

        Ok(request)
    }

    fn read_all(&self) -> Result<Vec<LeaveSheetRow>, StoreError> {
        let _guard = self.guard()?;
        self.ensure_sheet()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(LeaveSheetRow::from_cells(record.iter()));
        }
        Ok(rows)
    }
}
