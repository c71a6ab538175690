use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

const REQUEST_ID_PREFIX: &str = "LR-";
const REQUEST_ID_LEN: usize = 8;
const REQUEST_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Identifier wrapper for recorded leave requests, e.g. `LR-7Q2M0ZKD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveRequestId(pub String);

impl LeaveRequestId {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..REQUEST_ID_LEN)
            .map(|_| REQUEST_ID_ALPHABET[rng.gen_range(0..REQUEST_ID_ALPHABET.len())] as char)
            .collect();
        Self(format!("{REQUEST_ID_PREFIX}{suffix}"))
    }

    /// True when `raw` matches `LR-[A-Z0-9]{8}`.
    pub fn is_well_formed(raw: &str) -> bool {
        match raw.strip_prefix(REQUEST_ID_PREFIX) {
            Some(suffix) => {
                suffix.len() == REQUEST_ID_LEN
                    && suffix
                        .bytes()
                        .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaveRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approval state of a request. Only the approval actor moves it off `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    /// Exact, case-sensitive match against a stored status cell.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(LeaveStatus::Pending),
            "Approved" => Some(LeaveStatus::Approved),
            "Rejected" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }
}

/// Validated submission, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDraft {
    pub name: String,
    pub email: String,
    pub department: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveDraft {
    pub fn leave_days(&self) -> i64 {
        inclusive_leave_days(self.start_date, self.end_date)
    }
}

/// Inclusive day count for a leave period: `end - start + 1`.
///
/// Both the stored `Leave Days` cell and the notification bodies go through here.
pub fn inclusive_leave_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days() + 1
}

/// A recorded leave request as written by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub submitted_at: DateTime<Local>,
    pub name: String,
    pub email: String,
    pub department: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub hod_approval: String,
    pub hr_approval: String,
    pub comments: String,
}

impl LeaveRequest {
    /// Fresh `Pending` request with empty approval fields.
    pub fn pending(id: LeaveRequestId, submitted_at: DateTime<Local>, draft: &LeaveDraft) -> Self {
        Self {
            id,
            submitted_at,
            name: draft.name.clone(),
            email: draft.email.clone(),
            department: draft.department.clone(),
            leave_type: draft.leave_type.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            leave_days: draft.leave_days(),
            reason: draft.reason.clone(),
            status: LeaveStatus::Pending,
            hod_approval: String::new(),
            hr_approval: String::new(),
            comments: String::new(),
        }
    }
}
