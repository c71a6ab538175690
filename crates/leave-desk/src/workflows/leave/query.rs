use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::LeaveStatus;
use super::store::LeaveSheetRow;

/// Admin-facing projection of one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestView {
    pub id: String,
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    pub leave_days: i64,
    pub reason: String,
    pub status: String,
    pub hod_approval: String,
    pub hr_approval: String,
    pub comments: String,
}

impl LeaveRequestView {
    /// `position` is the 1-based data row number, used when the id cell is blank.
    pub fn from_row(position: usize, row: &LeaveSheetRow) -> Self {
        let id = if row.request_id.trim().is_empty() {
            format!("req-{position}")
        } else {
            row.request_id.clone()
        };
        let status = if row.status.trim().is_empty() {
            LeaveStatus::Pending.label().to_string()
        } else {
            row.status.clone()
        };

        Self {
            id,
            timestamp: row.timestamp.clone(),
            name: row.employee_name.clone(),
            email: row.email.clone(),
            department: row.department.clone(),
            leave_type: row.leave_type.clone(),
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            leave_days: stored_leave_days(&row.leave_days),
            reason: row.reason.clone(),
            status,
            hod_approval: row.hod_approval.clone(),
            hr_approval: row.hr_approval.clone(),
            comments: row.comments.clone(),
        }
    }
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub this_month: usize,
    pub total_leave_days: i64,
}

/// Rows newest first.
pub fn project_requests(rows: &[LeaveSheetRow]) -> Vec<LeaveRequestView> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| LeaveRequestView::from_row(index + 1, row))
        .rev()
        .collect()
}

/// Counts rows by status and month, summing the stored day counts as written.
pub fn summarize(rows: &[LeaveSheetRow], today: NaiveDate) -> LeaveStats {
    rows.iter().fold(LeaveStats::default(), |mut stats, row| {
        stats.total += 1;
        match LeaveStatus::from_label(&row.status) {
            Some(LeaveStatus::Pending) => stats.pending += 1,
            Some(LeaveStatus::Approved) => stats.approved += 1,
            Some(LeaveStatus::Rejected) => stats.rejected += 1,
            None => {}
        }
        if submitted_on(&row.timestamp)
            .is_some_and(|date| date.year() == today.year() && date.month() == today.month())
        {
            stats.this_month += 1;
        }
        stats.total_leave_days = stats
            .total_leave_days
            .saturating_add(stored_leave_days(&row.leave_days));
        stats
    })
}

/// Integer value of a `Leave Days` cell; blank or non-numeric cells count as zero.
pub(crate) fn stored_leave_days(cell: &str) -> i64 {
    let cell = cell.trim();
    if let Ok(days) = cell.parse::<i64>() {
        return days;
    }
    match cell.parse::<f64>() {
        Ok(days) if days.is_finite() => days.trunc() as i64,
        _ => 0,
    }
}

/// Local calendar date of a `Timestamp` cell.
pub(crate) fn submitted_on(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(cell) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Some(timestamp.date());
    }
    NaiveDate::parse_from_str(cell, "%Y-%m-%d").ok()
}
