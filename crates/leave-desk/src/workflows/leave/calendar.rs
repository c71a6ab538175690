use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::domain::LeaveRequest;

/// All-day calendar entry. `end_exclusive` is the day after the last day of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllDayEvent {
    pub title: String,
    pub start: NaiveDate,
    pub end_exclusive: NaiveDate,
    pub description: String,
    pub location: String,
}

impl AllDayEvent {
    /// Visible all-day event covering `[start_date, end_date]` of the request.
    pub fn for_request(request: &LeaveRequest, company_name: &str) -> Result<Self, CalendarError> {
        let end_exclusive = request
            .end_date
            .checked_add_days(Days::new(1))
            .ok_or(CalendarError::DateOutOfRange(request.end_date))?;

        Ok(Self {
            title: format!("{} - {}", request.leave_type, request.name),
            start: request.start_date,
            end_exclusive,
            description: format!(
                "Employee: {}\nEmail: {}\nDepartment: {}\nLeave Type: {}\nReason: {}",
                request.name, request.email, request.department, request.leave_type, request.reason
            ),
            location: company_name.to_string(),
        })
    }
}

/// Outbound calendar hook; returns the created event identifier.
pub trait CalendarGateway: Send + Sync {
    fn create_all_day_event(&self, event: &AllDayEvent) -> Result<String, CalendarError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("calendar '{0}' not found or not accessible")]
    CalendarNotFound(String),
    #[error("calendar operation failed: {0}")]
    Backend(String),
    #[error("calendar runtime unavailable: {0}")]
    Runtime(String),
    #[error("leave end date {0} has no following day")]
    DateOutOfRange(NaiveDate),
}
