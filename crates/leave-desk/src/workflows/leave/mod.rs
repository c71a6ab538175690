//! Leave request intake, notification, and reporting.
//!
//! Submissions are validated, appended to the leave sheet, and then announced
//! through the calendar and mail gateways. Only the append can fail a
//! submission; calendar and mail problems are logged and reported on the
//! receipt.

pub mod calendar;
pub mod domain;
pub mod google_calendar;
pub mod intake;
pub mod notify;
pub mod query;
pub mod router;
pub mod service;
pub mod smtp;
pub mod store;

#[cfg(test)]
mod tests;

pub use calendar::{AllDayEvent, CalendarError, CalendarGateway};
pub use domain::{inclusive_leave_days, LeaveDraft, LeaveRequest, LeaveRequestId, LeaveStatus};
pub use google_calendar::GoogleCalendarClient;
pub use intake::{IntakeError, ValidationError, REQUIRED_FIELDS};
pub use notify::{
    DeliveryOutcome, MailError, Mailer, NotificationReport, OutgoingMail, RecipientRole,
};
pub use query::{LeaveRequestView, LeaveStats};
pub use router::leave_router;
pub use service::{LeaveRequestService, LeaveServiceError, SubmissionReceipt};
pub use smtp::SmtpMailer;
pub use store::{CsvLeaveStore, LeaveSheetRow, LeaveStore, StoreError, LEAVE_SHEET_HEADERS};
