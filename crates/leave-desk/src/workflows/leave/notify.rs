//! Intake notifications: department head, HR, and the requester.

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{inclusive_leave_days, LeaveRequest};
use crate::config::LeaveConfig;

/// Plain-text message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sender_name: String,
}

/// Outbound mail transport.
pub trait Mailer: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("unable to build message: {0}")]
    Message(String),
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    DepartmentHead,
    Hr,
    Requester,
}

impl RecipientRole {
    pub const fn label(self) -> &'static str {
        match self {
            RecipientRole::DepartmentHead => "department_head",
            RecipientRole::Hr => "hr",
            RecipientRole::Requester => "requester",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub role: RecipientRole,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-recipient results of one notification round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationReport {
    pub deliveries: Vec<DeliveryOutcome>,
}

impl NotificationReport {
    pub fn all_delivered(&self) -> bool {
        self.deliveries.iter().all(|delivery| delivery.error.is_none())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.deliveries
            .iter()
            .filter(|delivery| delivery.error.is_some())
    }
}

/// The three intake messages, approvers first.
pub fn compose_notifications(
    request: &LeaveRequest,
    config: &LeaveConfig,
) -> Vec<(RecipientRole, OutgoingMail)> {
    let approver_subject = format!(
        "New Leave Request - {} ({})",
        request.name, request.department
    );
    let approver_body = approver_body(request, &config.sender_name);

    let approver_mail = |to: &str| OutgoingMail {
        to: to.to_string(),
        subject: approver_subject.clone(),
        body: approver_body.clone(),
        sender_name: config.sender_name.clone(),
    };

    vec![
        (
            RecipientRole::DepartmentHead,
            approver_mail(&config.department_head_email),
        ),
        (RecipientRole::Hr, approver_mail(&config.hr_email)),
        (
            RecipientRole::Requester,
            OutgoingMail {
                to: request.email.clone(),
                subject: format!("Leave Request Submitted - {}", request.leave_type),
                body: confirmation_body(request, &config.sender_name),
                sender_name: config.sender_name.clone(),
            },
        ),
    ]
}

/// Sends every intake message; a failed send never stops the next one.
pub fn dispatch_notifications<M>(
    mailer: &M,
    request: &LeaveRequest,
    config: &LeaveConfig,
) -> NotificationReport
where
    M: Mailer + ?Sized,
{
    let deliveries = compose_notifications(request, config)
        .into_iter()
        .map(|(role, mail)| {
            let error = match mailer.send(&mail) {
                Ok(()) => {
                    info!(request_id = %request.id, role = role.label(), "leave notification sent");
                    None
                }
                Err(err) => {
                    warn!(
                        request_id = %request.id,
                        role = role.label(),
                        recipient = %mail.to,
                        error = %err,
                        "leave notification failed"
                    );
                    Some(err.to_string())
                }
            };
            DeliveryOutcome {
                role,
                recipient: mail.to,
                error,
            }
        })
        .collect();

    NotificationReport { deliveries }
}

fn leave_details(request: &LeaveRequest) -> String {
    let days = inclusive_leave_days(request.start_date, request.end_date);
    format!(
        "Leave Details:\n\
         - Type: {}\n\
         - Start Date: {}\n\
         - End Date: {}\n\
         - Duration: {} day(s)\n\
         - Reason: {}\n",
        request.leave_type,
        request.start_date.format("%Y-%m-%d"),
        request.end_date.format("%Y-%m-%d"),
        days,
        request.reason
    )
}

fn approver_body(request: &LeaveRequest, sender_name: &str) -> String {
    format!(
        "Hello,\n\n\
         A new leave request has been submitted and requires your review.\n\n\
         Request ID: {}\n\n\
         Employee Details:\n\
         - Name: {}\n\
         - Email: {}\n\
         - Department: {}\n\n\
         {}\n\
         Please review this request in the leave register.\n\n\
         Best regards,\n\
         {}\n",
        request.id,
        request.name,
        request.email,
        request.department,
        leave_details(request),
        sender_name
    )
}

fn confirmation_body(request: &LeaveRequest, sender_name: &str) -> String {
    format!(
        "Dear {},\n\n\
         Your leave request has been submitted successfully.\n\n\
         Request ID: {}\n\n\
         {}\n\
         Your request is now pending approval from your department head and HR. \
         You will be notified once a decision has been made.\n\n\
         Best regards,\n\
         {}\n",
        request.name,
        request.id,
        leave_details(request),
        sender_name
    )
}
