use chrono::NaiveDate;
use leave_desk::config::{AppConfig, SmtpConfig};
use leave_desk::error::AppError;
use leave_desk::workflows::leave::{
    AllDayEvent, CalendarError, CalendarGateway, CsvLeaveStore, LeaveRequestService, MailError,
    Mailer, OutgoingMail, SmtpMailer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LeaveService = LeaveRequestService<CsvLeaveStore, LoggingCalendar, ConfiguredMailer>;

/// Stand-in calendar for deployments without a Calendar API hub: records the
/// event in the service log and hands back a local identifier.
#[derive(Debug, Default)]
pub(crate) struct LoggingCalendar {
    created: AtomicU64,
}

impl CalendarGateway for LoggingCalendar {
    fn create_all_day_event(&self, event: &AllDayEvent) -> Result<String, CalendarError> {
        let sequence = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            title = %event.title,
            start = %event.start,
            end_exclusive = %event.end_exclusive,
            location = %event.location,
            "leave calendar event logged"
        );
        Ok(format!("logged-{sequence:06}"))
    }
}

#[derive(Debug)]
pub(crate) enum ConfiguredMailer {
    Smtp(SmtpMailer),
    Logging,
}

impl ConfiguredMailer {
    pub(crate) fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self, MailError> {
        match smtp {
            Some(config) => Ok(Self::Smtp(SmtpMailer::from_config(config)?)),
            None => Ok(Self::Logging),
        }
    }
}

impl Mailer for ConfiguredMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        match self {
            ConfiguredMailer::Smtp(mailer) => mailer.send(mail),
            ConfiguredMailer::Logging => {
                info!(to = %mail.to, subject = %mail.subject, "smtp not configured; notification logged");
                Ok(())
            }
        }
    }
}

/// Wires the CSV store, calendar, and mailer described by `config`.
pub(crate) fn build_leave_service(
    config: &AppConfig,
    store_override: Option<PathBuf>,
) -> Result<LeaveService, AppError> {
    let store_path = store_override.unwrap_or_else(|| config.store.csv_path.clone());
    let store = CsvLeaveStore::open(&store_path)?;
    let mailer = ConfiguredMailer::from_config(config.smtp.as_ref())?;

    info!(
        store = %store_path.display(),
        smtp = matches!(mailer, ConfiguredMailer::Smtp(_)),
        "leave service configured"
    );

    Ok(LeaveRequestService::new(
        Arc::new(store),
        Arc::new(LoggingCalendar::default()),
        Arc::new(mailer),
        config.leave.clone(),
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_calendar_hands_out_sequential_ids() {
        let calendar = LoggingCalendar::default();
        let event = AllDayEvent {
            title: "Annual Leave - Test User".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid"),
            end_exclusive: NaiveDate::from_ymd_opt(2024, 2, 4).expect("valid"),
            description: String::new(),
            location: "Company".to_string(),
        };

        assert_eq!(
            calendar.create_all_day_event(&event).expect("logged"),
            "logged-000001"
        );
        assert_eq!(
            calendar.create_all_day_event(&event).expect("logged"),
            "logged-000002"
        );
    }

    #[test]
    fn mailer_falls_back_to_logging_without_smtp() {
        let mailer = ConfiguredMailer::from_config(None).expect("mailer builds");
        assert!(matches!(mailer, ConfiguredMailer::Logging));
        let mail = OutgoingMail {
            to: "hr@company.com".to_string(),
            subject: "New Leave Request - Test User (IT)".to_string(),
            body: String::new(),
            sender_name: "Leave Management System".to_string(),
        };
        assert!(mailer.send(&mail).is_ok());
    }

    #[test]
    fn parse_date_reports_input() {
        assert!(parse_date("2024-02-01").is_ok());
        let err = parse_date("02/01/2024").expect_err("rejected");
        assert!(err.contains("02/01/2024"));
    }
}
