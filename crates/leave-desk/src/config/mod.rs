use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub leave: LeaveConfig,
    pub store: StoreConfig,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { key: "APP_PORT" })?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let leave = LeaveConfig {
            company_name: var_or("LEAVE_COMPANY_NAME", "Company"),
            department_head_email: var_or("LEAVE_HOD_EMAIL", "hod@company.com"),
            hr_email: var_or("LEAVE_HR_EMAIL", "hr@company.com"),
            sender_name: var_or("LEAVE_SENDER_NAME", "Leave Management System"),
            calendar_id: var_or("LEAVE_CALENDAR_ID", "primary"),
        };

        let store = StoreConfig {
            csv_path: PathBuf::from(var_or("LEAVE_STORE_PATH", "data/leave_requests.csv")),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            leave,
            store,
            smtp: SmtpConfig::from_env()?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Organization-level settings shared by the intake pipeline and its notifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveConfig {
    pub company_name: String,
    pub department_head_email: String,
    pub hr_email: String,
    pub sender_name: String,
    pub calendar_id: String,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            company_name: "Company".to_string(),
            department_head_email: "hod@company.com".to_string(),
            hr_email: "hr@company.com".to_string(),
            sender_name: "Leave Management System".to_string(),
            calendar_id: "primary".to_string(),
        }
    }
}

/// Location of the CSV record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub csv_path: PathBuf,
}

/// Outbound SMTP relay. Absent when `SMTP_HOST` is unset.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub starttls: bool,
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(host) = optional_var("SMTP_HOST") else {
            return Ok(None);
        };

        let port = var_or("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { key: "SMTP_PORT" })?;
        let from_address =
            optional_var("SMTP_FROM").ok_or(ConfigError::MissingSetting { key: "SMTP_FROM" })?;
        let starttls = !matches!(
            var_or("SMTP_STARTTLS", "true").trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        );

        Ok(Some(Self {
            host,
            port,
            username: optional_var("SMTP_USERNAME"),
            password: optional_var("SMTP_PASSWORD"),
            from_address,
            starttls,
        }))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { key: &'static str },
    InvalidHost { source: std::net::AddrParseError },
    MissingSetting { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { key } => write!(f, "{key} must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingSetting { key } => {
                write!(f, "{key} is required when SMTP_HOST is set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort { .. } | ConfigError::MissingSetting { .. } => None,
        }
    }
}
