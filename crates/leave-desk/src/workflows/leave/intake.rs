//! Turns an untyped submission payload into a [`LeaveDraft`].
//!
//! Checks run in a fixed order and stop at the first failure, so callers always
//! learn about the earliest problem in the payload.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::domain::LeaveDraft;

/// Required fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "name",
    "email",
    "department",
    "leaveType",
    "startDate",
    "endDate",
    "reason",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} must be a date in YYYY-MM-DD format")]
    InvalidDate { field: &'static str },
    #[error("end date must not precede start date")]
    EndBeforeStart,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Parses serialized request text and validates it.
pub fn parse_submission(raw: &str) -> Result<LeaveDraft, IntakeError> {
    if raw.trim().is_empty() {
        return Err(IntakeError::Malformed("no request data received".to_string()));
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|err| IntakeError::Malformed(format!("invalid JSON payload ({err})")))?;

    match value {
        Value::Object(payload) => validate_submission(&payload),
        other => Err(IntakeError::Malformed(format!(
            "expected a JSON object, received {}",
            value_kind(&other)
        ))),
    }
}

/// Validates an already-decoded payload.
pub fn validate_submission(payload: &Map<String, Value>) -> Result<LeaveDraft, IntakeError> {
    if payload.is_empty() {
        return Err(IntakeError::Malformed("no request data received".to_string()));
    }

    let required = |field: &'static str| {
        text_field(payload, field).ok_or(ValidationError::MissingField(field))
    };

    // Same order as REQUIRED_FIELDS.
    let name = required("name")?;
    let email = required("email")?;
    let department = required("department")?;
    let leave_type = required("leaveType")?;
    let start_raw = required("startDate")?;
    let end_raw = required("endDate")?;
    let reason = required("reason")?;

    let start_date = parse_date(&start_raw, "startDate")?;
    let end_date = parse_date(&end_raw, "endDate")?;
    if end_date < start_date {
        return Err(ValidationError::EndBeforeStart.into());
    }

    Ok(LeaveDraft {
        name,
        email,
        department,
        leave_type,
        start_date,
        end_date,
        reason,
    })
}

/// Trimmed text value of `field`, or `None` when absent or blank.
///
/// Numbers and booleans are accepted in their JSON text form; nulls, arrays
/// and objects count as missing.
fn text_field(payload: &Map<String, Value>, field: &str) -> Option<String> {
    let text = match payload.get(field)? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate { field })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
