//! Shared record validation errors and field checks.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for a record about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Required field is empty after trimming.
    BlankField {
        record: &'static str,
        field: &'static str,
    },
    /// Email field is present but malformed.
    InvalidEmail {
        record: &'static str,
        value: String,
    },
    /// Numeric field is outside its accepted range.
    OutOfRange {
        record: &'static str,
        field: &'static str,
        value: i64,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { record, field } => {
                write!(f, "{record}.{field} is required")
            }
            Self::InvalidEmail { record, value } => {
                write!(f, "{record}.email is not a valid address: `{value}`")
            }
            Self::OutOfRange {
                record,
                field,
                value,
            } => write!(f, "{record}.{field} is out of range: {value}"),
        }
    }
}

impl Error for RecordValidationError {}

/// Rejects a blank required field.
pub(crate) fn require(
    record: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField { record, field });
    }
    Ok(())
}

/// Accepts an empty email; otherwise requires exactly one `@` with non-empty
/// local and domain parts.
pub(crate) fn check_email(record: &'static str, value: &str) -> Result<(), RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let mut parts = trimmed.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let valid = parts.next().is_none()
        && !local.is_empty()
        && !domain.is_empty()
        && !trimmed.contains(char::is_whitespace);
    if !valid {
        return Err(RecordValidationError::InvalidEmail {
            record,
            value: trimmed.to_string(),
        });
    }
    Ok(())
}
