//! Input validation errors raised before any storage access.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    BlankField(&'static str),
    /// Requested due date precedes the issue date.
    DueBeforeIssue { issue: NaiveDate, due: NaiveDate },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::DueBeforeIssue { issue, due } => {
                write!(f, "due date {due} is before issue date {issue}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value`, rejecting it when nothing remains.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
