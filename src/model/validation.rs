//! Field-level error reporting shared by the user and property rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Name of the rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Value is missing or blank.
    Required,
    MaxLength,
    /// Numeric value outside its allowed bounds.
    Range,
    /// Value does not have the expected shape (email, JSON, path id).
    Format,
    /// Exactly one of two flags must be set.
    ExclusiveChoice,
    /// At most one of two flags may be set.
    MutuallyExclusive,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MaxLength => "max_length",
            Self::Range => "range",
            Self::Format => "format",
            Self::ExclusiveChoice => "exclusive_choice",
            Self::MutuallyExclusive => "mutually_exclusive",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

/// Every violation found in one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid payload: {}", describe(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{} ({})", error.field, error.rule))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a payload that failed on a single field.
    #[must_use]
    pub fn single(field: &str, rule: Rule, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, rule, message);
        errors
    }

    pub fn push(&mut self, field: &str, rule: Rule, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            rule,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns `true` when `field` failed `rule`.
    #[must_use]
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.0
            .iter()
            .any(|error| error.field == field && error.rule == rule)
    }

    /// Hands `value` back when nothing was recorded.
    ///
    /// # Errors
    /// Returns `self` when at least one violation was pushed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub(crate) fn check_text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.push(field, Rule::Required, format!("{field} is required"));
        } else {
            self.check_length(field, value, max);
        }
    }

    pub(crate) fn check_optional_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.check_length(field, value, max);
        }
    }

    fn check_length(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(
                field,
                Rule::MaxLength,
                format!("{field} must be at most {max} characters"),
            );
        }
    }

    pub(crate) fn check_between(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.push(
                    field,
                    Rule::Range,
                    format!("{field} must be between {min} and {max}"),
                );
            }
        }
    }

    pub(crate) fn check_positive(&mut self, field: &str, value: Option<i64>) {
        if matches!(value, Some(value) if value <= 0) {
            self.push(field, Rule::Range, format!("{field} must be greater than 0"));
        }
    }

    pub(crate) fn check_positive_decimal(&mut self, field: &str, value: Option<f64>) {
        if matches!(value, Some(value) if value.is_nan() || value <= 0.0) {
            self.push(field, Rule::Range, format!("{field} must be greater than 0"));
        }
    }

    pub(crate) fn check_non_negative(&mut self, field: &str, value: Option<i64>) {
        if matches!(value, Some(value) if value < 0) {
            self.push(
                field,
                Rule::Range,
                format!("{field} must be greater than or equal to 0"),
            );
        }
    }
}

/// Lightweight email sanity check, not an RFC 5322 parser.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
