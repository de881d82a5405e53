//! Shared validation utilities
//!
//! Field rules used by the validator, the per-field error collection handlers
//! return to clients, and HTML escaping for user-supplied comment text.
//!
//! # Examples
//!
//! ```rust,ignore
//! use datareq_server::features::shared::validation::{validate_text, ValidationErrors};
//!
//! let mut errors = ValidationErrors::new();
//! if let Err(e) = validate_text("", 50, true) {
//!     errors.add("title", e.to_string());
//! }
//! errors.into_result()?;
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Maximum length of a data request title
pub const TITLE_MAX_LENGTH: usize = 50;

/// Maximum length of a data request description
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

/// Maximum length of a comment
pub const COMMENT_MAX_LENGTH: usize = 1000;

/// Errors from a single text field rule
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("Missing value")]
    Required,

    #[error("Must be a maximum of {max_length} characters long")]
    TooLong { max_length: usize },
}

/// Check a free-text field
///
/// # Rules
/// - When `required`, must contain something other than whitespace
/// - At most `max_length` characters (not bytes)
pub fn validate_text(value: &str, max_length: usize, required: bool) -> Result<(), TextValidationError> {
    if required && value.trim().is_empty() {
        return Err(TextValidationError::Required);
    }
    if value.chars().count() > max_length {
        return Err(TextValidationError::TooLong { max_length });
    }
    Ok(())
}

/// Field name to messages, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors with a single message on `field`
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Escape the characters that carry meaning in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}
