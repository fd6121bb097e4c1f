//! Run configuration for the validator.
//!
//! Replaces process-wide settings: every validator carries its own
//! configuration, so concurrent validators never share mutable state.

use std::fmt;
use std::sync::Arc;

/// Default placeholder substituted with the field label in failure messages.
pub const DEFAULT_PLACEHOLDER: &str = "{field}";

/// Custom message formatter receiving the raw message and the field label.
pub type MessageFormatter = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Options controlling how failure messages are produced.
///
/// # Example
///
/// ```rust
/// use fieldrules_core::ValidationConfig;
///
/// let config = ValidationConfig::new().with_placeholder(":attribute");
/// assert_eq!(config.format_message(":attribute is required", "Email"), "Email is required");
/// ```
#[derive(Clone)]
pub struct ValidationConfig {
    /// Placeholder replaced with the field label (ASCII case-insensitive)
    pub placeholder: String,

    /// Formatter overriding placeholder substitution
    pub message_formatter: Option<MessageFormatter>,
}

impl ValidationConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets a custom message formatter.
    pub fn with_message_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.message_formatter = Some(Arc::new(formatter));
        self
    }

    /// Produces the stored message for a failure of the field labelled `label`.
    pub fn format_message(&self, message: &str, label: &str) -> String {
        match &self.message_formatter {
            Some(formatter) => formatter(message, label),
            None => replace_ignore_ascii_case(message, &self.placeholder, label),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            message_formatter: None,
        }
    }
}

impl fmt::Debug for ValidationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationConfig")
            .field("placeholder", &self.placeholder)
            .field("message_formatter", &self.message_formatter.is_some())
            .finish()
    }
}

fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }

    let mut result = String::with_capacity(haystack.len());
    let mut rest = haystack;

    while !rest.is_empty() {
        match rest.get(..needle.len()) {
            Some(head) if head.eq_ignore_ascii_case(needle) => {
                result.push_str(replacement);
                rest = &rest[needle.len()..];
            }
            _ => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    result.push(c);
                }
                rest = chars.as_str();
            }
        }
    }

    result
}
