//! Status events, the sole output unit of every validation rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The severity of a validation event.
///
/// Warnings describe declarations that are legal but risky, redundant or
/// probably unintended. Errors describe declarations that are computationally
/// unsound or contradictory and must be fixed before an evaluation can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    /// Advisory only, never fatal on its own.
    Warn,
    /// Must be fixed; aggregated into a [`DeclarationError`](crate::error::DeclarationError).
    Error,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Warn => write!(f, "WARN"),
            StatusLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// An immutable (severity, message) pair describing one validation finding.
///
/// Events carry no identity beyond their content. The business-logic pass
/// collects them in discovery order; the schema pass collects them in a
/// [`BTreeSet`](std::collections::BTreeSet), which deduplicates repeated
/// findings and sorts them by message text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEvent {
    /// The severity of the finding.
    pub level: StatusLevel,
    /// A human-readable description naming the offending declaration keys.
    pub message: String,
}

impl StatusEvent {
    /// Creates an event with the prescribed severity.
    pub fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Creates a warning event.
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warn, message)
    }

    /// Creates an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }

    /// Returns true if this event is a warning.
    pub fn is_warn(&self) -> bool {
        self.level == StatusLevel::Warn
    }

    /// Returns true if this event is an error.
    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

// Sorted by message first so that schema-stage sets read in message order.
impl Ord for StatusEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.message
            .cmp(&other.message)
            .then(self.level.cmp(&other.level))
    }
}

impl PartialOrd for StatusEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_event_builders() {
        let warn = StatusEvent::warn("a warning");
        assert_eq!(warn.level, StatusLevel::Warn);
        assert!(warn.is_warn());
        assert!(!warn.is_error());

        let error = StatusEvent::error("an error");
        assert_eq!(error.level, StatusLevel::Error);
        assert!(error.is_error());
    }

    #[test]
    fn test_set_deduplicates_and_sorts_by_message() {
        let mut set = BTreeSet::new();
        set.insert(StatusEvent::error("zebra"));
        set.insert(StatusEvent::error("apple"));
        set.insert(StatusEvent::error("apple"));
        set.insert(StatusEvent::error("mango"));

        let messages: Vec<&str> = set.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_display() {
        let event = StatusEvent::warn("check the 'season' declaration");
        assert_eq!(event.to_string(), "WARN: check the 'season' declaration");
    }
}
