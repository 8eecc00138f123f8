//! Rule families.
//!
//! Each family exposes a single `validate` function with the uniform shape
//! `(&EvaluationDeclaration, ..) -> Vec<StatusEvent>`. Rules are pure and
//! independent; the orchestrator in [`crate::validate`] composes them in a
//! fixed order and never short-circuits on another family's findings.

pub mod covariates;
pub mod datasets;
pub mod event_detection;
pub mod features;
pub mod metrics;
pub mod outputs;
pub mod sampling;
pub mod summary_statistics;
pub mod thresholds;
pub mod time;

/// Joins items into a quoted, comma-separated list for messages.
pub(crate) fn quoted_list<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    items
        .into_iter()
        .map(|item| format!("'{item}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
