//! The validation orchestrator.
//!
//! Composes the rule families in a fixed order, so the ordered event list is
//! a contract: datasets, covariates, temporal declarations, event detection,
//! features, metrics, summary statistics, thresholds, sampling uncertainty
//! and output formats, in that sequence. No family short-circuits another.

use tracing::{debug, warn};

use crate::error::{DeclarationError, Result};
use crate::event::StatusEvent;
use crate::model::EvaluationDeclaration;
use crate::query;
use crate::rules;

/// Runs every business-logic rule family in fixed order and concatenates
/// their findings.
///
/// When `omit_sources` is true, dataset-presence and source-validity checks
/// are skipped so that a partially authored declaration can be validated
/// incrementally. Every other family still runs.
pub fn validate_business_logic(
    declaration: &EvaluationDeclaration,
    omit_sources: bool,
) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    events.extend(rules::datasets::validate(declaration, omit_sources));
    events.extend(rules::covariates::validate(declaration));
    events.extend(rules::time::validate(declaration));
    events.extend(rules::event_detection::validate(declaration));
    events.extend(rules::features::validate(declaration));
    events.extend(rules::metrics::validate(declaration));
    events.extend(rules::summary_statistics::validate(declaration));
    events.extend(rules::thresholds::validate(declaration));
    events.extend(rules::sampling::validate(declaration));
    events.extend(rules::outputs::validate(declaration));

    debug!(
        findings = events.len(),
        errors = events.iter().filter(|event| event.is_error()).count(),
        "completed business-logic validation"
    );

    events
}

/// Validates the facts that only become known once real data has been
/// inspected and the declaration has been clarified against it, then applies
/// the default notification policy.
///
/// This pass is the final gate before computation begins, so it escalates
/// rather than returning quietly: warnings are logged and any error raises a
/// single aggregate [`DeclarationError`].
pub fn validate_post_ingest(declaration: &EvaluationDeclaration) -> Result<()> {
    let mut events = Vec::new();

    events.extend(data_types_are_defined(declaration));
    events.extend(rules::datasets::validate(declaration, true));
    events.extend(rules::covariates::validate(declaration));
    events.extend(rules::event_detection::validate(declaration));
    events.extend(rules::metrics::validate(declaration));

    notify(&events)
}

/// The default notification policy.
///
/// Logs every warning as a single multi-line block and, when any error
/// exists, returns one [`DeclarationError::Invalid`] aggregating every error
/// message. Never fails for warnings alone.
pub fn notify(events: &[StatusEvent]) -> Result<()> {
    let warnings: Vec<&StatusEvent> = events.iter().filter(|event| event.is_warn()).collect();
    if !warnings.is_empty() {
        let mut block = format!(
            "Encountered {} warning(s) in the declared evaluation:",
            warnings.len()
        );
        for warning in &warnings {
            block.push('\n');
            block.push_str("    - ");
            block.push_str(&warning.message);
        }
        warn!("{block}");
    }

    match DeclarationError::from_events(events) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Post-ingest, every dataset's type must have been declared or inferred.
fn data_types_are_defined(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for (orientation, dataset) in query::primary_datasets(declaration) {
        if dataset.data_type.is_none() {
            events.push(StatusEvent::error(format!(
                "The data 'type' of the '{orientation}' dataset was not declared and could not \
                 be inferred from the data. Please declare the 'type' of the '{orientation}' \
                 dataset and try again."
            )));
        }
    }

    events
}
