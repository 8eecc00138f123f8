//! Error types for declaration validation.

use thiserror::Error;

use crate::event::StatusEvent;

/// Result type for declaration validation operations.
pub type Result<T> = std::result::Result<T, DeclarationError>;

/// Errors raised at the validation boundary.
///
/// Rule functions never raise: every expected condition is expressed as a
/// returned [`StatusEvent`]. The only raising call sites are the aggregate
/// notification step, which folds every collected error into a single
/// [`DeclarationError::Invalid`], and the model-binding step of the
/// end-to-end entry point, whose failures are converted back into synthetic
/// events rather than escaping.
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// The declaration contains one or more validation errors.
    #[error("{}", render_invalid(.errors))]
    Invalid {
        /// Every ERROR-severity event collected during validation.
        errors: Vec<StatusEvent>,
    },

    /// The declaration text could not be deserialized into a node.
    #[error("Failed to read the declaration: {0}")]
    Deserialization(String),
}

impl DeclarationError {
    /// Creates an [`DeclarationError::Invalid`] from the error events within
    /// a collection of validation events.
    pub fn from_events<'a, I>(events: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a StatusEvent>,
    {
        let errors: Vec<StatusEvent> = events
            .into_iter()
            .filter(|e| e.is_error())
            .cloned()
            .collect();

        if errors.is_empty() {
            None
        } else {
            Some(DeclarationError::Invalid { errors })
        }
    }

    /// Returns the error events carried by this error, if any.
    pub fn errors(&self) -> &[StatusEvent] {
        match self {
            DeclarationError::Invalid { errors } => errors,
            DeclarationError::Deserialization(_) => &[],
        }
    }
}

/// Renders the aggregate error message, one finding per line.
fn render_invalid(errors: &[StatusEvent]) -> String {
    let mut message = format!(
        "Encountered {} error(s) in the declared evaluation, which must be fixed:",
        errors.len()
    );
    for error in errors {
        message.push('\n');
        message.push_str("    - ");
        message.push_str(&error.message);
    }
    message
}
