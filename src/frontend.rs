//! The boundary to the external parser and schema validator.
//!
//! The validation engine consumes an already-deserialized declaration; the
//! document format, its schema and the legacy dialect belong to external
//! collaborators. [`DeclarationFrontend`] captures that boundary as a trait
//! so the end-to-end entry point can run the legacy gate, the schema gate
//! and model binding without owning any of them.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::event::StatusEvent;
use crate::model::EvaluationDeclaration;
use crate::validate;

/// The serialized form of a declaration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Yaml,
    Json,
    Unknown,
}

/// One structural finding from the external schema validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFinding {
    pub message: String,
}

impl SchemaFinding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External collaborators consumed by the end-to-end entry point.
pub trait DeclarationFrontend {
    /// Detects the media type of the raw declaration text.
    fn detect_media_type(&self, text: &str) -> MediaType;

    /// Returns true when the text belongs to the superseded dialect.
    fn is_legacy_dialect(&self, media_type: MediaType, text: &str) -> bool;

    /// Deserializes the text into an untyped node for schema validation.
    fn parse(&self, text: &str) -> Result<Value>;

    /// Runs structural validation of the node against the schema.
    fn validate_schema(&self, node: &Value) -> Vec<SchemaFinding>;

    /// Binds a schema-valid node to the in-memory declaration model.
    fn bind(&self, node: Value) -> Result<EvaluationDeclaration>;
}

/// Runs schema validation and folds the findings into a deduplicated set of
/// error events, sorted by message. Returns an empty set on success.
pub fn validate_schema<F: DeclarationFrontend>(
    frontend: &F,
    node: &Value,
) -> BTreeSet<StatusEvent> {
    frontend
        .validate_schema(node)
        .into_iter()
        .map(|finding| StatusEvent::error(finding.message))
        .collect()
}

/// End-to-end validation of raw declaration text.
///
/// Rejects the legacy dialect, parses, schema-validates and, if and only if
/// the schema pass produced zero events, binds the model and runs the
/// business-logic pass. Parse and binding failures become a single synthetic
/// error event, so callers always receive a list of events, never an error.
pub fn validate_full<F: DeclarationFrontend>(
    text: &str,
    frontend: &F,
    omit_sources: bool,
) -> Vec<StatusEvent> {
    let media_type = frontend.detect_media_type(text);

    if frontend.is_legacy_dialect(media_type, text) {
        return vec![StatusEvent::error(
            "The declaration uses a superseded dialect that is no longer supported. Please \
             migrate the declaration to the current dialect and try again.",
        )];
    }

    let node = match frontend.parse(text) {
        Ok(node) => node,
        Err(error) => {
            return vec![StatusEvent::error(format!(
                "The declaration could not be read: {error}. Please correct the declaration \
                 text and try again."
            ))];
        }
    };

    let schema_events = validate_schema(frontend, &node);
    if !schema_events.is_empty() {
        debug!(
            findings = schema_events.len(),
            "schema validation failed, skipping business-logic validation"
        );
        return schema_events.into_iter().collect();
    }

    // Binding assumes a schema-valid shape; a failure here is a system
    // inconsistency rather than a user problem.
    let declaration = match frontend.bind(node) {
        Ok(declaration) => declaration,
        Err(error) => {
            return vec![StatusEvent::error(format!(
                "The declaration passed schema validation but could not be bound to the \
                 declaration model: {error}."
            ))];
        }
    };

    validate::validate_business_logic(&declaration, omit_sources)
}
