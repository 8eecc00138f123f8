//! # Decl Guard - Declaration Validation for Forecast Verification
//!
//! Decl Guard is the rule-based validation engine of a hydrologic forecast
//! verification pipeline. Users describe an evaluation, which datasets to
//! compare, over what times and places, with which metrics and output
//! formats, as a structured declaration. Before any data is acquired or any
//! statistic is computed, the engine checks that the declaration is
//! internally consistent and computable, and produces precise, leveled
//! findings rather than failing deep inside the evaluation.
//!
//! ## Overview
//!
//! Validation runs as families of pure, independent rule functions over an
//! immutable [`model::EvaluationDeclaration`], each producing zero or more
//! [`StatusEvent`]s. The orchestrator composes the families in a fixed order
//! so the findings are deterministic and tests can assert on their relative
//! order. Two passes exist: a pre-ingest pass over everything the declared
//! text can prove, and a post-ingest pass over facts that only real data can
//! clarify, such as inferred data types.
//!
//! ## Quick Start
//!
//! ```rust
//! use decl_guard::model::{Dataset, DataType, EvaluationDeclaration};
//! use decl_guard::{notify, validate_business_logic};
//!
//! let declaration = EvaluationDeclaration {
//!     left: Some(Dataset {
//!         data_type: Some(DataType::Observations),
//!         ..Default::default()
//!     }),
//!     right: None,
//!     ..Default::default()
//! };
//!
//! // The predicted dataset is missing, which is an error.
//! let events = validate_business_logic(&declaration, false);
//! assert!(events.iter().any(|event| event.is_error()));
//!
//! // The default notification policy folds every error into one failure.
//! assert!(notify(&events).is_err());
//! ```
//!
//! ## Architecture
//!
//! - [`model`]: the declaration data model, produced by an external parser
//!   and consumed read-only.
//! - [`event`]: the status event, the sole output unit of every rule.
//! - [`catalog`]: the metric catalog, a static attribute registry queried by
//!   the rules through predicate functions.
//! - [`query`]: pure predicates over the declaration shared across rules.
//! - [`rules`]: the rule families.
//! - [`validate`]: the orchestrator and the default notification policy.
//! - [`frontend`]: the boundary to the external parser and schema validator,
//!   and the end-to-end entry point over raw declaration text.

pub mod catalog;
pub mod error;
pub mod event;
pub mod frontend;
pub mod logging;
pub mod model;
pub mod query;
pub mod rules;
pub mod validate;

pub use error::{DeclarationError, Result};
pub use event::{StatusEvent, StatusLevel};
pub use frontend::{validate_full, DeclarationFrontend, MediaType, SchemaFinding};
pub use validate::{notify, validate_business_logic, validate_post_ingest};
