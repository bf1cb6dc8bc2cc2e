//! Core types for the Bazaar shopping search agent.
//!
//! Everything in this crate is pure: the argument schema the inference step is
//! constrained by, the product record shape returned by the marketplace, the
//! deterministic result formatter, the error taxonomy, and configuration loading.

pub mod config;
pub mod domain;
pub mod errors;
pub mod format;

pub use domain::product::{ProductRecord, RatingSummary};
pub use domain::result::PipelineResult;
pub use domain::search::{search_arguments_schema, SearchQuery, DEFAULT_MIN_RATING};
pub use errors::{InferenceError, RecordSkip, SchemaError, SearchError};
pub use format::{format_products, MAX_SUMMARY_LINES};
