//! Marketplace search adapter.
//!
//! Wraps the external product search API behind the [`search::ProductSearch`]
//! trait. The adapter only marshals parameters: it never ranks, caches, or
//! retries.
//!
//! - **Search** (`search`) - the capability trait plus the filter wire shape
//! - **Client** (`client`) - reqwest-backed implementation
//! - **Scoped** (`scoped`) - single-use runtime for blocking callers

pub mod client;
pub mod scoped;
pub mod search;

pub use client::MarketplaceClient;
pub use search::{ProductSearch, SearchFilters};
