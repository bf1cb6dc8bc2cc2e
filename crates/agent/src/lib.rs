//! Single-shot shopping agent.
//!
//! One request flows through a fixed pipeline:
//! 1. **Inference** (`llm`) - user text plus the `search_products` schema → at most one tool call
//! 2. **Guardrails** (`guardrails`) - only the offered tool, at most one search per request
//! 3. **Search** - one marketplace lookup through `bazaar_marketplace::ProductSearch`
//! 4. **Formatting** - `bazaar_core::format_products` turns records into summary lines
//!
//! The model only translates the request into search arguments. It never sees
//! the search results and never gets a second turn.

pub mod guardrails;
pub mod llm;
pub mod runtime;
pub mod tools;

pub use llm::{ChatCompletionsClient, InferenceClient};
pub use runtime::{SingleShotOrchestrator, SYSTEM_PROMPT};
