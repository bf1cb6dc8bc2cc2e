use std::sync::Arc;

use bazaar_core::{format_products, PipelineResult, SearchQuery};
use bazaar_marketplace::scoped;
use bazaar_marketplace::ProductSearch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::guardrails::{GuardrailDecision, GuardrailPolicy, SearchBudget};
use crate::llm::InferenceClient;
use crate::tools::ToolDefinition;

pub const SYSTEM_PROMPT: &str = r#"You are a shopping assistant for an online marketplace. Your job is to help users find suitable products.

Instructions:
1. When the user asks for a product, call the `search_products` tool exactly once.
2. Extract the parameters from the request:
   - query: the product keywords, in Persian
   - freeShipping: 1 when the user wants free shipping, otherwise 0
   - minRating: minimum rating out of 5 (default 4)
   - minPrice / maxPrice: price range in Tomans, only when the user gives one
3. Never search more than once. If the request is not about finding a product, do not call the tool.

Examples:
- "Natural honey" -> query: "عسل طبیعی", freeShipping: 1
- "Phone under 15 million" -> query: "گوشی", maxPrice: 15000000
- "Laptop with free shipping" -> query: "لپ‌تاپ", freeShipping: 1
"#;

/// Runs one shopping request: inference, at most one search, formatting.
///
/// Every failure is converted into a [`PipelineResult`]; nothing escapes `run`.
pub struct SingleShotOrchestrator {
    inference: Arc<dyn InferenceClient>,
    search: Arc<dyn ProductSearch>,
    guardrails: GuardrailPolicy,
    tool: ToolDefinition,
}

impl SingleShotOrchestrator {
    pub fn new(inference: Arc<dyn InferenceClient>, search: Arc<dyn ProductSearch>) -> Self {
        Self {
            inference,
            search,
            guardrails: GuardrailPolicy::default(),
            tool: ToolDefinition::search_products(),
        }
    }

    pub async fn run(&self, user_text: &str) -> PipelineResult {
        let correlation_id = Uuid::new_v4().to_string();
        self.run_with_correlation(user_text, &correlation_id).await
    }

    pub async fn run_with_correlation(&self, user_text: &str, correlation_id: &str) -> PipelineResult {
        let call = match self.inference.infer_call(SYSTEM_PROMPT, &self.tool, user_text).await {
            Ok(Some(call)) => {
                info!(
                    event_name = "agent.inference.completed",
                    correlation_id,
                    tool_name = %call.tool_name,
                    "inference produced a tool call"
                );
                call
            }
            Ok(None) => {
                info!(
                    event_name = "agent.inference.no_call",
                    correlation_id,
                    "inference produced no tool call"
                );
                return PipelineResult::empty();
            }
            Err(inference_error) if inference_error.is_absent_call() => {
                warn!(
                    event_name = "agent.inference.unparseable",
                    correlation_id,
                    error = %inference_error,
                    "inference output could not be parsed; treating as no call"
                );
                return PipelineResult::empty();
            }
            Err(inference_error) => {
                error!(
                    event_name = "agent.inference.failed",
                    correlation_id,
                    error = %inference_error,
                    "inference capability failed"
                );
                return PipelineResult::system_error(inference_error);
            }
        };

        let mut budget = SearchBudget::single_shot();
        if let GuardrailDecision::Deny { reason_code, detail } =
            self.guardrails.evaluate(&call, &budget)
        {
            warn!(
                event_name = "agent.guardrail.denied",
                correlation_id,
                reason_code,
                detail = %detail,
                "tool call rejected"
            );
            return PipelineResult::empty();
        }

        let query = match SearchQuery::from_arguments(&call.arguments) {
            Ok(query) => query,
            Err(schema_error) => {
                warn!(
                    event_name = "agent.arguments.rejected",
                    correlation_id,
                    error = %schema_error,
                    "tool arguments failed validation; treating as no call"
                );
                return PipelineResult::empty();
            }
        };

        if !budget.try_consume() {
            return PipelineResult::empty();
        }
        info!(
            event_name = "agent.search.started",
            correlation_id,
            query = %query.query,
            min_price = ?query.min_price,
            max_price = ?query.max_price,
            min_rating = query.min_rating,
            free_shipping = query.free_shipping,
            "invoking marketplace search"
        );

        let records = match self.search.search(&query).await {
            Ok(records) => records,
            Err(search_error) => {
                error!(
                    event_name = "agent.search.failed",
                    correlation_id,
                    error = %search_error,
                    "marketplace search failed"
                );
                return PipelineResult::system_error(search_error);
            }
        };

        let lines = format_products(&records, &query.query);
        debug!(
            event_name = "agent.search.formatted",
            correlation_id,
            record_count = records.len(),
            line_count = lines.len(),
            "search results formatted"
        );
        PipelineResult::Products(lines)
    }

    /// Blocking entry point: one bounded wait on a scoped single-use runtime.
    pub fn run_blocking(&self, user_text: &str) -> PipelineResult {
        scoped::block_on(self.run(user_text)).unwrap_or_else(PipelineResult::system_error)
    }
}
