use crate::tools::{ToolCall, SEARCH_PRODUCTS};

/// Hard cap on marketplace searches per request.
pub const MAX_SEARCHES_PER_REQUEST: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Deny { reason_code: &'static str, detail: String },
}

/// Per-request search allowance. Created fresh for every run and never shared.
#[derive(Debug)]
pub struct SearchBudget {
    used: u32,
    limit: u32,
}

impl SearchBudget {
    pub fn single_shot() -> Self {
        Self { used: 0, limit: MAX_SEARCHES_PER_REQUEST }
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    /// Consumes one search; returns `false` once the allowance is spent.
    pub fn try_consume(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardrailPolicy {
    pub allowed_tool: &'static str,
}

impl Default for GuardrailPolicy {
    fn default() -> Self {
        Self { allowed_tool: SEARCH_PRODUCTS }
    }
}

impl GuardrailPolicy {
    pub fn evaluate(&self, call: &ToolCall, budget: &SearchBudget) -> GuardrailDecision {
        if call.tool_name != self.allowed_tool {
            return GuardrailDecision::Deny {
                reason_code: "unknown_tool",
                detail: format!("tool `{}` is not offered to the model", call.tool_name),
            };
        }

        if budget.remaining() == 0 {
            return GuardrailDecision::Deny {
                reason_code: "search_budget_exhausted",
                detail: format!(
                    "{} of {} searches already used for this request",
                    budget.used(),
                    MAX_SEARCHES_PER_REQUEST
                ),
            };
        }

        GuardrailDecision::Allow
    }
}
