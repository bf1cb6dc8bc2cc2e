use serde::{Deserialize, Serialize};

/// Outcome of one shopping request.
///
/// Serializes as `{"products": [...]}` or `{"error": "..."}`; exactly one key
/// is ever present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineResult {
    Products(Vec<String>),
    Error(String),
}

impl PipelineResult {
    /// Successful outcome with no product lines (no actionable call was inferred).
    pub fn empty() -> Self {
        Self::Products(Vec::new())
    }

    /// Error payload for a capability-level failure.
    pub fn system_error(detail: impl std::fmt::Display) -> Self {
        Self::Error(format!("System error: {detail}"))
    }

    pub fn products(&self) -> Option<&[String]> {
        match self {
            Self::Products(lines) => Some(lines),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Products(_) => None,
            Self::Error(message) => Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
