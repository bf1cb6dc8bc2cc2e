use thiserror::Error;

/// Rejection of an inferred call's arguments by the search argument schema.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("tool arguments must be a JSON object")]
    NotAnObject,
    #[error("missing required argument `{0}`")]
    MissingField(&'static str),
    #[error("argument `{field}` must be {expected}")]
    InvalidType { field: &'static str, expected: &'static str },
    #[error("argument `query` must not be empty")]
    EmptyQuery,
    #[error("argument `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Failure of the outbound inference capability.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("inference transport failure: {0}")]
    Transport(String),
    #[error("inference provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("inference response could not be interpreted: {0}")]
    MalformedResponse(String),
}

impl InferenceError {
    /// Malformed provider output is a "no call" outcome, not a system failure.
    pub fn is_absent_call(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// Failure of the outbound marketplace search capability.
///
/// Every variant is terminal for the request: searches are never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("marketplace search transport failure: {0}")]
    Transport(String),
    #[error("marketplace search rejected credentials ({status})")]
    Unauthorized { status: u16 },
    #[error("marketplace search failed ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("marketplace search response could not be decoded: {0}")]
    MalformedResponse(String),
    #[error("blocking search could not run: {0}")]
    Runtime(String),
}

/// Why a single product record was left out of the formatted output.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecordSkip {
    #[error("product record is not an object")]
    NotAnObject,
    #[error("product record is missing `{0}`")]
    MissingField(&'static str),
    #[error("product record field `{field}` has an unexpected type")]
    InvalidField { field: &'static str },
}
