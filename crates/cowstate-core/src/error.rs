use serde_json::Value;
use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    StateNotAnObject,
    InvalidChangeSet,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::StateNotAnObject => "E2001",
            Self::InvalidChangeSet => "E2002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StateNotAnObject => "State is not an object",
            Self::InvalidChangeSet => "Change set is not an object",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::StateNotAnObject => {
                Some("Wrap the state in a JSON object, e.g. {\"value\": ...}.")
            }
            Self::InvalidChangeSet => {
                Some("Pass changes as a JSON object mapping property names to new values.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors from the JSON-value entry points.
///
/// The map-typed API ([`crate::assign`], [`crate::set`]) cannot fail; these
/// only arise when a caller hands over an arbitrary [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("state must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("change set must be a JSON object, found {found}")]
    InvalidChangeSet { found: &'static str },
}

impl UpdateError {
    /// The stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotAnObject { .. } => ErrorCode::StateNotAnObject,
            Self::InvalidChangeSet { .. } => ErrorCode::InvalidChangeSet,
        }
    }
}

/// Name of the JSON type category of `value`, for error messages.
#[must_use]
pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
