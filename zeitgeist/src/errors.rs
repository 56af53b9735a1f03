//! Error types for the zeitgeist pipeline.
//!
//! Configuration problems are raised
//! before any stage executes, upstream problems are raised by the model
//! gateway and become the failure of a single stage. Parsing generated text
//! never fails (see [`crate::trends`]).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// The main error type for zeitgeist operations.
#[derive(Debug, Error)]
pub enum ZeitgeistError {
    /// Required configuration is missing or a stage list is invalid.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// A generation call failed.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// A stage read an output it did not declare.
    #[error("{0}")]
    UndeclaredDependency(#[from] UndeclaredDependencyError),

    /// A stage output was written twice.
    #[error("{0}")]
    OutputConflict(#[from] OutputConflictError),

    /// The run was cancelled between stages.
    #[error("Pipeline cancelled: {0}")]
    Cancelled(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ZeitgeistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Metadata about a configuration error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "CONFIG-FORWARD-DEP").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error codes carried by [`ConfigurationError`].
pub mod codes {
    /// The stage list is empty.
    pub const EMPTY: &str = "CONFIG-EMPTY";
    /// A dependency names a stage that is not in the list.
    pub const MISSING_DEP: &str = "CONFIG-MISSING-DEP";
    /// A dependency names a stage that runs later.
    pub const FORWARD_DEP: &str = "CONFIG-FORWARD-DEP";
    /// A stage depends on itself.
    pub const SELF_DEP: &str = "CONFIG-SELF-DEP";
    /// Two stages share a name.
    pub const DUPLICATE_STAGE: &str = "CONFIG-DUPLICATE-STAGE";
    /// A required credential is absent.
    pub const MISSING_CREDENTIAL: &str = "CONFIG-MISSING-CREDENTIAL";
    /// A parameter could not be parsed or is out of range.
    pub const INVALID_VALUE: &str = "CONFIG-INVALID-VALUE";
}

/// Raised before any stage executes when credentials, parameters or the
/// stage list itself are unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ConfigurationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
    /// Optional structured diagnostics.
    pub error_info: Option<ContractErrorInfo>,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the structured diagnostics.
    #[must_use]
    pub fn with_error_info(mut self, info: ContractErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// A required credential (usually an environment variable) is absent.
    #[must_use]
    pub fn missing_credential(name: &str) -> Self {
        Self::new(format!("{name} is required")).with_error_info(
            ContractErrorInfo::new(codes::MISSING_CREDENTIAL, format!("Missing credential {name}"))
                .with_fix_hint(format!("Set {name} before starting a pipeline run.")),
        )
    }

    /// A parameter has an unusable value.
    #[must_use]
    pub fn invalid_value(key: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(format!("Invalid value for {key}: {reason}")).with_error_info(
            ContractErrorInfo::new(codes::INVALID_VALUE, reason).with_context_entry("key", key),
        )
    }

    /// Returns the error code, if structured diagnostics are attached.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Category of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamErrorKind {
    /// Credentials were rejected.
    Authentication,
    /// The backend throttled the request.
    RateLimited,
    /// The backend could not be reached.
    Network,
    /// The backend did not answer in time.
    Timeout,
    /// The backend answered with something that is not generated text.
    InvalidResponse,
    /// Anything else.
    Other,
}

impl fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Network => write!(f, "network"),
            Self::Timeout => write!(f, "timeout"),
            Self::InvalidResponse => write!(f, "invalid_response"),
            Self::Other => write!(f, "other"),
        }
    }
}

static BEARER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bearer\s+[A-Za-z0-9._\-]+").expect("valid regex"));
static API_KEY_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsk-[A-Za-z0-9_\-]{8,}").expect("valid regex"));

const REDACTED: &str = "[REDACTED]";

/// A generation call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Upstream {kind} error: {message}")]
pub struct UpstreamError {
    /// Failure category.
    pub kind: UpstreamErrorKind,
    /// Human-readable cause.
    pub message: String,
    /// HTTP status, when the backend answered.
    pub status: Option<u16>,
}

impl UpstreamError {
    /// Creates a new upstream error.
    #[must_use]
    pub fn new(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Credentials were rejected.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Authentication, message)
    }

    /// The backend throttled the request.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::RateLimited, message)
    }

    /// The backend could not be reached.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Network, message)
    }

    /// The backend did not answer in time.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Timeout, message)
    }

    /// The backend answer could not be interpreted.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::InvalidResponse, message)
    }

    /// Any other failure.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Other, message)
    }

    /// Attaches the HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns a copy whose message has the given secrets and anything that
    /// looks like a bearer token or API key replaced with `[REDACTED]`.
    #[must_use]
    pub fn redacted(&self, secrets: &[String]) -> Self {
        let mut message = self.message.clone();
        for secret in secrets.iter().filter(|s| !s.is_empty()) {
            message = message.replace(secret.as_str(), REDACTED);
        }
        let message = BEARER_TOKEN.replace_all(&message, format!("Bearer {REDACTED}"));
        let message = API_KEY_LIKE.replace_all(&message, REDACTED).into_owned();

        Self {
            kind: self.kind,
            message,
            status: self.status,
        }
    }
}

/// Error raised when a stage reads an output it did not declare.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Undeclared dependency: stage '{stage}' attempted to access '{key}' which was not declared as a dependency")]
pub struct UndeclaredDependencyError {
    /// The stage attempting access.
    pub stage: String,
    /// The undeclared key.
    pub key: String,
}

impl UndeclaredDependencyError {
    /// Creates a new undeclared dependency error.
    #[must_use]
    pub fn new(stage: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            key: key.into(),
        }
    }
}

/// Error raised when writing a stage output that already exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Output conflict for stage '{stage}': {message}")]
pub struct OutputConflictError {
    /// The stage name.
    pub stage: String,
    /// Additional message.
    pub message: String,
}

impl OutputConflictError {
    /// Creates a new output conflict error.
    #[must_use]
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
