//! Error taxonomy.
//!
//! Internals (transport, resolvers) work with `anyhow::Error` and attach
//! context as they go. Two typed errors travel inside those `anyhow` chains
//! and can be recovered by downcasting:
//!
//! - [`ValidationError`]: a malformed address or object id, raised before any
//!   remote call is issued.
//! - [`RateLimitError`]: the remote answered with a throttling response.
//!
//! [`DiscoveryError`] is the only error type returned from the public entry
//! points. It carries a machine-readable [`ErrorCode`] plus a context bag.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A caller supplied an identifier that is not `0x` + 64 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ValidationError {
    pub kind: &'static str,
    pub value: String,
}

impl ValidationError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// The remote service throttled the request.
///
/// Retried with the standard backoff like any other failure; the distinct
/// type only exists so that the final error can be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rate limited by {endpoint}: {message}")]
pub struct RateLimitError {
    pub endpoint: String,
    pub message: String,
}

/// Machine-readable classification of a [`DiscoveryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input; no remote call was made.
    Validation,
    /// Retries exhausted on a throttling response.
    RateLimited,
    /// Retries exhausted on any other remote failure.
    RemoteExhausted,
    /// The planner was handed more addresses than it accepts.
    TooManyTargets,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Validation => "validation",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::RemoteExhausted => "remote_exhausted",
            ErrorCode::TooManyTargets => "too_many_targets",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal failure at a top-level boundary (capability fetch, orchestrator run,
/// planner invocation).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct DiscoveryError {
    pub code: ErrorCode,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl DiscoveryError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Attach a context entry (e.g. the address being resolved).
    pub fn with_context(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Classify an exhausted remote failure.
    ///
    /// The message is the full `anyhow` chain so that the original error text
    /// is preserved.
    pub fn from_remote(err: &anyhow::Error) -> Self {
        let code = if err.downcast_ref::<ValidationError>().is_some() {
            ErrorCode::Validation
        } else if err.downcast_ref::<RateLimitError>().is_some() {
            ErrorCode::RateLimited
        } else {
            ErrorCode::RemoteExhausted
        };
        Self::new(code, format!("{:#}", err))
    }
}

impl From<ValidationError> for DiscoveryError {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, err.to_string()).with_context("input", &err.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_from_remote_classifies_rate_limit() {
        let err = anyhow::Error::new(RateLimitError {
            endpoint: "http://localhost".into(),
            message: "429 Too Many Requests".into(),
        })
        .context("fetch owned objects");
        let de = DiscoveryError::from_remote(&err);
        assert_eq!(de.code, ErrorCode::RateLimited);
        assert!(de.message.contains("fetch owned objects"));
        assert!(de.message.contains("429"));
    }

    #[test]
    fn test_from_remote_defaults_to_exhausted() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset")).context("page 3");
        let de = DiscoveryError::from_remote(&err.unwrap_err());
        assert_eq!(de.code, ErrorCode::RemoteExhausted);
    }

    #[test]
    fn test_validation_conversion_keeps_input() {
        let de: DiscoveryError = ValidationError::new("address", "0xbad").into();
        assert_eq!(de.code, ErrorCode::Validation);
        assert_eq!(de.context.get("input").map(String::as_str), Some("0xbad"));
        assert_eq!(de.to_string(), "[validation] invalid address: \"0xbad\"");
    }
}
