//! # Error Types Module
//!
//! Error types shared by the upstream client, the configuration loaders and
//! the callback parser. Handler and `main` boundaries wrap these in
//! `anyhow::Error`; inside the booking flow they are recovered into text.

use std::path::PathBuf;

use thiserror::Error;

/// The upstream clinic API could not produce a usable answer.
///
/// Every variant is recovered by the booking flow into a user-facing error
/// text; none of them stops an identity's update loop.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    /// The body was not the JSON shape we expect
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// Endpoint path the failing call was made against
    pub fn endpoint(&self) -> &str {
        match self {
            UpstreamError::Request { endpoint, .. }
            | UpstreamError::Status { endpoint, .. }
            | UpstreamError::Decode { endpoint, .. } => endpoint,
        }
    }
}

/// Startup configuration problems (token file, user file, environment)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} does not contain any bot tokens")]
    NoTokens { path: PathBuf },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// A callback payload that matches none of the booking grammars
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized callback payload {payload:?}")]
pub struct MalformedCallback {
    pub payload: String,
}

impl MalformedCallback {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::NoTokens {
            path: PathBuf::from("tokens.json"),
        };
        assert_eq!(err.to_string(), "tokens.json does not contain any bot tokens");

        let err = ConfigError::InvalidValue {
            key: "UPSTREAM_TIMEOUT_SECS",
            value: "soon".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value \"soon\" for UPSTREAM_TIMEOUT_SECS");
    }

    #[test]
    fn test_decode_error_keeps_endpoint() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = UpstreamError::Decode {
            endpoint: "/categories".to_string(),
            source,
        };
        assert_eq!(err.endpoint(), "/categories");
        assert!(err.to_string().starts_with("could not decode /categories response"));
    }
}
