//! Error types for the probe client.
//!
//! # Design
//! Every failure a call can produce has its own variant so callers can match
//! on the kind instead of parsing messages. Status-bearing variants keep the
//! code as a field (see `ClientError::status`). Non-UTF-8 bodies are reduced
//! to their length so binary data never reaches logs or terminals.

use std::io;

/// Errors returned by `Client` calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The transport failed before a response arrived. Passed through as-is.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON. Nothing was sent.
    #[error(transparent)]
    Encode(serde_json::Error),

    /// The request target could not be combined with the base URL.
    #[error("invalid request target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Non-2xx status with a UTF-8 body.
    #[error("got {status} code and response: {body}")]
    Status { status: u16, body: String },

    /// Non-2xx status with a body that is not valid UTF-8.
    #[error("got {status} code and {len} bytes of binary data")]
    BinaryStatus { status: u16, len: usize },

    /// The response body could not be read.
    #[error("got {status} code and failed to read response body: {source}")]
    ReadBody {
        status: u16,
        #[source]
        source: io::Error,
    },

    /// 2xx status but the body was not the expected JSON.
    #[error("got {status} code and failed to decode response body: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// HTTP status of the response that caused the error, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. }
            | ClientError::BinaryStatus { status, .. }
            | ClientError::ReadBody { status, .. }
            | ClientError::Decode { status, .. } => Some(*status),
            ClientError::Transport(_) | ClientError::Encode(_) | ClientError::InvalidTarget { .. } => None,
        }
    }
}

/// Failures raised by a `Transport` implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Ureq(#[from] ureq::Error),

    /// The request could not be turned into a wire request.
    #[error("failed to build request: {0}")]
    Build(#[from] ureq::http::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised while building a `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: ureq::http::uri::InvalidUri,
    },

    #[error("base URL {0:?} must include a scheme and host")]
    MissingHost(String),
}
