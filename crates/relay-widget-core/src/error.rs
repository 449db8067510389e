//! Error types for the widget core.

use thiserror::Error;

/// Rejected inbound window message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("message has no string action")]
    MissingAction,
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("tried to open link without an href")]
    MissingHref,
}

/// Failure while fetching or decoding the domain config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainFetchError {
    #[error("domain config request failed: {0}")]
    Network(String),
    #[error("domain config request returned status {0}")]
    Status(u16),
    #[error("domain config response could not be decoded: {0}")]
    Decode(String),
    #[error("invalid domain config url: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for DomainFetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Misuse of the public widget API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("tried to set a Relay username before Relay was initialized")]
    NotInitialized,
    #[error("tried to set an empty Relay username")]
    EmptyUsername,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must use http:// or https:// and include a host")]
    InvalidUrl { field: &'static str },
}
