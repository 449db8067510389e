#![cfg_attr(test, allow(clippy::expect_used))]

//! Core of the Relay embeddable widget.
//!
//! Everything here is host-agnostic: the browser loader supplies a
//! [`WidgetHost`] and a [`DomainConfigTransport`], and forwards page events to
//! the [`WidgetController`].

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod location;
pub mod options;
pub mod path_whitelist;
pub mod protocol;
pub mod validation;

pub use config::WidgetConfig;
pub use controller::{WidgetController, WidgetHost, WidgetSnapshot};
pub use domain::{DomainConfig, DomainConfigClient, DomainConfigTransport};
pub use error::{ConfigError, DomainFetchError, ProtocolError, WidgetError};
pub use location::{PageLocation, WIDGET_QUERY_KEYS};
pub use options::{LoaderOptions, Position};
pub use path_whitelist::is_path_allowed;
pub use protocol::{InboundMessage, OpenLinkRequest, OutboundMessage};
pub use validation::is_hex_color;
