//! The widget lifecycle state machine.
//!
//! `WidgetController` owns the open/initialized/present flags and drives a
//! [`WidgetHost`], which performs the actual page side effects. The host is
//! also responsible for calling back into the controller: window messages go
//! to [`WidgetController::handle_message`], button clicks to
//! [`WidgetController::toggle`], and every navigation (popstate or a history
//! mutation) to [`WidgetController::on_navigation`].

use serde::Serialize;
use serde_json::Value;

use crate::config::WidgetConfig;
use crate::domain::DomainConfig;
use crate::error::{ProtocolError, WidgetError};
use crate::location::PageLocation;
use crate::options::{LoaderOptions, Position};
use crate::path_whitelist::is_path_allowed;
use crate::protocol::{InboundMessage, OpenLinkRequest, OutboundMessage};

/// Page side effects the controller needs. Element creation happens when the
/// host is built; these calls only attach, detach, and restyle.
pub trait WidgetHost {
    /// Current `location.href` of the host page.
    fn current_href(&self) -> String;

    /// `postMessage` to the iframe, restricted to `target_origin`.
    fn post_message(&mut self, message: &OutboundMessage, target_origin: &str);

    fn attach_iframe(&mut self);
    fn detach_iframe(&mut self);
    fn attach_button(&mut self);
    fn detach_button(&mut self);

    /// Toggles the open class on both elements.
    fn set_open(&mut self, open: bool);
    fn set_position(&mut self, position: Position);
    fn set_button_bottom(&mut self, bottom: &str);
    fn set_button_background(&mut self, color: &str);

    /// Navigate the current tab.
    fn navigate(&mut self, href: &str);
    fn open_new_tab(&mut self, href: &str);
    /// `history.pushState` without a reload. The host must not report this
    /// mutation back through `on_navigation`; the controller does that itself.
    fn push_url(&mut self, url: &str);

    /// Announce readiness to the host page (the `relayInitialized` event).
    fn announce_initialized(&mut self);
}

/// Serializable view of the controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetSnapshot {
    pub minimized: bool,
    pub initialized: bool,
    pub present: bool,
    pub domain_config: Option<DomainConfig>,
    pub options: LoaderOptions,
}

pub struct WidgetController<H: WidgetHost> {
    config: WidgetConfig,
    options: LoaderOptions,
    host: H,
    minimized: bool,
    initialized: bool,
    present: bool,
    domain_config: Option<DomainConfig>,
}

impl<H: WidgetHost> WidgetController<H> {
    /// Applies loader options and attaches the iframe. The button waits for
    /// the embedded app to report readiness.
    pub fn new(config: WidgetConfig, options: LoaderOptions, mut host: H) -> Self {
        if options.position == Position::Left {
            host.set_position(Position::Left);
        }
        if let Some(bottom) = options.button_bottom.as_deref() {
            host.set_button_bottom(bottom);
        }
        host.attach_iframe();
        Self {
            config,
            options,
            host,
            minimized: true,
            initialized: false,
            present: true,
            domain_config: None,
        }
    }

    #[must_use]
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            minimized: self.minimized,
            initialized: self.initialized,
            present: self.present,
            domain_config: self.domain_config.clone(),
            options: self.options.clone(),
        }
    }

    /// Entry point for every window `message` event. Messages from any
    /// origin other than the iframe's are dropped before decoding.
    pub fn handle_message(&mut self, origin: &str, data: &Value) {
        if origin != self.config.iframe_origin {
            return;
        }
        match InboundMessage::decode(data) {
            Ok(InboundMessage::Minimize) => self.minimize(),
            Ok(InboundMessage::OpenLink(request)) => self.open_link(&request),
            Ok(InboundMessage::Initialized) => self.initialize(),
            Ok(InboundMessage::ClearQueryParams) => self.clear_query_params(),
            Err(error) => match error {
                ProtocolError::MissingHref => tracing::warn!(%error),
                _ => tracing::debug!(%error, "ignoring message"),
            },
        }
    }

    pub fn toggle(&mut self) {
        if self.minimized {
            self.unminimize();
        } else {
            self.minimize();
        }
    }

    pub fn minimize(&mut self) {
        self.set_minimized(true);
        self.clear_query_params();
    }

    pub fn unminimize(&mut self) {
        self.set_minimized(false);
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), WidgetError> {
        if !self.initialized {
            return Err(WidgetError::NotInitialized);
        }
        if username.is_empty() {
            return Err(WidgetError::EmptyUsername);
        }
        self.post(&OutboundMessage::SetRelayUsername {
            username: username.to_string(),
        });
        Ok(())
    }

    /// Called once the domain config request settles, with `None` when it
    /// failed or the domain is not registered.
    pub fn apply_domain_config(&mut self, domain_config: Option<DomainConfig>) {
        if domain_config.is_some() {
            self.domain_config = domain_config;
        }
        let color = self.options.button_color.clone().or_else(|| {
            self.domain_config
                .as_ref()
                .and_then(|config| config.button_color.clone())
        });
        if let Some(color) = color {
            self.host.set_button_background(&color);
        }
        self.enforce_whitelist();
    }

    /// Navigation observer. The host calls this after every history change.
    pub fn on_navigation(&mut self) {
        self.enforce_whitelist();
        self.send_window_location();
    }

    fn initialize(&mut self) {
        let first = !self.initialized;
        self.initialized = true;
        if self.present {
            self.host.attach_button();
        }
        self.send_window_location();
        if !first {
            // A restored iframe reloads the app in its default state.
            self.post(&OutboundMessage::RelayMinimized(self.minimized));
            tracing::debug!("embedded app re-initialized");
            return;
        }
        if self.location().has_open_marker() {
            self.unminimize();
        }
        self.host.announce_initialized();
    }

    fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
        self.post(&OutboundMessage::RelayMinimized(minimized));
        self.host.set_open(!minimized);
    }

    fn open_link(&mut self, request: &OpenLinkRequest) {
        if request.href == self.host.current_href() {
            return;
        }
        if request.is_external {
            self.host.open_new_tab(&request.href);
        } else {
            self.host.navigate(&request.href);
        }
    }

    fn clear_query_params(&mut self) {
        let Some(url) = self.location().without_widget_params() else {
            return;
        };
        self.host.push_url(&url);
        self.on_navigation();
    }

    fn enforce_whitelist(&mut self) {
        let whitelist = self
            .domain_config
            .as_ref()
            .and_then(|config| config.path_whitelist.as_deref());
        let allowed = is_path_allowed(whitelist, &self.location().pathname);
        if allowed == self.present {
            return;
        }
        self.present = allowed;
        if allowed {
            tracing::debug!("path allowed again, restoring widget");
            self.host.attach_iframe();
            if self.initialized {
                self.host.attach_button();
            }
        } else {
            tracing::debug!("path not in whitelist, removing widget");
            self.host.detach_button();
            self.host.detach_iframe();
        }
    }

    fn send_window_location(&mut self) {
        let href = self.location().reported_href(self.options.path.as_deref());
        self.post(&OutboundMessage::WindowLocation(href));
    }

    fn post(&mut self, message: &OutboundMessage) {
        self.host.post_message(message, &self.config.iframe_origin);
    }

    fn location(&self) -> PageLocation {
        PageLocation::from_href(&self.host.current_href())
    }
}
