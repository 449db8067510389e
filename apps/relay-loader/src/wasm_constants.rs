pub(crate) const IFRAME_ID: &str = "relay-iframe";
pub(crate) const BUTTON_ID: &str = "relay-btn";
pub(crate) const BUTTON_LABEL: &str = "Open chat";
pub(crate) const OPEN_CLASS: &str = "relay-open";
pub(crate) const LEFT_CLASS: &str = "left";
pub(crate) const INITIALIZED_EVENT: &str = "relayInitialized";
/// Fallback lookup when `document.currentScript` is unavailable (module
/// scripts): `<script src=".../relay.js?..." data-relay-loader>`.
pub(crate) const LOADER_SCRIPT_SELECTOR: &str = "script[data-relay-loader]";
pub(crate) const INNER_HEIGHT_VARIABLE: &str = "--inner-height";
pub(crate) const SCROLLBAR_WIDTH_VARIABLE: &str = "--scrollbar-width";
pub(crate) const LOG_PREFIX: &str = "[relay]";
