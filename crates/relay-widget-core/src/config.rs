use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_IFRAME_ORIGIN: &str = "https://app.relaychat.app";
pub const DEFAULT_API_BASE_URL: &str = "https://api-www.relaychat.app";
pub const ENV_IFRAME_ORIGIN: &str = "RELAY_IFRAME_ORIGIN";
pub const ENV_API_BASE_URL: &str = "RELAY_API_BASE_URL";
pub const CONFIG_SOURCE_DEFAULT: &str = "default";

/// Endpoints the widget talks to.
///
/// `iframe_origin` is both the iframe `src` and the only origin whose
/// messages are accepted and to which messages are posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub iframe_origin: String,
    pub api_base_url: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            iframe_origin: DEFAULT_IFRAME_ORIGIN.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Resolves the config baked in at build time. Invalid overrides fall
    /// back to the defaults. Returns the config and the source of each field.
    #[must_use]
    pub fn resolve() -> (Self, [&'static str; 2]) {
        Self::resolve_with(option_env!("RELAY_IFRAME_ORIGIN"), option_env!("RELAY_API_BASE_URL"))
    }

    #[must_use]
    pub fn resolve_with(
        iframe_origin: Option<&str>,
        api_base_url: Option<&str>,
    ) -> (Self, [&'static str; 2]) {
        let (iframe_origin, iframe_source) = resolve_field(
            iframe_origin,
            ENV_IFRAME_ORIGIN,
            DEFAULT_IFRAME_ORIGIN,
            normalize_origin,
        );
        let (api_base_url, api_source) = resolve_field(
            api_base_url,
            ENV_API_BASE_URL,
            DEFAULT_API_BASE_URL,
            normalize_base_url,
        );
        (
            Self {
                iframe_origin,
                api_base_url,
            },
            [iframe_source, api_source],
        )
    }
}

fn resolve_field(
    value: Option<&str>,
    field: &'static str,
    default: &str,
    normalize: fn(&str, &'static str) -> Result<String, ConfigError>,
) -> (String, &'static str) {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return (default.to_string(), CONFIG_SOURCE_DEFAULT);
    };
    match normalize(value, field) {
        Ok(normalized) => (normalized, field),
        Err(error) => {
            tracing::error!(%error, value, "ignoring invalid widget config override");
            (default.to_string(), CONFIG_SOURCE_DEFAULT)
        }
    }
}

fn parse_http_url(raw: &str, field: &'static str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl { field })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidUrl { field });
    }
    Ok(url)
}

/// Reduces an http(s) URL to its ASCII origin (lowercased host, default
/// port dropped, no path). Only this form compares equal to
/// `MessageEvent.origin`.
pub fn normalize_origin(raw: &str, field: &'static str) -> Result<String, ConfigError> {
    Ok(parse_http_url(raw, field)?.origin().ascii_serialization())
}

/// Validates an http(s) URL with a host and drops trailing slashes so paths
/// can be joined onto it.
pub fn normalize_base_url(raw: &str, field: &'static str) -> Result<String, ConfigError> {
    let url = parse_http_url(raw, field)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}
