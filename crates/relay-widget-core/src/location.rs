//! Host page URL handling: the reported location and query bookkeeping.

use url::Url;

/// Query key that asks the widget to open as soon as it initializes.
///
/// Matched as a parsed query key, so `?x=relay_open` or `?relay_opened=1`
/// do not open the widget, unlike a plain substring check on the query.
pub const OPEN_MARKER_KEY: &str = "relay_open";

/// Query keys the embedded app appends to host page links. Cleared once the
/// widget has consumed them.
pub const WIDGET_QUERY_KEYS: [&str; 9] = [
    OPEN_MARKER_KEY,
    "message_id",
    "bucket",
    "parent_message_id",
    "relay_password_reset",
    "relay_token",
    "room_name",
    "toast_message",
    "toast_type",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub href: String,
    pub origin: String,
    pub pathname: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
}

impl PageLocation {
    /// Falls back to treating `href` as an opaque value with a root path
    /// when it does not parse, so callers always get a location.
    #[must_use]
    pub fn from_href(href: &str) -> Self {
        match Url::parse(href) {
            Ok(url) => Self {
                href: url.as_str().to_string(),
                origin: url.origin().ascii_serialization(),
                pathname: url.path().to_string(),
                query: url.query().map(ToString::to_string),
            },
            Err(error) => {
                tracing::warn!(%error, href, "could not parse page location");
                Self {
                    href: href.to_string(),
                    origin: String::new(),
                    pathname: "/".to_string(),
                    query: None,
                }
            }
        }
    }

    #[must_use]
    pub fn has_open_marker(&self) -> bool {
        self.query_pairs().any(|(key, _)| key == OPEN_MARKER_KEY)
    }

    /// `origin + pathname + ?remaining`, with every widget key removed.
    /// Returns `None` when the URL would not change.
    #[must_use]
    pub fn without_widget_params(&self) -> Option<String> {
        let pairs: Vec<(String, String)> = self.query_pairs().collect();
        let remaining: Vec<&(String, String)> = pairs
            .iter()
            .filter(|(key, _)| !WIDGET_QUERY_KEYS.contains(&key.as_str()))
            .collect();
        if remaining.len() == pairs.len() {
            return None;
        }

        let mut url = format!("{}{}", self.origin, self.pathname);
        if !remaining.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(remaining.iter().map(|(key, value)| (key, value)))
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        Some(url)
    }

    /// Location reported to the embedded app. A loader `path` override is
    /// joined to the page origin; an override that does not form a valid URL
    /// is logged and the real location is reported instead.
    #[must_use]
    pub fn reported_href(&self, path_override: Option<&str>) -> String {
        let Some(path) = path_override else {
            return self.href.clone();
        };
        let candidate = format!("{}{path}", self.origin);
        match Url::parse(&candidate) {
            Ok(_) => candidate,
            Err(error) => {
                tracing::error!(
                    %error,
                    path,
                    "invalid path override for relay; pass only the pathname, not the entire URL"
                );
                self.href.clone()
            }
        }
    }

    fn query_pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        url::form_urlencoded::parse(self.query.as_deref().unwrap_or_default().as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_href_splits_components() {
        let location = PageLocation::from_href("https://shop.example.com/cart?item=1#top");
        assert_eq!(location.origin, "https://shop.example.com");
        assert_eq!(location.pathname, "/cart");
        assert_eq!(location.query.as_deref(), Some("item=1"));
    }

    #[test]
    fn open_marker_is_a_query_key() {
        assert!(PageLocation::from_href("https://a.example/?relay_open=1").has_open_marker());
        assert!(PageLocation::from_href("https://a.example/?x=1&relay_open").has_open_marker());
        assert!(!PageLocation::from_href("https://a.example/?x=relay_open").has_open_marker());
        assert!(!PageLocation::from_href("https://a.example/?relay_opened=1").has_open_marker());
        assert!(!PageLocation::from_href("https://a.example/").has_open_marker());
    }

    #[test]
    fn strips_only_widget_keys() {
        let location = PageLocation::from_href(
            "https://a.example/page?relay_open=1&foo=bar&room_name=general&toast_type=info",
        );
        assert_eq!(
            location.without_widget_params().as_deref(),
            Some("https://a.example/page?foo=bar")
        );
    }

    #[test]
    fn strips_question_mark_when_nothing_remains() {
        let location = PageLocation::from_href("https://a.example/page?relay_token=abc");
        assert_eq!(
            location.without_widget_params().as_deref(),
            Some("https://a.example/page")
        );
    }

    #[test]
    fn unchanged_url_yields_none() {
        let location = PageLocation::from_href("https://a.example/page?foo=bar");
        assert_eq!(location.without_widget_params(), None);
    }

    #[test]
    fn reserializes_remaining_values() {
        let location =
            PageLocation::from_href("https://a.example/?q=hello%20world&message_id=42");
        assert_eq!(
            location.without_widget_params().as_deref(),
            Some("https://a.example/?q=hello+world")
        );
    }

    #[test]
    fn reported_href_uses_path_override() {
        let location = PageLocation::from_href("https://a.example/real?x=1");
        assert_eq!(location.reported_href(None), "https://a.example/real?x=1");
        assert_eq!(
            location.reported_href(Some("/docs/intro")),
            "https://a.example/docs/intro"
        );
    }

    #[test]
    fn reported_href_falls_back_on_invalid_override() {
        let location = PageLocation::from_href("https://a.example/real");
        assert_eq!(
            location.reported_href(Some(":99999999/x")),
            "https://a.example/real"
        );
    }
}
