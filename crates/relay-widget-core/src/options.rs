//! Options read from the loader script's own URL, e.g.
//! `<script src="https://cdn.example/relay.js?position=left&button_color=ff0000">`.

use serde::Serialize;
use url::Url;

use crate::validation::normalize_button_color;

pub const PARAM_PATH: &str = "path";
pub const PARAM_POSITION: &str = "position";
pub const PARAM_BUTTON_COLOR: &str = "button_color";
pub const PARAM_BUTTON_BOTTOM: &str = "button_bottom";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Left,
    #[default]
    Right,
}

impl Position {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "left" { Self::Left } else { Self::Right }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoaderOptions {
    /// Pathname reported to the embedded app instead of the real one.
    pub path: Option<String>,
    pub position: Position,
    /// Already validated and `#`-prefixed.
    pub button_color: Option<String>,
    /// CSS length for the button's `bottom` offset.
    pub button_bottom: Option<String>,
}

impl LoaderOptions {
    /// Missing or unparsable script URLs yield the defaults.
    #[must_use]
    pub fn from_script_src(src: Option<&str>) -> Self {
        let Some(src) = src.map(str::trim).filter(|src| !src.is_empty()) else {
            return Self::default();
        };
        match Url::parse(src) {
            Ok(url) => Self::from_query_pairs(url.query_pairs()),
            Err(error) => {
                tracing::warn!(%error, src, "could not parse loader script url");
                Self::default()
            }
        }
    }

    fn from_query_pairs<'a>(
        pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    ) -> Self {
        let mut options = Self::default();
        let mut seen = Vec::new();
        for (key, value) in pairs {
            // First occurrence wins, like URLSearchParams.get.
            if seen.iter().any(|existing: &String| existing == key.as_ref()) {
                continue;
            }
            seen.push(key.to_string());
            match key.as_ref() {
                PARAM_PATH => options.path = non_empty(&value),
                PARAM_POSITION => options.position = Position::parse(&value),
                PARAM_BUTTON_COLOR => {
                    options.button_color = normalize_button_color(&value);
                    if options.button_color.is_none() {
                        tracing::warn!(value = %value, "ignoring invalid button_color");
                    }
                }
                PARAM_BUTTON_BOTTOM => options.button_bottom = non_empty(&value),
                _ => {}
            }
        }
        options
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
