/// Returns true for 3, 4, 6 or 8 hex digits with an optional leading `#`.
#[must_use]
pub fn is_hex_color(input: &str) -> bool {
    let digits = input.strip_prefix('#').unwrap_or(input);
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

/// Normalizes a loader `button_color` value (given without `#` so it needs no
/// URL encoding) into a CSS color, or `None` when it is not a hex color.
#[must_use]
pub fn normalize_button_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('#') {
        return None;
    }
    let candidate = format!("#{trimmed}");
    is_hex_color(&candidate).then_some(candidate)
}
