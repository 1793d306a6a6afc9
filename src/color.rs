//! Color token validation

use std::fmt::Write;

use crate::models::Color;

/// Color used whenever a submitted token is not a valid `#rrggbb` value
pub const FALLBACK_COLOR: &str = "#ffffff";

lazy_static::lazy_static! {
    static ref COLOR_REGEX: regex::Regex = regex::Regex::new("^#[0-9a-fA-F]{6}$").unwrap();
}

/// Normalize a raw color token
///
/// The token is trimmed and returned as-is (case preserved) if it is `#` followed by exactly
/// six hexadecimal digits. Anything else yields [FALLBACK_COLOR].
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();

    if COLOR_REGEX.is_match(trimmed) {
        trimmed.to_owned()
    } else {
        if !trimmed.is_empty() {
            debug!(color = ?raw, "invalid color token, using fallback");
        }

        FALLBACK_COLOR.to_owned()
    }
}

/// Decode a valid color token into its RGB components
pub fn parse(raw: &str) -> Option<Color> {
    let trimmed = raw.trim();

    if !COLOR_REGEX.is_match(trimmed) {
        return None;
    }

    let mut rgb = [0u8; 3];
    hex::decode_to_slice(&trimmed[1..], &mut rgb).ok()?;

    Some(Color::new(rgb[0], rgb[1], rgb[2]))
}

/// Append an ANSI truecolor swatch for the given color to `buf`
pub fn write_swatch(color: Color, buf: &mut String) -> std::fmt::Result {
    write!(
        buf,
        "\x1B[38;2;{};{};{}m\u{2588}\u{2588}\x1B[0m",
        color.red, color.green, color.blue
    )
}
