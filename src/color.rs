//! Color string parsing.
//!
//! Logo colors travel as strings (that is what the form controls, config files
//! and the completion service all speak), so every consumer goes through
//! [`parse_color`] to get real channel values.
//!
//! Accepted forms:
//! - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
//! - CSS named colors (`red`, `rebeccapurple`, ...), case-insensitive
//! - `transparent`

use std::str::FromStr;

use palette::{Srgb, Srgba};
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color string is empty")]
    Empty,

    #[error("unrecognized color {0:?}")]
    Unrecognized(String),
}

/// Parses a color string into 8-bit sRGB channels with alpha.
///
/// ```
/// use logoforge::parse_color;
///
/// let red = parse_color("#DC2626").unwrap();
/// assert_eq!((red.red, red.green, red.blue, red.alpha), (0xdc, 0x26, 0x26, 255));
///
/// let named = parse_color("White").unwrap();
/// assert_eq!((named.red, named.green, named.blue), (255, 255, 255));
/// ```
pub fn parse_color(input: &str) -> Result<Srgba<u8>, ColorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorError::Empty);
    }

    if trimmed.eq_ignore_ascii_case("transparent") {
        return Ok(Srgba::new(0, 0, 0, 0));
    }

    let parsed = match trimmed.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => palette::named::from_str(&trimmed.to_ascii_lowercase())
            .map(|c| Srgba::new(c.red, c.green, c.blue, 255)),
    };

    parsed.ok_or_else(|| ColorError::Unrecognized(input.to_string()))
}

/// Returns `true` if `input` is a color [`parse_color`] accepts.
pub fn is_valid_color(input: &str) -> bool {
    parse_color(input).is_ok()
}

/// Formats an opaque color the way an HTML color picker reports it (`#rrggbb`).
pub fn format_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

fn parse_hex(hex: &str) -> Option<Srgba<u8>> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        // palette handles the opaque short and long forms
        3 | 6 => {
            let rgb = Srgb::<u8>::from_str(hex).ok()?;
            Some(Srgba::new(rgb.red, rgb.green, rgb.blue, 255))
        }
        4 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Srgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?))
        }
        8 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Srgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(c: Srgba<u8>) -> (u8, u8, u8, u8) {
        (c.red, c.green, c.blue, c.alpha)
    }

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(channels(parse_color("#000000").unwrap()), (0, 0, 0, 255));
        assert_eq!(channels(parse_color("#fff").unwrap()), (255, 255, 255, 255));
        assert_eq!(channels(parse_color("#DC2626").unwrap()), (220, 38, 38, 255));
    }

    #[test]
    fn parses_hex_with_alpha() {
        assert_eq!(channels(parse_color("#ff000080").unwrap()), (255, 0, 0, 128));
        assert_eq!(channels(parse_color("#f008").unwrap()), (255, 0, 0, 136));
    }

    #[test]
    fn parses_named_and_transparent() {
        assert_eq!(channels(parse_color("Red").unwrap()), (255, 0, 0, 255));
        assert_eq!(channels(parse_color("  black ").unwrap()), (0, 0, 0, 255));
        assert_eq!(channels(parse_color("transparent").unwrap()), (0, 0, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#+f+f+f").is_err());
        assert!(parse_color("#ééé").is_err());
        assert!(parse_color("not-a-color").is_err());
        assert!(!is_valid_color("rgb(1, 2, 3)"));
    }

    #[test]
    fn formats_picker_hex() {
        assert_eq!(format_hex(Srgb::new(220, 38, 38)), "#dc2626");
        assert_eq!(format_hex(Srgb::new(0, 0, 0)), "#000000");
    }
}
