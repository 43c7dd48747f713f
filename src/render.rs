//! Rendering a [`LogoConfig`] to SVG markup.
//!
//! The picture has a fixed 2:1 canvas. From back to front:
//!
//! 1. A background rectangle filled with `bgColor`
//! 2. The wordmark line: the first character of `textMain` in `colorMain`,
//!    the rest in `colorMainRest`, then `textSecondary` in `colorSecondary`
//!    shifted right by `gapSize`
//! 3. The tagline, centered below in `colorTagline`
//!
//! Rendering is pure and infallible: any strings and any numbers produce
//! well-formed markup, and the same config always produces the same bytes.

use std::fmt::Write as _;

use tracing::debug;

use crate::config::LogoConfig;

/// Canvas width in user units.
pub const CANVAS_WIDTH: f64 = 400.0;
/// Canvas height in user units.
pub const CANVAS_HEIGHT: f64 = 200.0;

const WORDMARK_BASELINE: f64 = 115.0;
const WORDMARK_FONT_SIZE: f64 = 72.0;
const TAGLINE_BASELINE: f64 = 160.0;
const TAGLINE_FONT_SIZE: f64 = 22.0;

// ============================================================================
// LogoSvg
// ============================================================================

/// A rendered logo: SVG markup plus its intrinsic size.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoSvg {
    markup: String,
    width: f64,
    height: f64,
}

impl LogoSvg {
    /// The SVG document as a string.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Intrinsic width in user units.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Intrinsic height in user units.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Consumes the logo, returning the SVG document.
    pub fn into_markup(self) -> String {
        self.markup
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders `config` to an SVG document.
///
/// ```
/// use logoforge::{render_logo, LogoConfig};
///
/// let svg = render_logo(&LogoConfig::default());
/// assert!(svg.markup().starts_with("<svg"));
/// assert!(svg.markup().contains(">imo</tspan>"));
/// assert_eq!(svg.width() / svg.height(), 2.0);
/// ```
pub fn render_logo(config: &LogoConfig) -> LogoSvg {
    let mut svg = String::with_capacity(1024);

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = fmt_num(CANVAS_WIDTH),
        h = fmt_num(CANVAS_HEIGHT),
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&config.bg_color)
    );

    write_wordmark(&mut svg, config);
    write_tagline(&mut svg, config);

    svg.push_str("</svg>");

    debug!(bytes = svg.len(), text_main = %config.text_main, "rendered logo svg");

    LogoSvg {
        markup: svg,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    }
}

fn write_wordmark(svg: &mut String, config: &LogoConfig) {
    let spacing = fmt_num(config.letter_spacing_main * WORDMARK_FONT_SIZE);

    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\">",
        fmt_num(CANVAS_WIDTH / 2.0),
        fmt_num(WORDMARK_BASELINE),
        escape_xml(&config.font_family),
        fmt_num(WORDMARK_FONT_SIZE),
    );

    let (first, rest) = split_first_char(&config.text_main);
    if !first.is_empty() {
        let _ = write!(
            svg,
            "<tspan fill=\"{}\" letter-spacing=\"{spacing}\">{}</tspan>",
            escape_xml(&config.color_main),
            escape_xml(first),
        );
    }
    if !rest.is_empty() {
        let _ = write!(
            svg,
            "<tspan fill=\"{}\" letter-spacing=\"{spacing}\">{}</tspan>",
            escape_xml(&config.color_main_rest),
            escape_xml(rest),
        );
    }
    if !config.text_secondary.is_empty() {
        let _ = write!(
            svg,
            "<tspan dx=\"{}\" fill=\"{}\" letter-spacing=\"0\">{}</tspan>",
            fmt_num(config.gap_size),
            escape_xml(&config.color_secondary),
            escape_xml(&config.text_secondary),
        );
    }

    svg.push_str("</text>");
}

fn write_tagline(svg: &mut String, config: &LogoConfig) {
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" letter-spacing=\"{}\" fill=\"{}\">{}</text>",
        fmt_num(CANVAS_WIDTH / 2.0),
        fmt_num(TAGLINE_BASELINE),
        escape_xml(&config.font_family),
        fmt_num(TAGLINE_FONT_SIZE),
        fmt_num(config.letter_spacing_tagline * TAGLINE_FONT_SIZE),
        escape_xml(&config.color_tagline),
        escape_xml(&config.text_tagline),
    );
}

/// Splits off the first character (Unicode scalar value).
fn split_first_char(text: &str) -> (&str, &str) {
    match text.chars().next() {
        Some(c) => text.split_at(c.len_utf8()),
        None => ("", ""),
    }
}

/// Formats a number compactly and deterministically: at most four decimals,
/// no trailing zeros. Non-finite values render as `0`.
fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let formatted = format!("{value:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
