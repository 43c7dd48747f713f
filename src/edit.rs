//! Manual edits coming from the form controls.
//!
//! Every [`LogoEdit`] is a total function from one complete config to the
//! next. Inputs are typed the way the controls produce them: a picker yields
//! an opaque color, the font selector yields a [`FontOption`], and sliders
//! yield any number that is then clamped and snapped like an HTML range input.

use palette::Srgb;

use crate::color::format_hex;
use crate::config::{FontOption, LogoConfig};

// ============================================================================
// Color Slots
// ============================================================================

/// The five color pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    /// First letter of the wordmark.
    Main,
    /// Remaining letters of the wordmark.
    MainRest,
    Secondary,
    Tagline,
    Background,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 5] = [
        ColorSlot::Main,
        ColorSlot::MainRest,
        ColorSlot::Secondary,
        ColorSlot::Tagline,
        ColorSlot::Background,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "First Letter",
            Self::MainRest => "Rest of Name",
            Self::Secondary => "Secondary",
            Self::Tagline => "Tagline",
            Self::Background => "Background",
        }
    }

    /// Reads the color string this slot controls.
    pub fn get(self, config: &LogoConfig) -> &str {
        match self {
            Self::Main => &config.color_main,
            Self::MainRest => &config.color_main_rest,
            Self::Secondary => &config.color_secondary,
            Self::Tagline => &config.color_tagline,
            Self::Background => &config.bg_color,
        }
    }

    fn field_mut(self, config: &mut LogoConfig) -> &mut String {
        match self {
            Self::Main => &mut config.color_main,
            Self::MainRest => &mut config.color_main_rest,
            Self::Secondary => &mut config.color_secondary,
            Self::Tagline => &mut config.color_tagline,
            Self::Background => &mut config.bg_color,
        }
    }
}

// ============================================================================
// Sliders
// ============================================================================

/// Inclusive range and step of a slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamps `value` into the range and snaps it to the nearest step.
    ///
    /// Non-finite input lands on `min`, which keeps the edit total.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }

        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).clamp(self.min, self.max);

        // Strip float noise (0.35000000000000003 -> 0.35)
        let scale = 10f64.powi(self.decimals());
        (snapped * scale).round() / scale
    }

    fn decimals(&self) -> i32 {
        let mut decimals = 0;
        let mut step = self.step;
        while decimals < 6 && (step - step.round()).abs() > 1e-9 {
            step *= 10.0;
            decimals += 1;
        }
        decimals
    }
}

/// The three numeric sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    LetterSpacingMain,
    GapSize,
    LetterSpacingTagline,
}

impl Slider {
    pub const ALL: [Slider; 3] = [
        Slider::LetterSpacingMain,
        Slider::GapSize,
        Slider::LetterSpacingTagline,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LetterSpacingMain => "Main Letter Spacing",
            Self::GapSize => "Gap Size",
            Self::LetterSpacingTagline => "Tagline Spacing",
        }
    }

    pub fn range(self) -> SliderRange {
        match self {
            Self::LetterSpacingMain => SliderRange::new(-0.1, 0.5, 0.01),
            Self::GapSize => SliderRange::new(-50.0, 100.0, 1.0),
            Self::LetterSpacingTagline => SliderRange::new(0.0, 1.0, 0.05),
        }
    }

    pub fn get(self, config: &LogoConfig) -> f64 {
        match self {
            Self::LetterSpacingMain => config.letter_spacing_main,
            Self::GapSize => config.gap_size,
            Self::LetterSpacingTagline => config.letter_spacing_tagline,
        }
    }

    fn field_mut(self, config: &mut LogoConfig) -> &mut f64 {
        match self {
            Self::LetterSpacingMain => &mut config.letter_spacing_main,
            Self::GapSize => &mut config.gap_size,
            Self::LetterSpacingTagline => &mut config.letter_spacing_tagline,
        }
    }
}

// ============================================================================
// LogoEdit
// ============================================================================

/// One manual change made through the form controls.
#[derive(Debug, Clone, PartialEq)]
pub enum LogoEdit {
    TextMain(String),
    TextSecondary(String),
    TextTagline(String),
    Color(ColorSlot, Srgb<u8>),
    Font(FontOption),
    Slider(Slider, f64),
}

impl LogoEdit {
    /// Produces the next config. `config` itself is left untouched.
    pub fn apply(&self, config: &LogoConfig) -> LogoConfig {
        let mut next = config.clone();
        match self {
            Self::TextMain(text) => next.text_main = text.clone(),
            Self::TextSecondary(text) => next.text_secondary = text.clone(),
            Self::TextTagline(text) => next.text_tagline = text.clone(),
            Self::Color(slot, color) => *slot.field_mut(&mut next) = format_hex(*color),
            Self::Font(font) => next.font_family = font.value().to_string(),
            Self::Slider(slider, value) => {
                *slider.field_mut(&mut next) = slider.range().snap(*value)
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_edits_replace_only_their_field() {
        let base = LogoConfig::default();
        let next = LogoEdit::TextTagline("BUILDERS".into()).apply(&base);

        assert_eq!(next.text_tagline, "BUILDERS");
        assert_eq!(next.text_main, base.text_main);
        assert_eq!(base.text_tagline, "CONSTRUCTION");
    }

    #[test]
    fn empty_text_is_allowed() {
        let next = LogoEdit::TextSecondary(String::new()).apply(&LogoConfig::default());
        assert_eq!(next.text_secondary, "");
        assert!(next.validate().is_ok());
    }

    #[test]
    fn color_edit_writes_picker_hex() {
        let next = LogoEdit::Color(ColorSlot::Background, Srgb::new(18, 52, 86))
            .apply(&LogoConfig::default());
        assert_eq!(next.bg_color, "#123456");
        assert_eq!(ColorSlot::Background.get(&next), "#123456");
    }

    #[test]
    fn font_edit_stores_stack() {
        let next = LogoEdit::Font(FontOption::CourierNew).apply(&LogoConfig::default());
        assert_eq!(next.font_family, "\"Courier New\", Courier, monospace");
    }

    #[test]
    fn slider_clamps_to_range() {
        let base = LogoConfig::default();
        assert_eq!(LogoEdit::Slider(Slider::GapSize, 500.0).apply(&base).gap_size, 100.0);
        assert_eq!(LogoEdit::Slider(Slider::GapSize, -500.0).apply(&base).gap_size, -50.0);
        assert_eq!(
            LogoEdit::Slider(Slider::LetterSpacingTagline, -1.0)
                .apply(&base)
                .letter_spacing_tagline,
            0.0
        );
    }

    #[test]
    fn slider_snaps_to_step() {
        let range = Slider::LetterSpacingTagline.range();
        assert_eq!(range.snap(0.34), 0.35);
        assert_eq!(range.snap(0.36), 0.35);

        let range = Slider::LetterSpacingMain.range();
        assert_eq!(range.snap(0.123), 0.12);
        assert_eq!(range.snap(-0.1), -0.1);

        assert_eq!(Slider::GapSize.range().snap(20.4), 20.0);
    }

    #[test]
    fn slider_handles_non_finite_input() {
        let range = Slider::GapSize.range();
        assert_eq!(range.snap(f64::NAN), -50.0);
        assert_eq!(range.snap(f64::INFINITY), -50.0);
    }

    #[test]
    fn every_slider_reads_back_its_edit() {
        for slider in Slider::ALL {
            let range = slider.range();
            let next = LogoEdit::Slider(slider, range.max).apply(&LogoConfig::default());
            assert_eq!(slider.get(&next), range.max);
        }
    }
}
