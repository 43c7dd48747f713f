//! The logo configuration model.
//!
//! A [`LogoConfig`] is always complete: every field is populated. Partial
//! changes are expressed as a [`LogoConfigPatch`] and merged over an existing
//! config to produce a new one, so a config is never mutated field-by-field
//! by outside code.
//!
//! # JSON Format
//!
//! Field names are camelCase. This is also the shape the completion service
//! is asked to produce.
//!
//! ```json
//! {
//!   "textMain": "Dimo",
//!   "textSecondary": "V",
//!   "textTagline": "CONSTRUCTION",
//!   "colorMain": "#DC2626",
//!   "colorMainRest": "#FFFFFF",
//!   "colorSecondary": "#DC2626",
//!   "colorTagline": "#FFFFFF",
//!   "bgColor": "#000000",
//!   "fontFamily": "Arial, Helvetica, sans-serif",
//!   "letterSpacingMain": 0.0,
//!   "letterSpacingTagline": 0.35,
//!   "gapSize": 20.0
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::is_valid_color;

// ============================================================================
// Errors
// ============================================================================

/// Error returned when a configuration is invalid or cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field `{field}` must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("field `{field}` is not a valid color: {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Font Options
// ============================================================================

/// The fixed set of font stacks offered by the font selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FontOption {
    Arial,
    Verdana,
    Georgia,
    TimesNewRoman,
    CourierNew,
    Impact,
    TrebuchetMs,
}

impl FontOption {
    /// All options, in selector order.
    pub const ALL: [FontOption; 7] = [
        FontOption::Arial,
        FontOption::Verdana,
        FontOption::Georgia,
        FontOption::TimesNewRoman,
        FontOption::CourierNew,
        FontOption::Impact,
        FontOption::TrebuchetMs,
    ];

    /// Human-readable label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Arial => "Arial (Standard)",
            Self::Verdana => "Verdana (Clean)",
            Self::Georgia => "Georgia (Serif)",
            Self::TimesNewRoman => "Times New Roman",
            Self::CourierNew => "Courier New (Tech)",
            Self::Impact => "Impact (Bold)",
            Self::TrebuchetMs => "Trebuchet MS",
        }
    }

    /// The CSS font stack stored in [`LogoConfig::font_family`].
    pub fn value(self) -> &'static str {
        match self {
            Self::Arial => "Arial, Helvetica, sans-serif",
            Self::Verdana => "Verdana, Geneva, sans-serif",
            Self::Georgia => "Georgia, serif",
            Self::TimesNewRoman => "\"Times New Roman\", Times, serif",
            Self::CourierNew => "\"Courier New\", Courier, monospace",
            Self::Impact => "Impact, Charcoal, sans-serif",
            Self::TrebuchetMs => "\"Trebuchet MS\", Helvetica, sans-serif",
        }
    }

    /// Finds the option whose font stack is exactly `value`.
    ///
    /// Returns `None` for stacks that did not come from the selector (for
    /// example, one proposed by the completion service).
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.value() == value)
    }
}

// ============================================================================
// LogoConfig
// ============================================================================

/// The complete set of visual parameters for one logo.
///
/// Colors are CSS color strings (see [`crate::parse_color`]). Letter spacing is
/// in em; `gap_size` is in canvas units (the canvas is 400x200).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct LogoConfig {
    /// Primary wordmark text.
    pub text_main: String,
    /// Secondary glyph drawn after the wordmark.
    pub text_secondary: String,
    /// Tagline drawn below the wordmark.
    pub text_tagline: String,

    /// Fill of the first wordmark character.
    pub color_main: String,
    /// Fill of the remaining wordmark characters.
    pub color_main_rest: String,
    pub color_secondary: String,
    pub color_tagline: String,
    pub bg_color: String,

    /// CSS font stack used for all text.
    pub font_family: String,

    pub letter_spacing_main: f64,
    pub letter_spacing_tagline: f64,
    /// Horizontal gap between the wordmark and the secondary glyph.
    pub gap_size: f64,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            text_main: "Dimo".to_string(),
            text_secondary: "V".to_string(),
            text_tagline: "CONSTRUCTION".to_string(),
            color_main: "#DC2626".to_string(),
            color_main_rest: "#FFFFFF".to_string(),
            color_secondary: "#DC2626".to_string(),
            color_tagline: "#FFFFFF".to_string(),
            bg_color: "#000000".to_string(),
            font_family: FontOption::Arial.value().to_string(),
            letter_spacing_main: 0.0,
            letter_spacing_tagline: 0.35,
            gap_size: 20.0,
        }
    }
}

impl LogoConfig {
    /// Checks that every number is finite and every color parses.
    ///
    /// Reports the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("letterSpacingMain", self.letter_spacing_main),
            ("letterSpacingTagline", self.letter_spacing_tagline),
            ("gapSize", self.gap_size),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        let colors = [
            ("colorMain", &self.color_main),
            ("colorMainRest", &self.color_main_rest),
            ("colorSecondary", &self.color_secondary),
            ("colorTagline", &self.color_tagline),
            ("bgColor", &self.bg_color),
        ];
        for (field, value) in colors {
            if !is_valid_color(value) {
                return Err(ConfigError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// Returns a new config with `patch` merged over this one.
    pub fn merged(&self, patch: &LogoConfigPatch) -> Self {
        patch.apply_to(self)
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a complete config from JSON. Every field must be present.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the JSON Schema describing this type.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LogoConfig)
    }
}

// ============================================================================
// LogoConfigPatch
// ============================================================================

/// A partial [`LogoConfig`]. Absent fields leave the base value untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_main_rest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing_main: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing_tagline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_size: Option<f64>,
}

impl LogoConfigPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produces a complete config: `base` with every present field replaced.
    pub fn apply_to(&self, base: &LogoConfig) -> LogoConfig {
        fn pick<T: Clone>(patch: &Option<T>, base: &T) -> T {
            patch.as_ref().unwrap_or(base).clone()
        }

        LogoConfig {
            text_main: pick(&self.text_main, &base.text_main),
            text_secondary: pick(&self.text_secondary, &base.text_secondary),
            text_tagline: pick(&self.text_tagline, &base.text_tagline),
            color_main: pick(&self.color_main, &base.color_main),
            color_main_rest: pick(&self.color_main_rest, &base.color_main_rest),
            color_secondary: pick(&self.color_secondary, &base.color_secondary),
            color_tagline: pick(&self.color_tagline, &base.color_tagline),
            bg_color: pick(&self.bg_color, &base.bg_color),
            font_family: pick(&self.font_family, &base.font_family),
            letter_spacing_main: pick(&self.letter_spacing_main, &base.letter_spacing_main),
            letter_spacing_tagline: pick(
                &self.letter_spacing_tagline,
                &base.letter_spacing_tagline,
            ),
            gap_size: pick(&self.gap_size, &base.gap_size),
        }
    }

    /// Layers `other` on top of this patch; fields present in `other` win.
    pub fn overlay(mut self, other: LogoConfigPatch) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            text_main,
            text_secondary,
            text_tagline,
            color_main,
            color_main_rest,
            color_secondary,
            color_tagline,
            bg_color,
            font_family,
            letter_spacing_main,
            letter_spacing_tagline,
            gap_size
        );
        self
    }

    /// Deserializes a patch from JSON. Any subset of fields is accepted.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a patch from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }
}

impl From<LogoConfig> for LogoConfigPatch {
    fn from(config: LogoConfig) -> Self {
        Self {
            text_main: Some(config.text_main),
            text_secondary: Some(config.text_secondary),
            text_tagline: Some(config.text_tagline),
            color_main: Some(config.color_main),
            color_main_rest: Some(config.color_main_rest),
            color_secondary: Some(config.color_secondary),
            color_tagline: Some(config.color_tagline),
            bg_color: Some(config.bg_color),
            font_family: Some(config.font_family),
            letter_spacing_main: Some(config.letter_spacing_main),
            letter_spacing_tagline: Some(config.letter_spacing_tagline),
            gap_size: Some(config.gap_size),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_logo() {
        let config = LogoConfig::default();
        assert_eq!(config.text_main, "Dimo");
        assert_eq!(config.text_secondary, "V");
        assert_eq!(config.text_tagline, "CONSTRUCTION");
        assert_eq!(config.color_main, "#DC2626");
        assert_eq!(config.color_main_rest, "#FFFFFF");
        assert_eq!(config.color_secondary, "#DC2626");
        assert_eq!(config.color_tagline, "#FFFFFF");
        assert_eq!(config.bg_color, "#000000");
        assert_eq!(config.font_family, "Arial, Helvetica, sans-serif");
        assert_eq!(config.letter_spacing_main, 0.0);
        assert_eq!(config.letter_spacing_tagline, 0.35);
        assert_eq!(config.gap_size, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_uses_camel_case() {
        let json = LogoConfig::default().to_json_pretty().unwrap();
        assert!(json.contains("\"textMain\""));
        assert!(json.contains("\"colorMainRest\""));
        assert!(json.contains("\"bgColor\""));
        assert!(json.contains("\"letterSpacingTagline\""));
        assert!(json.contains("\"gapSize\""));
    }

    #[test]
    fn full_config_requires_every_field() {
        let err = LogoConfig::from_json(r#"{"textMain": "Acme"}"#);
        assert!(err.is_err());

        let json = LogoConfig::default().to_json().unwrap();
        assert_eq!(LogoConfig::from_json(&json).unwrap(), LogoConfig::default());
    }

    #[test]
    fn patch_merges_over_base() {
        let patch = LogoConfigPatch::from_json(r##"{"textMain": "Acme", "gapSize": 42}"##).unwrap();
        let merged = LogoConfig::default().merged(&patch);

        assert_eq!(merged.text_main, "Acme");
        assert_eq!(merged.gap_size, 42.0);
        // Untouched fields come from the base
        assert_eq!(merged.text_secondary, "V");
        assert_eq!(merged.letter_spacing_tagline, 0.35);
    }

    #[test]
    fn empty_patch_is_identity() {
        let patch = LogoConfigPatch::from_json("{}").unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.apply_to(&LogoConfig::default()), LogoConfig::default());
    }

    #[test]
    fn overlay_prefers_later_patch() {
        let file = LogoConfigPatch {
            text_main: Some("File".into()),
            gap_size: Some(5.0),
            ..Default::default()
        };
        let flags = LogoConfigPatch {
            text_main: Some("Flag".into()),
            ..Default::default()
        };

        let combined = file.overlay(flags);
        assert_eq!(combined.text_main.as_deref(), Some("Flag"));
        assert_eq!(combined.gap_size, Some(5.0));
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        let config = LogoConfig {
            gap_size: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "gapSize", .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_colors() {
        let config = LogoConfig {
            color_tagline: "chartreusy".into(),
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidColor { field, value }) => {
                assert_eq!(field, "colorTagline");
                assert_eq!(value, "chartreusy");
            }
            other => panic!("expected InvalidColor, got {other:?}"),
        }
    }

    #[test]
    fn font_options_round_trip_through_value() {
        for option in FontOption::ALL {
            assert_eq!(FontOption::from_value(option.value()), Some(option));
        }
        assert_eq!(FontOption::from_value("Comic Sans MS"), None);
        assert_eq!(FontOption::TimesNewRoman.label(), "Times New Roman");
    }

    #[test]
    fn patch_from_missing_file_reports_path() {
        let err = LogoConfigPatch::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
