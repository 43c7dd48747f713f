//! logoforge: wordmark logo customization with AI-assisted edits
//!
//! This crate models a two-part wordmark logo (main text, secondary glyph and
//! tagline), renders it to SVG, exports SVG and supersampled PNG files, and can
//! ask a generative-AI service to propose a modified configuration from a
//! natural-language prompt.
//!
//! # Example
//!
//! ```
//! use logoforge::{LogoEdit, LogoStudio, Slider};
//!
//! let mut studio = LogoStudio::new();
//! studio.edit(LogoEdit::TextMain("Acme".into())).unwrap();
//! studio.edit(LogoEdit::Slider(Slider::GapSize, 32.0)).unwrap();
//!
//! let svg = studio.render();
//! assert!(svg.markup().contains(">cme<"));
//!
//! let file = studio.export_svg();
//! assert_eq!(file.file_name, "Acme_V_logo.svg");
//! ```
//!
//! # Working Without the Studio
//!
//! The pieces are usable on their own: build a [`LogoConfig`] (or merge a
//! [`LogoConfigPatch`] over the default), render it with [`render_logo`] and
//! hand the result to an [`Exporter`].
//!
//! ```
//! use logoforge::{render_logo, Exporter, ExportOptions, LogoConfig, LogoConfigPatch};
//!
//! let patch = LogoConfigPatch::from_json(r##"{"bgColor": "#1E3A8A"}"##).unwrap();
//! let config = LogoConfig::default().merged(&patch);
//! config.validate().unwrap();
//!
//! let svg = render_logo(&config);
//! let png = Exporter::without_system_fonts()
//!     .export_png(&config, &svg, &ExportOptions::default())
//!     .unwrap();
//! assert_eq!(png.content_type, "image/png");
//! ```

pub mod ai;
mod color;
mod config;
mod edit;
mod export;
mod render;
mod studio;

#[cfg(feature = "cli")]
pub mod cli;

pub use color::{ColorError, format_hex, is_valid_color, parse_color};
pub use config::{ConfigError, FontOption, LogoConfig, LogoConfigPatch};
pub use edit::{ColorSlot, LogoEdit, Slider, SliderRange};
pub use export::{
    DEFAULT_SUPERSAMPLE, ExportArtifact, ExportError, ExportFormat, ExportOptions, Exporter,
    PNG_CONTENT_TYPE, SVG_CONTENT_TYPE, export_file_name, export_svg,
};
pub use render::{CANVAS_HEIGHT, CANVAS_WIDTH, LogoSvg, render_logo};
pub use studio::{
    GenerationOutcome, GenerationRequest, GenerationState, LogoStudio, StudioError,
};
