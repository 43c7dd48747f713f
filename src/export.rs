//! Exporting a rendered logo as downloadable files.
//!
//! - **SVG**: the rendered markup, verbatim.
//! - **PNG**: the markup rasterized with resvg at a multiple of the displayed
//!   size (4x by default), composited over a base layer of `bgColor`, then
//!   encoded with the `image` crate.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::color::parse_color;
use crate::config::LogoConfig;
use crate::render::{CANVAS_HEIGHT, CANVAS_WIDTH, LogoSvg};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml;charset=utf-8";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Supersampling factor applied to the displayed size for PNG output.
pub const DEFAULT_SUPERSAMPLE: f32 = 4.0;

/// Largest raster side, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 16_384;
/// Largest raster area, in pixels (1 GiB of RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 1 << 28;

// ============================================================================
// Errors
// ============================================================================

/// Error returned when an export cannot be produced or written.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to parse rendered svg: {0}")]
    Parse(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("failed to encode png: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Formats and Artifacts
// ============================================================================

/// A downloadable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Svg => SVG_CONTENT_TYPE,
            Self::Png => PNG_CONTENT_TYPE,
        }
    }
}

/// Builds the download name `{textMain}_{textSecondary}_logo.{ext}`.
///
/// Path separators and control characters in the texts become `_` so the
/// name always stays a single path component.
pub fn export_file_name(config: &LogoConfig, format: ExportFormat) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| match c {
                '/' | '\\' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    format!(
        "{}_{}_logo.{}",
        sanitize(&config.text_main),
        sanitize(&config.text_secondary),
        format.extension()
    )
}

/// A finished export: file name, content type and bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Writes the artifact into `dir` under its file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = self.bytes.len(), "wrote export");
        Ok(path)
    }
}

// ============================================================================
// Options
// ============================================================================

/// Size of the raster output.
///
/// The displayed size is what the preview occupies on screen; the output is
/// `display * scale` pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub display_width: f32,
    pub display_height: f32,
    pub scale: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            display_width: CANVAS_WIDTH as f32,
            display_height: CANVAS_HEIGHT as f32,
            scale: DEFAULT_SUPERSAMPLE,
        }
    }
}

impl ExportOptions {
    /// Options for a preview shown `width` units wide (height follows the 2:1 canvas).
    pub fn for_display_width(width: f32) -> Self {
        Self {
            display_width: width,
            display_height: width * (CANVAS_HEIGHT / CANVAS_WIDTH) as f32,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Pixel size of the raster output. Degenerate inputs yield zero.
    pub fn output_size(&self) -> (u32, u32) {
        // `as` saturates: NaN and negatives become 0
        (
            (self.display_width * self.scale).round() as u32,
            (self.display_height * self.scale).round() as u32,
        )
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Produces SVG and PNG artifacts from a rendered logo.
///
/// Holds the resvg parsing options, including the font database used to
/// shape text, so fonts are loaded once rather than per export.
pub struct Exporter {
    options: Options<'static>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// Creates an exporter with the system fonts loaded.
    pub fn new() -> Self {
        let mut exporter = Self::without_system_fonts();
        exporter.options.fontdb_mut().load_system_fonts();
        debug!(faces = exporter.options.fontdb.len(), "loaded system fonts");
        exporter
    }

    /// Creates an exporter with an empty font database.
    ///
    /// Text will not be drawn, but backgrounds and dimensions are exact.
    pub fn without_system_fonts() -> Self {
        Self {
            options: Options::default(),
        }
    }

    /// Exports the markup verbatim as an SVG file.
    pub fn export_svg(&self, config: &LogoConfig, svg: &LogoSvg) -> ExportArtifact {
        export_svg(config, svg)
    }

    /// Rasterizes and encodes a PNG file.
    ///
    /// On failure the error is logged and returned; nothing is produced.
    pub fn export_png(
        &self,
        config: &LogoConfig,
        svg: &LogoSvg,
        opts: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError> {
        let image = self
            .rasterize(svg, &config.bg_color, opts)
            .inspect_err(|e| warn!("png export aborted: {e}"))?;

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .inspect_err(|e| warn!("png encoding failed: {e}"))?;

        info!(
            width = image.width(),
            height = image.height(),
            bytes = bytes.len(),
            "exported png"
        );

        Ok(ExportArtifact {
            file_name: export_file_name(config, ExportFormat::Png),
            content_type: PNG_CONTENT_TYPE,
            bytes,
        })
    }

    /// Draws `svg` onto a pixel surface of `opts.output_size()`.
    ///
    /// The background color is painted as the base layer, then the artwork is
    /// composited over it.
    pub fn rasterize(
        &self,
        svg: &LogoSvg,
        bg_color: &str,
        opts: &ExportOptions,
    ) -> Result<RgbaImage, ExportError> {
        let (width, height) = opts.output_size();
        if !surface_fits(width, height) {
            return Err(ExportError::Surface { width, height });
        }

        let tree = Tree::from_str(svg.markup(), &self.options)?;
        let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Surface { width, height })?;

        let size = tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut base = RgbaImage::from_pixel(width, height, background_pixel(bg_color));
        composite_layer(&mut base, &pixmap_to_rgba_image(&pixmap));
        Ok(base)
    }
}

/// Exports the markup verbatim as an SVG file.
pub fn export_svg(config: &LogoConfig, svg: &LogoSvg) -> ExportArtifact {
    info!(bytes = svg.markup().len(), "exported svg");
    ExportArtifact {
        file_name: export_file_name(config, ExportFormat::Svg),
        content_type: SVG_CONTENT_TYPE,
        bytes: svg.markup().as_bytes().to_vec(),
    }
}

fn surface_fits(width: u32, height: u32) -> bool {
    width > 0
        && height > 0
        && width <= MAX_SURFACE_SIDE
        && height <= MAX_SURFACE_SIDE
        && u64::from(width) * u64::from(height) <= MAX_SURFACE_PIXELS
}

fn background_pixel(bg_color: &str) -> Rgba<u8> {
    match parse_color(bg_color) {
        Ok(c) => Rgba([c.red, c.green, c.blue, c.alpha]),
        Err(e) => {
            warn!("unusable background color, using transparent: {e}");
            Rgba([0, 0, 0, 0])
        }
    }
}

// ============================================================================
// Pixel Helpers
// ============================================================================

/// Converts a tiny_skia Pixmap (premultiplied) to a straight-alpha RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}

/// Composites `layer` over `base` (source-over). Both must be the same size;
/// extra pixels on either side are ignored.
fn composite_layer(base: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        *dst = source_over(*src, *dst);
    }
}

fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let out = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        out.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================
