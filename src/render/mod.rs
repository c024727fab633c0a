//! Compose the square palette image: optional source photo on top, one
//! vertical swatch per color, and hex/name labels in contrasting text.

pub mod layout;
pub mod text;

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use crate::cancel::CancelToken;
use crate::color::Color;
use crate::error::{PaletteError, Result};
use crate::pipeline::contrast::contrast_text_color;
use crate::pipeline::load::{decode_image, load_image};

use layout::{cover_fit, font_size, source_height, swatches, CANVAS_SIZE, NAME_WIDTH_FRACTION};
pub use text::Fonts;

/// Output JPEG quality.
pub const JPEG_QUALITY: u8 = 85;

/// Where the photo above the swatches comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Image(&'a DynamicImage),
    Bytes(&'a [u8]),
    Path(&'a Path),
}

impl<'a> Source<'a> {
    fn resolve(self) -> Result<Cow<'a, DynamicImage>> {
        match self {
            Source::Image(img) => Ok(Cow::Borrowed(img)),
            Source::Bytes(bytes) => decode_image(bytes).map(Cow::Owned),
            Source::Path(path) => load_image(path).map(Cow::Owned),
        }
    }
}

/// Everything the renderer needs for one image.
#[derive(Debug, Clone, Copy)]
pub struct PaletteImage<'a> {
    pub colors: &'a [Color],
    /// Color names, parallel to `colors`. Missing entries are skipped.
    pub names: &'a [String],
    /// Hex labels, parallel to `colors`. Missing entries fall back to the
    /// color's own hex code.
    pub hex_codes: &'a [String],
    pub source: Option<Source<'a>>,
    pub show_hex: bool,
    pub show_names: bool,
}

impl<'a> PaletteImage<'a> {
    /// Bare swatches: no labels, no source photo.
    pub fn new(colors: &'a [Color]) -> Self {
        Self {
            colors,
            names: &[],
            hex_codes: &[],
            source: None,
            show_hex: false,
            show_names: false,
        }
    }

    pub fn with_labels(mut self, hex_codes: &'a [String], names: &'a [String]) -> Self {
        self.hex_codes = hex_codes;
        self.names = names;
        self
    }

    pub fn with_source(mut self, source: Source<'a>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn show_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    pub fn show_names(mut self, show: bool) -> Self {
        self.show_names = show;
        self
    }

    fn hex_label(&self, index: usize) -> String {
        let hex = match self.hex_codes.get(index) {
            Some(code) => code.clone(),
            None => self.colors[index].to_hex(),
        };
        hex.strip_prefix('#').map(str::to_string).unwrap_or(hex)
    }
}

/// Palette image renderer. Holds parsed fonts; cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    fonts: Fonts,
}

impl Renderer {
    pub fn new(fonts: Fonts) -> Self {
        Self { fonts }
    }

    /// Renderer using the built-in font faces.
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(Fonts::embedded()?))
    }

    /// Render a 1400x1400 opaque image.
    pub fn render(&self, config: &PaletteImage<'_>) -> Result<RgbImage> {
        self.render_cancellable(config, &CancelToken::new())
    }

    /// [`Renderer::render`], checking `cancel` after the source photo and
    /// before each swatch.
    pub fn render_cancellable(
        &self,
        config: &PaletteImage<'_>,
        cancel: &CancelToken,
    ) -> Result<RgbImage> {
        if config.colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut canvas = RgbImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, Rgb([255, 255, 255]));

        if let Some(source) = config.source {
            let source = source.resolve()?;
            cancel.check("source decoding")?;
            draw_cover(&mut canvas, &source)?;
        }

        let size = font_size(config.colors.len());
        let bold = self.fonts.bold(size);
        let regular = self.fonts.regular(size);

        let bars = swatches(config.colors.len(), config.source.is_some());
        for (i, (color, bar)) in config.colors.iter().zip(&bars).enumerate() {
            cancel.check("swatch drawing")?;
            fill_rect(&mut canvas, bar.columns(), bar.rows(), *color);

            let ink = contrast_text_color(*color).color();
            let anchors = bar.text_layout(size);

            if config.show_hex {
                let label = config.hex_label(i);
                bold.draw_centered(&mut canvas, &label, bar.center_x(), anchors.hex_baseline, ink);
            }

            if config.show_names {
                if let Some(name) = config.names.get(i) {
                    let mut baseline = anchors.name_baseline;
                    for line in regular.wrap(name, bar.width * NAME_WIDTH_FRACTION) {
                        regular.draw_centered(&mut canvas, &line, bar.center_x(), baseline, ink);
                        baseline += anchors.line_height;
                    }
                }
            }
        }

        log::debug!(
            "rendered {} swatches (source: {}, hex: {}, names: {})",
            config.colors.len(),
            config.source.is_some(),
            config.show_hex,
            config.show_names
        );
        Ok(canvas)
    }
}

/// Center-crop `source` to the photo area's aspect ratio and scale it to fill.
fn draw_cover(canvas: &mut RgbImage, source: &DynamicImage) -> Result<()> {
    let (src_width, src_height) = source.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(PaletteError::BadSource {
            message: format!("source image is {src_width}x{src_height}"),
            source: None,
        });
    }

    let target_height = source_height();
    let fit = cover_fit(src_width, src_height, CANVAS_SIZE, target_height);
    let cropped = source
        .crop_imm(fit.x, fit.y, fit.width, fit.height)
        .resize_exact(CANVAS_SIZE, target_height, FilterType::Lanczos3)
        .to_rgb8();
    imageops::replace(canvas, &cropped, 0, 0);
    Ok(())
}

fn fill_rect(
    canvas: &mut RgbImage,
    columns: std::ops::Range<u32>,
    rows: std::ops::Range<u32>,
    color: Color,
) {
    let pixel = color.to_rgb8();
    for y in rows {
        for x in columns.clone() {
            canvas.put_pixel(x, y, pixel);
        }
    }
}

/// Encode a rendered canvas as JPEG.
pub fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(canvas)
        .map_err(PaletteError::encode)?;
    Ok(buf.into_inner())
}
