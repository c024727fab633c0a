//! Font loading, measurement, wrapping and glyph rasterization.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::RgbImage;

use crate::color::Color;
use crate::error::{PaletteError, Result};

const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Spaces count for less than their advance when deciding where to wrap.
const SPACE_TIGHTENING: f32 = 0.8;

/// The regular and bold faces of one family.
#[derive(Clone)]
pub struct Fonts {
    regular: FontArc,
    bold: FontArc,
}

impl Fonts {
    /// The faces built into the binary.
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            regular: FontArc::try_from_slice(REGULAR_TTF)
                .map_err(|e| PaletteError::asset("parse regular font", e))?,
            bold: FontArc::try_from_slice(BOLD_TTF)
                .map_err(|e| PaletteError::asset("parse bold font", e))?,
        })
    }

    /// Faces from caller-supplied TrueType bytes.
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self> {
        Ok(Self {
            regular: FontArc::try_from_vec(regular)
                .map_err(|e| PaletteError::asset("parse regular font", e))?,
            bold: FontArc::try_from_vec(bold)
                .map_err(|e| PaletteError::asset("parse bold font", e))?,
        })
    }

    pub(crate) fn regular(&self, size: u32) -> Face<'_> {
        Face::new(&self.regular, size)
    }

    pub(crate) fn bold(&self, size: u32) -> Face<'_> {
        Face::new(&self.bold, size)
    }
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts").finish_non_exhaustive()
    }
}

/// A font at a fixed em size in pixels.
pub(crate) struct Face<'a> {
    font: &'a FontArc,
    scale: PxScale,
}

impl<'a> Face<'a> {
    fn new(font: &'a FontArc, size: u32) -> Self {
        // PxScale is ascent-to-descent height; convert so `size` is the em.
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let scale = PxScale::from(size as f32 * font.height_unscaled() / units_per_em);
        Self { font, scale }
    }

    /// Glyph ids with the pen offset of each, kerning applied.
    fn layout(&self, text: &str, origin_x: f32) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = origin_x;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
        (glyphs, caret - origin_x)
    }

    /// Advance width of `text`.
    pub fn measure(&self, text: &str) -> f32 {
        self.layout(text, 0.0).1
    }

    /// Draw `text` with its left edge at `x` and baseline at `baseline`,
    /// alpha-blending glyph coverage over the canvas.
    pub fn draw(&self, canvas: &mut RgbImage, text: &str, x: f32, baseline: f32, color: Color) {
        let (width, height) = canvas.dimensions();
        let (glyphs, _) = self.layout(text, x);
        for (id, pen_x) in glyphs {
            let glyph = id.with_scale_and_position(self.scale, point(pen_x, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                blend(pixel, color, coverage.clamp(0.0, 1.0));
            });
        }
    }

    /// Draw `text` horizontally centered on `center_x`.
    pub fn draw_centered(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        center_x: f32,
        baseline: f32,
        color: Color,
    ) {
        let width = self.measure(text);
        self.draw(canvas, text, center_x - width / 2.0, baseline, color);
    }

    /// Greedy word wrap to `max_width`. A single word wider than the limit
    /// still gets its own line.
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let space = self.measure(" ") * SPACE_TIGHTENING;

        let mut lines = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_width = 0.0;
        for word in text.split_whitespace() {
            let word_width = self.measure(word);
            if current.is_empty() {
                current.push(word);
                current_width = word_width;
                continue;
            }
            let candidate = current_width + space + word_width;
            if candidate <= max_width {
                current.push(word);
                current_width = candidate;
            } else {
                lines.push(current.join(" "));
                current = vec![word];
                current_width = word_width;
            }
        }
        if !current.is_empty() {
            lines.push(current.join(" "));
        }
        lines
    }
}

fn blend(pixel: &mut image::Rgb<u8>, color: Color, alpha: f32) {
    let mix = |bg: u8, fg: u8| (bg as f32 * (1.0 - alpha) + fg as f32 * alpha).round() as u8;
    pixel.0 = [
        mix(pixel.0[0], color.r),
        mix(pixel.0[1], color.g),
        mix(pixel.0[2], color.b),
    ];
}
