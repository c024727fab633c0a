//! Canvas geometry: swatch placement, text anchors and cover scaling.

use std::ops::Range;

/// Width and height of the square output canvas.
pub const CANVAS_SIZE: u32 = 1400;

pub const BASE_FONT_SIZE: u32 = 42;
pub const MIN_FONT_SIZE: u32 = 24;

/// Palettes longer than this shrink the font.
const FULL_SIZE_SWATCHES: usize = 5;
/// Share of the canvas height given to the source photo when present.
const SOURCE_FRACTION: f32 = 0.75;

const HEX_BASELINE_FRACTION: f32 = 0.33;
const NAME_OFFSET: f32 = 1.4;
const LINE_HEIGHT: f32 = 1.2;
/// Names wrap to this share of the swatch width.
pub const NAME_WIDTH_FRACTION: f32 = 0.9;

/// Font size for a palette of `count` swatches.
pub fn font_size(count: usize) -> u32 {
    if count <= FULL_SIZE_SWATCHES {
        return BASE_FONT_SIZE;
    }
    (BASE_FONT_SIZE * FULL_SIZE_SWATCHES as u32 / count as u32).max(MIN_FONT_SIZE)
}

/// Height of the photo area above the swatches.
pub fn source_height() -> u32 {
    (CANVAS_SIZE as f32 * SOURCE_FRACTION).round() as u32
}

/// One vertical color bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Swatch {
    /// Pixel columns covered, rounded so neighbors tile without gaps.
    pub fn columns(&self) -> Range<u32> {
        let start = self.x.round() as u32;
        let end = ((self.x + self.width).round() as u32).min(CANVAS_SIZE);
        start..end
    }

    pub fn rows(&self) -> Range<u32> {
        let start = self.top.round() as u32;
        let end = ((self.top + self.height).round() as u32).min(CANVAS_SIZE);
        start..end
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Text anchors for a given font size.
    pub fn text_layout(&self, font_size: u32) -> TextLayout {
        let size = font_size as f32;
        let hex_baseline = self.top + self.height * HEX_BASELINE_FRACTION;
        TextLayout {
            hex_baseline,
            name_baseline: hex_baseline + size * NAME_OFFSET,
            line_height: size * LINE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub hex_baseline: f32,
    pub name_baseline: f32,
    pub line_height: f32,
}

/// Equal-width swatches tiled left to right, filling the bottom quarter when
/// a source photo is shown and the whole canvas otherwise.
pub fn swatches(count: usize, with_source: bool) -> Vec<Swatch> {
    let canvas = CANVAS_SIZE as f32;
    let (top, height) = if with_source {
        let top = source_height() as f32;
        (top, canvas - top)
    } else {
        (0.0, canvas)
    };
    let width = canvas / count as f32;

    (0..count)
        .map(|i| Swatch {
            x: i as f32 * width,
            top,
            width,
            height,
        })
        .collect()
}

/// Region of the source that, scaled to the target box, covers it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFit {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Center-crop the source to the target aspect ratio. Scaling the crop
/// afterwards keeps the intermediate buffer at the target size no matter how
/// elongated the source is.
pub fn cover_fit(src_width: u32, src_height: u32, target_width: u32, target_height: u32) -> CoverFit {
    let (sw, sh) = (src_width as u64, src_height as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    if sw * th > sh * tw {
        let width = ((sh * tw + th / 2) / th).clamp(1, sw) as u32;
        CoverFit {
            x: (src_width - width) / 2,
            y: 0,
            width,
            height: src_height,
        }
    } else {
        let height = ((sw * th + tw / 2) / tw).clamp(1, sh) as u32;
        CoverFit {
            x: 0,
            y: (src_height - height) / 2,
            width: src_width,
            height,
        }
    }
}
