use image::DynamicImage;

use crate::color::Color;
use crate::error::Result;
use crate::names::ColorMatcher;
use crate::pipeline::extract::extract_palette;
use crate::pipeline::harmony::{generate_from_color, HarmonyRule};
use crate::render::{encode_jpeg, PaletteImage, Renderer, Source};

/// Name used when a color cannot be looked up.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A palette ready for presentation: colors plus parallel hex codes and
/// names, and the rule that produced it when it was generated.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub colors: Vec<Color>,
    pub names: Vec<String>,
    pub hex_codes: Vec<String>,
    pub rule: Option<HarmonyRule>,
}

impl Palette {
    /// Annotate arbitrary colors with hex codes and nearest names.
    pub fn from_colors(matcher: &ColorMatcher, colors: Vec<Color>) -> Self {
        let hex_codes: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
        let names = hex_codes.iter().map(|hex| name_for(matcher, hex)).collect();
        log::debug!("assembled palette of {} colors", colors.len());
        Self {
            colors,
            names,
            hex_codes,
            rule: None,
        }
    }

    /// Five-color harmonic palette around `base_hex`.
    pub fn harmonic(matcher: &ColorMatcher, base_hex: &str, rule: HarmonyRule) -> Result<Self> {
        let base = Color::from_hex(base_hex)?;
        Ok(Self::harmonic_from_color(matcher, base, rule))
    }

    pub fn harmonic_from_color(matcher: &ColorMatcher, base: Color, rule: HarmonyRule) -> Self {
        let mut palette = Self::from_colors(matcher, generate_from_color(base, rule));
        palette.rule = Some(rule);
        palette
    }

    /// Palette extracted from an image with the median-cut extractor.
    pub fn extracted(matcher: &ColorMatcher, image: &DynamicImage, count: usize) -> Self {
        Self::from_colors(matcher, extract_palette(image, count))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Rule label such as "Split Complementary", if the palette was generated.
    pub fn rule_label(&self) -> Option<&'static str> {
        self.rule.map(HarmonyRule::label)
    }

    /// Renderer input for this palette.
    pub fn image_config(&self, show_hex: bool, show_names: bool) -> PaletteImage<'_> {
        PaletteImage::new(&self.colors)
            .with_labels(&self.hex_codes, &self.names)
            .show_hex(show_hex)
            .show_names(show_names)
    }

    /// Render swatches only and encode as JPEG.
    pub fn to_image(&self, renderer: &Renderer, show_hex: bool, show_names: bool) -> Result<Vec<u8>> {
        let canvas = renderer.render(&self.image_config(show_hex, show_names))?;
        encode_jpeg(&canvas)
    }

    /// Render with a source photo above the swatches and encode as JPEG.
    pub fn to_image_with_source(
        &self,
        renderer: &Renderer,
        source: Source<'_>,
        show_hex: bool,
        show_names: bool,
    ) -> Result<Vec<u8>> {
        let config = self.image_config(show_hex, show_names).with_source(source);
        encode_jpeg(&renderer.render(&config)?)
    }

    /// Post text: a heading line, a blank line, then `Name (#HEX)` per color.
    pub fn caption(&self, heading: &str) -> String {
        let mut text = format!("🎨 {heading}\n\n");
        for (name, hex) in self.names.iter().zip(&self.hex_codes) {
            text.push_str(&format!("{name} ({hex})\n"));
        }
        text
    }
}

fn name_for(matcher: &ColorMatcher, hex: &str) -> String {
    matcher
        .nearest(hex)
        .map(|named| named.name.clone())
        .unwrap_or_else(|_| UNKNOWN_NAME.to_string())
}
