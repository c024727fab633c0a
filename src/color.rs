use std::str::FromStr;

use palette::{LinSrgb, Srgb};

use crate::error::{PaletteError, Result};

/// D65 reference white used for the XYZ -> L*a*b* step.
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

/// Core color type used throughout the engine.
/// Wraps sRGB u8 components and provides conversions to HSL and CIELAB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL with hue in degrees `[0, 360)` and saturation/lightness in percent.
///
/// Components are plain `f64` so harmonic rules can push S and L past 100;
/// [`Hsl::to_rgb`] saturates the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// CIELAB under D65. `l` is in `[0, 100]`, `a`/`b` roughly `[-128, 127]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#FF8800` or `ff8800`.
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.is_empty() {
            return Err(PaletteError::bad_hex(input, "empty color"));
        }
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(PaletteError::bad_hex(
                input,
                format!("non-hex digit {bad:?}"),
            ));
        }
        if hex.len() != 6 {
            return Err(PaletteError::bad_hex(
                input,
                format!("expected 6 hex digits, got {}", hex.len()),
            ));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| PaletteError::bad_hex(input, e.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Serialize to uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to `palette::Srgb<u8>`.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    pub fn to_rgb8(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    /// Convert to HSL. Achromatic colors get `h = 0, s = 0`.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: (h / 6.0) * 360.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }

    /// Convert to CIELAB: linear sRGB -> D65 XYZ -> L*a*b*.
    pub fn to_lab(self) -> Lab {
        let lin: LinSrgb<f64> = self.to_srgb_u8().into_format::<f64>().into_linear();
        let (r, g, b) = (lin.red, lin.green, lin.blue);

        let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Euclidean distance between two colors in 0-255 RGB space.
    pub fn distance(self, other: Color) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Sum of squared channel differences.
    pub fn distance_sq(self, other: Color) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        dr * dr + dg * dg + db * db
    }

    /// Relative luminance with a flat 2.2 gamma.
    ///
    /// Only used to pick black or white text, so the simplified exponent is
    /// kept instead of the piecewise sRGB curve.
    pub fn relative_luminance(self) -> f64 {
        let decode = |c: u8| (c as f64 / 255.0).powf(2.2);
        0.2126 * decode(self.r) + 0.7152 * decode(self.g) + 0.0722 * decode(self.b)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        (903.3 * t + 16.0) / 116.0
    }
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Rotate the hue, renormalizing into `[0, 360)`.
    pub fn rotate(self, degrees: f64) -> Hsl {
        let mut h = (self.h + degrees) % 360.0;
        if h < 0.0 {
            h += 360.0;
        }
        Hsl { h, ..self }
    }

    /// Scale saturation and lightness without clamping.
    pub fn scale(self, s_factor: f64, l_factor: f64) -> Hsl {
        Hsl {
            h: self.h,
            s: self.s * s_factor,
            l: self.l * l_factor,
        }
    }

    /// Convert back to RGB, rounding each channel and saturating anything
    /// outside `[0, 255]`.
    pub fn to_rgb(self) -> Color {
        let h = self.h / 360.0;
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        Color::new(to_channel(r), to_channel(g), to_channel(b))
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Lab {
    /// Euclidean distance in (L, a, b).
    pub fn distance(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::BLACK;
    const WHITE: Color = Color::WHITE;

    #[test]
    fn hex_round_trip() {
        let original = Color::from_hex("#ff8800").unwrap();
        assert_eq!(original.r, 255);
        assert_eq!(original.g, 136);
        assert_eq!(original.b, 0);
        assert_eq!(original.to_hex(), "#FF8800");
    }

    #[test]
    fn hex_without_hash() {
        let color = Color::from_hex("aabbcc").unwrap();
        assert_eq!(color.to_hex(), "#AABBCC");
    }

    #[test]
    fn hex_invalid_length() {
        assert!(matches!(
            Color::from_hex("#fff"),
            Err(PaletteError::BadHex { .. })
        ));
        assert!(Color::from_hex("#ff88001").is_err());
    }

    #[test]
    fn hex_invalid_chars() {
        assert!(matches!(
            Color::from_hex("#gggggg"),
            Err(PaletteError::BadHex { .. })
        ));
        // from_str_radix alone would accept a leading plus sign
        assert!(Color::from_hex("+f+f+f").is_err());
    }

    #[test]
    fn hex_empty() {
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#").is_err());
    }

    #[test]
    fn hsl_of_primaries() {
        let red = Color::new(255, 0, 0).to_hsl();
        assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));

        let green = Color::new(0, 255, 0).to_hsl();
        assert!((green.h - 120.0).abs() < 1e-9);

        let blue = Color::new(0, 0, 255).to_hsl();
        assert!((blue.h - 240.0).abs() < 1e-9);
    }

    #[test]
    fn hsl_of_light_color_uses_upper_formula() {
        // #FF8080: l = 0.75, s = (1 - 0.502) / (2 - 1.502) = 1.0
        let hsl = Color::new(255, 128, 128).to_hsl();
        assert!((hsl.l - 75.1).abs() < 0.1, "l = {}", hsl.l);
        assert!((hsl.s - 100.0).abs() < 0.1, "s = {}", hsl.s);
    }

    #[test]
    fn gray_is_achromatic() {
        let hsl = Color::new(128, 128, 128).to_hsl();
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
    }

    #[test]
    fn hsl_round_trip_is_within_one_per_channel() {
        for color in [
            Color::new(0x33, 0x66, 0x99),
            Color::new(200, 100, 50),
            Color::new(12, 250, 7),
            BLACK,
            WHITE,
        ] {
            let back = color.to_hsl().to_rgb();
            for (a, b) in [(color.r, back.r), (color.g, back.g), (color.b, back.b)] {
                assert!(a.abs_diff(b) <= 1, "{color} -> {back}");
            }
        }
    }

    #[test]
    fn hsl_to_rgb_saturates_overflow() {
        assert_eq!(Hsl::new(0.0, 0.0, 140.0).to_rgb(), WHITE);
        assert_eq!(Hsl::new(0.0, 0.0, -5.0).to_rgb(), BLACK);
        let pastel = Hsl::new(210.0, 40.0, 120.0).to_rgb();
        assert_eq!(pastel, WHITE);
    }

    #[test]
    fn rotate_wraps_both_directions() {
        let base = Hsl::new(350.0, 50.0, 50.0);
        assert!((base.rotate(30.0).h - 20.0).abs() < 1e-9);
        assert!((Hsl::new(10.0, 0.0, 0.0).rotate(-30.0).h - 340.0).abs() < 1e-9);
        assert!((Hsl::new(0.0, 0.0, 0.0).rotate(-720.0).h).abs() < 1e-9);
    }

    #[test]
    fn lab_of_black_and_white() {
        let black = BLACK.to_lab();
        assert!(black.l.abs() < 1e-6);
        let white = WHITE.to_lab();
        assert!((white.l - 100.0).abs() < 0.01, "white L = {}", white.l);
        assert!(white.a.abs() < 0.01 && white.b.abs() < 0.01);
    }

    #[test]
    fn lab_of_red_matches_reference() {
        let lab = Color::new(255, 0, 0).to_lab();
        assert!((lab.l - 53.24).abs() < 0.1, "L = {}", lab.l);
        assert!((lab.a - 80.09).abs() < 0.2, "a = {}", lab.a);
        assert!((lab.b - 67.20).abs() < 0.2, "b = {}", lab.b);
    }

    #[test]
    fn lab_distance_is_euclidean() {
        let a = Lab {
            l: 50.0,
            a: 0.0,
            b: 0.0,
        };
        let b = Lab {
            l: 53.0,
            a: 4.0,
            b: 0.0,
        };
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn relative_luminance_black() {
        assert!(BLACK.relative_luminance() < 0.001);
    }

    #[test]
    fn relative_luminance_white() {
        assert!((WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }

    #[test]
    fn relative_luminance_uses_flat_gamma() {
        // 0.5^2.2 for every channel
        let mid = Color::new(128, 128, 128).relative_luminance();
        let expected = (128.0f64 / 255.0).powf(2.2);
        assert!((mid - expected).abs() < 1e-9);
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }

    #[test]
    fn parses_via_from_str() {
        let color: Color = "#336699".parse().unwrap();
        assert_eq!(color, Color::new(0x33, 0x66, 0x99));
    }
}
