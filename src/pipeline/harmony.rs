use std::fmt;
use std::str::FromStr;

use crate::color::{Color, Hsl};
use crate::error::Result;

/// Number of colors every harmonic rule produces.
pub const HARMONY_SIZE: usize = 5;

/// Color-theory relationship used to derive a palette from one base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum HarmonyRule {
    Complementary,
    Triadic,
    Analogous,
    SplitComplementary,
    Tetradic,
    Monochromatic,
}

impl HarmonyRule {
    pub const ALL: [HarmonyRule; 6] = [
        HarmonyRule::Complementary,
        HarmonyRule::Triadic,
        HarmonyRule::Analogous,
        HarmonyRule::SplitComplementary,
        HarmonyRule::Tetradic,
        HarmonyRule::Monochromatic,
    ];

    /// Human-readable rule name shown next to a palette.
    pub fn label(self) -> &'static str {
        match self {
            HarmonyRule::Complementary => "Complementary",
            HarmonyRule::Triadic => "Triadic",
            HarmonyRule::Analogous => "Analogous",
            HarmonyRule::SplitComplementary => "Split Complementary",
            HarmonyRule::Tetradic => "Tetradic",
            HarmonyRule::Monochromatic => "Monochromatic",
        }
    }

    /// Heading form of the label, e.g. "Triadic Palette".
    pub fn title(self) -> String {
        format!("{} Palette", self.label())
    }

    /// Derive the five HSL values for this rule. The base is always first.
    pub fn apply(self, base: Hsl) -> [Hsl; HARMONY_SIZE] {
        match self {
            HarmonyRule::Complementary => {
                let complement = base.rotate(180.0);
                [
                    base,
                    base.scale(0.8, 1.2),
                    complement.scale(0.8, 1.2),
                    base.scale(0.6, 1.4),
                    complement,
                ]
            }
            HarmonyRule::Triadic => [
                base,
                base.rotate(60.0),
                base.rotate(120.0),
                base.rotate(180.0),
                base.rotate(240.0),
            ],
            HarmonyRule::Analogous => [
                base,
                base.rotate(-15.0),
                base.rotate(-30.0),
                base.rotate(15.0),
                base.rotate(30.0),
            ],
            HarmonyRule::SplitComplementary => [
                base,
                base.scale(0.8, 1.2),
                base.rotate(150.0),
                base.rotate(210.0),
                base.rotate(180.0).scale(0.8, 1.2),
            ],
            HarmonyRule::Tetradic => [
                base,
                base.rotate(90.0),
                base.rotate(180.0),
                base.rotate(270.0),
                base.scale(0.8, 1.2),
            ],
            HarmonyRule::Monochromatic => {
                let Hsl { h, s, l } = base;
                [
                    base,
                    Hsl::new(h, s * 0.8, (l * 1.2).min(100.0)),
                    Hsl::new(h, s * 0.6, (l * 1.4).min(100.0)),
                    Hsl::new(h, (s * 1.2).min(100.0), (l * 0.8).max(0.0)),
                    Hsl::new(h, (s * 1.4).min(100.0), (l * 0.6).max(0.0)),
                ]
            }
        }
    }
}

/// Display label for a rule.
pub fn palette_label(rule: HarmonyRule) -> &'static str {
    rule.label()
}

/// Generate a five-color harmonic palette from a hex base color.
///
/// Element 0 is the parsed base itself rather than its HSL round trip.
/// Saturation and lightness are only clamped where the monochromatic rule
/// asks for it; other overflow saturates in [`Hsl::to_rgb`].
pub fn generate_palette(base_hex: &str, rule: HarmonyRule) -> Result<Vec<Color>> {
    let base = Color::from_hex(base_hex)?;
    Ok(generate_from_color(base, rule))
}

/// [`generate_palette`] for an already parsed base color.
pub fn generate_from_color(base: Color, rule: HarmonyRule) -> Vec<Color> {
    let mut colors: Vec<Color> = rule.apply(base.to_hsl()).iter().map(|hsl| hsl.to_rgb()).collect();
    colors[0] = base;
    colors
}

impl fmt::Display for HarmonyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HarmonyRule {
    type Err = String;

    /// Accepts the label in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        HarmonyRule::ALL
            .into_iter()
            .find(|rule| rule.label().replace(' ', "").to_ascii_lowercase() == key)
            .ok_or_else(|| format!("unknown palette rule: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaletteError;

    fn hue_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn every_rule_yields_five_with_base_first() {
        for rule in HarmonyRule::ALL {
            let colors = generate_palette("#336699", rule).unwrap();
            assert_eq!(colors.len(), HARMONY_SIZE, "{rule}");
            assert_eq!(colors[0], Color::new(0x33, 0x66, 0x99), "{rule}");
        }
    }

    #[test]
    fn complementary_ends_with_opposite_hue() {
        let colors = generate_palette("#336699", HarmonyRule::Complementary).unwrap();
        let base_h = colors[0].to_hsl().h;
        let last_h = colors[4].to_hsl().h;
        assert!(
            (hue_diff(last_h, base_h) - 180.0).abs() < 2.0,
            "base {base_h}, complement {last_h}"
        );
    }

    #[test]
    fn triadic_steps_by_sixty() {
        let colors = generate_palette("#FF0000", HarmonyRule::Triadic).unwrap();
        assert_eq!(colors[1], Color::new(255, 255, 0));
        assert_eq!(colors[2], Color::new(0, 255, 0));
        assert_eq!(colors[3], Color::new(0, 255, 255));
        assert_eq!(colors[4], Color::new(0, 0, 255));
    }

    #[test]
    fn analogous_wraps_below_zero() {
        let base = Hsl::new(10.0, 50.0, 50.0);
        let hues: Vec<f64> = HarmonyRule::Analogous.apply(base).iter().map(|c| c.h).collect();
        assert_eq!(hues, vec![10.0, 355.0, 340.0, 25.0, 40.0]);
    }

    #[test]
    fn split_complementary_flanks_the_complement() {
        let out = HarmonyRule::SplitComplementary.apply(Hsl::new(0.0, 80.0, 40.0));
        assert_eq!(out[2].h, 150.0);
        assert_eq!(out[3].h, 210.0);
        assert_eq!(out[4].h, 180.0);
        assert!((out[4].s - 64.0).abs() < 1e-9);
        assert!((out[4].l - 48.0).abs() < 1e-9);
    }

    #[test]
    fn non_monochromatic_rules_do_not_clamp() {
        let out = HarmonyRule::Complementary.apply(Hsl::new(0.0, 50.0, 90.0));
        assert!((out[3].l - 126.0).abs() < 1e-9);
    }

    #[test]
    fn monochromatic_black_stays_gray() {
        let colors = generate_palette("#000000", HarmonyRule::Monochromatic).unwrap();
        assert_eq!(colors[0], Color::BLACK);
        for c in &colors {
            let hsl = c.to_hsl();
            assert_eq!(hsl.s, 0.0);
            assert_eq!(hsl.h, 0.0);
            assert!(hsl.l <= 100.0);
        }
    }

    #[test]
    fn monochromatic_clamps_lightness() {
        let out = HarmonyRule::Monochromatic.apply(Hsl::new(200.0, 90.0, 95.0));
        assert_eq!(out[1].l, 100.0);
        assert_eq!(out[2].l, 100.0);
        assert_eq!(out[3].s, 100.0);
        assert!(out.iter().all(|c| c.h == 200.0));
    }

    #[test]
    fn bad_base_is_bad_hex() {
        assert!(matches!(
            generate_palette("#33669", HarmonyRule::Triadic),
            Err(PaletteError::BadHex { .. })
        ));
    }

    #[test]
    fn labels_and_titles() {
        assert_eq!(palette_label(HarmonyRule::SplitComplementary), "Split Complementary");
        assert_eq!(HarmonyRule::Monochromatic.title(), "Monochromatic Palette");
    }

    #[test]
    fn rules_parse_from_loose_names() {
        assert_eq!(
            "split-complementary".parse::<HarmonyRule>(),
            Ok(HarmonyRule::SplitComplementary)
        );
        assert_eq!(
            "Split Complementary".parse::<HarmonyRule>(),
            Ok(HarmonyRule::SplitComplementary)
        );
        assert_eq!("TETRADIC".parse::<HarmonyRule>(), Ok(HarmonyRule::Tetradic));
        assert!("square".parse::<HarmonyRule>().is_err());
    }
}
