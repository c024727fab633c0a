use crossterm::style::{Color as TermColor, Stylize};

use chromapost::{contrast_text_color, Color, Palette};

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// One colored row per swatch: the hex code on the swatch color, then the name.
pub fn render(palette: &Palette) -> String {
    let mut out = String::new();
    for ((color, hex), name) in palette
        .colors
        .iter()
        .zip(&palette.hex_codes)
        .zip(&palette.names)
    {
        let ink = contrast_text_color(*color).color();
        let swatch = format!("  {}  ", hex.trim_start_matches('#'))
            .with(term_color(ink))
            .on(term_color(*color));
        out.push_str(&format!("{swatch} {name}\n"));
    }
    out
}
