use crate::color::Color;

/// Luminance above which black text reads better than white.
const LUMINANCE_THRESHOLD: f64 = 0.5;

/// Monochrome foreground for text drawn over a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn color(self) -> Color {
        match self {
            TextColor::Black => Color::BLACK,
            TextColor::White => Color::WHITE,
        }
    }
}

/// Choose black or white text for readable labels on `background`.
pub fn contrast_text_color(background: Color) -> TextColor {
    if background.relative_luminance() > LUMINANCE_THRESHOLD {
        TextColor::Black
    } else {
        TextColor::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_backgrounds_get_black_text() {
        assert_eq!(contrast_text_color(Color::WHITE), TextColor::Black);
        assert_eq!(contrast_text_color(Color::new(255, 255, 0)), TextColor::Black);
    }

    #[test]
    fn dark_backgrounds_get_white_text() {
        assert_eq!(contrast_text_color(Color::BLACK), TextColor::White);
        assert_eq!(contrast_text_color(Color::new(0, 0, 255)), TextColor::White);
        // mid gray sits well under the threshold with the flat 2.2 gamma
        assert_eq!(contrast_text_color(Color::new(128, 128, 128)), TextColor::White);
    }

    #[test]
    fn pure_green_is_light() {
        // 0.7152 > 0.5
        assert_eq!(contrast_text_color(Color::new(0, 255, 0)), TextColor::Black);
        assert_eq!(TextColor::Black.color(), Color::BLACK);
    }
}
