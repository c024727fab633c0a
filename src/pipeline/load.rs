use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::{PaletteError, Result};

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| {
        let message = if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        };
        PaletteError::bad_source(message, e)
    })
}

/// Decode an in-memory image, guessing the format from its header.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| {
        PaletteError::bad_source(format!("unsupported or corrupt image ({} bytes)", bytes.len()), e)
    })
}

/// Downscale so neither side exceeds `max_dim`, preserving aspect ratio.
/// Images already within bounds are returned unchanged.
pub fn fit_within(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_dim && height <= max_dim {
        return img;
    }
    log::debug!("downscaling {width}x{height} source to fit {max_dim}px");
    img.resize(max_dim, max_dim, FilterType::Lanczos3)
}
