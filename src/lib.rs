//! Color engine for palette posts: extract distinct palettes from images,
//! derive harmonic palettes from a base color, name colors against a fixed
//! dictionary, and render square palette images.
//!
//! ```rust,no_run
//! use chromapost::{ColorMatcher, HarmonyRule, Palette, Renderer};
//!
//! let matcher = ColorMatcher::embedded()?;
//! let renderer = Renderer::embedded()?;
//! let palette = Palette::harmonic(&matcher, "#336699", HarmonyRule::Triadic)?;
//! let jpeg = palette.to_image(&renderer, true, true)?;
//! # Ok::<(), chromapost::PaletteError>(())
//! ```

pub mod cancel;
pub mod color;
pub mod error;
pub mod names;
pub mod pipeline;
pub mod poster;
pub mod render;

pub use cancel::CancelToken;
pub use color::{Color, Hsl, Lab};
pub use error::{PaletteError, Result};
pub use names::{ColorMatcher, NamedColor};
pub use pipeline::contrast::{contrast_text_color, TextColor};
pub use pipeline::extract::{extract_palette, extract_palette_cancellable, extract_palette_kmeans};
pub use pipeline::harmony::{generate_palette, palette_label, HarmonyRule};
pub use pipeline::load::{decode_image, fit_within, load_image};
pub use poster::Palette;
pub use render::{encode_jpeg, Fonts, PaletteImage, Renderer, Source};
