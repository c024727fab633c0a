use std::ops::Range;

use image::{DynamicImage, GenericImageView};
use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, Srgb};

use crate::cancel::CancelToken;
use crate::color::Color;
use crate::error::Result;

const MIN_COLORS: usize = 2;
const MAX_COLORS: usize = 256;
/// Boxes produced per requested color before the similarity filter runs.
const OVERSAMPLE: usize = 2;
/// Minimum RGB distance between two kept representatives.
const SIMILARITY_THRESHOLD: f64 = 60.0;

const KMEANS_MAX_ITER: usize = 20;
const KMEANS_CONVERGE: f32 = 0.1;
/// Rough number of pixels the k-means grid sampler aims for.
const KMEANS_SAMPLE_TARGET: u64 = 1000;

/// Extract up to `count` perceptually distinct colors from an image.
///
/// `count` is clamped to `[2, 256]`. Returns an empty list when the image has
/// no non-transparent pixels and never pads when fewer distinct colors exist.
pub fn extract_palette(image: &DynamicImage, count: usize) -> Vec<Color> {
    // A fresh token is never cancelled.
    extract_palette_cancellable(image, count, &CancelToken::new()).unwrap_or_default()
}

/// [`extract_palette`], checking `cancel` between sampling, each box split
/// and the final filter.
pub fn extract_palette_cancellable(
    image: &DynamicImage,
    count: usize,
    cancel: &CancelToken,
) -> Result<Vec<Color>> {
    let count = count.clamp(MIN_COLORS, MAX_COLORS);
    let samples = opaque_samples(image);
    log::trace!("collected {} opaque samples", samples.len());
    cancel.check("sampling")?;
    median_cut(samples, count, cancel)
}

/// Every pixel with non-zero alpha, in row-major order.
fn opaque_samples(image: &DynamicImage) -> Vec<Color> {
    image
        .pixels()
        .filter(|(_, _, p)| p[3] > 0)
        .map(|(_, _, p)| Color::new(p[0], p[1], p[2]))
        .collect()
}

fn median_cut(mut samples: Vec<Color>, count: usize, cancel: &CancelToken) -> Result<Vec<Color>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let target = count * OVERSAMPLE;
    let mut boxes = vec![ColorBox::new(&samples, 0..samples.len())];

    while boxes.len() < target {
        cancel.check("box splitting")?;
        let Some(idx) = largest_splittable(&boxes) else {
            break;
        };

        let range = boxes[idx].range.clone();
        let channel = boxes[idx].longest_channel();
        samples[range.clone()].sort_by_key(|c| channel_of(*c, channel));

        let mid = range.start + range.len() / 2;
        boxes[idx] = ColorBox::new(&samples, range.start..mid);
        boxes.insert(idx + 1, ColorBox::new(&samples, mid..range.end));
    }
    log::trace!("median cut finished with {} boxes", boxes.len());

    cancel.check("filtering")?;
    let mut kept: Vec<Color> = Vec::with_capacity(count);
    for rep in boxes.iter().map(|b| b.average(&samples)) {
        if kept.iter().all(|k| k.distance(rep) >= SIMILARITY_THRESHOLD) {
            kept.push(rep);
        }
    }
    kept.truncate(count);
    Ok(kept)
}

/// Index of the splittable box with the largest volume; ties keep the
/// earliest box.
fn largest_splittable(boxes: &[ColorBox]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, b) in boxes.iter().enumerate() {
        if !b.is_splittable() {
            continue;
        }
        let volume = b.volume();
        if best.map_or(true, |(_, v)| volume > v) {
            best = Some((i, volume));
        }
    }
    best.map(|(i, _)| i)
}

fn channel_of(c: Color, channel: usize) -> u8 {
    match channel {
        0 => c.r,
        1 => c.g,
        _ => c.b,
    }
}

/// An axis-aligned region of RGB space over a contiguous run of samples.
#[derive(Debug, Clone)]
struct ColorBox {
    range: Range<usize>,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    fn new(samples: &[Color], range: Range<usize>) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for c in &samples[range.clone()] {
            for (ch, value) in [c.r, c.g, c.b].into_iter().enumerate() {
                min[ch] = min[ch].min(value);
                max[ch] = max[ch].max(value);
            }
        }
        Self { range, min, max }
    }

    fn extent(&self, channel: usize) -> u64 {
        (self.max[channel] - self.min[channel]) as u64 + 1
    }

    fn volume(&self) -> u64 {
        self.extent(0) * self.extent(1) * self.extent(2)
    }

    /// Channel with the widest range; ties prefer red, then green.
    fn longest_channel(&self) -> usize {
        let mut best = 0;
        for channel in 1..3 {
            if self.extent(channel) > self.extent(best) {
                best = channel;
            }
        }
        best
    }

    fn is_splittable(&self) -> bool {
        self.range.len() >= 2 && self.min != self.max
    }

    /// Per-channel mean, truncated.
    fn average(&self, samples: &[Color]) -> Color {
        let run = &samples[self.range.clone()];
        let n = run.len() as u64;
        let (r, g, b) = run.iter().fold((0u64, 0u64, 0u64), |(r, g, b), c| {
            (r + c.r as u64, g + c.g as u64, b + c.b as u64)
        });
        Color::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
    }
}

/// Alternative extractor: k-means++ in CIELAB over a sampling grid.
///
/// Each centroid is snapped to the closest sampled pixel so every returned
/// color occurs in the image. Results depend only on the inputs and `seed`.
pub fn extract_palette_kmeans(image: &DynamicImage, count: usize, seed: u64) -> Vec<Color> {
    let count = count.clamp(MIN_COLORS, MAX_COLORS);
    let samples = grid_samples(image);
    if samples.is_empty() {
        return Vec::new();
    }

    let labs: Vec<Lab> = samples
        .iter()
        .map(|c| {
            let srgb: Srgb<f32> = c.to_srgb_u8().into_format();
            srgb.into_color()
        })
        .collect();

    let k = count.min(samples.len());
    let result = get_kmeans(k, KMEANS_MAX_ITER, KMEANS_CONVERGE, false, &labs, seed);

    let mut palette: Vec<Color> = Vec::with_capacity(k);
    for centroid in &result.centroids {
        let nearest = labs
            .iter()
            .zip(&samples)
            .min_by(|(a, _), (b, _)| lab_distance_sq(a, centroid).total_cmp(&lab_distance_sq(b, centroid)))
            .map(|(_, c)| *c);
        if let Some(color) = nearest {
            if !palette.contains(&color) {
                palette.push(color);
            }
        }
    }
    palette
}

fn lab_distance_sq(a: &Lab, b: &Lab) -> f32 {
    (a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2)
}

/// Opaque pixels on a grid sized so roughly a thousand samples are taken.
fn grid_samples(image: &DynamicImage) -> Vec<Color> {
    let (width, height) = image.dimensions();
    let area = width as u64 * height as u64;
    let step = ((area / KMEANS_SAMPLE_TARGET) as f64).sqrt().max(1.0) as u32;

    let mut samples = Vec::new();
    for y in (0..height).step_by(step as usize) {
        for x in (0..width).step_by(step as usize) {
            let p = image.get_pixel(x, y);
            if p[3] > 0 {
                samples.push(Color::new(p[0], p[1], p[2]));
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage, RgbImage};

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| image::Rgb(rgb)))
    }

    fn stripes(colors: &[[u8; 3]], stripe_width: u32, height: u32) -> DynamicImage {
        let width = stripe_width * colors.len() as u32;
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
            image::Rgb(colors[(x / stripe_width) as usize])
        }))
    }

    #[test]
    fn uniform_image_produces_one_color() {
        let colors = extract_palette(&solid(16, 16, [0x80, 0x80, 0x80]), 5);
        assert_eq!(colors, vec![Color::new(0x80, 0x80, 0x80)]);
    }

    #[test]
    fn fully_transparent_image_is_empty() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 0])));
        assert!(extract_palette(&img, 5).is_empty());
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let img = RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgba([0, 200, 0, 255])
            } else {
                Rgba([255, 0, 0, 0])
            }
        });
        let colors = extract_palette(&DynamicImage::ImageRgba8(img), 5);
        assert_eq!(colors, vec![Color::new(0, 200, 0)]);
    }

    #[test]
    fn two_halves_produce_two_colors() {
        let colors = extract_palette(&stripes(&[[255, 0, 0], [0, 0, 255]], 8, 16), 5);
        assert_eq!(colors.len(), 2);
        assert!(colors.contains(&Color::new(255, 0, 0)));
        assert!(colors.contains(&Color::new(0, 0, 255)));
    }

    #[test]
    fn near_duplicates_are_filtered() {
        // Two reds 20 apart collapse, blue survives.
        let colors = extract_palette(&stripes(&[[200, 0, 0], [220, 0, 0], [0, 0, 200]], 4, 4), 5);
        assert_eq!(colors.len(), 2, "got {colors:?}");
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert!(a.distance(*b) >= SIMILARITY_THRESHOLD);
            }
        }
    }

    #[test]
    fn result_is_capped_at_count() {
        let palette = [
            [255, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [255, 255, 0],
            [0, 255, 255],
            [255, 0, 255],
            [0, 0, 0],
            [255, 255, 255],
        ];
        let colors = extract_palette(&stripes(&palette, 2, 2), 3);
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn count_is_clamped_to_two() {
        let colors = extract_palette(&stripes(&[[255, 0, 0], [0, 0, 255], [0, 255, 0]], 2, 2), 0);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn fewer_samples_than_count_does_not_pad() {
        let colors = extract_palette(&stripes(&[[255, 0, 0], [0, 0, 255]], 1, 1), 10);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn extraction_is_deterministic() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 32, |x, y| {
            image::Rgb([(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8])
        }));
        assert_eq!(extract_palette(&img, 6), extract_palette(&img, 6));
    }

    #[test]
    fn cancelled_token_stops_extraction() {
        let token = CancelToken::new();
        token.cancel();
        let result = extract_palette_cancellable(&solid(4, 4, [1, 2, 3]), 5, &token);
        assert!(matches!(
            result,
            Err(crate::error::PaletteError::Cancelled { .. })
        ));
    }

    #[test]
    fn box_volume_counts_inclusive_extent() {
        let samples = vec![Color::new(0, 0, 0), Color::new(9, 4, 0)];
        let b = ColorBox::new(&samples, 0..2);
        assert_eq!(b.volume(), 10 * 5);
        assert_eq!(b.longest_channel(), 0);
        assert_eq!(b.average(&samples), Color::new(4, 2, 0));
    }

    #[test]
    fn kmeans_variant_finds_both_halves() {
        let img = stripes(&[[255, 0, 0], [0, 0, 255]], 8, 16);
        let colors = extract_palette_kmeans(&img, 2, 7);
        assert_eq!(colors.len(), 2);
        assert!(colors.contains(&Color::new(255, 0, 0)));
        assert!(colors.contains(&Color::new(0, 0, 255)));
    }

    #[test]
    fn kmeans_variant_is_seed_deterministic() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(40, 40, |x, y| {
            image::Rgb([(x * 6) as u8, (y * 6) as u8, 90])
        }));
        assert_eq!(
            extract_palette_kmeans(&img, 4, 42),
            extract_palette_kmeans(&img, 4, 42)
        );
    }

    #[test]
    fn kmeans_variant_empty_on_transparent_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        assert!(extract_palette_kmeans(&img, 5, 1).is_empty());
    }
}
