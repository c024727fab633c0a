mod cli;
mod preview;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::DynamicImage;

use chromapost::{
    extract_palette, extract_palette_kmeans, fit_within, load_image, Color, ColorMatcher,
    HarmonyRule, Palette, Renderer, Source,
};
use cli::{Args, Command, Method, OutputArgs};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let matcher = ColorMatcher::embedded().context("failed to load color dictionary")?;
    let renderer = Renderer::embedded().context("failed to load fonts")?;

    match args.command {
        Command::Generate { base, rule } => {
            let base = match base {
                Some(hex) => Color::from_hex(&hex)?,
                None => random_color()?,
            };
            let rule = match rule {
                Some(rule) => rule,
                None => random_rule()?,
            };
            log::info!("generating {} palette from {}", rule.label(), base);

            let palette = Palette::harmonic_from_color(&matcher, base, rule);
            let jpeg = palette
                .to_image(&renderer, !args.output.no_hex, !args.output.no_names)
                .context("failed to render palette")?;
            finish(&args.output, &palette, &rule.title(), &jpeg)
        }
        Command::Extract {
            image,
            colors,
            method,
            seed,
            max_dim,
            no_source,
        } => {
            let img = load_image(&image)
                .with_context(|| format!("failed to load {}", image.display()))?;
            let img = fit_within(img, max_dim);
            let extracted = extract(&img, colors, method, seed);
            if extracted.is_empty() {
                return Err(anyhow!(
                    "no opaque pixels in {}; nothing to extract",
                    image.display()
                ));
            }
            log::info!("extracted {} colors from {}", extracted.len(), image.display());

            let palette = Palette::from_colors(&matcher, extracted);
            let show_hex = !args.output.no_hex;
            let show_names = !args.output.no_names;
            let jpeg = if no_source {
                palette.to_image(&renderer, show_hex, show_names)
            } else {
                palette.to_image_with_source(&renderer, Source::Image(&img), show_hex, show_names)
            }
            .context("failed to render palette")?;
            finish(&args.output, &palette, "Extracted Palette", &jpeg)
        }
    }
}

fn extract(img: &DynamicImage, count: usize, method: Method, seed: u64) -> Vec<Color> {
    match method {
        Method::MedianCut => extract_palette(img, count),
        Method::KMeans => extract_palette_kmeans(img, count, seed),
    }
}

fn finish(output: &OutputArgs, palette: &Palette, heading: &str, jpeg: &[u8]) -> Result<()> {
    std::fs::write(&output.output, jpeg)
        .with_context(|| format!("failed to write {}", output.output.display()))?;
    log::info!("wrote {} ({} bytes)", output.output.display(), jpeg.len());

    if output.preview {
        print!("{}", preview::render(palette));
    }
    if output.caption {
        print!("{}", palette.caption(heading));
    }
    Ok(())
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    getrandom::fill(&mut buf).map_err(|e| anyhow!("random source unavailable: {e}"))?;
    Ok(buf)
}

fn random_color() -> Result<Color> {
    let [r, g, b] = random_bytes::<3>()?;
    Ok(Color::new(r, g, b))
}

fn random_rule() -> Result<HarmonyRule> {
    loop {
        let [n] = random_bytes::<1>()?;
        if let Some(rule) = rule_from_byte(n) {
            return Ok(rule);
        }
    }
}

/// Map a uniform byte onto the rules, rejecting the tail that would skew the
/// modulo toward the first rules.
fn rule_from_byte(n: u8) -> Option<HarmonyRule> {
    let count = HarmonyRule::ALL.len();
    let limit = 256 - 256 % count;
    let n = n as usize;
    (n < limit).then(|| HarmonyRule::ALL[n % count])
}
