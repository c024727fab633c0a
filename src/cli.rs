use std::path::PathBuf;

use chromapost::HarmonyRule;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Generate color palette images from a base color or a photo.
#[derive(Parser, Debug)]
#[command(name = "chromapost", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a five-color harmonic palette from a base color
    Generate {
        /// Base color as #RRGGBB (random if omitted)
        #[arg(short, long)]
        base: Option<String>,

        /// Harmony rule (random if omitted)
        #[arg(short, long, value_enum)]
        rule: Option<HarmonyRule>,
    },

    /// Extract a palette from an image
    Extract {
        /// Path to the input image
        image: PathBuf,

        /// Number of colors to extract
        #[arg(short = 'k', long = "colors", default_value_t = 5)]
        colors: usize,

        /// Extraction algorithm
        #[arg(long, value_enum, default_value_t = Method::MedianCut)]
        method: Method,

        /// Seed for the k-means extractor
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Downscale the input to fit within this many pixels before sampling
        #[arg(long, default_value_t = 1600)]
        max_dim: u32,

        /// Draw swatches only, without the photo above them
        #[arg(long)]
        no_source: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Write the JPEG to this file
    #[arg(short, long, global = true, default_value = "palette.jpg")]
    pub output: PathBuf,

    /// Leave hex codes off the swatches
    #[arg(long, global = true)]
    pub no_hex: bool,

    /// Leave color names off the swatches
    #[arg(long, global = true)]
    pub no_names: bool,

    /// Print a colored terminal preview of the palette
    #[arg(long, global = true)]
    pub preview: bool,

    /// Print the post caption
    #[arg(long, global = true)]
    pub caption: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    MedianCut,
    KMeans,
}
