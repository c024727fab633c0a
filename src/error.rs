//! Error types for the color engine.

use thiserror::Error;

/// Result type alias for color engine operations.
pub type Result<T> = std::result::Result<T, PaletteError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Everything the color engine can fail with.
#[derive(Error, Debug)]
pub enum PaletteError {
    /// A hex color string was empty, the wrong length, or held a non-hex digit.
    #[error("invalid hex color {input:?}: {reason}")]
    BadHex { input: String, reason: String },

    /// The named-color dictionary could not be parsed.
    #[error("parse color data: {message}")]
    BadDictionary {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Render was asked to draw zero colors.
    #[error("no colors provided")]
    EmptyPalette,

    /// Font bytes were missing or not a usable TrueType face.
    #[error("load font asset: {message}")]
    AssetError {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A source image could not be read or decoded.
    #[error("decode source image: {message}")]
    BadSource {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The rendered canvas could not be encoded.
    #[error("encode palette image: {message}")]
    Encode {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The caller's cancellation signal was observed.
    #[error("operation cancelled during {phase}")]
    Cancelled { phase: &'static str },
}

impl PaletteError {
    pub(crate) fn bad_hex(input: &str, reason: impl Into<String>) -> Self {
        Self::BadHex {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_dictionary(message: impl Into<String>) -> Self {
        Self::BadDictionary {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn dictionary_parse<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BadDictionary {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn asset<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::AssetError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn bad_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BadSource {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn encode<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Encode {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}
