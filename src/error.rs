//! Crate-wide error taxonomy.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by atlas construction and asset persistence.
///
/// Lookup misses during layout are not errors; they resolve silently to
/// the fallback glyph.
#[derive(Debug, Error)]
pub enum Error {
    /// Degenerate build parameters (zero spread, zero-sized glyph, ...).
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The character set handed to the builder was empty.
    #[error("character set is empty")]
    EmptyCharset,

    /// The fallback character is missing from the glyph map.
    #[error("glyph map does not contain the fallback character {0:?}")]
    MissingFallback(char),

    /// Schema mismatch or truncated stream while loading an asset.
    #[error("corrupt asset: {0}")]
    CorruptAsset(String),

    /// The packed atlas exceeds the configured maximum dimension.
    #[error("atlas {width}x{height} exceeds the maximum dimension {max}")]
    AtlasOverflow { width: u32, height: u32, max: u32 },

    /// Stream failure during save or load.
    #[error(transparent)]
    Io(#[from] io::Error),
}
