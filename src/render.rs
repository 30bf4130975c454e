//! Collaborator seams: glyph rasterization in, textures and quads out.
//!
//! The crate never talks to a font engine or a GPU directly. Rasterization
//! comes in through [`GlyphRasterizer`]; the composed atlas leaves through
//! [`TextureUploader`]; laid-out text leaves through [`QuadSink`].

use crate::error::Result;
use crate::geom::{UvRect, Vec2};
use crate::mask::GlyphMask;
use crate::options::SdfQuadOptions;

/// Rasterizes one character into a binary coverage mask.
///
/// Implementations are typically backed by a font engine. The atlas
/// builder calls this from worker threads, hence the `Sync` bound. An
/// error skips the character; the build as a whole fails only when the
/// fallback character itself cannot be rasterized.
pub trait GlyphRasterizer: Sync {
    fn rasterize(&self, ch: char) -> Result<GlyphMask>;
}

/// Uniform scale and translation applied to a unit quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTransform {
    pub scale: f32,
    pub translation: Vec2,
}

/// Receives quad-placement records from [`FontAsset::render`].
///
/// [`FontAsset::render`]: crate::asset::FontAsset::render
pub trait QuadSink {
    fn push_quad(&mut self, transform: QuadTransform, uv: UvRect, options: SdfQuadOptions);
}

/// Uploads the composed atlas to a GPU-sampleable texture.
pub trait TextureUploader {
    /// Opaque handle to the created texture.
    type Handle;

    /// `pixels` is tightly packed RGBA, `width * height * 4` bytes.
    fn upload(&mut self, pixels: &[u8], width: u32, height: u32) -> Self::Handle;
}
