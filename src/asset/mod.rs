//! The built font asset: atlas pixels, per-glyph metadata, and the text
//! layout, measurement, and rendering operations that consume them.

mod layout;
mod storage;
#[cfg(test)]
mod tests;

pub use layout::{Placement, Placements};

use std::collections::BTreeMap;

use crate::atlas::GlyphProperties;
use crate::error::{Error, Result};
use crate::options::SdfQuadOptions;
use crate::render::TextureUploader;

/// Default spacing between lines, as a fraction of the draw size.
const DEFAULT_VERTICAL_SPACING: f32 = 0.01;
/// Default spacing between glyphs, as a fraction of the draw size.
const DEFAULT_HORIZONTAL_SPACING: f32 = 0.05;
/// Default advance for `' '`, as a fraction of the draw size.
const DEFAULT_SPACE_ADVANCE: f32 = 0.5;

/// A packed SDF glyph sheet plus everything needed to lay out and draw
/// text with it.
///
/// Built once by [`build_atlas`] or restored by [`FontAsset::load`];
/// afterwards only the spacing fields and render options may change.
///
/// [`build_atlas`]: crate::atlas::build_atlas
pub struct FontAsset {
    atlas_pixels: Vec<u8>,
    atlas_width: u32,
    atlas_height: u32,
    glyphs: BTreeMap<char, GlyphProperties>,
    fallback: char,
    raster_font_size: f32,
    options: SdfQuadOptions,
    vertical_spacing: f32,
    horizontal_spacing: f32,
    space_advance: f32,
}

impl FontAsset {
    /// Wrap a composed atlas.
    ///
    /// `atlas_pixels` is tightly packed RGBA. Fails with
    /// [`Error::MissingFallback`] unless `fallback` is a key of `glyphs`.
    pub fn new(
        atlas_pixels: Vec<u8>,
        atlas_width: u32,
        atlas_height: u32,
        glyphs: BTreeMap<char, GlyphProperties>,
        fallback: char,
        raster_font_size: f32,
        options: SdfQuadOptions,
    ) -> Result<Self> {
        if !glyphs.contains_key(&fallback) {
            return Err(Error::MissingFallback(fallback));
        }
        debug_assert_eq!(
            atlas_pixels.len(),
            atlas_width as usize * atlas_height as usize * 4,
        );

        Ok(Self {
            atlas_pixels,
            atlas_width,
            atlas_height,
            glyphs,
            fallback,
            raster_font_size,
            options,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            horizontal_spacing: DEFAULT_HORIZONTAL_SPACING,
            space_advance: DEFAULT_SPACE_ADVANCE,
        })
    }

    /// Properties for `ch`, resolving silently to the fallback glyph when
    /// the character is unmapped.
    pub fn properties(&self, ch: char) -> &GlyphProperties {
        self.glyphs
            .get(&ch)
            .unwrap_or_else(|| &self.glyphs[&self.fallback])
    }

    /// Tightly packed RGBA atlas pixels.
    pub fn atlas_pixels(&self) -> &[u8] {
        &self.atlas_pixels
    }

    pub fn atlas_width(&self) -> u32 {
        self.atlas_width
    }

    pub fn atlas_height(&self) -> u32 {
        self.atlas_height
    }

    pub fn glyphs(&self) -> &BTreeMap<char, GlyphProperties> {
        &self.glyphs
    }

    pub fn fallback(&self) -> char {
        self.fallback
    }

    /// Size the rasterizer drew the source glyphs at.
    pub fn raster_font_size(&self) -> f32 {
        self.raster_font_size
    }

    pub fn options(&self) -> SdfQuadOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SdfQuadOptions) {
        self.options = options;
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn set_vertical_spacing(&mut self, spacing: f32) {
        self.vertical_spacing = spacing;
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn set_horizontal_spacing(&mut self, spacing: f32) {
        self.horizontal_spacing = spacing;
    }

    pub fn space_advance(&self) -> f32 {
        self.space_advance
    }

    pub fn set_space_advance(&mut self, advance: f32) {
        self.space_advance = advance;
    }

    /// Hand the atlas to the rendering backend.
    pub fn upload_atlas<U: TextureUploader>(&self, uploader: &mut U) -> U::Handle {
        uploader.upload(&self.atlas_pixels, self.atlas_width, self.atlas_height)
    }
}
