//! Atlas construction: parallel per-glyph distance fields, shelf packing,
//! and composition into a single RGBA sheet.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::time::Instant;

use rayon::prelude::*;

use crate::asset::FontAsset;
use crate::error::{Error, Result};
use crate::geom::{UvRect, Vec2};
use crate::options::SdfQuadOptions;
use crate::packer::{PackedRect, ShelfPacker, packing_bound};
use crate::render::GlyphRasterizer;
use crate::sdf::{self, DistanceField};

/// Build parameters for [`build_atlas`].
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    /// Maximum shelf width in pixels.
    pub max_row_width: u32,
    /// Density of the SDF search grid relative to the source raster.
    pub upscale_resolution: u32,
    /// Output resolution per glyph before padding.
    pub sdf_size: u32,
    /// Border around each glyph's core region, in output pixels.
    pub padding: u32,
    /// Worker threads for the per-glyph phase. 0 means all available
    /// cores.
    pub parallelism: usize,
    /// Upper bound on either atlas dimension; a packing that exceeds it
    /// fails with [`Error::AtlasOverflow`].
    pub max_dimension: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            max_row_width: 256,
            upscale_resolution: 64,
            sdf_size: 64,
            padding: 32,
            parallelism: 0,
            max_dimension: 8192,
        }
    }
}

impl AtlasConfig {
    /// Reject parameter combinations the generator cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.upscale_resolution < 2 {
            return Err(Error::InvalidParameters(
                "upscale_resolution must be at least 2 (the search spread would be zero)".into(),
            ));
        }
        if self.sdf_size == 0 {
            return Err(Error::InvalidParameters("sdf_size must be non-zero".into()));
        }
        if self.max_row_width == 0 {
            return Err(Error::InvalidParameters(
                "max_row_width must be non-zero".into(),
            ));
        }
        if self.max_dimension == 0 {
            return Err(Error::InvalidParameters(
                "max_dimension must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// UV rectangle, padding fraction, and source size for one packed glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphProperties {
    /// Padding as a fraction of the packed width and height.
    pub padding_fraction: Vec2,
    /// Corners of the packed rectangle normalized by the atlas dimensions.
    pub uv: UvRect,
    /// Packed rectangle dimensions in pixels.
    pub source_size: Vec2,
}

/// Build a complete [`FontAsset`] for `charset`.
///
/// Rasterizes and distance-fields every character in parallel, shelf-packs
/// the results into one sheet, and derives per-glyph UV metadata.
/// Characters that fail to rasterize are skipped with a warning; the build
/// fails only if the charset is empty, `fallback` itself ends up missing,
/// or the packed sheet exceeds `config.max_dimension`.
///
/// `raster_font_size` is the size the rasterizer draws glyphs at; it is
/// carried in the asset so loaded atlases know their source scale.
pub fn build_atlas(
    charset: &BTreeSet<char>,
    rasterizer: &dyn GlyphRasterizer,
    fallback: char,
    raster_font_size: f32,
    options: SdfQuadOptions,
    config: &AtlasConfig,
) -> Result<FontAsset> {
    config.validate()?;
    if charset.is_empty() {
        return Err(Error::EmptyCharset);
    }

    let start = Instant::now();

    let threads = if config.parallelism == 0 {
        std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
    } else {
        config.parallelism
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|err| Error::InvalidParameters(format!("worker pool: {err}")))?;

    // Fan out one task per character and join the keyed results after the
    // pool barrier, so no shared map is mutated during the parallel phase.
    let results: Vec<(char, Result<DistanceField>)> = pool.install(|| {
        charset
            .par_iter()
            .map(|&ch| {
                let field = rasterizer.rasterize(ch).and_then(|mask| {
                    sdf::generate(
                        mask.view(),
                        config.upscale_resolution,
                        config.sdf_size,
                        config.padding,
                    )
                });
                (ch, field)
            })
            .collect()
    });

    let mut fields = BTreeMap::new();
    for (ch, result) in results {
        match result {
            Ok(field) => {
                fields.insert(ch, field);
            }
            Err(err) => log::warn!("skipping glyph {ch:?}: {err}"),
        }
    }

    if !fields.contains_key(&fallback) {
        return Err(Error::MissingFallback(fallback));
    }

    log::debug!(
        "computed {} distance fields on {threads} threads in {:?}",
        fields.len(),
        start.elapsed()
    );

    let mut boxes: Vec<PackedRect<(char, DistanceField)>> = fields
        .into_iter()
        .map(|(ch, field)| {
            let (w, h) = (field.width() as u32, field.height() as u32);
            PackedRect::new((ch, field), w, h)
        })
        .collect();
    ShelfPacker::new(config.max_row_width).pack(&mut boxes);

    let (atlas_width, atlas_height) = packing_bound(&boxes);
    if atlas_width > config.max_dimension || atlas_height > config.max_dimension {
        return Err(Error::AtlasOverflow {
            width: atlas_width,
            height: atlas_height,
            max: config.max_dimension,
        });
    }

    // Compose: black background, glyph gray replicated into RGB, opaque
    // alpha.
    let mut pixels = vec![0u8; atlas_width as usize * atlas_height as usize * 4];
    for pixel in pixels.chunks_exact_mut(4) {
        pixel[3] = 255;
    }

    let mut glyphs = BTreeMap::new();
    for rect in &boxes {
        let (ch, field) = &rect.payload;
        blit(
            &mut pixels,
            atlas_width as usize,
            rect.x as usize,
            rect.y as usize,
            field,
        );
        glyphs.insert(
            *ch,
            glyph_properties(rect, atlas_width, atlas_height, config.padding),
        );
    }

    log::debug!(
        "atlas {atlas_width}x{atlas_height} composed in {:?}",
        start.elapsed()
    );

    FontAsset::new(
        pixels,
        atlas_width,
        atlas_height,
        glyphs,
        fallback,
        raster_font_size,
        options,
    )
}

/// Copy one glyph's field into the sheet at its packed offset.
fn blit(pixels: &mut [u8], atlas_width: usize, ox: usize, oy: usize, field: &DistanceField) {
    for y in 0..field.height() {
        for x in 0..field.width() {
            let value = field.pixel(x, y);
            let index = ((oy + y) * atlas_width + ox + x) * 4;
            pixels[index] = value;
            pixels[index + 1] = value;
            pixels[index + 2] = value;
        }
    }
}

/// Normalized UV corners and padding fractions for one packed rectangle.
fn glyph_properties<T>(
    rect: &PackedRect<T>,
    atlas_width: u32,
    atlas_height: u32,
    padding: u32,
) -> GlyphProperties {
    let x = rect.x as f32 / atlas_width as f32;
    let y = rect.y as f32 / atlas_height as f32;
    let w = rect.width as f32 / atlas_width as f32;
    let h = rect.height as f32 / atlas_height as f32;

    GlyphProperties {
        padding_fraction: Vec2::new(
            padding as f32 / rect.width as f32,
            padding as f32 / rect.height as f32,
        ),
        uv: UvRect::from_origin_size(Vec2::new(x, y), Vec2::new(w, h)),
        source_size: Vec2::new(rect.width as f32, rect.height as f32),
    }
}
