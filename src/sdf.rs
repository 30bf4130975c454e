//! Distance-field generation from binary glyph masks.
//!
//! Converts one glyph's raster into a grayscale field where 127-128
//! approximates the mask boundary, values rise toward 255 inside the shape
//! and fall toward 0 outside. The per-cell search walks a square spiral
//! outward and stops once the ring holding the first unlike cell has been
//! fully scanned, so a boundary cell found early in a ring cannot shadow a
//! closer one later in the same ring.

use crate::error::{Error, Result};
use crate::geom::map_range;
use crate::mask::BitMask;
use crate::spiral::SpiralWalk;

/// A grayscale distance field, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl DistanceField {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[x + y * self.width]
    }
}

/// Generate a distance field for `mask`.
///
/// `upscale_resolution` sets the density of the search grid relative to
/// the source raster; the search radius is `spread = upscale_resolution / 2`.
/// `target_size` is the output resolution before padding and `padding` the
/// extra border on every side, both in output pixels. The core output
/// region keeps the source aspect ratio: a mask of `w x h` cells maps to
/// `target_size * w / upscale_resolution` by
/// `target_size * h / upscale_resolution` core pixels.
pub fn generate(
    mask: BitMask<'_>,
    upscale_resolution: u32,
    target_size: u32,
    padding: u32,
) -> Result<DistanceField> {
    let spread = (upscale_resolution / 2) as i32;
    if spread < 1 {
        return Err(Error::InvalidParameters(
            "upscale resolution must be at least 2".into(),
        ));
    }

    let mask_w = mask.width() as i32;
    let mask_h = mask.height() as i32;
    if mask_w == 0 || mask_h == 0 {
        return Err(Error::InvalidParameters("empty glyph mask".into()));
    }

    let char_w = (target_size as f32 * mask_w as f32 / upscale_resolution as f32) as i32;
    let char_h = (target_size as f32 * mask_h as f32 / upscale_resolution as f32) as i32;
    if char_w < 1 || char_h < 1 {
        return Err(Error::InvalidParameters(format!(
            "glyph core region truncates to {char_w}x{char_h} pixels"
        )));
    }

    let padding = padding as i32;
    let out_w = (char_w + 2 * padding) as usize;
    let out_h = (char_h + 2 * padding) as usize;

    // Scale factors between the core output grid and the source raster.
    let scale_x = mask_w as f32 / char_w as f32;
    let scale_y = mask_h as f32 / char_h as f32;

    let min_pad_x = -padding as f32 * scale_x;
    let min_pad_y = -padding as f32 * scale_y;
    let padded_w = char_w + padding;
    let padded_h = char_h + padding;

    // Every lit source cell, for the brute-force fallback when a padding
    // cell maps outside the raster entirely.
    let mut lit = Vec::new();
    for y in 0..mask_h {
        for x in 0..mask_w {
            if mask.sample(x, y).0 == 1 {
                lit.push((x, y));
            }
        }
    }

    let mut pixels = vec![0u8; out_w * out_h];

    for y in -padding..char_h + padding {
        for x in -padding..char_w + padding {
            let glyph_x = map_range(
                x as f32,
                -padding as f32,
                padded_w as f32,
                min_pad_x,
                padded_w as f32 * scale_x,
            ) as i32;
            let glyph_y = map_range(
                y as f32,
                -padding as f32,
                padded_h as f32,
                min_pad_y,
                padded_h as f32 * scale_y,
            ) as i32;

            let distance = nearest_unlike(mask, glyph_x, glyph_y, spread, &lit);

            let index = (x + padding) as usize + (y + padding) as usize * out_w;
            pixels[index] = (distance * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }

    Ok(DistanceField {
        pixels,
        width: out_w,
        height: out_h,
    })
}

/// Normalized distance from `(px, py)` to the nearest cell of unlike state.
///
/// In-bounds cells search outward with [`SpiralWalk`], capped at
/// `4 * spread^2` visits. A cell outside the raster has no local
/// neighborhood to walk, so it falls back to a brute-force scan of the lit
/// cells. Returns a value in `[0, 1]` with 0.5 at the boundary, larger
/// inside the shape.
fn nearest_unlike(mask: BitMask<'_>, px: i32, py: i32, spread: i32, lit: &[(i32, i32)]) -> f32 {
    let (state, out_of_bounds) = mask.sample(px, py);
    let mut min_sqr = (spread * spread) as f32;

    if out_of_bounds {
        for &(x, y) in lit {
            let dx = px - x;
            let dy = py - y;
            let d_sqr = (dx * dx + dy * dy) as f32;
            if d_sqr < min_sqr {
                min_sqr = d_sqr;
            }
        }
    } else {
        let mut walk = SpiralWalk::new();
        // Ring of the first unlike cell. The rest of that ring may still
        // hold a closer cell, so the walk runs until the ring completes.
        let mut found_ring = -1;

        for _ in 0..4 * spread * spread {
            if found_ring != -1 && walk.ring > found_ring {
                break;
            }

            if mask.sample(px + walk.x, py + walk.y).0 != state {
                found_ring = walk.ring;
                let d_sqr = (walk.x * walk.x + walk.y * walk.y) as f32;
                if d_sqr < min_sqr {
                    min_sqr = d_sqr;
                }
            }

            walk.advance();
        }
    }

    let distance = min_sqr.sqrt();
    let mut normalized = (distance - 0.5) / (spread as f32 - 0.5);
    if state == 0 {
        normalized = -normalized;
    }
    (normalized + 1.0) * 0.5
}
