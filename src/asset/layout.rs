//! Grid layout: the cursor bookkeeping shared by rendering and measuring.

use std::str::Chars;

use crate::geom::Vec2;
use crate::render::{QuadSink, QuadTransform};

use super::FontAsset;

/// One laid-out character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub ch: char,
    /// Center of the glyph quad, in grid space (y grows downward).
    pub center: Vec2,
    /// Horizontal extent of the placed glyph.
    pub advance: f32,
    /// Spaces and newlines produce no drawable quad.
    pub empty: bool,
}

/// Lazy placement sequence for one string at one size.
///
/// A pure function of the string and the asset's current spacing fields:
/// restartable, performs no I/O, never blocks.
pub struct Placements<'a> {
    asset: &'a FontAsset,
    chars: Chars<'a>,
    size: f32,
    line_height: f32,
    x: f32,
    y: f32,
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        loop {
            let ch = self.chars.next()?;
            match ch {
                // Consumed silently so "\r\n" collapses to one newline
                // event.
                '\r' => {}
                ' ' => {
                    let placement = Placement {
                        ch,
                        center: Vec2::new(self.x, self.y),
                        advance: 0.0,
                        empty: true,
                    };
                    self.x += self.asset.space_advance * self.size;
                    return Some(placement);
                }
                '\n' => {
                    let placement = Placement {
                        ch,
                        center: Vec2::new(self.x, self.y),
                        advance: 0.0,
                        empty: true,
                    };
                    self.y += self.line_height;
                    self.x = 0.0;
                    return Some(placement);
                }
                _ => {
                    let char_size = self.asset.measure_char(ch, self.size, true);
                    let center = Vec2::new(self.x + char_size.x * 0.5, self.y + self.size * 0.5);
                    self.x += char_size.x + self.asset.horizontal_spacing * self.size;
                    return Some(Placement {
                        ch,
                        center,
                        advance: char_size.x,
                        empty: false,
                    });
                }
            }
        }
    }
}

impl FontAsset {
    /// Normalized draw size of `ch` at `size`.
    ///
    /// With `without_padding`, the padding border is subtracted from the
    /// source extent before normalizing, giving the visible glyph size the
    /// grid advances by.
    pub fn measure_char(&self, ch: char, size: f32, without_padding: bool) -> Vec2 {
        let props = self.properties(ch);
        let mut glyph_size = props.source_size;
        if without_padding {
            glyph_size = glyph_size - props.padding_fraction * props.source_size * 2.0;
        }
        glyph_size.normalize() * size
    }

    /// Tallest padding-free glyph at `size`, plus the vertical spacing.
    pub fn line_height(&self, size: f32) -> f32 {
        let tallest = self
            .glyphs
            .keys()
            .map(|&ch| self.measure_char(ch, size, true).y)
            .fold(0.0, f32::max);
        tallest + self.vertical_spacing * size
    }

    /// Lazy grid placements for `text` at `size`.
    pub fn placements<'a>(&'a self, text: &'a str, size: f32) -> Placements<'a> {
        Placements {
            asset: self,
            chars: text.chars(),
            size,
            line_height: self.line_height(size),
            x: 0.0,
            y: 0.0,
        }
    }

    /// Bounding box of the visible glyphs in `text` at `size`.
    ///
    /// Strings with no visible glyph (empty, whitespace, bare newlines)
    /// measure `(0, 0)`.
    pub fn measure(&self, text: &str, size: f32) -> Vec2 {
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        let mut seen_glyph = false;

        for placement in self.placements(text, size) {
            if placement.empty {
                continue;
            }
            seen_glyph = true;
            let half = Vec2::new(placement.advance * 0.5, size * 0.5);
            min = min.min(placement.center - half);
            max = max.max(placement.center + half);
        }

        if seen_glyph { max - min } else { Vec2::ZERO }
    }

    /// Emit one SDF quad per visible glyph in `text` to `sink`.
    ///
    /// `position` is the layout origin in screen space. Grid rows grow
    /// downward while screen y grows upward, so the accumulated grid
    /// offset is subtracted on y. A `color_override` replaces the tint on
    /// all four corner records for the whole string.
    pub fn render<S: QuadSink>(
        &self,
        sink: &mut S,
        position: Vec2,
        text: &str,
        color_override: Option<[f32; 3]>,
        size: f32,
    ) {
        let options = match color_override {
            Some(tint) => self.options.with_tint(tint),
            None => self.options,
        };

        for placement in self.placements(text, size) {
            if placement.empty {
                continue;
            }
            let translation = Vec2::new(
                position.x + placement.center.x,
                position.y - placement.center.y,
            );
            sink.push_quad(
                QuadTransform {
                    scale: size,
                    translation,
                },
                self.properties(placement.ch).uv,
                options,
            );
        }
    }
}
