//! Binary persistence with an explicit, versioned schema.
//!
//! Field order and types are fixed at this boundary: magic, version,
//! PNG-compressed atlas, glyph map in ascending character order, fallback
//! character, per-corner options, spacing scalars. All integers and floats
//! are little-endian. [`FontAsset::load`] is the exact inverse of
//! [`FontAsset::save`] and round-trips losslessly.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Read, Write};

use image::ImageFormat;

use crate::atlas::GlyphProperties;
use crate::error::{Error, Result};
use crate::geom::{UvRect, Vec2};
use crate::options::{SdfOptions, SdfQuadOptions};

use super::FontAsset;

const MAGIC: [u8; 4] = *b"SDFA";
const VERSION: u16 = 1;

impl FontAsset {
    /// Serialize the asset to `sink`.
    ///
    /// The atlas is stored as a lossless PNG; every other field is written
    /// in the fixed schema order.
    pub fn save<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&MAGIC)?;
        sink.write_all(&VERSION.to_le_bytes())?;

        let png = self.encode_atlas_png()?;
        write_u32(sink, png.len() as u32)?;
        sink.write_all(&png)?;

        write_u32(sink, self.glyphs.len() as u32)?;
        for (&ch, props) in &self.glyphs {
            write_u32(sink, ch as u32)?;
            write_vec2(sink, props.padding_fraction)?;
            write_vec2(sink, props.uv.bottom_right)?;
            write_vec2(sink, props.uv.top_right)?;
            write_vec2(sink, props.uv.top_left)?;
            write_vec2(sink, props.uv.bottom_left)?;
            write_vec2(sink, props.source_size)?;
        }

        write_u32(sink, self.fallback as u32)?;

        for corner in &self.options.corners {
            write_f32(sink, corner.weight)?;
            write_f32(sink, corner.smoothing)?;
            write_f32(sink, corner.alpha)?;
            for &channel in &corner.tint {
                write_f32(sink, channel)?;
            }
        }

        write_f32(sink, self.vertical_spacing)?;
        write_f32(sink, self.horizontal_spacing)?;
        write_f32(sink, self.raster_font_size)?;
        write_f32(sink, self.space_advance)?;

        sink.flush()?;
        Ok(())
    }

    /// Deserialize an asset written by [`FontAsset::save`].
    pub fn load<R: Read>(source: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(source, &mut magic)?;
        if magic != MAGIC {
            return Err(Error::CorruptAsset("bad magic".into()));
        }
        let version = read_u16(source)?;
        if version != VERSION {
            return Err(Error::CorruptAsset(format!(
                "unsupported version {version}"
            )));
        }

        let png_len = read_u32(source)? as usize;
        let mut png = vec![0u8; png_len];
        read_exact(source, &mut png)?;
        let (pixels, width, height) = decode_atlas_png(&png)?;

        let count = read_u32(source)?;
        let mut glyphs = BTreeMap::new();
        for _ in 0..count {
            let ch = read_char(source)?;
            let padding_fraction = read_vec2(source)?;
            let uv = UvRect {
                bottom_right: read_vec2(source)?,
                top_right: read_vec2(source)?,
                top_left: read_vec2(source)?,
                bottom_left: read_vec2(source)?,
            };
            let source_size = read_vec2(source)?;
            glyphs.insert(
                ch,
                GlyphProperties {
                    padding_fraction,
                    uv,
                    source_size,
                },
            );
        }

        let fallback = read_char(source)?;

        let mut corners = [SdfOptions::default(); 4];
        for corner in &mut corners {
            corner.weight = read_f32(source)?;
            corner.smoothing = read_f32(source)?;
            corner.alpha = read_f32(source)?;
            for channel in &mut corner.tint {
                *channel = read_f32(source)?;
            }
        }

        let vertical_spacing = read_f32(source)?;
        let horizontal_spacing = read_f32(source)?;
        let raster_font_size = read_f32(source)?;
        let space_advance = read_f32(source)?;

        let mut asset = Self::new(
            pixels,
            width,
            height,
            glyphs,
            fallback,
            raster_font_size,
            SdfQuadOptions { corners },
        )?;
        asset.vertical_spacing = vertical_spacing;
        asset.horizontal_spacing = horizontal_spacing;
        asset.space_advance = space_advance;
        Ok(asset)
    }

    fn encode_atlas_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut out,
            &self.atlas_pixels,
            self.atlas_width,
            self.atlas_height,
            image::ExtendedColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(|err| Error::Io(io::Error::other(err.to_string())))?;
        Ok(out.into_inner())
    }
}

fn decode_atlas_png(png: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
    let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|err| Error::CorruptAsset(format!("atlas image: {err}")))?;
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

fn write_u32<W: Write>(sink: &mut W, value: u32) -> io::Result<()> {
    sink.write_all(&value.to_le_bytes())
}

fn write_f32<W: Write>(sink: &mut W, value: f32) -> io::Result<()> {
    sink.write_all(&value.to_le_bytes())
}

fn write_vec2<W: Write>(sink: &mut W, value: Vec2) -> io::Result<()> {
    write_f32(sink, value.x)?;
    write_f32(sink, value.y)
}

/// `read_exact` that reports truncation as a schema error rather than a
/// plain I/O failure.
fn read_exact<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<()> {
    source.read_exact(buf).map_err(|err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::CorruptAsset("truncated stream".into())
        } else {
            Error::Io(err)
        }
    })
}

fn read_u16<R: Read>(source: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    read_exact(source, &mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(source: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(source, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32<R: Read>(source: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    read_exact(source, &mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_char<R: Read>(source: &mut R) -> Result<char> {
    let raw = read_u32(source)?;
    char::from_u32(raw).ok_or_else(|| Error::CorruptAsset(format!("invalid character {raw:#x}")))
}

fn read_vec2<R: Read>(source: &mut R) -> Result<Vec2> {
    Ok(Vec2::new(read_f32(source)?, read_f32(source)?))
}
