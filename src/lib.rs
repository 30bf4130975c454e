//! Signed-distance-field glyph atlases and the text layout that consumes
//! them.
//!
//! The pipeline: a caller-supplied [`GlyphRasterizer`] turns characters
//! into binary masks; [`sdf`] converts each mask into a grayscale distance
//! field by searching a square spiral for the nearest unlike cell;
//! [`packer`] shelves the fields into one sheet. [`build_atlas`] wires the
//! stages together, fanning the per-glyph work out over a worker pool, and
//! wraps the result as a [`FontAsset`], which lays out, measures, and
//! emits SDF quads for arbitrary strings and round-trips through an
//! explicit binary format.
//!
//! Rasterization and GPU work stay outside the crate, behind the
//! [`render`] traits.

pub mod asset;
pub mod atlas;
pub mod error;
pub mod geom;
pub mod mask;
pub mod options;
pub mod packer;
pub mod render;
pub mod sdf;
pub mod spiral;

pub use asset::{FontAsset, Placement, Placements};
pub use atlas::{AtlasConfig, GlyphProperties, build_atlas};
pub use error::{Error, Result};
pub use geom::{UvRect, Vec2};
pub use mask::{BitMask, GlyphMask};
pub use options::{SdfOptions, SdfQuadOptions};
pub use render::{GlyphRasterizer, QuadSink, QuadTransform, TextureUploader};
pub use sdf::DistanceField;
pub use spiral::SpiralWalk;
