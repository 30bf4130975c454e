use std::collections::{BTreeMap, BTreeSet};

use super::FontAsset;
use crate::atlas::{AtlasConfig, GlyphProperties, build_atlas};
use crate::error::Error;
use crate::geom::{UvRect, Vec2};
use crate::mask::GlyphMask;
use crate::options::{SdfOptions, SdfQuadOptions};
use crate::render::{GlyphRasterizer, QuadSink, QuadTransform, TextureUploader};

const EPS: f32 = 1e-3;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

/// Two hand-built glyphs with different aspect ratios. 'a' is square,
/// the fallback '?' is twice as tall as it is wide.
fn test_asset() -> FontAsset {
    let mut glyphs = BTreeMap::new();
    glyphs.insert(
        'a',
        GlyphProperties {
            padding_fraction: Vec2::new(0.25, 0.25),
            uv: UvRect::from_origin_size(Vec2::ZERO, Vec2::new(0.5, 0.5)),
            source_size: Vec2::new(64.0, 64.0),
        },
    );
    glyphs.insert(
        '?',
        GlyphProperties {
            padding_fraction: Vec2::new(0.25, 0.125),
            uv: UvRect::from_origin_size(Vec2::new(0.5, 0.0), Vec2::new(0.25, 0.5)),
            source_size: Vec2::new(32.0, 64.0),
        },
    );

    FontAsset::new(
        vec![0; 2 * 2 * 4],
        2,
        2,
        glyphs,
        '?',
        48.0,
        SdfQuadOptions::default(),
    )
    .unwrap()
}

struct CircleRasterizer;

impl GlyphRasterizer for CircleRasterizer {
    fn rasterize(&self, ch: char) -> crate::error::Result<GlyphMask> {
        let n = 16usize;
        let radius = n as f32 / 4.0 + (ch as u32 % 5) as f32;
        let center = n as f32 / 2.0;
        let mut data = vec![0u8; n * n];
        for y in 0..n {
            for x in 0..n {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                if dx * dx + dy * dy <= radius * radius {
                    data[x + y * n] = 1;
                }
            }
        }
        GlyphMask::new(data, n, n)
    }
}

fn built_asset() -> FontAsset {
    let charset: BTreeSet<char> = "ab?".chars().collect();
    let config = AtlasConfig {
        max_row_width: 128,
        upscale_resolution: 16,
        sdf_size: 16,
        padding: 4,
        parallelism: 1,
        max_dimension: 4096,
    };
    build_atlas(
        &charset,
        &CircleRasterizer,
        '?',
        32.0,
        SdfQuadOptions::default(),
        &config,
    )
    .unwrap()
}

#[derive(Default)]
struct CollectSink {
    quads: Vec<(QuadTransform, UvRect, SdfQuadOptions)>,
}

impl QuadSink for CollectSink {
    fn push_quad(&mut self, transform: QuadTransform, uv: UvRect, options: SdfQuadOptions) {
        self.quads.push((transform, uv, options));
    }
}

struct RecordingUploader {
    uploaded: Option<(usize, u32, u32)>,
}

impl TextureUploader for RecordingUploader {
    type Handle = u64;

    fn upload(&mut self, pixels: &[u8], width: u32, height: u32) -> u64 {
        self.uploaded = Some((pixels.len(), width, height));
        7
    }
}

#[test]
fn fallback_must_be_in_the_map() {
    let result = FontAsset::new(
        vec![0; 4],
        1,
        1,
        BTreeMap::new(),
        '?',
        48.0,
        SdfQuadOptions::default(),
    );
    assert!(matches!(result, Err(Error::MissingFallback('?'))));
}

#[test]
fn unmapped_characters_resolve_to_the_fallback_glyph() {
    let asset = test_asset();
    let missing = asset.properties('z');
    let fallback = asset.properties('?');
    assert_eq!(missing, fallback);
    // And a mapped character resolves to itself.
    assert_eq!(
        asset.properties('a').source_size,
        Vec2::new(64.0, 64.0)
    );
}

#[test]
fn measure_char_is_normalized_to_the_draw_size() {
    let asset = test_asset();
    // Padding-free extent is re-normalized, so the result always has
    // length `size` regardless of the glyph's aspect.
    for ch in ['a', '?', 'z'] {
        let measured = asset.measure_char(ch, 10.0, true);
        assert!(approx(measured.length(), 10.0));
    }
    // 'a' is square: padding-free (32, 32) normalizes to an even split.
    let a = asset.measure_char('a', 10.0, true);
    assert!(approx(a.x, a.y));
    // '?' keeps its 16x48 padding-free aspect.
    let q = asset.measure_char('?', 10.0, true);
    assert!(approx(q.y / q.x, 3.0));
}

#[test]
fn measure_of_invisible_strings_is_zero() {
    let asset = test_asset();
    for text in ["", "\n", "\r\n", "   ", " \n "] {
        assert_eq!(asset.measure(text, 12.0), Vec2::ZERO, "text {text:?}");
    }
}

#[test]
fn measure_single_glyph_is_advance_by_size() {
    let asset = test_asset();
    let measured = asset.measure("a", 10.0);
    let advance = asset.measure_char('a', 10.0, true).x;
    assert!(approx(measured.x, advance));
    assert!(approx(measured.y, 10.0));
}

#[test]
fn measure_is_monotone_in_size() {
    let asset = test_asset();
    let text = "aa\na?a";
    let mut previous = Vec2::ZERO;
    for size in [1.0, 2.0, 5.0, 8.5, 20.0] {
        let measured = asset.measure(text, size);
        assert!(measured.x >= previous.x);
        assert!(measured.y >= previous.y);
        previous = measured;
    }
}

#[test]
fn crlf_collapses_to_one_newline_event() {
    let asset = test_asset();
    let crlf: Vec<char> = asset.placements("a\r\nb", 10.0).map(|p| p.ch).collect();
    let lf: Vec<char> = asset.placements("a\nb", 10.0).map(|p| p.ch).collect();
    assert_eq!(crlf, lf);
    assert_eq!(asset.measure("a\r\nb", 10.0), asset.measure("a\nb", 10.0));
}

#[test]
fn newline_resets_x_and_drops_a_line() {
    let asset = test_asset();
    let placements: Vec<_> = asset.placements("a\na", 10.0).collect();
    assert_eq!(placements.len(), 3);
    let first = placements[0];
    let second = placements[2];
    assert!(approx(first.center.x, second.center.x));
    assert!(approx(
        second.center.y - first.center.y,
        asset.line_height(10.0)
    ));
}

#[test]
fn line_height_is_the_tallest_glyph_plus_spacing() {
    let asset = test_asset();
    let size = 10.0;
    let tallest = ['a', '?']
        .iter()
        .map(|&ch| asset.measure_char(ch, size, true).y)
        .fold(0.0, f32::max);
    assert!(approx(
        asset.line_height(size),
        tallest + asset.vertical_spacing() * size
    ));
}

#[test]
fn render_emits_one_quad_per_visible_glyph() {
    let asset = test_asset();
    let mut sink = CollectSink::default();
    asset.render(&mut sink, Vec2::new(100.0, 50.0), "a b\n?", None, 10.0);

    assert_eq!(sink.quads.len(), 3);
    for (transform, _, options) in &sink.quads {
        assert!(approx(transform.scale, 10.0));
        assert_eq!(*options, asset.options());
    }

    // First glyph: centered half an advance to the right of the origin,
    // half a size down, with y flipped into screen space.
    let advance = asset.measure_char('a', 10.0, true).x;
    let (transform, uv, _) = &sink.quads[0];
    assert!(approx(transform.translation.x, 100.0 + advance * 0.5));
    assert!(approx(transform.translation.y, 50.0 - 5.0));
    assert_eq!(*uv, asset.properties('a').uv);

    // The second line's glyph sits a line height lower in grid space,
    // which is further down (more negative) in screen space.
    let (last, uv, _) = &sink.quads[2];
    assert!(approx(
        last.translation.y,
        50.0 - 5.0 - asset.line_height(10.0)
    ));
    assert!(approx(last.translation.x, 100.0 + asset.measure_char('?', 10.0, true).x * 0.5));
    assert_eq!(*uv, asset.properties('?').uv);
}

#[test]
fn render_color_override_tints_every_corner() {
    let asset = test_asset();
    let mut sink = CollectSink::default();
    asset.render(
        &mut sink,
        Vec2::ZERO,
        "aa",
        Some([0.1, 0.2, 0.3]),
        10.0,
    );

    assert_eq!(sink.quads.len(), 2);
    for (_, _, options) in &sink.quads {
        assert!(
            options
                .corners
                .iter()
                .all(|corner| corner.tint == [0.1, 0.2, 0.3])
        );
    }
    // The asset's own options are untouched.
    assert_eq!(asset.options().corners[0].tint, [1.0, 1.0, 1.0]);
}

#[test]
fn save_load_round_trips_losslessly() {
    let mut asset = built_asset();
    asset.set_vertical_spacing(0.02);
    asset.set_horizontal_spacing(0.07);
    asset.set_space_advance(0.45);
    let mut options = SdfQuadOptions::uniform(SdfOptions::new(
        0.1,
        0.05,
        0.9,
        [0.25, 0.5, 0.75],
    ));
    options.corners[3].weight = 0.2;
    asset.set_options(options);

    let mut bytes = Vec::new();
    asset.save(&mut bytes).unwrap();
    let restored = FontAsset::load(&mut bytes.as_slice()).unwrap();

    assert_eq!(restored.atlas_width(), asset.atlas_width());
    assert_eq!(restored.atlas_height(), asset.atlas_height());
    assert_eq!(restored.atlas_pixels(), asset.atlas_pixels());
    assert_eq!(restored.glyphs(), asset.glyphs());
    assert_eq!(restored.fallback(), asset.fallback());
    assert_eq!(restored.raster_font_size(), asset.raster_font_size());
    assert_eq!(restored.options(), asset.options());
    assert_eq!(restored.vertical_spacing(), asset.vertical_spacing());
    assert_eq!(restored.horizontal_spacing(), asset.horizontal_spacing());
    assert_eq!(restored.space_advance(), asset.space_advance());
}

#[test]
fn load_rejects_bad_magic_and_version() {
    let mut bytes = Vec::new();
    built_asset().save(&mut bytes).unwrap();

    let mut wrong_magic = bytes.clone();
    wrong_magic[0] = b'X';
    assert!(matches!(
        FontAsset::load(&mut wrong_magic.as_slice()),
        Err(Error::CorruptAsset(_))
    ));

    let mut wrong_version = bytes;
    wrong_version[4] = 99;
    assert!(matches!(
        FontAsset::load(&mut wrong_version.as_slice()),
        Err(Error::CorruptAsset(_))
    ));
}

#[test]
fn load_rejects_a_truncated_stream() {
    let mut bytes = Vec::new();
    built_asset().save(&mut bytes).unwrap();

    for len in [0, 3, 8, 30, bytes.len() - 1] {
        let truncated = &bytes[..len];
        assert!(
            matches!(
                FontAsset::load(&mut &truncated[..]),
                Err(Error::CorruptAsset(_))
            ),
            "length {len}"
        );
    }
}

#[test]
fn upload_hands_the_whole_buffer_to_the_backend() {
    let asset = built_asset();
    let mut uploader = RecordingUploader { uploaded: None };
    let handle = asset.upload_atlas(&mut uploader);
    assert_eq!(handle, 7);
    assert_eq!(
        uploader.uploaded,
        Some((
            asset.atlas_pixels().len(),
            asset.atlas_width(),
            asset.atlas_height()
        ))
    );
}
