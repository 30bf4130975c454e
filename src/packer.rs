//! Greedy shelf packing for glyph rectangles.
//!
//! Rectangles are stable-sorted ascending by height, then placed left to
//! right in shelves that wrap when the row width is exhausted. Ascending
//! order can waste vertical space compared to the usual descending-height
//! heuristic, but it is kept for output compatibility with existing
//! atlases; see DESIGN.md.

/// A rectangle with payload, annotated with its packed position.
#[derive(Debug, Clone)]
pub struct PackedRect<T> {
    pub payload: T,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub packed: bool,
}

impl<T> PackedRect<T> {
    /// An unpacked rectangle at the origin.
    pub fn new(payload: T, width: u32, height: u32) -> Self {
        Self {
            payload,
            x: 0,
            y: 0,
            width,
            height,
            packed: false,
        }
    }
}

/// Greedy shelf packer with a fixed maximum row width.
#[derive(Debug, Clone, Copy)]
pub struct ShelfPacker {
    max_row_width: u32,
}

impl ShelfPacker {
    pub fn new(max_row_width: u32) -> Self {
        Self { max_row_width }
    }

    /// Assign a position to every rectangle in `rects`.
    ///
    /// Sorts ascending by height (stable), then walks the shelves: when
    /// the next rectangle would overflow the row, the cursor drops by the
    /// tallest height seen in that row and returns to x = 0. A rectangle
    /// wider than the row limit gets a shelf of its own.
    pub fn pack<T>(&self, rects: &mut [PackedRect<T>]) {
        rects.sort_by_key(|rect| rect.height);

        let mut x = 0;
        let mut y = 0;
        let mut row_height = 0;

        for rect in rects.iter_mut() {
            if x + rect.width > self.max_row_width {
                y += row_height;
                x = 0;
                row_height = 0;
            }

            rect.x = x;
            rect.y = y;
            x += rect.width;
            row_height = row_height.max(rect.height);
            rect.packed = true;
        }
    }
}

/// The tight bound `(max(x + width), max(y + height))` over all rectangles.
pub fn packing_bound<T>(rects: &[PackedRect<T>]) -> (u32, u32) {
    rects.iter().fold((0, 0), |(w, h), rect| {
        (w.max(rect.x + rect.width), h.max(rect.y + rect.height))
    })
}
