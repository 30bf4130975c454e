//! Small 2D value types shared by the distance-field, packing, and layout
//! code.

use std::ops::{Add, Mul, Sub};

/// A 2D vector of `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector with the same direction. Zero stays zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Componentwise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// Componentwise product, used for scaling a size by a per-axis fraction.
impl Mul for Vec2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

/// Linearly remap `value` from `[src_min, src_max]` to `[dst_min, dst_max]`.
pub fn map_range(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    (value - src_min) * (dst_max - dst_min) / (src_max - src_min) + dst_min
}

/// The four corners of a texture rectangle in normalized UV space.
///
/// Corner order matches the quad vertex order the renderer consumes:
/// bottom-right, top-right, top-left, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub bottom_right: Vec2,
    pub top_right: Vec2,
    pub top_left: Vec2,
    pub bottom_left: Vec2,
}

impl UvRect {
    /// The full `[0,1]x[0,1]` texture.
    pub const FULL: Self = Self {
        bottom_right: Vec2 { x: 1.0, y: 1.0 },
        top_right: Vec2 { x: 1.0, y: 0.0 },
        top_left: Vec2 { x: 0.0, y: 0.0 },
        bottom_left: Vec2 { x: 0.0, y: 1.0 },
    };

    /// Rectangle from a top-left origin and a size, both normalized.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            bottom_right: origin + size,
            top_right: Vec2::new(origin.x + size.x, origin.y),
            top_left: origin,
            bottom_left: Vec2::new(origin.x, origin.y + size.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_right.y - self.top_left.y
    }
}
