//! Outward square-spiral offset walk.

/// Yields integer offsets in an outward square spiral around the origin.
///
/// The walk starts implicitly at `(0, 0)`; each [`advance`](Self::advance)
/// moves one cell along the current ring's edge, producing
/// `(1,0), (1,1), (0,1), (-1,1), (-1,0), (-1,-1), (0,-1), (1,-1), (2,-1), ...`
/// `ring` is the Chebyshev distance of the ring being traced and never
/// decreases, so callers can stop as soon as a ring past their search
/// horizon begins.
#[derive(Debug, Clone)]
pub struct SpiralWalk {
    direction: u8,
    /// Ring (Chebyshev distance) currently being traced, starting at 1.
    pub ring: i32,
    /// Current horizontal offset.
    pub x: i32,
    /// Current vertical offset.
    pub y: i32,
}

impl SpiralWalk {
    pub fn new() -> Self {
        Self {
            direction: 0,
            ring: 1,
            x: 0,
            y: 0,
        }
    }

    /// Advance one cell along the spiral.
    pub fn advance(&mut self) {
        match self.direction {
            0 => {
                self.x += 1;
                if self.x == self.ring {
                    self.direction = 1;
                }
            }
            1 => {
                self.y += 1;
                if self.y == self.ring {
                    self.direction = 2;
                }
            }
            2 => {
                self.x -= 1;
                if -self.x == self.ring {
                    self.direction = 3;
                }
            }
            _ => {
                self.y -= 1;
                if -self.y == self.ring {
                    self.direction = 0;
                    self.ring += 1;
                }
            }
        }
    }
}

impl Default for SpiralWalk {
    fn default() -> Self {
        Self::new()
    }
}
