//! Integer grid geometry for room placement.
//!
//! Rooms live on a signed tile grid. A room's bounds are the rectangle that
//! just encloses its tilemap, given as the bottom-left and top-right corners.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A position on the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for GridPoint {
    type Output = GridPoint;

    fn add(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPoint {
    type Output = GridPoint;

    fn sub(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Closed-interval overlap test.
///
/// Touching endpoints count as overlap: doorway tiles must align without
/// gaps, so two rooms flush against a shared boundary are treated as
/// overlapping and rejected.
pub fn intervals_overlap(min1: i32, max1: i32, min2: i32, max2: i32) -> bool {
    min1.max(min2) <= max1.min(max2)
}

/// An axis-aligned rectangle of tiles, corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Bottom-left corner
    pub lower: GridPoint,
    /// Top-right corner
    pub upper: GridPoint,
}

impl Bounds {
    pub const fn new(lower: GridPoint, upper: GridPoint) -> Self {
        Self { lower, upper }
    }

    /// Check if this rectangle overlaps another (closed intervals on both axes)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        intervals_overlap(self.lower.x, self.upper.x, other.lower.x, other.upper.x)
            && intervals_overlap(self.lower.y, self.upper.y, other.lower.y, other.upper.y)
    }

    /// Footprint of the rectangle (upper minus lower)
    pub fn size(&self) -> GridPoint {
        self.upper - self.lower
    }

    /// Translate both corners so that the footprint is preserved
    pub fn translated_to(&self, lower: GridPoint) -> Bounds {
        Bounds::new(lower, lower + self.size())
    }
}
