//! Axis-aligned bounding boxes and per-axis penetration queries.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Coordinate axis used by per-axis collision queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The X axis; positive values point east.
    Horizontal,
    /// The Y axis; positive values point south.
    Vertical,
}

/// Axis-aligned rectangle with an integer top-left corner and size.
///
/// Boxes follow screen conventions: `y` grows downwards and the right and
/// bottom edges are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl BoundingBox {
    /// Zero-sized box anchored at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a box whose corner mirrors the provided world position.
    ///
    /// Fractional coordinates are floored so that boxes remain stable when
    /// positions cross zero.
    #[must_use]
    pub fn at(position: Vec2, width: u32, height: u32) -> Self {
        debug_assert!(
            position.is_finite(),
            "bounding box position must be finite"
        );
        Self::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            width,
            height,
        )
    }

    /// Creates a box spanning the provided edges, collapsing to empty when inverted.
    #[must_use]
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        if right <= left || bottom <= top {
            return Self::EMPTY;
        }
        Self::new(
            left,
            top,
            right.abs_diff(left),
            bottom.abs_diff(top),
        )
    }

    /// Horizontal coordinate of the top-left corner.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the top-left corner.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width of the box.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the box.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Left edge, inclusive.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge, inclusive.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge, exclusive.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Bottom edge, exclusive.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Top-left corner as a world position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Number of pixels covered by the box.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the box covers no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Returns a copy of the box moved to the provided position.
    #[must_use]
    pub fn with_position(&self, position: Vec2) -> Self {
        Self::at(position, self.width, self.height)
    }

    /// Returns a copy of the box shifted by the provided amounts.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlapping region shared by both boxes, empty when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::from_edges(
            self.left().max(other.left()),
            self.top().max(other.top()),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Smallest box containing both operands. Empty operands are ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Reports whether `other` lies entirely within this box.
    ///
    /// Empty boxes are contained by every box.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.is_empty()
            || (other.left() >= self.left()
                && other.top() >= self.top()
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Start coordinate of the box along the provided axis.
    #[must_use]
    pub const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent of the box along the provided axis.
    #[must_use]
    pub const fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Signed penetration depth of `a` into `b` along one axis.
///
/// Uses the center-distance method: when the boxes overlap on the axis the
/// result is the shortest distance that separates them, positive when `a`
/// should move toward increasing coordinates and negative otherwise. Boxes
/// that merely touch or do not overlap yield exactly zero.
#[must_use]
pub fn intersection_depth(axis: Axis, a: &BoundingBox, b: &BoundingBox) -> f32 {
    let half_a = a.extent(axis) as f32 / 2.0;
    let half_b = b.extent(axis) as f32 / 2.0;

    let center_a = a.start(axis) as f32 + half_a;
    let center_b = b.start(axis) as f32 + half_b;

    let distance = center_a - center_b;
    let min_distance = half_a + half_b;

    if distance.abs() >= min_distance {
        return 0.0;
    }

    if distance > 0.0 {
        min_distance - distance
    } else {
        -min_distance - distance
    }
}
