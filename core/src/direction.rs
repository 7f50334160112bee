//! Eight-way compass directions and their vector/angle conversions.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Compass direction, including the diagonals and the absence of a direction.
///
/// North points toward decreasing `y`. Angles start at North and increase
/// clockwise in steps of a quarter pi.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward decreasing `y` and increasing `x`.
    NorthEast,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `y` and increasing `x`.
    SouthEast,
    /// Toward increasing `y`.
    South,
    /// Toward increasing `y` and decreasing `x`.
    SouthWest,
    /// Toward decreasing `x`.
    West,
    /// Toward decreasing `y` and decreasing `x`.
    NorthWest,
    /// No direction at all.
    #[default]
    None,
}

impl Direction {
    /// The eight compass directions in clockwise order starting at North.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The four cardinal directions in clockwise order starting at North.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit-grid vector for the direction; diagonals are not normalised.
    #[must_use]
    pub fn to_vector(self) -> Vec2 {
        let (dx, dy) = self.components();
        Vec2::new(dx as f32, dy as f32)
    }

    /// Integer `(dx, dy)` components of the direction.
    #[must_use]
    pub const fn components(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::None => (0, 0),
        }
    }

    /// Heading of the direction in radians, clockwise from North.
    #[must_use]
    pub fn to_radians(self) -> f64 {
        match self {
            Self::North | Self::None => 0.0,
            Self::NorthEast => FRAC_PI_4,
            Self::East => FRAC_PI_2,
            Self::SouthEast => 3.0 * FRAC_PI_4,
            Self::South => PI,
            Self::SouthWest => 5.0 * FRAC_PI_4,
            Self::West => 3.0 * FRAC_PI_2,
            Self::NorthWest => 7.0 * FRAC_PI_4,
        }
    }

    /// Reports whether the direction has an east-west component.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        self.components().0 != 0
    }

    /// Reports whether the direction has a north-south component.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        self.components().1 != 0
    }

    /// Direction pointing the opposite way; `None` stays `None`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        let (dx, dy) = self.components();
        Self::from_components(-dx, -dy)
    }

    /// Direction whose components share the signs of `dx` and `dy`.
    #[must_use]
    pub const fn from_components(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Self::North,
            (1, -1) => Self::NorthEast,
            (1, 0) => Self::East,
            (1, 1) => Self::SouthEast,
            (0, 1) => Self::South,
            (-1, 1) => Self::SouthWest,
            (-1, 0) => Self::West,
            (-1, -1) => Self::NorthWest,
            _ => Self::None,
        }
    }

    /// Combines simultaneous directional inputs into a single direction.
    ///
    /// Opposing inputs cancel each other before the remainder is merged, so
    /// holding North and South together yields `None` while North, South and
    /// East yields East. Repeated inputs count once and diagonal inputs
    /// contribute both of their components.
    #[must_use]
    pub fn combine(directions: &[Direction]) -> Self {
        let mut north = false;
        let mut south = false;
        let mut east = false;
        let mut west = false;

        for direction in directions {
            let (dx, dy) = direction.components();
            east |= dx > 0;
            west |= dx < 0;
            south |= dy > 0;
            north |= dy < 0;
        }

        if north && south {
            north = false;
            south = false;
        }
        if east && west {
            east = false;
            west = false;
        }

        let dx = i32::from(east) - i32::from(west);
        let dy = i32::from(south) - i32::from(north);
        Self::from_components(dx, dy)
    }
}
