//! # Direction Module
//!
//! The six cardinal directions of the block grid. Both the storage layer
//! (occlusion faces) and the light engine (propagation, neighbor resolution)
//! traverse the 6-connected grid through these.

use cgmath::Vector3;
use num_derive::FromPrimitive;

/// One of the six axis-aligned directions.
///
/// The discriminants are stable and double as face indices for occlusion
/// flags. `FromPrimitive` allows conversion back from those indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Direction {
    /// Negative Y.
    Down = 0,

    /// Positive Y.
    Up = 1,

    /// Negative Z.
    North = 2,

    /// Positive Z.
    South = 3,

    /// Negative X.
    West = 4,

    /// Positive X.
    East = 5,
}

impl Direction {
    /// All six directions, in discriminant order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The unit vector of this direction.
    pub fn vector(self) -> Vector3<i32> {
        match self {
            Direction::Down => Vector3::new(0, -1, 0),
            Direction::Up => Vector3::new(0, 1, 0),
            Direction::North => Vector3::new(0, 0, -1),
            Direction::South => Vector3::new(0, 0, 1),
            Direction::West => Vector3::new(-1, 0, 0),
            Direction::East => Vector3::new(1, 0, 0),
        }
    }

    /// The direction pointing the opposite way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// The stable face index of this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for `West`/`East`/`North`/`South`.
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Down | Direction::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::FromPrimitive;

    #[test]
    fn indices_round_trip() {
        for direction in Direction::ALL {
            let back: Direction = Direction::from_usize(direction.index()).unwrap();
            assert_eq!(back, direction);
        }
        assert!(Direction::from_usize(6).is_none());
    }

    #[test]
    fn opposites_cancel() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.vector() + direction.opposite().vector(), Vector3::new(0, 0, 0));
        }
    }
}
