//! # Packed Position Module
//!
//! Immutable spatial coordinates encoded into single integers via fixed bit
//! shifts and masks. Packed positions are cheap to copy, usable directly as
//! hash-map keys, and decode losslessly back into their components.
//!
//! Three coordinate spaces are covered:
//!
//! * [`SectionPosition`] - a position inside one 16x16x16 section (4 bits per
//!   axis); its packed value doubles as the canonical 0..4096 slot index
//! * [`BlockPosition`] - a world-absolute position (26/12/26 signed bits)
//! * [`ChunkPosition`] - a chunk column key (two 32-bit components)
//!
//! Construction and arithmetic are bounds-checked and fail fast, in release
//! builds too: a silently clamped coordinate would corrupt the slot indices
//! and map keys derived from it. Traversal code that legitimately runs into
//! bounds uses the `checked_*` variants instead.

use std::fmt;
use std::ops::{Add, Sub};

use super::direction::Direction;

/// The lowest world Y coordinate a [`BlockPosition`] can carry.
pub const MIN_WORLD_Y: i32 = -2048;
/// The highest world Y coordinate a [`BlockPosition`] can carry.
pub const MAX_WORLD_Y: i32 = 2047;
/// The horizontal extent (±) a [`BlockPosition`] can carry.
pub const MAX_WORLD_XZ: i32 = (1 << 25) - 1;

/// A position within a single section, packed into 12 bits of a `u16`.
///
/// Layout: x in bits 0..4, z in bits 4..8, y in bits 8..12. The raw value is
/// exactly `y << 8 | z << 4 | x`, which is the slot index shared by the
/// storage and light arrays; decoding and indexing are the same operation.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SectionPosition(u16);

impl SectionPosition {
    const MASK: u16 = 0xF;
    const SHIFT_Z: u16 = 4;
    const SHIFT_Y: u16 = 8;

    /// Packs the given in-section components.
    ///
    /// # Panics
    /// Panics if any component exceeds 15.
    pub fn new(x: u8, y: u8, z: u8) -> Self {
        assert!(
            x < 16 && y < 16 && z < 16,
            "in-section position ({x}, {y}, {z}) out of bounds"
        );
        Self((u16::from(y) << Self::SHIFT_Y) | (u16::from(z) << Self::SHIFT_Z) | u16::from(x))
    }

    /// Reconstructs a position from its slot index.
    ///
    /// # Panics
    /// Panics if `index` is not below 4096.
    pub fn from_index(index: usize) -> Self {
        assert!(index < 4096, "slot index {index} out of bounds");
        Self(index as u16)
    }

    /// The x component (0..=15).
    pub fn x(self) -> u8 {
        (self.0 & Self::MASK) as u8
    }

    /// The y component (0..=15).
    pub fn y(self) -> u8 {
        ((self.0 >> Self::SHIFT_Y) & Self::MASK) as u8
    }

    /// The z component (0..=15).
    pub fn z(self) -> u8 {
        ((self.0 >> Self::SHIFT_Z) & Self::MASK) as u8
    }

    /// The slot index of this position, `y << 8 | z << 4 | x`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Moves one step in `direction`, or `None` when that would leave the
    /// section. The caller then crosses into the neighbor via
    /// [`wrapped`](SectionPosition::wrapped).
    pub fn checked_offset(self, direction: Direction) -> Option<Self> {
        let step = direction.vector();
        let x = i32::from(self.x()) + step.x;
        let y = i32::from(self.y()) + step.y;
        let z = i32::from(self.z()) + step.z;
        if !(0..16).contains(&x) || !(0..16).contains(&y) || !(0..16).contains(&z) {
            return None;
        }
        Some(Self::new(x as u8, y as u8, z as u8))
    }

    /// The mirrored coordinate after crossing a section face: the moved axis
    /// re-enters on the opposite side, the other two components are kept.
    pub fn wrapped(self, direction: Direction) -> Self {
        match direction {
            Direction::Down => Self::new(self.x(), 15, self.z()),
            Direction::Up => Self::new(self.x(), 0, self.z()),
            Direction::North => Self::new(self.x(), self.y(), 15),
            Direction::South => Self::new(self.x(), self.y(), 0),
            Direction::West => Self::new(15, self.y(), self.z()),
            Direction::East => Self::new(0, self.y(), self.z()),
        }
    }
}

impl fmt::Debug for SectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s({} {} {})", self.x(), self.y(), self.z())
    }
}

/// A world-absolute block position packed into an `i64`.
///
/// Layout: y in bits 0..12, z in bits 12..38, x in bits 38..64, every
/// component signed (sign-extended on decode). The packed value is the hash
/// key identity; two positions are equal exactly when their packed values
/// are.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockPosition(i64);

impl BlockPosition {
    const SHIFT_Z: i64 = 12;
    const SHIFT_X: i64 = 38;

    /// Packs the given world components.
    ///
    /// # Panics
    /// Panics if x or z leave `±`[`MAX_WORLD_XZ`] or y leaves
    /// [`MIN_WORLD_Y`]`..=`[`MAX_WORLD_Y`].
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        assert!(
            (-(MAX_WORLD_XZ + 1)..=MAX_WORLD_XZ).contains(&x)
                && (-(MAX_WORLD_XZ + 1)..=MAX_WORLD_XZ).contains(&z)
                && (MIN_WORLD_Y..=MAX_WORLD_Y).contains(&y),
            "block position ({x}, {y}, {z}) out of bounds"
        );
        Self(
            ((i64::from(x) & 0x3FF_FFFF) << Self::SHIFT_X)
                | ((i64::from(z) & 0x3FF_FFFF) << Self::SHIFT_Z)
                | (i64::from(y) & 0xFFF),
        )
    }

    /// Composes a world position from a chunk key, a section height and an
    /// in-section position.
    pub fn from_parts(chunk: ChunkPosition, height: i32, local: SectionPosition) -> Self {
        Self::new(
            chunk.x() * 16 + i32::from(local.x()),
            height * 16 + i32::from(local.y()),
            chunk.z() * 16 + i32::from(local.z()),
        )
    }

    /// The x component.
    pub fn x(self) -> i32 {
        (self.0 >> Self::SHIFT_X) as i32
    }

    /// The y component.
    pub fn y(self) -> i32 {
        ((self.0 << 52) >> 52) as i32
    }

    /// The z component.
    pub fn z(self) -> i32 {
        ((self.0 << 26) >> Self::SHIFT_X) as i32
    }

    /// The chunk column containing this position (pure shift, no range
    /// check needed).
    pub fn chunk(self) -> ChunkPosition {
        ChunkPosition::new(self.x() >> 4, self.z() >> 4)
    }

    /// The section height (world y / 16, floored) containing this position.
    pub fn section_height(self) -> i32 {
        self.y() >> 4
    }

    /// This position reduced to in-section space (pure masking).
    pub fn in_section(self) -> SectionPosition {
        SectionPosition::new(
            (self.x() & 0xF) as u8,
            (self.y() & 0xF) as u8,
            (self.z() & 0xF) as u8,
        )
    }

    /// The section address containing this position.
    pub fn section_coord(self) -> SectionCoord {
        SectionCoord {
            chunk: self.chunk(),
            height: self.section_height(),
        }
    }
}

impl Add<i32> for BlockPosition {
    type Output = BlockPosition;

    fn add(self, value: i32) -> BlockPosition {
        BlockPosition::new(self.x() + value, self.y() + value, self.z() + value)
    }
}

impl Sub<i32> for BlockPosition {
    type Output = BlockPosition;

    fn sub(self, value: i32) -> BlockPosition {
        BlockPosition::new(self.x() - value, self.y() - value, self.z() - value)
    }
}

impl Add for BlockPosition {
    type Output = BlockPosition;

    fn add(self, other: BlockPosition) -> BlockPosition {
        BlockPosition::new(self.x() + other.x(), self.y() + other.y(), self.z() + other.z())
    }
}

impl Sub for BlockPosition {
    type Output = BlockPosition;

    fn sub(self, other: BlockPosition) -> BlockPosition {
        BlockPosition::new(self.x() - other.x(), self.y() - other.y(), self.z() - other.z())
    }
}

impl Add<Direction> for BlockPosition {
    type Output = BlockPosition;

    fn add(self, direction: Direction) -> BlockPosition {
        let step = direction.vector();
        BlockPosition::new(self.x() + step.x, self.y() + step.y, self.z() + step.z)
    }
}

impl Sub<Direction> for BlockPosition {
    type Output = BlockPosition;

    fn sub(self, direction: Direction) -> BlockPosition {
        let step = direction.vector();
        BlockPosition::new(self.x() - step.x, self.y() - step.y, self.z() - step.z)
    }
}

impl fmt::Debug for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b({} {} {})", self.x(), self.y(), self.z())
    }
}

/// A chunk column key: x in the high 32 bits, z in the low 32 bits.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChunkPosition(i64);

impl ChunkPosition {
    /// Packs the given chunk components. The full `i32` range is valid.
    pub fn new(x: i32, z: i32) -> Self {
        Self(((x as i64) << 32) | i64::from(z as u32))
    }

    /// The chunk x component.
    pub fn x(self) -> i32 {
        (self.0 >> 32) as i32
    }

    /// The chunk z component.
    pub fn z(self) -> i32 {
        self.0 as i32
    }

    /// The adjacent chunk in a horizontal direction.
    ///
    /// # Panics
    /// Panics for `Up`/`Down`; vertical neighbors are section neighbors, not
    /// chunk neighbors.
    pub fn neighbor(self, direction: Direction) -> ChunkPosition {
        assert!(
            direction.is_horizontal(),
            "chunk columns have no vertical neighbors"
        );
        let step = direction.vector();
        Self::new(self.x() + step.x, self.z() + step.z)
    }
}

impl fmt::Debug for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c({} {})", self.x(), self.z())
    }
}

/// The address of one section: a chunk column plus a section height.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SectionCoord {
    /// The chunk column.
    pub chunk: ChunkPosition,

    /// The section height within the column (world y / 16).
    pub height: i32,
}

impl SectionCoord {
    /// Creates a section address.
    pub fn new(chunk: ChunkPosition, height: i32) -> Self {
        Self { chunk, height }
    }

    /// The adjacent section address in any direction. Vertical directions
    /// stay in the same column; horizontal ones cross into the neighboring
    /// chunk at the same height.
    pub fn neighbor(self, direction: Direction) -> SectionCoord {
        match direction {
            Direction::Down => Self::new(self.chunk, self.height - 1),
            Direction::Up => Self::new(self.chunk, self.height + 1),
            _ => Self::new(self.chunk.neighbor(direction), self.height),
        }
    }
}
