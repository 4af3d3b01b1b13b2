//! # Section Occlusion Module
//!
//! Per-face full-coverage flags for a section. A face that is completely
//! covered by fully opaque blocks lets the renderer cull everything behind
//! it, so the flags sit on the hot path and are recomputed on write, never
//! on read.

use bitvec::prelude::*;

use crate::world::direction::Direction;
use crate::world::position::SectionPosition;

use super::SECTION_EDGE;

/// Whether each of the six faces of a section is fully covered by opaque
/// blocks.
#[derive(Debug, Default)]
pub struct SectionOcclusion {
    faces: [bool; 6],
}

impl SectionOcclusion {
    /// Creates occlusion state with all faces open.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the face in `direction` is fully covered by opaque blocks.
    pub fn is_fully_opaque(&self, direction: Direction) -> bool {
        self.faces[direction.index()]
    }

    /// Marks every face open. Used when a section empties out.
    pub(crate) fn clear(&mut self) {
        self.faces = [false; 6];
    }

    /// Recomputes every face from the opacity mask.
    pub(crate) fn recalculate(&mut self, opaque: &BitSlice) {
        for direction in Direction::ALL {
            self.faces[direction.index()] = Self::face_covered(direction, opaque);
        }
    }

    /// Recomputes the faces an opacity change at `position` touches. An
    /// interior change touches none of them and costs nothing.
    pub(crate) fn update_at(&mut self, position: SectionPosition, opaque: &BitSlice) {
        let max = (SECTION_EDGE - 1) as u8;
        let touched = [
            (position.y() == 0, Direction::Down),
            (position.y() == max, Direction::Up),
            (position.z() == 0, Direction::North),
            (position.z() == max, Direction::South),
            (position.x() == 0, Direction::West),
            (position.x() == max, Direction::East),
        ];
        for (on_face, direction) in touched {
            if on_face {
                self.faces[direction.index()] = Self::face_covered(direction, opaque);
            }
        }
    }

    fn face_covered(direction: Direction, opaque: &BitSlice) -> bool {
        (0..SECTION_EDGE).all(|a| {
            (0..SECTION_EDGE).all(|b| opaque[Self::face_slot(direction, a, b)])
        })
    }

    /// The slot index of cell (a, b) on a face, in the y<<8 | z<<4 | x
    /// layout.
    fn face_slot(direction: Direction, a: usize, b: usize) -> usize {
        let max = SECTION_EDGE - 1;
        match direction {
            Direction::Down => (a << 4) | b,
            Direction::Up => (max << 8) | (a << 4) | b,
            Direction::North => (a << 8) | b,
            Direction::South => (a << 8) | (max << 4) | b,
            Direction::West => (a << 8) | (b << 4),
            Direction::East => (a << 8) | (b << 4) | max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::chunk::section::SECTION_VOLUME;

    fn mask_with_layer(y: usize) -> BitVec {
        let mut opaque = bitvec![0; SECTION_VOLUME];
        for z in 0..SECTION_EDGE {
            for x in 0..SECTION_EDGE {
                opaque.set((y << 8) | (z << 4) | x, true);
            }
        }
        opaque
    }

    #[test]
    fn covered_layer_occludes_one_face() {
        let opaque = mask_with_layer(0);
        let mut occlusion = SectionOcclusion::new();
        occlusion.recalculate(&opaque);

        assert!(occlusion.is_fully_opaque(Direction::Down));
        for direction in [Direction::Up, Direction::North, Direction::South, Direction::West, Direction::East] {
            assert!(!occlusion.is_fully_opaque(direction));
        }
    }

    #[test]
    fn single_gap_opens_the_face() {
        let mut opaque = mask_with_layer(15);
        let mut occlusion = SectionOcclusion::new();
        occlusion.recalculate(&opaque);
        assert!(occlusion.is_fully_opaque(Direction::Up));

        let gap = SectionPosition::new(7, 15, 7);
        opaque.set(gap.index(), false);
        occlusion.update_at(gap, &opaque);
        assert!(!occlusion.is_fully_opaque(Direction::Up));
    }

    #[test]
    fn interior_change_touches_no_face() {
        let mut occlusion = SectionOcclusion {
            faces: [true; 6],
        };
        let opaque = bitvec![0; SECTION_VOLUME];
        occlusion.update_at(SectionPosition::new(8, 8, 8), &opaque);
        // An interior position is on no face, so nothing recomputes.
        for direction in Direction::ALL {
            assert!(occlusion.is_fully_opaque(direction));
        }
    }
}
