//! # Chunk Module
//!
//! A chunk is a vertical column of sections addressed by section height. The
//! column's height range comes from the world limits it was created with;
//! sections inside the range are allocated lazily, on first mutation or when
//! a decoded section is installed, so untouched air costs nothing.

use std::sync::Arc;

use crate::registry::BlockRegistry;
use crate::world::position::ChunkPosition;
use crate::world::WorldLimits;

pub mod section;

use section::Section;

/// A column of optional sections over a fixed height range.
pub struct Chunk {
    position: ChunkPosition,
    lowest_section: i32,
    sections: Vec<Option<Section>>,
}

impl Chunk {
    /// Creates a chunk with every section unallocated.
    pub fn new(position: ChunkPosition, limits: WorldLimits) -> Self {
        Self {
            position,
            lowest_section: limits.lowest_section,
            sections: (0..limits.section_count).map(|_| None).collect(),
        }
    }

    /// The column's position in the world.
    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    /// The section at `height`, or `None` if the height is outside the
    /// column or the section was never populated.
    pub fn section(&self, height: i32) -> Option<&Section> {
        self.sections[self.slot(height)?].as_ref()
    }

    /// Mutable access to the section at `height`.
    pub fn section_mut(&mut self, height: i32) -> Option<&mut Section> {
        let slot = self.slot(height)?;
        self.sections[slot].as_mut()
    }

    /// The section at `height`, allocating an empty one if the height is in
    /// range but unpopulated. `None` only for out-of-range heights.
    pub fn section_or_create(
        &mut self,
        height: i32,
        registry: &Arc<BlockRegistry>,
    ) -> Option<&mut Section> {
        let slot = self.slot(height)?;
        Some(self.sections[slot].get_or_insert_with(|| Section::empty(registry.clone())))
    }

    /// Installs a decoded section at `height`, replacing whatever was there.
    ///
    /// # Returns
    /// `false` if the height is outside the column (the caller skips and
    /// logs; a decoder handing us an impossible height is its failure).
    pub fn insert_section(&mut self, height: i32, section: Section) -> bool {
        match self.slot(height) {
            Some(slot) => {
                self.sections[slot] = Some(section);
                true
            }
            None => false,
        }
    }

    /// The heights of the sections that are actually populated.
    pub fn populated_heights(&self) -> Vec<i32> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(slot, section)| {
                section.as_ref().map(|_| self.lowest_section + slot as i32)
            })
            .collect()
    }

    fn slot(&self, height: i32) -> Option<usize> {
        let offset = height - self.lowest_section;
        (0..self.sections.len() as i32)
            .contains(&offset)
            .then_some(offset as usize)
    }
}
