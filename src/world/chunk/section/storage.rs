//! # Block Section Storage Module
//!
//! The 16x16x16 cube of block-state slots behind one section. Slots hold
//! `Option<BlockState>` handles into the shared registry arena (`None` =
//! air), so a state interned once is referenced from any number of slots
//! across any number of sections without per-slot ownership bookkeeping.
//!
//! Derived attributes (`has_fluid`, the opacity mask, the occlusion faces and
//! the occupancy count) are maintained recompute-on-write: reads sit on the
//! rendering hot path and must never pay for a rescan.

use std::sync::Arc;

use bitvec::prelude::*;

use crate::registry::{BlockRegistry, BlockState};
use crate::world::position::SectionPosition;

use super::occlusion::SectionOcclusion;
use super::palette::PaletteData;
use super::SECTION_VOLUME;

/// The block-state slots of one section, plus the derived flags the renderer
/// and fluid simulation poll.
pub struct SectionStorage {
    registry: Arc<BlockRegistry>,
    slots: Box<[Option<BlockState>]>,
    opaque: BitVec,
    non_air: u16,
    has_fluid: bool,
    occlusion: SectionOcclusion,
}

impl SectionStorage {
    /// Creates storage with every slot empty.
    pub fn empty(registry: Arc<BlockRegistry>) -> Self {
        Self {
            registry,
            slots: vec![None; SECTION_VOLUME].into_boxed_slice(),
            opaque: bitvec![0; SECTION_VOLUME],
            non_air: 0,
            has_fluid: false,
            occlusion: SectionOcclusion::new(),
        }
    }

    /// Materializes storage from decoded palette data and its palette-entry
    /// table, then rebuilds all derived flags.
    ///
    /// # Panics
    /// Panics if the data does not hold exactly 4096 indices or an index
    /// points outside the entry table (a corrupt palette is a decode-layer
    /// precondition violation, never silently clamped).
    pub fn from_palette(
        registry: Arc<BlockRegistry>,
        entries: &[Option<BlockState>],
        data: &PaletteData,
    ) -> Self {
        assert_eq!(
            data.len(),
            SECTION_VOLUME,
            "palette data does not cover a full section"
        );
        let mut storage = Self::empty(registry);
        for index in 0..SECTION_VOLUME {
            storage.slots[index] = entries[data.get(index) as usize];
        }
        storage.recalculate(true);
        storage
    }

    /// The state in a slot; `None` is air. No side effects.
    pub fn get(&self, position: SectionPosition) -> Option<BlockState> {
        self.slots[position.index()]
    }

    /// Slot access by raw index, for callers iterating in index order.
    pub fn get_index(&self, index: usize) -> Option<BlockState> {
        self.slots[index]
    }

    /// Replaces the state in a slot and returns the previous one, keeping
    /// every derived flag current.
    ///
    /// The fluid flag is maintained asymmetrically on purpose: a fluid
    /// appearing flips it true without a rescan, but removing a fluid forces
    /// a full rescan, because the flag may only go false once no other fluid
    /// slot remains.
    pub fn set(
        &mut self,
        position: SectionPosition,
        state: Option<BlockState>,
    ) -> Option<BlockState> {
        let index = position.index();
        let previous = std::mem::replace(&mut self.slots[index], state);
        if previous == state {
            return previous;
        }

        match (previous.is_some(), state.is_some()) {
            (false, true) => self.non_air += 1,
            (true, false) => self.non_air -= 1,
            _ => {}
        }
        if self.non_air == 0 {
            // The section went fully empty; derived state short-circuits.
            self.recalculate(false);
            return previous;
        }

        let was_opaque = self.registry.solid_opaque(previous);
        let now_opaque = self.registry.solid_opaque(state);
        if was_opaque != now_opaque {
            self.opaque.set(index, now_opaque);
            self.occlusion.update_at(position, &self.opaque);
        }

        let was_fluid = self.registry.fluid(previous);
        let now_fluid = self.registry.fluid(state);
        if !was_fluid && now_fluid {
            self.has_fluid = true;
        } else if was_fluid && !now_fluid {
            self.recalculate_fluid();
        }

        previous
    }

    /// Rebuilds every derived flag from the slots.
    ///
    /// With `full_rescan` the occupancy count is recounted first; without it
    /// the current count is trusted, which callers use as the cheap
    /// short-circuit for sections known to be empty.
    pub fn recalculate(&mut self, full_rescan: bool) {
        if full_rescan {
            self.non_air = self.slots.iter().filter(|slot| slot.is_some()).count() as u16;
        }
        if self.non_air == 0 {
            self.has_fluid = false;
            self.opaque.fill(false);
            self.occlusion.clear();
            return;
        }

        self.has_fluid = false;
        for index in 0..SECTION_VOLUME {
            let slot = self.slots[index];
            self.opaque.set(index, self.registry.solid_opaque(slot));
            if !self.has_fluid && self.registry.fluid(slot) {
                self.has_fluid = true;
            }
        }
        self.occlusion.recalculate(&self.opaque);
    }

    fn recalculate_fluid(&mut self) {
        let registry = &self.registry;
        self.has_fluid = self.slots.iter().any(|slot| registry.fluid(*slot));
    }

    /// True if any slot holds a fluid or waterlogged state.
    pub fn has_fluid(&self) -> bool {
        self.has_fluid
    }

    /// True if every slot is air.
    pub fn is_empty(&self) -> bool {
        self.non_air == 0
    }

    /// The number of occupied slots.
    pub fn block_count(&self) -> usize {
        self.non_air as usize
    }

    /// The per-face occlusion flags.
    pub fn occlusion(&self) -> &SectionOcclusion {
        &self.occlusion
    }

    /// The registry this storage interns its states in.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }
}
