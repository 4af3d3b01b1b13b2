//! # Section Module
//!
//! A section is a 16x16x16 cube of blocks, the atomic unit of storage and
//! lighting. Its storage and light arrays are co-located here because they
//! share the slot indexing of [`SectionPosition`] and are always created,
//! recalculated and destroyed together: sections come into being when a chunk
//! is decoded or generated, get their derived state rebuilt in full on first
//! population, are updated incrementally per block change afterwards, and
//! disappear with the owning chunk on unload.
//!
//! [`SectionPosition`]: crate::world::position::SectionPosition

use std::sync::Arc;

use crate::registry::{BlockRegistry, BlockState};
use crate::world::position::SectionPosition;

pub mod light;
pub mod occlusion;
pub mod palette;
pub mod storage;

pub use light::SectionLight;
pub use occlusion::SectionOcclusion;
pub use palette::{PackingFormat, PaletteData, ALIGNED_PACKING_PROTOCOL};
pub use storage::SectionStorage;

/// The dimension (width, height, depth) of a section in blocks.
pub const SECTION_EDGE: usize = 16;
/// The number of blocks in a single plane of a section.
pub const SECTION_PLANE_SIZE: usize = SECTION_EDGE * SECTION_EDGE;
/// The total number of blocks in a section.
pub const SECTION_VOLUME: usize = SECTION_PLANE_SIZE * SECTION_EDGE;
/// The highest light (and luminance) level a block can hold.
pub const MAX_LIGHT_LEVEL: u8 = 15;

/// One 16x16x16 unit of world data: block storage plus its light levels.
pub struct Section {
    /// The block-state slots and their derived flags.
    pub storage: SectionStorage,

    /// The light levels of those slots.
    pub light: SectionLight,
}

impl Section {
    /// Creates a fully empty, dark section.
    pub fn empty(registry: Arc<BlockRegistry>) -> Self {
        Self {
            storage: SectionStorage::empty(registry),
            light: SectionLight::new(),
        }
    }

    /// Creates a section from decoded palette data; storage flags are
    /// rebuilt, light stays dark until the owning world recalculates it.
    pub fn from_palette(
        registry: Arc<BlockRegistry>,
        entries: &[Option<BlockState>],
        data: &PaletteData,
    ) -> Self {
        Self {
            storage: SectionStorage::from_palette(registry, entries, data),
            light: SectionLight::new(),
        }
    }

    /// The renderer-facing view of one slot.
    pub fn sample(&self, position: SectionPosition) -> BlockSample {
        let index = position.index();
        let state = self.storage.get_index(index);
        let registry = self.storage.registry();

        let mut flags = 0;
        if registry.solid_opaque(state) {
            flags |= BlockSample::FLAG_OPAQUE;
        }
        if registry.fluid(state) {
            flags |= BlockSample::FLAG_FLUID;
        }

        BlockSample {
            state: state.map_or(0, BlockState::id),
            light: self.light.get(index),
            flags,
        }
    }

    /// Fills `out` with one sample per slot in index order, ready to be cast
    /// to bytes for upload.
    pub fn fill_samples(&self, out: &mut Vec<BlockSample>) {
        out.clear();
        out.reserve(SECTION_VOLUME);
        for index in 0..SECTION_VOLUME {
            out.push(self.sample(SectionPosition::from_index(index)));
        }
    }
}

/// The per-slot read-back record mesh builders consume.
///
/// `#[repr(C)]` with no padding so a slab of samples can be reinterpreted as
/// plain bytes for GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockSample {
    /// The registry id of the slot's state; 0 is air.
    pub state: u16,

    /// The packed sky/block light byte.
    pub light: u8,

    /// Property bits: [`FLAG_OPAQUE`](BlockSample::FLAG_OPAQUE),
    /// [`FLAG_FLUID`](BlockSample::FLAG_FLUID).
    pub flags: u8,
}

impl BlockSample {
    /// Set when the slot's state is solid and fully opaque.
    pub const FLAG_OPAQUE: u8 = 1 << 0;

    /// Set when the slot's state holds fluid.
    pub const FLAG_FLUID: u8 = 1 << 1;
}
