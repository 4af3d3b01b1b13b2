//! # World Module
//!
//! The chunk map and the narrow interface collaborators mutate the world
//! through. The manager coordinates three things:
//!
//! * **Chunk lifecycle** - chunks are inserted when decoded or generated and
//!   removed on unload; their storage and light die with them (persistence is
//!   an external collaborator's concern)
//! * **Neighbor resolution** - sections are addressed by [`SectionCoord`];
//!   the lookup that lets the light engine and storage cross section and
//!   chunk boundaries, returning `None` at unloaded edges
//! * **Mutation entry** - [`ChunkManager::set_block`] writes storage and
//!   feeds (position, previous, current) to the light engine, which is the
//!   single path light updates flow through
//!
//! The manager is not internally synchronized; callers serialize mutations
//! and wrap it in a [`SharedChunkManager`] when multiple threads are
//! involved.
//!
//! [`SectionCoord`]: position::SectionCoord

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::core::MtResource;
use crate::registry::{BlockRegistry, BlockState};

pub mod chunk;
pub mod direction;
pub mod lighting;
pub mod position;

use chunk::section::Section;
use chunk::Chunk;
use position::{BlockPosition, ChunkPosition, SectionCoord};

/// The vertical extent of a world: which section heights its chunks carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldLimits {
    /// The lowest section height a chunk holds.
    pub lowest_section: i32,

    /// How many sections a chunk holds from `lowest_section` upward.
    pub section_count: u32,
}

impl Default for WorldLimits {
    /// The modern vertical range: world y -64..320.
    fn default() -> Self {
        Self {
            lowest_section: -4,
            section_count: 24,
        }
    }
}

/// A thread-shared world; readers hold the guard across whole scans.
pub type SharedChunkManager = MtResource<ChunkManager>;

/// The loaded chunks of one world and the operations that mutate them.
pub struct ChunkManager {
    registry: Arc<BlockRegistry>,
    limits: WorldLimits,
    chunks: HashMap<ChunkPosition, Chunk>,
}

impl ChunkManager {
    /// Creates a manager over an empty world.
    pub fn new(registry: Arc<BlockRegistry>, limits: WorldLimits) -> Self {
        Self {
            registry,
            limits,
            chunks: HashMap::new(),
        }
    }

    /// The registry this world interns block states in.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// The vertical extent chunks of this world carry.
    pub fn limits(&self) -> WorldLimits {
        self.limits
    }

    /// Returns the chunk at `position`, creating an unpopulated one if it is
    /// not loaded yet.
    pub fn create_chunk(&mut self, position: ChunkPosition) -> &mut Chunk {
        let limits = self.limits;
        self.chunks.entry(position).or_insert_with(|| {
            debug!("creating chunk at {position:?}");
            Chunk::new(position, limits)
        })
    }

    /// Unloads the chunk at `position`, destroying its storage and light.
    pub fn remove_chunk(&mut self, position: ChunkPosition) -> Option<Chunk> {
        let chunk = self.chunks.remove(&position);
        if chunk.is_some() {
            debug!("unloading chunk at {position:?}");
        }
        chunk
    }

    /// The loaded chunk at `position`.
    pub fn chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Mutable access to the loaded chunk at `position`.
    pub fn chunk_mut(&mut self, position: ChunkPosition) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// How many chunks are loaded.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Resolves a section address to its section, or `None` when the chunk is
    /// not loaded, the height is out of range, or the section is
    /// unpopulated. This is the lookup light propagation stops at.
    pub fn section(&self, coord: SectionCoord) -> Option<&Section> {
        self.chunks.get(&coord.chunk)?.section(coord.height)
    }

    /// Mutable section resolution; same `None` cases as
    /// [`section`](ChunkManager::section).
    pub fn section_mut(&mut self, coord: SectionCoord) -> Option<&mut Section> {
        self.chunks.get_mut(&coord.chunk)?.section_mut(coord.height)
    }

    /// Section resolution that allocates an empty section on first touch.
    /// `None` when the chunk is not loaded or the height is out of range.
    pub fn section_or_create(&mut self, coord: SectionCoord) -> Option<&mut Section> {
        let registry = self.registry.clone();
        self.chunks
            .get_mut(&coord.chunk)?
            .section_or_create(coord.height, &registry)
    }

    /// Installs a decoded section and rebuilds its light in full.
    ///
    /// # Returns
    /// `false` (after logging) when the chunk is not loaded or the height is
    /// outside the world limits.
    pub fn install_section(&mut self, coord: SectionCoord, section: Section) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord.chunk) else {
            warn!("dropping decoded section for unloaded chunk {:?}", coord.chunk);
            return false;
        };
        if !chunk.insert_section(coord.height, section) {
            warn!("dropping decoded section at impossible height {}", coord.height);
            return false;
        }
        self.recalculate_light(coord);
        true
    }

    /// The state at a world position; `None` for air, unpopulated sections
    /// and unloaded chunks alike.
    pub fn block(&self, position: BlockPosition) -> Option<BlockState> {
        self.section(position.section_coord())?
            .storage
            .get(position.in_section())
    }

    /// The packed light byte at a world position; dark when unloaded.
    pub fn light(&self, position: BlockPosition) -> u8 {
        self.section(position.section_coord())
            .map_or(0, |section| section.light.get(position.in_section().index()))
    }

    /// Writes a block state and re-traces the light it affects.
    ///
    /// The section is allocated on first touch; the mutation is skipped (and
    /// logged) when the owning chunk is not loaded.
    ///
    /// # Returns
    /// `Some(previous)` on success, `None` when the mutation was skipped.
    pub fn set_block(
        &mut self,
        position: BlockPosition,
        state: Option<BlockState>,
    ) -> Option<Option<BlockState>> {
        let coord = position.section_coord();
        let local = position.in_section();

        let previous = match self.section_or_create(coord) {
            Some(section) => section.storage.set(local, state),
            None => {
                warn!("ignoring block change at {position:?}: no loaded section");
                return None;
            }
        };

        if previous != state {
            self.on_block_change(coord, local, previous, state);
        }
        Some(previous)
    }
}
