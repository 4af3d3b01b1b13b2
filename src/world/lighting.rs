//! # Lighting Module
//!
//! The block-light flood-fill engine. Light spreads across the 6-connected
//! grid, attenuating by one level per step, and must cross section and chunk
//! boundaries to do it, so the traces are implemented over [`ChunkManager`]
//! rather than on a single section: every step resolves its cell through the
//! manager and a missing neighbor simply terminates the branch.
//!
//! Two mutually recursive traces cover the two kinds of change:
//!
//! * **Increase** - a source appeared or brightened. Monotonic max-taking
//!   makes this trace idempotent and order-independent.
//! * **Decrease** - a source dimmed or vanished. Clearing cannot simply zero
//!   a region: a second source overlapping the removed one's radius must
//!   re-assert its own falloff. The decrease therefore reports the strongest
//!   independent level it finds back up the recursion, and any cell that
//!   ends up brighter than naively expected re-broadcasts via a forced
//!   increase.
//!
//! The decrease recurses along a directional cone (never back against an
//! axis it already traveled) as a pruning measure; the recompute-equivalence
//! tests below are the authority on its correctness.
//!
//! Recursion depth is bounded by the light range (at most 15 attenuation
//! steps per branch), which keeps direct recursion safe on default stacks.

use cgmath::Vector3;
use log::trace;

use crate::registry::BlockState;
use crate::world::chunk::section::{MAX_LIGHT_LEVEL, SECTION_VOLUME};

use super::direction::Direction;
use super::position::{ChunkPosition, SectionCoord, SectionPosition};
use super::ChunkManager;

impl ChunkManager {
    /// The single entry point storage mutation feeds: compares the light
    /// properties of the previous and new state at a position and dispatches
    /// to the matching trace. No-op when neither luminance nor opacity
    /// changed.
    pub fn on_block_change(
        &mut self,
        coord: SectionCoord,
        position: SectionPosition,
        previous: Option<BlockState>,
        current: Option<BlockState>,
    ) {
        let registry = self.registry.clone();
        let previous_luminance = registry.luminance(previous);
        let luminance = registry.luminance(current);

        if previous_luminance == luminance
            && registry.solid_opaque(previous) == registry.solid_opaque(current)
        {
            // no change for light data
            return;
        }

        if luminance > previous_luminance {
            self.trace_increase(coord, position, luminance, false);
        } else {
            // The new luminance is the floor the cleared region settles at;
            // one above the maximum level is the "higher than anything"
            // sentinel that makes the first cell unconditionally clear.
            self.trace_decrease(
                coord,
                position,
                luminance,
                MAX_LIGHT_LEVEL + 1,
                Vector3::new(0, 0, 0),
            );
        }
    }

    /// Rebuilds one section's block light from scratch: zero everything,
    /// then seed a trace from every emitting block, scanning y-outer,
    /// z-middle, x-inner. Order only matters for performance; the increase
    /// trace is idempotent.
    pub fn recalculate_light(&mut self, coord: SectionCoord) {
        let registry = self.registry.clone();

        let emitters: Vec<(SectionPosition, u8)> = {
            let Some(section) = self.section_mut(coord) else {
                return;
            };
            section.light.reset();

            // Slot-index order is exactly the y/z/x scan.
            (0..SECTION_VOLUME)
                .filter_map(|index| {
                    let luminance = registry.luminance(section.storage.get_index(index));
                    (luminance > 0).then(|| (SectionPosition::from_index(index), luminance))
                })
                .collect()
        };

        trace!(
            "recalculating light of {coord:?}: {} emitters",
            emitters.len()
        );
        for (position, luminance) in emitters {
            self.trace_increase(coord, position, luminance, false);
        }
    }

    /// Rebuilds the light of every populated section in a chunk, e.g. after
    /// initial population.
    pub fn recalculate_chunk_light(&mut self, position: ChunkPosition) {
        let Some(chunk) = self.chunk(position) else {
            return;
        };
        for height in chunk.populated_heights() {
            self.recalculate_light(SectionCoord::new(position, height));
        }
    }

    fn trace_increase(
        &mut self,
        coord: SectionCoord,
        position: SectionPosition,
        incoming: u8,
        force: bool,
    ) {
        let registry = self.registry.clone();
        let index = position.index();
        let Some(section) = self.section_mut(coord) else {
            return;
        };

        let state = section.storage.get_index(index);
        let block_luminance = registry.luminance(state);
        if registry.solid_opaque(state) && block_luminance == 0 {
            // light can not pass through the block
            return;
        }

        let level = incoming.max(block_luminance);
        if section.light.block_light(index) >= level && !force {
            // already at least as bright, nothing to re-propagate
            return;
        }
        section.light.set_block_light(index, level);

        if level <= 1 {
            // propagation attenuates by one per step; this is the end
            return;
        }
        if block_luminance > incoming {
            // only the position a source originates from re-broadcasts its
            // own luminance; a merely relit cell spreads the incoming value
            return;
        }

        let next = level - 1;
        for direction in Direction::ALL {
            let (neighbor_coord, neighbor_position) = Self::step(coord, position, direction);
            self.trace_increase(neighbor_coord, neighbor_position, next, false);
        }
    }

    fn trace_decrease(
        &mut self,
        coord: SectionCoord,
        position: SectionPosition,
        expected: u8,
        previous: u8,
        cone: Vector3<i32>,
    ) -> u8 {
        let index = position.index();
        let Some(section) = self.section_mut(coord) else {
            return 0;
        };

        let current = section.light.block_light(index);
        if current == expected {
            return expected;
        }
        if current >= previous {
            // another (stronger) light source is emitting here; leave it and
            // report it upward as a new floor
            return current;
        }

        section.light.set_block_light(index, expected);

        let expected_neighbor = expected.saturating_sub(1);
        let mut highest = expected_neighbor;

        for direction in Direction::ALL {
            if !Self::cone_allows(cone, direction) {
                continue;
            }
            let (neighbor_coord, neighbor_position) = Self::step(coord, position, direction);
            let branch = self.trace_decrease(
                neighbor_coord,
                neighbor_position,
                highest,
                current,
                Self::cone_extend(cone, direction),
            );
            highest = highest.max(branch.saturating_sub(1));
        }

        if let Some(section) = self.section_mut(coord) {
            section.light.set_block_light(index, highest);
        }

        if highest > expected_neighbor {
            // a neighbor branch reported a stronger independent source; the
            // corrected level has to be re-broadcast outward
            self.trace_increase(coord, position, highest, true);
        }

        highest
    }

    /// One step of neighbor resolution: stay in the section when the offset
    /// fits, otherwise mirror into the adjacent section's coordinate space.
    fn step(
        coord: SectionCoord,
        position: SectionPosition,
        direction: Direction,
    ) -> (SectionCoord, SectionPosition) {
        match position.checked_offset(direction) {
            Some(next) => (coord, next),
            None => (coord.neighbor(direction), position.wrapped(direction)),
        }
    }

    /// A branch is allowed while it does not reverse any axis the trace has
    /// already traveled along.
    fn cone_allows(cone: Vector3<i32>, direction: Direction) -> bool {
        let step = direction.vector();
        if step.x != 0 {
            return if step.x < 0 { cone.x <= 0 } else { cone.x >= 0 };
        }
        if step.y != 0 {
            return if step.y < 0 { cone.y <= 0 } else { cone.y >= 0 };
        }
        if step.z < 0 {
            cone.z <= 0
        } else {
            cone.z >= 0
        }
    }

    fn cone_extend(cone: Vector3<i32>, direction: Direction) -> Vector3<i32> {
        let step = direction.vector();
        Vector3::new(
            if step.x != 0 { step.x } else { cone.x },
            if step.y != 0 { step.y } else { cone.y },
            if step.z != 0 { step.z } else { cone.z },
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::{BlockDef, BlockRegistry, BlockTraits};
    use crate::world::chunk::section::palette::{PackingFormat, PaletteData};
    use crate::world::chunk::section::{Section, SECTION_VOLUME};
    use crate::world::position::BlockPosition;
    use crate::world::WorldLimits;

    fn world() -> ChunkManager {
        let _ = env_logger::builder().is_test(true).try_init();
        ChunkManager::new(
            Arc::new(BlockRegistry::with_builtins()),
            WorldLimits::default(),
        )
    }

    /// A world whose registry also holds a transparent level-10 emitter.
    fn world_with_lamp() -> (ChunkManager, BlockState) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut registry = BlockRegistry::with_builtins();
        let lamp = registry.register(BlockDef {
            name: "lamp".to_string(),
            traits: BlockTraits {
                luminance: 10,
                ..BlockTraits::default()
            },
        });
        let manager = ChunkManager::new(Arc::new(registry), WorldLimits::default());
        (manager, lamp)
    }

    fn origin_coord() -> SectionCoord {
        SectionCoord::new(ChunkPosition::new(0, 0), 0)
    }

    fn light_bytes(manager: &ChunkManager, coord: SectionCoord) -> Vec<u8> {
        manager.section(coord).unwrap().light.bytes().to_vec()
    }

    fn manhattan(a: (i32, i32, i32), b: (i32, i32, i32)) -> i32 {
        (a.0 - b.0).abs() + (a.1 - b.1).abs() + (a.2 - b.2).abs()
    }

    #[test]
    fn single_source_falloff_is_monotonic() {
        let (mut manager, lamp) = world_with_lamp();
        manager.create_chunk(ChunkPosition::new(0, 0));
        manager.set_block(BlockPosition::new(8, 8, 8), Some(lamp));

        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    let distance = manhattan((x, y, z), (8, 8, 8));
                    let expected = (10 - distance).max(0) as u8;
                    assert_eq!(
                        manager.light(BlockPosition::new(x, y, z)),
                        expected,
                        "at ({x}, {y}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn end_to_end_recalculation() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let coord = origin_coord();

        // Populate storage directly; light stays dark until recalculated.
        manager
            .section_or_create(coord)
            .unwrap()
            .storage
            .set(SectionPosition::new(8, 8, 8), Some(glowstone));
        assert_eq!(manager.light(BlockPosition::new(8, 8, 8)), 0);

        manager.recalculate_light(coord);
        assert_eq!(manager.light(BlockPosition::new(8, 8, 8)), 15);
        assert_eq!(manager.light(BlockPosition::new(8, 8, 9)), 14);
        assert_eq!(manager.light(BlockPosition::new(0, 8, 8)), 7);
        // Manhattan distance 15: dark.
        assert_eq!(manager.light(BlockPosition::new(0, 8, 1)), 0);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        manager.set_block(BlockPosition::new(3, 9, 12), Some(glowstone));
        let coord = origin_coord();

        manager.recalculate_light(coord);
        let first = light_bytes(&manager, coord);
        manager.recalculate_light(coord);
        assert_eq!(first, light_bytes(&manager, coord));
    }

    #[test]
    fn removing_the_only_source_darkens_everything() {
        let (mut manager, lamp) = world_with_lamp();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let position = BlockPosition::new(8, 8, 8);

        manager.set_block(position, Some(lamp));
        manager.set_block(position, None);

        let bytes = light_bytes(&manager, origin_coord());
        assert!(bytes.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn removed_source_yields_to_the_survivor() {
        let (mut manager, lamp) = world_with_lamp();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let survivor = BlockPosition::new(6, 8, 8);
        let removed = BlockPosition::new(10, 8, 8);

        manager.set_block(survivor, Some(lamp));
        manager.set_block(removed, Some(lamp));
        manager.set_block(removed, None);

        // The incremental decrease/re-increase must match a from-scratch
        // recomputation of the surviving configuration bit for bit.
        let incremental = light_bytes(&manager, origin_coord());
        manager.recalculate_light(origin_coord());
        assert_eq!(incremental, light_bytes(&manager, origin_coord()));

        // And that recomputation is plain falloff from the survivor.
        assert_eq!(manager.light(removed), 6);
        assert_eq!(manager.light(survivor), 10);
        assert_eq!(manager.light(BlockPosition::new(12, 8, 8)), 4);
    }

    #[test]
    fn incremental_placement_matches_recalculation() {
        let mut manager = world();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let coord = origin_coord();
        manager.section_or_create(coord).unwrap();

        let emitters = ["glowstone", "torch", "sea_lantern", "magma_block", "lava"];
        fastrand::seed(0x1337);
        for _ in 0..24 {
            let position = BlockPosition::new(
                fastrand::i32(0..16),
                fastrand::i32(0..16),
                fastrand::i32(0..16),
            );
            if manager.block(position).is_some() {
                continue;
            }
            let name = emitters[fastrand::usize(0..emitters.len())];
            let state = manager.registry().state(name).unwrap();
            manager.set_block(position, Some(state));
        }

        let incremental = light_bytes(&manager, coord);
        assert!(incremental.iter().any(|&byte| byte > 0));

        manager.recalculate_light(coord);
        assert_eq!(incremental, light_bytes(&manager, coord));
    }

    #[test]
    fn random_removals_match_recalculation() {
        let mut manager = world();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let coord = origin_coord();
        manager.section_or_create(coord).unwrap();

        // Equal-strength emitters, so every survivor re-asserts itself.
        fastrand::seed(0xBEEF);
        let glowstone = manager.registry().state("glowstone").unwrap();
        let mut placed = Vec::new();
        for _ in 0..12 {
            let position = BlockPosition::new(
                fastrand::i32(0..16),
                fastrand::i32(0..16),
                fastrand::i32(0..16),
            );
            if manager.block(position).is_some() {
                continue;
            }
            manager.set_block(position, Some(glowstone));
            placed.push(position);
        }

        for position in placed.iter().step_by(2) {
            manager.set_block(*position, None);
        }

        let incremental = light_bytes(&manager, coord);
        manager.recalculate_light(coord);
        assert_eq!(incremental, light_bytes(&manager, coord));
    }

    #[test]
    fn opaque_blocks_stop_light() {
        let mut manager = world();
        let stone = manager.registry().state("stone").unwrap();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));

        manager.set_block(BlockPosition::new(8, 8, 9), Some(stone));
        manager.set_block(BlockPosition::new(8, 8, 8), Some(glowstone));

        // Light does not enter the solid non-emitting block...
        assert_eq!(manager.light(BlockPosition::new(8, 8, 9)), 0);
        // ...and reaches the cell behind it only around the detour.
        assert_eq!(manager.light(BlockPosition::new(8, 8, 10)), 11);
        assert_eq!(manager.light(BlockPosition::new(8, 9, 9)), 13);
    }

    #[test]
    fn property_preserving_replacement_is_a_no_op() {
        let mut manager = world();
        let stone = manager.registry().state("stone").unwrap();
        let dirt = manager.registry().state("dirt").unwrap();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));

        manager.set_block(BlockPosition::new(8, 8, 8), Some(glowstone));
        // Far outside the lit radius.
        manager.set_block(BlockPosition::new(2, 2, 2), Some(stone));

        let before = light_bytes(&manager, origin_coord());
        manager.set_block(BlockPosition::new(2, 2, 2), Some(dirt));
        assert_eq!(before, light_bytes(&manager, origin_coord()));
    }

    #[test]
    fn light_crosses_chunk_boundaries() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        manager.create_chunk(ChunkPosition::new(1, 0));

        // The neighbor section must exist before the source is placed;
        // propagation never re-traces retroactively.
        let east = SectionCoord::new(ChunkPosition::new(1, 0), 0);
        manager.section_or_create(east).unwrap();

        manager.set_block(BlockPosition::new(15, 8, 8), Some(glowstone));

        assert_eq!(manager.light(BlockPosition::new(16, 8, 8)), 14);
        assert_eq!(manager.light(BlockPosition::new(22, 8, 8)), 8);
        // The unloaded west neighbor terminates propagation quietly.
        assert_eq!(manager.light(BlockPosition::new(-1, 8, 8)), 0);
    }

    #[test]
    fn light_crosses_section_boundaries_vertically() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));

        let upper = SectionCoord::new(ChunkPosition::new(0, 0), 1);
        manager.section_or_create(upper).unwrap();

        manager.set_block(BlockPosition::new(8, 15, 8), Some(glowstone));
        assert_eq!(manager.light(BlockPosition::new(8, 16, 8)), 14);
        assert_eq!(manager.light(BlockPosition::new(8, 20, 8)), 10);
    }

    #[test]
    fn late_loaded_neighbors_stay_dark() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        manager.set_block(BlockPosition::new(15, 8, 8), Some(glowstone));

        // The chunk loads after the trace ran; re-tracing on load is the
        // world layer's responsibility, not the engine's.
        manager.create_chunk(ChunkPosition::new(1, 0));
        let east = SectionCoord::new(ChunkPosition::new(1, 0), 0);
        manager.section_or_create(east).unwrap();
        assert_eq!(manager.light(BlockPosition::new(16, 8, 8)), 0);
    }

    #[test]
    fn removal_clears_across_section_boundaries() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        manager.create_chunk(ChunkPosition::new(1, 0));
        let east = SectionCoord::new(ChunkPosition::new(1, 0), 0);
        manager.section_or_create(east).unwrap();

        let source = BlockPosition::new(15, 8, 8);
        manager.set_block(source, Some(glowstone));
        assert!(light_bytes(&manager, east).iter().any(|&byte| byte > 0));

        manager.set_block(source, None);
        assert!(light_bytes(&manager, origin_coord()).iter().all(|&byte| byte == 0));
        assert!(light_bytes(&manager, east).iter().all(|&byte| byte == 0));
    }

    #[test]
    fn traces_mark_sections_for_remeshing() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let coord = origin_coord();

        manager.set_block(BlockPosition::new(8, 8, 8), Some(glowstone));
        let section = manager.section_mut(coord).unwrap();
        assert!(section.light.take_update());
        assert!(!section.light.take_update());
    }

    #[test]
    fn decoded_sections_light_up_on_install() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        manager.create_chunk(ChunkPosition::new(0, 0));
        let coord = origin_coord();

        // One-bit palette: entry 0 = air, entry 1 = glowstone at (8, 8, 8).
        let entries = [None, Some(glowstone)];
        let source = SectionPosition::new(8, 8, 8).index();
        let mut words = vec![0u64; SECTION_VOLUME / 64];
        words[source / 64] = 1u64 << (source % 64);
        let buffer: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
        let data = PaletteData::read(&buffer, 1, SECTION_VOLUME, PackingFormat::Aligned);

        let section = Section::from_palette(manager.registry().clone(), &entries, &data);
        assert!(manager.install_section(coord, section));

        assert_eq!(manager.light(BlockPosition::new(8, 8, 8)), 15);
        assert_eq!(manager.light(BlockPosition::new(8, 8, 9)), 14);
        assert_eq!(manager.block(BlockPosition::new(8, 8, 8)), Some(glowstone));
    }

    #[test]
    fn chunk_recalculation_covers_every_populated_section() {
        let mut manager = world();
        let glowstone = manager.registry().state("glowstone").unwrap();
        let chunk_position = ChunkPosition::new(0, 0);
        manager.create_chunk(chunk_position);

        for height in [0, 2] {
            let coord = SectionCoord::new(chunk_position, height);
            manager
                .section_or_create(coord)
                .unwrap()
                .storage
                .set(SectionPosition::new(4, 4, 4), Some(glowstone));
        }

        manager.recalculate_chunk_light(chunk_position);
        assert_eq!(manager.light(BlockPosition::new(4, 4, 4)), 15);
        assert_eq!(manager.light(BlockPosition::new(4, 36, 4)), 15);
        // The unpopulated section in between stayed dark.
        assert!(manager.section(SectionCoord::new(chunk_position, 1)).is_none());
    }

    #[test]
    fn install_without_a_chunk_is_rejected() {
        let mut manager = world();
        let section = Section::empty(manager.registry().clone());
        assert!(!manager.install_section(origin_coord(), section));
    }
}
