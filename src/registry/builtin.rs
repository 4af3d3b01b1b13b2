//! # Built-in Block Table
//!
//! A compile-time table of the block definitions the engine core knows out of
//! the box. Real deployments extend or replace these with data-driven JSON
//! definitions; the table keeps tests and tools self-contained.

use phf::phf_map;

use super::BlockTraits;

/// Traits of the built-in blocks, keyed by name.
///
/// Luminance values follow the conventional emitters (torch 14, glowstone
/// and lava 15); everything else is dark. `kelp` demonstrates a waterlogged,
/// non-fluid state.
pub static BUILTIN_BLOCKS: phf::Map<&'static str, BlockTraits> = phf_map! {
    "air" => BlockTraits { luminance: 0, opaque: false, fluid: false, waterlogged: false },
    "stone" => BlockTraits { luminance: 0, opaque: true, fluid: false, waterlogged: false },
    "dirt" => BlockTraits { luminance: 0, opaque: true, fluid: false, waterlogged: false },
    "grass_block" => BlockTraits { luminance: 0, opaque: true, fluid: false, waterlogged: false },
    "glass" => BlockTraits { luminance: 0, opaque: false, fluid: false, waterlogged: false },
    "water" => BlockTraits { luminance: 0, opaque: false, fluid: true, waterlogged: false },
    "lava" => BlockTraits { luminance: 15, opaque: false, fluid: true, waterlogged: false },
    "glowstone" => BlockTraits { luminance: 15, opaque: true, fluid: false, waterlogged: false },
    "torch" => BlockTraits { luminance: 14, opaque: false, fluid: false, waterlogged: false },
    "sea_lantern" => BlockTraits { luminance: 15, opaque: true, fluid: false, waterlogged: false },
    "magma_block" => BlockTraits { luminance: 3, opaque: true, fluid: false, waterlogged: false },
    "kelp" => BlockTraits { luminance: 0, opaque: false, fluid: false, waterlogged: true },
};
