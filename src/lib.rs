#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Engine Core
//!
//! The spatial/data core of a voxel-world client: chunk storage and
//! block-light propagation.
//!
//! This crate owns the in-memory world model: bit-packed positions,
//! palette-compressed section decoding, per-section block storage with
//! incrementally maintained derived flags, and a recursive flood-fill light
//! engine that crosses section and chunk boundaries. It deliberately does
//! *not* own networking, rendering, physics or UI; those collaborators
//! consume the core through a narrow surface: read a block, mutate a block,
//! read back light for shading.
//!
//! ## Key Modules
//!
//! * `registry` - Interned block states and the traits (luminance, opacity,
//!   fluid) the storage and light layers query
//! * `world` - The chunk map, packed positions, sections and the light engine
//! * `core` - Cross-cutting utilities such as the shared-resource guard
//!
//! ## Data Flow
//!
//! 1. An external decoder parses network bytes into palette data plus a
//!    palette-entry table
//! 2. The section storage materializes 4096 block-state slots from that data
//! 3. Mutations flow through the chunk manager, which updates the storage and
//!    hands (position, previous state, new state) to the light engine
//! 4. The light engine re-traces affected levels, recursing into neighbor
//!    sections as needed, and marks touched sections for re-meshing
//! 5. The renderer reads back per-position block-state + light as plain bytes
//!
//! ## Thread Safety
//!
//! The core is not internally synchronized. Callers serialize mutations per
//! world; concurrent readers wrap the manager in an `MtResource` and hold the
//! read guard for the whole duration of any multi-position scan.

pub mod core;
pub mod registry;
pub mod world;
