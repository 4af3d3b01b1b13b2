//! # Block Registry Module
//!
//! This module provides the minimal block-state registry the storage and
//! light layers depend on. A block state is interned once and referenced
//! everywhere by a lightweight [`BlockState`] handle; many positions across
//! many sections share the same entry, so equality is equality of handles and
//! no per-slot ownership bookkeeping is needed.
//!
//! The registry intentionally stops at what the core consumes: a state's
//! luminance (0..=15), whether it is solid and fully opaque, and whether it
//! holds fluid. Everything else a full data-driven block system would carry
//! (models, shapes, behavior) belongs to external collaborators.
//!
//! ## Sources of Definitions
//!
//! * A built-in table of common blocks ([`builtin::BUILTIN_BLOCKS`]), a
//!   compile-time `phf` map
//! * Data-driven JSON definitions loaded at runtime via
//!   [`BlockRegistry::load_definitions`]

use std::collections::HashMap;

use serde::Deserialize;

use crate::world::chunk::section::MAX_LIGHT_LEVEL;

pub mod builtin;

/// A lightweight handle to an interned block state.
///
/// Handles index into the registry arena that created them. Slot storage
/// keeps `Option<BlockState>` (`None` = air), so the handle itself never
/// represents emptiness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState(u16);

impl BlockState {
    /// Returns the raw arena index of this handle.
    ///
    /// Index 0 is always the neutral "air" definition; occupied slots are
    /// represented as `Some(state)` rather than handle 0, but decoded palette
    /// tables may legitimately map entries to it.
    pub fn id(self) -> u16 {
        self.0
    }
}

/// The per-state properties the storage and light layers query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BlockTraits {
    /// Intrinsic light emission, 0 (none) to 15 (max).
    #[serde(default)]
    pub luminance: u8,

    /// Whether the block is solid and fully opaque. Opaque non-emitting
    /// blocks stop light; fully opaque faces contribute to occlusion.
    #[serde(default)]
    pub opaque: bool,

    /// Whether the block itself is a fluid.
    #[serde(default)]
    pub fluid: bool,

    /// Whether the block holds fluid without being one (waterlogging).
    #[serde(default)]
    pub waterlogged: bool,
}

impl BlockTraits {
    /// True if the section containing this state must be treated as holding
    /// fluid: either a fluid proper or a waterlogged state.
    pub fn is_fluid(&self) -> bool {
        self.fluid || self.waterlogged
    }
}

/// A named block definition, as registered in code or parsed from JSON.
///
/// The JSON form is flat:
///
/// ```json
/// { "name": "glowstone", "luminance": 15, "opaque": true }
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    /// The unique name of the block, e.g. `"stone"`.
    pub name: String,

    /// The properties of the block.
    #[serde(flatten)]
    pub traits: BlockTraits,
}

/// The arena of interned block states.
///
/// One registry is shared (via `Arc`) by every section of a world. Handles
/// from one registry must not be used with another; doing so is a programmer
/// error and panics on lookup of an out-of-range handle.
pub struct BlockRegistry {
    defs: Vec<BlockDef>,
    by_name: HashMap<String, BlockState>,
}

impl BlockRegistry {
    /// Creates an empty registry, pre-seeded with the neutral `"air"`
    /// definition at handle 0.
    pub fn new() -> Self {
        let mut registry = Self {
            defs: Vec::new(),
            by_name: HashMap::new(),
        };
        registry.register(BlockDef {
            name: "air".to_string(),
            traits: BlockTraits::default(),
        });
        registry
    }

    /// Creates a registry populated with the built-in block table.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, traits) in builtin::BUILTIN_BLOCKS.entries() {
            registry.register(BlockDef {
                name: (*name).to_string(),
                traits: *traits,
            });
        }
        registry
    }

    /// Interns a definition and returns its handle.
    ///
    /// Registering a name that already exists returns the existing handle
    /// without replacing the stored definition.
    ///
    /// # Panics
    /// Panics if `luminance` exceeds [`MAX_LIGHT_LEVEL`] or the arena would
    /// overflow a `u16` handle.
    pub fn register(&mut self, def: BlockDef) -> BlockState {
        if let Some(&existing) = self.by_name.get(&def.name) {
            return existing;
        }
        assert!(
            def.traits.luminance <= MAX_LIGHT_LEVEL,
            "luminance {} of block {:?} exceeds the maximum of {}",
            def.traits.luminance,
            def.name,
            MAX_LIGHT_LEVEL
        );
        assert!(self.defs.len() < u16::MAX as usize, "block registry full");

        let handle = BlockState(self.defs.len() as u16);
        self.by_name.insert(def.name.clone(), handle);
        self.defs.push(def);
        handle
    }

    /// Parses a JSON array of block definitions and registers each one.
    ///
    /// # Returns
    /// The handles of the parsed definitions, in input order.
    pub fn load_definitions(&mut self, json: &str) -> serde_json::Result<Vec<BlockState>> {
        let defs: Vec<BlockDef> = serde_json::from_str(json)?;
        Ok(defs.into_iter().map(|def| self.register(def)).collect())
    }

    /// Looks up a handle by block name.
    pub fn state(&self, name: &str) -> Option<BlockState> {
        self.by_name.get(name).copied()
    }

    /// Returns the traits of an interned state.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this registry.
    pub fn traits(&self, state: BlockState) -> &BlockTraits {
        &self.defs[state.0 as usize].traits
    }

    /// Luminance of a slot value; air emits nothing.
    pub fn luminance(&self, state: Option<BlockState>) -> u8 {
        state.map_or(0, |state| self.traits(state).luminance)
    }

    /// Whether a slot value is solid and fully opaque; air is not.
    pub fn solid_opaque(&self, state: Option<BlockState>) -> bool {
        state.is_some_and(|state| self.traits(state).opaque)
    }

    /// Whether a slot value holds fluid; air does not.
    pub fn fluid(&self, state: Option<BlockState>) -> bool {
        state.is_some_and(|state| self.traits(state).is_fluid())
    }

    /// The number of interned definitions, including `"air"`.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True if the registry holds nothing beyond the implicit seed (never the
    /// case for a registry built through [`BlockRegistry::new`]).
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
