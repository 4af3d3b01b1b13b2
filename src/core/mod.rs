//! # Core Module
//!
//! Fundamental concurrency primitives shared across the engine core. The
//! storage and light layers themselves are unsynchronized; this module holds
//! the guard type callers use to impose the scoped read/write discipline
//! around them.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//!
//! ## Usage
//! ```rust
//! use voxel_engine_core::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
