//! Structure blueprints for block worlds.
//!
//! A [`Schematic`] is a rectangular grid of block states that can be decoded
//! from a schematic document, placed into a [`World`] with optional
//! mirroring, or captured back out of one.
//!
//! ```text
//! document ──► SchematicFormat::decode ──► Schematic ──► place / fork ──► world
//!                                              ▲
//!                              world ── capture┘
//! ```

pub mod capture;
pub mod executor;
pub mod format;
pub mod grid;
pub mod legacy;
pub mod placement;
pub mod world;

pub use blueprint_core::{Error, Flip, Region, Result, StateId};
pub use executor::{spawn, Executor, InlineExecutor, RayonExecutor, TaskHandle};
pub use format::mcedit::{DecodeConfig, DecodeReport, McEditFormat, UnknownBlockPolicy};
pub use format::{decode_on, FormatRegistry, SchematicFormat};
pub use grid::Schematic;
pub use legacy::{LegacyKey, LegacyStateTable};
pub use world::{
    ensure_region_loaded, BlockBatch, BlockRegistry, BlockSetter, GenerationUnit, World,
    WorldFuture,
};
