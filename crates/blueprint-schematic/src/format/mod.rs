//! Schematic document formats.
//!
//! Each format knows how to recognise, decode and encode one on-disk layout.
//! [`FormatRegistry`] picks the right one for a document.

pub mod mcedit;

use std::sync::Arc;

use blueprint_core::{Error, Result};
use blueprint_nbt::NbtCompound;

use crate::executor::{spawn, Executor, TaskHandle};
use crate::grid::Schematic;

pub use mcedit::McEditFormat;

/// A schematic codec.
pub trait SchematicFormat: Send + Sync {
    /// Short identifier, e.g. `"mcedit"`.
    fn name(&self) -> &'static str;

    /// Whether `document` looks like this format.
    fn matches(&self, document: &NbtCompound) -> bool;

    /// Build an unlocked schematic from `document`.
    ///
    /// Decoding is all or nothing: on error no schematic is produced.
    fn decode(&self, document: &NbtCompound) -> Result<Schematic>;

    /// Serialise an unlocked schematic.
    fn encode(&self, schematic: &Schematic) -> Result<NbtCompound>;
}

/// Known formats, tried in registration order.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<Arc<dyn SchematicFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in format using the bundled lookup table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(McEditFormat::bundled()));
        registry
    }

    pub fn register(&mut self, format: Arc<dyn SchematicFormat>) {
        self.formats.push(format);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SchematicFormat>> {
        self.formats.iter().find(|f| f.name() == name).cloned()
    }

    /// First format that recognises `document`.
    pub fn detect(&self, document: &NbtCompound) -> Option<Arc<dyn SchematicFormat>> {
        self.formats.iter().find(|f| f.matches(document)).cloned()
    }

    pub fn decode(&self, document: &NbtCompound) -> Result<Schematic> {
        let format = self
            .detect(document)
            .ok_or_else(|| Error::Format("unrecognised schematic format".into()))?;
        tracing::debug!(format = format.name(), "detected schematic format");
        format.decode(document)
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.formats.iter().map(|format| format.name()))
            .finish()
    }
}

impl Schematic {
    /// Decode `document` into this grid.
    ///
    /// On failure the grid is left exactly as it was.
    pub fn read(&mut self, format: &dyn SchematicFormat, document: &NbtCompound) -> Result<()> {
        *self = format.decode(document)?;
        Ok(())
    }

    /// Encode this grid with `format`.
    pub fn write(&self, format: &dyn SchematicFormat) -> Result<NbtCompound> {
        format.encode(self)
    }
}

/// Decode `document` as a task on `executor`.
pub fn decode_on<E>(
    executor: &E,
    format: Arc<dyn SchematicFormat>,
    document: NbtCompound,
) -> TaskHandle<Schematic>
where
    E: Executor + ?Sized,
{
    spawn(executor, move || format.decode(&document))
}
