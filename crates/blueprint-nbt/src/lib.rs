//! Typed, fail-fast access to binary tag (NBT) documents.
//!
//! Parsing the binary format itself is delegated to `quartz_nbt`; this crate
//! only turns "field absent or of the wrong type" into a
//! [`blueprint_core::Error::Format`] naming the field.

pub mod access;
pub mod io;

pub use access::{contains, get, get_optional, FromTag};
pub use io::{read_document, write_document};
pub use quartz_nbt::io::Flavor;
pub use quartz_nbt::{NbtCompound, NbtTag};
