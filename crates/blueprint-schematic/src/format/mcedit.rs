//! The MCEdit/WorldEdit legacy schematic layout ("Alpha" materials).
//!
//! | field                  | tag           |
//! |------------------------|---------------|
//! | `Width/Height/Length`  | short         |
//! | `WEOffsetX/Y/Z`        | int           |
//! | `Materials`            | string, `"Alpha"` |
//! | `Blocks`               | byte[volume]  |
//! | `Data`                 | byte[volume]  |
//! | `AddBlocks` (optional) | byte[ceil(volume / 2)] |
//!
//! Block ids are 12 bits wide: the low byte lives in `Blocks`, the high
//! nibble in `AddBlocks`, two voxels per byte. Even voxel indices use the
//! high nibble of their byte, odd indices the low nibble.

use std::sync::Arc;

use blueprint_core::{Error, Result, StateId};
use blueprint_nbt::{contains, get, get_optional, NbtCompound, NbtTag};
use glam::IVec3;
use hashbrown::HashMap;

use super::SchematicFormat;
use crate::grid::Schematic;
use crate::legacy::{LegacyKey, LegacyStateTable};

/// The only materials table this layout supports.
pub const ALPHA_MATERIALS: &str = "Alpha";

/// What to do with a legacy block missing from the lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownBlockPolicy {
    /// Abort the whole decode with [`Error::Lookup`].
    #[default]
    Fail,
    /// Write the configured fallback state and keep going.
    Skip,
}

/// Decoder configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    pub unknown_blocks: UnknownBlockPolicy,
    /// State written for skipped voxels.
    pub fallback: StateId,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            unknown_blocks: UnknownBlockPolicy::Fail,
            fallback: StateId::AIR,
        }
    }
}

/// Outcome details of a successful decode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Voxels replaced by the fallback state.
    pub skipped: usize,
    /// Distinct legacy keys that were not in the table, sorted.
    pub unknown_keys: Vec<LegacyKey>,
}

/// Codec for the legacy MCEdit layout.
#[derive(Clone, Debug)]
pub struct McEditFormat {
    table: Arc<LegacyStateTable>,
    config: DecodeConfig,
}

impl McEditFormat {
    pub fn new(table: Arc<LegacyStateTable>) -> Self {
        Self::with_config(table, DecodeConfig::default())
    }

    pub const fn with_config(table: Arc<LegacyStateTable>, config: DecodeConfig) -> Self {
        Self { table, config }
    }

    /// Codec backed by the bundled lookup table.
    pub fn bundled() -> Self {
        Self::new(LegacyStateTable::bundled())
    }

    pub const fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode and also report skipped voxels.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn decode_with_report(&self, document: &NbtCompound) -> Result<(Schematic, DecodeReport)> {
        if !contains(document, "Blocks") {
            return Err(Error::Format("missing Blocks".into()));
        }

        let width = dimension(document, "Width")?;
        let height = dimension(document, "Height")?;
        let length = dimension(document, "Length")?;
        let volume = width as usize * height as usize * length as usize;

        let offset = IVec3::new(
            get::<i32>(document, "WEOffsetX")?,
            get::<i32>(document, "WEOffsetY")?,
            get::<i32>(document, "WEOffsetZ")?,
        );

        let materials = get::<&str>(document, "Materials")?;
        if materials != ALPHA_MATERIALS {
            return Err(Error::Format(format!("unsupported Materials \"{materials}\"")));
        }

        let blocks = get::<Vec<u8>>(document, "Blocks")?;
        let data = get::<Vec<u8>>(document, "Data")?;
        let add_blocks = get_optional::<Vec<u8>>(document, "AddBlocks")?.unwrap_or_default();
        for (name, array) in [("Blocks", &blocks), ("Data", &data)] {
            if array.len() < volume {
                return Err(Error::Format(format!(
                    "{name} holds {} entries, expected {volume}",
                    array.len()
                )));
            }
        }

        let mut states = Vec::with_capacity(volume);
        let mut unknown: HashMap<LegacyKey, usize> = HashMap::new();
        for index in 0..volume {
            let key = LegacyKey::new(legacy_id(&blocks, &add_blocks, index), data[index]);
            match self.table.get(key) {
                Some(state) => states.push(state),
                None if self.config.unknown_blocks == UnknownBlockPolicy::Skip => {
                    *unknown.entry(key).or_default() += 1;
                    states.push(self.config.fallback);
                }
                None => return Err(Error::Lookup(format!("legacy block {key}"))),
            }
        }

        let report = report_unknown(unknown);
        let schematic = Schematic::from_parts([width, height, length], offset, states)?;
        tracing::debug!(width, height, length, skipped = report.skipped, "decoded mcedit schematic");
        Ok((schematic, report))
    }
}

impl SchematicFormat for McEditFormat {
    fn name(&self) -> &'static str {
        "mcedit"
    }

    fn matches(&self, document: &NbtCompound) -> bool {
        contains(document, "Blocks") && contains(document, "Materials")
    }

    fn decode(&self, document: &NbtCompound) -> Result<Schematic> {
        self.decode_with_report(document).map(|(schematic, _)| schematic)
    }

    fn encode(&self, schematic: &Schematic) -> Result<NbtCompound> {
        let states = schematic.blocks()?;
        let volume = states.len();

        let mut blocks = vec![0u8; volume];
        let mut data = vec![0u8; volume];
        let mut add_blocks = vec![0u8; volume.div_ceil(2)];
        let mut needs_add = false;

        for (index, &state) in states.iter().enumerate() {
            let key = self
                .table
                .reverse(state)
                .filter(|key| key.id <= 0xFFF)
                .ok_or_else(|| Error::Lookup(format!("state {}", state.0)))?;

            blocks[index] = (key.id & 0xFF) as u8;
            data[index] = key.data;

            let nibble = ((key.id >> 8) & 0xF) as u8;
            if nibble != 0 {
                needs_add = true;
                add_blocks[index / 2] |= if index % 2 == 0 { nibble << 4 } else { nibble };
            }
        }

        let mut document = NbtCompound::new();
        document.insert("Width", NbtTag::Short(short_extent("Width", schematic.width())?));
        document.insert("Height", NbtTag::Short(short_extent("Height", schematic.height())?));
        document.insert("Length", NbtTag::Short(short_extent("Length", schematic.length())?));
        let offset = schematic.offset();
        document.insert("WEOffsetX", NbtTag::Int(offset.x));
        document.insert("WEOffsetY", NbtTag::Int(offset.y));
        document.insert("WEOffsetZ", NbtTag::Int(offset.z));
        document.insert("Materials", NbtTag::String(ALPHA_MATERIALS.to_string()));
        document.insert("Blocks", byte_array(&blocks));
        document.insert("Data", byte_array(&data));
        if needs_add {
            document.insert("AddBlocks", byte_array(&add_blocks));
        }
        Ok(document)
    }
}

/// Reconstruct the 12-bit legacy id of voxel `index`.
///
/// A missing or short `add_blocks` array contributes nothing.
pub fn legacy_id(blocks: &[u8], add_blocks: &[u8], index: usize) -> u16 {
    let base = u16::from(blocks[index]);
    let add = add_blocks.get(index / 2).map_or(0, |&packed| {
        let nibble = if index % 2 == 0 { packed >> 4 } else { packed & 0x0F };
        u16::from(nibble)
    });
    (add << 8) | base
}

fn dimension(document: &NbtCompound, key: &str) -> Result<u32> {
    let value = get::<i16>(document, key)?;
    u32::try_from(value).map_err(|_| Error::Format(format!("negative {key}: {value}")))
}

fn short_extent(key: &str, value: u32) -> Result<i16> {
    i16::try_from(value).map_err(|_| Error::Format(format!("{key} {value} does not fit a short")))
}

fn byte_array(bytes: &[u8]) -> NbtTag {
    NbtTag::ByteArray(bytemuck::cast_slice::<u8, i8>(bytes).to_vec())
}

fn report_unknown(unknown: HashMap<LegacyKey, usize>) -> DecodeReport {
    let skipped = unknown.values().sum();
    let mut unknown_keys: Vec<_> = unknown.into_keys().collect();
    unknown_keys.sort_unstable();
    for key in &unknown_keys {
        tracing::warn!(%key, "legacy block missing from lookup table, using fallback");
    }
    DecodeReport {
        skipped,
        unknown_keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<LegacyStateTable> {
        Arc::new(LegacyStateTable::from_entries([
            (LegacyKey::new(1, 0), StateId(10)),
            (LegacyKey::new(2, 0), StateId(20)),
            (LegacyKey::new(0x105, 0), StateId(105)),
            (LegacyKey::new(0x206, 0), StateId(206)),
            (LegacyKey::new(35, 14), StateId(1454)),
        ]))
    }

    fn document(blocks: Vec<i8>, data: Vec<i8>, size: (i16, i16, i16)) -> NbtCompound {
        let mut doc = NbtCompound::new();
        doc.insert("Width", NbtTag::Short(size.0));
        doc.insert("Height", NbtTag::Short(size.1));
        doc.insert("Length", NbtTag::Short(size.2));
        doc.insert("WEOffsetX", NbtTag::Int(0));
        doc.insert("WEOffsetY", NbtTag::Int(-1));
        doc.insert("WEOffsetZ", NbtTag::Int(2));
        doc.insert("Materials", NbtTag::String("Alpha".into()));
        doc.insert("Blocks", NbtTag::ByteArray(blocks));
        doc.insert("Data", NbtTag::ByteArray(data));
        doc
    }

    #[test]
    fn decodes_simple_document() {
        let doc = document(vec![1, 2], vec![0, 0], (2, 1, 1));
        let mut grid = Schematic::new();
        grid.read(&McEditFormat::new(table()), &doc).unwrap();

        assert!(!grid.is_locked());
        assert_eq!(grid.get(0, 0, 0), StateId(10));
        assert_eq!(grid.get(1, 0, 0), StateId(20));
        assert_eq!(grid.offset(), IVec3::new(0, -1, 2));
    }

    #[test]
    fn buffer_order_matches_grid_index() {
        // 2 wide, 2 tall, 1 long: index = y * 2 + x.
        let doc = document(vec![1, 2, 2, 1], vec![0; 4], (2, 2, 1));
        let grid = McEditFormat::new(table()).decode(&doc).unwrap();
        assert_eq!(grid.get(1, 0, 0), StateId(20));
        assert_eq!(grid.get(0, 1, 0), StateId(20));
        assert_eq!(grid.get(1, 1, 0), StateId(10));
    }

    #[test]
    fn data_selects_variant() {
        let doc = document(vec![35], vec![14], (1, 1, 1));
        let grid = McEditFormat::new(table()).decode(&doc).unwrap();
        assert_eq!(grid.get(0, 0, 0), StateId(1454));
    }

    #[test]
    fn add_blocks_nibbles() {
        assert_eq!(legacy_id(&[5, 6], &[0x12], 0), 0x105);
        assert_eq!(legacy_id(&[5, 6], &[0x12], 1), 0x206);
        assert_eq!(legacy_id(&[5, 6, 7], &[0x12], 2), 7);
        assert_eq!(legacy_id(&[0xFF], &[], 0), 0xFF);

        let mut doc = document(vec![5, 6], vec![0, 0], (2, 1, 1));
        doc.insert("AddBlocks", NbtTag::ByteArray(vec![0x12]));
        let grid = McEditFormat::new(table()).decode(&doc).unwrap();
        assert_eq!(grid.get(0, 0, 0), StateId(105));
        assert_eq!(grid.get(1, 0, 0), StateId(206));
    }

    #[test]
    fn missing_width_leaves_grid_locked() {
        let mut doc = NbtCompound::new();
        doc.insert("Height", NbtTag::Short(1));
        doc.insert("Length", NbtTag::Short(1));
        doc.insert("Materials", NbtTag::String("Alpha".into()));
        doc.insert("Blocks", NbtTag::ByteArray(vec![1, 2]));
        doc.insert("Data", NbtTag::ByteArray(vec![0, 0]));

        let mut grid = Schematic::new();
        let err = grid.read(&McEditFormat::new(table()), &doc).unwrap_err();

        assert!(matches!(err, Error::Format(msg) if msg.contains("Width")));
        assert!(grid.is_locked());
        assert_eq!(grid.volume(), 0);
    }

    #[test]
    fn missing_blocks_is_reported_first() {
        let mut doc = NbtCompound::new();
        doc.insert("Materials", NbtTag::String("Alpha".into()));
        let err = McEditFormat::new(table()).decode(&doc).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg == "missing Blocks"));
    }

    #[test]
    fn rejects_other_materials() {
        let mut doc = document(vec![1, 2], vec![0, 0], (2, 1, 1));
        doc.insert("Materials", NbtTag::String("Beta".into()));
        let err = McEditFormat::new(table()).decode(&doc).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("Beta")));
    }

    #[test]
    fn short_arrays_are_rejected() {
        let doc = document(vec![1], vec![0, 0], (2, 1, 1));
        assert!(matches!(McEditFormat::new(table()).decode(&doc), Err(Error::Format(_))));
    }

    #[test]
    fn negative_extent_is_rejected() {
        let doc = document(vec![], vec![], (-1, 1, 1));
        assert!(matches!(McEditFormat::new(table()).decode(&doc), Err(Error::Format(_))));
    }

    #[test]
    fn unknown_block_fails_by_default() {
        let doc = document(vec![1, 9], vec![0, 3], (2, 1, 1));
        let format = McEditFormat::new(table());
        assert_eq!(*format.config(), DecodeConfig::default());

        let mut grid = Schematic::new();
        let err = grid.read(&format, &doc).unwrap_err();

        assert!(matches!(err, Error::Lookup(msg) if msg.contains("9:3")));
        assert!(grid.is_locked());
    }

    #[test]
    fn unknown_block_skip_policy_reports() {
        let doc = document(vec![9, 1, 9], vec![0, 0, 0], (3, 1, 1));
        let format = McEditFormat::with_config(
            table(),
            DecodeConfig {
                unknown_blocks: UnknownBlockPolicy::Skip,
                fallback: StateId(7),
            },
        );
        assert_eq!(format.config().unknown_blocks, UnknownBlockPolicy::Skip);

        let (grid, report) = format.decode_with_report(&doc).unwrap();
        assert_eq!(report.skipped, 2);
        assert_eq!(report.unknown_keys, vec![LegacyKey::new(9, 0)]);
        assert_eq!(grid.get(0, 0, 0), StateId(7));
        assert_eq!(grid.get(1, 0, 0), StateId(10));
    }

    #[test]
    fn encode_then_decode_preserves_grid() {
        let states = vec![StateId(10), StateId(105), StateId(206), StateId(1454), StateId(20)];
        let grid = Schematic::from_parts([5, 1, 1], IVec3::new(-2, 0, 3), states.clone()).unwrap();
        let format = McEditFormat::new(table());

        let doc = grid.write(&format).unwrap();
        assert_eq!(get::<Vec<u8>>(&doc, "AddBlocks").unwrap(), vec![0x01, 0x20, 0x00]);

        let back = format.decode(&doc).unwrap();
        assert_eq!(back.blocks().unwrap(), states.as_slice());
        assert_eq!(back.offset(), grid.offset());
        assert_eq!(back.size(), grid.size());
    }

    #[test]
    fn encode_omits_add_blocks_when_unneeded() {
        let grid = Schematic::from_parts([2, 1, 1], IVec3::ZERO, vec![StateId(10), StateId(20)]).unwrap();
        let doc = McEditFormat::new(table()).encode(&grid).unwrap();
        assert!(!contains(&doc, "AddBlocks"));
        assert_eq!(get::<Vec<u8>>(&doc, "Blocks").unwrap(), vec![1, 2]);
    }

    #[test]
    fn encode_rejects_locked_and_unmapped() {
        let format = McEditFormat::new(table());
        assert!(matches!(format.encode(&Schematic::new()), Err(Error::State(_))));

        let grid = Schematic::from_parts([1, 1, 1], IVec3::ZERO, vec![StateId(999)]).unwrap();
        assert!(matches!(format.encode(&grid), Err(Error::Lookup(_))));
    }
}
