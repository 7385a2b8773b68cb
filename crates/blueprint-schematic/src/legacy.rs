//! Legacy `id:data` to modern block state lookup.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use blueprint_core::{Error, Result, StateId};
use hashbrown::HashMap;

/// Dataset shipped with the crate, one `id:data=state` entry per line.
const BUNDLED_TABLE: &str = include_str!("../data/legacy_state_lookup.txt");

static BUNDLED: OnceLock<Arc<LegacyStateTable>> = OnceLock::new();

/// A pre-flattening block: numeric id (up to 12 bits) plus metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegacyKey {
    pub id: u16,
    pub data: u8,
}

impl LegacyKey {
    pub const fn new(id: u16, data: u8) -> Self {
        Self { id, data }
    }
}

impl fmt::Display for LegacyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.data)
    }
}

impl FromStr for LegacyKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Format(format!("invalid legacy key \"{s}\""));
        let (id, data) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            id: id.trim().parse().map_err(|_| invalid())?,
            data: data.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Immutable mapping from legacy keys to modern states.
#[derive(Clone, Debug, Default)]
pub struct LegacyStateTable {
    forward: HashMap<LegacyKey, StateId>,
    /// Lowest legacy key per state, for encoding.
    reverse: HashMap<StateId, LegacyKey>,
}

impl LegacyStateTable {
    /// The process-wide table parsed from the bundled dataset.
    ///
    /// Parsed on first use; every caller shares the same instance.
    ///
    /// # Panics
    ///
    /// If the dataset compiled into the crate does not parse.
    pub fn bundled() -> Arc<Self> {
        BUNDLED
            .get_or_init(|| {
                let table = Self::parse(BUNDLED_TABLE)
                    .unwrap_or_else(|err| panic!("bundled legacy state table is corrupt: {err}"));
                tracing::debug!(entries = table.len(), "loaded legacy state table");
                Arc::new(table)
            })
            .clone()
    }

    /// Parse `id:data=state` lines. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || Error::Format(format!("lookup table line {}: \"{line}\"", number + 1));
            let (key, state) = line.split_once('=').ok_or_else(malformed)?;
            let key: LegacyKey = key.parse().map_err(|_| malformed())?;
            let state: u16 = state.trim().parse().map_err(|_| malformed())?;
            entries.push((key, StateId(state)));
        }
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LegacyKey, StateId)>,
    {
        let mut table = Self::default();
        for (key, state) in entries {
            table.forward.insert(key, state);
            table
                .reverse
                .entry(state)
                .and_modify(|existing| *existing = (*existing).min(key))
                .or_insert(key);
        }
        table
    }

    pub fn get(&self, key: LegacyKey) -> Option<StateId> {
        self.forward.get(&key).copied()
    }

    /// Legacy key that encodes `state`, preferring the lowest one.
    pub fn reverse(&self, state: StateId) -> Option<LegacyKey> {
        self.reverse.get(&state).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Highest state id the table can produce.
    pub fn max_state(&self) -> Option<StateId> {
        self.reverse.keys().max().copied()
    }
}
