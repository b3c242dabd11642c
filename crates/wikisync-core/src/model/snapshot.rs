//! Observed state and its incremental change.
//!
//! A [`Snapshot`] is the full set of values read for one profile under one
//! manifest. A [`Delta`] has the same shape but only carries the entries that
//! changed; it is a separate type so it can never be stored as a baseline.
//!
//! Maps are ordered so that serialized payloads are deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value recorded for a field the host could not read.
///
/// Absence from a snapshot means "not in the manifest", never "unreadable".
pub const UNREADABLE: i32 = -1;

/// The three observed categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Varbit,
    Varp,
    Level,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Varbit, Category::Varp, Category::Level];

    /// Key of the category in the submission payload.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Category::Varbit => "varb",
            Category::Varp => "varp",
            Category::Level => "level",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Full observed state for one profile at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub varb: BTreeMap<i32, i32>,
    #[serde(default)]
    pub varp: BTreeMap<i32, i32>,
    #[serde(default)]
    pub level: BTreeMap<String, i32>,
}

impl Snapshot {
    /// The empty snapshot, meaning "never synced" when used as a baseline.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_varbit(mut self, id: i32, value: i32) -> Self {
        self.varb.insert(id, value);
        self
    }

    pub fn with_varp(mut self, id: i32, value: i32) -> Self {
        self.varp.insert(id, value);
        self
    }

    pub fn with_level(mut self, skill: impl Into<String>, value: i32) -> Self {
        self.level.insert(skill.into(), value);
        self
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        self.varb.len() + self.varp.len() + self.level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.varb.is_empty() && self.varp.is_empty() && self.level.is_empty()
    }

    /// Number of entries in one category.
    pub fn category_len(&self, category: Category) -> usize {
        match category {
            Category::Varbit => self.varb.len(),
            Category::Varp => self.varp.len(),
            Category::Level => self.level.len(),
        }
    }
}

/// Entries of a new snapshot that differ from (or are missing in) the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub varb: BTreeMap<i32, i32>,
    #[serde(default)]
    pub varp: BTreeMap<i32, i32>,
    #[serde(default)]
    pub level: BTreeMap<String, i32>,
}

impl Delta {
    /// Total number of changed entries across all categories.
    pub fn len(&self) -> usize {
        self.varb.len() + self.varp.len() + self.level.len()
    }

    /// An empty delta must never be submitted.
    pub fn is_empty(&self) -> bool {
        self.varb.is_empty() && self.varp.is_empty() && self.level.is_empty()
    }

    pub fn category_len(&self, category: Category) -> usize {
        match category {
            Category::Varbit => self.varb.len(),
            Category::Varp => self.varp.len(),
            Category::Level => self.level.len(),
        }
    }
}
