//! Manifest schema and parsing.
//!
//! The manifest names which fields the collector observes, partitioned into
//! `varbits`, `varps` and `skills`. It is fetched from the collector, never
//! merged with a previous manifest, and immutable once parsed.
//!
//! ## Wire format
//!
//! ```json
//! { "version": 3, "varbits": [10, 4536], "varps": [281], "skills": ["Attack"] }
//! ```
//!
//! - `varbits`, `varps`: required arrays of integer ids
//! - `skills`: optional; when absent every known skill is observed
//! - `version`: optional; feeds [`Manifest::fingerprint`]
//!
//! Unknown top-level fields are ignored.

use crate::errors::{Result, SyncError, SyncErrorKind};
use crate::model::skill::Skill;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest as _, Sha256};

/// Parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    version: Option<u32>,
    varbits: Vec<i32>,
    varps: Vec<i32>,
    skills: Vec<String>,
}

#[derive(Deserialize)]
struct ManifestWire {
    #[serde(default)]
    version: Option<u32>,
    varbits: Vec<i32>,
    varps: Vec<i32>,
    #[serde(default)]
    skills: Option<Vec<String>>,
}

impl Manifest {
    /// Build a manifest observing every known skill.
    pub fn new(varbits: Vec<i32>, varps: Vec<i32>) -> Self {
        Self {
            version: None,
            varbits,
            varps,
            skills: Skill::ALL.iter().map(|s| s.name().to_string()).collect(),
        }
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn varbits(&self) -> &[i32] {
        &self.varbits
    }

    pub fn varps(&self) -> &[i32] {
        &self.varps
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Number of observable fields across all categories.
    pub fn len(&self) -> usize {
        self.varbits.len() + self.varps.len() + self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identity of the manifest's content.
    ///
    /// `v<version>` when the collector versions its manifests, otherwise the
    /// SHA-256 of the canonical JSON of the three lists. Baselines collected
    /// under a different fingerprint are not diffed against.
    pub fn fingerprint(&self) -> String {
        if let Some(version) = self.version {
            return format!("v{}", version);
        }
        let canonical = serde_json::json!([self.varbits, self.varps, self.skills]).to_string();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}

/// Parse raw manifest bytes as returned by the collector.
///
/// # Errors
///
/// - `InvalidManifest`: bytes are not UTF-8, not JSON, the root is not an
///   object, or a list has the wrong element type
/// - `MissingField`: `varbits` or `varps` is absent
pub fn parse_manifest_bytes(bytes: &[u8]) -> Result<Manifest> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        SyncError::new(SyncErrorKind::InvalidManifest)
            .with_op("parse_manifest_bytes")
            .with_message(format!("manifest is not valid UTF-8: {}", e))
    })?;

    let raw: Value = serde_json::from_str(text).map_err(|e| {
        SyncError::new(SyncErrorKind::InvalidManifest)
            .with_op("parse_manifest_bytes")
            .with_message(format!("manifest is not valid JSON: {}", e))
    })?;

    let obj = raw.as_object().ok_or_else(|| {
        SyncError::new(SyncErrorKind::InvalidManifest)
            .with_op("parse_manifest_bytes")
            .with_message("manifest JSON root must be an object")
    })?;

    for required in ["varbits", "varps"] {
        if !obj.contains_key(required) {
            return Err(SyncError::new(SyncErrorKind::MissingField)
                .with_op("parse_manifest_bytes")
                .with_message(format!("required field `{}` is absent", required)));
        }
    }

    let wire: ManifestWire = serde_json::from_value(raw).map_err(|e| {
        SyncError::new(SyncErrorKind::InvalidManifest)
            .with_op("parse_manifest_bytes")
            .with_message(format!("failed to deserialize manifest: {}", e))
    })?;

    let manifest = Manifest::new(wire.varbits, wire.varps);
    let manifest = match wire.skills {
        Some(skills) => manifest.with_skills(skills),
        None => manifest,
    };
    Ok(match wire.version {
        Some(version) => manifest.with_version(version),
        None => manifest,
    })
}
