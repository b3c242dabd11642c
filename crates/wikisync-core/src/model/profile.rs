//! Profile identity.
//!
//! A baseline belongs to exactly one `(display name, profile type)` pair;
//! observations for different keys are never compared or merged.

use serde::{Deserialize, Serialize};

/// World type the player is logged into.
///
/// Serialized as the SCREAMING_SNAKE_CASE name the collector expects.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    #[default]
    Standard,
    Beta,
    QuestSpeedrunning,
    Deadman,
    PvpArena,
    TrailblazerLeague,
    DeadmanReborn,
    ShatteredRelicsLeague,
}

impl ProfileType {
    /// Wire name of the profile type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Standard => "STANDARD",
            ProfileType::Beta => "BETA",
            ProfileType::QuestSpeedrunning => "QUEST_SPEEDRUNNING",
            ProfileType::Deadman => "DEADMAN",
            ProfileType::PvpArena => "PVP_ARENA",
            ProfileType::TrailblazerLeague => "TRAILBLAZER_LEAGUE",
            ProfileType::DeadmanReborn => "DEADMAN_REBORN",
            ProfileType::ShatteredRelicsLeague => "SHATTERED_RELICS_LEAGUE",
        }
    }
}

impl std::fmt::Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exclusive key into the profile state store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileKey {
    username: String,
    profile_type: ProfileType,
}

impl ProfileKey {
    pub fn new(username: impl Into<String>, profile_type: ProfileType) -> Self {
        Self {
            username: username.into(),
            profile_type,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn profile_type(&self) -> ProfileType {
        self.profile_type
    }
}

impl std::fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.username, self.profile_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_type_wire_name_matches_serde() {
        for profile_type in [
            ProfileType::Standard,
            ProfileType::QuestSpeedrunning,
            ProfileType::ShatteredRelicsLeague,
        ] {
            let json = serde_json::to_string(&profile_type).unwrap();
            assert_eq!(json, format!("\"{}\"", profile_type.as_str()));
        }
    }

    #[test]
    fn test_profile_keys_differ_by_type() {
        let main = ProfileKey::new("Zezima", ProfileType::Standard);
        let league = ProfileKey::new("Zezima", ProfileType::TrailblazerLeague);
        assert_ne!(main, league);
        assert_eq!(main.to_string(), "Zezima (STANDARD)");
    }
}
