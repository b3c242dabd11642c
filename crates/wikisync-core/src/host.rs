//! Host read surface.
//!
//! The host is the long-running game client whose state is observed. It is
//! an external collaborator: the engine only depends on the [`HostState`]
//! trait. Implementations are only required to be callable from the host's
//! main context; the engine never calls them from anywhere else.

use crate::model::{ProfileType, Skill};
use serde::{Deserialize, Serialize};

/// Coarse lifecycle state of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[default]
    Starting,
    LoginScreen,
    Loading,
    LoggedIn,
    Hopping,
    ConnectionLost,
}

impl GameState {
    /// Only a logged-in host has state worth syncing.
    pub fn is_syncable(&self) -> bool {
        matches!(self, GameState::LoggedIn)
    }
}

/// Where a varbit lives inside its backing varp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarbitComposition {
    /// Id of the varp holding the bits
    pub index: i32,
    /// Least significant bit (inclusive)
    pub lsb: u32,
    /// Most significant bit (inclusive)
    pub msb: u32,
}

impl VarbitComposition {
    pub fn new(index: i32, lsb: u32, msb: u32) -> Self {
        Self { index, lsb, msb }
    }

    /// Decode this varbit from the raw value of its backing varp.
    pub fn extract(&self, raw: i32) -> i32 {
        extract_bits(raw, self.lsb, self.msb)
    }
}

/// Extract bits `low..=high` of `raw`: `(raw >> low) & ((1 << (high - low + 1)) - 1)`.
///
/// The shift is logical, so a range reaching bit 31 does not sign-extend.
/// Ranges wider than 32 bits are clamped to the full word.
pub fn extract_bits(raw: i32, low: u32, high: u32) -> i32 {
    if low > high || low > 31 {
        return 0;
    }
    let width = (high - low + 1).min(32 - low);
    let shifted = (raw as u32) >> low;
    let mask = if width == 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    (shifted & mask) as i32
}

/// The host's state-access API.
pub trait HostState {
    fn game_state(&self) -> GameState;

    /// Display name of the logged-in player, if any.
    fn local_player_name(&self) -> Option<String>;

    fn profile_type(&self) -> ProfileType;

    fn varp_value(&self, varp_id: i32) -> i32;

    /// `None` when the host has no composition for this varbit id.
    fn varbit_composition(&self, varbit_id: i32) -> Option<VarbitComposition>;

    /// Unboosted level of a skill.
    fn real_skill_level(&self, skill: Skill) -> i32;
}
