//! Host backed by a JSON file.
//!
//! The file is re-read whenever the engine checks `game_state`, which is the
//! first read of every cycle, so editing it between ticks changes what the
//! next cycle observes. A file that fails to load keeps the previous state.
//!
//! ```json
//! {
//!   "game_state": "LOGGED_IN",
//!   "player": "Zezima",
//!   "profile_type": "STANDARD",
//!   "varps": {"281": 4},
//!   "varbits": {"10": {"index": 281, "lsb": 1, "msb": 3}},
//!   "levels": {"Attack": 60}
//! }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use wikisync_core::host::{GameState, HostState, VarbitComposition};
use wikisync_core::model::{ProfileType, Skill};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostFile {
    pub game_state: GameState,
    pub player: Option<String>,
    pub profile_type: ProfileType,
    pub varps: BTreeMap<i32, i32>,
    pub varbits: BTreeMap<i32, VarbitComposition>,
    pub levels: BTreeMap<String, i32>,
}

impl HostFile {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read host file {}: {}", path.display(), e))?;
        let file = serde_json::from_str(&text)
            .map_err(|e| format!("invalid host file {}: {}", path.display(), e))?;
        Ok(file)
    }
}

pub struct FileHost {
    path: PathBuf,
    state: Mutex<HostFile>,
}

impl FileHost {
    /// # Errors
    ///
    /// Fails if the file cannot be loaded the first time.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        let state = HostFile::load(&path)?;
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn reload(&self) {
        match HostFile::load(&self.path) {
            Ok(fresh) => *self.lock() = fresh,
            Err(e) => tracing::warn!(
                component = module_path!(),
                path = %self.path.display(),
                error = %e,
                "host file reload failed; keeping previous state"
            ),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostFile> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl HostState for FileHost {
    fn game_state(&self) -> GameState {
        self.reload();
        self.lock().game_state
    }

    fn local_player_name(&self) -> Option<String> {
        self.lock().player.clone()
    }

    fn profile_type(&self) -> ProfileType {
        self.lock().profile_type
    }

    fn varp_value(&self, varp_id: i32) -> i32 {
        self.lock().varps.get(&varp_id).copied().unwrap_or(0)
    }

    fn varbit_composition(&self, varbit_id: i32) -> Option<VarbitComposition> {
        self.lock().varbits.get(&varbit_id).copied()
    }

    fn real_skill_level(&self, skill: Skill) -> i32 {
        self.lock().levels.get(skill.name()).copied().unwrap_or(1)
    }
}
