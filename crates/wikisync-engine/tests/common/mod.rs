use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use wikisync_core::config::SyncConfig;
use wikisync_core::host::{GameState, HostState, VarbitComposition};
use wikisync_core::model::{ProfileType, Skill};
use wikisync_engine::main_context::MainContext;
use wikisync_engine::scheduler::SyncScheduler;
use wikisync_engine::transport::{HttpResponse, SyncTransport, TransportError};

pub const MANIFEST_URL: &str = "http://collector.test/manifest";
pub const SUBMIT_URL: &str = "http://collector.test/submit";

/// Manifest observing varbit 10 (on varp 281, bits 1..=3) and no skills.
#[allow(dead_code)]
pub const VARBIT_10_MANIFEST: &str = r#"{"varbits": [10], "varps": [], "skills": []}"#;

#[derive(Debug, Clone)]
struct HostData {
    game_state: GameState,
    player: Option<String>,
    profile_type: ProfileType,
    varps: HashMap<i32, i32>,
    compositions: HashMap<i32, VarbitComposition>,
    levels: HashMap<Skill, i32>,
}

/// In-memory host; clones share state so tests can mutate it between cycles.
#[derive(Debug, Clone)]
pub struct FakeHost {
    data: Arc<Mutex<HostData>>,
}

#[allow(dead_code)]
impl FakeHost {
    /// Logged-in "Zezima" on a standard profile, varbit 10 mapped to varp 281.
    pub fn logged_in() -> Self {
        let mut compositions = HashMap::new();
        compositions.insert(10, VarbitComposition::new(281, 1, 3));
        Self {
            data: Arc::new(Mutex::new(HostData {
                game_state: GameState::LoggedIn,
                player: Some("Zezima".to_string()),
                profile_type: ProfileType::Standard,
                varps: HashMap::new(),
                compositions,
                levels: HashMap::new(),
            })),
        }
    }

    pub fn set_game_state(&self, state: GameState) {
        self.data.lock().unwrap().game_state = state;
    }

    pub fn set_player(&self, name: Option<&str>) {
        self.data.lock().unwrap().player = name.map(str::to_string);
    }

    pub fn set_profile_type(&self, profile_type: ProfileType) {
        self.data.lock().unwrap().profile_type = profile_type;
    }

    pub fn set_varp(&self, varp_id: i32, value: i32) {
        self.data.lock().unwrap().varps.insert(varp_id, value);
    }

    /// Set varbit 10 by writing its bits into varp 281.
    pub fn set_varbit_10(&self, value: i32) {
        self.set_varp(281, value << 1);
    }

    pub fn set_level(&self, skill: Skill, level: i32) {
        self.data.lock().unwrap().levels.insert(skill, level);
    }

    pub fn context(&self) -> MainContext {
        MainContext::direct(self.clone())
    }
}

impl HostState for FakeHost {
    fn game_state(&self) -> GameState {
        self.data.lock().unwrap().game_state
    }

    fn local_player_name(&self) -> Option<String> {
        self.data.lock().unwrap().player.clone()
    }

    fn profile_type(&self) -> ProfileType {
        self.data.lock().unwrap().profile_type
    }

    fn varp_value(&self, varp_id: i32) -> i32 {
        self.data.lock().unwrap().varps.get(&varp_id).copied().unwrap_or(0)
    }

    fn varbit_composition(&self, varbit_id: i32) -> Option<VarbitComposition> {
        self.data.lock().unwrap().compositions.get(&varbit_id).copied()
    }

    fn real_skill_level(&self, skill: Skill) -> i32 {
        self.data.lock().unwrap().levels.get(&skill).copied().unwrap_or(1)
    }
}

type Reply = Result<HttpResponse, TransportError>;

/// A scripted answer; `Hang` never completes.
#[allow(dead_code)]
pub enum Scripted {
    Reply(Reply),
    Hang,
}

#[derive(Default)]
struct Script {
    manifest: Option<String>,
    gets: VecDeque<Scripted>,
    posts: VecDeque<Scripted>,
    get_count: usize,
    submissions: Vec<serde_json::Value>,
}

/// Collector stand-in.
///
/// GETs answer from the one-shot queue first, then with the sticky manifest
/// (404 if none). POSTs answer from their queue, defaulting to 200.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn with_manifest(body: &str) -> Self {
        let transport = Self::default();
        transport.set_manifest(body);
        transport
    }

    pub fn set_manifest(&self, body: &str) {
        self.script.lock().unwrap().manifest = Some(body.to_string());
    }

    pub fn push_get(&self, scripted: Scripted) {
        self.script.lock().unwrap().gets.push_back(scripted);
    }

    pub fn push_post(&self, scripted: Scripted) {
        self.script.lock().unwrap().posts.push_back(scripted);
    }

    pub fn reject_next_post(&self, status: u16) {
        self.push_post(Scripted::Reply(Ok(HttpResponse::new(status, ""))));
    }

    pub fn get_count(&self) -> usize {
        self.script.lock().unwrap().get_count
    }

    /// Every submission body received, including rejected ones.
    pub fn submissions(&self) -> Vec<serde_json::Value> {
        self.script.lock().unwrap().submissions.clone()
    }

    pub fn last_delta(&self) -> Option<serde_json::Value> {
        self.submissions().last().map(|body| body["delta"].clone())
    }
}

async fn answer(scripted: Scripted) -> Reply {
    match scripted {
        Scripted::Reply(reply) => reply,
        Scripted::Hang => std::future::pending().await,
    }
}

#[async_trait]
impl SyncTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Reply {
        assert_eq!(url, MANIFEST_URL);
        let scripted = {
            let mut script = self.script.lock().unwrap();
            script.get_count += 1;
            match script.gets.pop_front() {
                Some(scripted) => scripted,
                None => Scripted::Reply(Ok(match &script.manifest {
                    Some(body) => HttpResponse::new(200, body.clone()),
                    None => HttpResponse::new(404, ""),
                })),
            }
        };
        answer(scripted).await
    }

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Reply {
        assert_eq!(url, SUBMIT_URL);
        let scripted = {
            let mut script = self.script.lock().unwrap();
            script
                .submissions
                .push(serde_json::from_slice(&body).expect("submission is JSON"));
            script
                .posts
                .pop_front()
                .unwrap_or(Scripted::Reply(Ok(HttpResponse::new(200, ""))))
        };
        answer(scripted).await
    }
}

#[allow(dead_code)]
pub fn test_config() -> SyncConfig {
    SyncConfig {
        manifest_url: MANIFEST_URL.to_string(),
        submit_url: SUBMIT_URL.to_string(),
        tick_interval_ms: 1_000,
        manifest_refresh_every: 2,
        request_timeout_ms: 3_000,
        ..SyncConfig::default()
    }
}

#[allow(dead_code)]
pub fn scheduler(host: &FakeHost, transport: &ScriptedTransport) -> SyncScheduler {
    scheduler_with(test_config(), host, transport)
}

#[allow(dead_code)]
pub fn scheduler_with(
    config: SyncConfig,
    host: &FakeHost,
    transport: &ScriptedTransport,
) -> SyncScheduler {
    SyncScheduler::new(&config, host.context(), Arc::new(transport.clone()))
}

/// Scheduler over an arbitrary main context, e.g. a queue-backed one.
#[allow(dead_code)]
pub fn scheduler_on(main: MainContext, transport: &ScriptedTransport) -> SyncScheduler {
    SyncScheduler::new(&test_config(), main, Arc::new(transport.clone()))
}
