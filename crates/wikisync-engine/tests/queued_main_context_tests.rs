#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Cycles driven through a queue-backed main context.
//!
//! The test thread plays the host: it runs queued jobs one at a time with
//! `run_pending` and may change host state between them.

mod common;

use common::{scheduler_on, FakeHost, ScriptedTransport, VARBIT_10_MANIFEST};
use serde_json::json;
use tokio::task::JoinHandle;
use wikisync_core::errors::SyncErrorKind;
use wikisync_core::host::GameState;
use wikisync_core::model::{ProfileKey, ProfileType, Snapshot};
use wikisync_engine::main_context::{main_context, MainContextRunner};
use wikisync_engine::scheduler::{CycleOutcome, SkipReason, SyncScheduler};

fn spawn_cycle(mut scheduler: SyncScheduler) -> JoinHandle<(SyncScheduler, CycleOutcome)> {
    tokio::spawn(async move {
        let outcome = scheduler.run_cycle().await;
        (scheduler, outcome)
    })
}

/// Wait for the cycle to queue a host job, then run exactly that one.
async fn run_next_job(runner: &mut MainContextRunner<FakeHost>) {
    loop {
        tokio::task::yield_now().await;
        match runner.run_pending() {
            0 => continue,
            1 => return,
            n => panic!("cycle queued {} jobs at once", n),
        }
    }
}

#[tokio::test]
async fn test_cycle_completes_through_queued_jobs() {
    // GIVEN a host that only answers when its runner is pumped
    let host = FakeHost::logged_in();
    host.set_varbit_10(2);
    let (context, mut runner) = main_context(host.clone());
    let transport = ScriptedTransport::with_manifest(VARBIT_10_MANIFEST);
    let cycle = spawn_cycle(scheduler_on(context, &transport));

    // WHEN the host runs the readiness job and then the collect job
    run_next_job(&mut runner).await;
    run_next_job(&mut runner).await;
    let (scheduler, outcome) = cycle.await.unwrap();

    // THEN the cycle submits the snapshot read on the host side
    assert_eq!(outcome, CycleOutcome::Submitted { delta_len: 1 });
    assert_eq!(
        transport.last_delta().unwrap(),
        json!({"varb": {"10": 2}, "varp": {}, "level": {}})
    );
    assert_eq!(scheduler.tick(), 1);
    assert_eq!(runner.run_pending(), 0);
}

#[tokio::test]
async fn test_player_switch_between_jobs_keeps_identity_and_snapshot_together() {
    // GIVEN Zezima logged in with varbit 10 = 2
    let host = FakeHost::logged_in();
    host.set_varbit_10(2);
    let (context, mut runner) = main_context(host.clone());
    let transport = ScriptedTransport::with_manifest(VARBIT_10_MANIFEST);
    let cycle = spawn_cycle(scheduler_on(context, &transport));

    // WHEN the readiness job runs as Zezima
    run_next_job(&mut runner).await;
    // AND Bob logs in, with varbit 10 = 7, before the collect job runs
    runner.host().set_player(Some("Bob"));
    runner.host().set_varbit_10(7);
    run_next_job(&mut runner).await;
    let (scheduler, outcome) = cycle.await.unwrap();

    // THEN Bob's state is submitted and committed under Bob
    assert_eq!(outcome, CycleOutcome::Submitted { delta_len: 1 });
    let body = &transport.submissions()[0];
    assert_eq!(body["username"], json!("Bob"));
    assert_eq!(body["delta"]["varb"], json!({"10": 7}));
    let bob = ProfileKey::new("Bob", ProfileType::Standard);
    assert_eq!(scheduler.store().get(&bob), Snapshot::empty().with_varbit(10, 7));

    // AND Zezima has no baseline holding Bob's value
    let zezima = ProfileKey::new("Zezima", ProfileType::Standard);
    assert_eq!(scheduler.store().get(&zezima), Snapshot::empty());
    assert_eq!(scheduler.store().len(), 1);
}

#[tokio::test]
async fn test_logout_between_jobs_skips_without_submitting() {
    let host = FakeHost::logged_in();
    let (context, mut runner) = main_context(host.clone());
    let transport = ScriptedTransport::with_manifest(VARBIT_10_MANIFEST);
    let cycle = spawn_cycle(scheduler_on(context, &transport));

    run_next_job(&mut runner).await;
    runner.host().set_game_state(GameState::LoginScreen);
    run_next_job(&mut runner).await;
    let (scheduler, outcome) = cycle.await.unwrap();

    assert_eq!(outcome, CycleOutcome::Skipped(SkipReason::NotReady));
    assert!(transport.submissions().is_empty());
    assert!(scheduler.store().is_empty());
    assert_eq!(scheduler.tick(), 0);
}

#[tokio::test]
async fn test_host_shutdown_mid_cycle_fails_cycle() {
    // GIVEN a cycle past its readiness job
    let host = FakeHost::logged_in();
    let (context, mut runner) = main_context(host);
    let transport = ScriptedTransport::with_manifest(VARBIT_10_MANIFEST);
    let cycle = spawn_cycle(scheduler_on(context, &transport));
    run_next_job(&mut runner).await;

    // WHEN the host goes away before the collect job
    drop(runner);
    let (scheduler, outcome) = cycle.await.unwrap();

    // THEN the cycle fails and nothing is committed
    assert_eq!(outcome, CycleOutcome::Failed(SyncErrorKind::HostUnavailable));
    assert!(transport.submissions().is_empty());
    assert!(scheduler.store().is_empty());
}
