//! End-to-end engine tests: a running engine task driven by the poll
//! clock and its control handle, against a recording host and a scripted
//! endpoint. Time is paused, so the 500 ms cadence runs deterministically.

use std::time::Duration;

use tokio::task::JoinHandle;

use livepanel_client::test_utils::ScriptedEndpoint;
use livepanel_core::{PanelFlag, PreviewVerdict, SurfaceId};
use livepanel_engine::test_utils::RecordingHost;
use livepanel_engine::{MemoryForm, PanelConfig, PanelEngine, PanelHandle};

const SRC: &str = "https://cms.test/preview/?mode=desktop&in_preview_panel=true";

fn spawn_engine(
    host: &RecordingHost,
    endpoint: &ScriptedEndpoint,
    form: &MemoryForm,
) -> (JoinHandle<livepanel_core::Result<()>>, PanelHandle) {
    let (engine, handle) = PanelEngine::attach(
        host.clone(),
        endpoint.clone(),
        form.clone(),
        PanelConfig::default(),
    )
    .unwrap()
    .expect("panel must be present");
    (tokio::spawn(engine.run()), handle)
}

/// Let the engine task reach its select loop (and seed the comparator)
/// before the test mutates anything.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[test]
fn test_attach_without_panel_is_a_no_op() {
    let attached = PanelEngine::attach(
        RecordingHost::without_panel(),
        ScriptedEndpoint::new(),
        MemoryForm::new(),
        PanelConfig::default(),
    )
    .unwrap();
    assert!(attached.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_poll_submits_after_form_edit() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new();
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    form.edit("title", "About");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(endpoint.calls(), 1);
    assert_eq!(
        endpoint.snapshots()[0].fields().get("title").map(String::as_str),
        Some("About")
    );
    // the initial surface was swapped out for a fresh twin
    assert!(host.surface(SurfaceId(1)).is_none());
    assert_eq!(host.surfaces_alive(), 1);
    assert!(!host.flag(PanelFlag::Loading));

    // unchanged content does not re-submit
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(endpoint.calls(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_unedited_form_never_submits() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new();
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(endpoint.calls(), 0);
    assert_eq!(host.surfaces_alive(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_auto_update_disabled_still_allows_forced_sync() {
    let host = RecordingHost::new(SRC).with_auto_update(false);
    let endpoint = ScriptedEndpoint::new();
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    form.edit("title", "About");
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(endpoint.calls(), 0, "polling must stay off");

    handle.sync_now().await.unwrap();
    settle().await;
    assert_eq!(endpoint.calls(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_alerts_once_and_recovers() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new();
    endpoint.push_transport_error("connection reset");
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    form.edit("title", "About");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(endpoint.calls(), 1);
    assert_eq!(host.alerts(), vec!["Error while sending preview data."]);
    // last known-good preview stays on screen
    assert!(host.surface(SurfaceId(1)).is_some());
    assert!(!host.flag(PanelFlag::Loading));

    // the loop survives the failure; the next edit synchronizes normally
    form.edit("title", "Contact");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(endpoint.calls(), 2);
    assert_eq!(host.alerts().len(), 1);
    assert!(host.surface(SurfaceId(1)).is_none());
    assert_eq!(host.surfaces_alive(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_mode_change_reloads_and_submits_unchanged_form() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new();
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    handle.set_mode("mobile").await.unwrap();
    settle().await;

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(
        navigations[0].1,
        "https://cms.test/preview/?mode=mobile&in_preview_panel=true"
    );
    assert_eq!(
        host.new_tab_target().as_deref(),
        Some("https://cms.test/preview/?mode=mobile")
    );
    // the form did not change, the mode did
    assert_eq!(endpoint.calls(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_open_in_new_tab_navigates_pre_opened_tab() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new();
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    let tab = host.open_tab_for_test();
    handle.open_in_new_tab(Some(tab)).await.unwrap();
    settle().await;

    let tabs = host.tabs();
    assert_eq!(tabs.len(), 1);
    assert!(!tabs[0].closed);
    assert_eq!(
        tabs[0].url.as_deref(),
        Some("https://cms.test/preview/?mode=desktop")
    );

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_open_in_new_tab_closes_tab_on_invalid_content() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new();
    endpoint.push_verdict(PreviewVerdict {
        is_valid: false,
        is_available: true,
    });
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    handle.open_in_new_tab(None).await.unwrap();
    settle().await;

    let tabs = host.tabs();
    assert_eq!(tabs.len(), 1);
    assert!(tabs[0].closed);
    assert!(tabs[0].url.is_none());
    assert_eq!(host.refocus_count(), 1);
    // the panel itself still shows the (invalid) preview
    assert!(host.flag(PanelFlag::HasErrors));
    assert_eq!(host.surfaces_alive(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cycles_are_serialized_under_slow_loads() {
    // surface loads take three poll intervals
    let host = RecordingHost::new(SRC).with_load_delay(Duration::from_millis(1500));
    let endpoint = ScriptedEndpoint::new();
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    form.edit("title", "About");
    tokio::time::sleep(Duration::from_millis(2500)).await;

    // one cycle ran to completion; the elapsed ticks neither re-submitted
    // nor started an overlapping swap
    assert_eq!(endpoint.calls(), 1);
    assert_eq!(host.surfaces_alive(), 1);
    assert!(!host.flag(PanelFlag::Loading));

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_sequential_forced_syncs_swap_cleanly() {
    let host = RecordingHost::new(SRC);
    let endpoint = ScriptedEndpoint::new().with_delay(Duration::from_millis(100));
    let form = MemoryForm::with_fields([("title", "Home")]);
    let (task, handle) = spawn_engine(&host, &endpoint, &form);
    settle().await;

    handle.sync_now().await.unwrap();
    handle.sync_now().await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(endpoint.calls(), 2);
    assert_eq!(host.surfaces_alive(), 1);
    assert!(host.alerts().is_empty());

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();
}
