//! Player controller integration tests
//!
//! Drives the controller through the simulated transport the way a UI
//! session would: issue a command, let time pass, deliver transport events.

use itired_playback::{
    CatalogResolver, JsonFileStore, MemoryStore, PlayerConfig, PlayerController, PlayerError,
    PlayerEvent, PlayerStore, RepeatMode, ResolutionError, ResolvedTrack, SimulatedTransport,
    Track, TrackId, TrackRef, Transport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

// ===== Test Helpers =====

const SERVICE: &str = "yandex";

fn url(id: &str) -> String {
    format!("https://cdn.example.com/{}.mp3", id)
}

fn resolved(id: &str) -> ResolvedTrack {
    ResolvedTrack {
        url: url(id),
        title: format!("Track {}", id),
        artists: vec!["Artist".to_string()],
        cover_uri: Some(format!("https://img.example.com/{}.jpg", id)),
        duration_ms: 180_000,
    }
}

fn track(id: &str) -> Track {
    Track::from_resolved(&TrackRef::new(SERVICE, id), resolved(id))
}

fn catalog() -> CatalogResolver {
    ["A", "B", "C", "D", "E"]
        .iter()
        .fold(CatalogResolver::new(), |catalog, id| {
            catalog.with_track(TrackRef::new(SERVICE, *id), resolved(id))
        })
}

fn create_player_with(
    transport: SimulatedTransport,
    store: Box<dyn PlayerStore>,
) -> PlayerController<SimulatedTransport> {
    PlayerController::new(
        transport,
        Arc::new(catalog()),
        store,
        PlayerConfig::default(),
    )
}

fn create_player(transport: SimulatedTransport) -> PlayerController<SimulatedTransport> {
    create_player_with(transport, Box::new(MemoryStore::new(50)))
}

fn current_id(player: &PlayerController<SimulatedTransport>) -> Option<String> {
    player
        .current_track()
        .map(|t| t.source_track_id.clone())
}

fn queue_ids(player: &PlayerController<SimulatedTransport>) -> Vec<String> {
    player
        .queue()
        .iter()
        .map(|t| t.source_track_id.clone())
        .collect()
}

/// Play A and queue the rest, events delivered
async fn start_session(ids: &[&str], transport: SimulatedTransport) -> PlayerController<SimulatedTransport> {
    let mut player = create_player(transport);
    player.play_track(SERVICE, ids[0]).await.unwrap();
    player.add_to_queue(ids[1..].iter().map(|id| track(id)));
    player.pump_transport_events().unwrap();
    player
}

// ===== play_track =====

#[tokio::test]
async fn test_play_track_on_empty_queue_starts_playback() {
    let mut player = create_player(SimulatedTransport::new());

    player.play_track(SERVICE, "A").await.unwrap();
    player.pump_transport_events().unwrap();

    assert_eq!(queue_ids(&player), vec!["A"]);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("A"));
    assert!(player.state().is_playing);
    assert_eq!(player.transport().source(), Some(url("A").as_str()));
}

#[tokio::test]
async fn test_play_track_appends_without_moving_index() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;

    player.play_track(SERVICE, "B").await.unwrap();

    assert_eq!(queue_ids(&player), vec!["A", "B"]);
    assert_eq!(player.current_index(), Some(0));
    // The new track is loaded even though the cursor did not move
    assert_eq!(current_id(&player).as_deref(), Some("B"));
}

#[tokio::test]
async fn test_play_track_does_not_duplicate_queued_track() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;

    player.play_track(SERVICE, "B").await.unwrap();
    player.play_track(SERVICE, "A").await.unwrap();

    assert_eq!(player.queue_len(), 2);
    assert_eq!(current_id(&player).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_play_track_without_auto_play_stays_paused() {
    let mut player = create_player(SimulatedTransport::new());

    player.play_track_with(SERVICE, "A", false).await.unwrap();
    player.pump_transport_events().unwrap();

    assert!(player.transport().has_source());
    assert!(player.transport().is_paused());
    assert!(!player.state().is_playing);
    assert_eq!(player.state().duration_ms, 180_000);
}

#[tokio::test]
async fn test_resolution_failure_leaves_state_unchanged() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;
    player.drain_events();
    let before = player.snapshot();

    let err = player.play_track(SERVICE, "missing").await.unwrap_err();

    assert!(matches!(
        err,
        PlayerError::Resolution(ResolutionError::NotFound(_))
    ));
    assert_eq!(player.snapshot(), before);
    assert_eq!(player.transport().load_log().len(), 1);

    let events = player.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlayerEvent::Notification { message } if message.contains("yandex_missing"))));
}

#[tokio::test]
async fn test_playback_failure_keeps_track_loaded_and_queued() {
    let transport = SimulatedTransport::new().with_broken_media(url("A"));
    let mut player = create_player(transport);

    let err = player.play_track(SERVICE, "A").await.unwrap_err();
    player.pump_transport_events().unwrap();

    assert!(matches!(err, PlayerError::Playback(_)));
    assert_eq!(queue_ids(&player), vec!["A"]);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("A"));
    assert!(!player.state().is_playing);
    assert!(player
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::Notification { .. })));
}

// ===== Concurrent Resolution =====

#[test]
fn test_newer_play_request_supersedes_older_one() {
    let mut player = create_player(SimulatedTransport::new());

    let first = player.begin_resolution(SERVICE, "A");
    let second = player.begin_resolution(SERVICE, "B");

    player
        .complete_resolution(second, Ok(resolved("B")), true)
        .unwrap();
    player.drain_events();

    // The older request resolves late and must not touch anything
    let err = player
        .complete_resolution(first, Ok(resolved("A")), true)
        .unwrap_err();

    assert!(matches!(err, PlayerError::Superseded));
    assert_eq!(queue_ids(&player), vec!["B"]);
    assert_eq!(current_id(&player).as_deref(), Some("B"));
    assert_eq!(player.transport().load_log(), &[url("B")]);
    assert!(!player.has_pending_events());
}

#[test]
fn test_superseded_failure_is_not_reported() {
    let mut player = create_player(SimulatedTransport::new());

    let first = player.begin_resolution(SERVICE, "A");
    let _second = player.begin_resolution(SERVICE, "B");

    let err = player
        .complete_resolution(first, Err(ResolutionError::Unavailable("timeout".into())), true)
        .unwrap_err();

    assert!(matches!(err, PlayerError::Superseded));
    assert!(!player.has_pending_events());
}

#[test]
fn test_blank_url_is_rejected() {
    let mut player = create_player(SimulatedTransport::new());
    let ticket = player.begin_resolution(SERVICE, "A");

    let mut blank = resolved("A");
    blank.url = String::new();
    let err = player.complete_resolution(ticket, Ok(blank), true).unwrap_err();

    assert!(matches!(
        err,
        PlayerError::Resolution(ResolutionError::NoPlayableUrl)
    ));
    assert_eq!(player.queue_len(), 0);
    assert!(!player.transport().has_source());
}

// ===== next_track / prev_track =====

#[tokio::test]
async fn test_next_track_wraps_with_repeat_all() {
    let mut player = start_session(&["A", "B", "C"], SimulatedTransport::new()).await;
    player.skip_to(1).unwrap();
    player.set_repeat(RepeatMode::All);

    player.next_track().unwrap();
    assert_eq!(player.current_index(), Some(2));
    assert_eq!(current_id(&player).as_deref(), Some("C"));

    player.next_track().unwrap();
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_next_track_stops_at_end_without_repeat() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;

    player.next_track().unwrap();
    player.pump_transport_events().unwrap();
    assert_eq!(player.current_index(), Some(1));
    assert_eq!(current_id(&player).as_deref(), Some("B"));
    assert!(player.state().is_playing);

    player.next_track().unwrap();
    player.pump_transport_events().unwrap();
    assert_eq!(player.current_index(), Some(1));
    assert!(player.transport().is_paused());
    assert!(!player.state().is_playing);
    assert_eq!(player.transport().load_log(), &[url("A"), url("B")]);
}

#[tokio::test]
async fn test_next_track_on_empty_queue_is_noop() {
    let mut player = create_player(SimulatedTransport::new());
    player.next_track().unwrap();
    player.prev_track().unwrap();

    assert_eq!(player.current_index(), None);
    assert!(player.transport().load_log().is_empty());
}

#[tokio::test]
async fn test_next_track_without_selection_starts_at_first() {
    let mut player = create_player(SimulatedTransport::new());
    player.add_to_queue([track("A"), track("B")]);
    assert_eq!(player.current_index(), None);

    player.next_track().unwrap();

    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_prev_track_without_selection_clamps_to_first() {
    let mut player = create_player(SimulatedTransport::new());
    player.add_to_queue([track("A"), track("B")]);

    player.prev_track().unwrap();

    assert_eq!(player.current_index(), Some(0));
    assert!(player.current_track().is_none());
    assert!(player.transport().load_log().is_empty());
}

#[tokio::test]
async fn test_prev_track_without_selection_wraps_with_repeat_all() {
    let mut player = create_player(SimulatedTransport::new());
    player.add_to_queue([track("A"), track("B")]);
    player.set_repeat(RepeatMode::All);

    player.prev_track().unwrap();

    assert_eq!(player.current_index(), Some(1));
    assert_eq!(current_id(&player).as_deref(), Some("B"));
}

#[tokio::test]
async fn test_prev_track_restarts_after_threshold() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;
    player.drive_transport(|t| t.advance(10_000)).unwrap();
    assert_eq!(player.state().position_ms, 10_000);

    player.prev_track().unwrap();
    player.pump_transport_events().unwrap();

    assert_eq!(current_id(&player).as_deref(), Some("A"));
    assert_eq!(player.state().position_ms, 0);
    assert_eq!(player.transport().position_ms(), 0);
    assert_eq!(player.transport().load_log().len(), 1);
    assert!(player.state().is_playing);
}

#[tokio::test]
async fn test_prev_track_goes_back_within_threshold() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;
    player.next_track().unwrap();
    player.drive_transport(|t| t.advance(2_000)).unwrap();

    player.prev_track().unwrap();

    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_prev_track_clamps_on_single_track_queue() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;

    player.prev_track().unwrap();

    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.transport().load_log().len(), 1);
}

#[tokio::test]
async fn test_prev_track_wraps_with_repeat_all() {
    let mut player = start_session(&["A", "B", "C"], SimulatedTransport::new()).await;
    player.set_repeat(RepeatMode::All);

    player.prev_track().unwrap();

    assert_eq!(player.current_index(), Some(2));
    assert_eq!(current_id(&player).as_deref(), Some("C"));
}

#[tokio::test]
async fn test_skip_to_out_of_bounds() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;

    let err = player.skip_to(5).unwrap_err();

    assert!(matches!(err, PlayerError::IndexOutOfBounds(5)));
    assert_eq!(player.current_index(), Some(0));
}

// ===== Track End Policy =====

#[tokio::test]
async fn test_repeat_one_replays_same_track() {
    let transport = SimulatedTransport::new().with_duration(url("A"), 1_000);
    let mut player = start_session(&["A", "B"], transport).await;
    player.set_repeat(RepeatMode::One);

    player.drive_transport(|t| t.advance(1_000)).unwrap();

    assert_eq!(current_id(&player).as_deref(), Some("A"));
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.state().position_ms, 0);
    assert!(player.state().is_playing);
    assert_eq!(player.transport().load_log().len(), 1);
}

#[tokio::test]
async fn test_track_end_advances_then_stops_without_repeat() {
    let transport = SimulatedTransport::new().with_default_duration(1_000);
    let mut player = start_session(&["A", "B"], transport).await;

    player.drive_transport(|t| t.advance(1_000)).unwrap();
    assert_eq!(current_id(&player).as_deref(), Some("B"));
    assert!(player.state().is_playing);

    player.drive_transport(|t| t.advance(1_000)).unwrap();
    assert_eq!(current_id(&player).as_deref(), Some("B"));
    assert_eq!(player.current_index(), Some(1));
    assert!(!player.state().is_playing);
    assert_eq!(player.transport().load_log().len(), 2);
}

#[tokio::test]
async fn test_track_end_wraps_with_repeat_all() {
    let transport = SimulatedTransport::new().with_default_duration(1_000);
    let mut player = start_session(&["A", "B"], transport).await;
    player.skip_to(1).unwrap();
    player.set_repeat(RepeatMode::All);

    player.drive_transport(|t| t.advance(1_000)).unwrap();

    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("A"));
    assert_eq!(player.transport().load_log(), &[url("A"), url("B"), url("A")]);
}

#[tokio::test]
async fn test_track_finished_event_emitted() {
    let transport = SimulatedTransport::new().with_default_duration(500);
    let mut player = start_session(&["A"], transport).await;
    player.drain_events();

    player.drive_transport(|t| t.advance(500)).unwrap();

    let events = player.drain_events();
    assert!(events.contains(&PlayerEvent::TrackFinished {
        track_id: TrackId::new(SERVICE, "A")
    }));
}

#[tokio::test]
async fn test_transport_error_is_reported() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;
    player.drain_events();

    player.drive_transport(|t| t.fail("network error")).unwrap();

    assert!(!player.state().is_playing);
    assert_eq!(player.queue_len(), 1);
    let events = player.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlayerEvent::Notification { message } if message.contains("network error"))));
}

// ===== Toggle Play =====

#[tokio::test]
async fn test_toggle_play_pauses_and_resumes() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;
    assert!(player.state().is_playing);

    player.toggle_play().unwrap();
    player.pump_transport_events().unwrap();
    assert!(!player.state().is_playing);

    player.toggle_play().unwrap();
    player.pump_transport_events().unwrap();
    assert!(player.state().is_playing);
}

// ===== Seek =====

#[tokio::test]
async fn test_seek_clamps_to_duration() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;

    player.seek_to(999_999);
    assert_eq!(player.state().position_ms, 180_000);
    assert_eq!(player.transport().position_ms(), 180_000);

    player.seek_to(42_000);
    assert_eq!(player.state().position_ms, 42_000);
}

#[tokio::test]
async fn test_seek_to_percent() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;

    player.seek_to_percent(0.5);
    assert_eq!(player.state().position_ms, 90_000);

    player.seek_to_percent(7.0);
    assert_eq!(player.state().position_ms, 180_000);

    player.seek_to_percent(f32::NAN);
    assert_eq!(player.state().position_ms, 0);
}

#[test]
fn test_seek_without_track_is_noop() {
    let mut player = create_player(SimulatedTransport::new());
    player.seek_to(5_000);
    assert_eq!(player.state().position_ms, 0);
    assert!(!player.has_pending_events());
}

// ===== Volume =====

#[test]
fn test_set_volume_clamps() {
    let mut player = create_player(SimulatedTransport::new());

    assert_eq!(player.set_volume(-0.5), 0.0);
    assert_eq!(player.state().volume, 0.0);

    assert_eq!(player.set_volume(1.7), 1.0);
    assert_eq!(player.transport().volume(), 1.0);

    assert_eq!(player.set_volume(0.35), 0.35);
}

#[test]
fn test_volume_preference_persists_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("player.json");

    {
        let store = JsonFileStore::open(&path, 50).unwrap();
        let mut player = create_player_with(SimulatedTransport::new(), Box::new(store));
        player.set_volume(0.3);
        player.dispose();
    }

    let store = JsonFileStore::open(&path, 50).unwrap();
    let player = create_player_with(SimulatedTransport::new(), Box::new(store));
    assert_eq!(player.state().volume, 0.3);
}

#[test]
fn test_mute_does_not_touch_volume() {
    let mut player = create_player(SimulatedTransport::new());
    player.set_volume(0.6);

    assert!(player.toggle_mute());
    assert!(player.state().muted);
    assert_eq!(player.state().volume, 0.6);
    assert_eq!(player.transport().volume(), 0.6);

    player.set_volume(0.2);
    assert!(player.state().muted);
}

// ===== Shuffle & Repeat =====

#[tokio::test]
async fn test_shuffle_pins_current_track() {
    let mut player = start_session(&["A", "B", "C", "D", "E"], SimulatedTransport::new()).await;
    player.skip_to(2).unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    assert!(player.toggle_shuffle_with(&mut rng));

    let ids = queue_ids(&player);
    assert_eq!(ids[0], "C");
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("C"));

    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn test_disabling_shuffle_keeps_order() {
    let mut player = start_session(&["A", "B", "C", "D", "E"], SimulatedTransport::new()).await;
    let mut rng = StdRng::seed_from_u64(99);

    player.toggle_shuffle_with(&mut rng);
    let shuffled = queue_ids(&player);

    assert!(!player.toggle_shuffle_with(&mut rng));
    assert_eq!(queue_ids(&player), shuffled);
    assert!(!player.state().shuffled);
}

#[test]
fn test_shuffle_single_track_queue() {
    let mut player = create_player(SimulatedTransport::new());
    player.add_to_queue([track("A")]);

    assert!(player.toggle_shuffle());
    assert_eq!(queue_ids(&player), vec!["A"]);
    assert_eq!(player.current_index(), None);
}

#[test]
fn test_toggle_repeat_cycles() {
    let mut player = create_player(SimulatedTransport::new());

    assert_eq!(player.toggle_repeat(), RepeatMode::One);
    assert_eq!(player.toggle_repeat(), RepeatMode::All);
    assert_eq!(player.toggle_repeat(), RepeatMode::None);
}

// ===== Queue Management =====

#[tokio::test]
async fn test_add_to_queue_leaves_playback_alone() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;

    let added = player.add_to_queue([track("B"), track("A"), track("C"), track("B")]);

    assert_eq!(added, 2);
    assert_eq!(queue_ids(&player), vec!["A", "B", "C"]);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.transport().load_log().len(), 1);
}

#[tokio::test]
async fn test_enqueue_resolved_skips_failures() {
    let mut player = create_player(SimulatedTransport::new());
    let refs = [
        TrackRef::new(SERVICE, "B"),
        TrackRef::new(SERVICE, "missing"),
        TrackRef::new(SERVICE, "C"),
    ];

    let added = player.enqueue_resolved(&refs).await;

    assert_eq!(added, 2);
    assert_eq!(queue_ids(&player), vec!["B", "C"]);
    assert_eq!(player.current_index(), None);
    assert!(!player.transport().has_source());
    let notifications = player
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlayerEvent::Notification { .. }))
        .count();
    assert_eq!(notifications, 1);
}

#[tokio::test]
async fn test_clear_queue_stops_transport() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;

    player.clear_queue();
    player.pump_transport_events().unwrap();

    assert_eq!(player.queue_len(), 0);
    assert_eq!(player.current_index(), None);
    assert!(player.current_track().is_none());
    assert!(!player.transport().has_source());
    assert!(!player.state().is_playing);
}

#[tokio::test]
async fn test_remove_last_track_clears_transport() {
    let mut player = start_session(&["A"], SimulatedTransport::new()).await;

    let removed = player.remove_from_queue(0).unwrap();

    assert_eq!(removed.source_track_id, "A");
    assert_eq!(player.queue_len(), 0);
    assert_eq!(player.current_index(), None);
    assert!(!player.transport().has_source());
}

#[tokio::test]
async fn test_remove_before_cursor_keeps_current_track_selected() {
    let mut player = start_session(&["A", "B", "C"], SimulatedTransport::new()).await;
    player.skip_to(2).unwrap();

    player.remove_from_queue(0).unwrap();

    assert_eq!(player.current_index(), Some(1));
    assert_eq!(queue_ids(&player)[1], "C");
    assert!(matches!(
        player.remove_from_queue(9),
        Err(PlayerError::IndexOutOfBounds(9))
    ));
}

#[tokio::test]
async fn test_remove_loaded_track_loads_next_and_keeps_playing() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;
    player.skip_to(0).unwrap();
    player.pump_transport_events().unwrap();

    let removed = player.remove_from_queue(0).unwrap();
    player.pump_transport_events().unwrap();

    assert_eq!(removed.source_track_id, "A");
    assert_eq!(queue_ids(&player), vec!["B"]);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("B"));
    assert_eq!(player.transport().source(), Some(url("B").as_str()));
    assert!(player.state().is_playing);
}

#[tokio::test]
async fn test_remove_loaded_track_while_paused_stays_paused() {
    let mut player = start_session(&["A", "B", "C"], SimulatedTransport::new()).await;
    player.toggle_play().unwrap();
    player.pump_transport_events().unwrap();

    player.remove_from_queue(0).unwrap();
    player.pump_transport_events().unwrap();

    assert_eq!(current_id(&player).as_deref(), Some("B"));
    assert_eq!(player.transport().source(), Some(url("B").as_str()));
    assert!(player.transport().is_paused());
    assert!(!player.state().is_playing);
}

#[tokio::test]
async fn test_remove_other_track_does_not_reload() {
    let mut player = start_session(&["A", "B", "C"], SimulatedTransport::new()).await;
    let loads = player.transport().load_log().len();

    player.remove_from_queue(2).unwrap();

    assert_eq!(current_id(&player).as_deref(), Some("A"));
    assert_eq!(player.transport().load_log().len(), loads);
}

#[tokio::test]
async fn test_queue_snapshot_is_a_copy() {
    let mut player = start_session(&["A", "B"], SimulatedTransport::new()).await;

    let mut copy = player.queue();
    copy.clear();

    assert_eq!(player.queue_len(), 2);
}

// ===== History =====

#[tokio::test]
async fn test_history_deduplicates_replays() {
    let mut player = create_player(SimulatedTransport::new());

    player.play_track(SERVICE, "A").await.unwrap();
    player.play_track(SERVICE, "B").await.unwrap();
    player.play_track(SERVICE, "A").await.unwrap();

    let history = player.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].track_id, TrackId::new(SERVICE, "A"));
    assert_eq!(history[1].track_id, TrackId::new(SERVICE, "B"));
}

#[tokio::test]
async fn test_history_records_navigation() {
    let mut player = start_session(&["A", "B", "C"], SimulatedTransport::new()).await;

    player.next_track().unwrap();
    player.next_track().unwrap();

    let ids: Vec<String> = player
        .history()
        .iter()
        .map(|e| e.track_id.to_string())
        .collect();
    assert_eq!(ids, vec!["yandex_C", "yandex_B", "yandex_A"]);
}

// ===== Events & Lifecycle =====

#[tokio::test]
async fn test_events_describe_track_change() {
    let mut player = create_player(SimulatedTransport::new());

    player.play_track(SERVICE, "A").await.unwrap();
    player.pump_transport_events().unwrap();
    let events = player.drain_events();

    assert!(events.contains(&PlayerEvent::QueueChanged {
        length: 1,
        current_index: Some(0),
    }));
    assert!(events.contains(&PlayerEvent::TrackChanged {
        track_id: TrackId::new(SERVICE, "A"),
        previous_track_id: None,
    }));
    assert!(events.contains(&PlayerEvent::DurationChanged {
        duration_ms: 180_000
    }));
    assert!(events.contains(&PlayerEvent::StateChanged { is_playing: true }));
    assert!(!player.has_pending_events());
}

#[tokio::test]
async fn test_dispose_stops_playback() {
    let player = start_session(&["A"], SimulatedTransport::new()).await;

    let transport = player.dispose();

    assert!(!transport.has_source());
    assert!(transport.is_paused());
}
