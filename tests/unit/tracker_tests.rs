/*!
 * Tests for the speaker tracker and its monitor tasks
 *
 * Monitors poll in real time, so these tests shorten the interval to
 * 10ms and sleep generously between phases.
 */

use std::sync::Arc;
use std::time::Duration;

use vocasub::app_config::{CaptionStyle, MonitorConfig};
use vocasub::correlator::{SubtitleKind, VoiceTextCorrelator};
use vocasub::reload::SharedState;
use vocasub::tracker::sinks::{FadeDirection, PlaybackStatus};
use vocasub::tracker::{SessionState, SpeakerTracker};

use crate::common;
use crate::common::mock_hosts::{ControlledPlayback, RecordingSink};

fn make_tracker(
    sink: Arc<RecordingSink>,
    playback: Arc<ControlledPlayback>,
    correlator: VoiceTextCorrelator,
) -> SpeakerTracker {
    common::init_logging();
    let monitor = MonitorConfig {
        poll_interval_ms: 10,
        missing_handle_tolerance: 3,
    };
    SpeakerTracker::new(
        SharedState::empty(),
        correlator,
        sink,
        playback,
        monitor,
        CaptionStyle::default(),
    )
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

/// Test the full display cycle: show once text arrives, fade out and
/// hide when playback completes
#[tokio::test]
async fn test_monitor_with_extracted_text_should_display_then_hide() {
    let sink = RecordingSink::new();
    let playback = ControlledPlayback::new(PlaybackStatus::Playing);
    let tracker = make_tracker(sink.clone(), playback.clone(), VoiceTextCorrelator::new());

    tracker.on_voice_start("maid1", "V1", SubtitleKind::Adv);
    tracker.on_text_extracted("Welcome back.", "adv");
    settle().await;

    assert_eq!(sink.displayed_texts(), vec!["Welcome back.".to_string()]);
    assert_eq!(tracker.session_state("maid1"), SessionState::Speaking);

    playback.set(PlaybackStatus::Completed);
    settle().await;

    assert!(sink.faded("maid1", FadeDirection::Out));
    assert!(sink.hidden("maid1"));
    assert_eq!(tracker.session_state("maid1"), SessionState::Idle);
    assert_eq!(tracker.active_monitor_count(), 0);
}

/// Test that a second voice-start replaces the first session's monitor
#[tokio::test]
async fn test_on_voice_start_with_existing_session_should_replace_monitor() {
    let sink = RecordingSink::new();
    let playback = ControlledPlayback::new(PlaybackStatus::Playing);
    let tracker = make_tracker(sink.clone(), playback.clone(), VoiceTextCorrelator::new());

    tracker.on_voice_start("maid1", "V1", SubtitleKind::Base);
    tokio::time::sleep(Duration::from_millis(30)).await;
    tracker.on_voice_start("maid1", "V2", SubtitleKind::Base);
    settle().await;

    assert_eq!(tracker.current_voice("maid1"), Some("V2".to_string()));
    assert_eq!(tracker.active_monitor_count(), 1);
    assert_eq!(tracker.session_count(), 1);

    tracker.on_voice_end("maid1").await;
}

/// Test that a monitor superseded during its fade-out never hides the
/// replacement session's caption
#[tokio::test]
async fn test_on_voice_start_during_fade_should_not_hide_new_caption() {
    let sink = RecordingSink::with_fade_delay(150);
    let playback = ControlledPlayback::new(PlaybackStatus::Playing);
    let tracker = make_tracker(sink.clone(), playback.clone(), VoiceTextCorrelator::new());

    tracker.on_voice_start("maid1", "V1", SubtitleKind::Base);
    tracker.on_text_extracted("first line", "base");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.displayed_texts(), vec!["first line".to_string()]);

    // End V1 and replace it while its fade-out is still running
    playback.set(PlaybackStatus::Completed);
    tokio::time::sleep(Duration::from_millis(30)).await;
    playback.set(PlaybackStatus::Playing);
    tracker.on_voice_start("maid1", "V2", SubtitleKind::Base);
    tracker.on_text_extracted("second line", "base");
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(
        sink.displayed_texts(),
        vec!["first line".to_string(), "second line".to_string()]
    );
    assert!(!sink.hidden("maid1"));
    assert_eq!(tracker.session_state("maid1"), SessionState::Speaking);
    assert_eq!(tracker.current_voice("maid1"), Some("V2".to_string()));

    tracker.on_voice_end("maid1").await;
}

/// Test that a persistently missing playback handle ends the session
/// once the tolerance is exhausted
#[tokio::test]
async fn test_monitor_with_persistent_missing_handle_should_give_up() {
    let sink = RecordingSink::new();
    let playback = ControlledPlayback::new(PlaybackStatus::Missing);
    let tracker = make_tracker(sink.clone(), playback.clone(), VoiceTextCorrelator::new());

    tracker.on_voice_start("maid1", "V1", SubtitleKind::Base);
    settle().await;

    // Tolerance exhausted without a handle: treated as ended
    assert!(sink.hidden("maid1"));
    assert!(sink.displayed_texts().is_empty());
    assert_eq!(tracker.session_state("maid1"), SessionState::Idle);
    assert_eq!(tracker.active_monitor_count(), 0);
}

/// Test that voice-end tears the session down and hides immediately
#[tokio::test]
async fn test_on_voice_end_should_remove_session_and_hide() {
    let sink = RecordingSink::new();
    let playback = ControlledPlayback::new(PlaybackStatus::Playing);
    let tracker = make_tracker(sink.clone(), playback.clone(), VoiceTextCorrelator::new());

    tracker.on_voice_start("maid1", "V1", SubtitleKind::Base);
    tokio::time::sleep(Duration::from_millis(30)).await;
    tracker.on_voice_end("maid1").await;
    settle().await;

    assert!(sink.hidden("maid1"));
    assert_eq!(tracker.session_count(), 0);
    assert_eq!(tracker.current_voice("maid1"), None);
    assert_eq!(tracker.active_monitor_count(), 0);
}

/// Test that extracted text lands in the correlator only while the
/// last-started session is speaking
#[test]
fn test_on_text_extracted_without_active_speaker_should_drop() {
    tokio_test::block_on(async {
        let sink = RecordingSink::new();
        let playback = ControlledPlayback::new(PlaybackStatus::Playing);
        let correlator = VoiceTextCorrelator::new();
        let tracker = make_tracker(sink.clone(), playback.clone(), correlator.clone());

        tracker.on_text_extracted("Orphan line", "adv");
        assert!(correlator.is_empty());

        tracker.on_voice_start("maid1", "V1", SubtitleKind::Adv);
        tracker.on_text_extracted("Attached line", "adv");

        let recorded = correlator.resolve("V1").expect("text should be recorded");
        assert_eq!(recorded.text, "Attached line");
        assert_eq!(recorded.kind, SubtitleKind::Adv);

        tracker.on_voice_end("maid1").await;
    });
}

/// Test that unload cancels everything and clears correlations
#[tokio::test]
async fn test_unload_should_clear_sessions_and_correlations() {
    let sink = RecordingSink::new();
    let playback = ControlledPlayback::new(PlaybackStatus::Playing);
    let correlator = VoiceTextCorrelator::new();
    let tracker = make_tracker(sink.clone(), playback.clone(), correlator.clone());

    tracker.on_voice_start("maid1", "V1", SubtitleKind::Base);
    tracker.on_text_extracted("Line one", "base");
    tracker.on_voice_start("maid2", "V2", SubtitleKind::Yotogi);
    tokio::time::sleep(Duration::from_millis(30)).await;

    tracker.unload().await;
    settle().await;

    assert_eq!(tracker.session_count(), 0);
    assert_eq!(tracker.active_monitor_count(), 0);
    assert!(sink.hidden("maid1"));
    assert!(sink.hidden("maid2"));
    assert!(correlator.is_empty());
}
