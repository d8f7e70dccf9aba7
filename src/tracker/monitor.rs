/*!
 * Per-speaker voice playback monitor.
 *
 * One monitor task exists per speaking session. It polls the speaker's
 * audio handle at a fixed short interval, resolves caption text as soon
 * as it becomes available (correlated text first, then a direct
 * dictionary lookup of the voice id), shows it once, and drives the
 * fade-out/hide sequence when playback ends. Cancellation is cooperative:
 * a flag checked every tick, idempotent to set, and a cancelled monitor
 * never touches the renderer again.
 */

use anyhow::Result;
use log::{debug, error};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::app_config::{CaptionStyle, MonitorConfig};
use crate::correlator::{SubtitleKind, VoiceTextCorrelator};
use crate::reload::SharedState;

use super::sinks::{FadeDirection, PlaybackStatus, SubtitleSink, VoicePlayback};
use super::{SessionState, SpeakerSession};

/// Handle to a running monitor task
pub struct MonitorHandle {
    cancelled: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Request cooperative cancellation. Safe to call any number of
    /// times, including after the monitor already finished.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the monitor task has terminated
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the monitor task to terminate
    pub async fn wait(self) {
        let _ = self.join.await;
    }
}

/// Everything a monitor task needs, captured at spawn time
pub(crate) struct MonitorContext {
    pub speaker_id: String,
    pub voice_id: String,
    pub kind: SubtitleKind,
    pub state: Arc<RwLock<SessionState>>,
    pub sessions: Arc<Mutex<HashMap<String, SpeakerSession>>>,
    pub correlator: VoiceTextCorrelator,
    pub shared: SharedState,
    pub sink: Arc<dyn SubtitleSink>,
    pub playback: Arc<dyn VoicePlayback>,
    pub config: MonitorConfig,
    pub style: CaptionStyle,
}

/// Spawn the monitor task for a session and hand back its handle
pub(crate) fn spawn(ctx: MonitorContext) -> MonitorHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();

    let join = tokio::spawn(async move {
        if let Err(e) = run(&ctx, &flag).await {
            // A fault inside one monitor must not take down the tracker
            // or any other speaker's session
            error!("Monitor for speaker {} failed: {:#}", ctx.speaker_id, e);
        }

        *ctx.state.write() = SessionState::Idle;

        // Clear our own handle from the session, but only if the session
        // still belongs to this monitor; a newer voice-start may already
        // have replaced it
        let mut sessions = ctx.sessions.lock();
        if let Some(session) = sessions.get_mut(&ctx.speaker_id) {
            if Arc::ptr_eq(&session.state, &ctx.state) {
                session.monitor = None;
            }
        }
    });

    MonitorHandle { cancelled, join }
}

async fn run(ctx: &MonitorContext, cancelled: &AtomicBool) -> Result<()> {
    let interval = Duration::from_millis(ctx.config.poll_interval_ms);
    let mut shown = false;
    let mut missing_polls: u32 = 0;

    debug!(
        "Monitor started for speaker {} voice {} ({})",
        ctx.speaker_id, ctx.voice_id, ctx.kind
    );

    loop {
        if cancelled.load(Ordering::Relaxed) {
            debug!("Monitor for speaker {} cancelled", ctx.speaker_id);
            return Ok(());
        }

        if !shown {
            if let Some(text) = resolve_display_text(ctx) {
                // Re-check after the (possibly slow) lookup so a cancelled
                // monitor never draws over a newer session's caption
                if cancelled.load(Ordering::Relaxed) {
                    return Ok(());
                }
                debug!(
                    "Showing caption for speaker {} voice {}: {}",
                    ctx.speaker_id, ctx.voice_id, text
                );
                ctx.sink.display(&ctx.speaker_id, &text, &ctx.style).await;
                shown = true;
                // Cancellation during the display await means teardown or
                // replacement happened; stop before touching playback state
                if cancelled.load(Ordering::Relaxed) {
                    return Ok(());
                }
            }
        }

        match ctx.playback.status(&ctx.speaker_id) {
            PlaybackStatus::Playing => missing_polls = 0,
            PlaybackStatus::Completed => {
                debug!(
                    "Voice {} completed for speaker {}",
                    ctx.voice_id, ctx.speaker_id
                );
                break;
            }
            PlaybackStatus::Missing => {
                // Tolerated briefly: the handle is not attached yet right
                // after voice-start
                missing_polls += 1;
                if missing_polls >= ctx.config.missing_handle_tolerance {
                    debug!(
                        "No playback handle for speaker {} after {} polls, treating voice as ended",
                        ctx.speaker_id, missing_polls
                    );
                    break;
                }
            }
        }

        tokio::time::sleep(interval).await;
    }

    if cancelled.load(Ordering::Relaxed) {
        return Ok(());
    }

    *ctx.state.write() = SessionState::FadingOut;
    if shown {
        ctx.sink
            .fade(&ctx.speaker_id, FadeDirection::Out, ctx.style.fade_out_secs)
            .await;
        // The fade await lasts the full fade duration; a voice-start
        // arriving meanwhile cancelled this monitor and the caption
        // belongs to its session now
        if cancelled.load(Ordering::Relaxed) {
            return Ok(());
        }
    }
    ctx.sink.hide(&ctx.speaker_id).await;

    debug!("Monitor ended for speaker {}", ctx.speaker_id);
    Ok(())
}

/// Resolve the caption to display for the monitored voice.
///
/// Text captured by the host's extraction hook takes precedence; it still
/// gets one pass through the dictionary in case the capture was raw
/// source text. Failing that, the voice id itself is looked up directly,
/// and a hit is recorded back into the correlator so later queries for
/// this clip are cheap.
fn resolve_display_text(ctx: &MonitorContext) -> Option<String> {
    if let Some(correlated) = ctx.correlator.resolve(&ctx.voice_id) {
        let (text, _) = ctx.shared.snapshot().lookup(&correlated.text);
        return Some(text);
    }

    if let Some(text) = ctx.shared.snapshot().resolve(&ctx.voice_id) {
        ctx.correlator.record(&ctx.voice_id, &text, ctx.kind);
        return Some(text);
    }

    None
}
