/*!
 * Speaker session tracker: the subtitle state machine.
 *
 * One session exists per speaker identity, created on the first
 * voice-start event for that speaker and driven by subsequent events.
 * States move Idle -> Speaking -> FadingOut -> Idle. At most one monitor
 * task is ever live per speaker: a voice-start arriving while a monitor
 * is still running cancels it and starts a fresh one, so the newest voice
 * always wins and no stale monitor can overwrite a newer session's
 * caption.
 *
 * All event entry points are called from the host's single cooperative
 * context (its per-frame callback); the session registry lock exists for
 * the monitor tasks, which finish by clearing their own handle.
 */

pub mod monitor;
pub mod sinks;

use log::debug;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::app_config::{CaptionStyle, MonitorConfig};
use crate::correlator::{SubtitleKind, VoiceTextCorrelator};
use crate::reload::SharedState;

use monitor::{MonitorContext, MonitorHandle};
use sinks::{SubtitleSink, VoicePlayback};

/// Subtitle lifecycle state of one speaker session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No voice is being tracked; initial and terminal state
    #[default]
    Idle,
    /// A voice is playing and its monitor is live
    Speaking,
    /// Playback ended; the caption is fading out
    FadingOut,
}

/// Tracking state for one speaker
pub struct SpeakerSession {
    /// Voice clip currently tracked for this speaker
    pub voice_id: String,
    /// Subsystem that started the voice
    pub kind: SubtitleKind,
    /// Shared lifecycle state, written by the session's monitor
    state: Arc<RwLock<SessionState>>,
    /// Live monitor handle; None once the monitor terminated
    monitor: Option<MonitorHandle>,
}

/// Per-speaker session registry and event entry points
pub struct SpeakerTracker {
    sessions: Arc<Mutex<HashMap<String, SpeakerSession>>>,
    /// Speaker whose session started most recently; text-extraction
    /// events without an explicit voice id attach to it
    last_speaker: Mutex<Option<String>>,
    correlator: VoiceTextCorrelator,
    shared: SharedState,
    sink: Arc<dyn SubtitleSink>,
    playback: Arc<dyn VoicePlayback>,
    monitor_config: MonitorConfig,
    style: CaptionStyle,
}

impl SpeakerTracker {
    /// Create a tracker wired to the given collaborators
    pub fn new(
        shared: SharedState,
        correlator: VoiceTextCorrelator,
        sink: Arc<dyn SubtitleSink>,
        playback: Arc<dyn VoicePlayback>,
        monitor_config: MonitorConfig,
        style: CaptionStyle,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            last_speaker: Mutex::new(None),
            correlator,
            shared,
            sink,
            playback,
            monitor_config,
            style,
        }
    }

    /// Handle a voice-start event: create or replace the speaker's
    /// session and start its monitor. An existing monitor for the same
    /// speaker is cancelled first; replacement, never queuing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_voice_start(&self, speaker_id: &str, voice_id: &str, kind: SubtitleKind) {
        if speaker_id.is_empty() || voice_id.is_empty() {
            return;
        }

        let mut sessions = self.sessions.lock();

        if let Some(existing) = sessions.get_mut(speaker_id) {
            if let Some(old_monitor) = existing.monitor.take() {
                debug!(
                    "Replacing monitor for speaker {} (voice {} -> {})",
                    speaker_id, existing.voice_id, voice_id
                );
                old_monitor.cancel();
            }
            *existing.state.write() = SessionState::Idle;
        }

        let state = Arc::new(RwLock::new(SessionState::Speaking));
        let handle = monitor::spawn(MonitorContext {
            speaker_id: speaker_id.to_string(),
            voice_id: voice_id.to_string(),
            kind,
            state: state.clone(),
            sessions: self.sessions.clone(),
            correlator: self.correlator.clone(),
            shared: self.shared.clone(),
            sink: self.sink.clone(),
            playback: self.playback.clone(),
            config: self.monitor_config.clone(),
            style: self.style.clone(),
        });

        sessions.insert(
            speaker_id.to_string(),
            SpeakerSession {
                voice_id: voice_id.to_string(),
                kind,
                state,
                monitor: Some(handle),
            },
        );
        drop(sessions);

        *self.last_speaker.lock() = Some(speaker_id.to_string());
        debug!(
            "Session started for speaker {} voice {} ({})",
            speaker_id, voice_id, kind
        );
    }

    /// Handle a text-extraction event: record the caption against the
    /// voice id of the most recently started session. Only meaningful
    /// while that session is Speaking; drives no state transitions
    /// itself. The context label identifies the host hook for the debug
    /// log only.
    pub fn on_text_extracted(&self, text: &str, context_label: &str) {
        if text.is_empty() {
            return;
        }

        let speaker = self.last_speaker.lock().clone();
        let Some(speaker) = speaker else {
            debug!("Text extracted via {} with no active speaker, dropped", context_label);
            return;
        };

        let sessions = self.sessions.lock();
        let Some(session) = sessions.get(&speaker) else {
            return;
        };
        if *session.state.read() != SessionState::Speaking {
            debug!(
                "Text extracted via {} while speaker {} is not speaking, dropped",
                context_label, speaker
            );
            return;
        }

        debug!(
            "Text extracted via {}: voice {} -> {}",
            context_label, session.voice_id, text
        );
        self.correlator.record(&session.voice_id, text, session.kind);
    }

    /// Handle a voice-end event: cancel the monitor immediately, force
    /// the session to Idle and hide the caption
    pub async fn on_voice_end(&self, speaker_id: &str) {
        let removed = self.sessions.lock().remove(speaker_id);

        let Some(session) = removed else {
            return;
        };

        if let Some(monitor) = session.monitor {
            monitor.cancel();
        }
        *session.state.write() = SessionState::Idle;

        let mut last = self.last_speaker.lock();
        if last.as_deref() == Some(speaker_id) {
            *last = None;
        }
        drop(last);

        self.sink.hide(speaker_id).await;
        debug!("Session ended for speaker {}", speaker_id);
    }

    /// Cancel every monitor, hide every caption and clear all tracking
    /// state. Voice-text correlations are process-scoped and cleared
    /// here too.
    pub async fn unload(&self) {
        let drained: Vec<(String, SpeakerSession)> =
            self.sessions.lock().drain().collect();

        for (speaker_id, session) in drained {
            if let Some(monitor) = session.monitor {
                monitor.cancel();
            }
            *session.state.write() = SessionState::Idle;
            self.sink.hide(&speaker_id).await;
        }

        *self.last_speaker.lock() = None;
        self.correlator.clear();
        debug!("Speaker tracker unloaded");
    }

    /// Current state of a speaker's session; Idle when no session exists
    pub fn session_state(&self, speaker_id: &str) -> SessionState {
        self.sessions
            .lock()
            .get(speaker_id)
            .map(|s| *s.state.read())
            .unwrap_or(SessionState::Idle)
    }

    /// Voice id currently tracked for a speaker
    pub fn current_voice(&self, speaker_id: &str) -> Option<String> {
        self.sessions
            .lock()
            .get(speaker_id)
            .map(|s| s.voice_id.clone())
    }

    /// Number of sessions whose monitor task is still live
    pub fn active_monitor_count(&self) -> usize {
        self.sessions
            .lock()
            .values()
            .filter(|s| s.monitor.as_ref().is_some_and(|m| !m.is_finished()))
            .count()
    }

    /// Number of tracked sessions, live or idle
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}
