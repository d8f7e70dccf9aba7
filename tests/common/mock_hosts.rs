/*!
 * Mock host collaborators for testing
 *
 * This module provides in-memory implementations of the renderer and
 * playback seams so engine behavior can be asserted without a real host.
 * The sink records every call it receives; the playback mock reports a
 * scriptable status.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vocasub::app_config::CaptionStyle;
use vocasub::tracker::sinks::{FadeDirection, PlaybackStatus, SubtitleSink, VoicePlayback};

/// One call received by the recording sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    /// Caption text displayed for a speaker
    Display { speaker: String, text: String },
    /// Fade animation started for a speaker
    Fade {
        speaker: String,
        direction: FadeDirection,
    },
    /// Caption hidden for a speaker
    Hide { speaker: String },
}

/// Sink that records every call for later assertions
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    /// How long `fade` takes; zero unless configured
    fade_delay: Duration,
}

impl RecordingSink {
    /// Create an empty recording sink with instant fades
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a sink whose `fade` runs for the given duration, like a
    /// real renderer animating the fade
    pub fn with_fade_delay(millis: u64) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fade_delay: Duration::from_millis(millis),
        })
    }

    /// Snapshot of all recorded calls in arrival order
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts passed to `display`, in arrival order
    pub fn displayed_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Display { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Whether a hide was recorded for the given speaker
    pub fn hidden(&self, speaker: &str) -> bool {
        self.calls().iter().any(|call| {
            matches!(call, SinkCall::Hide { speaker: s } if s == speaker)
        })
    }

    /// Whether a fade in the given direction was recorded for the speaker
    pub fn faded(&self, speaker: &str, direction: FadeDirection) -> bool {
        self.calls().iter().any(|call| {
            matches!(call, SinkCall::Fade { speaker: s, direction: d }
                if s == speaker && *d == direction)
        })
    }
}

#[async_trait]
impl SubtitleSink for RecordingSink {
    async fn display(&self, speaker_id: &str, text: &str, _style: &CaptionStyle) {
        self.calls.lock().unwrap().push(SinkCall::Display {
            speaker: speaker_id.to_string(),
            text: text.to_string(),
        });
    }

    async fn fade(&self, speaker_id: &str, direction: FadeDirection, _duration_secs: f32) {
        self.calls.lock().unwrap().push(SinkCall::Fade {
            speaker: speaker_id.to_string(),
            direction,
        });
        if !self.fade_delay.is_zero() {
            tokio::time::sleep(self.fade_delay).await;
        }
    }

    async fn hide(&self, speaker_id: &str) {
        self.calls.lock().unwrap().push(SinkCall::Hide {
            speaker: speaker_id.to_string(),
        });
    }
}

/// Playback mock reporting a status the test can change at any time
#[derive(Debug)]
pub struct ControlledPlayback {
    status: Mutex<PlaybackStatus>,
}

impl ControlledPlayback {
    /// Create a playback mock starting in the given status
    pub fn new(status: PlaybackStatus) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(status),
        })
    }

    /// Change the status reported to monitors from now on
    pub fn set(&self, status: PlaybackStatus) {
        *self.status.lock().unwrap() = status;
    }
}

impl VoicePlayback for ControlledPlayback {
    fn status(&self, _speaker_id: &str) -> PlaybackStatus {
        *self.status.lock().unwrap()
    }
}
