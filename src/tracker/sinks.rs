/*!
 * Collaborator seams between the engine and the host.
 *
 * The host integration layer implements these traits: `SubtitleSink` is
 * the renderer the engine pushes resolved captions into, `VoicePlayback`
 * exposes the per-speaker audio handle the monitors poll. The engine never
 * reaches past these seams into host internals.
 */

use async_trait::async_trait;

use crate::app_config::CaptionStyle;

/// Direction of a caption fade animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Fade the caption in
    In,
    /// Fade the caption out
    Out,
}

/// Snapshot of a speaker's audio-playback handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// A voice clip is currently playing
    Playing,
    /// The clip finished playing
    Completed,
    /// No playback handle is attached. Normal for a brief window right
    /// after voice-start; persistent absence means the voice ended.
    Missing,
}

/// Renderer collaborator receiving resolved captions.
///
/// The engine decides what text to show and when; drawing, layout and
/// animation playback belong to the implementor. Style parameters are
/// passed through opaquely from the configuration.
#[async_trait]
pub trait SubtitleSink: Send + Sync {
    /// Show caption text for a speaker
    async fn display(&self, speaker_id: &str, text: &str, style: &CaptionStyle);

    /// Start a fade animation for a speaker's caption
    async fn fade(&self, speaker_id: &str, direction: FadeDirection, duration_secs: f32);

    /// Remove a speaker's caption immediately
    async fn hide(&self, speaker_id: &str);
}

/// Host collaborator exposing per-speaker audio playback state
pub trait VoicePlayback: Send + Sync {
    /// Report the current playback status for a speaker
    fn status(&self, speaker_id: &str) -> PlaybackStatus;
}
