use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::app_config::Config;
use crate::correlator::{SubtitleKind, VoiceTextCorrelator};
use crate::reload::{ReloadCoordinator, SharedState};
use crate::repository::LoadSummary;
use crate::texture_cache::DecodedTexture;
use crate::tracker::sinks::{SubtitleSink, VoicePlayback};
use crate::tracker::SpeakerTracker;

// @module: Engine controller tying the subsystems to the host event surface

/// Main controller wiring the translation repository, speaker tracker,
/// voice-text correlator and texture cache to the host's events
pub struct Controller {
    // @field: Engine configuration
    config: Config,

    // @field: Reload lifecycle owner
    coordinator: ReloadCoordinator,

    // @field: Per-speaker subtitle state machine
    tracker: SpeakerTracker,

    // @field: Read handle onto published translation state
    shared: SharedState,
}

impl Controller {
    /// Create a controller wired to the host's renderer and playback
    /// collaborators. No translation data is loaded until `init`.
    pub fn new(
        config: Config,
        sink: Arc<dyn SubtitleSink>,
        playback: Arc<dyn VoicePlayback>,
    ) -> Result<Self> {
        config.validate()?;

        let coordinator = ReloadCoordinator::new();
        let shared = coordinator.shared();
        let correlator = VoiceTextCorrelator::new();
        let tracker = SpeakerTracker::new(
            shared.clone(),
            correlator,
            sink,
            playback,
            config.monitor.clone(),
            config.style.clone(),
        );

        Ok(Self {
            config,
            coordinator,
            tracker,
            shared,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load translation data for the configured target language and
    /// publish it
    pub async fn init(&self) -> Result<LoadSummary> {
        self.coordinator.reload(&self.config).await
    }

    /// Whether a load pass is currently running
    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// A voice clip started playing for a speaker
    pub fn on_voice_start(&self, speaker_id: &str, voice_id: &str, kind: SubtitleKind) {
        self.tracker.on_voice_start(speaker_id, voice_id, kind);
    }

    /// The host extracted caption text from a script
    pub fn on_text_extracted(&self, text: &str, context_label: &str) {
        self.tracker.on_text_extracted(text, context_label);
    }

    /// A speaker's voice ended
    pub async fn on_voice_end(&self, speaker_id: &str) {
        self.tracker.on_voice_end(speaker_id).await;
    }

    /// Full teardown: every session cancelled and hidden, correlations
    /// dropped, published state emptied so lookups pass through
    pub async fn unload(&self) {
        self.tracker.unload().await;
        self.coordinator.unload();
    }

    // =========================================================================
    // Host queries
    // =========================================================================

    /// Resolve display text; returns the input unchanged plus a found
    /// flag when no translation applies
    pub fn translate(&self, text: &str) -> (String, bool) {
        self.shared.snapshot().lookup(text)
    }

    /// Fetch the decoded replacement for a texture name, if one exists
    pub fn replacement_texture(&self, name: &str) -> Option<Arc<DecodedTexture>> {
        self.shared.textures().get(name)
    }

    /// Switch the target language: drops cached textures and rebuilds
    /// the published snapshot/cache pair from the new language subtree
    pub async fn set_target_language(&mut self, language: &str) -> Result<LoadSummary> {
        info!(
            "Switching target language {} -> {}",
            self.config.target_language, language
        );
        self.config.target_language = language.to_string();
        self.shared.textures().clear();
        self.coordinator.reload(&self.config).await
    }

    /// The speaker tracker, for hosts that pump its state directly
    pub fn tracker(&self) -> &SpeakerTracker {
        &self.tracker
    }
}
