/*!
 * Voice-text correlator.
 *
 * Voice playback and caption extraction arrive through different host
 * hooks, often out of order. This map correlates a voice clip identifier
 * with the last caption text seen for it so the speaker monitor can show
 * the right line once both halves have arrived. Last write wins; the map
 * is cleared on full unload.
 */

use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Which dialogue subsystem produced a caption. Affects styling and
/// routing downstream, never lookup logic.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleKind {
    /// Ordinary dialogue
    #[default]
    Base,
    /// Scripted-scene dialogue
    Adv,
    /// Intimate-scene subsystem
    Yotogi,
}

impl fmt::Display for SubtitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Adv => write!(f, "adv"),
            Self::Yotogi => write!(f, "yotogi"),
        }
    }
}

/// Caption text captured for a voice id, tagged with its source subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelatedText {
    /// The caption text
    pub text: String,
    /// The subsystem that produced it
    pub kind: SubtitleKind,
}

/// Map from voice identifier to the last-seen caption text
pub struct VoiceTextCorrelator {
    /// Internal map storage, shared between clones
    map: Arc<RwLock<HashMap<String, CorrelatedText>>>,
}

impl VoiceTextCorrelator {
    /// Create an empty correlator
    pub fn new() -> Self {
        Self {
            map: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record caption text for a voice id, overwriting any earlier text.
    /// Empty ids and empty text are ignored.
    pub fn record(&self, voice_id: &str, text: &str, kind: SubtitleKind) {
        if voice_id.is_empty() || text.is_empty() {
            return;
        }

        self.map.write().insert(
            voice_id.to_string(),
            CorrelatedText {
                text: text.to_string(),
                kind,
            },
        );

        debug!("Correlated voice {} ({}) with text: {}", voice_id, kind, text);
    }

    /// Look up the caption recorded for a voice id. Pure read, no side
    /// effects.
    pub fn resolve(&self, voice_id: &str) -> Option<CorrelatedText> {
        self.map.read().get(voice_id).cloned()
    }

    /// Drop every recorded correlation
    pub fn clear(&self) {
        self.map.write().clear();
        debug!("Voice-text correlations cleared");
    }

    /// Number of recorded correlations
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Check if no correlations are recorded
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl Default for VoiceTextCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VoiceTextCorrelator {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}
