/*!
 * Bounded cache of decoded replacement textures.
 *
 * The host asks "is there a replacement for texture name X" on every
 * texture bind, so hits must be cheap and the store must stay bounded.
 * Names are normalized (case-insensitive, extension-free) and resolved
 * through a file-path index built once per reload by scanning the texture
 * directory of the current target language. On a miss with an indexed
 * path, the file is read and decoded; decoded images are kept under an
 * LRU policy capped at the configured capacity.
 *
 * The cache is rebuilt empty on every reload and cleared when the target
 * language changes or the feature is toggled, so stale images never
 * survive a configuration change.
 */

use image::GenericImageView;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::TextureError;
use crate::file_utils::FileManager;
use crate::text_utils::REPLACED_TEXTURE_PREFIX;

/// Texture file extensions recognized by the directory scan
const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Extensions stripped during name normalization. Includes the engine's
/// own packed format, which replacement files are keyed against.
static STRIPPED_EXTENSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(png|jpe?g|bmp|tex)$").unwrap());

/// A decoded replacement image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// RGBA8 pixel data, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl DecodedTexture {
    /// The decoded pixel buffer
    pub fn bytes(&self) -> &[u8] {
        &self.rgba
    }
}

struct CacheSlot {
    texture: Arc<DecodedTexture>,
    last_access: u64,
}

struct LruStore {
    entries: HashMap<String, CacheSlot>,
    tick: u64,
}

/// Capacity-bounded mapping from normalized texture name to decoded bytes
pub struct TextureCache {
    /// Normalized name -> on-disk path, built once from the texture root
    index: HashMap<String, PathBuf>,
    /// Maximum number of decoded entries kept
    capacity: usize,
    /// LRU storage
    store: Mutex<LruStore>,
}

impl TextureCache {
    /// Create a cache with no backing files; every `get` misses. Used when
    /// the texture root does not exist so the engine degrades instead of
    /// failing the host.
    pub fn empty(capacity: usize) -> Self {
        Self {
            index: HashMap::new(),
            capacity,
            store: Mutex::new(LruStore {
                entries: HashMap::new(),
                tick: 0,
            }),
        }
    }

    /// Build a cache over the replacement files found under `texture_dir`
    /// (recursive). The scan only records paths; decoding happens lazily
    /// on first request.
    pub fn build(texture_dir: &Path, capacity: usize) -> Self {
        if !FileManager::dir_exists(texture_dir) {
            warn!(
                "Translation texture directory not found, replacements disabled: {:?}",
                texture_dir
            );
            return Self::empty(capacity);
        }

        let mut index = HashMap::new();
        match FileManager::find_files_sorted(texture_dir, TEXTURE_EXTENSIONS) {
            Ok(files) => {
                for path in files {
                    if let Some(name) = path.file_name() {
                        index.insert(Self::normalize_name(&name.to_string_lossy()), path);
                    }
                }
            }
            Err(e) => warn!("Failed to scan texture directory {:?}: {}", texture_dir, e),
        }

        info!(
            "Found {} texture files in translation texture directory (cache capacity {})",
            index.len(),
            capacity
        );

        let mut cache = Self::empty(capacity);
        cache.index = index;
        cache
    }

    /// Number of decoded entries currently cached
    pub fn len(&self) -> usize {
        self.store.lock().entries.len()
    }

    /// Check if no decoded entries are cached
    pub fn is_empty(&self) -> bool {
        self.store.lock().entries.is_empty()
    }

    /// Configured capacity bound
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check whether a replacement file exists for a name, without loading
    pub fn has_replacement(&self, name: &str) -> bool {
        !name.starts_with(REPLACED_TEXTURE_PREFIX)
            && self.index.contains_key(&Self::normalize_name(name))
    }

    /// Check whether a decoded entry is resident, without touching recency
    pub fn contains(&self, name: &str) -> bool {
        self.store
            .lock()
            .entries
            .contains_key(&Self::normalize_name(name))
    }

    /// Fetch the decoded replacement for a texture name.
    ///
    /// Names already stamped with the replaced-texture prefix are refused
    /// outright; answering those would feed replaced textures back through
    /// the replacement path. A hit refreshes recency; a miss with an
    /// indexed file loads and decodes it, evicting the least-recently-used
    /// entry at capacity. Decode failures return None so the host keeps
    /// the original texture.
    pub fn get(&self, name: &str) -> Option<Arc<DecodedTexture>> {
        if name.is_empty() {
            return None;
        }

        if name.starts_with(REPLACED_TEXTURE_PREFIX) {
            debug!("Texture {} is already replaced, skipping", name);
            return None;
        }

        let key = Self::normalize_name(name);

        {
            let mut store = self.store.lock();
            store.tick += 1;
            let tick = store.tick;
            if let Some(slot) = store.entries.get_mut(&key) {
                slot.last_access = tick;
                debug!("Texture cache hit: {}", key);
                return Some(slot.texture.clone());
            }
        }

        let path = self.index.get(&key)?;
        let texture = match Self::load_and_decode(&key, path) {
            Ok(texture) => Arc::new(texture),
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        if self.capacity > 0 {
            let mut store = self.store.lock();
            store.tick += 1;
            let tick = store.tick;

            if store.entries.len() >= self.capacity {
                if let Some(oldest) = store
                    .entries
                    .iter()
                    .min_by_key(|(_, slot)| slot.last_access)
                    .map(|(k, _)| k.clone())
                {
                    debug!("Texture cache at capacity, evicting {}", oldest);
                    store.entries.remove(&oldest);
                }
            }

            store.entries.insert(
                key.clone(),
                CacheSlot {
                    texture: texture.clone(),
                    last_access: tick,
                },
            );
            debug!("Texture added to cache: {}", key);
        }

        Some(texture)
    }

    /// Drop all decoded entries. Invoked whenever the target language
    /// changes or the replacement feature is toggled.
    pub fn clear(&self) {
        let mut store = self.store.lock();
        store.entries.clear();
        store.tick = 0;
        debug!("Texture cache cleared");
    }

    /// Normalize a texture name: lowercase, known extensions stripped
    fn normalize_name(name: &str) -> String {
        let lowered = name.to_lowercase();
        STRIPPED_EXTENSION_REGEX.replace(&lowered, "").into_owned()
    }

    fn load_and_decode(key: &str, path: &Path) -> Result<DecodedTexture, TextureError> {
        let bytes = FileManager::read_bytes(path)
            .map_err(|e| TextureError::ReadFailed(e.to_string()))?;

        let decoded = image::load_from_memory(&bytes).map_err(|e| TextureError::DecodeFailed {
            name: key.to_string(),
            message: e.to_string(),
        })?;

        let (width, height) = decoded.dimensions();
        Ok(DecodedTexture {
            width,
            height,
            rgba: decoded.into_rgba8().into_raw(),
        })
    }
}
