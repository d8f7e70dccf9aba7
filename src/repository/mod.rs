/*!
 * Translation repository: dictionary loading and lookup.
 *
 * A load pass scans a directory for dictionary files, dispatches each file
 * to the processor matching its extension, and accumulates everything into
 * one immutable `TranslationSnapshot`. Snapshots are never mutated after
 * they are built; a reload produces a fresh snapshot and swaps it in
 * wholesale (see `crate::reload`).
 *
 * Lookup policy: exact term match first, then a normalized retry, then the
 * regex rules in registration order with first-match-wins and a literal
 * replacement string (no capture-group templating).
 */

pub mod tabular;
pub mod txt;

use log::{debug, error, info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::errors::DictionaryError;
use crate::file_utils::FileManager;
use crate::text_utils::{is_marked_translated, normalize_lookup_key};

use tabular::TabularProcessor;
use txt::TxtProcessor;

/// A pattern-based translation rule, evaluated when no exact term matches
#[derive(Debug)]
pub struct RegexRule {
    /// Compiled pattern
    pub pattern: Regex,
    /// Literal replacement text returned when the pattern matches
    pub replacement: String,
}

/// Diagnostic totals for one load pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Dictionary files processed
    pub files_processed: usize,
    /// Term entries and regex rules accepted
    pub entries_loaded: usize,
    /// Malformed lines skipped (wrong field count, empty key or value)
    pub lines_skipped: usize,
    /// `$`-lines whose pattern failed to compile
    pub invalid_patterns: usize,
    /// Wall-clock duration of the load pass in milliseconds
    pub elapsed_ms: u64,
}

/// One immutable, fully-loaded translation dataset
#[derive(Debug, Default)]
pub struct TranslationSnapshot {
    /// Exact-match entries; keys unique, last loaded file wins
    terms: HashMap<String, String>,
    /// Regex rules in registration order
    rules: Vec<RegexRule>,
}

impl TranslationSnapshot {
    /// An empty snapshot; every lookup falls through to the input
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of exact-match entries
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of regex rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Check if the snapshot holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.rules.is_empty()
    }

    /// Resolve text to its translation, or None when nothing applies.
    ///
    /// Text already carrying the translated-text marker is never translated
    /// again, so stacked translator plugins do not loop on each other.
    pub fn resolve(&self, text: &str) -> Option<String> {
        if text.is_empty() || is_marked_translated(text) {
            return None;
        }

        if let Some(value) = self.terms.get(text) {
            debug!("Exact term match for '{}'", text);
            return Some(value.clone());
        }

        // The game engine mangles some script strings (case folds, stray
        // line breaks), so retry once with a normalized key
        let normalized = normalize_lookup_key(text);
        if normalized != text {
            if let Some(value) = self.terms.get(&normalized) {
                debug!("Normalized term match for '{}'", text);
                return Some(value.clone());
            }
        }

        // First matching rule wins; replacement is literal
        for rule in &self.rules {
            if rule.pattern.is_match(text) {
                debug!("Regex rule '{}' matched '{}'", rule.pattern.as_str(), text);
                return Some(rule.replacement.clone());
            }
        }

        None
    }

    /// Resolve text, returning the input unchanged plus a found flag when
    /// no translation applies. Lookup never fails; absence is a flag, not
    /// an error.
    pub fn lookup(&self, text: &str) -> (String, bool) {
        match self.resolve(text) {
            Some(translated) => (translated, true),
            None => (text.to_string(), false),
        }
    }
}

/// Accumulates dictionary entries from one load pass into a snapshot
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    terms: HashMap<String, String>,
    rules: Vec<RegexRule>,
    summary: LoadSummary,
}

impl SnapshotBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term entry; a later entry for the same key overwrites
    pub fn insert_term(&mut self, key: String, value: String) {
        self.terms.insert(key, value);
        self.summary.entries_loaded += 1;
    }

    /// Compile and append a regex rule. An invalid pattern is logged and
    /// counted; the rest of the file is unaffected.
    pub fn push_rule(&mut self, pattern: &str, replacement: String) -> bool {
        match Regex::new(pattern) {
            Ok(compiled) => {
                self.rules.push(RegexRule {
                    pattern: compiled,
                    replacement,
                });
                self.summary.entries_loaded += 1;
                true
            }
            Err(e) => {
                warn!(
                    "{}, skipping",
                    DictionaryError::InvalidPattern {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    }
                );
                self.summary.invalid_patterns += 1;
                false
            }
        }
    }

    /// Record one malformed line
    pub fn count_skipped_line(&mut self) {
        self.summary.lines_skipped += 1;
    }

    /// Diagnostic totals accumulated so far
    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    /// Finish the pass, producing the immutable snapshot
    pub fn build(self) -> TranslationSnapshot {
        TranslationSnapshot {
            terms: self.terms,
            rules: self.rules,
        }
    }

    /// Finish the pass, producing the snapshot and its diagnostics
    pub fn build_with_summary(mut self, started: Instant) -> (TranslationSnapshot, LoadSummary) {
        self.summary.elapsed_ms = started.elapsed().as_millis() as u64;
        let summary = self.summary.clone();
        (
            TranslationSnapshot {
                terms: self.terms,
                rules: self.rules,
            },
            summary,
        )
    }
}

/// Load every recognized dictionary file under `dir` into one snapshot.
///
/// Files are processed in lexicographic path order so the last-file-wins
/// merge policy is deterministic across platforms. A missing directory or
/// an unreadable file degrades to fewer entries, never to a failure. The
/// optional cancel flag is honored between files; a cancelled pass returns
/// whatever was accumulated so far.
pub fn load_from_dir(dir: &Path, cancel: Option<&AtomicBool>) -> (TranslationSnapshot, LoadSummary) {
    let started = Instant::now();
    let mut builder = SnapshotBuilder::new();

    if !FileManager::dir_exists(dir) {
        warn!("Translation text directory not found: {:?}", dir);
        return builder.build_with_summary(started);
    }

    let files = match FileManager::find_files_sorted(
        dir,
        &[TxtProcessor::EXTENSION, TabularProcessor::EXTENSION],
    ) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to scan translation directory {:?}: {}", dir, e);
            return builder.build_with_summary(started);
        }
    };

    info!(
        "Loading {} dictionary files from {:?} (lexicographic order, later files win on key collisions)",
        files.len(),
        dir
    );

    for file in &files {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                info!("Translation loading cancelled after {} files", builder.summary.files_processed);
                break;
            }
        }

        let content = match FileManager::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                error!("Error processing file {:?}: {}", file, e);
                continue;
            }
        };

        let extension = file
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let entries = match extension.as_str() {
            TxtProcessor::EXTENSION => TxtProcessor::process_content(&content, &mut builder),
            TabularProcessor::EXTENSION => {
                TabularProcessor::process_content(&content, &mut builder)
            }
            _ => continue,
        };

        debug!("Processed {:?}: {} entries", file.file_name(), entries);
        builder.summary.files_processed += 1;
    }

    let (snapshot, summary) = builder.build_with_summary(started);
    info!(
        "Loaded {} entries ({} terms, {} rules) from {} files in {} ms ({} lines skipped, {} invalid patterns)",
        summary.entries_loaded,
        snapshot.term_count(),
        snapshot.rule_count(),
        summary.files_processed,
        summary.elapsed_ms,
        summary.lines_skipped,
        summary.invalid_patterns,
    );

    (snapshot, summary)
}
