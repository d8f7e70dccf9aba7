/*!
 * Tab-delimited dictionary file processor.
 *
 * Each line is `ORIGINAL<TAB>TRANSLATION`. Lines starting with `;` are
 * comments. A `$` prefix on ORIGINAL registers a regex rule instead of a
 * term: the pattern is everything after the leading `$`. Both fields pass
 * through backslash unescaping; the translation additionally has the
 * invisible separator (U+180E) stripped after unescaping.
 */

use super::SnapshotBuilder;
use crate::text_utils::{strip_invisible_separator, unescape};

/// Processor for `.txt` dictionary files
pub struct TxtProcessor;

impl TxtProcessor {
    /// File extension handled by this processor
    pub const EXTENSION: &'static str = "txt";

    /// Parse file content into the builder, returning the number of entries
    /// accepted. Malformed lines are counted and skipped, never fatal.
    pub fn process_content(content: &str, builder: &mut SnapshotBuilder) -> usize {
        let mut entries = 0;
        for line in content.lines() {
            if Self::process_line(line, builder) {
                entries += 1;
            }
        }
        entries
    }

    /// Process a single dictionary line
    fn process_line(line: &str, builder: &mut SnapshotBuilder) -> bool {
        // Blank lines and comments are not diagnostics, just skipped
        if line.is_empty() || line.starts_with(';') {
            return false;
        }

        let Some((original, translation)) = line.split_once('\t') else {
            builder.count_skipped_line();
            return false;
        };

        let original = unescape(original);
        let translation = strip_invisible_separator(&unescape(translation));

        if original.is_empty() || translation.is_empty() {
            builder.count_skipped_line();
            return false;
        }

        if let Some(pattern) = original.strip_prefix('$') {
            builder.push_rule(pattern, translation)
        } else {
            builder.insert_term(original, translation);
            true
        }
    }
}
