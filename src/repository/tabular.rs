/*!
 * Header-based tabular dictionary file processor.
 *
 * The first non-comment row names the columns. `Term` and `Translation` are
 * required, `Original` is optional and ignored for lookup purposes. Header
 * matching is case-insensitive and whitespace-trimmed. `#` starts a comment
 * line, blank lines are skipped, fields may be double-quoted with `""` as
 * the embedded-quote escape.
 */

use log::warn;

use super::SnapshotBuilder;

/// Processor for `.csv` dictionary files
pub struct TabularProcessor;

impl TabularProcessor {
    /// File extension handled by this processor
    pub const EXTENSION: &'static str = "csv";

    /// Parse file content into the builder, returning the number of entries
    /// accepted. A file without the required header columns contributes
    /// nothing; rows with an empty Term or Translation are counted and
    /// skipped.
    pub fn process_content(content: &str, builder: &mut SnapshotBuilder) -> usize {
        let mut rows = content
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'));

        let Some(header_line) = rows.next() else {
            return 0;
        };

        let header = Self::split_fields(header_line);
        let find_column = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let Some(term_idx) = find_column("term") else {
            warn!("Tabular dictionary file has no Term column, skipping file");
            return 0;
        };
        let Some(translation_idx) = find_column("translation") else {
            warn!("Tabular dictionary file has no Translation column, skipping file");
            return 0;
        };

        let mut entries = 0;
        for row in rows {
            let fields = Self::split_fields(row);
            // Missing optional fields are tolerated: a short row simply has
            // empty values past its end
            let term = fields.get(term_idx).map(String::as_str).unwrap_or("");
            let translation = fields
                .get(translation_idx)
                .map(String::as_str)
                .unwrap_or("");

            if term.is_empty() || translation.is_empty() {
                builder.count_skipped_line();
                continue;
            }

            builder.insert_term(term.to_string(), translation.to_string());
            entries += 1;
        }

        entries
    }

    /// Split one row into fields, honoring double-quoted fields with `""`
    /// as the escaped quote
    fn split_fields(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' if current.is_empty() => in_quotes = true,
                ',' if !in_quotes => {
                    fields.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        fields.push(current);

        fields
    }
}
