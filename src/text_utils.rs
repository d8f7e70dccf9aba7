// @module: String helpers shared by the dictionary processors and lookup

/// Marker appended by external translator plugins to text that has already
/// been translated. Lookup input carrying it is left alone so two translation
/// layers never fight over the same string.
pub const TRANSLATED_MARKER: char = '\u{180e}';

/// Prefix stamped onto texture names that were already replaced, so a
/// replaced texture is never fed back through the replacement path.
pub const REPLACED_TEXTURE_PREFIX: &str = "VSUB_";

// Whitespace trimmed from lookup keys. Deliberately wider than char::is_whitespace
// so full-width and zero-width spaces from game scripts are covered.
// U+180E is excluded: it is the translated-text marker.
const TRIMMED_CHARS: &[char] = &[
    '\t', '\n', '\u{b}', '\u{c}', '\r', ' ', '\u{85}', '\u{a0}', '\u{1680}', '\u{2000}',
    '\u{2001}', '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}', '\u{2007}',
    '\u{2008}', '\u{2009}', '\u{200a}', '\u{200b}', '\u{2028}', '\u{2029}', '\u{3000}',
    '\u{feff}',
];

/// Convert textual escape sequences to literal characters.
///
/// Dictionary files carry newlines and tabs as two-character escapes because
/// the file format itself is line- and tab-delimited. Recognized sequences
/// are `\n`, `\r`, `\t` and `\\`; an unrecognized escape is passed through
/// unchanged.
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Remove the invisible separator (U+180E) from a translation value.
/// Translation sources sometimes leak it into the value field, and it must
/// not survive into lookups because it doubles as the translated-text marker.
pub fn strip_invisible_separator(text: &str) -> String {
    if !text.contains(TRANSLATED_MARKER) {
        return text.to_string();
    }
    text.chars().filter(|c| *c != TRANSLATED_MARKER).collect()
}

/// Normalize text for a fallback dictionary lookup: line breaks and tabs
/// removed, extended whitespace trimmed, uppercased. The game engine folds
/// case in some script paths ("[HF]" arrives as "[hf]"), so exact-match
/// misses get one retry with this form.
pub fn normalize_lookup_key(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect();
    stripped
        .trim_matches(|c: char| TRIMMED_CHARS.contains(&c))
        .to_uppercase()
}

/// Check whether text carries the translated-text marker
pub fn is_marked_translated(text: &str) -> bool {
    text.contains(TRANSLATED_MARKER)
}
