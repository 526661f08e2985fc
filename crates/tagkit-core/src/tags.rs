//! Tag text rules: canonical formatting, case-insensitive identity,
//! Tag Field Value parsing and locale-aware ordering.
//!
//! A Tag is a trimmed display string whose first character is uppercased.
//! Two tags are the same tag when they are equal ignoring case. A Tag Field
//! Value is a comma-separated, sorted list of tags persisted on a record.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::defaults::TAG_SEPARATOR;

/// Uppercase the first character, leave the rest unchanged.
pub fn format_tag(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-insensitive tag identity.
pub fn same_tag(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Find the stored spelling of `candidate` in `tags`, ignoring case.
pub fn find_tag<'a>(tags: &'a [String], candidate: &str) -> Option<&'a String> {
    let wanted = candidate.to_lowercase();
    tags.iter().find(|t| t.to_lowercase() == wanted)
}

/// Split raw input on commas, trim each piece and drop empty pieces.
pub fn split_candidates(input: &str) -> Vec<String> {
    input
        .split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a persisted Tag Field Value into its tags.
///
/// A missing or empty value is an empty list.
pub fn parse_field_value(value: Option<&str>) -> Vec<String> {
    value.map(split_candidates).unwrap_or_default()
}

/// Join tags into a Tag Field Value.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_SEPARATOR.to_string().as_str())
}

/// Primary collation weight of a base character: whitespace, then
/// punctuation and symbols, then digits, then letters; letters compare
/// case-folded.
fn primary_weight(c: char) -> (u8, char) {
    let class = if c.is_whitespace() {
        0
    } else if c.is_alphabetic() {
        3
    } else if c.is_numeric() {
        2
    } else {
        1
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

/// Base letters of `tag`: canonical decomposition with accents removed.
fn base_chars(tag: &str) -> impl Iterator<Item = char> + '_ {
    tag.nfd().filter(|c| !is_combining_mark(*c))
}

/// Accent positions of `tag` in its canonical decomposition.
fn accent_marks(tag: &str) -> impl Iterator<Item = bool> + '_ {
    tag.nfd().map(is_combining_mark)
}

/// Locale-aware comparison of two tags.
///
/// Levels, in order: base letters ignoring case and accents, then accents
/// (unaccented first), then case (lowercase first), then code point so the
/// order is total. `Eagle < Élan < Zeta`.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    base_chars(a)
        .map(primary_weight)
        .cmp(base_chars(b).map(primary_weight))
        .then_with(|| accent_marks(a).cmp(accent_marks(b)))
        .then_with(|| {
            base_chars(a)
                .map(char::is_uppercase)
                .cmp(base_chars(b).map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Sort tags in place with [`compare_tags`].
pub fn sort_tags(tags: &mut [String]) {
    tags.sort_by(|a, b| compare_tags(a, b));
}

/// Drop later entries that equal an earlier entry ignoring case.
pub fn dedup_ignore_case(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

/// Drop exact duplicates, keeping first-seen order.
pub fn dedup_exact(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// Materialize a Tag Set: unique ignoring case, sorted.
pub fn canonical_set(tags: Vec<String>) -> Vec<String> {
    let mut tags = dedup_ignore_case(tags);
    sort_tags(&mut tags);
    tags
}
