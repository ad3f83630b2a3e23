//! Metadata inference for uploaded media.
//!
//! Turns an uploaded file name and the optional free-text tag field of the
//! admin form into a display title, a tag list and a storage-safe file name.

use crate::models::{normalize_tags, FALLBACK_TAG};

/// Words never promoted to tags when tags are inferred from a title.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "video", "project", "final", "v1", "v2", "render", "of", "in", "on", "at",
    "to", "for",
];

/// Inferred tags must be longer than this many characters.
const MIN_INFERRED_TAG_LEN: usize = 2;

/// Replace every character outside `[A-Za-z0-9._-]` with `_` and lowercase the result.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Strip the final extension of a file name (`reel.final.mp4` -> `reel.final`).
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() && !filename[idx + 1..].contains('/') => {
            &filename[..idx]
        }
        _ => filename,
    }
}

/// File name without extension, separators turned into single spaces.
pub fn raw_title(filename: &str) -> String {
    strip_extension(filename)
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first word character of every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut done = false;
            for c in word.chars() {
                if !done && (c.is_alphanumeric() || c == '_') {
                    out.extend(c.to_uppercase());
                    done = true;
                } else {
                    out.push(c);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display title inferred from an uploaded file name.
pub fn infer_title(filename: &str) -> String {
    title_case(&raw_title(filename))
}

/// Comma-separated manual tags: trimmed, lowercased, blanks dropped.
pub fn parse_manual_tags(text: &str) -> Vec<String> {
    normalize_tags(text.split(','))
}

/// Naive keyword extraction from a raw (not title-cased) title.
pub fn infer_tags(raw_title: &str) -> Vec<String> {
    raw_title
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() > MIN_INFERRED_TAG_LEN && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Manual tags win when supplied; otherwise tags are inferred from the title.
/// Falls back to a single `new` tag when nothing could be derived.
pub fn derive_tags(manual: Option<&str>, raw_title: &str) -> Vec<String> {
    let mut tags = match manual.filter(|m| !m.trim().is_empty()) {
        Some(text) => parse_manual_tags(text),
        None => infer_tags(raw_title),
    };
    if tags.is_empty() {
        tags.push(FALLBACK_TAG.to_string());
    }
    tags
}
