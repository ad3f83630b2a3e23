//! Hosted video reference parsing.
//!
//! Pulls the 11-character YouTube video id out of the URL shapes editors paste
//! into the admin form (share links, watch pages, embeds, legacy `/v/` links).

use regex::Regex;
use std::sync::LazyLock;

/// Length of a YouTube video id.
pub const EXTERNAL_ID_LEN: usize = 11;

/// Thumbnail shown when an entry has neither an override nor an external id.
pub const PLACEHOLDER_THUMBNAIL: &str = "https://placehold.co/600x400/202020/FFFFFF/png?text=Video";

// The leading `.*` is greedy: when several markers appear, the last one wins.
static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video id pattern is a valid regex")
});

/// Extract the external video id from a hosted video URL.
///
/// Returns `None` when no marker is present or the token after the last marker
/// is not exactly 11 characters long.
pub fn extract_external_id(text: &str) -> Option<String> {
    let captures = VIDEO_ID_PATTERN.captures(text)?;
    let candidate = captures.get(2)?.as_str();
    if candidate.chars().count() == EXTERNAL_ID_LEN {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Default thumbnail for a hosted video id.
pub fn thumbnail_url_for(external_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", external_id)
}
