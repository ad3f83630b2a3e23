//! Shared key generation for uploaded media.

/// Top-level prefix every media key lives under; also the URL path it is served at.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Storage key for an uploaded video file.
pub fn video_key(filename: &str) -> String {
    format!("{}/videos/{}", UPLOADS_PREFIX, filename)
}

/// Storage key for an uploaded thumbnail image.
pub fn thumbnail_key(filename: &str) -> String {
    format!("{}/thumbnails/{}", UPLOADS_PREFIX, filename)
}

/// Reject keys that could escape the storage root.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && key.split('/').all(|segment| segment != ".." && segment != ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_upload_layout() {
        assert_eq!(video_key("reel.mp4"), "uploads/videos/reel.mp4");
        assert_eq!(thumbnail_key("reel.png"), "uploads/thumbnails/reel.png");
    }

    #[test]
    fn traversal_keys_are_invalid() {
        assert!(is_valid_key("uploads/videos/reel.mp4"));
        assert!(!is_valid_key("../secret"));
        assert!(!is_valid_key("/etc/passwd"));
        assert!(!is_valid_key("uploads\\..\\x"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("uploads/../db.json"));
        assert!(is_valid_key("uploads/videos/1-my..cut.mp4"));
    }
}
