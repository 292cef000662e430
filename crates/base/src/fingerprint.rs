use sha2::{Digest, Sha256};

/// Equality of normalized strings is the sole text-change criterion,
/// internal whitespace is significant.
#[inline]
#[must_use]
pub fn normalize_text(raw: &str) -> &str { raw.trim() }

/// Content digest of raw image bytes, rendered as lowercase hex. Only ever
/// compared for equality, never persisted.
#[inline]
#[must_use]
pub fn digest_image(bytes: &[u8]) -> String { hex::encode(Sha256::digest(bytes)) }

/// Last-observed clipboard content, one fingerprint per content kind.
///
/// At most one of the two fingerprints is active: recording content of one
/// kind invalidates the other, so switching from an image back to the
/// previously seen text is detected as a new text event again.
#[derive(Clone, Debug, Default)]
pub struct Fingerprint {
    last_text: String,

    last_image_digest: String,
}

impl Fingerprint {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[inline]
    #[must_use]
    pub fn is_new_text(&self, normalized: &str) -> bool {
        !normalized.is_empty() && normalized != self.last_text
    }

    #[inline]
    #[must_use]
    pub fn is_new_image(&self, digest: &str) -> bool { digest != self.last_image_digest }

    #[inline]
    pub fn record_text(&mut self, normalized: &str) {
        normalized.clone_into(&mut self.last_text);
        self.last_image_digest.clear();
    }

    #[inline]
    pub fn record_image(&mut self, digest: String) {
        self.last_image_digest = digest;
        self.last_text.clear();
    }

    /// Called when no image is present on the clipboard, so that a later
    /// reappearance of the same image counts as new.
    #[inline]
    pub fn reset_image(&mut self) { self.last_image_digest.clear(); }

    #[inline]
    pub fn reset(&mut self) {
        self.last_text.clear();
        self.last_image_digest.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::{digest_image, normalize_text, Fingerprint};

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  hello \n"), "hello");
        assert_eq!(normalize_text("a  b"), "a  b");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \t\n "), "");
    }

    #[test]
    fn test_digest_image() {
        let a = digest_image(b"png bytes");
        let b = digest_image(b"png bytes");
        let c = digest_image(b"other bytes");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_empty_text_is_never_new() {
        let fp = Fingerprint::new();
        assert!(!fp.is_new_text(""));
    }

    #[test]
    fn test_text_detection() {
        let mut fp = Fingerprint::new();
        assert!(fp.is_new_text("hello"));
        fp.record_text("hello");
        assert!(!fp.is_new_text("hello"));
        assert!(fp.is_new_text("world"));
    }

    #[test]
    fn test_image_detection() {
        let mut fp = Fingerprint::new();
        let digest = digest_image(b"bytes");
        assert!(fp.is_new_image(&digest));
        fp.record_image(digest.clone());
        assert!(!fp.is_new_image(&digest));
    }

    #[test]
    fn test_mutual_exclusion() {
        let mut fp = Fingerprint::new();
        fp.record_text("hello");
        assert!(!fp.is_new_text("hello"));

        // An image observation invalidates the text fingerprint.
        fp.record_image(digest_image(b"bytes"));
        assert!(fp.is_new_text("hello"));

        // And a text observation invalidates the image fingerprint.
        let digest = digest_image(b"bytes");
        assert!(!fp.is_new_image(&digest));
        fp.record_text("hello");
        assert!(fp.is_new_image(&digest));
    }

    #[test]
    fn test_reset_image_allows_reappearance() {
        let mut fp = Fingerprint::new();
        let digest = digest_image(b"bytes");
        fp.record_image(digest.clone());
        assert!(!fp.is_new_image(&digest));
        fp.reset_image();
        assert!(fp.is_new_image(&digest));
    }

    #[test]
    fn test_reset() {
        let mut fp = Fingerprint::new();
        fp.record_text("hello");
        fp.reset();
        assert!(fp.is_new_text("hello"));
        assert!(fp.is_new_image(&digest_image(b"bytes")));
    }
}
