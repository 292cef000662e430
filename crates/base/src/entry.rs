use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::{timestamp, ClipKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    timestamp: OffsetDateTime,

    content: Content,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Content {
    Text(String),
    Image(PathBuf),
}

impl Entry {
    #[inline]
    pub fn new_text<S>(content: S, timestamp: Option<OffsetDateTime>) -> Self
    where
        S: Into<String>,
    {
        Self {
            timestamp: timestamp.unwrap_or_else(timestamp::now),
            content: Content::Text(content.into()),
        }
    }

    #[inline]
    pub fn new_image<P>(image_path: P, timestamp: Option<OffsetDateTime>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            timestamp: timestamp.unwrap_or_else(timestamp::now),
            content: Content::Image(image_path.into()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ClipKind {
        match self.content {
            Content::Text(_) => ClipKind::Text,
            Content::Image(_) => ClipKind::Image,
        }
    }

    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime { self.timestamp }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool { matches!(self.content, Content::Text(_)) }

    #[inline]
    #[must_use]
    pub const fn is_image(&self) -> bool { matches!(self.content, Content::Image(_)) }

    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Image(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn image_path(&self) -> Option<&Path> {
        match &self.content {
            Content::Text(_) => None,
            Content::Image(path) => Some(path),
        }
    }

    /// Replaces the content of a text entry, returns `false` without mutating
    /// anything for an image entry.
    #[inline]
    pub fn set_text<S>(&mut self, content: S) -> bool
    where
        S: Into<String>,
    {
        match &mut self.content {
            Content::Text(text) => {
                *text = content.into();
                true
            }
            Content::Image(_) => false,
        }
    }

    /// Single-line rendering for listings and logs, truncated to `max_chars`
    /// characters before control characters are escaped.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        fn truncate(s: &str, max_chars: usize) -> &str {
            match s.char_indices().nth(max_chars) {
                None => s,
                Some((idx, _)) => &s[..idx],
            }
        }

        let data = match &self.content {
            Content::Text(text) => text.clone(),
            Content::Image(path) => {
                let file_name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |name| {
                        name.to_string_lossy().into_owned()
                    });
                format!("[image] {file_name}")
            }
        };

        let data = if max_chars > 0 && data.chars().count() > max_chars {
            let mut data = truncate(&data, max_chars).to_owned();
            data.push_str("...");
            data
        } else {
            data
        };

        data.replace('\n', "\\n").replace('\r', "\\r").replace('\t', "\\t")
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{timestamp, ClipEntry, ClipKind};

    #[test]
    fn test_text_entry() {
        let entry = ClipEntry::new_text("hello", None);
        assert_eq!(entry.kind(), ClipKind::Text);
        assert_eq!(entry.text(), Some("hello"));
        assert_eq!(entry.image_path(), None);
        assert_eq!(entry.timestamp().offset(), timestamp::CANONICAL_OFFSET);
    }

    #[test]
    fn test_image_entry() {
        let entry = ClipEntry::new_image("/tmp/x.png", None);
        assert_eq!(entry.kind(), ClipKind::Image);
        assert_eq!(entry.text(), None);
        assert_eq!(entry.image_path().unwrap().to_str(), Some("/tmp/x.png"));
    }

    #[test]
    fn test_set_text() {
        let mut entry = ClipEntry::new_text("old", None);
        assert!(entry.set_text("new"));
        assert_eq!(entry.text(), Some("new"));

        let mut entry = ClipEntry::new_image("/tmp/x.png", None);
        assert!(!entry.set_text("new"));
        assert_eq!(entry.image_path().unwrap().to_str(), Some("/tmp/x.png"));
    }

    #[test]
    fn test_explicit_timestamp() {
        let timestamp = datetime!(2024-01-01 10:00:00 +8);
        let entry = ClipEntry::new_text("hello", Some(timestamp));
        assert_eq!(entry.timestamp(), timestamp);
    }

    #[test]
    fn test_preview_truncates_and_escapes() {
        let entry = ClipEntry::new_text("line one\nline two", None);
        assert_eq!(entry.preview(0), "line one\\nline two");
        assert_eq!(entry.preview(8), "line one...");

        let entry = ClipEntry::new_text("tab\there", None);
        assert_eq!(entry.preview(50), "tab\\there");
    }

    #[test]
    fn test_preview_image_shows_file_name() {
        let entry = ClipEntry::new_image("/data/images/image_2024-01-01_10-00-00.png", None);
        assert_eq!(entry.preview(50), "[image] image_2024-01-01_10-00-00.png");
    }
}
