mod error;

use std::{path::Path, sync::Arc};

use cliplog_base::{digest_image, normalize_text, timestamp, ClipEntry, Fingerprint};
use snafu::ResultExt;

pub use self::error::{Error, Result};
use crate::{backend::ClipboardBackend, history::HistoryManager};

/// Change detection and history bookkeeping behind a single mutation point.
/// The watcher and user triggered operations all go through one instance,
/// callers serialize access with a lock around it.
pub struct ClipboardService {
    backend: Arc<dyn ClipboardBackend>,

    history: HistoryManager,

    fingerprint: Fingerprint,
}

impl ClipboardService {
    pub fn new<P: AsRef<Path>>(
        backend: Arc<dyn ClipboardBackend>,
        history_dir_path: P,
        capacity: usize,
    ) -> Self {
        Self::with_fingerprint(backend, history_dir_path, capacity, Fingerprint::new())
    }

    pub fn with_fingerprint<P: AsRef<Path>>(
        backend: Arc<dyn ClipboardBackend>,
        history_dir_path: P,
        capacity: usize,
        fingerprint: Fingerprint,
    ) -> Self {
        Self { backend, history: HistoryManager::new(history_dir_path, capacity), fingerprint }
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ClipEntry] { self.history.items() }

    #[inline]
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&ClipEntry> { self.history.get(index) }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.history.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.history.is_empty() }

    #[inline]
    pub fn history_file_path(&self) -> &Path { self.history.path() }

    /// The durable line rendering of the whole history, oldest clip first.
    #[inline]
    #[must_use]
    pub fn export_text(&self) -> String { self.history.export_text() }

    /// Loads the durable history, returns the number of clips.
    pub async fn load(&mut self) -> Result<usize> {
        self.history.load().await.context(error::PersistHistorySnafu)
    }

    pub async fn maintain_limit(&mut self) -> Result<()> {
        self.history.maintain_limit().await.context(error::PersistHistorySnafu)
    }

    /// Seeds the fingerprints from whatever the clipboard holds right now, so
    /// that pre-existing content does not produce an entry on the first tick.
    pub async fn initialize(&mut self) {
        if self.backend.has_image().await {
            if let Ok(bytes) = self.backend.load_image().await {
                if !bytes.is_empty() {
                    self.fingerprint.record_image(digest_image(&bytes));
                }
            }
        } else if let Ok(text) = self.backend.load_text().await {
            self.fingerprint.record_text(normalize_text(&text));
        }
    }

    /// Samples the clipboard once. Returns the new entry when the content
    /// changed since the last observation, `None` otherwise.
    ///
    /// Image content is checked first and wins the tick on a change. The text
    /// check still runs when the image branch produced nothing, so a failed
    /// image read never hides a text change.
    pub async fn poll_once(&mut self) -> Option<ClipEntry> {
        if self.backend.has_image().await {
            if let Some(clip) = self.capture_image().await {
                return Some(clip);
            }
        } else {
            self.fingerprint.reset_image();
        }

        self.capture_text().await
    }

    async fn capture_image(&mut self) -> Option<ClipEntry> {
        let bytes = match self.backend.load_image().await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return None,
            Err(err) => {
                tracing::debug!("Could not load image from clipboard, error: {err}");
                return None;
            }
        };

        let digest = digest_image(&bytes);
        if !self.fingerprint.is_new_image(&digest) {
            return None;
        }
        self.fingerprint.record_image(digest);

        let timestamp = timestamp::now();
        let file_path = match self.history.store_image(&bytes, timestamp).await {
            Ok(file_path) => file_path,
            Err(err) => {
                tracing::warn!("Could not store image file, error: {err}");
                return None;
            }
        };

        Some(self.commit(ClipEntry::new_image(file_path, Some(timestamp))).await)
    }

    async fn capture_text(&mut self) -> Option<ClipEntry> {
        let text = match self.backend.load_text().await {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!("Could not load text from clipboard, error: {err}");
                return None;
            }
        };

        let normalized = normalize_text(&text);
        if !self.fingerprint.is_new_text(normalized) {
            return None;
        }
        self.fingerprint.record_text(normalized);

        // the entry keeps the raw text, only the fingerprint is normalized
        Some(self.commit(ClipEntry::new_text(text, None)).await)
    }

    /// Persists a freshly captured clip. The clip stays in memory and is
    /// still handed out when writing through to disk fails.
    async fn commit(&mut self, clip: ClipEntry) -> ClipEntry {
        if let Err(err) = self.history.add_item(clip.clone()).await {
            tracing::warn!("Could not persist clip history, error: {err}");
        }
        if let Err(err) = self.history.maintain_limit().await {
            tracing::warn!("Could not enforce history capacity, error: {err}");
        }
        clip
    }

    /// Writes a history entry back to the system clipboard. An image entry
    /// whose backing file has disappeared is quietly skipped.
    pub async fn copy_item(&self, clip: &ClipEntry) -> Result<()> {
        if let Some(file_path) = clip.image_path() {
            if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
                return Ok(());
            }
            return self
                .backend
                .store_image(file_path)
                .await
                .context(error::AccessClipboardSnafu);
        }

        self.backend
            .store_text(clip.text().unwrap_or_default())
            .await
            .context(error::AccessClipboardSnafu)
    }

    pub async fn remove_item(&mut self, index: usize) -> Result<Option<ClipEntry>> {
        self.history.remove_item(index).await.context(error::PersistHistorySnafu)
    }

    pub async fn update_item<S>(&mut self, index: usize, content: S) -> Result<bool>
    where
        S: Into<String> + Send,
    {
        self.history.update_item(index, content).await.context(error::PersistHistorySnafu)
    }

    /// Clears the system clipboard, the fingerprints and the whole history,
    /// durable state included. Clearing the system clipboard is best effort.
    pub async fn clear_all(&mut self) -> Result<()> {
        if let Err(err) = self.backend.clear().await {
            tracing::warn!("Could not clear system clipboard, error: {err}");
        }
        self.fingerprint.reset();
        self.history.clear().await.context(error::PersistHistorySnafu)
    }
}
