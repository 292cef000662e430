mod driver;
mod error;
mod model;
mod store;

use std::path::{Path, PathBuf};

use cliplog_base::ClipEntry;
use time::OffsetDateTime;

pub use self::{
    error::Error,
    store::{DEFAULT_CAPACITY, HistoryStore},
};
use self::driver::Driver;

/// Owns the in-memory clips and the durable storage behind them. Every
/// mutation is written through to disk, the in-memory state is kept even when
/// persisting fails.
pub struct HistoryManager {
    file_path: PathBuf,

    store: HistoryStore,

    driver: Box<dyn Driver>,
}

impl HistoryManager {
    #[inline]
    pub fn new<P: AsRef<Path>>(history_dir_path: P, capacity: usize) -> Self {
        let history_dir_path = history_dir_path.as_ref();
        let file_path = driver::history_file_path(history_dir_path);
        let driver = Box::new(driver::FileSystemDriver::new(history_dir_path));
        Self { file_path, store: HistoryStore::with_capacity(capacity), driver }
    }

    #[inline]
    pub fn path(&self) -> &Path { &self.file_path }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize { self.store.capacity() }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.store.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ClipEntry] { self.store.items() }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ClipEntry> { self.store.get(index) }

    /// Replaces the in-memory clips with the durable file contents, returns
    /// the number of loaded clips. A missing file loads as an empty history.
    pub async fn load(&mut self) -> Result<usize, Error> {
        let clips = self.driver.load().await?;
        self.store.import(clips);
        Ok(self.store.len())
    }

    pub async fn save(&mut self) -> Result<(), Error> {
        self.driver.save(self.store.items()).await
    }

    pub async fn add_item(&mut self, clip: ClipEntry) -> Result<(), Error> {
        self.store.add(clip);
        self.save().await
    }

    /// Evicts the oldest clips beyond capacity, removes the image files they
    /// own and persists the remainder. Does nothing while within capacity.
    pub async fn maintain_limit(&mut self) -> Result<(), Error> {
        if self.store.excess().is_empty() {
            return Ok(());
        }

        let file_paths = collect_image_file_paths(self.store.excess());
        self.driver.remove_image_files(&file_paths).await;

        self.store.truncate_to_capacity();
        self.save().await
    }

    pub async fn remove_item(&mut self, index: usize) -> Result<Option<ClipEntry>, Error> {
        let Some(clip) = self.store.remove(index) else {
            return Ok(None);
        };

        if let Some(file_path) = clip.image_path() {
            self.driver.remove_image_files(&[file_path.to_path_buf()]).await;
        }

        self.save().await?;
        Ok(Some(clip))
    }

    /// Rewrites the content of the text clip at `index`, persisting on
    /// success. Image clips and out-of-range indices report `false`.
    pub async fn update_item<S>(&mut self, index: usize, content: S) -> Result<bool, Error>
    where
        S: Into<String> + Send,
    {
        if self.store.update_text(index, content) {
            self.save().await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Drops every clip along with the durable file and the image directory.
    /// Image file removal is best effort.
    pub async fn clear(&mut self) -> Result<(), Error> {
        let file_paths = collect_image_file_paths(self.store.items());
        self.driver.remove_image_files(&file_paths).await;

        self.store.clear();
        self.driver.clear().await
    }

    pub async fn store_image(
        &mut self,
        bytes: &[u8],
        timestamp: OffsetDateTime,
    ) -> Result<PathBuf, Error> {
        self.driver.store_image(bytes, timestamp).await
    }

    /// The durable line rendering, oldest clip first, without a trailing
    /// newline.
    #[must_use]
    pub fn export_text(&self) -> String { model::encode(self.store.items()).join("\n") }
}

fn collect_image_file_paths(clips: &[ClipEntry]) -> Vec<PathBuf> {
    clips.iter().filter_map(|clip| clip.image_path().map(Path::to_path_buf)).collect()
}

#[cfg(test)]
mod tests {
    use cliplog_base::ClipEntry;
    use time::macros::datetime;
    use tokio::runtime::Runtime;

    use crate::history::HistoryManager;

    #[test]
    fn test_load_from_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = HistoryManager::new(dir.path(), 10);
        let clip_count = Runtime::new().unwrap().block_on(manager.load()).unwrap();
        assert_eq!(clip_count, 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_clips_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 10);
            manager
                .add_item(ClipEntry::new_text("first", Some(datetime!(2024-01-01 10:00:00 +8))))
                .await
                .unwrap();
            manager
                .add_item(ClipEntry::new_text("second", Some(datetime!(2024-01-01 10:00:05 +8))))
                .await
                .unwrap();

            let mut reloaded = HistoryManager::new(dir.path(), 10);
            let clip_count = reloaded.load().await.unwrap();
            assert_eq!(clip_count, 2);
            assert_eq!(reloaded.items(), manager.items());
        });
    }

    #[test]
    fn test_durable_file_format() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 10);
            manager
                .add_item(ClipEntry::new_text("first", Some(datetime!(2024-01-01 10:00:00 +8))))
                .await
                .unwrap();
            manager
                .add_item(ClipEntry::new_image(
                    "/tmp/x.png",
                    Some(datetime!(2024-01-01 10:00:05 +8)),
                ))
                .await
                .unwrap();

            let content = std::fs::read_to_string(manager.path()).unwrap();
            assert_eq!(
                content,
                "2024-01-01 10:00:00\tfirst\n2024-01-01 10:00:05\t/tmp/x.png\tIMAGE\n"
            );
            assert_eq!(
                manager.export_text(),
                "2024-01-01 10:00:00\tfirst\n2024-01-01 10:00:05\t/tmp/x.png\tIMAGE"
            );
        });
    }

    #[test]
    fn test_maintain_limit_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 2);
            for content in ["a", "b", "c"] {
                manager.add_item(ClipEntry::new_text(content, None)).await.unwrap();
            }

            manager.maintain_limit().await.unwrap();
            let items: Vec<_> = manager.items().iter().filter_map(ClipEntry::text).collect();
            assert_eq!(items, ["c", "b"]);

            let mut reloaded = HistoryManager::new(dir.path(), 2);
            assert_eq!(reloaded.load().await.unwrap(), 2);
        });
    }

    #[test]
    fn test_maintain_limit_removes_evicted_image_file() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 2);
            let timestamp = datetime!(2024-01-01 10:00:00 +8);
            let file_path = manager.store_image(b"not really a png", timestamp).await.unwrap();
            assert!(file_path.exists());

            manager.add_item(ClipEntry::new_image(&file_path, Some(timestamp))).await.unwrap();
            manager.add_item(ClipEntry::new_text("b", None)).await.unwrap();
            manager.add_item(ClipEntry::new_text("c", None)).await.unwrap();

            manager.maintain_limit().await.unwrap();
            assert_eq!(manager.len(), 2);
            assert!(!file_path.exists());
        });
    }

    #[test]
    fn test_remove_item_removes_backing_image_file() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 10);
            let timestamp = datetime!(2024-01-01 10:00:00 +8);
            let file_path = manager.store_image(b"bytes", timestamp).await.unwrap();
            manager.add_item(ClipEntry::new_image(&file_path, Some(timestamp))).await.unwrap();

            let removed = manager.remove_item(0).await.unwrap();
            assert!(removed.is_some_and(|clip| clip.is_image()));
            assert!(manager.is_empty());
            assert!(!file_path.exists());

            assert!(manager.remove_item(5).await.unwrap().is_none());
        });
    }

    #[test]
    fn test_update_item() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 10);
            manager
                .add_item(ClipEntry::new_text("draft", Some(datetime!(2024-01-01 10:00:00 +8))))
                .await
                .unwrap();

            assert!(manager.update_item(0, "final").await.unwrap());
            assert!(!manager.update_item(3, "nope").await.unwrap());

            let mut reloaded = HistoryManager::new(dir.path(), 10);
            drop(reloaded.load().await.unwrap());
            assert_eq!(reloaded.get(0).and_then(ClipEntry::text), Some("final"));
        });
    }

    #[test]
    fn test_clear_removes_durable_state() {
        let dir = tempfile::tempdir().unwrap();
        Runtime::new().unwrap().block_on(async {
            let mut manager = HistoryManager::new(dir.path(), 10);
            let timestamp = datetime!(2024-01-01 10:00:00 +8);
            let file_path = manager.store_image(b"bytes", timestamp).await.unwrap();
            manager.add_item(ClipEntry::new_image(&file_path, Some(timestamp))).await.unwrap();
            manager.add_item(ClipEntry::new_text("text", None)).await.unwrap();

            manager.clear().await.unwrap();
            assert!(manager.is_empty());
            assert!(!manager.path().exists());
            assert!(!file_path.exists());
            assert!(!file_path.parent().unwrap().exists());

            // clearing an already clean profile is not an error
            manager.clear().await.unwrap();
        });
    }
}
