mod fs;

use std::path::PathBuf;

use async_trait::async_trait;
use cliplog_base::ClipEntry;
use time::OffsetDateTime;

pub use self::fs::{history_file_path, FileSystemDriver};
use crate::history::Error;

#[async_trait]
pub trait Driver: Send + Sync {
    async fn load(&mut self) -> Result<Vec<ClipEntry>, Error>;

    async fn save(&mut self, clips: &[ClipEntry]) -> Result<(), Error>;

    async fn clear(&mut self) -> Result<(), Error>;

    async fn store_image(
        &mut self,
        bytes: &[u8],
        timestamp: OffsetDateTime,
    ) -> Result<PathBuf, Error>;

    async fn remove_image_files(&mut self, file_paths: &[PathBuf]);
}
