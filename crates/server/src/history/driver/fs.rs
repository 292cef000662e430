use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use cliplog_base::{timestamp, ClipEntry};
use snafu::ResultExt;
use time::OffsetDateTime;

use crate::history::{driver::Driver, error, model, Error};

/// Durable storage backed by a plain text file and a directory of image
/// files. Directories are created lazily on the first write so that a fresh
/// profile starts without touching the disk.
pub struct FileSystemDriver {
    history_dir_path: PathBuf,
    history_file_path: PathBuf,
    image_dir_path: PathBuf,
}

impl FileSystemDriver {
    pub fn new<P>(history_dir_path: P) -> Self
    where
        P: AsRef<Path>,
    {
        let history_dir_path = history_dir_path.as_ref().to_path_buf();
        let history_file_path = history_file_path(&history_dir_path);
        let image_dir_path = image_dir_path(&history_dir_path);
        Self { history_dir_path, history_file_path, image_dir_path }
    }
}

#[async_trait]
impl Driver for FileSystemDriver {
    async fn load(&mut self) -> Result<Vec<ClipEntry>, Error> {
        let content = match tokio::fs::read(&self.history_file_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).context(error::ReadFileSnafu {
                    file_path: self.history_file_path.clone(),
                })
            }
        };

        let content = match simdutf8::basic::from_utf8(&content) {
            Ok(content) => Cow::Borrowed(content),
            Err(err) => {
                tracing::warn!(
                    "Contents of `{}` is not valid UTF-8, error: {err}",
                    self.history_file_path.display()
                );
                String::from_utf8_lossy(&content)
            }
        };

        Ok(model::decode(content.lines()))
    }

    async fn save(&mut self, clips: &[ClipEntry]) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.history_dir_path)
            .await
            .context(error::CreateDirectorySnafu { file_path: self.history_dir_path.clone() })?;

        let mut content = model::encode(clips).join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        tokio::fs::write(&self.history_file_path, content)
            .await
            .context(error::WriteFileSnafu { file_path: self.history_file_path.clone() })
    }

    async fn clear(&mut self) -> Result<(), Error> {
        drop(tokio::fs::remove_dir_all(&self.image_dir_path).await);

        match tokio::fs::remove_file(&self.history_file_path).await {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                Err(err).context(error::RemoveFileSnafu {
                    file_path: self.history_file_path.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    async fn store_image(
        &mut self,
        bytes: &[u8],
        timestamp: OffsetDateTime,
    ) -> Result<PathBuf, Error> {
        tokio::fs::create_dir_all(&self.image_dir_path)
            .await
            .context(error::CreateDirectorySnafu { file_path: self.image_dir_path.clone() })?;

        let file_path = image_file_path(&self.image_dir_path, timestamp);
        tokio::fs::write(&file_path, bytes)
            .await
            .with_context(|_| error::WriteFileSnafu { file_path: file_path.clone() })?;
        Ok(file_path)
    }

    async fn remove_image_files(&mut self, file_paths: &[PathBuf]) {
        for file_path in file_paths {
            tracing::debug!("Remove image file `{}`", file_path.display());
            drop(tokio::fs::remove_file(file_path).await);
        }
    }
}

pub fn history_file_path<P>(history_dir_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    [history_dir_path.as_ref(), Path::new(cliplog_base::HISTORY_FILE_NAME)].iter().collect()
}

fn image_dir_path<P>(history_dir_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    [history_dir_path.as_ref(), Path::new(cliplog_base::IMAGE_DIR_NAME)].iter().collect()
}

#[inline]
fn image_file_path<P>(image_dir_path: P, timestamp: OffsetDateTime) -> PathBuf
where
    P: AsRef<Path>,
{
    [image_dir_path.as_ref(), Path::new(&image_file_name(timestamp))].iter().collect()
}

#[inline]
fn image_file_name(timestamp: OffsetDateTime) -> String {
    format!("image_{}.png", timestamp::file_label(timestamp))
}
