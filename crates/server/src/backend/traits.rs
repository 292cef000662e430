use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::backend::error::Result;

/// Narrow view of the operating system clipboard. Reads answer for the
/// moment they are called, two consecutive calls may observe different
/// content.
#[async_trait]
pub trait ClipboardBackend: Sync + Send {
    /// Whether the clipboard currently holds image content. Backends answer
    /// `false` when they cannot tell.
    async fn has_image(&self) -> bool;

    async fn load_text(&self) -> Result<String>;

    async fn load_image(&self) -> Result<Bytes>;

    async fn store_text(&self, text: &str) -> Result<()>;

    async fn store_image(&self, file_path: &Path) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
