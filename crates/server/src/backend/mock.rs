use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use snafu::OptionExt;

use crate::backend::{error, ClipboardBackend, Result};

/// In-memory clipboard with scriptable read failures, for tests.
#[derive(Clone, Debug, Default)]
pub struct MockClipboardBackend(Arc<Mutex<Inner>>);

#[derive(Debug, Default)]
struct Inner {
    text: String,
    image: Option<Bytes>,
    fail_load_text: bool,
    fail_load_image: bool,
}

impl MockClipboardBackend {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn set_text<S: Into<String>>(&self, text: S) { self.0.lock().text = text.into(); }

    pub fn set_image<B: Into<Bytes>>(&self, bytes: B) { self.0.lock().image = Some(bytes.into()); }

    pub fn remove_image(&self) { self.0.lock().image = None; }

    pub fn set_fail_load_text(&self, fail: bool) { self.0.lock().fail_load_text = fail; }

    pub fn set_fail_load_image(&self, fail: bool) { self.0.lock().fail_load_image = fail; }

    #[must_use]
    pub fn text(&self) -> String { self.0.lock().text.clone() }

    #[must_use]
    pub fn image(&self) -> Option<Bytes> { self.0.lock().image.clone() }
}

#[async_trait]
impl ClipboardBackend for MockClipboardBackend {
    // Presence is reported even when loading is set up to fail, so that the
    // capability check and the read can disagree like they can on a real
    // clipboard.
    #[inline]
    async fn has_image(&self) -> bool { self.0.lock().image.is_some() }

    #[inline]
    async fn load_text(&self) -> Result<String> {
        let inner = self.0.lock();
        if inner.fail_load_text {
            return error::UnavailableSnafu { operation: "text loading" }.fail();
        }
        Ok(inner.text.clone())
    }

    #[inline]
    async fn load_image(&self) -> Result<Bytes> {
        let inner = self.0.lock();
        if inner.fail_load_image {
            return error::UnavailableSnafu { operation: "image loading" }.fail();
        }
        inner.image.clone().context(error::UnavailableSnafu { operation: "image loading" })
    }

    #[inline]
    async fn store_text(&self, text: &str) -> Result<()> {
        let mut inner = self.0.lock();
        inner.text = text.to_owned();
        inner.image = None;
        Ok(())
    }

    #[inline]
    async fn store_image(&self, file_path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(file_path)
            .await
            .ok()
            .context(error::UnavailableSnafu { operation: "image storing" })?;
        let mut inner = self.0.lock();
        inner.image = Some(Bytes::from(bytes));
        inner.text.clear();
        Ok(())
    }

    #[inline]
    async fn clear(&self) -> Result<()> {
        let mut inner = self.0.lock();
        inner.text.clear();
        inner.image = None;
        Ok(())
    }
}
