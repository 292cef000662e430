mod error;
mod macos;
mod mock;
mod traits;

use std::sync::Arc;

pub use self::{
    error::{Error, Result},
    macos::MacosClipboardBackend,
    mock::MockClipboardBackend,
    traits::ClipboardBackend,
};

#[must_use]
pub fn new_shared() -> Arc<dyn ClipboardBackend> { Arc::new(MacosClipboardBackend::new()) }
