pub mod backend;
mod config;
mod error;
mod history;
mod service;
mod watcher;

use std::{future::Future, pin::Pin, sync::Arc};

use futures::{FutureExt, StreamExt};
use sigfinn::{ExitStatus, Handle, LifecycleManager, Shutdown};
use snafu::ResultExt;
use tokio::sync::{broadcast::error::RecvError, Mutex};

pub use self::{
    config::Config,
    error::{Error, Result},
    history::{HistoryManager, DEFAULT_CAPACITY as DEFAULT_HISTORY_CAPACITY},
    service::{ClipboardService, Error as ServiceError},
    watcher::{ClipboardWatcherOptions, DEFAULT_POLL_INTERVAL},
};
use self::watcher::{ClipboardWatcher, ClipboardWatcherWorker};

/// # Errors
///
/// This function will return an error if the server fails to start.
pub async fn serve_with_shutdown(
    Config { max_history, history_dir_path, watcher: watcher_opts }: Config,
) -> Result<()> {
    let backend = backend::new_shared();

    let service = {
        tracing::info!("History directory: `{path}`", path = history_dir_path.display());
        let mut service = ClipboardService::new(backend, &history_dir_path, max_history);

        tracing::info!(
            "Load history from `{path}`",
            path = service.history_file_path().display()
        );
        let clip_count = service.load().await.context(error::LoadHistorySnafu)?;
        if clip_count > 0 {
            tracing::info!("{clip_count} clip(s) loaded");
        }

        service.maintain_limit().await.context(error::EnforceHistoryCapacitySnafu)?;

        Arc::new(Mutex::new(service))
    };

    let (clipboard_watcher, watcher_worker) = ClipboardWatcher::new(service, watcher_opts);

    let lifecycle_manager = LifecycleManager::<Error>::new();
    let handle = lifecycle_manager.handle();
    let _handle = lifecycle_manager
        .spawn("clipboard watcher", create_clipboard_watcher_future(watcher_worker))
        .spawn("clip event listener", create_clip_listener_future(clipboard_watcher, handle));

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

fn create_clipboard_watcher_future(
    worker: ClipboardWatcherWorker,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            worker.serve(shutdown_signal).await;
            tracing::info!("ClipboardWatcher is shut down gracefully");
            ExitStatus::Success
        }
        .boxed()
    }
}

fn create_clip_listener_future(
    watcher: ClipboardWatcher,
    handle: Handle<Error>,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            serve_clip_listener(&watcher, &handle, shutdown_signal).await;
            tracing::info!("Clip event listener is shut down gracefully");
            ExitStatus::Success
        }
        .boxed()
    }
}

#[allow(clippy::redundant_pub_crate)]
async fn serve_clip_listener(
    watcher: &ClipboardWatcher,
    handle: &Handle<Error>,
    shutdown_signal: Shutdown,
) {
    let mut shutdown_signal = shutdown_signal.into_stream();
    let mut clip_recv = watcher.subscribe();

    loop {
        let maybe_clip = tokio::select! {
            clip = clip_recv.recv().fuse() => clip,
            _ = shutdown_signal.next() => break,
        };

        match maybe_clip {
            Ok(clip) => {
                tracing::info!(
                    "New clip: {kind} [{preview}]",
                    kind = clip.kind(),
                    preview = clip.preview(30)
                );
            }
            Err(RecvError::Closed) => {
                tracing::info!("ClipboardWatcher is closed, shut the server down");
                handle.shutdown();
                break;
            }
            Err(RecvError::Lagged(_)) => {}
        }
    }
}
