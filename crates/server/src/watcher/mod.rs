mod options;

use std::sync::Arc;

use cliplog_base::ClipEntry;
use futures::{FutureExt, StreamExt};
use tokio::sync::{broadcast, Mutex};

pub use self::{
    options::{Options as ClipboardWatcherOptions, DEFAULT_POLL_INTERVAL},
    Worker as ClipboardWatcherWorker,
};
use crate::service::ClipboardService;

pub struct ClipboardWatcher {
    clip_sender: broadcast::Sender<ClipEntry>,
}

impl ClipboardWatcher {
    pub fn new(
        service: Arc<Mutex<ClipboardService>>,
        opts: ClipboardWatcherOptions,
    ) -> (Self, ClipboardWatcherWorker) {
        let (clip_sender, _event_receiver) = broadcast::channel(16);
        let watcher = Self { clip_sender: clip_sender.clone() };
        let worker = ClipboardWatcherWorker { service, clip_sender, opts };
        (watcher, worker)
    }

    #[inline]
    pub fn subscribe(&self) -> broadcast::Receiver<ClipEntry> { self.clip_sender.subscribe() }
}

pub struct Worker {
    service: Arc<Mutex<ClipboardService>>,
    clip_sender: broadcast::Sender<ClipEntry>,
    opts: ClipboardWatcherOptions,
}

impl Worker {
    #[allow(clippy::redundant_pub_crate)]
    pub async fn serve(self, shutdown_signal: sigfinn::Shutdown) {
        let Self { service, clip_sender, opts: ClipboardWatcherOptions { poll_interval } } = self;
        let mut shutdown_signal = shutdown_signal.into_stream();

        service.lock().await.initialize().await;
        tracing::info!("Poll clipboard every {poll_interval:?}");

        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_signal.next() => {
                    tracing::info!("Stop polling clipboard");
                    return;
                }
                _ = interval.tick() => {}
            }

            // a tick in flight is never interrupted, shutdown waits for it
            let maybe_clip = service.lock().await.poll_once().await;
            if let Some(clip) = maybe_clip {
                let _unused = clip_sender.send(clip);
            }
        }
    }
}
