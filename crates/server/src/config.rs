use std::path::PathBuf;

use crate::ClipboardWatcherOptions;

#[derive(Clone, Debug)]
pub struct Config {
    pub max_history: usize,

    pub history_dir_path: PathBuf,

    pub watcher: ClipboardWatcherOptions,
}
