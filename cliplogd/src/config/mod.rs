mod error;
mod log;
mod watcher;

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{error::Error, log::LogConfig, watcher::WatcherConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "Config::default_daemonize")]
    pub daemonize: bool,

    #[serde(default = "Config::default_pid_file_path")]
    pub pid_file: PathBuf,

    #[serde(default = "Config::default_max_history")]
    pub max_history: usize,

    #[serde(default = "Config::default_history_dir_path")]
    pub history_dir_path: PathBuf,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub watcher: WatcherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemonize: Self::default_daemonize(),
            pid_file: Self::default_pid_file_path(),
            max_history: Self::default_max_history(),
            history_dir_path: Self::default_history_dir_path(),
            log: LogConfig::default(),
            watcher: WatcherConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            cliplog_base::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(cliplog_base::DAEMON_CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn default_history_dir_path() -> PathBuf {
        cliplog_base::config::default_history_dir_path()
    }

    #[inline]
    pub const fn default_daemonize() -> bool { true }

    #[inline]
    pub const fn default_max_history() -> usize { cliplog_server::DEFAULT_HISTORY_CAPACITY }

    #[inline]
    pub fn default_pid_file_path() -> PathBuf {
        let base_dirs = BaseDirs::new().expect("`BaseDirs::new` always success");
        [
            base_dirs.runtime_dir().map_or_else(std::env::temp_dir, PathBuf::from),
            PathBuf::from(format!("{}.pid", cliplog_base::DAEMON_PROGRAM_NAME)),
        ]
        .into_iter()
        .collect()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = std::fs::read_to_string(&path)
            .context(error::ReadConfigSnafu { file_path: path.as_ref().to_path_buf() })?;
        let mut config: Self = toml::from_str(&data)
            .context(error::ParseConfigSnafu { file_path: path.as_ref().to_path_buf() })?;

        if config.max_history == 0 {
            config.max_history = Self::default_max_history();
        }

        config.history_dir_path = resolve_path(&config.history_dir_path)?;
        if let Some(file_path) = config.log.file_path.take() {
            config.log.file_path = Some(resolve_path(&file_path)?);
        }

        Ok(config)
    }

    /// Falls back to the default configuration when no file is present, so
    /// the daemon runs without any setup.
    #[inline]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

impl From<Config> for cliplog_server::Config {
    fn from(Config { max_history, history_dir_path, watcher, .. }: Config) -> Self {
        let watcher = cliplog_server::ClipboardWatcherOptions::from(watcher);
        Self { max_history, history_dir_path, watcher }
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf, Error> {
    path.try_resolve()
        .map(Cow::into_owned)
        .with_context(|_| error::ResolveFilePathSnafu { file_path: path.to_path_buf() })
}
