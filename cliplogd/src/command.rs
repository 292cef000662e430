use std::{io::Write, path::PathBuf, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use cliplog_server::ClipboardService;
use snafu::{OptionExt, ResultExt};
use tokio::runtime::Runtime;

use crate::{
    config::Config,
    error::{self, Error},
    pid_file::PidFile,
};

#[derive(Parser)]
#[command(name = cliplog_base::DAEMON_PROGRAM_NAME, author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    subcommand: Option<Commands>,

    #[clap(long = "no-daemon", help = "Do not run as daemon")]
    no_daemon: bool,

    #[clap(long = "replace", short = 'r', help = "Try to replace existing daemon")]
    replace: bool,

    #[clap(
        long = "config",
        short = 'c',
        env = "CLIPLOGD_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "history-dir",
        env = "CLIPLOGD_HISTORY_DIR_PATH",
        help = "Specify a history directory"
    )]
    history_dir_path: Option<PathBuf>,

    #[clap(
        long = "max-history",
        env = "CLIPLOGD_MAX_HISTORY",
        help = "Specify the maximum number of clips to keep"
    )]
    max_history: Option<usize>,

    #[clap(
        long = "poll-interval-ms",
        env = "CLIPLOGD_POLL_INTERVAL_MS",
        help = "Specify the clipboard poll interval in milliseconds"
    )]
    poll_interval_ms: Option<u64>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "List history entries with their indexes")]
    List,

    #[clap(about = "Export the history as text, to a file or to stdout")]
    Export { file_path: Option<PathBuf> },

    #[clap(about = "Copy a history entry back onto the system clipboard")]
    Copy { index: usize },

    #[clap(about = "Clear the history and the system clipboard")]
    Clear,
}

impl Default for Cli {
    #[inline]
    fn default() -> Self { Self::parse() }
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        match self.subcommand {
            Some(Commands::Version) => {
                std::io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .expect("failed to write to stdout");
                Ok(())
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                Ok(())
            }
            Some(Commands::DefaultConfig) => {
                let config_text =
                    toml::to_string_pretty(&Config::default()).expect("`Config` is serializable");
                std::io::stdout()
                    .write_all(config_text.as_bytes())
                    .expect("failed to write to stdout");
                Ok(())
            }
            Some(Commands::List) => {
                let config = self.load_config()?;
                run_list(config)
            }
            Some(Commands::Export { ref file_path }) => {
                let config = self.load_config()?;
                run_export(config, file_path.clone())
            }
            Some(Commands::Copy { index }) => {
                let config = self.load_config()?;
                run_copy(config, index)
            }
            Some(Commands::Clear) => {
                let config = self.load_config()?;
                run_clear(config)
            }
            None => {
                let config = self.load_config()?;
                run_cliplogd(config, self.replace)
            }
        }
    }

    fn load_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config_file {
            Some(config_file) => Config::load(config_file)?,
            None => Config::load_or_default(Config::default_path())?,
        };

        config.daemonize = !self.no_daemon;

        if let Some(history_dir_path) = &self.history_dir_path {
            config.history_dir_path = history_dir_path.clone();
        }

        if let Some(max_history) = self.max_history {
            config.max_history = max_history;
        }

        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.watcher.poll_interval_ms = poll_interval_ms;
        }

        Ok(config)
    }
}

#[allow(clippy::cognitive_complexity)]
fn run_cliplogd(config: Config, replace: bool) -> Result<(), Error> {
    let daemonize = config.daemonize;
    let pid_file = PidFile::from(config.pid_file.clone());
    if daemonize {
        if pid_file.exists() && replace {
            let pid = pid_file.try_load()?;
            kill_other(pid)?;

            // wait for the other instance to release its resources
            std::thread::sleep(Duration::from_millis(200));
        }

        daemonize::Daemonize::new().pid_file(pid_file.path()).start()?;
    }

    config.log.registry();
    let config = cliplog_server::Config::from(config);

    tracing::info!(
        "{} is initializing, pid: {}",
        cliplog_base::DAEMON_PROGRAM_NAME,
        std::process::id()
    );

    tracing::info!("Initializing Tokio runtime");

    let exit_status = match Runtime::new().context(error::InitializeTokioRuntimeSnafu) {
        Ok(runtime) => {
            runtime.block_on(cliplog_server::serve_with_shutdown(config)).map_err(Error::from)
        }
        Err(err) => Err(err),
    };

    if daemonize {
        if let Err(err) = pid_file.remove() {
            tracing::error!("{err}");
        }
    }

    tracing::info!("{} is shutdown", cliplog_base::DAEMON_PROGRAM_NAME);
    exit_status
}

async fn load_service(config: Config) -> Result<ClipboardService, Error> {
    let Config { max_history, history_dir_path, .. } = config;
    let mut service = ClipboardService::new(
        cliplog_server::backend::new_shared(),
        history_dir_path,
        max_history,
    );
    let _clip_count = service.load().await.context(error::ServiceSnafu)?;
    Ok(service)
}

fn run_list(config: Config) -> Result<(), Error> {
    let runtime = Runtime::new().context(error::InitializeTokioRuntimeSnafu)?;
    runtime.block_on(async {
        let service = load_service(config).await?;
        for (index, clip) in service.items().iter().enumerate() {
            println!("{index}: {}", clip.preview(100));
        }
        Ok(())
    })
}

fn run_export(config: Config, file_path: Option<PathBuf>) -> Result<(), Error> {
    let runtime = Runtime::new().context(error::InitializeTokioRuntimeSnafu)?;
    runtime.block_on(async {
        let service = load_service(config).await?;
        let text = service.export_text();
        match file_path {
            Some(file_path) => tokio::fs::write(&file_path, text)
                .await
                .context(error::WriteExportFileSnafu { file_path }),
            None => {
                std::io::stdout().write_all(text.as_bytes()).expect("failed to write to stdout");
                Ok(())
            }
        }
    })
}

fn run_copy(config: Config, index: usize) -> Result<(), Error> {
    let runtime = Runtime::new().context(error::InitializeTokioRuntimeSnafu)?;
    runtime.block_on(async {
        let service = load_service(config).await?;
        let clip = service.item(index).context(error::HistoryItemNotFoundSnafu { index })?;
        service.copy_item(clip).await.context(error::ServiceSnafu)
    })
}

fn run_clear(config: Config) -> Result<(), Error> {
    let runtime = Runtime::new().context(error::InitializeTokioRuntimeSnafu)?;
    runtime.block_on(async {
        let mut service = load_service(config).await?;
        service.clear_all().await.context(error::ServiceSnafu)
    })
}

#[allow(unsafe_code)]
#[inline]
fn kill_other(pid: libc::pid_t) -> Result<(), Error> {
    let ret = unsafe { libc::kill(pid, libc::SIGTERM) };
    if ret != 0 {
        return Err(Error::SendSignalTermination { pid });
    }
    Ok(())
}
