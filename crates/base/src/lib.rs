pub mod config;
mod entry;
mod fingerprint;
mod kind;
pub mod timestamp;

use std::path::PathBuf;

use directories::ProjectDirs;
use lazy_static::lazy_static;

pub use self::{
    entry::Entry as ClipEntry,
    fingerprint::{digest_image, normalize_text, Fingerprint},
    kind::Kind as ClipKind,
};

pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_NAME: &str = "cliplog";

pub const DAEMON_PROGRAM_NAME: &str = "cliplogd";
pub const DAEMON_CONFIG_NAME: &str = "cliplogd.toml";

pub const HISTORY_FILE_NAME: &str = "history.txt";
pub const IMAGE_DIR_NAME: &str = "images";

lazy_static! {
    pub static ref PROJECT_CONFIG_DIR: PathBuf = ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME)
        .expect("Creating `ProjectDirs` should always success")
        .config_dir()
        .to_path_buf();
}
