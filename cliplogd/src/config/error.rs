use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not read config file {}, error: {source}", file_path.display()))]
    ReadConfig { file_path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not parse config file {}, error: {source}", file_path.display()))]
    ParseConfig { file_path: PathBuf, source: toml::de::Error },

    #[snafu(display("Could not resolve file path {}, error: {source}", file_path.display()))]
    ResolveFilePath { file_path: PathBuf, source: std::io::Error },
}
