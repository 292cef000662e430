use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to read file {}, error: {source}", file_path.display()))]
    ReadFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to write file {}, error: {source}", file_path.display()))]
    WriteFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to create directory {}, error: {source}", file_path.display()))]
    CreateDirectory { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to remove file {}, error: {source}", file_path.display()))]
    RemoveFile { source: std::io::Error, file_path: PathBuf },
}
