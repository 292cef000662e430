use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not spawn `{program}`, error: {source}"))]
    SpawnProgram { program: String, source: std::io::Error },

    #[snafu(display("Could not wait for `{program}`, error: {source}"))]
    WaitProgram { program: String, source: std::io::Error },

    #[snafu(display("Could not write to stdin of `{program}`, error: {source}"))]
    WriteStdin { program: String, source: std::io::Error },

    #[snafu(display("Timeout while waiting for `{program}`"))]
    Timeout { program: String },

    #[snafu(display("`{program}` exited with {exit_status}"))]
    ProgramFailed { program: String, exit_status: std::process::ExitStatus },

    #[snafu(display("Could not decode clipboard image data, error: {source}"))]
    DecodeImageData { source: hex::FromHexError },

    #[snafu(display("Clipboard does not provide {operation}"))]
    Unavailable { operation: String },
}
