use std::{borrow::Cow, path::Path, process::Stdio, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use snafu::{ensure, OptionExt, ResultExt};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::backend::{error, ClipboardBackend, Result};

const OSASCRIPT: &str = "/usr/bin/osascript";
const PBCOPY: &str = "/usr/bin/pbcopy";
const PBPASTE: &str = "/usr/bin/pbpaste";

// A stalled clipboard helper must cost one tick, not wedge the scheduler.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

// `pbpaste` picks its output encoding from the locale, anything non UTF-8
// mangles multi-byte content.
const UTF8_LOCALE: &str = "en_US.UTF-8";

/// Clipboard access through the stock command line helpers, `pbcopy`,
/// `pbpaste` and `osascript`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacosClipboardBackend;

impl MacosClipboardBackend {
    #[must_use]
    pub const fn new() -> Self { Self }
}

#[async_trait]
impl ClipboardBackend for MacosClipboardBackend {
    async fn has_image(&self) -> bool {
        let mut command = Command::new(OSASCRIPT);
        let _unused = command.args(["-e", "return (clipboard info) as string"]);

        match output_of(&mut command, OSASCRIPT).await {
            Ok(output) => {
                let info = String::from_utf8_lossy(&output);
                info.contains("«class PNGf»") || info.contains("«class TIFF»")
            }
            Err(err) => {
                tracing::debug!("Could not query clipboard info, error: {err}");
                false
            }
        }
    }

    async fn load_text(&self) -> Result<String> {
        let mut command = Command::new(PBPASTE);
        let _unused = command
            .args(["-Prefer", "txt"])
            .env("LANG", UTF8_LOCALE)
            .env("LC_ALL", UTF8_LOCALE)
            .env("LC_CTYPE", UTF8_LOCALE);

        let output = output_of(&mut command, PBPASTE).await?;
        let text = match simdutf8::basic::from_utf8(&output) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => String::from_utf8_lossy(&output),
        };
        Ok(text.trim_end_matches(['\r', '\n']).to_owned())
    }

    async fn load_image(&self) -> Result<Bytes> {
        // TIFF is the fallback, screenshots and most applications offer PNG
        match load_image_as_class("PNGf").await {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => load_image_as_class("TIFF").await,
        }
    }

    async fn store_text(&self, text: &str) -> Result<()> {
        let mut command = Command::new(PBCOPY);
        write_stdin_and_wait(&mut command, PBCOPY, text.as_bytes()).await
    }

    async fn store_image(&self, file_path: &Path) -> Result<()> {
        let script = format!(
            "set the clipboard to (read (POSIX file \"{}\") as «class PNGf»)",
            file_path.display()
        );
        let mut command = Command::new(OSASCRIPT);
        let _unused = command.args(["-e", &script]);

        let _output = output_of(&mut command, OSASCRIPT).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut command = Command::new(PBCOPY);
        write_stdin_and_wait(&mut command, PBCOPY, b"").await
    }
}

async fn load_image_as_class(class: &str) -> Result<Bytes> {
    let script = format!("set d to the clipboard as «class {class}»");
    let mut command = Command::new(OSASCRIPT);
    let _unused = command.args(["-e", &script, "-e", "return d"]);

    let output = output_of(&mut command, OSASCRIPT).await?;
    decode_apple_hex(&String::from_utf8_lossy(&output), class)
}

// `osascript` renders raw data as `«data PNGf4950...»`, the hex body may
// contain spaces.
fn decode_apple_hex(output: &str, class: &str) -> Result<Bytes> {
    let prefix = format!("«data {class}");
    let mut hex_body = output.trim();
    hex_body = hex_body.strip_prefix(prefix.as_str()).unwrap_or(hex_body);
    hex_body = hex_body.strip_suffix('»').unwrap_or(hex_body);

    let bytes =
        hex::decode(hex_body.replace(' ', "")).context(error::DecodeImageDataSnafu)?;
    Ok(Bytes::from(bytes))
}

async fn output_of(command: &mut Command, program: &str) -> Result<Vec<u8>> {
    let child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context(error::SpawnProgramSnafu { program })?;

    let output = tokio::time::timeout(COMMAND_TIMEOUT, child.wait_with_output())
        .await
        .ok()
        .context(error::TimeoutSnafu { program })?
        .context(error::WaitProgramSnafu { program })?;

    ensure!(
        output.status.success(),
        error::ProgramFailedSnafu { program, exit_status: output.status }
    );
    Ok(output.stdout)
}

async fn write_stdin_and_wait(command: &mut Command, program: &str, input: &[u8]) -> Result<()> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context(error::SpawnProgramSnafu { program })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).await.context(error::WriteStdinSnafu { program })?;
        // the pipe must close before the program flushes and exits
        drop(stdin);
    }

    let exit_status = tokio::time::timeout(COMMAND_TIMEOUT, child.wait())
        .await
        .ok()
        .context(error::TimeoutSnafu { program })?
        .context(error::WaitProgramSnafu { program })?;

    ensure!(exit_status.success(), error::ProgramFailedSnafu { program, exit_status });
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::backend::macos::decode_apple_hex;

    #[test]
    fn test_decode_apple_hex() {
        let bytes = decode_apple_hex("«data PNGf89504e47»", "PNGf").unwrap();
        assert_eq!(bytes.as_ref(), b"\x89PNG");
    }

    #[test]
    fn test_decode_apple_hex_with_spaces_and_newline() {
        let bytes = decode_apple_hex("«data TIFF4d4d 002a»\n", "TIFF").unwrap();
        assert_eq!(bytes.as_ref(), b"MM\x00\x2a");
    }

    #[test]
    fn test_decode_apple_hex_without_wrapper() {
        let bytes = decode_apple_hex("89504e47", "PNGf").unwrap();
        assert_eq!(bytes.as_ref(), b"\x89PNG");
    }

    #[test]
    fn test_decode_apple_hex_rejects_garbage() {
        assert!(decode_apple_hex("«data PNGfzz»", "PNGf").is_err());
        assert!(decode_apple_hex("«data PNGf123»", "PNGf").is_err());
    }
}
