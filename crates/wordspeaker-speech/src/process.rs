//! Host TTS process plumbing shared by the command-line engines.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::SpeechError;

/// Run `command`, feed `text` on stdin, and wait for it to exit.
///
/// The child is killed if the returned future is dropped before completion.
pub async fn run_with_stdin(
    engine: &str,
    mut command: Command,
    text: &str,
) -> Result<(), SpeechError> {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|e| SpeechError::SpawnFailed {
        engine: engine.to_string(),
        source: e,
    })?;

    let mut stdin = child.stdin.take().ok_or_else(|| SpeechError::StdinWrite {
        engine: engine.to_string(),
    })?;
    stdin
        .write_all(text.as_bytes())
        .await
        .map_err(|_| SpeechError::StdinWrite {
            engine: engine.to_string(),
        })?;
    // EOF tells the engine the utterance is complete.
    drop(stdin);

    let output = child.wait_with_output().await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(SpeechError::ProcessFailed {
            engine: engine.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run `command` to completion and return its stdout.
pub async fn capture_stdout(engine: &str, mut command: Command) -> Result<String, SpeechError> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| SpeechError::VoiceEnumeration {
            engine: engine.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(SpeechError::VoiceEnumeration {
            engine: engine.to_string(),
            message: format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
