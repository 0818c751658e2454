use anyhow::{anyhow, bail, Context};
use domain::AudioClip;
use shared::types::Result;
use shared::utils::is_supported_audio_file;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info};

const RECORDING_FILE_NAME: &str = "recording.wav";

/// Captures microphone audio by running an external recorder program that
/// writes a WAV file until it is interrupted.
pub struct CommandRecorder {
    program: String,
    output_path: PathBuf,
    child: Option<Child>,
}

impl CommandRecorder {
    pub fn new(program: impl Into<String>) -> Self {
        let output_path = std::env::temp_dir()
            .join(format!("voice_chat-{}-{}", std::process::id(), RECORDING_FILE_NAME));
        Self::with_output(program, output_path)
    }

    pub fn with_output(program: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            output_path: output_path.into(),
            child: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.child.is_some()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_recording() {
            bail!("Recording is already in progress");
        }
        if self.output_path.exists() {
            fs::remove_file(&self.output_path)?;
        }

        let args = recorder_args(&self.program, &self.output_path);
        debug!(program = %self.program, ?args, "starting recorder");
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start recorder '{}'", self.program))?;
        info!(pid = child.id(), "recording started");
        self.child = Some(child);
        Ok(())
    }

    /// Stop the recorder and hand back what it captured.
    pub fn stop(&mut self) -> Result<AudioClip> {
        let mut child = self
            .child
            .take()
            .ok_or_else(|| anyhow!("No recording in progress"))?;
        interrupt(&mut child)?;
        let status = child.wait()?;
        debug!(?status, "recorder exited");

        let bytes = fs::read(&self.output_path)
            .with_context(|| format!("Recorder did not write {:?}", self.output_path))?;
        if bytes.is_empty() {
            bail!("Recorder produced no audio");
        }
        info!(bytes = bytes.len(), "recording stopped");
        Ok(AudioClip::new(RECORDING_FILE_NAME, bytes))
    }
}

impl Drop for CommandRecorder {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn recorder_args(program: &str, output: &Path) -> Vec<String> {
    let output = output.display().to_string();
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);
    match name {
        "arecord" => vec![
            "-q".into(),
            "-f".into(),
            "cd".into(),
            "-t".into(),
            "wav".into(),
            output,
        ],
        "rec" | "sox" => vec!["-q".into(), output],
        _ => vec![output],
    }
}

// Recorders only finalize the WAV header on SIGINT.
#[cfg(unix)]
fn interrupt(child: &mut Child) -> Result<()> {
    let status = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()?;
    if !status.success() {
        child.kill()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) -> Result<()> {
    child.kill()?;
    Ok(())
}

/// Read an existing audio file into a clip for transcription.
pub fn load_clip(path: &Path) -> Result<AudioClip> {
    if !is_supported_audio_file(path) {
        bail!("Unsupported audio format: {}", path.display());
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("Audio file {} is empty", path.display());
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(RECORDING_FILE_NAME)
        .to_string();
    Ok(AudioClip::new(file_name, bytes))
}
