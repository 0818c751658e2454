use anyhow::Context;
use domain::{Language, SpeechOutput};
use shared::types::Result;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Reads replies aloud through an external text-to-speech program.
pub struct CommandSpeaker {
    program: String,
    rate: f32,
    child: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, rate: f32) -> Self {
        Self {
            program: program.into(),
            rate,
            child: None,
        }
    }

    fn words_per_minute(&self) -> u32 {
        (BASE_WORDS_PER_MINUTE * self.rate).round().max(1.0) as u32
    }

    // Utterances queue up: wait for the previous one before starting the next.
    async fn finish_previous(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.wait().await?;
        }
        Ok(())
    }
}

impl SpeechOutput for CommandSpeaker {
    async fn speak(&mut self, text: &str, language: Language) -> Result<()> {
        self.finish_previous().await?;
        let args = speaker_args(&self.program, self.words_per_minute(), language, text);
        debug!(program = %self.program, language = %language, "speaking reply");
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start speech program '{}'", self.program))?;
        self.child = Some(child);
        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                child.kill().await?;
            } else {
                child.wait().await?;
            }
        }
        Ok(())
    }
}

/// Used with `--no-speech`.
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl SpeechOutput for SilentSpeaker {
    async fn speak(&mut self, _text: &str, _language: Language) -> Result<()> {
        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The speaker picked at startup.
pub enum Speaker {
    Command(CommandSpeaker),
    Silent(SilentSpeaker),
}

impl SpeechOutput for Speaker {
    async fn speak(&mut self, text: &str, language: Language) -> Result<()> {
        match self {
            Speaker::Command(speaker) => speaker.speak(text, language).await,
            Speaker::Silent(speaker) => speaker.speak(text, language).await,
        }
    }

    async fn cancel(&mut self) -> Result<()> {
        match self {
            Speaker::Command(speaker) => speaker.cancel().await,
            Speaker::Silent(speaker) => speaker.cancel().await,
        }
    }
}

fn espeak_voice(language: Language) -> &'static str {
    match language {
        Language::EnglishUs => "en-us",
        Language::Russian => "ru",
        Language::Ukrainian => "uk",
        Language::French => "fr",
        Language::German => "de",
        Language::ChineseHongKong => "yue",
    }
}

fn speaker_args(program: &str, wpm: u32, language: Language, text: &str) -> Vec<String> {
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);
    match name {
        "say" => vec!["-r".into(), wpm.to_string(), text.into()],
        "espeak" | "espeak-ng" => vec![
            "-v".into(),
            espeak_voice(language).into(),
            "-s".into(),
            wpm.to_string(),
            text.into(),
        ],
        _ => vec![text.into()],
    }
}
