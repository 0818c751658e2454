use application::voice_pipeline::{Turn, VoicePipeline};
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use domain::{Language, SessionError};
use infrastructure::config::Config;
use infrastructure::credential_store::CredentialStore;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::recorder::CommandRecorder;
use infrastructure::speaker::{CommandSpeaker, SilentSpeaker, Speaker};
use shared::confirmation::ask_confirmation;
use shared::types::Result;
use shared::utils::clear_screen;
use std::path::PathBuf;
use tracing::{error, info};

type Pipeline = VoicePipeline<OpenAiClient, OpenAiClient, Speaker>;

#[derive(Parser, Debug)]
#[command(name = "voice_chat")]
#[command(about = "Talk to a chat model: record a question, hear the answer")]
pub struct Cli {
    /// Type messages instead of recording them
    #[arg(long)]
    pub text: bool,

    /// Transcribe these audio files, one turn per file
    #[arg(long, num_args = 1.., value_name = "FILE")]
    pub audio: Vec<PathBuf>,

    /// Language used to read replies aloud (en-US, ru-RU, uk-UA, fr-FR, de-DE, zh-HK)
    #[arg(long)]
    pub lang: Option<String>,

    /// Print replies without reading them aloud
    #[arg(long)]
    pub no_speech: bool,

    /// Initial system message; pass an empty string to start without one
    #[arg(long)]
    pub system: Option<String>,

    /// Store an API key for future runs and exit
    #[arg(long, value_name = "KEY")]
    pub set_key: Option<String>,

    /// Forget the stored API key and exit
    #[arg(long)]
    pub clear_key: bool,

    /// Copy each reply to the clipboard
    #[arg(long)]
    pub copy: bool,
}

pub struct CliApp {
    config: Config,
    store: CredentialStore,
    copy_replies: bool,
}

impl CliApp {
    pub fn new() -> Self {
        let config = Config::load();
        let store = CredentialStore::new(config.credential_path.clone());
        Self {
            config,
            store,
            copy_replies: false,
        }
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        if cli.clear_key {
            self.store.clear()?;
            println!("{}", "Stored API key removed.".yellow());
            return Ok(());
        }
        if let Some(key) = cli.set_key.as_deref() {
            self.store.save(key.trim())?;
            println!(
                "{} {}",
                "API key saved to".green(),
                self.store.path().display()
            );
            return Ok(());
        }

        self.copy_replies = cli.copy;
        let language: Language = cli
            .lang
            .as_deref()
            .unwrap_or(self.config.speech_language.as_str())
            .parse()?;
        if let Some(system) = cli.system {
            self.config.system_message = system;
        }

        let credential = self.resolve_credential()?;
        let speaker = if cli.no_speech {
            Speaker::Silent(SilentSpeaker)
        } else {
            Speaker::Command(CommandSpeaker::new(
                self.config.tts_command.clone(),
                self.config.speech_rate,
            ))
        };
        let mut pipeline =
            VoicePipeline::from_config(&self.config, &credential, speaker).with_language(language);

        if !cli.audio.is_empty() {
            self.handle_audio_files(&mut pipeline, &cli.audio).await
        } else if cli.text {
            self.handle_text_chat(&mut pipeline).await
        } else {
            self.handle_voice_chat(&mut pipeline).await
        }
    }

    /// Environment first, then the stored key, then ask and remember.
    fn resolve_credential(&self) -> Result<String> {
        if let Some(key) = &self.config.api_key {
            return Ok(key.clone());
        }
        if let Some(key) = self.store.load()? {
            return Ok(key);
        }
        let key: String = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your API key")
            .interact()?;
        let key = key.trim().to_string();
        self.store.save(&key)?;
        info!(path = %self.store.path().display(), "API key stored");
        Ok(key)
    }

    async fn handle_audio_files(&self, pipeline: &mut Pipeline, files: &[PathBuf]) -> Result<()> {
        eprintln!("Transcribing {} file(s)...", files.len());
        for (path, outcome) in pipeline.handle_files(files).await {
            match outcome {
                Ok(turn) => self.show_turn(&turn),
                Err(err) => {
                    println!("{} {}", "Skipped".yellow(), path.display());
                    Self::report_failure(&err);
                }
            }
        }
        Ok(())
    }

    async fn handle_text_chat(&self, pipeline: &mut Pipeline) -> Result<()> {
        println!(
            "{}",
            "Text chat. Type '/reset' to start over, '/lang' to change the speech language, 'exit' to quit."
                .cyan()
        );
        loop {
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("You")
                .allow_empty(true)
                .interact_text()?;
            let trimmed = input.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                break;
            }
            match trimmed {
                "/reset" => self.reset(pipeline).await?,
                "/lang" => Self::choose_language(pipeline)?,
                _ => {
                    eprintln!("Thinking...");
                    match pipeline.send_text(trimmed).await {
                        Ok(turn) => self.show_turn(&turn),
                        Err(err) => Self::report_failure(&err),
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle_voice_chat(&self, pipeline: &mut Pipeline) -> Result<()> {
        println!(
            "{}",
            "Voice chat. Press Enter to start recording, 'r' to reset, 'l' to change language, 'q' to quit."
                .cyan()
        );
        let language = pipeline.language();
        println!("Speech language: {} ({})", language.label(), language.code());

        let mut recorder = CommandRecorder::new(self.config.record_command.clone());
        loop {
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Start recording")
                .allow_empty(true)
                .interact_text()?;
            match input.trim().to_lowercase().as_str() {
                "" => {}
                "q" | "quit" | "exit" => break,
                "r" | "reset" => {
                    self.reset(pipeline).await?;
                    continue;
                }
                "l" | "lang" => {
                    Self::choose_language(pipeline)?;
                    continue;
                }
                other => {
                    println!("{} {}", "Unknown command:".yellow(), other);
                    continue;
                }
            }

            if let Err(err) = recorder.start() {
                Self::report_failure(&err);
                continue;
            }
            println!("{}", "Recording... press Enter to stop.".red().bold());
            let _: String = Input::new()
                .with_prompt("Stop recording")
                .allow_empty(true)
                .interact_text()?;

            let clip = match recorder.stop() {
                Ok(clip) => clip,
                Err(err) => {
                    Self::report_failure(&err);
                    continue;
                }
            };

            eprintln!("Transcribing...");
            match pipeline.handle_recording(&clip).await {
                Ok(turn) => self.show_turn(&turn),
                Err(err) => Self::report_failure(&err),
            }
        }
        Ok(())
    }

    fn choose_language(pipeline: &mut Pipeline) -> Result<()> {
        let labels: Vec<String> = Language::ALL
            .iter()
            .map(|l| format!("{} ({})", l.label(), l.code()))
            .collect();
        let current = Language::ALL
            .iter()
            .position(|l| *l == pipeline.language())
            .unwrap_or(0);
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Speech language")
            .items(&labels)
            .default(current)
            .interact()?;
        pipeline.set_language(Language::ALL[choice]);
        Ok(())
    }

    async fn reset(&self, pipeline: &mut Pipeline) -> Result<()> {
        if !ask_confirmation("Reset the conversation?", true)? {
            return Ok(());
        }
        pipeline.reset().await?;
        clear_screen()?;
        println!("{}", "Conversation reset.".yellow());
        Ok(())
    }

    fn show_turn(&self, turn: &Turn) {
        println!("{} {}", "User:".cyan().bold(), turn.user_text);
        println!("{} {}", "Assistant:".green().bold(), turn.reply);

        if self.copy_replies {
            match arboard::Clipboard::new().and_then(|mut c| c.set_text(turn.reply.clone())) {
                Ok(()) => println!("{}", "Copied to clipboard.".green()),
                Err(err) => eprintln!("{} {}", "Clipboard copy failed:".red(), err),
            }
        }
    }

    // The conversation keeps whatever state the failed turn left behind.
    fn report_failure(err: &anyhow::Error) {
        error!("{:#}", err);
        if let Some(SessionError::InvalidResponse) = err.downcast_ref::<SessionError>() {
            println!(
                "{}",
                "The chat service answered without a reply. Check your API key and model.".red()
            );
        } else {
            println!("{} {:#}", "Error:".red().bold(), err);
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
