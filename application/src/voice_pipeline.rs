use crate::conversation_trail::ConversationTrail;
use domain::{
    AudioClip, ChatSession, CompletionService, Language, SpeechOutput, TranscriptionService,
};
use infrastructure::config::Config;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::recorder::load_clip;
use shared::types::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Outcome of one spoken or typed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user_text: String,
    pub reply: String,
}

/// Drives one voice conversation: audio goes to the transcription service,
/// the text goes through the chat session, and the reply is displayed and
/// read aloud.
pub struct VoicePipeline<C, T, S> {
    session: ChatSession,
    trail: ConversationTrail,
    language: Language,
    transcription_model: String,
    completion: C,
    transcription: T,
    speaker: S,
}

impl<C, T, S> VoicePipeline<C, T, S>
where
    C: CompletionService,
    T: TranscriptionService,
    S: SpeechOutput,
{
    pub fn new(session: ChatSession, completion: C, transcription: T, speaker: S) -> Self {
        Self {
            session,
            trail: ConversationTrail::new(),
            language: Language::default(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            completion,
            transcription,
            speaker,
        }
    }

    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn set_credential(&mut self, credential: impl Into<String>) {
        self.session.set_credential(credential);
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn trail(&self) -> &ConversationTrail {
        &self.trail
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }

    pub fn transcription(&self) -> &T {
        &self.transcription
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }

    /// Transcribe a finished recording and run it through the chat session.
    pub async fn handle_recording(&mut self, clip: &AudioClip) -> Result<Turn> {
        let text = self
            .transcription
            .transcribe(self.session.credential(), &self.transcription_model, clip)
            .await?;
        info!(chars = text.len(), "transcription received");
        self.exchange(text).await
    }

    /// Run each audio file as its own turn. A failed file is reported in its
    /// slot and the remaining files still run.
    pub async fn handle_files(&mut self, files: &[PathBuf]) -> Vec<(PathBuf, Result<Turn>)> {
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let outcome = self.handle_file(path).await;
            if let Err(err) = &outcome {
                warn!(path = %path.display(), "audio file turn failed: {:#}", err);
            }
            outcomes.push((path.clone(), outcome));
        }
        outcomes
    }

    async fn handle_file(&mut self, path: &Path) -> Result<Turn> {
        let clip = load_clip(path)?;
        self.handle_recording(&clip).await
    }

    /// Same as a recording, for text typed by the user.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<Turn> {
        self.exchange(text.into()).await
    }

    async fn exchange(&mut self, user_text: String) -> Result<Turn> {
        self.session.add_user_message(user_text.clone());
        self.trail.push_user(&user_text);

        let reply = self.session.get_response(&self.completion).await?;
        self.trail.push_assistant(&reply);
        info!(
            transcript_len = self.session.len(),
            "assistant reply received"
        );

        // The reply is already recorded; a broken speech program only costs audio.
        if let Err(err) = self.speaker.speak(&reply, self.language).await {
            warn!("Could not read the reply aloud: {:#}", err);
        }

        Ok(Turn { user_text, reply })
    }

    /// Clear the trail and the transcript, and silence any reply being read.
    pub async fn reset(&mut self) -> Result<()> {
        self.trail.clear();
        self.session.reset_chat();
        self.speaker.cancel().await
    }
}

impl<S: SpeechOutput> VoicePipeline<OpenAiClient, OpenAiClient, S> {
    /// Wire a pipeline to the OpenAI endpoints described by `config`.
    pub fn from_config(config: &Config, credential: &str, speaker: S) -> Self {
        let client = OpenAiClient::from_config(config);
        let session = ChatSession::new(credential, &config.system_message)
            .with_model(config.chat_model.clone());
        Self::new(session, client.clone(), client, speaker)
            .with_transcription_model(config.transcription_model.clone())
    }
}
