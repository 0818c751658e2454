use crate::models::{AudioClip, Language, Message, Role};
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::future::Future;

/// Body of a chat-completion call: the model id and the full transcript.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

#[derive(Debug, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    pub fn with_reply(role: Role, content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ReplyMessage {
                    role,
                    content: Some(content.into()),
                }),
            }],
        }
    }

    /// The first choice's message, if the service returned one.
    pub fn into_first_message(self) -> Option<Message> {
        let reply = self.choices.into_iter().next()?.message?;
        Some(Message::new(reply.role, reply.content.unwrap_or_default()))
    }
}

pub trait CompletionService {
    fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest<'_>,
    ) -> impl Future<Output = Result<CompletionResponse>> + Send;
}

pub trait TranscriptionService {
    fn transcribe(
        &self,
        credential: &str,
        model: &str,
        clip: &AudioClip,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Something that can read a reply aloud.
pub trait SpeechOutput {
    fn speak(&mut self, text: &str, language: Language) -> impl Future<Output = Result<()>> + Send;

    /// Stop any utterance still playing. Idle speakers return `Ok`.
    fn cancel(&mut self) -> impl Future<Output = Result<()>> + Send;
}
