//! In-memory stand-ins for the remote services, shared by the integration
//! tests in this crate.

use anyhow::anyhow;
use domain::{
    AudioClip, CompletionRequest, CompletionResponse, CompletionService, Language, Message, Role,
    SpeechOutput, TranscriptionService,
};
use shared::types::Result;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub credential: String,
    pub model: String,
    pub messages: Vec<Message>,
}

/// Completion service that answers from a queue of scripted outcomes.
#[derive(Default)]
pub struct ScriptedCompletion {
    outcomes: Mutex<VecDeque<Result<CompletionResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, role: Role, content: &str) -> Self {
        self.push(Ok(CompletionResponse::with_reply(role, content)))
    }

    pub fn raw(self, body: &str) -> Self {
        let parsed = parse_body(body);
        self.push(parsed)
    }

    pub fn failure(self, message: &str) -> Self {
        self.push(Err(anyhow!(message.to_string())))
    }

    fn push(self, outcome: Result<CompletionResponse>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn parse_body(body: &str) -> Result<CompletionResponse> {
    Ok(serde_json::from_str(body)?)
}

impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            credential: credential.to_string(),
            model: request.model.to_string(),
            messages: request.messages.to_vec(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
    }
}

/// Completion service that blocks until released, for overlap tests.
#[derive(Default)]
pub struct GatedCompletion {
    pub started: Notify,
    pub release: Notify,
}

impl CompletionService for GatedCompletion {
    async fn complete(
        &self,
        _credential: &str,
        _request: &CompletionRequest<'_>,
    ) -> Result<CompletionResponse> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(CompletionResponse::with_reply(Role::Assistant, "done"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionCall {
    pub credential: String,
    pub model: String,
    pub file_name: String,
}

/// Transcription service returning fixed texts in order.
#[derive(Default)]
pub struct ScriptedTranscription {
    texts: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<TranscriptionCall>>,
}

impl ScriptedTranscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, text: &str) -> Self {
        self.texts.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn failure(self, message: &str) -> Self {
        self.texts
            .lock()
            .unwrap()
            .push_back(Err(anyhow!(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<TranscriptionCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl TranscriptionService for ScriptedTranscription {
    async fn transcribe(&self, credential: &str, model: &str, clip: &AudioClip) -> Result<String> {
        self.calls.lock().unwrap().push(TranscriptionCall {
            credential: credential.to_string(),
            model: model.to_string(),
            file_name: clip.file_name.clone(),
        });
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted transcription left")))
    }
}

/// Speaker that remembers what it was asked to say.
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    pub spoken: Vec<(String, Language)>,
    pub cancels: usize,
    pub fail: bool,
}

impl SpeechOutput for RecordingSpeaker {
    async fn speak(&mut self, text: &str, language: Language) -> Result<()> {
        if self.fail {
            return Err(anyhow!("speech program missing"));
        }
        self.spoken.push((text.to_string(), language));
        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        self.cancels += 1;
        Ok(())
    }
}

pub fn sample_clip() -> AudioClip {
    AudioClip::new("recording.wav", b"RIFF....WAVEfmt ".to_vec())
}
