use crate::config::Config;
use anyhow::{anyhow, Context};
use domain::{
    AudioClip, CompletionRequest, CompletionResponse, CompletionService, SessionError,
    TranscriptionService,
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the OpenAI-compatible chat completion and audio transcription
/// endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Arc<Client>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Pull the human-readable message out of an API error body, falling back to
/// the raw text.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<CompletionResponse> {
        let url = self.endpoint("chat/completions");
        let telemetry = Telemetry::start("chat completion");
        debug!(
            model = request.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .context("Failed contacting the completion service")?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let detail = format!(
                "Completion API error ({}): {}",
                status,
                api_error_message(&text)
            );
            // An error body without choices is still a missing reply, not just a transport failure.
            return match serde_json::from_str::<CompletionResponse>(&text) {
                Ok(parsed) if parsed.choices.is_empty() => {
                    Err(anyhow::Error::new(SessionError::InvalidResponse).context(detail))
                }
                _ => Err(anyhow!(detail)),
            };
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .context("Completion service returned malformed JSON")?;
        debug!(
            elapsed_ms = telemetry.elapsed_ms(),
            choices = parsed.choices.len(),
            "{} finished",
            telemetry.label()
        );
        Ok(parsed)
    }
}

impl TranscriptionService for OpenAiClient {
    async fn transcribe(&self, credential: &str, model: &str, clip: &AudioClip) -> Result<String> {
        let url = self.endpoint("audio/transcriptions");
        let telemetry = Telemetry::start("transcription");
        debug!(model, bytes = clip.bytes.len(), "sending transcription request");

        let file = Part::bytes(clip.bytes.clone()).file_name(clip.file_name.clone());
        let form = Form::new()
            .part("file", file)
            .text("model", model.to_string());

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .multipart(form)
            .send()
            .await
            .context("Failed contacting the transcription service")?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!(
                "Transcription API error ({}): {}",
                status,
                api_error_message(&text)
            ));
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&text)
            .context("Transcription service returned malformed JSON")?;
        debug!(
            elapsed_ms = telemetry.elapsed_ms(),
            "{} finished",
            telemetry.label()
        );
        parsed
            .text
            .ok_or_else(|| anyhow!("Transcription response did not contain any text"))
    }
}
