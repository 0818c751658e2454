use crate::error::SessionError;
use crate::models::Message;
use crate::services::{CompletionRequest, CompletionService};
use shared::types::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant during a voice chat.";

/// Conversation state for one voice chat: the credential used for remote
/// calls and the ordered transcript sent with every completion request.
#[derive(Debug, Clone)]
pub struct ChatSession {
    credential: String,
    model: String,
    messages: Vec<Message>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new("", DEFAULT_SYSTEM_MESSAGE)
    }
}

impl ChatSession {
    /// An empty `system_message` starts the transcript empty.
    pub fn new(credential: impl Into<String>, system_message: &str) -> Self {
        let mut session = Self {
            credential: credential.into(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            messages: Vec::new(),
        };
        if !system_message.is_empty() {
            session.add_system_message(system_message);
        }
        session
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn set_credential(&mut self, credential: impl Into<String>) {
        self.credential = credential.into();
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::system(content));
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Send the whole transcript to `service` and append its reply.
    ///
    /// A response without a choice carrying a message fails with
    /// [`SessionError::InvalidResponse`] and leaves the transcript untouched.
    pub async fn get_response<C: CompletionService>(&mut self, service: &C) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: &self.messages,
        };
        let response = service.complete(&self.credential, &request).await?;

        let reply = response
            .into_first_message()
            .ok_or(SessionError::InvalidResponse)?;
        let content = reply.content.clone();
        self.messages.push(reply);
        Ok(content)
    }

    /// Drop every message, including the initial system directive.
    pub fn reset_chat(&mut self) {
        self.messages.clear();
    }
}

/// A session shared between tasks. Only one completion request may be in
/// flight at a time; an overlapping call fails with [`SessionError::Busy`].
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<ChatSession>>,
}

impl SharedSession {
    pub fn new(session: ChatSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn set_credential(&self, credential: impl Into<String>) {
        self.inner.lock().await.set_credential(credential);
    }

    pub async fn add_system_message(&self, content: impl Into<String>) {
        self.inner.lock().await.add_system_message(content);
    }

    pub async fn add_user_message(&self, content: impl Into<String>) {
        self.inner.lock().await.add_user_message(content);
    }

    pub async fn reset_chat(&self) {
        self.inner.lock().await.reset_chat();
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.messages().to_vec()
    }

    pub async fn get_response<C: CompletionService>(&self, service: &C) -> Result<String> {
        let mut session = self
            .inner
            .try_lock()
            .map_err(|_| SessionError::Busy)?;
        session.get_response(service).await
    }
}
