pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use error::SessionError;
pub use models::{AudioClip, Language, Message, Role};
pub use services::{
    Choice, CompletionRequest, CompletionResponse, CompletionService, ReplyMessage, SpeechOutput,
    TranscriptionService,
};
pub use session::{ChatSession, SharedSession, DEFAULT_CHAT_MODEL, DEFAULT_SYSTEM_MESSAGE};
