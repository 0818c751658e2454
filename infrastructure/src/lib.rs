pub mod config;
pub mod credential_store;
pub mod openai_client;
pub mod recorder;
pub mod speaker;
