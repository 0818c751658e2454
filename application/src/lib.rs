pub mod conversation_trail;
pub mod voice_pipeline;
