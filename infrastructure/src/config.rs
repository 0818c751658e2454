use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
const DEFAULT_SPEECH_RATE: f32 = 1.2;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub system_message: String,
    pub speech_language: String,
    pub speech_rate: f32,
    pub tts_command: String,
    pub record_command: String,
    pub credential_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; `load` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let speech_rate = match lookup("SPEECH_RATE") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid SPEECH_RATE '{}'", raw);
                DEFAULT_SPEECH_RATE
            }),
            None => DEFAULT_SPEECH_RATE,
        };

        Self {
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chat_model: lookup("CHAT_MODEL")
                .unwrap_or_else(|| domain::DEFAULT_CHAT_MODEL.to_string()),
            transcription_model: lookup("TRANSCRIPTION_MODEL")
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            system_message: lookup("SYSTEM_MESSAGE")
                .unwrap_or_else(|| domain::DEFAULT_SYSTEM_MESSAGE.to_string()),
            speech_language: lookup("SPEECH_LANG").unwrap_or_else(|| "en-US".to_string()),
            speech_rate,
            tts_command: lookup("TTS_COMMAND").unwrap_or_else(|| default_tts_command().to_string()),
            record_command: lookup("RECORD_COMMAND")
                .unwrap_or_else(|| default_record_command().to_string()),
            credential_path: lookup("VOICE_CHAT_CREDENTIAL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_credential_path(lookup("HOME"))),
        }
    }
}

fn default_tts_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak-ng"
    }
}

fn default_record_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "rec"
    } else {
        "arecord"
    }
}

fn default_credential_path(home: Option<String>) -> PathBuf {
    let mut path = PathBuf::from(home.unwrap_or_else(|| ".".to_string()));
    path.push(".config");
    path.push("voice_chat");
    path.push("credential.json");
    path
}
