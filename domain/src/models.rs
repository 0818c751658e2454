use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Raw audio handed to the transcription service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Language used when reading replies aloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    EnglishUs,
    Russian,
    Ukrainian,
    French,
    German,
    ChineseHongKong,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::EnglishUs,
        Language::Russian,
        Language::Ukrainian,
        Language::French,
        Language::German,
        Language::ChineseHongKong,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::EnglishUs => "en-US",
            Language::Russian => "ru-RU",
            Language::Ukrainian => "uk-UA",
            Language::French => "fr-FR",
            Language::German => "de-DE",
            Language::ChineseHongKong => "zh-HK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::EnglishUs => "English (US)",
            Language::Russian => "Russian",
            Language::Ukrainian => "Ukrainian",
            Language::French => "French",
            Language::German => "German",
            Language::ChineseHongKong => "Chinese (Hong Kong)",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let supported: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
                anyhow::anyhow!(
                    "Unsupported language '{}'. Supported: {}",
                    wanted,
                    supported.join(", ")
                )
            })
    }
}
