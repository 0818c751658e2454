use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Default)]
struct CredentialFile {
    api_key: String,
}

/// Keeps the API key between runs in a small JSON file.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file or a blank key both mean no stored credential.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credential file at {:?}", self.path))?;
        let file: CredentialFile = serde_json::from_str(&data)
            .with_context(|| format!("Credential file at {:?} is not valid JSON", self.path))?;
        if file.api_key.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(file.api_key))
    }

    pub fn save(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = CredentialFile {
            api_key: api_key.to_string(),
        };
        let serialized = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write credential file at {:?}", self.path))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
