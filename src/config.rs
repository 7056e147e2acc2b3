//! Credential loading for the completion service.
//!
//! The API token is process-wide immutable configuration: it is read once
//! at startup, trimmed, and injected into the completion client at
//! construction. It is never re-read or rotated during the process
//! lifetime.

use anyhow::{Result, anyhow};
use dirs::home_dir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Immutable credentials for the completion service.
#[derive(Debug, Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Loads credentials from the environment or the token file.
    ///
    /// `OPENAI_API_KEY` takes precedence; otherwise the token is read from
    /// `~/.config/openai/token`. Missing both is a fatal startup condition.
    pub fn load() -> Result<Self> {
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            info!("Using API key from OPENAI_API_KEY");
            return Self::from_token(api_key);
        }
        let path = Self::token_path()?;
        Self::load_from_file(&path)
    }

    /// Reads and trims a token file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow!(
                "Could not read API token from {}: {}\n\n\
                 Create the file with your OpenAI API key, or set the \
                 OPENAI_API_KEY environment variable.",
                path.display(),
                e
            )
        })?;
        info!("Loaded API token from: {}", path.display());
        Self::from_token(content)
    }

    fn from_token(raw: String) -> Result<Self> {
        let api_key = raw.trim().to_string();
        if api_key.is_empty() {
            return Err(anyhow!("API token is empty"));
        }
        Ok(Self { api_key })
    }

    fn token_path() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".config").join("openai").join("token"))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_token_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  sk-test-token\n").unwrap();

        let credentials = Credentials::load_from_file(file.path()).unwrap();
        assert_eq!(credentials.api_key(), "sk-test-token");
    }

    #[test]
    fn test_missing_token_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-token");

        let err = Credentials::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Could not read API token"));
    }

    #[test]
    fn test_blank_token_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   \n").unwrap();

        let err = Credentials::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
