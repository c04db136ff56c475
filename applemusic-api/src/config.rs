//! MusicKit credentials, persisted to `~/.config/applemusic/credentials.json`.
//!
//! ```json
//! {
//!   "team_id": "ABCDE12345",
//!   "key_id": "XYZ9876543",
//!   "private_key_path": "/home/me/keys/AuthKey_XYZ9876543.p8",
//!   "storefront": "us"
//! }
//! ```
//!
//! Only the material needed to sign developer tokens is stored. Tokens
//! themselves live in memory for the lifetime of a client.

use crate::developer_token::DeveloperTokenIssuer;
use crate::error::{AppleMusicError, Result};
use crate::types::Storefront;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Apple developer team ID (the token's `iss`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// MusicKit key ID (the token's `kid`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Path of the `.p8` private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,
    /// Two-letter storefront code used when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storefront: Option<String>,
}

impl Credentials {
    /// Load from the default location, or an empty value if the file does
    /// not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save to the default location, creating parent directories if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Delete the credentials file.
    pub fn clear() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Whether team ID, key ID and key path are all present (the key file
    /// is not checked).
    pub fn is_configured(&self) -> bool {
        self.team_id.as_ref().is_some_and(|t| !t.is_empty())
            && self.key_id.as_ref().is_some_and(|k| !k.is_empty())
            && self.private_key_path.is_some()
    }

    /// Configured storefront, or the default one.
    pub fn storefront(&self) -> Result<Storefront> {
        self.storefront
            .as_deref()
            .map_or_else(|| Ok(Storefront::default()), str::parse)
    }

    /// Build a signing issuer from these credentials.
    pub fn issuer(&self) -> Result<DeveloperTokenIssuer> {
        match (&self.team_id, &self.key_id, &self.private_key_path) {
            (Some(team_id), Some(key_id), Some(path)) => {
                DeveloperTokenIssuer::from_key_file(team_id.as_str(), key_id.as_str(), path)
            }
            _ => Err(AppleMusicError::Other(
                "credentials incomplete: team_id, key_id and private_key_path are required".into(),
            )),
        }
    }

    fn path() -> Result<PathBuf> {
        let config = dirs::config_dir()
            .ok_or_else(|| AppleMusicError::Other("cannot determine config directory".into()))?;
        Ok(config.join("applemusic").join("credentials.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "applemusic-config-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = scratch_dir("missing");
        let creds = Credentials::load_from(&dir.join("nope.json")).unwrap();
        assert_eq!(creds, Credentials::default());
        assert!(!creds.is_configured());
    }

    #[test]
    fn save_then_load() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("credentials.json");
        let creds = Credentials {
            team_id: Some("TEAM".into()),
            key_id: Some("KEY".into()),
            private_key_path: Some("/tmp/AuthKey_KEY.p8".into()),
            storefront: Some("de".into()),
        };
        creds.save_to(&path).unwrap();
        let loaded = Credentials::load_from(&path).unwrap();
        assert_eq!(loaded, creds);
        assert!(loaded.is_configured());
        assert_eq!(loaded.storefront().unwrap(), Storefront::DE);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn incomplete_credentials_have_no_issuer() {
        let creds = Credentials {
            team_id: Some("TEAM".into()),
            ..Credentials::default()
        };
        assert!(matches!(creds.issuer(), Err(AppleMusicError::Other(_))));
        assert_eq!(creds.storefront().unwrap(), Storefront::US);
    }

    #[test]
    fn bad_storefront_is_rejected() {
        let creds = Credentials {
            storefront: Some("germany".into()),
            ..Credentials::default()
        };
        assert!(creds.storefront().is_err());
    }
}
