use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, YaquedoError};

/// Session tokens cached after a successful sign-in so subcommands can run
/// without prompting for credentials again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default)]
    pub session: Option<StoredSession>,
}

fn default_gateway_url() -> String {
    "https://yaquedo.supabase.co".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            anon_key: String::new(),
            session: None,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("yaquedo")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    let mut settings: Settings = if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    };
    // Environment wins over the file for the gateway endpoint.
    if let Ok(url) = std::env::var("YAQUEDO_GATEWAY_URL") {
        settings.gateway_url = url;
    }
    if let Ok(key) = std::env::var("YAQUEDO_ANON_KEY") {
        settings.anon_key = key;
    }
    settings
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| YaquedoError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

/// Replace the cached session (or drop it with `None`) and persist.
pub fn store_session(session: Option<StoredSession>) -> Result<()> {
    let mut settings = load_settings();
    settings.session = session;
    save_settings(&settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            gateway_url: "https://example.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            session: Some(StoredSession {
                access_token: "at".to_string(),
                refresh_token: "rt".to_string(),
                user_id: Uuid::nil(),
                email: "ana@example.com".to_string(),
            }),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.gateway_url, "https://example.supabase.co");
        assert_eq!(loaded.session.unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_defaults_when_missing() {
        let s = Settings::default();
        assert!(s.anon_key.is_empty());
        assert!(s.session.is_none());
        assert!(!s.gateway_url.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"anon_key": "k"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.anon_key, "k");
        assert_eq!(s.gateway_url, "https://yaquedo.supabase.co");
        assert!(s.session.is_none());
    }
}
