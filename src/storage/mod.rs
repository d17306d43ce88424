use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, UpdateError};

const DEFAULT_PACK_ID: &str = "715572";

/// Persistent updater configuration, rewritten in full at the end of every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(alias = "all_the_mods_9")]
    pub pack_id: String,
    pub page_index: u32,
    pub page_size: u32,
    pub sort: String,
    #[serde(deserialize_with = "flag")]
    pub sort_desc: bool,
    #[serde(deserialize_with = "flag")]
    pub remove_alphas: bool,
    pub current_version: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pack_id: DEFAULT_PACK_ID.into(),
            page_index: 0,
            page_size: 1,
            sort: "dateCreated".into(),
            sort_desc: true,
            remove_alphas: true,
            current_version: None,
            data: None,
        }
    }
}

// Older config files store flags as "true"/"false" strings.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected true or false, got {other:?}"
            ))),
        },
    }
}

#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config file, writing a default one first when it does not exist.
    pub fn load_or_create(&self) -> Result<Settings> {
        if !self.path.exists() {
            println!("-> Config not found, creating...");
            self.save(&Settings::default())?;
            println!("-> Config created! See '{}' for more info.", self.path.display());
        } else {
            println!("-> Loading config...");
        }
        let settings = self.load()?;
        info!("config read from {}: {:?}", self.path().display(), settings);
        Ok(settings)
    }

    pub fn load(&self) -> Result<Settings> {
        let bytes = fs::read(&self.path).map_err(|e| self.error(format!("read failed: {e}")))?;
        serde_json::from_slice(&bytes).map_err(|e| self.error(format!("parse failed: {e}")))
    }

    /// Replace the config file atomically via a sibling temp file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(settings)
            .map_err(|e| self.error(format!("serialize failed: {e}")))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| self.error(format!("unable to create config dir: {e}")))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, &bytes).map_err(|e| self.error(format!("write failed: {e}")))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.error(format!("replace failed: {e}")))?;
        debug!("config written to {}", self.path.display());
        Ok(())
    }

    fn error(&self, reason: String) -> UpdateError {
        UpdateError::Config {
            path: self.path.clone(),
            reason,
        }
    }
}
