use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    EYE_MIN_NEIGHBORS, EYE_SCALE_FACTOR, FACE_MIN_NEIGHBORS, FACE_SCALE_FACTOR, KEY_WAIT_MS,
    SAMPLE_SIZE,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent capture settings. Command-line flags override these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub camera_index: i32,
    pub sample_size: u32,
    pub face_cascade: Option<PathBuf>,
    pub eye_cascade: Option<PathBuf>,
    pub face_scale_factor: f64,
    pub face_min_neighbors: i32,
    pub eye_scale_factor: f64,
    pub eye_min_neighbors: i32,
    pub key_wait_ms: i32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            camera_index: 0,
            sample_size: SAMPLE_SIZE,
            face_cascade: None,
            eye_cascade: None,
            face_scale_factor: FACE_SCALE_FACTOR,
            face_min_neighbors: FACE_MIN_NEIGHBORS,
            eye_scale_factor: EYE_SCALE_FACTOR,
            eye_min_neighbors: EYE_MIN_NEIGHBORS,
            key_wait_ms: KEY_WAIT_MS,
        }
    }
}

impl SamplerSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceSampler").join("settings.json"))
    }

    /// Loads the user's settings file, falling back to defaults when it is
    /// absent or unreadable.
    pub fn load() -> Self {
        Self::load_or_default(Self::config_path())
    }

    /// Reads `path` if given, or returns defaults when there is no path or
    /// the file is missing or malformed.
    pub fn load_or_default(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { .. }) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring {e}");
                Self::default()
            }
        }
    }

    /// Loads an explicitly requested settings file. Unlike [`Self::load`],
    /// failures are reported.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }
}
