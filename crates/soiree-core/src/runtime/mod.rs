//! Process-wide runtime settings.
//!
//! Two independent axes select how entity data is stored and reached:
//! the storage kind preference (local file store vs managed database) and
//! the API mode (direct backend access vs REST indirection, with its base
//! URL). Both live in a TOML file at `~/.config/soiree/settings.toml`.
//!
//! Lifecycle contract: the file is read once at process start into an
//! immutable [`RuntimeSettings`] snapshot. [`RuntimeSettings::save`]
//! writes the durable value only; a running process keeps using the
//! snapshot it started with. Mid-session adapter swaps would interleave
//! reads and writes across two backends for the same entity, so a switch
//! deliberately requires a fresh process start.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::BackendKind;

/// Default REST base URL written by `soiree init`.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

// -----------------------------------------------------------------------
// Setting axes
// -----------------------------------------------------------------------

/// Which backend entities use by default when the API mode is direct.
/// REST is not a storage preference; it is reached via [`ApiMode::Rest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoragePreference {
    Local,
    ManagedDb,
}

impl StoragePreference {
    pub fn backend_kind(self) -> BackendKind {
        match self {
            Self::Local => BackendKind::Local,
            Self::ManagedDb => BackendKind::ManagedDb,
        }
    }
}

impl fmt::Display for StoragePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::ManagedDb => "managed-db",
        };
        f.write_str(s)
    }
}

impl FromStr for StoragePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "managed-db" => Ok(Self::ManagedDb),
            other => Err(format!("invalid storage preference: {other:?}")),
        }
    }
}

/// Whether entity access goes straight to the configured backend or is
/// uniformly routed through a remote REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiMode {
    Direct,
    Rest,
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Direct => "direct",
            Self::Rest => "rest",
        };
        f.write_str(s)
    }
}

impl FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "rest" => Ok(Self::Rest),
            other => Err(format!("invalid api mode: {other:?}")),
        }
    }
}

// -----------------------------------------------------------------------
// Settings file
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    storage: StorageSection,
    api: ApiSection,
}

#[derive(Debug, Serialize, Deserialize)]
struct StorageSection {
    kind: StoragePreference,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiSection {
    mode: ApiMode,
    base_url: String,
}

/// Return the soiree config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/soiree` or `~/.config/soiree`.
/// We intentionally ignore the platform-specific `dirs::config_dir()`
/// (which returns `~/Library/Application Support` on macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("soiree");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("soiree")
}

/// Return the path to the settings file.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

// -----------------------------------------------------------------------
// RuntimeSettings
// -----------------------------------------------------------------------

/// An immutable snapshot of the runtime settings, taken at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    storage: StoragePreference,
    api_mode: ApiMode,
    api_base_url: String,
}

impl RuntimeSettings {
    pub fn new(storage: StoragePreference, api_mode: ApiMode, api_base_url: String) -> Self {
        Self {
            storage,
            api_mode,
            api_base_url,
        }
    }

    pub fn storage_kind(&self) -> StoragePreference {
        self.storage
    }

    pub fn api_mode(&self) -> ApiMode {
        self.api_mode
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Return a copy with a different storage preference (for `save`).
    pub fn with_storage(mut self, storage: StoragePreference) -> Self {
        self.storage = storage;
        self
    }

    /// Return a copy with a different API mode and base URL (for `save`).
    pub fn with_api(mut self, mode: ApiMode, base_url: Option<String>) -> Self {
        self.api_mode = mode;
        if let Some(url) = base_url {
            self.api_base_url = url;
        }
        self
    }

    /// Load and parse the settings file. Returns an error if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        let file: SettingsFile =
            toml::from_str(&contents).context("failed to parse settings file")?;
        Ok(Self {
            storage: file.storage.kind,
            api_mode: file.api.mode,
            api_base_url: file.api.base_url,
        })
    }

    /// Load the settings file, falling back to defaults (local storage,
    /// direct access) when it does not exist or cannot be parsed.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Serialize and write the durable settings, creating parent dirs as
    /// needed. The running process is unaffected; the new values are read
    /// at the next process start.
    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create settings directory {}", dir.display()))?;
        }
        let file = SettingsFile {
            storage: StorageSection { kind: self.storage },
            api: ApiSection {
                mode: self.api_mode,
                base_url: self.api_base_url.clone(),
            },
        };
        let contents = toml::to_string_pretty(&file).context("failed to serialize settings")?;
        std::fs::write(path, &contents)
            .with_context(|| format!("failed to write settings file at {}", path.display()))?;
        Ok(())
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            storage: StoragePreference::Local,
            api_mode: ApiMode::Direct,
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
