use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Prefix marking a command that hands a bundle path to the OS opener.
pub const OPEN_PREFIX: &str = "open ";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppEntry {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub favorite: bool,
    /// Keys a user added by hand; carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AppEntry {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            icon: String::new(),
            favorite: false,
            extra: serde_json::Map::new(),
        }
    }

    /// Bundle path of an `open <path>` command.
    pub fn open_target(&self) -> Option<&Path> {
        self.command
            .strip_prefix(OPEN_PREFIX)
            .map(str::trim)
            .filter(|rest| !rest.is_empty())
            .map(Path::new)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Configuration {
    pub apps: Vec<AppEntry>,
}

impl Configuration {
    pub fn new(apps: Vec<AppEntry>) -> Self {
        Self { apps }
    }

    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::ConfigMissing(path.to_path_buf()));
        }
        let data = fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
        let parsed: Configuration =
            serde_json::from_str(&data).map_err(|source| StoreError::ConfigCorrupt {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            path = %path.display(),
            apps = parsed.apps.len(),
            favorites = parsed.favorites().len(),
            "configuration loaded"
        );
        Ok(parsed)
    }

    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let data = self.to_pretty_json()?;

        let staging = staging_path(path);
        fs::write(&staging, data).map_err(|err| StoreError::io(&staging, err))?;
        if let Err(err) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::io(path, err));
        }
        info!(path = %path.display(), apps = self.apps.len(), "configuration saved");
        Ok(())
    }

    fn to_pretty_json(&self) -> StoreResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }

    pub fn favorites(&self) -> Vec<&AppEntry> {
        self.apps.iter().filter(|app| app.favorite).collect()
    }

    pub fn find(&self, name: &str) -> Option<&AppEntry> {
        self.apps.iter().find(|app| app.name == name)
    }

    /// Sets the flag on every entry carrying `name`, since uniqueness is not enforced.
    pub fn set_favorite(&mut self, name: &str, favorite: bool) -> StoreResult<()> {
        let mut found = false;
        for app in self.apps.iter_mut().filter(|app| app.name == name) {
            app.favorite = favorite;
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(StoreError::UnknownApp(name.to_string()))
        }
    }

    /// Flips the flag and returns the new value.
    pub fn toggle_favorite(&mut self, name: &str) -> StoreResult<bool> {
        let current = self
            .find(name)
            .map(|app| app.favorite)
            .ok_or_else(|| StoreError::UnknownApp(name.to_string()))?;
        self.set_favorite(name, !current)?;
        Ok(!current)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "config.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
