use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "PiMenu";

pub struct AppPaths {
    pub config_file: PathBuf,
    pub theme_file: PathBuf,
}

impl AppPaths {
    /// `~/Library/Application Support/PiMenu` on macOS, the XDG config dir elsewhere.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir().context("Unable to determine the user config directory")?;
        Ok(Self::under(base.join(APP_DIR)))
    }

    pub fn under(config_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join("config.json"),
            theme_file: config_dir.join("theme.json"),
        }
    }
}
