use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ThemeError;
use crate::layout::{Canvas, Radius};

pub const DEFAULT_PRESET: &str = "glass";
const PRESET_KEY: &str = "preset";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background_inner: String,
    pub background_outer: String,
    pub ring: String,
    pub accent: String,
    pub text: String,
    pub button_border: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub window_width: f64,
    pub window_height: f64,
    pub button_size: f64,
    pub radius_ratio: f64,
    pub radius_margin: f64,
    #[serde(default)]
    pub radius_fixed: Option<f64>,
    pub font_family: String,
    pub font_size: u32,
    pub colors: ThemeColors,
}

struct ThemeDefinition {
    window_width: f64,
    window_height: f64,
    button_size: f64,
    radius_ratio: f64,
    radius_margin: f64,
    font_family: &'static str,
    font_size: u32,
    background_inner: &'static str,
    background_outer: &'static str,
    ring: &'static str,
    accent: &'static str,
    text: &'static str,
    button_border: &'static str,
}

const THEME_PRESETS: &[(&str, ThemeDefinition)] = &[
    (
        "glass",
        ThemeDefinition {
            window_width: 900.0,
            window_height: 700.0,
            button_size: 90.0,
            radius_ratio: 1.0 / 3.0,
            radius_margin: 0.0,
            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif",
            font_size: 12,
            background_inner: "rgba(30, 40, 60, 0.86)",
            background_outer: "rgba(10, 15, 25, 0.98)",
            ring: "rgba(255, 255, 255, 0.12)",
            accent: "rgba(102, 126, 234, 0.6)",
            text: "#ffffff",
            button_border: "rgba(255, 255, 255, 0.2)",
        },
    ),
    (
        "classic",
        ThemeDefinition {
            window_width: 800.0,
            window_height: 600.0,
            button_size: 80.0,
            radius_ratio: 1.0 / 3.0,
            radius_margin: 0.0,
            font_family: "sans-serif",
            font_size: 10,
            background_inner: "#f0f0f0",
            background_outer: "#e0e0e0",
            ring: "#c0c0c0",
            accent: "#d0d0d0",
            text: "#000000",
            button_border: "#d0d0d0",
        },
    ),
];

impl Default for Theme {
    fn default() -> Self {
        Theme::from_name(DEFAULT_PRESET).unwrap_or_else(|| {
            Theme::from_definition(DEFAULT_PRESET.to_string(), &THEME_PRESETS[0].1)
        })
    }
}

impl Theme {
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        THEME_PRESETS.iter().map(|(key, _)| *key)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        THEME_PRESETS
            .iter()
            .find(|preset| preset.0 == name)
            .map(|(_, def)| Theme::from_definition(name.to_string(), def))
    }

    fn from_definition(name: String, def: &ThemeDefinition) -> Theme {
        Theme {
            name,
            window_width: def.window_width,
            window_height: def.window_height,
            button_size: def.button_size,
            radius_ratio: def.radius_ratio,
            radius_margin: def.radius_margin,
            radius_fixed: None,
            font_family: def.font_family.to_string(),
            font_size: def.font_size,
            colors: ThemeColors {
                background_inner: def.background_inner.to_string(),
                background_outer: def.background_outer.to_string(),
                ring: def.ring.to_string(),
                accent: def.accent.to_string(),
                text: def.text.to_string(),
                button_border: def.button_border.to_string(),
            },
        }
    }

    /// Never fails: a missing or unusable file yields the default theme.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no theme file, using defaults");
            return Theme::default();
        }
        match Theme::try_load(path) {
            Ok(theme) => theme,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring theme file");
                Theme::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ThemeError> {
        let data = fs::read_to_string(path)?;
        let Value::Object(overrides) = serde_json::from_str::<Value>(&data)? else {
            return Err(ThemeError::Shape);
        };
        Theme::merged(overrides)
    }

    /// Keys of `overrides` replace the chosen preset's keys; nested objects such
    /// as `colors` are merged one level deep.
    fn merged(mut overrides: Map<String, Value>) -> Result<Self, ThemeError> {
        let base = match overrides.remove(PRESET_KEY) {
            Some(Value::String(name)) => Theme::from_name(&name).unwrap_or_else(|| {
                warn!(preset = %name, "unknown theme preset");
                Theme::default()
            }),
            _ => Theme::default(),
        };

        let Value::Object(mut merged) = serde_json::to_value(&base)? else {
            return Err(ThemeError::Shape);
        };
        for (key, value) in overrides {
            match value {
                Value::Object(nested) if merged.get(&key).is_some_and(Value::is_object) => {
                    if let Some(Value::Object(inner)) = merged.get_mut(&key) {
                        inner.extend(nested);
                    }
                }
                value => {
                    merged.insert(key, value);
                }
            }
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.window_width, self.window_height)
    }

    pub fn radius(&self) -> Radius {
        match self.radius_fixed {
            Some(r) => Radius::Fixed(r),
            None => Radius::Fraction {
                ratio: self.radius_ratio,
                margin: self.radius_margin,
            },
        }
    }
}
