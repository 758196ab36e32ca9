//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (camera projection and orbit speeds, display
//! colors, frame cap) are consolidated here. Options serialize to/from
//! TOML for presets stored alongside the application.

mod camera;
mod display;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
use serde::{Deserialize, Serialize};

use crate::error::MannequinError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and orbit-control parameters.
    pub camera: CameraOptions,
    /// Viewport display parameters.
    pub display: DisplayOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Io`] when the file cannot be read and
    /// [`MannequinError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, MannequinError> {
        let content =
            std::fs::read_to_string(path).map_err(MannequinError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MannequinError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MannequinError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MannequinError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MannequinError::Io)?;
        }
        std::fs::write(path, content).map_err(MannequinError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
fovy = 60.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.fovy, 60.0);
        // Everything else should be default
        assert_eq!(opts.camera.max_distance, 10.0);
        assert_eq!(opts.display.target_fps, 0);
    }

    #[test]
    fn orbit_limits_match_the_presentation_defaults() {
        let opts = CameraOptions::default();
        assert_eq!(opts.min_distance, 0.5);
        assert_eq!(opts.max_distance, 10.0);
        assert!(opts.damping < 1.0);
    }
}
