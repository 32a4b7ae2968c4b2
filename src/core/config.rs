//! Session configuration: runtime settings and world dimensions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Runtime settings consumed at startup and editable from the menu.
///
/// Every field has a documented default. Values are only checked for
/// parsing and for their documented minimum; a rejected value leaves the
/// previous one in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Divides the screen resolution for the coarse pass (>= 1.0).
    pub resolution_divisor: f32,
    /// How far the renderer traces, in world units.
    pub render_distance: f32,
    /// Horizontal edge length of the physics window, in voxels.
    pub sim_extent: u32,
    /// Automaton ticks run per frame.
    pub ticks_per_frame: u32,
    /// Ambient occlusion sampling diameter, in voxels.
    pub ao_diameter: u32,
    /// Ambient occlusion sample stride (>= 1).
    pub ao_skip: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution_divisor: 4.0,
            render_distance: 512.0,
            sim_extent: 128,
            ticks_per_frame: 1,
            ao_diameter: 8,
            ao_skip: 1,
        }
    }
}

/// Menu keywords in display order, with the help line shown for each.
pub const SETTING_KEYS: [(&str, &str); 6] = [
    ("res", "Resolution modifier"),
    ("dist", "Render distance"),
    ("sim", "Physics simulation distance"),
    ("tick", "Physics ticks per frame"),
    ("diam", "Ambient occlusion diameter"),
    ("skip", "Ambient occlusion frame skipping"),
];

impl Settings {
    /// Parse `value` and assign it to the setting named by `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let text = value.trim();

        match key {
            "res" => {
                let v: f32 = text.parse().map_err(|_| invalid())?;
                if v.is_nan() || v < 1.0 {
                    return Err(invalid());
                }
                self.resolution_divisor = v;
            }
            "dist" => {
                let v: f32 = text.parse().map_err(|_| invalid())?;
                if !v.is_finite() {
                    return Err(invalid());
                }
                self.render_distance = v;
            }
            "sim" => self.sim_extent = text.parse().map_err(|_| invalid())?,
            "tick" => self.ticks_per_frame = text.parse().map_err(|_| invalid())?,
            "diam" => self.ao_diameter = text.parse().map_err(|_| invalid())?,
            "skip" => {
                let v: u32 = text.parse().map_err(|_| invalid())?;
                if v == 0 {
                    return Err(invalid());
                }
                self.ao_skip = v;
            }
            _ => return Err(Error::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    /// Current value of a setting, formatted for display.
    pub fn display_value(&self, key: &str) -> Option<String> {
        Some(match key {
            "res" => self.resolution_divisor.to_string(),
            "dist" => self.render_distance.to_string(),
            "sim" => self.sim_extent.to_string(),
            "tick" => self.ticks_per_frame.to_string(),
            "diam" => self.ao_diameter.to_string(),
            "skip" => self.ao_skip.to_string(),
            _ => return None,
        })
    }

    /// Load settings from a JSON file, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// World dimensions chosen at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels per world axis (power of two).
    pub axis_size: u32,
    /// Voxels per occupancy chunk axis (power of two, <= axis_size).
    pub pass_res: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            axis_size: 1024,
            pass_res: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_valid_values() {
        let mut settings = Settings::default();
        settings.set("res", "2.5").unwrap();
        settings.set("sim", " 64 ").unwrap();
        settings.set("skip", "3").unwrap();
        assert_eq!(settings.resolution_divisor, 2.5);
        assert_eq!(settings.sim_extent, 64);
        assert_eq!(settings.ao_skip, 3);
    }

    #[test]
    fn test_invalid_value_keeps_previous() {
        let mut settings = Settings::default();
        let before = settings.clone();

        assert!(matches!(settings.set("tick", "lots"), Err(Error::InvalidConfigValue { .. })));
        assert!(matches!(settings.set("res", "0.5"), Err(Error::InvalidConfigValue { .. })));
        assert!(matches!(settings.set("skip", "0"), Err(Error::InvalidConfigValue { .. })));
        assert!(matches!(settings.set("sim", "-4"), Err(Error::InvalidConfigValue { .. })));
        assert_eq!(settings, before);
    }

    #[test]
    fn test_unknown_setting() {
        let mut settings = Settings::default();
        assert!(matches!(settings.set("fov", "90"), Err(Error::UnknownSetting(_))));
    }

    #[test]
    fn test_display_value() {
        let settings = Settings::default();
        assert_eq!(settings.display_value("tick").as_deref(), Some("1"));
        assert!(settings.display_value("nope").is_none());
        for (key, _) in SETTING_KEYS {
            assert!(settings.display_value(key).is_some());
        }
    }

    #[test]
    fn test_json_roundtrip_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert_eq!(Settings::load_or_default(&path), Settings::default());

        let mut settings = Settings::default();
        settings.set("diam", "12").unwrap();
        settings.save(&path).unwrap();
        assert_eq!(Settings::load_or_default(&path), settings);

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "sim_extent": 32 }"#).unwrap();
        assert_eq!(settings.sim_extent, 32);
        assert_eq!(settings.ticks_per_frame, Settings::default().ticks_per_frame);
    }
}
