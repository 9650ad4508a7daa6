//! Tracking configuration and its persistence interface

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Version written by this build; older files are upgraded through serde defaults
pub const CONFIG_VERSION: u32 = 1;

/// Manual size for the tracked region, replacing the platform-reported size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSize {
    pub width: u32,
    pub height: u32,
}

/// Manual offset of the tracked region relative to the source's top left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionOffset {
    pub x: i32,
    pub y: i32,
}

/// Snapshot of everything the tracker and animation clock read during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub version: u32,
    /// Zoom window size in source pixels
    pub zoom_width: u32,
    pub zoom_height: u32,
    /// Inset of the lazy-tracking zone as a fraction of the zoom window's
    /// smaller side. 0.5 or more pins the cursor to the center.
    pub active_border: f64,
    /// Pixels per tick cap for centered tracking
    pub max_speed: f64,
    pub smooth: f64,
    pub zoom_duration_ms: u64,
    pub frame_interval_ms: u64,
    pub region_size_override: Option<RegionSize>,
    pub region_offset: Option<RegionOffset>,
    /// Monitor index used instead of the one the source reports
    pub monitor_override: Option<usize>,
    pub debug: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            zoom_width: 1280,
            zoom_height: 720,
            active_border: 0.15,
            max_speed: 160.0,
            smooth: 1.0,
            zoom_duration_ms: 300,
            frame_interval_ms: 16,
            region_size_override: None,
            region_offset: None,
            monitor_override: None,
            debug: false,
        }
    }
}

impl TrackingConfig {
    /// Copy with every field forced into its valid range
    pub fn sanitized(&self) -> Self {
        let non_negative = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            zoom_width: self.zoom_width.max(1),
            zoom_height: self.zoom_height.max(1),
            active_border: non_negative(self.active_border).min(0.5),
            max_speed: non_negative(self.max_speed),
            smooth: non_negative(self.smooth),
            frame_interval_ms: self.frame_interval_ms.max(1),
            ..self.clone()
        }
    }

    /// Frames a full zoom transition takes; never zero
    pub fn total_frames(&self) -> u32 {
        let frames = self.zoom_duration_ms / self.frame_interval_ms.max(1);
        frames.clamp(1, u32::MAX as u64) as u32
    }

    /// Active border of 0.5 or more switches to centered tracking
    pub fn centered_tracking(&self) -> bool {
        self.active_border >= 0.5
    }

    /// Whether the two configs resolve the tracked region differently
    pub fn region_changed(&self, other: &TrackingConfig) -> bool {
        self.region_size_override != other.region_size_override
            || self.region_offset != other.region_offset
            || self.monitor_override != other.monitor_override
    }
}

/// Loads and saves [`TrackingConfig`] snapshots
pub trait ConfigStore {
    fn load_config(&self) -> Result<TrackingConfig>;
    fn save_config(&self, config: &TrackingConfig) -> Result<()>;
}

/// JSON file backed config store
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default())
            .join("ZoomFollow")
            .join("config.json")
    }
}

impl ConfigStore for JsonConfigStore {
    /// Missing file yields defaults
    fn load_config(&self) -> Result<TrackingConfig> {
        if !self.path.exists() {
            tracing::info!("No config at {:?}, using defaults", self.path);
            return Ok(TrackingConfig::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let config: TrackingConfig = serde_json::from_str(&contents)?;
        if config.version > CONFIG_VERSION {
            return Err(Error::UnsupportedConfigVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }

        Ok(TrackingConfig {
            version: CONFIG_VERSION,
            ..config.sanitized()
        })
    }

    fn save_config(&self, config: &TrackingConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let config = TrackingConfig {
            version: CONFIG_VERSION,
            ..config.clone()
        };
        let contents = serde_json::to_string_pretty(&config)?;
        std::fs::write(&self.path, contents)?;
        tracing::debug!("Saved config to {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_frames_never_zero() {
        let config = TrackingConfig {
            zoom_duration_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.total_frames(), 1);

        let config = TrackingConfig {
            zoom_duration_ms: 10,
            frame_interval_ms: 16,
            ..Default::default()
        };
        assert_eq!(config.total_frames(), 1);

        let config = TrackingConfig {
            zoom_duration_ms: 300,
            frame_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.total_frames(), 300);

        assert_eq!(TrackingConfig::default().total_frames(), 18);
    }

    #[test]
    fn sanitized_clamps_ranges() {
        let config = TrackingConfig {
            zoom_width: 0,
            active_border: 0.9,
            max_speed: -5.0,
            smooth: f64::NAN,
            frame_interval_ms: 0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.zoom_width, 1);
        assert_eq!(config.active_border, 0.5);
        assert_eq!(config.max_speed, 0.0);
        assert_eq!(config.smooth, 0.0);
        assert_eq!(config.frame_interval_ms, 1);
        assert!(config.centered_tracking());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.load_config().unwrap(), TrackingConfig::default());
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("nested").join("config.json"));
        let config = TrackingConfig {
            zoom_width: 640,
            zoom_height: 360,
            region_size_override: Some(RegionSize {
                width: 2560,
                height: 1440,
            }),
            region_offset: Some(RegionOffset { x: -200, y: 40 }),
            ..Default::default()
        };

        store.save_config(&config).unwrap();
        assert_eq!(store.load_config().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "zoom_width": 800, "active_border": 0.3 }"#).unwrap();

        let config = JsonConfigStore::new(path).load_config().unwrap();
        assert_eq!(config.zoom_width, 800);
        assert_eq!(config.zoom_height, 720);
        assert_eq!(config.active_border, 0.3);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "version": 99 }"#).unwrap();

        let err = JsonConfigStore::new(path).load_config().unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedConfigVersion { found: 99, .. }
        ));
    }
}
