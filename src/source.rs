//! Host collaborators: where cursor and geometry come from, where crops go
//!
//! The tracking core never talks to the platform directly. A
//! [`SourceProvider`] answers "where is the cursor" every tick and "how big
//! is this source" on demand; a [`CropSink`] receives one rectangle per tick.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zoom::geometry::{CropRect, Point};
use crate::zoom::region::RegionGeometry;

/// How a source's geometry is resolved, decided once when it is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Window or game capture, located by window title
    Window { title: String },
    /// Whole-monitor capture, optionally pinned to a monitor index
    Monitor { monitor: Option<usize> },
    /// macOS display capture, reported in points with a backing scale factor
    AppleDisplay { monitor: Option<usize> },
}

impl SourceKind {
    /// Classify a host source-type identifier; `None` for sources that
    /// cannot be tracked
    pub fn from_host_id(host_id: &str, title: &str) -> Option<Self> {
        match host_id {
            "window_capture" | "game_capture" => Some(SourceKind::Window {
                title: title.to_string(),
            }),
            "monitor_capture" | "xshm_input" | "pipewire-desktop-capture-source" => {
                Some(SourceKind::Monitor { monitor: None })
            }
            "display_capture" | "screen_capture" => {
                Some(SourceKind::AppleDisplay { monitor: None })
            }
            _ => None,
        }
    }

    /// Windows move and resize on their own, so their geometry is re-read on
    /// every zoom-in instead of only on explicit refresh
    pub fn has_volatile_geometry(&self) -> bool {
        matches!(self, SourceKind::Window { .. })
    }

    /// Apply a manual monitor override; windows are unaffected
    pub fn with_monitor_override(self, index: Option<usize>) -> Self {
        match self {
            SourceKind::Monitor { .. } => SourceKind::Monitor { monitor: index },
            SourceKind::AppleDisplay { .. } => SourceKind::AppleDisplay { monitor: index },
            window => window,
        }
    }
}

/// A selected source: its host name plus its resolution strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHandle {
    pub name: String,
    pub kind: SourceKind,
}

impl SourceHandle {
    pub fn new(name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Build a handle from the host's source name and type identifier
    pub fn from_host(name: &str, host_id: &str) -> Option<Self> {
        SourceKind::from_host_id(host_id, name).map(|kind| Self::new(name, kind))
    }
}

/// Supplies cursor position and source geometry
pub trait SourceProvider {
    /// Cursor in desktop space; called every tick, must be cheap
    fn cursor_position(&mut self) -> Point;

    /// Resolve a source's geometry; called only on demand
    fn resolve_region(&mut self, source: &SourceHandle) -> Result<RegionGeometry>;
}

/// Consumes one crop rectangle per tick
pub trait CropSink {
    fn apply_crop(&mut self, crop: CropRect);
}

impl<T: CropSink + ?Sized> CropSink for &mut T {
    fn apply_crop(&mut self, crop: CropRect) {
        (**self).apply_crop(crop)
    }
}

impl<T: SourceProvider + ?Sized> SourceProvider for &mut T {
    fn cursor_position(&mut self) -> Point {
        (**self).cursor_position()
    }

    fn resolve_region(&mut self, source: &SourceHandle) -> Result<RegionGeometry> {
        (**self).resolve_region(source)
    }
}

/// Fixed geometry with a settable cursor, for embedding hosts that push
/// cursor samples themselves
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    geometry: Option<RegionGeometry>,
    cursor: Point,
}

impl StaticSource {
    pub fn new(geometry: RegionGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            cursor: Point::ZERO,
        }
    }

    /// A source that never resolves, as when a capture was removed
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    pub fn set_geometry(&mut self, geometry: Option<RegionGeometry>) {
        self.geometry = geometry;
    }
}

impl SourceProvider for StaticSource {
    fn cursor_position(&mut self) -> Point {
        self.cursor
    }

    fn resolve_region(&mut self, source: &SourceHandle) -> Result<RegionGeometry> {
        self.geometry.ok_or_else(|| Error::UnresolvedSource {
            name: source.name.clone(),
        })
    }
}

/// Crop sink that logs each distinct rectangle once
#[derive(Debug, Default)]
pub struct TracingSink {
    last: Option<CropRect>,
}

impl TracingSink {
    pub fn last(&self) -> Option<CropRect> {
        self.last
    }
}

impl CropSink for TracingSink {
    fn apply_crop(&mut self, crop: CropRect) {
        if self.last == Some(crop) {
            return;
        }
        tracing::info!(
            left = crop.left,
            top = crop.top,
            width = crop.width,
            height = crop.height,
            "crop"
        );
        self.last = Some(crop);
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DesktopSource;

#[cfg(feature = "desktop")]
mod desktop {
    use device_query::{DeviceQuery, DeviceState};

    use super::{SourceHandle, SourceProvider};
    use crate::error::Result;
    use crate::zoom::geometry::Point;
    use crate::zoom::region::RegionGeometry;

    /// Live cursor from the desktop with a fixed, host-supplied geometry
    pub struct DesktopSource {
        device_state: DeviceState,
        geometry: RegionGeometry,
    }

    impl DesktopSource {
        pub fn new(geometry: RegionGeometry) -> Self {
            Self {
                device_state: DeviceState::new(),
                geometry,
            }
        }
    }

    impl SourceProvider for DesktopSource {
        fn cursor_position(&mut self) -> Point {
            let (x, y) = self.device_state.get_mouse().coords;
            Point::new(x as f64, y as f64)
        }

        fn resolve_region(&mut self, source: &SourceHandle) -> Result<RegionGeometry> {
            tracing::debug!("Resolved {} to {:?}", source.name, self.geometry);
            Ok(self.geometry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_ids_map_to_kinds() {
        assert_eq!(
            SourceKind::from_host_id("game_capture", "Game"),
            Some(SourceKind::Window {
                title: "Game".to_string()
            })
        );
        assert_eq!(
            SourceKind::from_host_id("xshm_input", "Screen"),
            Some(SourceKind::Monitor { monitor: None })
        );
        assert_eq!(
            SourceKind::from_host_id("screen_capture", "Display"),
            Some(SourceKind::AppleDisplay { monitor: None })
        );
        assert_eq!(SourceKind::from_host_id("image_source", "Logo"), None);
    }

    #[test]
    fn only_windows_are_volatile() {
        let window = SourceHandle::from_host("Editor", "window_capture").unwrap();
        let monitor = SourceHandle::from_host("Screen", "monitor_capture").unwrap();
        assert!(window.kind.has_volatile_geometry());
        assert!(!monitor.kind.has_volatile_geometry());
    }

    #[test]
    fn monitor_override_only_touches_monitor_kinds() {
        let monitor = SourceKind::Monitor { monitor: None }.with_monitor_override(Some(1));
        assert_eq!(monitor, SourceKind::Monitor { monitor: Some(1) });

        let window = SourceKind::Window {
            title: "Editor".to_string(),
        };
        assert_eq!(window.clone().with_monitor_override(Some(1)), window);
    }

    #[test]
    fn unresolved_static_source_errors() {
        let mut source = StaticSource::unresolved();
        let handle = SourceHandle::new("Gone", SourceKind::Monitor { monitor: None });
        assert!(matches!(
            source.resolve_region(&handle),
            Err(Error::UnresolvedSource { .. })
        ));
    }

    #[test]
    fn tracing_sink_remembers_last_crop() {
        let mut sink = TracingSink::default();
        let crop = CropRect::new(0, 0, 640, 360);
        sink.apply_crop(crop);
        sink.apply_crop(crop);
        assert_eq!(sink.last(), Some(crop));
    }
}
