//! The tracked capture area and its coordinate spaces
//!
//! Three spaces are involved:
//! - desktop space: where the platform reports the cursor (logical pixels)
//! - source space: desktop space multiplied by the source's scale factor,
//!   the space raw region geometry is reported in
//! - region-local space: source space relative to the effective region
//!   origin; the tracker's zoom window position lives here

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, Size};
use crate::config::{RegionOffset, RegionSize, TrackingConfig};

/// Geometry as resolved by a source provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Display pixel density relative to the reference DPI
    pub scale: f64,
}

impl RegionGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale: 1.0,
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }
}

/// Tracked region: raw geometry plus the manual size override and offset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    raw: Option<RegionGeometry>,
    size_override: Option<RegionSize>,
    offset: Option<RegionOffset>,
}

impl Region {
    pub fn new(raw: RegionGeometry) -> Self {
        Self {
            raw: Some(raw),
            ..Default::default()
        }
    }

    /// Take the override and offset settings from `config`
    pub fn apply_overrides(&mut self, config: &TrackingConfig) {
        self.size_override = config.region_size_override;
        self.offset = config.region_offset;
    }

    pub fn resolve(&mut self, raw: RegionGeometry) {
        self.raw = Some(raw);
    }

    /// Forget resolved geometry; tracking stays suspended until the next resolve
    pub fn invalidate(&mut self) {
        self.raw = None;
    }

    /// Resolved at least once and not degenerate
    pub fn is_resolved(&self) -> bool {
        self.raw.is_some() && !self.size().is_empty()
    }

    pub fn scale(&self) -> f64 {
        match self.raw {
            Some(raw) if raw.scale.is_finite() && raw.scale > 0.0 => raw.scale,
            _ => 1.0,
        }
    }

    /// Effective size: the override when set, otherwise the raw size
    pub fn size(&self) -> Size {
        match (self.size_override, self.raw) {
            (Some(size), _) => Size::new(size.width as f64, size.height as f64),
            (None, Some(raw)) => Size::new(raw.width as f64, raw.height as f64),
            (None, None) => Size::default(),
        }
    }

    /// Manual offset relative to the source's own top left
    pub fn offset(&self) -> Point {
        self.offset
            .map(|o| Point::new(o.x as f64, o.y as f64))
            .unwrap_or_default()
    }

    pub fn raw_origin(&self) -> Point {
        self.raw
            .map(|raw| Point::new(raw.x as f64, raw.y as f64))
            .unwrap_or_default()
    }

    /// Effective origin in source space
    pub fn origin(&self) -> Point {
        self.raw_origin() + self.offset()
    }

    /// Effective bounds in source space
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// The whole region expressed as a crop of the source
    pub fn crop_bounds(&self) -> Rect {
        Rect::from_origin_size(self.offset(), self.size())
    }

    /// Convert a desktop-space cursor sample into source space.
    ///
    /// Must be applied with the same scale the geometry was resolved with,
    /// otherwise cursor and region disagree on a mixed-DPI desktop.
    pub fn to_source_space(&self, cursor: Point) -> Point {
        cursor * self.scale()
    }

    /// Convert a source-space point into region-local space
    pub fn to_local(&self, point: Point) -> Point {
        point - self.origin()
    }
}
