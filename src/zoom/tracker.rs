//! Cursor-following zoom window
//!
//! The tracker owns the zoom window's live (`current`) and desired (`target`)
//! top-left corner in region-local space, together with the region it pans
//! over. Two tracking styles are supported:
//! 1. Lazy - the cursor roams freely inside an inset "active zone" and the
//!    window only pans by however far the cursor leaves it
//! 2. Centered - active border of 0.5 or more; the window re-centers on the
//!    cursor every tick, capped at `max_speed` pixels per tick

use super::geometry::{clamp_point, rect_from_edges, Point, Rect, Size};
use super::region::{Region, RegionGeometry};
use crate::config::TrackingConfig;

/// Reference frame interval the smoothing factor is tuned against
const SMOOTH_REFERENCE_MS: f64 = 40.0;

/// Remaining distance below which the window lands exactly on its target.
/// Without it a smoothed approach stalls one ulp short and floors a pixel early.
const SETTLE_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackingConfig,
    region: Region,
    /// Live top-left of the zoom window, may be mid-interpolation
    current: Point,
    /// Where following wants the zoom window to be
    target: Point,
}

impl Tracker {
    pub fn new(config: TrackingConfig) -> Self {
        let config = config.sanitized();
        let mut region = Region::default();
        region.apply_overrides(&config);
        Self {
            config,
            region,
            current: Point::ZERO,
            target: Point::ZERO,
        }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Replace the configuration between ticks
    pub fn set_config(&mut self, config: TrackingConfig) {
        self.config = config.sanitized();
        self.region.apply_overrides(&self.config);
        if self.region.is_resolved() && !self.config.centered_tracking() {
            self.target = self.clamp_to_region(self.target);
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn resolve_region(&mut self, raw: RegionGeometry) {
        self.region.resolve(raw);
        if self.region.is_resolved() {
            self.target = self.clamp_to_region(self.target);
            self.current = self.clamp_to_region(self.current);
        }
    }

    pub fn invalidate_region(&mut self) {
        self.region.invalidate();
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Zoom window size, shrunk to the region when configured larger
    pub fn zoom_size(&self) -> Size {
        Size::new(
            self.config.zoom_width as f64,
            self.config.zoom_height as f64,
        )
        .min(self.region.size())
    }

    /// Range the zoom window's top-left may occupy, in region-local space
    pub fn travel_bounds(&self) -> Rect {
        let region = self.region.size();
        let zoom = self.zoom_size();
        Rect::new(
            0.0,
            0.0,
            (region.width - zoom.width).max(0.0),
            (region.height - zoom.height).max(0.0),
        )
    }

    pub fn clamp_to_region(&self, point: Point) -> Point {
        clamp_point(point, self.travel_bounds())
    }

    /// The zoom window at its current position, clamped inside the region
    pub fn zoom_window(&self) -> Rect {
        Rect::from_origin_size(self.clamp_to_region(self.current), self.zoom_size())
    }

    /// Zone the cursor may roam in without panning, in region-local space
    pub fn active_zone(&self) -> Rect {
        let zoom = self.zoom_size();
        if self.config.centered_tracking() {
            let center = self.target + zoom.half();
            return rect_from_edges(center.x, center.y, center.x, center.y);
        }

        let inset = self.config.active_border * zoom.width.min(zoom.height);
        rect_from_edges(
            self.target.x + inset,
            self.target.y + inset,
            self.target.x + zoom.width - inset,
            self.target.y + zoom.height - inset,
        )
    }

    /// Pan toward a source-space cursor sample.
    ///
    /// `transitioning` is true while a zoom animation is still playing; it
    /// disables smoothing and the speed cap so the window keeps up with the
    /// crop animation. Returns whether the zoom window moved.
    pub fn follow(&mut self, cursor: Point, transitioning: bool) -> bool {
        if !self.region.is_resolved() {
            return false;
        }

        let bounds = self.region.bounds();
        if !bounds.contains_x(cursor.x) && !bounds.contains_y(cursor.y) {
            return false;
        }

        let local = self.region.to_local(cursor);
        let zone = self.active_zone();

        if local.x < zone.x {
            self.target.x += local.x - zone.x;
        } else if local.x > zone.right() {
            self.target.x += local.x - zone.right();
        }
        if local.y < zone.y {
            self.target.y += local.y - zone.y;
        } else if local.y > zone.bottom() {
            self.target.y += local.y - zone.bottom();
        }

        let lazy = !self.config.centered_tracking();
        if lazy {
            self.target = self.clamp_to_region(self.target);
        }

        let divisor = if transitioning {
            1.0
        } else {
            (self.config.smooth * SMOOTH_REFERENCE_MS / self.config.frame_interval_ms as f64)
                .max(1.0)
        };

        let mut offset = (self.target - self.current) / divisor;
        if !transitioning && !lazy {
            offset = clamp_speed(offset, self.config.max_speed);
        }

        self.current = self.current + offset;
        if (self.target.x - self.current.x).abs() < SETTLE_EPSILON {
            self.current.x = self.target.x;
        }
        if (self.target.y - self.current.y).abs() < SETTLE_EPSILON {
            self.current.y = self.target.y;
        }
        !offset.is_zero()
    }

    /// Jump the target so the source-space cursor sits in the middle of the
    /// zoom window. With `snap` the live position follows immediately; pass
    /// it only when no zoom-out has progressed, so a zoom-in never starts
    /// from somewhere the last zoom-out did not end.
    pub fn center_on_cursor(&mut self, cursor: Point, snap: bool) {
        if !self.region.is_resolved() {
            return;
        }

        let local = self.region.to_local(cursor);
        self.target = self.clamp_to_region(local - self.zoom_size().half());
        if snap {
            self.current = self.target;
        }
        tracing::debug!(
            "Centered on cursor ({:.0}, {:.0}) -> target ({:.0}, {:.0})",
            local.x,
            local.y,
            self.target.x,
            self.target.y
        );
    }
}

/// Scale `offset` down so its length does not exceed `max_speed`, keeping its direction
pub fn clamp_speed(offset: Point, max_speed: f64) -> Point {
    let length = offset.length();
    if length > max_speed && length > 0.0 {
        offset * (max_speed / length)
    } else {
        offset
    }
}
