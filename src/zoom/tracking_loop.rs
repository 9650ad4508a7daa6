//! Per-tick orchestration of source, tracker, animation clock and sink

use super::animation::AnimationClock;
use super::geometry::{CropRect, Point};
use super::tracker::Tracker;
use crate::config::TrackingConfig;
use crate::error::{Error, Result};
use crate::source::{CropSink, SourceHandle, SourceProvider};

/// Whether the host's periodic tick is currently wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickState {
    #[default]
    Idle,
    Ticking,
}

/// One tracked source: all zoom state for it lives here
pub struct TrackingLoop<S, K> {
    source: S,
    sink: K,
    handle: Option<SourceHandle>,
    tracker: Tracker,
    clock: AnimationClock,
    /// Zoom engaged
    locked: bool,
    /// Cursor following engaged while zoomed
    track: bool,
    tick_state: TickState,
    geometry_stale: bool,
}

impl<S: SourceProvider, K: CropSink> TrackingLoop<S, K> {
    pub fn new(source: S, sink: K, config: TrackingConfig) -> Self {
        let tracker = Tracker::new(config);
        let clock = AnimationClock::new(tracker.config().total_frames());
        Self {
            source,
            sink,
            handle: None,
            tracker,
            clock,
            locked: false,
            track: true,
            tick_state: TickState::Idle,
            geometry_stale: true,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_tracking(&self) -> bool {
        self.track
    }

    pub fn tick_state(&self) -> TickState {
        self.tick_state
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn source_handle(&self) -> Option<&SourceHandle> {
        self.handle.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.tracker.config().frame_interval_ms
    }

    /// Switch to another source (or none) and resolve its geometry right away
    pub fn select_source(&mut self, handle: Option<SourceHandle>) {
        let monitor_override = self.tracker.config().monitor_override;
        self.handle = handle.map(|h| SourceHandle {
            kind: h.kind.with_monitor_override(monitor_override),
            ..h
        });
        self.tracker.invalidate_region();
        self.geometry_stale = true;

        match &self.handle {
            Some(handle) => {
                tracing::info!("Selected source {}", handle.name);
                if let Err(e) = self.refresh_geometry() {
                    tracing::debug!("Region stays invalid until the next refresh: {e}");
                }
            }
            None => tracing::info!("Source cleared"),
        }
    }

    /// Re-resolve the selected source's geometry
    pub fn refresh_geometry(&mut self) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(Error::NoSource)?;

        match self.source.resolve_region(handle) {
            Ok(raw) => {
                self.tracker.resolve_region(raw);
                self.geometry_stale = false;
                tracing::info!(
                    "Resolved {}: {}x{} at ({}, {}) scale {}",
                    handle.name,
                    raw.width,
                    raw.height,
                    raw.x,
                    raw.y,
                    raw.scale
                );
                // Resume an animation that stalled while the source was unresolved
                if self.clock.has_pending_frames(self.locked, self.track) {
                    self.ensure_ticking();
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to resolve {}: {e}", handle.name);
                self.tracker.invalidate_region();
                Err(e)
            }
        }
    }

    /// Apply a new configuration between ticks
    pub fn set_config(&mut self, config: TrackingConfig) {
        let region_changed = self.tracker.config().region_changed(&config);
        let monitor_changed = self.tracker.config().monitor_override != config.monitor_override;

        self.tracker.set_config(config);
        self.clock.set_total_frames(self.tracker.config().total_frames());

        if monitor_changed {
            let monitor_override = self.tracker.config().monitor_override;
            if let Some(handle) = self.handle.as_mut() {
                handle.kind = handle.kind.clone().with_monitor_override(monitor_override);
            }
        }
        if region_changed {
            self.geometry_stale = true;
            if monitor_changed && self.handle.is_some() {
                if let Err(e) = self.refresh_geometry() {
                    tracing::debug!("Monitor override not applied yet: {e}");
                }
            }
        }
    }

    /// Engage or release the zoom
    pub fn toggle_zoom(&mut self) {
        if self.locked {
            self.locked = false;
            // Keep ticking so the zoom-out can play
            self.ensure_ticking();
            tracing::info!("Zoom: false");
            return;
        }

        let Some(handle) = self.handle.as_ref() else {
            tracing::warn!("Zoom requested without a source");
            return;
        };

        let needs_refresh = self.geometry_stale
            || !self.tracker.region().is_resolved()
            || handle.kind.has_volatile_geometry();
        if needs_refresh && self.refresh_geometry().is_err() {
            return;
        }
        if !self.tracker.region().is_resolved() {
            tracing::warn!("Zoom requested but the source has no usable geometry");
            return;
        }

        let cursor = self.cursor_sample();
        self.tracker.center_on_cursor(cursor, self.clock.at_rest());
        self.locked = true;
        self.ensure_ticking();
        tracing::info!("Zoom: true");
    }

    /// Engage or release cursor following
    pub fn toggle_track(&mut self) {
        self.track = !self.track;
        if self.track && self.locked {
            self.ensure_ticking();
        }
        tracing::info!("Tracking: {}", self.track);
    }

    /// One host frame: follow, animate, emit.
    ///
    /// Returns the emitted crop, or `None` while the region is unresolved.
    /// An unresolved region also drops the tick; a successful refresh re-arms it.
    pub fn tick(&mut self) -> Option<CropRect> {
        if !self.tracker.region().is_resolved() {
            self.stop_ticking();
            return None;
        }

        if self.locked && (self.track || self.clock.is_updating()) {
            let cursor = self.cursor_sample();
            self.tracker.follow(cursor, self.clock.is_updating());
        }

        let crop = self.clock.advance(self.locked, &self.tracker);
        tracing::debug!(?crop, state = ?self.clock.state(), "tick");
        self.sink.apply_crop(crop);

        if self.clock.should_stop(self.locked, self.track) {
            self.stop_ticking();
        }

        Some(crop)
    }

    /// `Idle -> Ticking`; returns whether a transition happened
    pub fn ensure_ticking(&mut self) -> bool {
        if self.tick_state == TickState::Ticking {
            return false;
        }
        self.tick_state = TickState::Ticking;
        tracing::debug!("Tick subscribed");
        true
    }

    /// `Ticking -> Idle`; returns whether a transition happened
    pub fn stop_ticking(&mut self) -> bool {
        if self.tick_state == TickState::Idle {
            return false;
        }
        self.tick_state = TickState::Idle;
        tracing::debug!("Tick unsubscribed");
        true
    }

    /// Cursor in source space, scaled with the same factor as the region
    fn cursor_sample(&mut self) -> Point {
        let cursor = self.source.cursor_position();
        self.tracker.region().to_source_space(cursor)
    }
}
