//! Zoom in/out transition driver
//!
//! Two frame counters drive the animation. Only one of them advances at a
//! time and every advance mirrors the other one (`in + out == total`), so a
//! reversal halfway through resumes from the rectangle already on screen
//! instead of restarting.

use super::easing::cubic_in_out;
use super::geometry::{CropRect, Rect};
use super::tracker::Tracker;

/// Eased progress after which a zoom-in stops counting as "updating",
/// letting follow smoothing resume before the crop fully settles
const ZOOM_IN_SETTLE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    ZoomedOut,
    ZoomingIn,
    ZoomedIn,
    ZoomingOut,
}

#[derive(Debug, Clone)]
pub struct AnimationClock {
    total_frames: u32,
    zoom_in_elapsed: u32,
    zoom_out_elapsed: u32,
    updating: bool,
    zooming_in: bool,
}

impl AnimationClock {
    pub fn new(total_frames: u32) -> Self {
        Self {
            total_frames: total_frames.max(1),
            zoom_in_elapsed: 0,
            zoom_out_elapsed: 0,
            updating: true,
            zooming_in: false,
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Change the transition length, keeping the counters' relative progress
    pub fn set_total_frames(&mut self, total_frames: u32) {
        let total_frames = total_frames.max(1);
        if total_frames == self.total_frames {
            return;
        }

        let rescale = |elapsed: u32| {
            (elapsed as u64 * total_frames as u64 / self.total_frames as u64) as u32
        };
        let mirrored = self.zoom_in_elapsed + self.zoom_out_elapsed == self.total_frames;
        self.zoom_in_elapsed = rescale(self.zoom_in_elapsed);
        self.zoom_out_elapsed = if mirrored {
            total_frames - self.zoom_in_elapsed
        } else {
            rescale(self.zoom_out_elapsed)
        };
        self.total_frames = total_frames;
    }

    pub fn zoom_in_elapsed(&self) -> u32 {
        self.zoom_in_elapsed
    }

    pub fn zoom_out_elapsed(&self) -> u32 {
        self.zoom_out_elapsed
    }

    /// True while a transition is visibly animating
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// No zoom-out has progressed since the last completed zoom-in
    pub fn at_rest(&self) -> bool {
        self.zoom_out_elapsed == 0
    }

    pub fn state(&self) -> AnimationState {
        if self.zooming_in {
            if self.zoom_in_elapsed >= self.total_frames {
                AnimationState::ZoomedIn
            } else {
                AnimationState::ZoomingIn
            }
        } else if self.zoom_out_elapsed >= self.total_frames || self.zoom_out_elapsed == 0 {
            AnimationState::ZoomedOut
        } else {
            AnimationState::ZoomingOut
        }
    }

    /// Whether the periodic tick can be dropped: fully zoomed out, or
    /// fully zoomed in with following disabled
    pub fn should_stop(&self, locked: bool, track: bool) -> bool {
        if locked {
            !track && self.zoom_in_elapsed >= self.total_frames
        } else {
            self.zoom_out_elapsed >= self.total_frames
        }
    }

    /// Whether frames remain to be shown: a zoom-in still settling or
    /// following engaged while locked, any zoom-in progress left to unwind
    /// while unlocked. Unlike [`Self::should_stop`] this is false at rest
    /// before the first zoom.
    pub fn has_pending_frames(&self, locked: bool, track: bool) -> bool {
        if locked {
            track || self.zoom_in_elapsed < self.total_frames
        } else {
            self.zoom_in_elapsed > 0
        }
    }

    /// Advance one frame toward the zoomed-in (`locked`) or zoomed-out state
    /// and return the crop rectangle for this frame
    pub fn advance(&mut self, locked: bool, tracker: &Tracker) -> CropRect {
        let full = tracker.region().crop_bounds();
        let window = tracker.zoom_window();
        let total = self.total_frames;
        self.zooming_in = locked;

        let rect = if locked {
            self.zoom_out_elapsed = 0;
            if self.zoom_in_elapsed < total {
                self.zoom_in_elapsed += 1;
                self.zoom_out_elapsed = total - self.zoom_in_elapsed;
                let t = cubic_in_out(self.zoom_in_elapsed as f64 / total as f64);
                self.updating = t < ZOOM_IN_SETTLE;
                if self.zoom_in_elapsed == total {
                    tracing::debug!("Zoom in complete");
                }
                interpolate(full, window, t)
            } else {
                self.updating = false;
                offset_window(full, window)
            }
        } else {
            self.zoom_in_elapsed = 0;
            if self.zoom_out_elapsed < total {
                self.zoom_out_elapsed += 1;
                self.zoom_in_elapsed = total - self.zoom_out_elapsed;
                if self.zoom_out_elapsed == total {
                    tracing::debug!("Zoom out complete");
                    self.updating = false;
                    full
                } else {
                    self.updating = true;
                    let t = cubic_in_out(self.zoom_out_elapsed as f64 / total as f64);
                    interpolate(full, window, 1.0 - t)
                }
            } else {
                self.updating = false;
                full
            }
        };

        CropRect::from_rect(rect)
    }
}

/// Zoom window (region-local) moved into the region's crop space
fn offset_window(full: Rect, window: Rect) -> Rect {
    Rect::new(full.x + window.x, full.y + window.y, window.width, window.height)
}

/// Blend from the full region (`t = 0`) to the zoom window (`t = 1`)
fn interpolate(full: Rect, window: Rect, t: f64) -> Rect {
    Rect::new(
        full.x + t * window.x,
        full.y + t * window.y,
        full.width - t * (full.width - window.width),
        full.height - t * (full.height - window.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackingConfig;
    use crate::zoom::geometry::Point;
    use crate::zoom::region::RegionGeometry;

    fn zoomed_tracker() -> Tracker {
        let mut tracker = Tracker::new(TrackingConfig {
            zoom_width: 640,
            zoom_height: 360,
            ..Default::default()
        });
        tracker.resolve_region(RegionGeometry::new(0, 0, 1920, 1080));
        tracker.center_on_cursor(Point::new(960.0, 540.0), true);
        tracker
    }

    #[test]
    fn zoom_in_lands_exactly_on_window() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(10);

        let mut settled_at = None;
        let mut last = CropRect::default();
        for frame in 1..=10 {
            last = clock.advance(true, &tracker);
            if settled_at.is_none() && !clock.is_updating() {
                settled_at = Some(frame);
            }
        }

        assert_eq!(last, CropRect::new(640, 360, 640, 360));
        assert!(settled_at.unwrap() <= 8);
        assert_eq!(clock.state(), AnimationState::ZoomedIn);
        assert!(clock.should_stop(true, false));
        assert!(!clock.should_stop(true, true));
    }

    #[test]
    fn zoom_out_lands_exactly_on_region() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(10);
        for _ in 0..10 {
            clock.advance(true, &tracker);
        }

        let mut last = CropRect::default();
        for _ in 0..10 {
            assert!(!clock.should_stop(false, true));
            last = clock.advance(false, &tracker);
        }
        assert_eq!(last, CropRect::new(0, 0, 1920, 1080));
        assert!(!clock.is_updating());
        assert!(clock.should_stop(false, true));
        assert_eq!(clock.state(), AnimationState::ZoomedOut);
    }

    #[test]
    fn counters_stay_mirrored_across_reversals() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(10);
        let pattern = [true, true, true, false, false, true, false, false, false, false, false, false];
        for &locked in &pattern {
            clock.advance(locked, &tracker);
            assert_eq!(clock.zoom_in_elapsed() + clock.zoom_out_elapsed(), 10);
        }
    }

    #[test]
    fn reversal_continues_from_current_rectangle() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(20);
        let mut previous = CropRect::default();
        for _ in 0..8 {
            previous = clock.advance(true, &tracker);
        }
        assert_eq!(clock.state(), AnimationState::ZoomingIn);

        let reversed = clock.advance(false, &tracker);
        assert_eq!(clock.state(), AnimationState::ZoomingOut);
        // One frame back out from frame 8 of 20 is the frame-7 rectangle,
        // so the step is a single frame's worth, not a jump to either end
        assert!(reversed.width > previous.width);
        assert!(reversed.width - previous.width < 200);
        assert!(reversed.left < previous.left);
    }

    #[test]
    fn single_frame_transition_is_immediate() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(0);
        assert_eq!(clock.total_frames(), 1);
        assert_eq!(clock.advance(true, &tracker), CropRect::new(640, 360, 640, 360));
        assert_eq!(clock.advance(false, &tracker), CropRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn region_offset_shifts_every_crop() {
        let mut tracker = Tracker::new(TrackingConfig {
            zoom_width: 640,
            zoom_height: 360,
            region_offset: Some(crate::config::RegionOffset { x: 100, y: 50 }),
            ..Default::default()
        });
        tracker.resolve_region(RegionGeometry::new(0, 0, 1920, 1080));
        tracker.center_on_cursor(Point::new(1060.0, 590.0), true);

        let mut clock = AnimationClock::new(1);
        assert_eq!(clock.advance(true, &tracker), CropRect::new(740, 410, 640, 360));
        assert_eq!(clock.advance(false, &tracker), CropRect::new(100, 50, 1920, 1080));
    }

    #[test]
    fn pending_frames_track_unfinished_animations() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(10);
        assert!(!clock.has_pending_frames(false, true));
        assert!(clock.has_pending_frames(true, false));

        for _ in 0..10 {
            clock.advance(true, &tracker);
        }
        assert!(!clock.has_pending_frames(true, false));
        assert!(clock.has_pending_frames(true, true));
        assert!(clock.has_pending_frames(false, true));

        for _ in 0..10 {
            clock.advance(false, &tracker);
        }
        assert!(!clock.has_pending_frames(false, true));
    }

    #[test]
    fn rescaling_mid_animation_keeps_counters_mirrored() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(10);
        for _ in 0..3 {
            clock.advance(true, &tracker);
        }
        clock.set_total_frames(15);
        assert_eq!(clock.zoom_in_elapsed(), 4);
        assert_eq!(clock.zoom_out_elapsed(), 11);
    }

    #[test]
    fn rescaling_keeps_relative_progress() {
        let tracker = zoomed_tracker();
        let mut clock = AnimationClock::new(10);
        for _ in 0..5 {
            clock.advance(true, &tracker);
        }
        clock.set_total_frames(20);
        assert_eq!(clock.zoom_in_elapsed(), 10);
        assert_eq!(clock.zoom_out_elapsed(), 10);
    }
}
