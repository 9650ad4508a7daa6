pub mod animation;
pub mod easing;
pub mod geometry;
pub mod region;
pub mod tracker;
pub mod tracking_loop;

pub use animation::{AnimationClock, AnimationState};
pub use geometry::{CropRect, Point, Rect, Size};
pub use region::{Region, RegionGeometry};
pub use tracker::Tracker;
pub use tracking_loop::{TickState, TrackingLoop};
