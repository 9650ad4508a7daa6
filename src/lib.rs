//! Cursor-following zoom camera
//!
//! Computes a crop rectangle over a capture source that pans to keep the
//! mouse in view and animates between the full source and a fixed-size zoom
//! window. The host supplies cursor/geometry through [`source::SourceProvider`]
//! and displays the result through [`source::CropSink`].

pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod source;
pub mod zoom;

pub use config::{ConfigStore, JsonConfigStore, TrackingConfig};
pub use error::{Error, Result};
pub use source::{CropSink, SourceHandle, SourceKind, SourceProvider};
pub use zoom::{CropRect, Point, TrackingLoop};
