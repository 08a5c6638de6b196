//! Spirograph is a hypotrochoid pattern generator with eased morphing between patterns.
//!
//! The core is a set of pure functions:
//!
//! - Describe a pattern as a [`SpiroConfig`] (a fixed and a moving wheel)
//! - Draw it with [`generate`] (or through a [`PatternService`])
//! - Plan a morph between two configs with [`interpolate`] and draw the frames
//!
//! Config files, SVG export and playback state live in [`store`], [`svg`] and [`playback`].
#![forbid(unsafe_code)]

pub mod color;
pub mod curve;
pub mod ease;
pub mod error;
pub mod interpolate;
pub mod model;
pub mod playback;
pub mod service;
pub mod store;
pub mod svg;

pub use kurbo::{Point, Rect};

pub use crate::color::Rgb;
pub use crate::curve::{
    GeneratedPattern, GeneratorSettings, Hypotrochoid, PatternInfo, generate, pattern_info,
    required_rotations,
};
pub use crate::ease::Ease;
pub use crate::error::{ErrorReport, SpiroError, SpiroResult};
pub use crate::interpolate::{Lerp, MorphRequest, RotationPolicy, interpolate, interpolate_with};
pub use crate::model::{RotationCount, SpiroConfig, Wheel, WheelRole};
pub use crate::playback::{Playback, PlaybackEvent, PlaybackState, Transition};
pub use crate::service::{DrawResponse, MorphFrame, PatternService};
pub use crate::svg::{SvgOptions, render_svg};
