//! # maskview plot
//!
//! Maps maskview geometry and devices onto plotly chart primitives.
//!
//! Figures are plain serde structures in the plotly JSON schema. They are
//! written into standalone HTML documents that load plotly.js and are opened in
//! the system browser. Two entry points mirror the two ways a mask designer
//! looks at layout: [`view::show_geometry`] for a fixed geometry group and
//! [`inspect::Inspector`] for a parametric device with one slider per
//! parameter.

pub mod config;
pub mod error;
pub mod trace;
pub mod slider;
pub mod figure;
pub mod patches;
pub mod viewport;
pub mod view;
pub mod inspect;
pub mod output;

pub use config::ViewerConfig;
pub use error::PlotError;
pub use figure::{Axis, Figure, Layout, StepFrame};
pub use inspect::{device_inspect, Inspector, ParamSlider};
pub use slider::{Slider, SliderStep};
pub use trace::Scatter;
pub use view::{geometry_figure, show_geometry};
pub use viewport::AxisRanges;
