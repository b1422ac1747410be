//! # maskview core
//!
//! Geometry records, geometry groups, the structure library used to resolve
//! references, the layer palette, and the `Device` interface implemented by
//! parametric layout generators.
//!
//! The viewers in `maskview-plot` only ever borrow these types; everything
//! here is the minimum they need to read a mask layout.

pub mod geometry;
pub mod group;
pub mod library;
pub mod layer;
pub mod device;
pub mod error;

pub use device::{Device, DevicePort, ParamSet, PortDirection};
pub use error::CoreError;
pub use geometry::{
    ARef, Arc, BBox, Circle, Ellipse, Path, Point, Poly, Ring, SRef, Shape, Text, Transform,
};
pub use group::GeomGroup;
pub use layer::{LayerId, LayerPalette};
pub use library::Library;
