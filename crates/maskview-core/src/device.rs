use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::Point;
use crate::group::GeomGroup;
use crate::library::Library;

/// Named device parameters, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    entries: Vec<(String, f64)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter, or replace the value of an existing one.
    pub fn insert(&mut self, name: &str, value: f64) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Update an already-declared parameter.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteParameter {
                name: name.to_string(),
                value,
            });
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| CoreError::UnknownParameter(name.to_string()))?;
        entry.1 = value;
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Direction a port faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    East,
    North,
    West,
    South,
}

impl PortDirection {
    pub fn angle(&self) -> f64 {
        match self {
            PortDirection::East => 0.0,
            PortDirection::North => 90.0,
            PortDirection::West => 180.0,
            PortDirection::South => 270.0,
        }
    }
}

/// Named connection point on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePort {
    pub name: String,
    pub position: Point,
    pub direction: PortDirection,
}

impl DevicePort {
    pub fn new(name: &str, position: Point, direction: PortDirection) -> Self {
        Self {
            name: name.to_string(),
            position,
            direction,
        }
    }

    /// Ports without a name are internal and are not shown.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A parametric layout generator.
///
/// Viewers drive a device by writing parameters, calling `initialize`, then
/// `run`. Ports are read after `run`.
pub trait Device {
    fn name(&self) -> &str;

    fn params(&self) -> &ParamSet;

    fn params_mut(&mut self) -> &mut ParamSet;

    fn set_param(&mut self, name: &str, value: f64) -> Result<(), CoreError> {
        self.params_mut().set(name, value)
    }

    /// Whether `run` may emit structure references instead of inlined shapes.
    fn set_use_references(&mut self, _enabled: bool) {}

    /// Reset any state derived from the parameters.
    fn initialize(&mut self) {}

    fn run(&mut self) -> Result<GeomGroup, CoreError>;

    fn ports(&self) -> &[DevicePort];

    /// Structures referenced by the geometry `run` returns.
    fn library(&self) -> &Library {
        Library::empty()
    }
}
