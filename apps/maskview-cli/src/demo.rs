//! Built-in parametric device used by `maskview demo`.

use maskview_core::{
    CoreError, Device, DevicePort, GeomGroup, Library, ParamSet, Point, Poly, PortDirection, Ring,
    Shape, SRef, Transform,
};

const WAVEGUIDE_LAYER: i32 = 1;
const RING_STRUCTURE: &str = "ring";

/// An all-pass ring resonator: a straight bus waveguide with a ring above it.
///
/// Parameters: `radius` (ring mean radius), `gap` (edge-to-edge spacing
/// between bus and ring), `width` (waveguide width), `length` (bus length).
/// Zero values give degenerate but valid geometry.
pub struct RingResonator {
    params: ParamSet,
    ports: Vec<DevicePort>,
    library: Library,
    use_references: bool,
}

impl RingResonator {
    pub fn new() -> Self {
        Self {
            params: ParamSet::new()
                .with("radius", 10.0)
                .with("gap", 0.2)
                .with("width", 0.5)
                .with("length", 30.0),
            ports: Vec::new(),
            library: Library::new(),
            use_references: true,
        }
    }

    fn param(&self, name: &str) -> Result<f64, CoreError> {
        self.params
            .get(name)
            .map(f64::abs)
            .ok_or_else(|| CoreError::UnknownParameter(name.to_string()))
    }
}

impl Default for RingResonator {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for RingResonator {
    fn name(&self) -> &str {
        "RingResonator"
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn set_use_references(&mut self, enabled: bool) {
        self.use_references = enabled;
    }

    fn initialize(&mut self) {
        self.library = Library::new();
        self.ports.clear();
    }

    fn run(&mut self) -> Result<GeomGroup, CoreError> {
        let radius = self.param("radius")?;
        let gap = self.param("gap")?;
        let width = self.param("width")?;
        let length = self.param("length")?;

        let mut geom = GeomGroup::new();
        geom.push(Shape::Poly(Poly::rect(
            WAVEGUIDE_LAYER,
            -length / 2.0,
            -width / 2.0,
            length / 2.0,
            width / 2.0,
        )));

        let ring = Ring::new(WAVEGUIDE_LAYER, Point::new(0.0, 0.0), radius, width);
        let center_y = width + gap + radius;
        if self.use_references {
            self.library
                .insert(RING_STRUCTURE, GeomGroup::from_shapes(vec![Shape::Ring(ring)]));
            geom.push(Shape::SRef(SRef::new(
                RING_STRUCTURE,
                Transform::translate(0.0, center_y),
            )));
        } else {
            geom.push(Shape::Ring(Ring {
                center: Point::new(0.0, center_y),
                ..ring
            }));
        }

        self.ports = vec![
            DevicePort::new("in", Point::new(-length / 2.0, 0.0), PortDirection::West),
            DevicePort::new("out", Point::new(length / 2.0, 0.0), PortDirection::East),
        ];
        Ok(geom)
    }

    fn ports(&self) -> &[DevicePort] {
        &self.ports
    }

    fn library(&self) -> &Library {
        &self.library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_and_inline_agree() {
        let mut by_ref = RingResonator::new();
        let flat = by_ref.run().unwrap().flatten(by_ref.library()).unwrap();

        let mut inline = RingResonator::new();
        inline.set_use_references(false);
        inline.initialize();
        let direct = inline.run().unwrap();

        assert_eq!(flat.len(), 2);
        assert_eq!(direct.reference_count(), 0);
        let a = flat.bounding_box().unwrap();
        let b = direct.bounding_box().unwrap();
        assert!((a.ury() - b.ury()).abs() < 1e-9);
        // width + gap + radius + width / 2
        assert!((b.ury() - 20.95).abs() < 1e-9);
    }

    #[test]
    fn test_ports_follow_length() {
        let mut dev = RingResonator::new();
        dev.set_param("length", 50.0).unwrap();
        dev.run().unwrap();
        let ports = dev.ports();
        assert_eq!(ports.len(), 2);
        assert!((ports[1].position.x - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_parameters_are_valid() {
        let mut dev = RingResonator::new();
        for name in ["radius", "gap", "width", "length"] {
            dev.set_param(name, 0.0).unwrap();
        }
        assert!(dev.run().is_ok());
    }
}
