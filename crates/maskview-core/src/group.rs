use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{BBox, Shape, Transform};
use crate::library::Library;
use crate::LayerId;

/// Maximum nesting of structure references followed by [`GeomGroup::flatten`].
pub const MAX_REFERENCE_DEPTH: usize = 64;

/// An ordered collection of shape records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeomGroup {
    pub shapes: Vec<Shape>,
}

impl GeomGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn extend(&mut self, other: GeomGroup) {
        self.shapes.extend(other.shapes);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// All shapes drawn on `layer`.
    pub fn shapes_on_layer(&self, layer: LayerId) -> Vec<&Shape> {
        self.shapes
            .iter()
            .filter(|s| s.layer() == Some(layer))
            .collect()
    }

    pub fn reference_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_reference()).count()
    }

    /// Bounding box of every shape with extents. References are not followed.
    pub fn bounding_box(&self) -> Option<BBox> {
        self.shapes
            .iter()
            .filter_map(|s| s.bbox())
            .reduce(|acc, bb| acc.union(&bb))
    }

    /// Copy of the group with every placement applied to every shape.
    pub fn transformed(&self, t: &Transform) -> GeomGroup {
        GeomGroup::from_shapes(self.shapes.iter().map(|s| s.transformed(t)).collect())
    }

    /// Replace structure references with the placed shapes of the structures
    /// they name, recursively. References to structures missing from
    /// `library` are dropped.
    pub fn flatten(&self, library: &Library) -> Result<GeomGroup, CoreError> {
        self.flatten_at(library, "<top>", 0)
    }

    fn flatten_at(&self, library: &Library, owner: &str, depth: usize) -> Result<GeomGroup, CoreError> {
        if depth > MAX_REFERENCE_DEPTH {
            return Err(CoreError::RecursionLimit {
                structure: owner.to_string(),
                depth: MAX_REFERENCE_DEPTH,
            });
        }

        let mut out = GeomGroup::new();
        for shape in &self.shapes {
            match shape {
                Shape::SRef(r) => {
                    if let Some(child) = resolve(library, &r.structure, depth)? {
                        out.extend(child.transformed(&r.transform));
                    }
                }
                Shape::ARef(r) => {
                    if let Some(child) = resolve(library, &r.structure, depth)? {
                        for t in r.instance_transforms() {
                            out.extend(child.transformed(&t));
                        }
                    }
                }
                other => out.push(other.clone()),
            }
        }
        Ok(out)
    }
}

fn resolve(library: &Library, name: &str, depth: usize) -> Result<Option<GeomGroup>, CoreError> {
    match library.get(name) {
        Some(group) => {
            debug!("flattening reference to '{}' at depth {}", name, depth + 1);
            group.flatten_at(library, name, depth + 1).map(Some)
        }
        None => {
            warn!("structure '{}' is referenced but not defined; skipping", name);
            Ok(None)
        }
    }
}

impl FromIterator<Shape> for GeomGroup {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self::from_shapes(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GeomGroup {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ARef, Circle, Point, Poly, SRef, Text};

    fn square(layer: LayerId) -> Shape {
        Shape::Poly(Poly::rect(layer, 0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn test_group_bbox() {
        let mut grp = GeomGroup::new();
        grp.push(Shape::Poly(Poly::rect(0, 0.0, 0.0, 100.0, 50.0)));
        grp.push(Shape::Poly(Poly::rect(1, 50.0, 25.0, 200.0, 75.0)));
        grp.push(Shape::Text(Text::new(0, "label", Point::new(-500.0, -500.0), 5.0)));
        let bb = grp.bounding_box().unwrap();
        assert!((bb.llx() - 0.0).abs() < 1e-10);
        assert!((bb.lly() - 0.0).abs() < 1e-10);
        assert!((bb.urx() - 200.0).abs() < 1e-10);
        assert!((bb.ury() - 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_group_has_no_bbox() {
        assert!(GeomGroup::new().bounding_box().is_none());
    }

    #[test]
    fn test_shapes_on_layer() {
        let grp: GeomGroup = vec![square(1), square(2), square(1)].into_iter().collect();
        assert_eq!(grp.shapes_on_layer(1).len(), 2);
        assert_eq!(grp.shapes_on_layer(3).len(), 0);
    }

    #[test]
    fn test_flatten_sref() {
        let mut lib = Library::new();
        lib.insert("unit", GeomGroup::from_shapes(vec![square(4)]));

        let mut top = GeomGroup::new();
        top.push(Shape::Circle(Circle::new(0, Point::new(0.0, 0.0), 1.0)));
        top.push(Shape::SRef(SRef::new("unit", Transform::translate(10.0, 20.0))));

        let flat = top.flatten(&lib).unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.reference_count(), 0);
        let bb = flat.shapes[1].bbox().unwrap();
        assert!((bb.llx() - 10.0).abs() < 1e-10);
        assert!((bb.ury() - 21.0).abs() < 1e-10);
    }

    #[test]
    fn test_flatten_nested_and_array() {
        let mut lib = Library::new();
        lib.insert("leaf", GeomGroup::from_shapes(vec![square(1)]));
        lib.insert(
            "row",
            GeomGroup::from_shapes(vec![Shape::ARef(ARef::new(
                "leaf",
                Transform::default(),
                4,
                1,
                Point::new(2.0, 0.0),
                Point::new(0.0, 0.0),
            ))]),
        );
        let top = GeomGroup::from_shapes(vec![
            Shape::SRef(SRef::new("row", Transform::translate(0.0, 100.0))),
        ]);
        let flat = top.flatten(&lib).unwrap();
        assert_eq!(flat.len(), 4);
        let bb = flat.bounding_box().unwrap();
        assert!((bb.urx() - 7.0).abs() < 1e-10);
        assert!((bb.lly() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_flatten_skips_missing_structure() {
        let top = GeomGroup::from_shapes(vec![
            square(0),
            Shape::SRef(SRef::new("missing", Transform::default())),
        ]);
        let flat = top.flatten(Library::empty()).unwrap();
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn test_flatten_detects_cycles() {
        let mut lib = Library::new();
        lib.insert(
            "a",
            GeomGroup::from_shapes(vec![Shape::SRef(SRef::new("b", Transform::default()))]),
        );
        lib.insert(
            "b",
            GeomGroup::from_shapes(vec![Shape::SRef(SRef::new("a", Transform::default()))]),
        );
        let top = GeomGroup::from_shapes(vec![Shape::SRef(SRef::new("a", Transform::default()))]);
        assert!(matches!(
            top.flatten(&lib),
            Err(CoreError::RecursionLimit { .. })
        ));
    }

    fn chain(levels: usize) -> (Library, GeomGroup) {
        let mut lib = Library::new();
        for k in 1..levels {
            let next = format!("s{}", k + 1);
            lib.insert(
                &format!("s{k}"),
                GeomGroup::from_shapes(vec![Shape::SRef(SRef::new(&next, Transform::default()))]),
            );
        }
        lib.insert(&format!("s{levels}"), GeomGroup::from_shapes(vec![square(0)]));
        let top = GeomGroup::from_shapes(vec![Shape::SRef(SRef::new("s1", Transform::default()))]);
        (lib, top)
    }

    #[test]
    fn test_flatten_accepts_max_depth_chain() {
        let (lib, top) = chain(MAX_REFERENCE_DEPTH);
        let flat = top.flatten(&lib).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.reference_count(), 0);
    }

    #[test]
    fn test_flatten_rejects_chain_past_max_depth() {
        let (lib, top) = chain(MAX_REFERENCE_DEPTH + 1);
        match top.flatten(&lib) {
            Err(CoreError::RecursionLimit { structure, depth }) => {
                assert_eq!(structure, format!("s{}", MAX_REFERENCE_DEPTH + 1));
                assert_eq!(depth, MAX_REFERENCE_DEPTH);
            }
            other => panic!("expected recursion limit, got {other:?}"),
        }
    }

    fn assert_same_polys(a: &GeomGroup, b: &GeomGroup) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            match (x, y) {
                (Shape::Poly(p), Shape::Poly(q)) => {
                    assert_eq!(p.vertices.len(), q.vertices.len());
                    for (u, v) in p.vertices.iter().zip(&q.vertices) {
                        assert!(u.distance_to(v) < 1e-9, "{u:?} != {v:?}");
                    }
                }
                other => panic!("unexpected shapes {other:?}"),
            }
        }
    }

    #[test]
    fn test_transform_commutes_with_flatten_for_sref() {
        let mut lib = Library::new();
        lib.insert("cell", GeomGroup::from_shapes(vec![square(1)]));
        let top = GeomGroup::from_shapes(vec![Shape::SRef(SRef::new(
            "cell",
            Transform::translate(1.0, 0.0),
        ))]);
        let t = Transform::default().with_rotation(90.0);

        let late = top.flatten(&lib).unwrap().transformed(&t);
        let early = top.transformed(&t).flatten(&lib).unwrap();
        assert_same_polys(&early, &late);

        let bb = early.bounding_box().unwrap();
        assert!((bb.llx() + 1.0).abs() < 1e-9 && bb.urx().abs() < 1e-9);
        assert!((bb.lly() - 1.0).abs() < 1e-9 && (bb.ury() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_commutes_with_flatten_for_aref() {
        let mut lib = Library::new();
        lib.insert("cell", GeomGroup::from_shapes(vec![square(1)]));
        let top = GeomGroup::from_shapes(vec![Shape::ARef(ARef::new(
            "cell",
            Transform::translate(2.0, 1.0).with_rotation(30.0).with_scale(1.5),
            3,
            2,
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        ))]);
        let t = Transform::translate(-5.0, 7.0)
            .with_rotation(90.0)
            .with_mirror_x(true)
            .with_scale(2.0);

        let late = top.flatten(&lib).unwrap().transformed(&t);
        let early = top.transformed(&t).flatten(&lib).unwrap();
        assert_eq!(early.len(), 6);
        assert_same_polys(&early, &late);
    }

    #[test]
    fn test_group_json_is_a_list() {
        let grp = GeomGroup::from_shapes(vec![square(2)]);
        let json = serde_json::to_value(&grp).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["type"], "poly");
    }
}
