use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::LayerId;

/// A 2D point in layout coordinates (micrometers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Point at `radius` from `self` in direction `angle` (radians).
    fn polar(&self, radius: f64, angle: f64) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    /// Square box of half-size `half` around `center`.
    pub fn around(center: Point, half: f64) -> Self {
        let half = half.abs();
        Self {
            min: Point::new(center.x - half, center.y - half),
            max: Point::new(center.x + half, center.y + half),
        }
    }

    pub fn llx(&self) -> f64 {
        self.min.x
    }

    pub fn lly(&self) -> f64 {
        self.min.y
    }

    pub fn urx(&self) -> f64 {
        self.max.x
    }

    pub fn ury(&self) -> f64 {
        self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow the box by `dx` on the left and right and `dy` on top and bottom.
    pub fn expand(&self, dx: f64, dy: f64) -> Self {
        Self {
            min: Point::new(self.min.x - dx, self.min.y - dy),
            max: Point::new(self.max.x + dx, self.max.y + dy),
        }
    }
}

/// Placement of a referenced structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Translation offset.
    pub offset: Point,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
    /// Mirror about the X axis, applied before rotation.
    pub mirror_x: bool,
    /// Uniform magnification.
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Point::new(0.0, 0.0),
            rotation: 0.0,
            mirror_x: false,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            offset: Point::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_mirror_x(mut self, mirror: bool) -> Self {
        self.mirror_x = mirror;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn apply(&self, point: &Point) -> Point {
        let mut p = *point;

        p.x *= self.scale;
        p.y *= self.scale;

        if self.mirror_x {
            p.y = -p.y;
        }

        let rad = self.rotation.to_radians();
        let cos_r = rad.cos();
        let sin_r = rad.sin();
        let rx = p.x * cos_r - p.y * sin_r;
        let ry = p.x * sin_r + p.y * cos_r;

        Point::new(rx + self.offset.x, ry + self.offset.y)
    }

    /// Map a direction angle (degrees) through the mirror and rotation.
    pub fn apply_angle(&self, degrees: f64) -> f64 {
        let a = if self.mirror_x { -degrees } else { degrees };
        a + self.rotation
    }

    pub fn apply_length(&self, length: f64) -> f64 {
        length * self.scale.abs()
    }

    /// Map a displacement: scale, mirror and rotate, but no offset.
    pub fn apply_vector(&self, vector: &Point) -> Point {
        let p = self.apply(vector);
        Point::new(p.x - self.offset.x, p.y - self.offset.y)
    }

    /// The transform that applies `inner` first and then `self`.
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            offset: self.apply(&inner.offset),
            rotation: self.apply_angle(inner.rotation),
            mirror_x: self.mirror_x != inner.mirror_x,
            scale: self.scale * inner.scale,
        }
    }

    fn apply_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

/// A closed polygon defined by its vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poly {
    pub layer: LayerId,
    pub vertices: Vec<Point>,
}

impl Poly {
    pub fn new(layer: LayerId, vertices: Vec<Point>) -> Self {
        Self { layer, vertices }
    }

    /// Axis-aligned rectangle from two opposite corners.
    pub fn rect(layer: LayerId, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (lx, ux) = (x1.min(x2), x1.max(x2));
        let (ly, uy) = (y1.min(y2), y1.max(y2));
        Self::new(
            layer,
            vec![
                Point::new(lx, ly),
                Point::new(ux, ly),
                Point::new(ux, uy),
                Point::new(lx, uy),
            ],
        )
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub layer: LayerId,
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(layer: LayerId, center: Point, radius: f64) -> Self {
        Self {
            layer,
            center,
            radius,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::around(self.center, self.radius)
    }
}

/// A path (wire) defined by a centreline and width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub layer: LayerId,
    pub points: Vec<Point>,
    pub width: f64,
}

impl Path {
    pub fn new(layer: LayerId, points: Vec<Point>, width: f64) -> Self {
        Self {
            layer,
            points,
            width,
        }
    }

    pub fn bbox(&self) -> Option<BBox> {
        let half_w = self.width.abs() / 2.0;
        BBox::from_points(&self.points).map(|bb| bb.expand(half_w, half_w))
    }

    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

/// A text label. It has no drawable outline until converted to polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub layer: LayerId,
    pub text: String,
    pub position: Point,
    pub height: f64,
}

impl Text {
    pub fn new(layer: LayerId, text: &str, position: Point, height: f64) -> Self {
        Self {
            layer,
            text: text.to_string(),
            position,
            height,
        }
    }
}

/// A single placement of a named structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SRef {
    pub structure: String,
    #[serde(default)]
    pub transform: Transform,
}

impl SRef {
    pub fn new(structure: &str, transform: Transform) -> Self {
        Self {
            structure: structure.to_string(),
            transform,
        }
    }
}

/// A regular array of placements of a named structure.
///
/// Instance `(c, r)` is the structure placed with `transform`, then shifted by
/// `c * column_pitch + r * row_pitch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ARef {
    pub structure: String,
    #[serde(default)]
    pub transform: Transform,
    pub columns: u32,
    pub rows: u32,
    pub column_pitch: Point,
    pub row_pitch: Point,
}

impl ARef {
    pub fn new(
        structure: &str,
        transform: Transform,
        columns: u32,
        rows: u32,
        column_pitch: Point,
        row_pitch: Point,
    ) -> Self {
        Self {
            structure: structure.to_string(),
            transform,
            columns,
            rows,
            column_pitch,
            row_pitch,
        }
    }

    /// Transforms of every array instance, row-major.
    pub fn instance_transforms(&self) -> Vec<Transform> {
        let mut out = Vec::with_capacity((self.columns as usize) * (self.rows as usize));
        for r in 0..self.rows {
            for c in 0..self.columns {
                let dx = c as f64 * self.column_pitch.x + r as f64 * self.row_pitch.x;
                let dy = c as f64 * self.column_pitch.y + r as f64 * self.row_pitch.y;
                let mut t = self.transform;
                t.offset = t.offset.translate(dx, dy);
                out.push(t);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub layer: LayerId,
    pub center: Point,
    /// Semi-major axis.
    pub radius: f64,
    /// Semi-minor / semi-major.
    pub ratio: f64,
    /// Orientation of the major axis in degrees.
    #[serde(default)]
    pub rotation: f64,
}

impl Ellipse {
    pub fn new(layer: LayerId, center: Point, radius: f64, ratio: f64, rotation: f64) -> Self {
        Self {
            layer,
            center,
            radius,
            ratio,
            rotation,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::around(self.center, self.radius)
    }
}

const MIN_VERTICES: usize = 3;

fn default_vertices() -> usize {
    64
}

/// An annulus of mean `radius` and radial `width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub layer: LayerId,
    pub center: Point,
    pub radius: f64,
    pub width: f64,
    #[serde(default = "default_vertices")]
    pub vertices: usize,
}

impl Ring {
    pub fn new(layer: LayerId, center: Point, radius: f64, width: f64) -> Self {
        Self {
            layer,
            center,
            radius,
            width,
            vertices: default_vertices(),
        }
    }

    pub fn outer_radius(&self) -> f64 {
        self.radius + self.width.abs() / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        (self.radius - self.width.abs() / 2.0).max(0.0)
    }

    pub fn bbox(&self) -> BBox {
        BBox::around(self.center, self.outer_radius())
    }

    /// Single closed outline: outer circle counter-clockwise, then the inner
    /// circle back to the start.
    pub fn to_polygon(&self) -> Poly {
        let n = self.vertices.max(MIN_VERTICES);
        Poly::new(
            self.layer,
            annular_outline(
                self.center,
                self.outer_radius(),
                self.inner_radius(),
                0.0,
                TAU,
                n,
            ),
        )
    }
}

/// A section of a ring between two angles (degrees, counter-clockwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub layer: LayerId,
    pub center: Point,
    pub radius: f64,
    pub width: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    #[serde(default = "default_vertices")]
    pub vertices: usize,
}

impl Arc {
    pub fn new(
        layer: LayerId,
        center: Point,
        radius: f64,
        width: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            layer,
            center,
            radius,
            width,
            start_angle,
            end_angle,
            vertices: default_vertices(),
        }
    }

    pub fn to_polygon(&self) -> Poly {
        let n = self.vertices.max(MIN_VERTICES);
        let outer = self.radius + self.width.abs() / 2.0;
        let inner = (self.radius - self.width.abs() / 2.0).max(0.0);
        Poly::new(
            self.layer,
            annular_outline(
                self.center,
                outer,
                inner,
                self.start_angle.to_radians(),
                self.end_angle.to_radians(),
                n,
            ),
        )
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.to_polygon().bbox()
    }
}

/// Outline of the region between two concentric circles from `start` to `end`
/// (radians), sampled with `n` segments per edge.
fn annular_outline(center: Point, outer: f64, inner: f64, start: f64, end: f64, n: usize) -> Vec<Point> {
    let step = (end - start) / n as f64;
    let mut pts = Vec::with_capacity(2 * (n + 1));
    for i in 0..=n {
        pts.push(center.polar(outer, start + step * i as f64));
    }
    for i in (0..=n).rev() {
        pts.push(center.polar(inner, start + step * i as f64));
    }
    pts
}

/// A shape record in a geometry group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Poly(Poly),
    Circle(Circle),
    Path(Path),
    Text(Text),
    SRef(SRef),
    ARef(ARef),
    Ellipse(Ellipse),
    Ring(Ring),
    Arc(Arc),
}

impl Shape {
    /// Layer of a drawable shape; references carry no layer.
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            Shape::Poly(p) => Some(p.layer),
            Shape::Circle(c) => Some(c.layer),
            Shape::Path(p) => Some(p.layer),
            Shape::Text(t) => Some(t.layer),
            Shape::Ellipse(e) => Some(e.layer),
            Shape::Ring(r) => Some(r.layer),
            Shape::Arc(a) => Some(a.layer),
            Shape::SRef(_) | Shape::ARef(_) => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Shape::SRef(_) | Shape::ARef(_))
    }

    /// Extents of the shape. Text and references have none.
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            Shape::Poly(p) => p.bbox(),
            Shape::Circle(c) => Some(c.bbox()),
            Shape::Path(p) => p.bbox(),
            Shape::Ellipse(e) => Some(e.bbox()),
            Shape::Ring(r) => Some(r.bbox()),
            Shape::Arc(a) => a.bbox(),
            Shape::Text(_) | Shape::SRef(_) | Shape::ARef(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Poly(_) => "poly",
            Shape::Circle(_) => "circle",
            Shape::Path(_) => "path",
            Shape::Text(_) => "text",
            Shape::SRef(_) => "sref",
            Shape::ARef(_) => "aref",
            Shape::Ellipse(_) => "ellipse",
            Shape::Ring(_) => "ring",
            Shape::Arc(_) => "arc",
        }
    }

    /// Copy of the shape placed with `t`. For references the placement is
    /// composed onto the reference's own offset only.
    pub fn transformed(&self, t: &Transform) -> Shape {
        match self {
            Shape::Poly(p) => Shape::Poly(Poly::new(p.layer, t.apply_all(&p.vertices))),
            Shape::Circle(c) => Shape::Circle(Circle::new(
                c.layer,
                t.apply(&c.center),
                t.apply_length(c.radius),
            )),
            Shape::Path(p) => Shape::Path(Path::new(
                p.layer,
                t.apply_all(&p.points),
                t.apply_length(p.width),
            )),
            Shape::Text(x) => Shape::Text(Text {
                layer: x.layer,
                text: x.text.clone(),
                position: t.apply(&x.position),
                height: t.apply_length(x.height),
            }),
            Shape::SRef(r) => Shape::SRef(SRef {
                structure: r.structure.clone(),
                transform: t.compose(&r.transform),
            }),
            Shape::ARef(r) => Shape::ARef(ARef {
                structure: r.structure.clone(),
                transform: t.compose(&r.transform),
                columns: r.columns,
                rows: r.rows,
                column_pitch: t.apply_vector(&r.column_pitch),
                row_pitch: t.apply_vector(&r.row_pitch),
            }),
            Shape::Ellipse(e) => Shape::Ellipse(Ellipse::new(
                e.layer,
                t.apply(&e.center),
                t.apply_length(e.radius),
                e.ratio,
                t.apply_angle(e.rotation),
            )),
            Shape::Ring(r) => Shape::Ring(Ring {
                layer: r.layer,
                center: t.apply(&r.center),
                radius: t.apply_length(r.radius),
                width: t.apply_length(r.width),
                vertices: r.vertices,
            }),
            Shape::Arc(a) => {
                let (start, end) = if t.mirror_x {
                    (t.apply_angle(a.end_angle), t.apply_angle(a.start_angle))
                } else {
                    (t.apply_angle(a.start_angle), t.apply_angle(a.end_angle))
                };
                Shape::Arc(Arc {
                    layer: a.layer,
                    center: t.apply(&a.center),
                    radius: t.apply_length(a.radius),
                    width: t.apply_length(a.width),
                    start_angle: start,
                    end_angle: end,
                    vertices: a.vertices,
                })
            }
        }
    }
}
