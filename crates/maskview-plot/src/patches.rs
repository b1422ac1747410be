//! Conversion of geometry records and device ports into scatter traces.

use log::{debug, warn};

use maskview_core::{DevicePort, GeomGroup, LayerPalette, Point, Poly, Shape};

use crate::trace::{Fill, Marker, MarkerSymbol, Mode, Scatter};

/// Traces for every drawable shape of `group`, in group order.
///
/// Shapes on negative or hidden layers are skipped. Text and structure
/// references produce nothing: flatten or convert them first.
pub fn geometry_traces(group: &GeomGroup, palette: &LayerPalette) -> Vec<Scatter> {
    group
        .iter()
        .filter_map(|shape| shape_trace(shape, palette))
        .collect()
}

/// Trace for a single shape, if it is drawn.
pub fn shape_trace(shape: &Shape, palette: &LayerPalette) -> Option<Scatter> {
    let layer = match shape.layer() {
        Some(layer) => layer,
        None => {
            debug!("{} reference is not displayed; flatten the group first", shape.kind());
            return None;
        }
    };
    let color = palette.color_for(layer)?;

    match shape {
        Shape::Poly(p) => Some(polygon_trace(p, color)),
        Shape::Circle(c) => Some(disc_marker(c.center, c.radius, color)),
        Shape::Path(p) => {
            let (x, y) = split_xy(&p.points);
            Some(Scatter::new(x, y).with_line_color(color))
        }
        Shape::Text(t) => {
            warn!(
                "text display is not supported, please convert to polygon first (\"{}\")",
                t.text
            );
            None
        }
        Shape::Ellipse(e) => Some(disc_marker(e.center, e.radius, color)),
        Shape::Ring(r) => Some(polygon_trace(&r.to_polygon(), color)),
        Shape::Arc(a) => Some(polygon_trace(&a.to_polygon(), color)),
        Shape::SRef(_) | Shape::ARef(_) => None,
    }
}

fn polygon_trace(poly: &Poly, color: &str) -> Scatter {
    let (x, y) = split_xy(&poly.vertices);
    Scatter::new(x, y)
        .with_fill(Fill::ToSelf)
        .with_line_color(color)
}

/// Round shapes are shown as a marker whose size is the diameter.
fn disc_marker(center: Point, radius: f64, color: &str) -> Scatter {
    Scatter::point(center.x, center.y)
        .with_mode(Mode::Markers)
        .with_marker(Marker::new(radius * 2.0).with_color(color))
}

fn split_xy(points: &[Point]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.x, p.y)).unzip()
}

/// One arrow marker per named port.
pub fn port_traces(ports: &[DevicePort], marker_size: f64) -> Vec<Scatter> {
    ports
        .iter()
        .filter(|p| p.is_named())
        .map(|p| {
            Scatter::point(p.position.x, p.position.y)
                .with_mode(Mode::Markers)
                .with_marker(Marker::new(marker_size).with_symbol(MarkerSymbol::ArrowBarUp))
                .with_name(&p.name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskview_core::{
        Arc, Circle, Ellipse, Path, PortDirection, Ring, SRef, Text, Transform,
    };

    fn palette() -> LayerPalette {
        LayerPalette::default()
    }

    #[test]
    fn test_polygon_trace() {
        let grp = GeomGroup::from_shapes(vec![Shape::Poly(Poly::rect(3, 0.0, 0.0, 2.0, 1.0))]);
        let traces = geometry_traces(&grp, &palette());
        assert_eq!(traces.len(), 1);
        let t = &traces[0];
        assert_eq!(t.x, vec![0.0, 2.0, 2.0, 0.0]);
        assert_eq!(t.y, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(t.fill, Some(Fill::ToSelf));
        assert_eq!(t.line.as_ref().unwrap().color.as_deref(), Some("red"));
        assert!(t.mode.is_none());
    }

    #[test]
    fn test_circle_and_ellipse_markers() {
        let grp = GeomGroup::from_shapes(vec![
            Shape::Circle(Circle::new(1, Point::new(5.0, 6.0), 2.5)),
            Shape::Ellipse(Ellipse::new(2, Point::new(0.0, 0.0), 4.0, 0.5, 30.0)),
        ]);
        let traces = geometry_traces(&grp, &palette());
        assert_eq!(traces.len(), 2);
        let c = &traces[0];
        assert_eq!(c.mode, Some(Mode::Markers));
        assert_eq!(c.x, vec![5.0]);
        let m = c.marker.as_ref().unwrap();
        assert_eq!(m.size, Some(5.0));
        assert_eq!(m.color.as_deref(), Some("orange"));
        assert_eq!(traces[1].marker.as_ref().unwrap().size, Some(8.0));
    }

    #[test]
    fn test_path_is_open_line() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
        let grp = GeomGroup::from_shapes(vec![Shape::Path(Path::new(0, pts, 0.5))]);
        let traces = geometry_traces(&grp, &palette());
        assert_eq!(traces[0].x, vec![0.0, 1.0, 2.0]);
        assert!(traces[0].fill.is_none());
        assert_eq!(traces[0].line.as_ref().unwrap().color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_ring_and_arc_become_polygons() {
        let ring = Ring::new(4, Point::new(0.0, 0.0), 10.0, 1.0);
        let arc = Arc::new(5, Point::new(0.0, 0.0), 10.0, 1.0, 0.0, 45.0);
        let expected = ring.to_polygon().vertex_count();
        let grp = GeomGroup::from_shapes(vec![Shape::Ring(ring), Shape::Arc(arc)]);
        let traces = geometry_traces(&grp, &palette());
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].point_count(), expected);
        assert_eq!(traces[0].fill, Some(Fill::ToSelf));
        assert_eq!(traces[1].line.as_ref().unwrap().color.as_deref(), Some("brown"));
    }

    #[test]
    fn test_skipped_shapes() {
        let grp = GeomGroup::from_shapes(vec![
            Shape::Poly(Poly::rect(-1, 0.0, 0.0, 1.0, 1.0)),
            Shape::Text(Text::new(1, "label", Point::new(0.0, 0.0), 1.0)),
            Shape::SRef(SRef::new("cell", Transform::default())),
            Shape::Poly(Poly::rect(0, 0.0, 0.0, 1.0, 1.0)),
        ]);
        let traces = geometry_traces(&grp, &palette());
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn test_hidden_layer_skipped() {
        let mut pal = palette();
        pal.toggle_visibility(0);
        let grp = GeomGroup::from_shapes(vec![Shape::Poly(Poly::rect(0, 0.0, 0.0, 1.0, 1.0))]);
        assert!(geometry_traces(&grp, &pal).is_empty());
    }

    #[test]
    fn test_port_traces_skip_unnamed() {
        let ports = vec![
            DevicePort::new("in", Point::new(-5.0, 0.0), PortDirection::West),
            DevicePort::new("", Point::new(0.0, 0.0), PortDirection::East),
            DevicePort::new("out", Point::new(5.0, 0.0), PortDirection::East),
        ];
        let traces = port_traces(&ports, 12.0);
        assert_eq!(traces.len(), 2);
        let m = traces[0].marker.as_ref().unwrap();
        assert_eq!(m.symbol, Some(MarkerSymbol::ArrowBarUp));
        assert_eq!(m.size, Some(12.0));
        assert_eq!(traces[1].x, vec![5.0]);
        assert_eq!(traces[1].name.as_deref(), Some("out"));
    }
}
