use serde::{Deserialize, Serialize};

use crate::slider::Slider;
use crate::trace::Scatter;
use crate::viewport::AxisRanges;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    /// Axis id this axis is scaled against (e.g. `"y"` on the x axis).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaleanchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaleratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autorange: Option<bool>,
}

impl Axis {
    pub fn with_range(min: f64, max: f64) -> Self {
        Self {
            range: Some([min, max]),
            ..Default::default()
        }
    }

    /// Axis with no range, no aspect lock, zoomable freely.
    pub fn free() -> Self {
        Self {
            autorange: Some(true),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sliders: Vec<Slider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
}

impl Layout {
    /// Fix both axes to `ranges`, or let plotly autorange when there is none.
    pub fn set_ranges(&mut self, ranges: Option<AxisRanges>) {
        match ranges {
            Some(r) => {
                self.xaxis = Some(Axis::with_range(r.x[0], r.x[1]));
                self.yaxis = Some(Axis::with_range(r.y[0], r.y[1]));
            }
            None => {
                self.xaxis = Some(Axis::free());
                self.yaxis = Some(Axis::free());
            }
        }
    }

    /// Draw one layout unit the same length on both axes.
    pub fn lock_aspect(&mut self) {
        let x = self.xaxis.get_or_insert_with(Axis::default);
        x.scaleanchor = Some("y".to_string());
        x.scaleratio = Some(1.0);
    }
}

/// A plotly figure: traces plus layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Scatter>,
    pub layout: Layout,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trace(&mut self, trace: Scatter) {
        self.data.push(trace);
    }

    pub fn add_traces(&mut self, traces: impl IntoIterator<Item = Scatter>) {
        self.data.extend(traces);
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    pub fn trace_count(&self) -> usize {
        self.data.len()
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Traces and axes of this figure, without the rest of the layout.
    pub fn frame(&self) -> StepFrame {
        StepFrame {
            data: self.data.clone(),
            xaxis: self.layout.xaxis.clone(),
            yaxis: self.layout.yaxis.clone(),
        }
    }
}

/// The part of a figure that changes from one slider step to the next.
///
/// Pages keep a single layout and patch each frame's axes into it, so the
/// sliders are stored once per page rather than once per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepFrame {
    pub data: Vec<Scatter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskview_core::{BBox, Point};

    #[test]
    fn test_figure_traces() {
        let mut fig = Figure::new();
        fig.add_trace(Scatter::point(0.0, 0.0));
        fig.add_traces(vec![Scatter::point(1.0, 1.0), Scatter::point(2.0, 2.0)]);
        assert_eq!(fig.trace_count(), 3);
        fig.clear_data();
        assert_eq!(fig.trace_count(), 0);
    }

    #[test]
    fn test_layout_ranges() {
        let mut layout = Layout::default();
        let bb = BBox::new(Point::new(-1.0, 2.0), Point::new(3.0, 4.0));
        layout.set_ranges(Some(AxisRanges::fit(&bb, 0.0)));
        assert_eq!(layout.xaxis.as_ref().unwrap().range, Some([-1.0, 3.0]));
        assert_eq!(layout.yaxis.as_ref().unwrap().range, Some([2.0, 4.0]));

        layout.set_ranges(None);
        assert_eq!(layout.xaxis.as_ref().unwrap().range, None);
        assert_eq!(layout.xaxis.as_ref().unwrap().autorange, Some(true));
    }

    #[test]
    fn test_layout_json_omits_unset() {
        let fig = Figure {
            data: Vec::new(),
            layout: Layout {
                title: Some("Geometry View".to_string()),
                showlegend: Some(false),
                ..Default::default()
            },
        };
        let value = fig.to_value().unwrap();
        assert_eq!(value["layout"]["title"], "Geometry View");
        assert_eq!(value["layout"]["showlegend"], false);
        assert!(value["layout"].get("sliders").is_none());
        assert!(value["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_frame_drops_sliders() {
        let mut fig = Figure::new();
        fig.add_trace(Scatter::point(1.0, 1.0));
        fig.layout.title = Some("ring".to_string());
        fig.layout.set_ranges(Some(AxisRanges { x: [0.0, 2.0], y: [0.0, 1.0] }));
        fig.layout.sliders = vec![Slider::new("width: ", Vec::new(), 0)];

        let frame = fig.frame();
        assert_eq!(frame.data.len(), 1);
        assert_eq!(frame.xaxis.as_ref().unwrap().range, Some([0.0, 2.0]));
        let value = serde_json::to_value(&frame).unwrap();
        assert!(value.get("sliders").is_none());
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_lock_aspect() {
        let mut layout = Layout::default();
        layout.lock_aspect();
        let x = layout.xaxis.unwrap();
        assert_eq!(x.scaleanchor.as_deref(), Some("y"));
        assert_eq!(x.scaleratio, Some(1.0));
    }
}
