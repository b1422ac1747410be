use std::path::PathBuf;

use maskview_core::GeomGroup;

use crate::config::ViewerConfig;
use crate::error::PlotError;
use crate::figure::{Axis, Figure, Layout};
use crate::output;
use crate::patches::geometry_traces;

pub const GEOMETRY_VIEW_TITLE: &str = "Geometry View";

/// Figure of a geometry group.
///
/// Only polygons, paths and round shapes are drawn; rings and arcs are
/// converted to polygons. No flattening is done, so structure references are
/// not displayed. Both axes zoom freely unless `config.equal_aspect` is set.
pub fn geometry_figure(group: &GeomGroup, config: &ViewerConfig) -> Figure {
    let mut layout = Layout {
        title: Some(GEOMETRY_VIEW_TITLE.to_string()),
        showlegend: Some(false),
        xaxis: Some(Axis::free()),
        yaxis: Some(Axis::free()),
        ..Default::default()
    };
    if config.equal_aspect {
        layout.lock_aspect();
    }

    let mut fig = Figure {
        data: Vec::new(),
        layout,
    };
    fig.add_traces(geometry_traces(group, &config.palette));
    fig
}

/// Render `group` into an HTML page and open it.
pub fn show_geometry(group: &GeomGroup, config: &ViewerConfig) -> Result<PathBuf, PlotError> {
    let fig = geometry_figure(group, config);
    let html = output::figure_html(&fig, config)?;
    output::show_html(&html, config)
}
