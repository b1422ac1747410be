use serde::{Deserialize, Serialize};

use maskview_core::BBox;

/// Padding applied to an axis whose extent is zero.
const DEGENERATE_HALF_SPAN: f64 = 0.5;

/// Visible x and y ranges of a chart, in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl AxisRanges {
    /// Ranges covering `bbox`, widened by `margin_fraction` of each extent on
    /// both sides.
    pub fn fit(bbox: &BBox, margin_fraction: f64) -> Self {
        let margin = margin_fraction.max(0.0);
        Self {
            x: fit_axis(bbox.llx(), bbox.urx(), margin),
            y: fit_axis(bbox.lly(), bbox.ury(), margin),
        }
    }

    pub fn width(&self) -> f64 {
        self.x[1] - self.x[0]
    }

    pub fn height(&self) -> f64 {
        self.y[1] - self.y[0]
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x[0] && x <= self.x[1] && y >= self.y[0] && y <= self.y[1]
    }
}

fn fit_axis(min: f64, max: f64, margin: f64) -> [f64; 2] {
    let extent = max - min;
    if extent <= 0.0 {
        return [min - DEGENERATE_HALF_SPAN, max + DEGENERATE_HALF_SPAN];
    }
    let pad = extent * margin;
    [min - pad, max + pad]
}
