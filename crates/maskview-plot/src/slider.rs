use serde::{Deserialize, Serialize};

/// Label shown above a slider with the selected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentValue {
    pub visible: bool,
    pub prefix: String,
}

/// Plotly slider step method. `Skip` leaves the figure alone and lets the
/// page's own `plotly_sliderchange` handler react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMethod {
    Restyle,
    Relayout,
    Update,
    Animate,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderStep {
    pub label: String,
    /// Plotly step values are strings.
    pub value: String,
    pub method: StepMethod,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

impl SliderStep {
    pub fn skip(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            method: StepMethod::Skip,
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
}

/// A plotly layout slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub active: usize,
    pub currentvalue: CurrentValue,
    pub steps: Vec<SliderStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad: Option<Pad>,
}

impl Slider {
    pub fn new(prefix: &str, steps: Vec<SliderStep>, active: usize) -> Self {
        Self {
            active,
            currentvalue: CurrentValue {
                visible: true,
                prefix: prefix.to_string(),
            },
            steps,
            x: None,
            y: None,
            len: None,
            pad: None,
        }
    }

    /// Place the slider at a vertical position below the plot area.
    pub fn at_row(mut self, row: usize, spacing: f64) -> Self {
        self.x = Some(0.0);
        self.len = Some(1.0);
        self.y = Some(-(row as f64) * spacing);
        self.pad = Some(Pad {
            t: Some(50.0),
            b: None,
        });
        self
    }
}
