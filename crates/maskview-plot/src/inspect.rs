//! Interactive inspection of parametric devices.
//!
//! An [`Inspector`] renders a device with its default parameters and keeps one
//! slider per parameter. Moving a slider writes every slider value back into
//! the device, re-runs it and redraws the figure. Ports are drawn as arrow
//! markers on top of the geometry.

use std::path::PathBuf;

use log::{debug, warn};

use maskview_core::{CoreError, Device, GeomGroup};

use crate::config::ViewerConfig;
use crate::error::PlotError;
use crate::figure::{Figure, Margin, StepFrame};
use crate::output;
use crate::patches::{geometry_traces, port_traces};
use crate::slider::{Slider, SliderStep};
use crate::viewport::AxisRanges;

/// Vertical distance between stacked sliders, in paper units.
const SLIDER_ROW_SPACING: f64 = 0.18;
const SLIDER_MARGIN_BASE: f64 = 60.0;
const SLIDER_MARGIN_PER_ROW: f64 = 90.0;

/// A slider bound to one device parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSlider {
    pub param: String,
    /// Values of the slider steps, ascending in magnitude from zero.
    pub values: Vec<f64>,
    /// Current parameter value. Need not sit exactly on a step.
    pub value: f64,
    /// Index of the step shown as selected.
    pub active: usize,
}

impl ParamSlider {
    /// Steps at multiples of `default / divisions` from zero to
    /// `span * default`. A zero default steps as if it were one.
    pub fn for_param(name: &str, default: f64, divisions: u32, span: u32) -> Self {
        let divisions = divisions.max(1);
        let reference = if default == 0.0 { 1.0 } else { default };
        let step = reference / f64::from(divisions);
        let count = divisions.saturating_mul(span.max(1)) as usize;
        let values = (0..=count).map(|k| round_value(step * k as f64)).collect();

        let mut slider = Self {
            param: name.to_string(),
            values,
            value: default,
            active: 0,
        };
        slider.active = slider.nearest_step(default);
        slider
    }

    pub fn prefix(&self) -> String {
        format!("{}: ", self.param)
    }

    pub fn step_count(&self) -> usize {
        self.values.len()
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.active = self.nearest_step(value);
    }

    pub fn select_step(&mut self, step: usize) -> Result<(), PlotError> {
        let value = *self.values.get(step).ok_or_else(|| PlotError::NoSuchStep {
            param: self.param.clone(),
            step,
            count: self.values.len(),
        })?;
        self.value = value;
        self.active = step;
        Ok(())
    }

    fn nearest_step(&self, value: f64) -> usize {
        self.values
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
            .map(|(k, _)| k)
            .unwrap_or(0)
    }

    /// Plotly slider for position `row`. Step values are `"row:step"` keys.
    pub fn to_plotly(&self, row: usize) -> Slider {
        let steps = self
            .values
            .iter()
            .enumerate()
            .map(|(k, v)| SliderStep::skip(&format_value(*v), &format!("{row}:{k}")))
            .collect();
        Slider::new(&self.prefix(), steps, self.active).at_row(row, SLIDER_ROW_SPACING)
    }
}

fn round_value(v: f64) -> f64 {
    let r = (v * 1e9).round() / 1e9;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

fn format_value(v: f64) -> String {
    format!("{}", round_value(v))
}

/// Inspection session over a single device.
pub struct Inspector {
    device: Box<dyn Device>,
    config: ViewerConfig,
    sliders: Vec<ParamSlider>,
    geometry: GeomGroup,
    figure: Figure,
}

impl Inspector {
    /// Run `device` with its current parameters and build the initial figure.
    pub fn new(mut device: Box<dyn Device>, config: ViewerConfig) -> Result<Self, PlotError> {
        config.validate()?;

        let raw = device.run()?;
        let geometry = raw.flatten(device.library())?;
        let sliders = device
            .params()
            .iter()
            .map(|(name, value)| {
                ParamSlider::for_param(name, value, config.slider_divisions, config.slider_span)
            })
            .collect();

        let mut inspector = Self {
            device,
            config,
            sliders,
            geometry,
            figure: Figure::new(),
        };
        inspector.redraw();
        debug!(
            "inspecting '{}' with {} parameters",
            inspector.device.name(),
            inspector.sliders.len()
        );
        Ok(inspector)
    }

    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    pub fn into_device(self) -> Box<dyn Device> {
        self.device
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn sliders(&self) -> &[ParamSlider] {
        &self.sliders
    }

    pub fn geometry(&self) -> &GeomGroup {
        &self.geometry
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn slider_mut(&mut self, index: usize) -> Result<&mut ParamSlider, PlotError> {
        let count = self.sliders.len();
        self.sliders
            .get_mut(index)
            .ok_or(PlotError::NoSuchSlider { index, count })
    }

    /// Move slider `index` to `value` and redraw.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<(), PlotError> {
        self.update_slider(index, |slider| {
            if !value.is_finite() {
                return Err(CoreError::NonFiniteParameter {
                    name: slider.param.clone(),
                    value,
                }
                .into());
            }
            slider.set_value(value);
            Ok(())
        })
    }

    /// Move slider `index` to step `step` and redraw.
    pub fn select_step(&mut self, index: usize, step: usize) -> Result<(), PlotError> {
        self.update_slider(index, |slider| slider.select_step(step))
    }

    /// Apply `change` to slider `index` and refresh. The slider is put back
    /// if either step fails.
    fn update_slider<F>(&mut self, index: usize, change: F) -> Result<(), PlotError>
    where
        F: FnOnce(&mut ParamSlider) -> Result<(), PlotError>,
    {
        let slider = self.slider_mut(index)?;
        let previous = slider.clone();
        change(slider)?;
        if let Err(err) = self.refresh() {
            self.sliders[index] = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Push every slider value into the device, re-run it and redraw.
    ///
    /// When the device rejects the values or fails to run, its previous
    /// parameters are restored and the geometry and figure are left alone.
    pub fn refresh(&mut self) -> Result<(), PlotError> {
        let previous = self.device.params().clone();
        match self.rebuild() {
            Ok(geometry) => {
                self.geometry = geometry;
                self.redraw();
                debug!(
                    "refreshed '{}': {} traces",
                    self.device.name(),
                    self.figure.trace_count()
                );
                Ok(())
            }
            Err(err) => {
                *self.device.params_mut() = previous;
                Err(err)
            }
        }
    }

    fn rebuild(&mut self) -> Result<GeomGroup, PlotError> {
        for slider in &self.sliders {
            self.device.set_param(&slider.param, slider.value)?;
        }

        self.device.set_use_references(false);
        self.device.initialize();
        let raw = self.device.run()?;
        Ok(raw.flatten(self.device.library())?)
    }

    fn redraw(&mut self) {
        self.figure.clear_data();
        self.figure
            .add_traces(geometry_traces(&self.geometry, &self.config.palette));
        self.figure
            .add_traces(port_traces(self.device.ports(), self.config.port_marker_size));

        let ranges = self
            .geometry
            .bounding_box()
            .map(|bb| AxisRanges::fit(&bb, self.config.axis_margin));
        let layout = &mut self.figure.layout;
        layout.title = Some(self.device.name().to_string());
        layout.showlegend = Some(false);
        layout.set_ranges(ranges);
        layout.sliders = self
            .sliders
            .iter()
            .enumerate()
            .map(|(row, s)| s.to_plotly(row))
            .collect();
        if !layout.sliders.is_empty() {
            layout.margin = Some(Margin {
                t: None,
                b: Some(SLIDER_MARGIN_BASE + SLIDER_MARGIN_PER_ROW * layout.sliders.len() as f64),
            });
        }
    }

    /// Frames for every step of every slider, varying one parameter at a
    /// time from the current values. Steps the device fails on are `None`.
    /// The session is left as it was.
    pub fn step_frames(&mut self) -> Result<Vec<Vec<Option<StepFrame>>>, PlotError> {
        let saved = self.sliders.clone();
        let result = self.render_steps();
        self.sliders = saved;
        self.refresh()?;
        result
    }

    fn render_steps(&mut self) -> Result<Vec<Vec<Option<StepFrame>>>, PlotError> {
        let mut rows = Vec::with_capacity(self.sliders.len());
        for index in 0..self.sliders.len() {
            let original = self.sliders[index].clone();
            let mut row = Vec::with_capacity(original.step_count());
            for step in 0..original.step_count() {
                self.sliders[index].select_step(step)?;
                match self.refresh() {
                    Ok(()) => row.push(Some(self.figure.frame())),
                    Err(err) => {
                        warn!(
                            "'{}' failed at {} = {}; step left blank: {}",
                            self.device.name(),
                            original.param,
                            self.sliders[index].value,
                            err
                        );
                        row.push(None);
                    }
                }
            }
            self.sliders[index] = original;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Standalone page for the session. With `precompute_steps`, moving a
    /// slider in the page swaps in the traces rendered for that step.
    pub fn to_html(&mut self) -> Result<String, PlotError> {
        if self.config.precompute_steps && !self.sliders.is_empty() {
            let steps = self.step_frames()?;
            output::slider_html(&self.figure, &steps, &self.config)
        } else {
            output::figure_html(&self.figure, &self.config)
        }
    }

    /// Write the session page and open it.
    pub fn show(&mut self) -> Result<PathBuf, PlotError> {
        let html = self.to_html()?;
        output::show_html(&html, &self.config)
    }
}

/// Build an inspector for `device` and open its page.
pub fn device_inspect(device: Box<dyn Device>, config: ViewerConfig) -> Result<Inspector, PlotError> {
    let mut inspector = Inspector::new(device, config)?;
    inspector.show()?;
    Ok(inspector)
}
