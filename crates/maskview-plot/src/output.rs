//! Standalone HTML pages and how they reach the browser.

use std::fs;
use std::path::PathBuf;

use log::info;
use uuid::Uuid;

use crate::config::ViewerConfig;
use crate::error::PlotError;
use crate::figure::{Figure, StepFrame};

/// Shown under inspector pages that carry pre-rendered slider steps.
pub const SLIDER_NOTE: &str = "Each slider previews its own parameter with the other \
parameters at their starting values, so moving one slider puts the others back. \
Steps the device could not build leave the plot unchanged.";

/// Page showing a single static figure.
pub fn figure_html(figure: &Figure, config: &ViewerConfig) -> Result<String, PlotError> {
    let div_id = new_div_id();
    let script = format!(
        "Plotly.newPlot(\"{id}\", FIGURE.data, FIGURE.layout, {{responsive: true}});",
        id = div_id
    );
    Ok(page(
        figure.layout.title.as_deref().unwrap_or("maskview"),
        &div_id,
        &config.plotly_js_url,
        &format!("const FIGURE = {};", script_json(&figure.to_json()?)),
        &script,
        None,
    ))
}

/// Page showing `figure` with its sliders wired to `steps`.
///
/// `steps[s][k]` is patched into the figure when slider `s` moves to step
/// `k`; `None` marks a step with nothing to show. Slider step values must be
/// `"s:k"`, as produced by the inspector.
pub fn slider_html(
    figure: &Figure,
    steps: &[Vec<Option<StepFrame>>],
    config: &ViewerConfig,
) -> Result<String, PlotError> {
    let div_id = new_div_id();
    let data = format!(
        "const FIGURE = {};\nconst STEPS = {};",
        script_json(&figure.to_json()?),
        script_json(&serde_json::to_string(steps)?)
    );
    let script = format!(
        r#"const div = document.getElementById("{id}");
Plotly.newPlot(div, FIGURE.data, FIGURE.layout, {{responsive: true}}).then(function () {{
  div.on("plotly_sliderchange", function (ev) {{
    const key = String(ev.step.value).split(":");
    const s = Number(key[0]);
    const k = Number(key[1]);
    const row = STEPS[s];
    const frame = row ? row[k] : null;
    if (!frame) {{
      return;
    }}
    const layout = Object.assign({{}}, FIGURE.layout, {{
      xaxis: frame.xaxis,
      yaxis: frame.yaxis,
      sliders: (FIGURE.layout.sliders || []).map(function (slider, i) {{
        return Object.assign({{}}, slider, {{active: i === s ? k : slider.active}});
      }}),
    }});
    Plotly.react(div, frame.data, layout);
  }});
}});"#,
        id = div_id
    );
    Ok(page(
        figure.layout.title.as_deref().unwrap_or("maskview"),
        &div_id,
        &config.plotly_js_url,
        &data,
        &script,
        Some(SLIDER_NOTE),
    ))
}

/// Write `html` to a fresh file in the configured output directory.
pub fn write_html(html: &str, config: &ViewerConfig) -> Result<PathBuf, PlotError> {
    let dir = config.output_dir();
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("maskview-{}.html", Uuid::new_v4().simple()));
    fs::write(&path, html)?;
    info!("wrote {} ({} bytes)", path.display(), html.len());
    Ok(path)
}

/// Write `html` and, if configured, open it in the system browser.
pub fn show_html(html: &str, config: &ViewerConfig) -> Result<PathBuf, PlotError> {
    let path = write_html(html, config)?;
    if config.auto_open {
        open::that(&path).map_err(|source| PlotError::Browser {
            path: path.clone(),
            source,
        })?;
    }
    Ok(path)
}

fn new_div_id() -> String {
    format!("maskview-{}", Uuid::new_v4())
}

/// JSON is embedded in a `<script>` element; `</` would end it early.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page(
    title: &str,
    div_id: &str,
    plotly_url: &str,
    data: &str,
    script: &str,
    note: Option<&str>,
) -> String {
    let note = note
        .map(|text| {
            format!(
                "<p style=\"font:13px sans-serif;color:#555;\">{}</p>\n",
                escape_html(text)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{url}"></script>
</head>
<body>
<div id="{id}" style="width:100%;height:95vh;"></div>
{note}<script>
{data}
{script}
</script>
</body>
</html>
"#,
        title = escape_html(title),
        url = escape_html(plotly_url),
        id = div_id,
        data = data,
        script = script,
        note = note,
    )
}
