//! Built-in Vega-Lite renderer.
//!
//! Translates `%PLOT` directives and a result frame into a Vega-Lite v3
//! document with the frame inlined under `data.values` (column-major, the
//! shape chart frontends for this mimetype consume).
//!
//! Directives are case-insensitive `KEY VALUE` pairs:
//!
//! ```text
//! %PLOT x_field year y_field total mark bar <> SELECT year, total FROM sales
//! ```
//!
//! `X_FIELD`, `Y_FIELD`, and `COLOR` name frame columns; `MARK` picks the
//! mark type (default `point`); `WIDTH`/`HEIGHT` size the chart in pixels;
//! `TITLE` captions it.

use serde_json::{json, Map, Value};

use super::ChartRenderer;
use crate::frame::Frame;
use crate::{Result, SquillError};

/// Schema for the v3 documents matching the published mimetype.
pub const VEGALITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v3.json";

pub struct VegaLiteRenderer {
    schema: String,
}

impl VegaLiteRenderer {
    pub fn new() -> Self {
        Self { schema: VEGALITE_SCHEMA.to_string() }
    }
}

impl Default for VegaLiteRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer for VegaLiteRenderer {
    fn render(&self, directives: &[String], frame: &Frame) -> Result<Value> {
        if frame.is_empty() {
            return Err(SquillError::EmptyChartResult);
        }
        let plot = PlotSpec::parse(directives)?;

        let mut encoding = Map::new();
        for (channel, column) in [("x", &plot.x), ("y", &plot.y), ("color", &plot.color)] {
            let Some(column) = column else { continue };
            let values = frame.column(column).ok_or_else(|| {
                SquillError::Chart(format!("no column '{column}' in the query result"))
            })?;
            encoding.insert(
                channel.to_string(),
                json!({"field": column, "type": infer_field_type(values)}),
            );
        }

        let mut doc = json!({
            "$schema": self.schema,
            "data": {"values": frame.values()},
            "mark": plot.mark.as_deref().unwrap_or("point"),
            "encoding": encoding,
        });
        if let Some(width) = plot.width {
            doc["width"] = json!(width);
        }
        if let Some(height) = plot.height {
            doc["height"] = json!(height);
        }
        if let Some(title) = plot.title {
            doc["title"] = json!(title);
        }
        Ok(doc)
    }
}

/// Merge a frame into a spec document under its `data` key.
///
/// Used by `%VEGA_LITE <name>` when the cell body carries a SQL query; any
/// `data` the stored spec already had is replaced by the fresh result.
pub fn attach_data(spec: &mut Map<String, Value>, frame: &Frame) {
    spec.insert("data".to_string(), json!({"values": frame.values()}));
}

/// Encoding type from rendered cells: all-numeric columns are quantitative,
/// anything else nominal. `NULL` markers don't disqualify a numeric column.
pub fn infer_field_type(values: &[String]) -> &'static str {
    let mut saw_number = false;
    for value in values {
        if value == "NULL" {
            continue;
        }
        if value.parse::<f64>().is_err() {
            return "nominal";
        }
        saw_number = true;
    }
    if saw_number {
        "quantitative"
    } else {
        "nominal"
    }
}

#[derive(Debug, Default)]
struct PlotSpec {
    x: Option<String>,
    y: Option<String>,
    color: Option<String>,
    mark: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    title: Option<String>,
}

impl PlotSpec {
    fn parse(directives: &[String]) -> Result<Self> {
        let mut spec = PlotSpec::default();
        for pair in directives.chunks(2) {
            let [key, value] = pair else {
                return Err(SquillError::Chart(format!(
                    "plot directive '{}' is missing a value",
                    pair[0]
                )));
            };
            match key.to_ascii_uppercase().as_str() {
                "X_FIELD" => spec.x = Some(value.clone()),
                "Y_FIELD" => spec.y = Some(value.clone()),
                "COLOR" => spec.color = Some(value.clone()),
                "MARK" => spec.mark = Some(value.clone()),
                "TITLE" => spec.title = Some(value.clone()),
                "WIDTH" => spec.width = Some(parse_dimension(key, value)?),
                "HEIGHT" => spec.height = Some(parse_dimension(key, value)?),
                other => {
                    return Err(SquillError::Chart(format!("unknown plot directive: {other}")))
                }
            }
        }
        Ok(spec)
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    value.parse().map_err(|_| {
        SquillError::Chart(format!("invalid {} '{value}': expected pixels", key.to_lowercase()))
    })
}
