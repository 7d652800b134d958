//! Server-Rendered Operator Page

use water_validator::{FieldKind, FieldSpec, Observation, FIELDS};

use crate::pipeline::PipelineOutcome;

pub const TITLE: &str = "Water Quality Prediction App";

/// What the output area shows
pub enum Output<'a> {
    Empty,
    Result(&'a PipelineOutcome),
    Error(&'a str),
}

/// Render the whole page: sidebar form prefilled with `observation`, the
/// upload input when `show_upload`, and the output area.
pub fn page(observation: &Observation, show_upload: bool, output: Output<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"id\">\n<head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{TITLE}</title></head>\n<body>\n<h1>{TITLE}</h1>\n"));
    html.push_str("<form method=\"post\" action=\"/predict\" enctype=\"multipart/form-data\">\n");
    html.push_str("<aside>\n<h2>Masukkan Parameter</h2>\n");
    for spec in &FIELDS {
        let current = observation.get(spec.name).unwrap_or(spec.default);
        html.push_str(&field(spec, current));
    }
    html.push_str("</aside>\n");

    if show_upload {
        html.push_str(
            "<label>Upload processed_data.csv <input type=\"file\" name=\"dataset\" accept=\".csv\"></label>\n",
        );
    }
    html.push_str("<button type=\"submit\">Prediksi</button>\n</form>\n");

    match output {
        Output::Empty => {}
        Output::Result(outcome) => {
            let verdict = outcome.verdict();
            html.push_str("<section class=\"result\">\n<h3>Hasil Prediksi:</h3>\n");
            html.push_str(&format!(
                "<p>Logistic Regression: {}</p>\n<p>Random Forest: {}</p>\n</section>\n",
                verdict.logistic_regression, verdict.random_forest
            ));
        }
        Output::Error(message) => {
            html.push_str(&format!(
                "<div class=\"error\" role=\"alert\">{}</div>\n",
                escape(message)
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn field(spec: &FieldSpec, current: f64) -> String {
    let label = escape(spec.label);
    match spec.kind {
        FieldKind::Choice => {
            let options: String = [0u8, 1]
                .iter()
                .map(|v| {
                    let selected = if f64::from(*v) == current { " selected" } else { "" };
                    format!("<option value=\"{v}\"{selected}>{v}</option>")
                })
                .collect();
            format!(
                "<label>{label} <select name=\"{}\">{options}</select></label>\n",
                spec.name
            )
        }
        FieldKind::Number | FieldKind::Slider => {
            let input_type = if spec.kind == FieldKind::Slider { "range" } else { "number" };
            let max = spec
                .max
                .map(|m| format!(" max=\"{m}\""))
                .unwrap_or_default();
            format!(
                "<label>{label} <input type=\"{input_type}\" name=\"{}\" min=\"{}\"{max} step=\"{}\" value=\"{current}\"></label>\n",
                spec.name, spec.min, spec.step
            )
        }
    }
}

/// Minimal HTML text escaping
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
