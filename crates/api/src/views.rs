//! HTML rendering for the prediction form

use feature_engine::YieldInput;

/// What to show under the form
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Prediction succeeded; the message is plain text
    Success(String),
    /// Prediction failed
    Failure(String),
}

/// Escape text for HTML element and attribute content
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

/// Render the full page: form pre-filled with `input`, then any outcome and notices
pub fn render_page(
    crops: &[String],
    input: &YieldInput,
    outcome: Option<&Outcome>,
    notices: &[String],
    year_range: (i32, i32),
) -> String {
    let options: String = crops
        .iter()
        .map(|crop| {
            let selected = if *crop == input.crop { " selected" } else { "" };
            let crop = escape(crop);
            format!("<option value=\"{crop}\"{selected}>{crop}</option>")
        })
        .collect();

    let outcome = match outcome {
        Some(Outcome::Success(msg)) => {
            format!("<div class=\"success\">🌾 {}</div>", escape(msg))
        }
        Some(Outcome::Failure(msg)) => format!("<div class=\"error\">{}</div>", escape(msg)),
        None => String::new(),
    };

    let notices: String = notices
        .iter()
        .map(|n| format!("<li>{}</li>", escape(n)))
        .collect();
    let notices = if notices.is_empty() {
        String::new()
    } else {
        format!("<ul class=\"notices\">{notices}</ul>")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Global Crop Yield Prediction App</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
label {{ display: block; margin-top: 0.8rem; }}
input, select {{ width: 100%; padding: 0.3rem; }}
button {{ margin-top: 1.2rem; padding: 0.5rem 1rem; }}
.success {{ margin-top: 1rem; padding: 0.8rem; background: #e6f4ea; }}
.error {{ margin-top: 1rem; padding: 0.8rem; background: #fce8e6; }}
.notices {{ margin-top: 1rem; color: #8a6d3b; }}
</style>
</head>
<body>
<h1>🌾 Global Crop Yield Prediction App</h1>
<p>Predict crop yield (hg/ha) based on:</p>
<ul>
<li>Country (Area)</li>
<li>Crop Type</li>
<li>Year</li>
<li>Rainfall (mm)</li>
<li>Avg Temperature (°C)</li>
<li>Pesticide Usage (tonnes)</li>
</ul>
<form method="post" action="/predict">
<label>Country (Area) <input type="text" name="area" value="{area}"></label>
<label>Year <input type="number" name="year" min="{year_min}" max="{year_max}" step="1" value="{year}"></label>
<label>Average Rainfall (mm) <input type="number" name="rainfall" step="any" value="{rainfall}"></label>
<label>Average Temperature (°C) <input type="number" name="temperature" step="any" value="{temperature}"></label>
<label>Pesticide Usage (tonnes) <input type="number" name="pesticides" step="any" value="{pesticides}"></label>
<label>Crop <select name="crop">{options}</select></label>
<button type="submit">🔮 Predict Crop Yield</button>
</form>
{outcome}
{notices}
</body>
</html>
"#,
        area = escape(&input.area),
        year_min = year_range.0,
        year_max = year_range.1,
        year = input.year,
        rainfall = input.rainfall,
        temperature = input.temperature,
        pesticides = input.pesticides,
    )
}
