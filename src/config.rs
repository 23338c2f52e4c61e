use json::JsonValue;

use crate::error::ViewerError;

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub edge_color: String,
    pub face_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub line_width: f64,
}

/// Figure dimensions and artist colours
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub width: u32,
    pub height: u32,
    pub mesh: PolygonStyle,
    pub highlight: PolygonStyle,
    pub limiter: LineStyle,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            width: 640,
            height: 480,
            mesh: PolygonStyle {
                edge_color: "black".to_owned(),
                face_color: "white".to_owned(),
            },
            highlight: PolygonStyle {
                edge_color: "black".to_owned(),
                face_color: "green".to_owned(),
            },
            limiter: LineStyle {
                color: "#1f77b4".to_owned(),
                line_width: 1.5,
            },
        }
    }
}

fn read_color(json: &JsonValue, section: &str, key: &str) -> Result<Option<String>, ViewerError> {
    let value = &json[section][key];
    if value.is_null() {
        return Ok(None);
    }
    match value.as_str() {
        Some(c) if !c.trim().is_empty() => Ok(Some(c.trim().to_owned())),
        _ => Err(ViewerError::Config(format!(
            "{section}.{key} must be a non-empty color string"
        ))),
    }
}

fn read_positive(json: &JsonValue, section: &str, key: &str) -> Result<Option<f64>, ViewerError> {
    let value = &json[section][key];
    if value.is_null() {
        return Ok(None);
    }
    match value.as_f64() {
        Some(v) if v > 0.0 => Ok(Some(v)),
        _ => Err(ViewerError::Config(format!(
            "{section}.{key} must be a positive number"
        ))),
    }
}

const SECTIONS: [(&str, &[&str]); 4] = [
    ("figure", &["width", "height"]),
    ("mesh", &["edge_color", "face_color"]),
    ("highlight", &["edge_color", "face_color"]),
    ("limiter", &["color", "line_width"]),
];

/// Figure dimension in whole pixels; must round to at least one pixel
fn read_pixels(json: &JsonValue, key: &str) -> Result<Option<u32>, ViewerError> {
    match read_positive(json, "figure", key)? {
        Some(v) if v.round() >= 1.0 && v.round() <= u32::MAX as f64 => {
            Ok(Some(v.round() as u32))
        }
        Some(v) => Err(ViewerError::Config(format!(
            "figure.{key} = {v} is not a usable pixel size"
        ))),
        None => Ok(None),
    }
}

/// Sections and `section.key` names the style loader does not read
fn unknown_keys(json: &JsonValue) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for (name, value) in json.entries() {
        match SECTIONS.iter().find(|(section, _)| *section == name) {
            Some((_, keys)) => {
                for (key, _) in value.entries() {
                    if !keys.contains(&key) {
                        unknown.push(format!("{name}.{key}"));
                    }
                }
            }
            None => unknown.push(name.to_owned()),
        }
    }
    unknown
}

/// Parses a style document. Every key is optional.
pub fn parse_style(contents: &str) -> Result<Style, ViewerError> {
    let style_json = match json::parse(contents) {
        Ok(j) => j,
        Err(err) => return Err(ViewerError::Config(format!("Error in style json: {err}"))),
    };

    if !style_json.is_object() {
        return Err(ViewerError::Config(
            "Style json must be an object".to_owned(),
        ));
    }

    for section in SECTIONS.iter().map(|(name, _)| *name) {
        if style_json.has_key(section) && !style_json[section].is_object() {
            return Err(ViewerError::Config(format!(
                "Style json section {section} must be an object"
            )));
        }
    }

    for name in unknown_keys(&style_json) {
        println!("warning [style]: ignoring unknown key {name}");
    }

    let mut style = Style::default();

    if let Some(width) = read_pixels(&style_json, "width")? {
        style.width = width;
    }
    if let Some(height) = read_pixels(&style_json, "height")? {
        style.height = height;
    }

    for (section, target) in [
        ("mesh", &mut style.mesh),
        ("highlight", &mut style.highlight),
    ] {
        if let Some(c) = read_color(&style_json, section, "edge_color")? {
            target.edge_color = c;
        }
        if let Some(c) = read_color(&style_json, section, "face_color")? {
            target.face_color = c;
        }
    }

    if let Some(c) = read_color(&style_json, "limiter", "color")? {
        style.limiter.color = c;
    }
    if let Some(w) = read_positive(&style_json, "limiter", "line_width")? {
        style.limiter.line_width = w;
    }

    Ok(style)
}

/// Loads the style file, or the defaults when no file is given
pub fn load_style(style_file: Option<&str>) -> Result<Style, ViewerError> {
    let Some(path) = style_file else {
        return Ok(Style::default());
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            return Err(ViewerError::Input(format!(
                "Unable to open style file {}: {err}",
                path
            )))
        }
    };

    let style = parse_style(&contents)?;
    println!("info: loaded style from {path}");
    Ok(style)
}
