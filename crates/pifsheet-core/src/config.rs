use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PifError;

/// Where things are on the report page.
///
/// Defaults describe the "Potential in Focus" report. Offsets are in PDF
/// points; positive vertical offsets point down the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Caption printed next to the subject's name.
    pub name_label: String,
    /// Vertical distance from the caption's line to the name.
    pub name_vertical_offset: f32,
    /// Slack allowed when testing whether a word sits inside the name box.
    pub containment_tolerance: f32,
    /// The three header captions; the extracted header row must match them.
    pub table_header: [String; 3],
    /// Moves the left boundary of the first two columns left of their caption.
    pub column_left_padding: f32,
    /// Words whose top edges differ by at most this much share a row.
    pub snap_y_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            name_label: "Тест потенциала Potential in Focus".into(),
            name_vertical_offset: 22.0,
            containment_tolerance: 0.5,
            table_header: [
                "ШКАЛА".into(),
                "ОПИСАНИЕ ШКАЛЫ".into(),
                "Процентиль".into(),
            ],
            column_left_padding: 5.0,
            snap_y_tolerance: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    /// Text of cell A1.
    pub title: String,
    pub label_column_width: f64,
    pub score_column_width: f64,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        WorkbookConfig {
            title: "Итоговый балл PIF".into(),
            label_column_width: 50.0,
            score_column_width: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub workbook: WorkbookConfig,
}

/// Load a config from a JSON file. Missing fields keep their defaults.
pub fn load_config(path: &Path) -> Result<Config, PifError> {
    let content = std::fs::read_to_string(path).map_err(|e| PifError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: Config = serde_json::from_str(&content).map_err(|e| PifError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<Config, PifError> {
    let config: Config = serde_json::from_str(json).map_err(PifError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &Config) -> Result<(), PifError> {
    let layout = &config.layout;

    if layout.name_label.trim().is_empty() {
        return Err(PifError::ConfigInvalid(
            "layout.name_label must not be empty".into(),
        ));
    }

    if let Some(i) = layout.table_header.iter().position(|h| h.trim().is_empty()) {
        return Err(PifError::ConfigInvalid(format!(
            "layout.table_header[{i}] must not be empty"
        )));
    }

    for (name, value) in [
        ("containment_tolerance", layout.containment_tolerance),
        ("column_left_padding", layout.column_left_padding),
        ("snap_y_tolerance", layout.snap_y_tolerance),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PifError::ConfigInvalid(format!(
                "layout.{name} must be a non-negative number, got {value}"
            )));
        }
    }

    if !layout.name_vertical_offset.is_finite() {
        return Err(PifError::ConfigInvalid(
            "layout.name_vertical_offset must be finite".into(),
        ));
    }

    let workbook = &config.workbook;
    for (name, value) in [
        ("label_column_width", workbook.label_column_width),
        ("score_column_width", workbook.score_column_width),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(PifError::ConfigInvalid(format!(
                "workbook.{name} must be positive, got {value}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = parse_config_str(r#"{"layout": {"name_vertical_offset": -18}}"#).unwrap();
        assert_eq!(config.layout.name_vertical_offset, -18.0);
        assert_eq!(config.layout.snap_y_tolerance, 3.0);
        assert_eq!(config.workbook, WorkbookConfig::default());
    }

    #[test]
    fn test_empty_header_caption_rejected() {
        let err = parse_config_str(r#"{"layout": {"table_header": ["A", " ", "C"]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("table_header[1]"));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(parse_config_str(r#"{"layout": {"snap_y_tolerance": -1}}"#).is_err());
    }

    #[test]
    fn test_load_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, PifError::ConfigLoad { .. }));

        let mut good = tempfile::NamedTempFile::new().unwrap();
        write!(good, r#"{{"workbook": {{"title": "Score"}}}}"#).unwrap();
        assert_eq!(load_config(good.path()).unwrap().workbook.title, "Score");
    }
}
