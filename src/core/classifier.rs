//! Decides whether an analysis response describes a single file or a project.

use super::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Risk level reported by the analysis service.
///
/// Unknown labels are kept verbatim so nothing the service says is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DangerLevel {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl DangerLevel {
    /// Upper-cased label used for display.
    pub fn label(&self) -> String {
        match self {
            DangerLevel::Low => "LOW".to_string(),
            DangerLevel::Medium => "MEDIUM".to_string(),
            DangerLevel::High => "HIGH".to_string(),
            DangerLevel::Critical => "CRITICAL".to_string(),
            DangerLevel::Other(raw) => raw.to_uppercase(),
        }
    }
}

impl From<String> for DangerLevel {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "low" => DangerLevel::Low,
            "medium" => DangerLevel::Medium,
            "high" => DangerLevel::High,
            "critical" => DangerLevel::Critical,
            _ => DangerLevel::Other(raw),
        }
    }
}

impl From<DangerLevel> for String {
    fn from(level: DangerLevel) -> Self {
        match level {
            DangerLevel::Other(raw) => raw,
            known => known.label().to_lowercase(),
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The project-level risk summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallAnalysis {
    pub overall_danger: DangerLevel,
    pub overall_reason: String,
}

/// The per-file record returned by the service.
///
/// Single-file responses may omit `filename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFinding {
    #[serde(default)]
    pub filename: Option<String>,
    pub danger: DangerLevel,
    pub code: String,
    pub reason: String,
}

/// The classified, render-ready analysis response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    /// A project response: one aggregate plus the per-file findings,
    /// in the order the service returned them.
    Folder {
        overall: OverallAnalysis,
        files: Vec<FileFinding>,
    },
    /// A response about exactly one file.
    SingleFile(FileFinding),
    /// The service returned an empty array.
    Empty,
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn overall_field(item: &Value) -> Option<&Value> {
    item.get("overall_analysis").filter(|v| is_truthy(v))
}

fn parse_item<T: for<'de> Deserialize<'de>>(item: &Value, index: usize) -> Result<T, CoreError> {
    T::deserialize(item).map_err(|e| CoreError::Parse(format!("item {index}: {e}")))
}

/// Classifies the raw response array.
///
/// If any element carries a truthy `overall_analysis`, the response is a
/// folder result whose aggregate is the first such element's analysis and
/// whose files are all elements without one. Otherwise the first element is
/// the single-file result. An element that does not match its expected
/// shape fails the whole classification.
pub fn classify(items: &[Value]) -> Result<AnalysisResult, CoreError> {
    let Some(first) = items.first() else {
        return Ok(AnalysisResult::Empty);
    };

    let aggregate = items
        .iter()
        .enumerate()
        .find_map(|(i, item)| overall_field(item).map(|v| (i, v)));

    match aggregate {
        Some((index, overall)) => {
            let overall: OverallAnalysis = parse_item(overall, index)?;
            let files = items
                .iter()
                .enumerate()
                .filter(|(_, item)| overall_field(item).is_none())
                .map(|(i, item)| parse_item(item, i))
                .collect::<Result<Vec<FileFinding>, _>>()?;
            Ok(AnalysisResult::Folder { overall, files })
        }
        None => Ok(AnalysisResult::SingleFile(parse_item(first, 0)?)),
    }
}

/// Parses a response body and classifies it.
pub fn classify_body(body: &[u8]) -> Result<AnalysisResult, CoreError> {
    let items: Vec<Value> = serde_json::from_slice(body)
        .map_err(|e| CoreError::Parse(format!("expected a JSON array: {e}")))?;
    classify(&items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(value: Value) -> Vec<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_file_result() {
        let raw = items(json!([
            {"filename": "a.py", "danger": "low", "code": "print(1)", "reason": "safe"}
        ]));
        let result = classify(&raw).unwrap();
        let AnalysisResult::SingleFile(finding) = result else {
            panic!("expected single file result");
        };
        assert_eq!(finding.danger, DangerLevel::Low);
        assert_eq!(finding.danger.label(), "LOW");
        assert_eq!(finding.code, "print(1)");
        assert_eq!(finding.reason, "safe");
        assert_eq!(finding.filename.as_deref(), Some("a.py"));
    }

    #[test]
    fn test_single_file_uses_only_first_element() {
        let raw = items(json!([
            {"danger": "high", "code": "eval(x)", "reason": "eval"},
            {"unexpected": true}
        ]));
        let result = classify(&raw).unwrap();
        assert!(matches!(
            result,
            AnalysisResult::SingleFile(FileFinding { danger: DangerLevel::High, filename: None, .. })
        ));
    }

    #[test]
    fn test_folder_result_keeps_service_order() {
        let raw = items(json!([
            {"filename": "proj/z.js", "danger": "medium", "code": "a", "reason": "r1"},
            {"overall_analysis": {"overall_danger": "high", "overall_reason": "eval use"}},
            {"filename": "proj/b.js", "danger": "high", "code": "...", "reason": "eval()"}
        ]));
        let AnalysisResult::Folder { overall, files } = classify(&raw).unwrap() else {
            panic!("expected folder result");
        };
        assert_eq!(overall.overall_danger.label(), "HIGH");
        assert_eq!(overall.overall_reason, "eval use");
        let names: Vec<_> = files.iter().filter_map(|f| f.filename.as_deref()).collect();
        assert_eq!(names, vec!["proj/z.js", "proj/b.js"]);
    }

    #[test]
    fn test_falsy_overall_analysis_is_ignored() {
        let raw = items(json!([
            {"overall_analysis": null, "danger": "low", "code": "", "reason": "fine"},
            {"overall_analysis": false, "danger": "high", "code": "", "reason": "bad"}
        ]));
        let result = classify(&raw).unwrap();
        assert!(matches!(result, AnalysisResult::SingleFile(ref f) if f.reason == "fine"));
    }

    #[test]
    fn test_empty_array_is_explicit_empty_state() {
        assert_eq!(classify(&[]).unwrap(), AnalysisResult::Empty);
        assert_eq!(classify_body(b"[]").unwrap(), AnalysisResult::Empty);
    }

    #[test]
    fn test_malformed_shapes_are_parse_errors() {
        assert!(matches!(classify_body(b"{\"detail\": \"x\"}"), Err(CoreError::Parse(_))));
        assert!(matches!(classify_body(b"not json"), Err(CoreError::Parse(_))));

        let missing_fields = items(json!([{"filename": "a.py"}]));
        assert!(matches!(classify(&missing_fields), Err(CoreError::Parse(_))));

        let bad_aggregate = items(json!([{"overall_analysis": {"overall_danger": 3}}]));
        assert!(matches!(classify(&bad_aggregate), Err(CoreError::Parse(_))));
    }

    #[test]
    fn test_unknown_danger_labels_are_preserved() {
        let level = DangerLevel::from("unknown".to_string());
        assert_eq!(level, DangerLevel::Other("unknown".to_string()));
        assert_eq!(level.to_string(), "UNKNOWN");
        assert_eq!(DangerLevel::from("HiGh".to_string()), DangerLevel::High);
        assert_eq!(String::from(DangerLevel::Medium), "medium");
    }
}
