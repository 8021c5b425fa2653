use super::*;
use crate::report::builder::build_report;
use crate::scene::parser::{ParseWarning, ParseWarningKind};

fn sample() -> ValidationReport {
    build_report(
        "shots/010.ma",
        vec![
            ValidationFinding {
                rule: "one-root".to_string(),
                severity: Severity::Warning,
                node: None,
                line: None,
                message: "scene has 2 root nodes; expected a single root".to_string(),
            },
            ValidationFinding {
                rule: "camera-parent".to_string(),
                severity: Severity::Error,
                node: Some("cam".to_string()),
                line: Some(4),
                message: "camera 'cam' is at the scene root; expected a parent of type <transform>"
                    .to_string(),
            },
        ],
        vec![ParseWarning {
            line: 9,
            kind: ParseWarningKind::Unrecognized,
            message: "unrecognized command 'bogus'".to_string(),
            statement: "bogus 1 2".to_string(),
        }],
    )
}

#[test]
fn text_lists_sections_by_severity() {
    let text = render_text(&sample());
    assert!(text.starts_with("Validation FAILED for shots/010.ma\n"));
    assert!(text.contains("Errors: 1\nWarnings: 1\nInfo: 0\n"));
    let errors = text.find("ERRORS:").unwrap();
    let warnings = text.find("WARNINGS:").unwrap();
    assert!(errors < warnings);
    assert!(text.contains("  [camera-parent] cam (line 4): camera 'cam'"));
    assert!(text.contains("  [one-root] <scene>: scene has 2 root nodes"));
    assert!(!text.contains("INFO:"));
    assert!(text.contains("PARSE WARNINGS:\n  line 9: unrecognized command 'bogus'"));
}

#[test]
fn json_is_structured() {
    let json = render_reports(&[sample()], ReportFormat::Json).unwrap();
    let all: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(all.as_array().map(Vec::len), Some(1));
    let v = &all[0];
    assert_eq!(v["source"], "shots/010.ma");
    assert_eq!(v["passed"], false);
    assert_eq!(v["counts"]["errors"], 1);
    assert_eq!(v["findings"][0]["severity"], "error");
    assert_eq!(v["findings"][0]["node"], "cam");
    assert!(v["findings"][1]["node"].is_null());
    assert_eq!(v["parse_warnings"][0]["kind"], "unrecognized");

    let many = render_reports(&[sample(), sample()], ReportFormat::Json).unwrap();
    let v: serde_json::Value = serde_json::from_str(&many).unwrap();
    assert_eq!(v.as_array().map(Vec::len), Some(2));
}

#[test]
fn html_escapes_user_text() {
    let html = render_reports(&[sample()], ReportFormat::Html).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<span class=\"fail\">FAILED</span>"));
    assert!(html.contains("expected a parent of type &lt;transform&gt;"));
    assert!(html.contains("&lt;scene&gt;"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn text_for_several_reports_is_concatenated() {
    let out = render_reports(&[sample(), sample()], ReportFormat::Text).unwrap();
    assert_eq!(out.matches("Validation FAILED").count(), 2);
}
