use std::fmt::Write as _;

use crate::foundation::error::{ValidatorError, ValidatorResult};
use crate::report::builder::{ValidationFinding, ValidationReport};
use crate::rules::config::Severity;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Presentation formats for reports.
pub enum ReportFormat {
    /// Plain-text summary with one section per severity.
    #[default]
    Text,
    /// Pretty-printed JSON array with one object per report.
    Json,
    /// Standalone HTML page.
    Html,
}

/// Render one or more reports.
pub fn render_reports(reports: &[ValidationReport], format: ReportFormat) -> ValidatorResult<String> {
    match format {
        ReportFormat::Text => Ok(reports
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n")),
        ReportFormat::Json => serde_json::to_string_pretty(reports)
            .map_err(|e| ValidatorError::serde(format!("report JSON: {e}"))),
        ReportFormat::Html => Ok(render_html(reports)),
    }
}

fn status(report: &ValidationReport) -> &'static str {
    if report.passed() { "PASSED" } else { "FAILED" }
}

fn location(f: &ValidationFinding) -> String {
    match (&f.node, f.line) {
        (Some(node), Some(line)) => format!("{node} (line {line})"),
        (Some(node), None) => node.clone(),
        (None, _) => "<scene>".to_owned(),
    }
}

/// Plain-text rendering of a single report.
pub fn render_text(report: &ValidationReport) -> String {
    let c = report.counts();
    let mut s = String::new();
    let _ = writeln!(s, "Validation {} for {}", status(report), report.source());
    let _ = writeln!(s, "Errors: {}", c.errors);
    let _ = writeln!(s, "Warnings: {}", c.warnings);
    let _ = writeln!(s, "Info: {}", c.info);

    for (severity, title) in [
        (Severity::Error, "ERRORS"),
        (Severity::Warning, "WARNINGS"),
        (Severity::Info, "INFO"),
    ] {
        let mut section = report
            .findings()
            .iter()
            .filter(|f| f.severity == severity)
            .peekable();
        if section.peek().is_none() {
            continue;
        }
        let _ = writeln!(s, "\n{title}:");
        for f in section {
            let _ = writeln!(s, "  [{}] {}: {}", f.rule, location(f), f.message);
        }
    }

    if !report.parse_warnings().is_empty() {
        let _ = writeln!(s, "\nPARSE WARNINGS:");
        for w in report.parse_warnings() {
            let _ = writeln!(s, "  {w}");
        }
    }
    s
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

const HTML_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; }
.summary { margin: 20px 0; padding: 10px; background-color: #f5f5f5; border-radius: 5px; }
.pass { color: green; }
.fail { color: red; }
table { border-collapse: collapse; width: 100%; margin: 10px 0; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid #ddd; }
th { background-color: #f2f2f2; }";

fn render_html(reports: &[ValidationReport]) -> String {
    let mut s = String::new();
    let title = match reports {
        [single] => format!("Validation Report - {}", escape_html(single.source())),
        _ => "Validation Report".to_owned(),
    };
    let _ = writeln!(
        s,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{HTML_STYLE}\n</style>\n</head>\n<body>\n<h1>Validation Report</h1>"
    );

    for report in reports {
        let c = report.counts();
        let class = if report.passed() { "pass" } else { "fail" };
        let _ = writeln!(
            s,
            "<div class=\"summary\">\n<h2>{}</h2>\n<p>Status: <span class=\"{class}\">{}</span></p>\n<p>Errors: {} &middot; Warnings: {} &middot; Info: {}</p>\n</div>",
            escape_html(report.source()),
            status(report),
            c.errors,
            c.warnings,
            c.info
        );

        if !report.findings().is_empty() {
            let _ = writeln!(
                s,
                "<table>\n<tr><th>Severity</th><th>Rule</th><th>Location</th><th>Message</th></tr>"
            );
            for f in report.findings() {
                let _ = writeln!(
                    s,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    f.severity.as_str(),
                    escape_html(&f.rule),
                    escape_html(&location(f)),
                    escape_html(&f.message)
                );
            }
            let _ = writeln!(s, "</table>");
        }

        if !report.parse_warnings().is_empty() {
            let _ = writeln!(s, "<h3>Parse warnings</h3>\n<ul>");
            for w in report.parse_warnings() {
                let _ = writeln!(s, "<li>{}</li>", escape_html(&w.to_string()));
            }
            let _ = writeln!(s, "</ul>");
        }
    }

    s.push_str("</body>\n</html>\n");
    s
}

#[cfg(test)]
#[path = "../../tests/unit/report/format.rs"]
mod tests;
