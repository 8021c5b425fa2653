use super::*;

fn finding(rule: &str, severity: Severity) -> ValidationFinding {
    ValidationFinding {
        rule: rule.to_string(),
        severity,
        node: Some("n".to_string()),
        line: None,
        message: format!("{rule} failed"),
    }
}

#[test]
fn sorts_by_severity_and_keeps_emission_order() {
    let report = build_report(
        "a.ma",
        vec![
            finding("i1", Severity::Info),
            finding("w1", Severity::Warning),
            finding("e1", Severity::Error),
            finding("w2", Severity::Warning),
            finding("e2", Severity::Error),
            finding("i2", Severity::Info),
        ],
        Vec::new(),
    );
    let order: Vec<&str> = report.findings().iter().map(|f| f.rule.as_str()).collect();
    assert_eq!(order, vec!["e1", "e2", "w1", "w2", "i1", "i2"]);
    assert_eq!(report.source(), "a.ma");
}

#[test]
fn counts_match_findings_and_errors_fail() {
    let report = build_report(
        "a.ma",
        vec![
            finding("e", Severity::Error),
            finding("w", Severity::Warning),
            finding("w", Severity::Warning),
        ],
        Vec::new(),
    );
    let c = report.counts();
    assert_eq!((c.errors, c.warnings, c.info), (1, 2, 0));
    assert_eq!(c.total(), report.findings().len());
    assert_eq!(
        c.errors,
        report
            .findings()
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    );
    assert!(!report.passed());
}

#[test]
fn warnings_and_info_never_fail() {
    let report = build_report(
        "a.ma",
        vec![finding("w", Severity::Warning), finding("i", Severity::Info)],
        Vec::new(),
    );
    assert!(report.passed());

    let empty = build_report("b.ma", Vec::new(), Vec::new());
    assert!(empty.passed());
    assert_eq!(empty.counts().total(), 0);
}
