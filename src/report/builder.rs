use crate::rules::config::Severity;
use crate::scene::parser::ParseWarning;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A single rule-evaluation result.
pub struct ValidationFinding {
    /// Name of the rule that produced it (`rule-error` for faulted rules).
    pub rule: String,
    /// Finding severity.
    pub severity: Severity,
    /// Offending node name; `None` for scene-level findings.
    pub node: Option<String>,
    /// Line where the offending node was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Human-readable message.
    pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Finding counts per severity.
pub struct SeverityCounts {
    /// Error findings.
    pub errors: usize,
    /// Warning findings.
    pub warnings: usize,
    /// Info findings.
    pub info: usize,
}

impl SeverityCounts {
    fn tally(findings: &[ValidationFinding]) -> Self {
        let mut c = Self::default();
        for f in findings {
            match f.severity {
                Severity::Error => c.errors += 1,
                Severity::Warning => c.warnings += 1,
                Severity::Info => c.info += 1,
            }
        }
        c
    }

    /// Sum over all severities.
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.info
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Outcome of validating one scene. Immutable once built.
pub struct ValidationReport {
    source: String,
    passed: bool,
    counts: SeverityCounts,
    findings: Vec<ValidationFinding>,
    parse_warnings: Vec<ParseWarning>,
}

impl ValidationReport {
    /// Label of the validated input (usually its path).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Findings ordered by severity, then emission order.
    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    /// Per-severity counts.
    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    /// Non-fatal parser warnings for the same input.
    pub fn parse_warnings(&self) -> &[ParseWarning] {
        &self.parse_warnings
    }

    /// `true` iff there are no error findings.
    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Assemble a report from findings in emission order.
///
/// The sort is stable: findings of equal severity keep the order the engine emitted them in.
pub fn build_report(
    source: impl Into<String>,
    mut findings: Vec<ValidationFinding>,
    parse_warnings: Vec<ParseWarning>,
) -> ValidationReport {
    findings.sort_by_key(|f| f.severity.rank());
    let counts = SeverityCounts::tally(&findings);
    ValidationReport {
        source: source.into(),
        passed: counts.errors == 0,
        counts,
        findings,
        parse_warnings,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/builder.rs"]
mod tests;
