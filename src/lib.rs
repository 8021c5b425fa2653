//! Scene validation for production scene-description files.
//!
//! A validation run is a one-way pipeline:
//!
//! 1. **Parse**: scene text -> [`SceneGraph`] (plus non-fatal [`ParseWarning`]s)
//! 2. **Evaluate**: [`SceneGraph`] + [`RuleConfig`] -> [`ValidationFinding`]s via [`RuleEngine`]
//! 3. **Report**: findings -> [`ValidationReport`] with per-severity counts and a verdict
//!
//! [`SceneValidator`] wires the three stages together for strings, files, and batches.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same scene and configuration always yield the same finding order.
//! - **Read-only rules**: predicates never mutate the graph; a faulting rule becomes an info
//!   finding instead of aborting the run.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod report;
mod rules;
mod scene;
mod validator;

pub use foundation::error::{ParseError, ValidatorError, ValidatorResult};
pub use report::builder::{SeverityCounts, ValidationFinding, ValidationReport, build_report};
pub use report::format::{ReportFormat, render_reports, render_text};
pub use rules::assets::{AssetResolver, FsAssetResolver, StaticAssetResolver, normalize_asset_path};
pub use rules::config::{
    NamingConvention, ROOT_PARENT, RULE_ERROR, ReferenceAttribute, ReferenceTarget, RuleConfig,
    RuleKind, Severity, ValidationRule,
};
pub use rules::engine::RuleEngine;
pub use rules::predicates::{
    Outcome, RuleContext, RuleFault, SceneViolation, Violation, check_node, check_scene,
};
pub use scene::graph::{
    Ancestors, Attribute, Connection, NodeId, Requirement, SceneGraph, SceneNode, leaf_name,
    plug_node,
};
pub use scene::parser::{ParseWarning, ParseWarningKind, ParsedScene, parse_scene};
pub use validator::{BatchThreading, SceneValidator};
