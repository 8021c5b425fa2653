//! Rule predicates.
//!
//! Each check is a small pure function over a node (or the whole scene) and a
//! [`RuleContext`]. Predicates never mutate the graph; a predicate that cannot reach a verdict
//! returns a [`RuleFault`] instead of panicking.

use std::collections::BTreeMap;

use regex::Regex;

use crate::rules::assets::AssetResolver;
use crate::rules::config::{
    NamingConvention, ROOT_PARENT, ReferenceAttribute, ReferenceTarget, RuleConfig, RuleKind,
    Severity, ValidationRule,
};
use crate::scene::graph::{NodeId, SceneGraph, SceneNode, plug_node};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One failed check.
pub struct Violation {
    /// Human-readable detail.
    pub detail: String,
    /// Severity override; `None` uses the rule's configured severity.
    pub severity: Option<Severity>,
}

impl Violation {
    /// Violation at the rule's severity.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            severity: None,
        }
    }

    /// Violation that is always an error.
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            severity: Some(Severity::Error),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Violation from a scene-level rule, optionally attached to a node.
pub struct SceneViolation {
    /// Node the violation is reported on, if any.
    pub node: Option<NodeId>,
    /// The violation.
    pub violation: Violation,
}

/// A predicate could not be evaluated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleFault(
    /// Why the predicate could not run.
    pub String,
);

/// Result of a per-node check: no violations means the node passed.
pub type Outcome = Result<Vec<Violation>, RuleFault>;

/// Read-only inputs shared by all predicates during one run.
pub struct RuleContext<'a> {
    /// Scene under validation.
    pub graph: &'a SceneGraph,
    /// Active configuration.
    pub config: &'a RuleConfig,
    /// External asset lookup.
    pub assets: &'a dyn AssetResolver,
    patterns: BTreeMap<&'a str, Result<Regex, String>>,
}

impl<'a> RuleContext<'a> {
    /// Build a context, compiling naming patterns once.
    pub fn new(
        graph: &'a SceneGraph,
        config: &'a RuleConfig,
        assets: &'a dyn AssetResolver,
    ) -> Self {
        let patterns = config
            .naming
            .iter()
            .filter_map(|(node_type, conv)| {
                let pattern = conv.pattern.as_deref()?;
                Some((
                    node_type.as_str(),
                    Regex::new(pattern).map_err(|e| e.to_string()),
                ))
            })
            .collect();
        Self {
            graph,
            config,
            assets,
            patterns,
        }
    }
}

/// Evaluate a per-node rule. Scene-level kinds yield no violations here.
pub fn check_node(rule: &ValidationRule, node: &SceneNode, ctx: &RuleContext<'_>) -> Outcome {
    match &rule.kind {
        RuleKind::Naming => naming(node, ctx),
        RuleKind::Reference => references(node, ctx),
        RuleKind::Hierarchy => hierarchy(node, ctx),
        RuleKind::RequiredAttribute { attribute } => Ok(required_attribute(node, attribute)),
        RuleKind::ForbiddenName { names } => Ok(forbidden_name(node, names)),
        RuleKind::RequiredType { .. } | RuleKind::SingleRoot | RuleKind::UnresolvedConnection => {
            Ok(Vec::new())
        }
    }
}

/// Evaluate a scene-level rule. Per-node kinds yield no violations here.
pub fn check_scene(
    rule: &ValidationRule,
    ctx: &RuleContext<'_>,
) -> Result<Vec<SceneViolation>, RuleFault> {
    let out = match &rule.kind {
        RuleKind::RequiredType { node_type } => required_type(ctx.graph, node_type),
        RuleKind::SingleRoot => single_root(ctx.graph),
        RuleKind::UnresolvedConnection => unresolved_connections(ctx.graph),
        _ => Vec::new(),
    };
    Ok(out)
}

pub(crate) fn naming(node: &SceneNode, ctx: &RuleContext<'_>) -> Outcome {
    let Some(conv) = ctx.config.naming.get(&node.node_type) else {
        return Ok(Vec::new());
    };
    let pattern = match ctx.patterns.get(node.node_type.as_str()) {
        Some(Ok(re)) => Some(re),
        Some(Err(e)) => {
            return Err(RuleFault(format!(
                "invalid naming pattern for type '{}': {e}",
                node.node_type
            )));
        }
        None => None,
    };

    let reasons = naming_mismatches(&node.name, conv, pattern);
    if reasons.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Violation::new(format!(
        "{} '{}' does not follow the naming convention: {}",
        node.node_type,
        node.name,
        reasons.join("; ")
    ))])
}

fn naming_mismatches(name: &str, conv: &NamingConvention, pattern: Option<&Regex>) -> Vec<String> {
    let mut reasons = Vec::new();
    if let Some(re) = pattern
        && !re.is_match(name)
    {
        reasons.push(format!("must match /{}/", re.as_str()));
    }
    if !conv.prefixes.is_empty() && !conv.prefixes.iter().any(|p| name.starts_with(p.as_str())) {
        reasons.push(format!("must start with one of {}", conv.prefixes.join(", ")));
    }
    if !conv.suffixes.is_empty() && !conv.suffixes.iter().any(|s| name.ends_with(s.as_str())) {
        reasons.push(format!("must end with one of {}", conv.suffixes.join(", ")));
    }
    reasons
}

pub(crate) fn references(node: &SceneNode, ctx: &RuleContext<'_>) -> Outcome {
    let Some(references) = ctx.config.references.get(&node.node_type) else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for reference in references {
        let Some(attr) = node.attribute(&reference.attribute) else {
            continue;
        };
        let value = attr.value.trim();
        if value.is_empty() {
            continue;
        }
        if !reference_resolves(reference, value, ctx)? {
            out.push(Violation::error(format!(
                "attribute '{}' of '{}' references '{value}', which does not resolve to {}",
                attr.name,
                node.name,
                target_label(reference.target)
            )));
        }
    }
    Ok(out)
}

fn reference_resolves(
    reference: &ReferenceAttribute,
    value: &str,
    ctx: &RuleContext<'_>,
) -> Result<bool, RuleFault> {
    let node_ok = || ctx.graph.lookup(plug_node(value)).is_some();
    let asset_ok = || {
        ctx.assets
            .exists(value)
            .map_err(|e| RuleFault(format!("could not check asset '{value}': {e}")))
    };
    match reference.target {
        ReferenceTarget::Node => Ok(node_ok()),
        ReferenceTarget::Asset => asset_ok(),
        ReferenceTarget::Either => Ok(node_ok() || asset_ok()?),
    }
}

fn target_label(target: ReferenceTarget) -> &'static str {
    match target {
        ReferenceTarget::Node => "a node",
        ReferenceTarget::Asset => "an existing asset",
        ReferenceTarget::Either => "a node or an existing asset",
    }
}

pub(crate) fn hierarchy(node: &SceneNode, ctx: &RuleContext<'_>) -> Outcome {
    let Some(allowed) = ctx.config.allowed_parents.get(&node.node_type) else {
        return Ok(Vec::new());
    };
    let expected = allowed.join(", ");

    let Some(parent_id) = node.parent else {
        if allowed.iter().any(|a| a == ROOT_PARENT) {
            return Ok(Vec::new());
        }
        return Ok(vec![Violation::new(format!(
            "{} '{}' is at the scene root; expected a parent of type {expected}",
            node.node_type, node.name
        ))]);
    };
    let Some(parent) = ctx.graph.node(parent_id) else {
        return Err(RuleFault(format!(
            "node '{}' has a dangling parent id {}",
            node.name, parent_id.0
        )));
    };

    if allowed.iter().any(|a| *a == parent.node_type) {
        return Ok(Vec::new());
    }
    Ok(vec![Violation::new(format!(
        "{} '{}' is parented under {} '{}'; expected a parent of type {expected}",
        node.node_type, node.name, parent.node_type, parent.name
    ))])
}

pub(crate) fn required_attribute(node: &SceneNode, attribute: &str) -> Vec<Violation> {
    if node.attribute(attribute).is_some() {
        return Vec::new();
    }
    vec![Violation::new(format!(
        "{} '{}' is missing required attribute '{}'",
        node.node_type,
        node.name,
        attribute.trim_start_matches('.')
    ))]
}

pub(crate) fn forbidden_name(node: &SceneNode, names: &[String]) -> Vec<Violation> {
    if !names.iter().any(|n| *n == node.name) {
        return Vec::new();
    }
    vec![Violation::new(format!(
        "forbidden element '{}' found",
        node.name
    ))]
}

pub(crate) fn required_type(graph: &SceneGraph, node_type: &str) -> Vec<SceneViolation> {
    if graph.nodes().any(|n| n.node_type == node_type) {
        return Vec::new();
    }
    vec![SceneViolation {
        node: None,
        violation: Violation::new(format!("missing required element type '{node_type}'")),
    }]
}

pub(crate) fn single_root(graph: &SceneGraph) -> Vec<SceneViolation> {
    let roots = graph.roots().len();
    if roots == 1 {
        return Vec::new();
    }
    vec![SceneViolation {
        node: None,
        violation: Violation::new(format!(
            "scene has {roots} root nodes; expected a single root"
        )),
    }]
}

pub(crate) fn unresolved_connections(graph: &SceneGraph) -> Vec<SceneViolation> {
    let mut out = Vec::new();
    for conn in graph.connections() {
        let ends = [
            (conn.source_node(), conn.destination_node()),
            (conn.destination_node(), conn.source_node()),
        ];
        for (end, other) in ends {
            if end.starts_with(':') || graph.lookup(end).is_some() {
                continue;
            }
            out.push(SceneViolation {
                node: graph.lookup(other),
                violation: Violation::new(format!(
                    "connection '{}' -> '{}' (line {}) names unknown node '{end}'",
                    conn.source, conn.destination, conn.line
                )),
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/rules/predicates.rs"]
mod tests;
