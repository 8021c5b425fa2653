use crate::report::builder::ValidationFinding;
use crate::rules::assets::AssetResolver;
use crate::rules::config::{RULE_ERROR, RuleConfig, Severity, ValidationRule};
use crate::rules::predicates::{RuleContext, RuleFault, check_node, check_scene};
use crate::scene::graph::{NodeId, SceneGraph, SceneNode};

/// Applies a [`RuleConfig`] to scene graphs.
///
/// Rules run in configuration order. Per-node rules visit matching nodes in traversal order
/// (parent before children, children in creation order). A rule that faults on a node is
/// reported as an info finding and the run continues.
pub struct RuleEngine<'a> {
    config: &'a RuleConfig,
    assets: &'a dyn AssetResolver,
}

impl<'a> RuleEngine<'a> {
    /// Engine over `config`, resolving external assets through `assets`.
    pub fn new(config: &'a RuleConfig, assets: &'a dyn AssetResolver) -> Self {
        Self { config, assets }
    }

    /// Evaluate every rule against `graph`, returning findings in emission order.
    #[tracing::instrument(skip_all, fields(rules = self.config.rules.len(), nodes = graph.len()))]
    pub fn evaluate(&self, graph: &SceneGraph) -> Vec<ValidationFinding> {
        let ctx = RuleContext::new(graph, self.config, self.assets);
        let order = graph.traverse();
        let mut out = Vec::new();

        for rule in &self.config.rules {
            if rule.kind.is_scene_level() {
                self.scene_rule(rule, &ctx, &mut out);
                continue;
            }
            for node in order.iter().filter_map(|id| graph.node(*id)) {
                if !rule.applies_to(&node.node_type) {
                    continue;
                }
                match check_node(rule, node, &ctx) {
                    Ok(violations) => {
                        for v in violations {
                            out.push(ValidationFinding {
                                rule: rule.name.clone(),
                                severity: v.severity.unwrap_or(rule.severity),
                                node: Some(node.name.clone()),
                                line: Some(node.line),
                                message: rule.render_message(
                                    Some((&node.name, &node.node_type)),
                                    &v.detail,
                                ),
                            });
                        }
                    }
                    Err(fault) => out.push(fault_finding(rule, Some(node), &fault)),
                }
            }
        }

        tracing::debug!(findings = out.len(), "rules evaluated");
        out
    }

    fn scene_rule(
        &self,
        rule: &ValidationRule,
        ctx: &RuleContext<'_>,
        out: &mut Vec<ValidationFinding>,
    ) {
        match check_scene(rule, ctx) {
            Ok(violations) => {
                for sv in violations {
                    let node = sv.node.and_then(|id: NodeId| ctx.graph.node(id));
                    out.push(ValidationFinding {
                        rule: rule.name.clone(),
                        severity: sv.violation.severity.unwrap_or(rule.severity),
                        node: node.map(|n| n.name.clone()),
                        line: node.map(|n| n.line),
                        message: rule.render_message(
                            node.map(|n| (n.name.as_str(), n.node_type.as_str())),
                            &sv.violation.detail,
                        ),
                    });
                }
            }
            Err(fault) => out.push(fault_finding(rule, None, &fault)),
        }
    }
}

fn fault_finding(
    rule: &ValidationRule,
    node: Option<&SceneNode>,
    fault: &RuleFault,
) -> ValidationFinding {
    tracing::warn!(
        rule = %rule.name,
        node = node.map(|n| n.name.as_str()),
        "rule skipped: {fault}"
    );
    let message = match node {
        Some(n) => format!("rule '{}' skipped for '{}': {fault}", rule.name, n.name),
        None => format!("rule '{}' skipped: {fault}", rule.name),
    };
    ValidationFinding {
        rule: RULE_ERROR.to_owned(),
        severity: Severity::Info,
        node: node.map(|n| n.name.clone()),
        line: node.map(|n| n.line),
        message,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rules/engine.rs"]
mod tests;
