use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::foundation::error::{ValidatorError, ValidatorResult};

/// Rule name used for findings synthesized when a rule itself fails.
pub const RULE_ERROR: &str = "rule-error";

/// Entry in an allowed-parent set that permits a node to sit at the scene root.
pub const ROOT_PARENT: &str = "@root";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Impact of a finding. Only [`Severity::Error`] fails a run.
pub enum Severity {
    /// Fails validation.
    Error,
    /// Reported, never fails.
    Warning,
    /// Informational.
    Info,
}

impl Severity {
    /// Sort rank, most severe first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    /// Lowercase label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Naming convention for one node type. Every configured part must hold.
pub struct NamingConvention {
    /// Regular expression the full name must match.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Name must start with one of these (if non-empty).
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Name must end with one of these (if non-empty).
    #[serde(default)]
    pub suffixes: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What a reference-bearing attribute must point at.
pub enum ReferenceTarget {
    /// Another node in the same scene (`name` or `name.attr`).
    Node,
    /// A file on disk, relative paths resolved against the asset root.
    Asset,
    /// Either of the above.
    Either,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One reference-bearing attribute of a node type.
pub struct ReferenceAttribute {
    /// Attribute name (`ftn`, `.fileTextureName`).
    pub attribute: String,
    /// Expected referent.
    pub target: ReferenceTarget,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// What a rule checks.
pub enum RuleKind {
    /// Node name matches the convention for its type.
    Naming,
    /// Configured reference attributes resolve.
    Reference,
    /// Parent type is in the allowed-parent set for the node type.
    Hierarchy,
    /// The attribute is set on every matching node.
    RequiredAttribute {
        /// Attribute name.
        attribute: String,
    },
    /// None of these names may appear.
    ForbiddenName {
        /// Forbidden node names.
        names: Vec<String>,
    },
    /// At least one node of this type exists (scene-level).
    RequiredType {
        /// Node type that must be present.
        node_type: String,
    },
    /// The scene has exactly one root node (scene-level).
    SingleRoot,
    /// `connectAttr` endpoints name nodes in the scene (scene-level).
    UnresolvedConnection,
}

impl RuleKind {
    /// `true` for rules evaluated once per scene instead of once per node.
    pub fn is_scene_level(&self) -> bool {
        matches!(
            self,
            RuleKind::RequiredType { .. } | RuleKind::SingleRoot | RuleKind::UnresolvedConnection
        )
    }
}

fn default_severity() -> Severity {
    Severity::Error
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A named, configured check.
pub struct ValidationRule {
    /// Unique rule name, reported with each finding.
    pub name: String,
    /// The check itself.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Node types this rule applies to; empty means all. Not allowed on scene-level kinds.
    #[serde(default)]
    pub node_types: Vec<String>,
    /// Severity of findings (reference rules always report errors).
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Message template; `{rule}`, `{node}`, `{type}` and `{detail}` are substituted.
    #[serde(default)]
    pub message: Option<String>,
}

impl ValidationRule {
    /// Whether the type filter admits `node_type`.
    pub fn applies_to(&self, node_type: &str) -> bool {
        self.node_types.is_empty() || self.node_types.iter().any(|t| t == node_type)
    }

    /// Render the message for one violation.
    pub fn render_message(&self, node: Option<(&str, &str)>, detail: &str) -> String {
        let Some(template) = self.message.as_deref() else {
            return detail.to_owned();
        };
        let (name, node_type) = node.unwrap_or(("", ""));
        template
            .replace("{rule}", &self.name)
            .replace("{node}", name)
            .replace("{type}", node_type)
            .replace("{detail}", detail)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Validation configuration: rules in evaluation order plus the tables they consult.
pub struct RuleConfig {
    /// Naming conventions keyed by node type.
    #[serde(default)]
    pub naming: BTreeMap<String, NamingConvention>,
    /// Allowed parent types keyed by child node type.
    #[serde(default)]
    pub allowed_parents: BTreeMap<String, Vec<String>>,
    /// Reference-bearing attributes keyed by node type.
    #[serde(default)]
    pub references: BTreeMap<String, Vec<ReferenceAttribute>>,
    /// Directory relative asset paths resolve against.
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
}

impl RuleConfig {
    /// Parse and check a JSON configuration.
    pub fn from_json_str(s: &str) -> ValidatorResult<Self> {
        let cfg: RuleConfig = serde_json::from_str(s)
            .map_err(|e| ValidatorError::serde(format!("rule config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON configuration file. A relative `asset_root` is taken relative to the
    /// file's directory.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ValidatorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ValidatorError::io(path, e))?;
        let mut cfg = Self::from_json_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.asset_root = Some(match cfg.asset_root.take() {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => base.to_path_buf(),
        });
        tracing::debug!(rules = cfg.rules.len(), "rule config loaded");
        Ok(cfg)
    }

    /// Reject configurations whose findings would be ambiguous.
    pub fn validate(&self) -> ValidatorResult<()> {
        let mut seen = HashSet::new();
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(ValidatorError::config(format!(
                    "rules[{i}]: rule name must be non-empty"
                )));
            }
            if rule.name == RULE_ERROR {
                return Err(ValidatorError::config(format!(
                    "rules[{i}]: rule name '{RULE_ERROR}' is reserved"
                )));
            }
            if rule.kind.is_scene_level() && !rule.node_types.is_empty() {
                return Err(ValidatorError::config(format!(
                    "rules[{i}]: scene-level rule '{}' does not take node_types",
                    rule.name
                )));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ValidatorError::config(format!(
                    "rules[{i}]: duplicate rule name '{}'",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rules/config.rs"]
mod tests;
