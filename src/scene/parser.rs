use std::fmt;

use crate::foundation::error::ParseError;
use crate::scene::graph::{Attribute, Connection, NodeId, Requirement, SceneGraph, leaf_name};
use crate::scene::lexer::{RawStatement, Token, TokenKind, lex, split_statements};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Why a statement was skipped or only partially applied.
pub enum ParseWarningKind {
    /// The statement's command is not understood.
    Unrecognized,
    /// A known command with missing or unreadable operands.
    Malformed,
    /// A create or rename reused a name already held by another node.
    DuplicateName,
    /// A relative `setAttr` or `rename` appeared before any node was current.
    NoCurrentNode,
    /// `select` named a node that is not in the file.
    UnresolvedSelection,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Non-fatal problem recorded while parsing.
pub struct ParseWarning {
    /// 1-based line where the statement starts.
    pub line: usize,
    /// Warning category.
    pub kind: ParseWarningKind,
    /// Human-readable detail.
    pub message: String,
    /// Source text of the offending statement, without its `;`.
    pub statement: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Output of a successful parse.
pub struct ParsedScene {
    /// The scene graph.
    pub graph: SceneGraph,
    /// Statements that were skipped or partially applied, in file order.
    pub warnings: Vec<ParseWarning>,
}

/// Parse scene text into a graph.
///
/// Malformed statements become [`ParseWarning`]s and parsing continues. Statements that
/// reference a node that was never created (rename source, `-parent`, explicit `setAttr`
/// plug) fail the whole parse with [`ParseError::UnknownNode`].
#[tracing::instrument(skip(src), fields(bytes = src.len()))]
pub fn parse_scene(src: &str) -> Result<ParsedScene, ParseError> {
    let mut p = SceneParser::default();
    for stmt in split_statements(src) {
        p.statement(&stmt)?;
    }
    tracing::debug!(
        nodes = p.graph.len(),
        warnings = p.warnings.len(),
        "scene parsed"
    );
    Ok(ParsedScene {
        graph: p.graph,
        warnings: p.warnings,
    })
}

#[derive(Default)]
struct SceneParser {
    graph: SceneGraph,
    warnings: Vec<ParseWarning>,
    /// Most recently created or selected node; target of relative `setAttr`.
    current: Option<NodeId>,
    /// Text of the statement being applied.
    stmt_text: String,
}

/// Flags and positional operands of one statement.
struct Args {
    flags: Vec<(String, Option<String>)>,
    positional: Vec<String>,
}

impl Args {
    fn has(&self, names: &[&str]) -> bool {
        self.flags.iter().any(|(f, _)| names.contains(&f.as_str()))
    }

    fn value(&self, names: &[&str]) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(f, _)| names.contains(&f.as_str()))
            .and_then(|(_, v)| v.as_deref())
    }
}

/// Split tokens into flags and positionals. Flags listed in `takes_value` consume the next
/// word or string; a missing value is reported as an error message.
fn split_args(tokens: &[Token], takes_value: &[&str]) -> Result<Args, String> {
    let mut flags = Vec::new();
    let mut positional = Vec::new();
    let mut it = tokens.iter();
    while let Some(tok) = it.next() {
        match &tok.kind {
            TokenKind::Flag(name) if takes_value.contains(&name.as_str()) => {
                let value = it
                    .next()
                    .and_then(|t| t.kind.text())
                    .ok_or_else(|| format!("flag -{name} at byte {} expects a value", tok.span.start))?;
                flags.push((name.clone(), Some(value.to_owned())));
            }
            TokenKind::Flag(name) => flags.push((name.clone(), None)),
            TokenKind::Word(s) | TokenKind::Str(s) => positional.push(s.clone()),
        }
    }
    Ok(Args { flags, positional })
}

const CREATE_NODE_VALUE_FLAGS: &[&str] = &["n", "name", "p", "parent"];
const SET_ATTR_VALUE_FLAGS: &[&str] = &[
    "type",
    "k",
    "keyable",
    "l",
    "lock",
    "cb",
    "channelBox",
    "s",
    "size",
    "ch",
    "capacityHint",
];
const RENAME_VALUE_FLAGS: &[&str] = &["uid"];
const REQUIRES_VALUE_FLAGS: &[&str] = &["nodeType", "dataType"];

impl SceneParser {
    fn warn(&mut self, line: usize, kind: ParseWarningKind, message: impl Into<String>) {
        let w = ParseWarning {
            line,
            kind,
            message: message.into(),
            statement: self.stmt_text.clone(),
        };
        tracing::debug!(line = w.line, kind = ?w.kind, "{}", w.message);
        self.warnings.push(w);
    }

    fn statement(&mut self, stmt: &RawStatement) -> Result<(), ParseError> {
        self.stmt_text.clone_from(&stmt.text);
        let tokens = match lex(&stmt.text) {
            Ok(t) => t,
            Err(e) => {
                self.warn(stmt.line, ParseWarningKind::Malformed, e.to_string());
                return Ok(());
            }
        };
        let Some((head, rest)) = tokens.split_first() else {
            return Ok(());
        };
        let TokenKind::Word(cmd) = &head.kind else {
            self.warn(
                stmt.line,
                ParseWarningKind::Unrecognized,
                format!(
                    "statement starts with '{}' instead of a command",
                    &stmt.text[head.span.start..head.span.end]
                ),
            );
            return Ok(());
        };

        let takes_value: &[&str] = match cmd.as_str() {
            "createNode" => CREATE_NODE_VALUE_FLAGS,
            "setAttr" => SET_ATTR_VALUE_FLAGS,
            "rename" => RENAME_VALUE_FLAGS,
            "requires" => REQUIRES_VALUE_FLAGS,
            "select" | "connectAttr" | "fileInfo" | "currentUnit" | "file" => &[],
            other => {
                self.warn(
                    stmt.line,
                    ParseWarningKind::Unrecognized,
                    format!("unrecognized command '{other}'"),
                );
                return Ok(());
            }
        };
        let args = match split_args(rest, takes_value) {
            Ok(a) => a,
            Err(msg) => {
                self.warn(stmt.line, ParseWarningKind::Malformed, format!("{cmd}: {msg}"));
                return Ok(());
            }
        };

        match cmd.as_str() {
            "createNode" => self.create_node(stmt.line, &args),
            "setAttr" => self.set_attr(stmt.line, &args),
            "rename" => self.rename(stmt.line, &args),
            "select" => {
                self.select(stmt.line, &args);
                Ok(())
            }
            "connectAttr" => {
                self.connect_attr(stmt.line, &args);
                Ok(())
            }
            "requires" => {
                self.requires(stmt.line, &args);
                Ok(())
            }
            "fileInfo" => {
                self.file_info(stmt.line, &args);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn resolve(&self, name: &str, line: usize) -> Result<NodeId, ParseError> {
        self.graph
            .lookup(name)
            .ok_or_else(|| ParseError::UnknownNode {
                name: name.to_owned(),
                line,
            })
    }

    fn create_node(&mut self, line: usize, args: &Args) -> Result<(), ParseError> {
        let Some(node_type) = args.positional.first() else {
            self.warn(line, ParseWarningKind::Malformed, "createNode: missing node type");
            return Ok(());
        };
        let parent = match args.value(&["p", "parent"]) {
            Some(p) => Some(self.resolve(p, line)?),
            None => None,
        };
        let name = match args.value(&["n", "name"]) {
            Some(n) => leaf_name(n).to_owned(),
            None => self.graph.next_free_name(node_type),
        };
        let shared = args.has(&["s", "shared"]);

        let (id, displaced) =
            self.graph
                .add_node(name.clone(), node_type.clone(), parent, shared, line);
        if displaced.is_some() {
            self.warn(
                line,
                ParseWarningKind::DuplicateName,
                format!("node name '{name}' reused; lookups now resolve to the newer node"),
            );
        }
        self.current = Some(id);
        Ok(())
    }

    fn set_attr(&mut self, line: usize, args: &Args) -> Result<(), ParseError> {
        let Some((plug, values)) = args.positional.split_first() else {
            self.warn(line, ParseWarningKind::Malformed, "setAttr: missing attribute");
            return Ok(());
        };

        let (target, attr_name) = if let Some(attr) = plug.strip_prefix('.') {
            let Some(current) = self.current else {
                self.warn(
                    line,
                    ParseWarningKind::NoCurrentNode,
                    format!("setAttr '{plug}' with no current node"),
                );
                return Ok(());
            };
            (current, attr)
        } else {
            let Some((node, attr)) = plug.split_once('.') else {
                self.warn(
                    line,
                    ParseWarningKind::Malformed,
                    format!("setAttr: '{plug}' is not a node.attribute plug"),
                );
                return Ok(());
            };
            (self.resolve(node, line)?, attr)
        };

        if attr_name.is_empty() {
            self.warn(line, ParseWarningKind::Malformed, "setAttr: empty attribute name");
            return Ok(());
        }

        self.graph.set_attribute(
            target,
            Attribute {
                name: attr_name.to_owned(),
                type_hint: args.value(&["type"]).map(str::to_owned),
                value: values.join(" "),
            },
        );
        Ok(())
    }

    fn rename(&mut self, line: usize, args: &Args) -> Result<(), ParseError> {
        if let Some(uid) = args.value(&["uid"]) {
            match self.current {
                Some(current) => self.graph.set_uid(current, uid.to_owned()),
                None => self.warn(
                    line,
                    ParseWarningKind::NoCurrentNode,
                    "rename -uid with no current node",
                ),
            }
            return Ok(());
        }

        let (target, new_name) = match args.positional.as_slice() {
            [old, new] => (self.resolve(old, line)?, new),
            [new] => match self.current {
                Some(current) => (current, new),
                None => {
                    self.warn(
                        line,
                        ParseWarningKind::NoCurrentNode,
                        format!("rename to '{new}' with no current node"),
                    );
                    return Ok(());
                }
            },
            _ => {
                self.warn(
                    line,
                    ParseWarningKind::Malformed,
                    "rename: expected one or two names",
                );
                return Ok(());
            }
        };

        let new_name = leaf_name(new_name).to_owned();
        if self.graph.rename(target, new_name.clone()).is_some() {
            self.warn(
                line,
                ParseWarningKind::DuplicateName,
                format!("rename to '{new_name}' reuses an existing name"),
            );
        }
        Ok(())
    }

    fn select(&mut self, line: usize, args: &Args) {
        let Some(name) = args.positional.first() else {
            self.warn(line, ParseWarningKind::Malformed, "select: missing node name");
            return;
        };
        self.current = self.graph.lookup(name);
        if self.current.is_none() {
            self.warn(
                line,
                ParseWarningKind::UnresolvedSelection,
                format!("select '{name}' does not name a node in this file"),
            );
        }
    }

    fn connect_attr(&mut self, line: usize, args: &Args) {
        match args.positional.as_slice() {
            [source, destination, ..] => self.graph.push_connection(Connection {
                source: source.clone(),
                destination: destination.clone(),
                line,
            }),
            _ => self.warn(
                line,
                ParseWarningKind::Malformed,
                "connectAttr: expected source and destination plugs",
            ),
        }
    }

    fn requires(&mut self, line: usize, args: &Args) {
        match args.positional.as_slice() {
            [plugin, version, ..] => self.graph.push_requirement(Requirement {
                plugin: plugin.clone(),
                version: version.clone(),
            }),
            _ => self.warn(
                line,
                ParseWarningKind::Malformed,
                "requires: expected plugin and version",
            ),
        }
    }

    fn file_info(&mut self, line: usize, args: &Args) {
        match args.positional.as_slice() {
            [key, value] => self.graph.push_file_info(key.clone(), value.clone()),
            _ => self.warn(
                line,
                ParseWarningKind::Malformed,
                "fileInfo: expected key and value",
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/parser.rs"]
mod tests;
