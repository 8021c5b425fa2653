use std::collections::BTreeMap;

/// Stable handle to a node inside one [`SceneGraph`].
///
/// Identity lives here, not in the node name: renames change the name while the id stays put.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A single attribute value set on a node.
pub struct Attribute {
    /// Attribute name without the leading `.` (`"t"`, `"fileTextureName"`).
    pub name: String,
    /// Value of the `-type` flag, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Raw value tokens joined by single spaces, with quotes removed.
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A typed, named entity in the scene graph.
pub struct SceneNode {
    /// Graph-local identity.
    pub id: NodeId,
    /// Current name (mutable through rename statements).
    pub name: String,
    /// Node type tag, e.g. `transform`, `camera`, `mesh`.
    pub node_type: String,
    /// Attributes in first-set order.
    pub attributes: Vec<Attribute>,
    /// Parent node, `None` for roots.
    pub parent: Option<NodeId>,
    /// Children in creation order.
    pub children: Vec<NodeId>,
    /// Unique id assigned through `rename -uid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Created with `-s` (shared node).
    pub shared: bool,
    /// 1-based line of the creating statement.
    pub line: usize,
}

impl SceneNode {
    /// Look up an attribute by name. A leading `.` in `name` is ignored.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        let name = name.strip_prefix('.').unwrap_or(name);
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// `requires` header entry.
pub struct Requirement {
    /// Plugin or product name (`maya`, `mtoa`).
    pub plugin: String,
    /// Version string as written.
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A `connectAttr` statement, kept as raw plugs.
pub struct Connection {
    /// Source plug, `node.attr`.
    pub source: String,
    /// Destination plug, `node.attr`.
    pub destination: String,
    /// 1-based line of the statement.
    pub line: usize,
}

impl Connection {
    /// Node part of the source plug.
    pub fn source_node(&self) -> &str {
        plug_node(&self.source)
    }

    /// Node part of the destination plug.
    pub fn destination_node(&self) -> &str {
        plug_node(&self.destination)
    }
}

/// Node part of a `node.attr` plug. DAG paths (`|grp|node.attr`) resolve to their leaf.
pub fn plug_node(plug: &str) -> &str {
    let node = plug.split_once('.').map_or(plug, |(n, _)| n);
    leaf_name(node)
}

/// Last segment of a `|`-separated DAG path.
pub fn leaf_name(path: &str) -> &str {
    path.rsplit('|').next().unwrap_or(path)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// In-memory scene graph built from one scene file.
///
/// Nodes live in an id-indexed table; names map to ids through a separate lookup so that a
/// rename never changes identity. A parent always exists before its children are created,
/// which keeps the hierarchy acyclic.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    names: BTreeMap<String, NodeId>,
    roots: Vec<NodeId>,
    requires: Vec<Requirement>,
    file_info: Vec<(String, String)>,
    connections: Vec<Connection>,
}

impl SceneGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created (renames and duplicates included).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no node was created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// Resolve a node name (or DAG path) to the id currently holding it.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(leaf_name(name)).copied()
    }

    /// Resolve a node name (or DAG path) to the node currently holding it.
    pub fn node_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.lookup(name).and_then(|id| self.node(id))
    }

    /// Root nodes in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Parent node of `id`, if any.
    pub fn parent_of(&self, id: NodeId) -> Option<&SceneNode> {
        self.node(id)?.parent.and_then(|p| self.node(p))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.node(id).and_then(|n| n.parent),
        }
    }

    /// Node ids in traversal order: depth-first, parent before children, roots and
    /// children in creation order.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// `requires` header entries in file order.
    pub fn requires(&self) -> &[Requirement] {
        &self.requires
    }

    /// `fileInfo` key/value pairs in file order.
    pub fn file_info(&self) -> &[(String, String)] {
        &self.file_info
    }

    /// `connectAttr` statements in file order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// First free `<base><n>` name, n starting at 1.
    pub(crate) fn next_free_name(&self, base: &str) -> String {
        (1usize..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.names.contains_key(candidate))
            .unwrap_or_else(|| base.to_owned())
    }

    /// Create a node. The caller guarantees `parent` exists.
    ///
    /// Returns the new id and the id that previously held `name`, if any. The displaced
    /// node stays in the graph and hierarchy; only the name lookup moves.
    pub(crate) fn add_node(
        &mut self,
        name: String,
        node_type: String,
        parent: Option<NodeId>,
        shared: bool,
        line: usize,
    ) -> (NodeId, Option<NodeId>) {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            id,
            name: name.clone(),
            node_type,
            attributes: Vec::new(),
            parent,
            children: Vec::new(),
            uid: None,
            shared,
            line,
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        let displaced = self.names.insert(name, id);
        (id, displaced)
    }

    /// Retarget `id` to `new_name`. Returns the id that previously held `new_name`.
    pub(crate) fn rename(&mut self, id: NodeId, new_name: String) -> Option<NodeId> {
        let node = self.nodes.get_mut(id.0)?;
        let old = std::mem::replace(&mut node.name, new_name.clone());
        if self.names.get(&old) == Some(&id) {
            self.names.remove(&old);
        }
        self.names.insert(new_name, id).filter(|prev| *prev != id)
    }

    /// Set (or overwrite in place) an attribute on `id`.
    pub(crate) fn set_attribute(&mut self, id: NodeId, attr: Attribute) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        match node.attributes.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => *existing = attr,
            None => node.attributes.push(attr),
        }
    }

    pub(crate) fn set_uid(&mut self, id: NodeId, uid: String) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.uid = Some(uid);
        }
    }

    pub(crate) fn push_requirement(&mut self, req: Requirement) {
        self.requires.push(req);
    }

    pub(crate) fn push_file_info(&mut self, key: String, value: String) {
        self.file_info.push((key, value));
    }

    pub(crate) fn push_connection(&mut self, conn: Connection) {
        self.connections.push(conn);
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.graph.node(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
