use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Object,
    Memory { size: u32 },
    Tracer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub kind: NodeKind,
}

/// In-process registry of debug nodes.
#[derive(Debug, Default)]
pub struct DebugTree {
    nodes: Vec<Node>,
    /// 64 bits so ids are never handed out twice within a tree's lifetime.
    next_id: u64,
}

impl DebugTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or at the root). A parent that no longer exists makes the
    /// node a root.
    pub fn append(&mut self, parent: Option<NodeId>, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let parent = parent.filter(|p| self.get(*p).is_some());
        self.nodes.push(Node {
            id,
            parent,
            name: name.to_owned(),
            kind,
        });
        id
    }

    /// Remove `id` and everything below it. Unknown ids are ignored.
    pub fn remove(&mut self, id: NodeId) {
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(
                self.nodes
                    .iter()
                    .filter(|n| n.parent == Some(parent))
                    .map(|n| n.id),
            );
            i += 1;
        }
        self.nodes.retain(|n| !doomed.contains(&n.id));
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.parent == Some(id))
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.parent.is_none())
    }

    /// Resolve a `/`-separated path of node names starting at the roots.
    pub fn find(&self, path: &str) -> Option<&Node> {
        let mut current: Option<&Node> = None;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let parent = current.map(|n| n.id);
            current = Some(
                self.nodes
                    .iter()
                    .find(|n| n.parent == parent && n.name == segment)?,
            );
        }
        current
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
