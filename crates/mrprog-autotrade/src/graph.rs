//! Input graphs.
//!
//! A graph models how a menu cursor reacts to controller inputs: each node
//! is a cursor position holding the item under it, and each edge is the
//! input that moves the cursor to a neighbor. The graph owns every node;
//! nodes refer to each other by [`NodeId`] only, so cycles are free.

use crate::input::Input;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Handle to a node inside one [`InputGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    // BTreeMap keeps edge iteration, and so search tie-breaks, stable.
    edges: BTreeMap<Input, NodeId>,
}

/// One move of a search result: the input and the node it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub input: Input,
    pub node: NodeId,
}

/// Arena of cursor positions connected by inputs.
#[derive(Debug, Clone)]
pub struct InputGraph<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for InputGraph<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> InputGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an unconnected node.
    pub fn add_node(&mut self, value: T) -> NodeId {
        self.nodes.push(Node {
            value,
            edges: BTreeMap::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Add (or retarget) the edge `from --input--> to`.
    pub fn connect(&mut self, from: NodeId, input: Input, to: NodeId) -> Result<(), GraphError> {
        self.check(to)?;
        self.node_mut(from)?.edges.insert(input, to);
        Ok(())
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).map(|node| &node.value)
    }

    /// Where `input` moves the cursor from `id`, if anywhere.
    pub fn neighbor(&self, id: NodeId, input: Input) -> Option<NodeId> {
        self.nodes.get(id.0)?.edges.get(&input).copied()
    }

    /// Outgoing edges of `id` in search order.
    pub fn edges(&self, id: NodeId) -> impl Iterator<Item = (Input, NodeId)> + '_ {
        self.nodes
            .get(id.0)
            .into_iter()
            .flat_map(|node| node.edges.iter().map(|(&input, &to)| (input, to)))
    }

    /// Follow `inputs` from `start`; `None` if an input has no edge.
    pub fn replay(&self, start: NodeId, inputs: impl IntoIterator<Item = Input>) -> Option<NodeId> {
        inputs
            .into_iter()
            .try_fold(start, |at, input| self.neighbor(at, input))
    }

    fn check(&self, id: NodeId) -> Result<(), GraphError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id.0))
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, GraphError> {
        self.nodes.get_mut(id.0).ok_or(GraphError::UnknownNode(id.0))
    }
}

impl<T: PartialEq + fmt::Debug> InputGraph<T> {
    /// Shortest input sequence that moves the cursor from `root` onto a node
    /// holding `target`.
    ///
    /// Breadth-first, so the first node found holding `target` is at minimum
    /// depth. Among several shortest paths the one discovered first (by edge
    /// order) wins. Returns an empty path when `root` already holds `target`.
    pub fn search(&self, root: NodeId, target: &T) -> Result<Vec<Step>, GraphError> {
        self.check(root)?;
        if self.nodes[root.0].value == *target {
            return Ok(Vec::new());
        }

        let mut parent: Vec<Option<(NodeId, Input)>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([root]);
        visited[root.0] = true;

        while let Some(at) = queue.pop_front() {
            for (&input, &next) in &self.nodes[at.0].edges {
                if visited[next.0] {
                    continue;
                }
                visited[next.0] = true;
                parent[next.0] = Some((at, input));

                if self.nodes[next.0].value == *target {
                    return Ok(Self::unwind(&parent, next));
                }
                queue.push_back(next);
            }
        }

        Err(GraphError::NotFound {
            from: format!("{:?}", self.nodes[root.0].value),
            to: format!("{target:?}"),
        })
    }

    fn unwind(parent: &[Option<(NodeId, Input)>], end: NodeId) -> Vec<Step> {
        let mut path = Vec::new();
        let mut at = end;
        while let Some((prev, input)) = parent[at.0] {
            path.push(Step { input, node: at });
            at = prev;
        }
        path.reverse();
        path
    }
}

/// Error building or searching an input graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("cannot build an input graph from an empty list")]
    EmptyList,
    #[error("duplicate value in list: {0}")]
    DuplicateValue(String),
    #[error("path from {from} to {to} not found")]
    NotFound { from: String, to: String },
    #[error("no node with index {0}")]
    UnknownNode(usize),
}
