//! Stroke tree: ordered hierarchy of groups and stroke nodes.
//!
//! # Responsibility
//! - Hold the drawable scene in paint order.
//! - Provide depth-first traversal for resolution.
//!
//! # Invariants
//! - Child order is insertion order and equals draw order.
//! - A parent never holds two children with the same id.
//! - Strokes written by this crate live directly under the main group (the
//!   first group child of the root).

use crate::model::id::NodeId;
use crate::model::stroke::Stroke;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Group node holding ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: NodeId,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Leaf node holding one stroke. Shares the stroke id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeNode {
    pub stroke: Stroke,
}

/// Any node of the stroke tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Group(GroupNode),
    Stroke(StrokeNode),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Group(group) => group.id,
            Self::Stroke(node) => node.stroke.id,
        }
    }

    pub fn as_stroke(&self) -> Option<&StrokeNode> {
        match self {
            Self::Stroke(node) => Some(node),
            Self::Group(_) => None,
        }
    }
}

impl StrokeNode {
    pub fn new(stroke: Stroke) -> Self {
        Self { stroke }
    }

    pub fn id(&self) -> NodeId {
        self.stroke.id
    }
}

impl GroupNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    /// Whether a direct child with `id` exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.children.iter().any(|child| child.id() == id)
    }

    /// Appends `node` unless a child with the same id is already present.
    ///
    /// Returns whether the node was appended.
    pub fn add(&mut self, node: Node) -> bool {
        if self.contains(node.id()) {
            return false;
        }
        self.children.push(node);
        true
    }

    /// Depth-first, pre-order walk over all descendants.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: vec![self.children.iter()],
        }
    }
}

/// Pre-order iterator over the descendants of a group.
pub struct DepthFirst<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    if let Node::Group(group) = node {
                        self.stack.push(group.children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Document stroke tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<GroupNode>,
}

impl StrokeTree {
    /// Creates a tree with a root group holding one empty main group.
    pub fn with_main_group(root_id: NodeId, main_group_id: NodeId) -> Self {
        let mut root = GroupNode::new(root_id);
        root.add(Node::Group(GroupNode::new(main_group_id)));
        Self { root: Some(root) }
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root.as_ref().map(|root| root.id)
    }

    /// First group child of the root.
    pub fn main_group(&self) -> Option<&GroupNode> {
        self.root.as_ref()?.children.iter().find_map(|child| match child {
            Node::Group(group) => Some(group),
            Node::Stroke(_) => None,
        })
    }

    pub fn main_group_mut(&mut self) -> Option<&mut GroupNode> {
        self.root
            .as_mut()?
            .children
            .iter_mut()
            .find_map(|child| match child {
                Node::Group(group) => Some(group),
                Node::Stroke(_) => None,
            })
    }

    /// Stroke nodes in depth-first (draw) order, anywhere in the tree.
    pub fn stroke_nodes(&self) -> impl Iterator<Item = &StrokeNode> {
        self.root
            .iter()
            .flat_map(|root| root.iter())
            .filter_map(Node::as_stroke)
    }

    /// Whether any node in the tree (root included) has `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        match self.root.as_ref() {
            Some(root) => root.id == id || root.iter().any(|node| node.id() == id),
            None => false,
        }
    }

    /// Returns the first node id that occurs twice in the tree, if any.
    pub fn first_duplicate_id(&self) -> Option<NodeId> {
        let root = self.root.as_ref()?;
        let mut seen = HashSet::new();
        seen.insert(root.id);
        root.iter().map(Node::id).find(|id| !seen.insert(*id))
    }

    /// All node ids, root first, in pre-order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        match self.root.as_ref() {
            Some(root) => std::iter::once(root.id)
                .chain(root.iter().map(Node::id))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupNode, Node, StrokeNode, StrokeTree};
    use crate::model::geometry::Spline;
    use crate::model::id::Identifier;
    use crate::model::stroke::Stroke;

    fn stroke_node() -> Node {
        Node::Stroke(StrokeNode::new(Stroke::new(
            Identifier::new(),
            Spline::from_xy(vec![0.0, 0.0]),
        )))
    }

    #[test]
    fn add_rejects_same_child_twice() {
        let mut group = GroupNode::new(Identifier::new());
        let node = stroke_node();
        assert!(group.add(node.clone()));
        assert!(!group.add(node.clone()));
        assert_eq!(group.children.len(), 1);
        assert!(group.contains(node.id()));
    }

    #[test]
    fn depth_first_visits_nested_nodes_in_pre_order() {
        let mut inner = GroupNode::new(Identifier::new());
        let b = stroke_node();
        inner.add(b.clone());
        let mut outer = GroupNode::new(Identifier::new());
        let a = stroke_node();
        let c = stroke_node();
        outer.add(a.clone());
        outer.add(Node::Group(inner.clone()));
        outer.add(c.clone());

        let order: Vec<_> = outer.iter().map(Node::id).collect();
        assert_eq!(order, vec![a.id(), inner.id, b.id(), c.id()]);
    }

    #[test]
    fn main_group_is_first_group_child_of_root() {
        let root_id = Identifier::new();
        let main_id = Identifier::new();
        let mut tree = StrokeTree::with_main_group(root_id, main_id);
        assert_eq!(tree.main_group().map(|g| g.id), Some(main_id));

        let node = stroke_node();
        tree.main_group_mut().unwrap().add(node.clone());
        assert_eq!(tree.stroke_nodes().count(), 1);
        assert!(tree.contains(node.id()));
        assert!(tree.contains(root_id));
        assert_eq!(tree.first_duplicate_id(), None);
    }

    #[test]
    fn duplicate_ids_across_groups_are_detected() {
        let node = stroke_node();
        let mut first = GroupNode::new(Identifier::new());
        first.add(node.clone());
        let mut second = GroupNode::new(Identifier::new());
        second.add(node.clone());
        let mut root = GroupNode::new(Identifier::new());
        root.add(Node::Group(first));
        root.add(Node::Group(second));
        let tree = StrokeTree { root: Some(root) };
        assert_eq!(tree.first_duplicate_id(), Some(node.id()));
    }
}
