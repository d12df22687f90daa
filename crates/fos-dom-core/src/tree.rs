//! DOM Tree (arena-based allocation)
//!
//! Every node of every document lives in one `Vec<Node>`. Tree relations are
//! read here; they are only written by the mutation algorithms.

use std::collections::VecDeque;
use std::fmt;

use crate::mutation_record::{MutationHooks, MutationRecord};
use crate::{DomConfig, Node, NodeData, NodeId, NodeType};

/// Arena-based DOM tree
///
/// # Panics
///
/// A `NodeId` is only meaningful for the tree that allocated it. Passing an
/// id minted by another, larger tree to any method taking a `NodeId` panics
/// on the out-of-range arena index; use [`DomTree::get`] to probe ids of
/// unknown origin.
pub struct DomTree {
    nodes: Vec<Node>,
    config: DomConfig,
    records: VecDeque<MutationRecord>,
    hooks: Vec<Box<dyn MutationHooks>>,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self::with_config(DomConfig::default())
    }

    pub fn with_config(config: DomConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
            records: VecDeque::new(),
            hooks: Vec::new(),
        }
    }

    pub fn config(&self) -> &DomConfig {
        &self.config
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena (all documents, attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics when `id` was not allocated by this tree.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Allocate a node owned by `document`. `None` allocates a document,
    /// which becomes its own node document.
    pub(crate) fn alloc(&mut self, document: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(document.unwrap_or(id), data));
        id
    }

    // =======================================================================
    // Tree relations
    // =======================================================================

    #[inline]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    /// Node document
    #[inline]
    pub fn node_document(&self, id: NodeId) -> NodeId {
        self.node(id).document
    }

    /// Node document, or `None` for documents themselves
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        (!self.node(id).is_document()).then(|| self.node(id).document)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Parent if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&parent| self.node(parent).is_element())
    }

    /// Children in tree order
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children.as_slice()
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        !self.node(id).children.is_empty()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        position.checked_sub(1).map(|previous| siblings[previous])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        siblings.get(position + 1).copied()
    }

    /// Position within the parent's children, 0 without a parent
    pub fn index(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|parent| self.node(parent).children.index_of(&id))
            .unwrap_or(0)
    }

    /// Node followed by its ancestors, nearest first
    pub fn inclusive_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Topmost inclusive ancestor
    pub fn root(&self, id: NodeId) -> NodeId {
        self.inclusive_ancestors(id).last().unwrap_or(id)
    }

    /// `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inclusive_ancestors(node).any(|current| current == ancestor)
    }

    /// `other` is an inclusive descendant of `node`
    pub fn contains(&self, node: NodeId, other: Option<NodeId>) -> bool {
        other.is_some_and(|other| self.is_inclusive_ancestor(node, other))
    }

    /// Root is a document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.node(self.root(id)).is_document()
    }

    /// Preceding siblings, nearest first
    pub(crate) fn preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&sibling| sibling == id).unwrap_or(0);
        siblings[..position].iter().rev().copied().collect()
    }

    /// Following siblings, nearest first
    pub(crate) fn following_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        match siblings.iter().position(|&sibling| sibling == id) {
            Some(position) => siblings[position + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    // =======================================================================
    // Tree order
    // =======================================================================

    /// Pre-order depth-first walk starting at (and including) `root`
    pub fn tree_order(&self, root: NodeId) -> TreeOrder<'_> {
        TreeOrder {
            tree: self,
            stack: vec![root],
        }
    }

    /// Descendants of `root` in tree order (root excluded)
    pub fn descendants(&self, root: NodeId) -> TreeOrder<'_> {
        TreeOrder {
            tree: self,
            stack: self.children(root).iter().rev().copied().collect(),
        }
    }

    /// Tree order over several roots, one after the other
    pub fn tree_order_all(&self, roots: &[NodeId]) -> Vec<NodeId> {
        roots.iter().flat_map(|&root| self.tree_order(root)).collect()
    }

    // =======================================================================
    // Mutation records and hooks
    // =======================================================================

    /// Register a hook set; hooks run in registration order
    pub fn register_hooks(&mut self, hooks: Box<dyn MutationHooks>) {
        self.hooks.push(hooks);
    }

    /// Drain queued mutation records in the order they were enqueued
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.records.drain(..).collect()
    }

    /// Records queued so far, oldest first
    pub fn pending_records(&self) -> &VecDeque<MutationRecord> {
        &self.records
    }

    pub(crate) fn queue_record(&mut self, record: MutationRecord) {
        if !self.config.queue_mutation_records || self.config.mutation_record_limit == 0 {
            return;
        }
        if self.records.len() >= self.config.mutation_record_limit {
            tracing::warn!(
                "Mutation record queue full ({} records), dropping oldest",
                self.records.len()
            );
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// "childList" record, skipped when nothing was added or removed
    pub(crate) fn queue_tree_mutation_record(
        &mut self,
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) {
        if added.is_empty() && removed.is_empty() {
            return;
        }
        self.queue_record(MutationRecord::child_list(target, added, removed, previous_sibling, next_sibling));
    }

    pub(crate) fn run_hooks<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn MutationHooks),
    {
        for hook in self.hooks.iter_mut() {
            f(hook.as_mut());
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomTree")
            .field("nodes", &self.nodes.len())
            .field("records", &self.records.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Pre-order depth-first iterator
pub struct TreeOrder<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for TreeOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentInit;

    fn sample() -> (DomTree, NodeId, [NodeId; 4]) {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let div = tree.create_element(doc, "div").unwrap();
        let a = tree.create_element(doc, "a").unwrap();
        let b = tree.create_element(doc, "b").unwrap();
        let text = tree.create_text_node(doc, "x");
        tree.append_child(doc, div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(a, text).unwrap();
        tree.append_child(div, b).unwrap();
        (tree, doc, [div, a, b, text])
    }

    #[test]
    fn test_siblings_and_index() {
        let (tree, _, [div, a, b, _]) = sample();
        assert_eq!(tree.first_child(div), Some(a));
        assert_eq!(tree.last_child(div), Some(b));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.previous_sibling(b), Some(a));
        assert_eq!(tree.previous_sibling(a), None);
        assert_eq!(tree.index(b), 1);
        assert_eq!(tree.index(div), 0);
    }

    #[test]
    fn test_tree_order() {
        let (tree, doc, [div, a, b, text]) = sample();
        let order: Vec<_> = tree.tree_order(doc).collect();
        assert_eq!(order, vec![doc, div, a, text, b]);
        let descendants: Vec<_> = tree.descendants(div).collect();
        assert_eq!(descendants, vec![a, text, b]);
        assert_eq!(tree.tree_order_all(&[a, b]), vec![a, text, b]);
    }

    #[test]
    fn test_ancestry() {
        let (tree, doc, [div, a, b, text]) = sample();
        assert!(tree.is_inclusive_ancestor(div, text));
        assert!(tree.is_inclusive_ancestor(text, text));
        assert!(!tree.is_inclusive_ancestor(b, text));
        assert_eq!(tree.root(text), doc);
        assert!(tree.is_connected(a));
        assert!(tree.contains(div, Some(text)));
        assert!(!tree.contains(div, None));
        assert_eq!(tree.parent_element(a), Some(div));
        assert_eq!(tree.parent_element(div), None);
    }

    #[test]
    fn test_foreign_id_lookup() {
        let (big, _, [_, _, _, text]) = sample();
        let small = DomTree::new();
        assert!(small.get(text).is_none());
        assert!(big.get(text).is_some());
    }

    #[test]
    #[should_panic]
    fn test_foreign_id_panics() {
        let (_, _, [_, _, _, text]) = sample();
        let small = DomTree::new();
        let _ = small.parent(text);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut tree = DomTree::with_config(DomConfig {
            mutation_record_limit: 3,
            ..Default::default()
        });
        let doc = tree.create_document(DocumentInit::xml());
        let root = tree.create_element(doc, "root").unwrap();
        for name in ["a", "b", "c", "d", "e"] {
            tree.set_attribute(root, name, "1").unwrap();
        }
        let names: Vec<_> = tree
            .pending_records()
            .iter()
            .filter_map(|record| record.attribute_name.clone())
            .collect();
        assert_eq!(names, vec!["c", "d", "e"]);
        assert_eq!(tree.take_records().len(), 3);
        assert!(tree.pending_records().is_empty());
    }
}
