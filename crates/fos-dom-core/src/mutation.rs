//! DOM Node Operations
//!
//! Pre-insertion validation, insert, remove, replace, replace-all and adopt.
//! Every structural check runs before the first side effect, so a failed
//! call leaves the tree exactly as it was.

use crate::{DomException, DomResult, DomTree, NodeId};

impl DomTree {
    // =======================================================================
    // Validation
    // =======================================================================

    /// Checks shared by pre-insertion and replacement: parent kind, cycles,
    /// child membership and node kind.
    pub(crate) fn ensure_insertable(&self, node: NodeId, parent: NodeId, child: Option<NodeId>) -> DomResult<()> {
        let parent_node = self.node(parent);
        if !parent_node.can_have_children() {
            tracing::debug!("Rejected insertion: {:?} cannot have children", parent_node.node_type());
            return Err(DomException::HierarchyRequest);
        }

        if self.is_inclusive_ancestor(node, parent) {
            tracing::debug!("Rejected insertion: {:?} is an inclusive ancestor of {:?}", node, parent);
            return Err(DomException::HierarchyRequest);
        }

        if let Some(child) = child {
            if self.parent(child) != Some(parent) {
                return Err(DomException::NotFound);
            }
        }

        let inserted = self.node(node);
        if !(inserted.is_document_fragment()
            || inserted.is_doctype()
            || inserted.is_element()
            || inserted.is_character_data())
        {
            tracing::debug!("Rejected insertion of {:?}", inserted.node_type());
            return Err(DomException::HierarchyRequest);
        }

        if (inserted.is_text_like() && parent_node.is_document()) || (inserted.is_doctype() && !parent_node.is_document()) {
            return Err(DomException::HierarchyRequest);
        }

        Ok(())
    }

    fn element_child_count(&self, parent: NodeId) -> usize {
        self.children(parent)
            .iter()
            .filter(|&&child| self.node(child).is_element())
            .count()
    }

    fn has_text_child(&self, parent: NodeId) -> bool {
        self.children(parent).iter().any(|&child| self.node(child).is_text_like())
    }

    fn has_element_child_other_than(&self, parent: NodeId, excluded: Option<NodeId>) -> bool {
        self.children(parent)
            .iter()
            .any(|&child| Some(child) != excluded && self.node(child).is_element())
    }

    fn has_doctype_child_other_than(&self, parent: NodeId, excluded: Option<NodeId>) -> bool {
        self.children(parent)
            .iter()
            .any(|&child| Some(child) != excluded && self.node(child).is_doctype())
    }

    pub(crate) fn doctype_follows(&self, child: NodeId) -> bool {
        self.following_siblings(child)
            .into_iter()
            .any(|sibling| self.node(sibling).is_doctype())
    }

    fn element_precedes(&self, child: NodeId) -> bool {
        self.preceding_siblings(child)
            .into_iter()
            .any(|sibling| self.node(sibling).is_element())
    }

    /// Ensure `node` may be inserted into `parent` before `child`
    pub(crate) fn ensure_pre_insertion_validity(&self, node: NodeId, parent: NodeId, child: Option<NodeId>) -> DomResult<()> {
        self.ensure_insertable(node, parent, child)?;

        if !self.node(parent).is_document() {
            return Ok(());
        }

        let inserted = self.node(node);
        let child_is_doctype = child.is_some_and(|c| self.node(c).is_doctype());
        let doctype_after_child = child.is_some_and(|c| self.doctype_follows(c));

        let conflict = if inserted.is_document_fragment() {
            let elements = self.element_child_count(node);
            if elements > 1 || self.has_text_child(node) {
                true
            } else {
                elements == 1
                    && (self.has_element_child_other_than(parent, None) || child_is_doctype || doctype_after_child)
            }
        } else if inserted.is_element() {
            self.has_element_child_other_than(parent, None) || child_is_doctype || doctype_after_child
        } else if inserted.is_doctype() {
            self.has_doctype_child_other_than(parent, None)
                || child.is_some_and(|c| self.element_precedes(c))
                || (child.is_none() && self.has_element_child_other_than(parent, None))
        } else {
            false
        };

        if conflict {
            tracing::debug!("Rejected insertion: document child constraints violated");
            return Err(DomException::HierarchyRequest);
        }
        Ok(())
    }

    // =======================================================================
    // Insertion
    // =======================================================================

    /// Insert `node` (or a fragment's children) into `parent` before `child`,
    /// at the end when `child` is `None`. Callers validate first.
    pub(crate) fn insert(&mut self, node: NodeId, parent: NodeId, child: Option<NodeId>, suppress_observers: bool) {
        let is_fragment = self.node(node).is_document_fragment();
        let nodes: Vec<NodeId> = if is_fragment {
            self.children(node).to_vec()
        } else {
            vec![node]
        };

        if nodes.is_empty() {
            return;
        }

        if is_fragment {
            for &fragment_child in &nodes {
                self.remove_node(fragment_child, true);
            }
        }

        let previous_sibling = match child {
            Some(child) => self.previous_sibling(child),
            None => self.last_child(parent),
        };
        let document = self.node_document(parent);

        for &inserted in &nodes {
            self.adopt(inserted, document);

            match child {
                Some(child) => {
                    let index = self.index(child);
                    self.node_mut(parent).children.insert(index, inserted);
                }
                None => {
                    self.node_mut(parent).children.append(inserted);
                }
            }
            self.node_mut(inserted).parent = Some(parent);

            tracing::trace!("Inserted {:?} into {:?}", inserted, parent);
            self.run_hooks(|hooks| hooks.inserted(inserted, parent));
        }

        if !suppress_observers {
            self.queue_tree_mutation_record(parent, nodes, Vec::new(), previous_sibling, child);
        }
    }

    /// Validate, then insert; returns the inserted node
    pub(crate) fn pre_insert(&mut self, node: NodeId, parent: NodeId, child: Option<NodeId>) -> DomResult<NodeId> {
        self.ensure_pre_insertion_validity(node, parent, child)?;

        let reference_child = if child == Some(node) {
            self.next_sibling(node)
        } else {
            child
        };

        self.insert(node, parent, reference_child, false);
        Ok(node)
    }

    /// Append without queuing a record; used while building fresh subtrees
    pub(crate) fn append_unobserved(&mut self, node: NodeId, parent: NodeId) {
        self.insert(node, parent, None, true);
    }

    /// `Node.appendChild`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.pre_insert(node, parent, None)
    }

    /// `Node.insertBefore`
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, child: Option<NodeId>) -> DomResult<NodeId> {
        self.pre_insert(node, parent, child)
    }

    // =======================================================================
    // Removal
    // =======================================================================

    /// Detach `node` from its parent. No-op for parentless nodes.
    pub(crate) fn remove_node(&mut self, node: NodeId, suppress_observers: bool) {
        let Some(parent) = self.parent(node) else {
            return;
        };

        let old_previous_sibling = self.previous_sibling(node);
        let old_next_sibling = self.next_sibling(node);

        self.node_mut(parent).children.remove(&node);
        self.node_mut(node).parent = None;

        tracing::trace!("Removed {:?} from {:?}", node, parent);
        self.run_hooks(|hooks| hooks.removed(node, parent));

        if !suppress_observers {
            self.queue_tree_mutation_record(parent, Vec::new(), vec![node], old_previous_sibling, old_next_sibling);
        }
    }

    pub(crate) fn pre_remove(&mut self, child: NodeId, parent: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomException::NotFound);
        }
        self.remove_node(child, false);
        Ok(child)
    }

    /// `Node.removeChild`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.pre_remove(child, parent)
    }

    // =======================================================================
    // Replacement
    // =======================================================================

    /// Replace `child` with `node` under `parent`; returns `child`
    pub(crate) fn replace(&mut self, child: NodeId, node: NodeId, parent: NodeId) -> DomResult<NodeId> {
        self.ensure_insertable(node, parent, Some(child))?;

        if self.node(parent).is_document() {
            let inserted = self.node(node);
            let conflict = if inserted.is_document_fragment() {
                let elements = self.element_child_count(node);
                if elements > 1 || self.has_text_child(node) {
                    true
                } else {
                    elements == 1
                        && (self.has_element_child_other_than(parent, Some(child)) || self.doctype_follows(child))
                }
            } else if inserted.is_element() {
                self.has_element_child_other_than(parent, Some(child)) || self.doctype_follows(child)
            } else if inserted.is_doctype() {
                self.has_doctype_child_other_than(parent, Some(child)) || self.element_precedes(child)
            } else {
                false
            };
            if conflict {
                tracing::debug!("Rejected replacement: document child constraints violated");
                return Err(DomException::HierarchyRequest);
            }
        }

        let mut reference_child = self.next_sibling(child);
        if reference_child == Some(node) {
            reference_child = self.next_sibling(node);
        }
        let previous_sibling = self.previous_sibling(child);

        let mut removed_nodes = Vec::new();
        if self.parent(child).is_some() {
            removed_nodes.push(child);
            self.remove_node(child, true);
        }

        let added_nodes = if self.node(node).is_document_fragment() {
            self.children(node).to_vec()
        } else {
            vec![node]
        };

        self.insert(node, parent, reference_child, true);
        self.queue_tree_mutation_record(parent, added_nodes, removed_nodes, previous_sibling, reference_child);
        Ok(child)
    }

    /// `Node.replaceChild`
    pub fn replace_child(&mut self, parent: NodeId, node: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.replace(child, node, parent)
    }

    /// Remove every child of `parent` and insert `node` in their place,
    /// queuing a single combined record.
    pub(crate) fn replace_all(&mut self, node: Option<NodeId>, parent: NodeId) {
        let removed_nodes = self.children(parent).to_vec();
        let added_nodes = match node {
            None => Vec::new(),
            Some(node) if self.node(node).is_document_fragment() => self.children(node).to_vec(),
            Some(node) => vec![node],
        };

        for &child in &removed_nodes {
            self.remove_node(child, true);
        }

        if let Some(node) = node {
            self.insert(node, parent, None, true);
        }

        self.queue_tree_mutation_record(parent, added_nodes, removed_nodes, None, None);
    }

    // =======================================================================
    // Adoption
    // =======================================================================

    /// Move `node` into `document`: detach it, then rewrite the node document
    /// of its inclusive descendants and their attributes.
    pub(crate) fn adopt(&mut self, node: NodeId, document: NodeId) {
        let old_document = self.node_document(node);

        if self.parent(node).is_some() {
            self.remove_node(node, false);
        }

        if document == old_document {
            return;
        }

        let inclusive_descendants: Vec<NodeId> = self.tree_order(node).collect();
        for &descendant in &inclusive_descendants {
            self.node_mut(descendant).document = document;
            let attributes: Vec<NodeId> = match self.node(descendant).as_element() {
                Some(element) => element.attributes.iter().copied().collect(),
                None => Vec::new(),
            };
            for attribute in attributes {
                self.node_mut(attribute).document = document;
            }
        }

        tracing::debug!(
            "Adopted {} node(s) from {:?} into {:?}",
            inclusive_descendants.len(),
            old_document,
            document
        );

        for &descendant in &inclusive_descendants {
            self.run_hooks(|hooks| hooks.adopted(descendant, old_document));
        }
    }

    /// `Document.adoptNode`
    pub fn adopt_node(&mut self, document: NodeId, node: NodeId) -> DomResult<NodeId> {
        if self.node(node).is_document() {
            return Err(DomException::NotSupported);
        }
        let document = self.node_document(document);
        self.adopt(node, document);
        Ok(node)
    }

    /// `Document.importNode`
    pub fn import_node(&mut self, document: NodeId, node: NodeId, deep: bool) -> DomResult<NodeId> {
        if self.node(node).is_document() {
            return Err(DomException::NotSupported);
        }
        let document = self.node_document(document);
        Ok(self.clone_into(node, Some(document), deep))
    }
}
