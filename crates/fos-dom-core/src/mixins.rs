//! ParentNode / ChildNode capability traits
//!
//! Typed handles wrap a `NodeId` already known to be of one kind. Each
//! capability trait is implemented only for the handles that carry it.

use crate::html_collection::HtmlCollection;
use crate::query::SelectorMatcher;
use crate::{DomException, DomResult, DomTree, NodeId};

/// Argument of the variadic node-or-string operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrString {
    Node(NodeId),
    Text(String),
}

impl From<NodeId> for NodeOrString {
    fn from(node: NodeId) -> Self {
        NodeOrString::Node(node)
    }
}

impl From<&str> for NodeOrString {
    fn from(text: &str) -> Self {
        NodeOrString::Text(text.to_string())
    }
}

impl From<String> for NodeOrString {
    fn from(text: String) -> Self {
        NodeOrString::Text(text)
    }
}

impl DomTree {
    /// Strings become Text nodes; more than one node is gathered into a new
    /// fragment
    pub(crate) fn convert_nodes_into_node(&mut self, nodes: Vec<NodeOrString>, document: NodeId) -> DomResult<NodeId> {
        let mut converted: Vec<NodeId> = nodes
            .into_iter()
            .map(|item| match item {
                NodeOrString::Node(node) => node,
                NodeOrString::Text(text) => self.create_text_node(document, &text),
            })
            .collect();

        if converted.len() == 1 {
            return Ok(converted.remove(0));
        }

        let fragment = self.create_document_fragment(document);
        for node in converted {
            self.ensure_pre_insertion_validity(node, fragment, None)?;
            self.insert(node, fragment, None, true);
        }
        Ok(fragment)
    }

    /// Check several `nodes` against `parent` as if they were already
    /// gathered into one fragment, so a rejected call moves nothing.
    /// `child` is the reference child, or the child being replaced when
    /// `replacing` is set.
    fn ensure_gathered_validity(
        &self,
        nodes: &[NodeOrString],
        parent: NodeId,
        child: Option<NodeId>,
        replacing: bool,
    ) -> DomResult<()> {
        let moved = node_ids(nodes);
        let mut elements = 0;
        let mut has_text = false;

        for item in nodes {
            let &NodeOrString::Node(node) = item else {
                has_text = true;
                continue;
            };
            self.ensure_insertable(node, parent, child)?;
            if self.node(node).is_doctype() {
                tracing::debug!("Rejected gathering doctype {:?} into a fragment", node);
                return Err(DomException::HierarchyRequest);
            }

            let expansion = if self.node(node).is_document_fragment() {
                self.children(node).to_vec()
            } else {
                vec![node]
            };
            for expanded in expansion {
                let data = self.node(expanded);
                elements += usize::from(data.is_element());
                has_text |= data.is_text_like();
            }
        }

        if !self.node(parent).is_document() {
            return Ok(());
        }

        let replaced = child.filter(|_| replacing);
        let other_element = self.children(parent).iter().any(|&existing| {
            Some(existing) != replaced && !moved.contains(&existing) && self.node(existing).is_element()
        });
        let child_is_doctype = !replacing && child.is_some_and(|c| self.node(c).is_doctype());
        let doctype_after_child = child.is_some_and(|c| self.doctype_follows(c));

        if elements > 1 || has_text || (elements == 1 && (other_element || child_is_doctype || doctype_after_child)) {
            tracing::debug!("Rejected insertion: document child constraints violated");
            return Err(DomException::HierarchyRequest);
        }
        Ok(())
    }

    /// Validate, then convert `nodes` into the single node to insert
    fn gather_nodes(
        &mut self,
        nodes: Vec<NodeOrString>,
        parent: NodeId,
        child: Option<NodeId>,
        replacing: bool,
    ) -> DomResult<NodeId> {
        if nodes.len() > 1 {
            self.ensure_gathered_validity(&nodes, parent, child, replacing)?;
        }
        let document = self.node_document(parent);
        self.convert_nodes_into_node(nodes, document)
    }

    /// First of `candidates` that is not about to be moved
    fn first_unmoved(candidates: Vec<NodeId>, moved: &[NodeId]) -> Option<NodeId> {
        candidates.into_iter().find(|candidate| !moved.contains(candidate))
    }
}

fn node_ids(nodes: &[NodeOrString]) -> Vec<NodeId> {
    nodes
        .iter()
        .filter_map(|item| match item {
            NodeOrString::Node(node) => Some(*node),
            NodeOrString::Text(_) => None,
        })
        .collect()
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident, $check:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NodeId);

        impl $name {
            /// Wrap `node` if it has the right kind
            pub fn from_node(tree: &DomTree, node: NodeId) -> Option<Self> {
                tree.get(node).filter(|n| n.$check()).map(|_| Self(node))
            }

            pub fn id(self) -> NodeId {
                self.0
            }
        }

        impl From<$name> for NodeId {
            fn from(handle: $name) -> NodeId {
                handle.0
            }
        }
    };
}

typed_handle!(
    /// Document node
    Document,
    is_document
);
typed_handle!(
    /// DocumentFragment node
    DocumentFragment,
    is_document_fragment
);
typed_handle!(
    /// DocumentType node
    DocumentType,
    is_doctype
);
typed_handle!(
    /// Element node
    Element,
    is_element
);
typed_handle!(
    /// Text, CDATA section, comment or processing instruction
    CharacterData,
    is_character_data
);

// ===========================================================================
// ParentNode
// ===========================================================================

/// Nodes that can hold element children
pub trait ParentNode: Copy + Into<NodeId> {
    /// Live collection of element children
    fn children(self, tree: &DomTree) -> HtmlCollection {
        tree.element_children(self.into())
    }

    fn first_element_child(self, tree: &DomTree) -> Option<NodeId> {
        tree.children(self.into())
            .iter()
            .copied()
            .find(|&child| tree.node(child).is_element())
    }

    fn last_element_child(self, tree: &DomTree) -> Option<NodeId> {
        tree.children(self.into())
            .iter()
            .rev()
            .copied()
            .find(|&child| tree.node(child).is_element())
    }

    fn child_element_count(self, tree: &DomTree) -> usize {
        tree.children(self.into())
            .iter()
            .filter(|&&child| tree.node(child).is_element())
            .count()
    }

    /// Insert before the first child
    fn prepend(self, tree: &mut DomTree, nodes: Vec<NodeOrString>) -> DomResult<()> {
        let parent = self.into();
        let moved = node_ids(&nodes);
        let reference = DomTree::first_unmoved(tree.children(parent).to_vec(), &moved);
        let node = tree.gather_nodes(nodes, parent, reference, false)?;
        let first_child = tree.first_child(parent);
        tree.pre_insert(node, parent, first_child)?;
        Ok(())
    }

    /// Insert after the last child
    fn append(self, tree: &mut DomTree, nodes: Vec<NodeOrString>) -> DomResult<()> {
        let parent = self.into();
        let node = tree.gather_nodes(nodes, parent, None, false)?;
        tree.pre_insert(node, parent, None)?;
        Ok(())
    }

    /// Replace all children in one step, queuing a single record
    fn replace_children(self, tree: &mut DomTree, nodes: Vec<NodeOrString>) -> DomResult<()> {
        let parent = self.into();
        let node = tree.gather_nodes(nodes, parent, None, false)?;
        tree.ensure_pre_insertion_validity(node, parent, None)?;
        tree.replace_all(Some(node), parent);
        Ok(())
    }

    fn query_selector(self, tree: &DomTree, matcher: &dyn SelectorMatcher) -> Option<NodeId> {
        tree.query_selector(self.into(), matcher)
    }

    fn query_selector_all(self, tree: &DomTree, matcher: &dyn SelectorMatcher) -> Vec<NodeId> {
        tree.query_selector_all(self.into(), matcher)
    }
}

impl ParentNode for Document {}
impl ParentNode for DocumentFragment {}
impl ParentNode for Element {}

// ===========================================================================
// ChildNode
// ===========================================================================

/// Nodes that can be placed relative to their siblings
pub trait ChildNode: Copy + Into<NodeId> {
    /// Insert `nodes` just before this node
    fn before(self, tree: &mut DomTree, nodes: Vec<NodeOrString>) -> DomResult<()> {
        let this = self.into();
        let Some(parent) = tree.parent(this) else {
            return Ok(());
        };

        let excluded = node_ids(&nodes);
        let viable_previous = tree
            .preceding_siblings(this)
            .into_iter()
            .find(|sibling| !excluded.contains(sibling));

        let candidates = match viable_previous {
            Some(previous) => tree.following_siblings(previous),
            None => tree.children(parent).to_vec(),
        };
        let expected_reference = DomTree::first_unmoved(candidates, &excluded);
        let node = tree.gather_nodes(nodes, parent, expected_reference, false)?;
        let reference = match viable_previous {
            Some(previous) => tree.next_sibling(previous),
            None => tree.first_child(parent),
        };
        tree.pre_insert(node, parent, reference)?;
        Ok(())
    }

    /// Insert `nodes` just after this node
    fn after(self, tree: &mut DomTree, nodes: Vec<NodeOrString>) -> DomResult<()> {
        let this = self.into();
        let Some(parent) = tree.parent(this) else {
            return Ok(());
        };

        let excluded = node_ids(&nodes);
        let viable_next = tree
            .following_siblings(this)
            .into_iter()
            .find(|sibling| !excluded.contains(sibling));

        let node = tree.gather_nodes(nodes, parent, viable_next, false)?;
        tree.pre_insert(node, parent, viable_next)?;
        Ok(())
    }

    /// Replace this node with `nodes`
    fn replace_with(self, tree: &mut DomTree, nodes: Vec<NodeOrString>) -> DomResult<()> {
        let this = self.into();
        let Some(parent) = tree.parent(this) else {
            return Ok(());
        };

        let excluded = node_ids(&nodes);
        let viable_next = tree
            .following_siblings(this)
            .into_iter()
            .find(|sibling| !excluded.contains(sibling));

        let node = if excluded.contains(&this) {
            tree.gather_nodes(nodes, parent, viable_next, false)?
        } else {
            tree.gather_nodes(nodes, parent, Some(this), true)?
        };
        if tree.parent(this) == Some(parent) {
            tree.replace(this, node, parent)?;
        } else {
            tree.pre_insert(node, parent, viable_next)?;
        }
        Ok(())
    }

    /// Detach from the parent, if any
    fn remove(self, tree: &mut DomTree) {
        tree.remove_node(self.into(), false);
    }
}

impl ChildNode for DocumentType {}
impl ChildNode for Element {}
impl ChildNode for CharacterData {}

// ===========================================================================
// NonDocumentTypeChildNode / NonElementParentNode
// ===========================================================================

/// Element sibling navigation
pub trait NonDocumentTypeChildNode: Copy + Into<NodeId> {
    fn previous_element_sibling(self, tree: &DomTree) -> Option<NodeId> {
        tree.preceding_siblings(self.into())
            .into_iter()
            .find(|&sibling| tree.node(sibling).is_element())
    }

    fn next_element_sibling(self, tree: &DomTree) -> Option<NodeId> {
        tree.following_siblings(self.into())
            .into_iter()
            .find(|&sibling| tree.node(sibling).is_element())
    }
}

impl NonDocumentTypeChildNode for Element {}
impl NonDocumentTypeChildNode for CharacterData {}

/// `getElementById` on non-element parents
pub trait NonElementParentNode: Copy + Into<NodeId> {
    fn get_element_by_id(self, tree: &DomTree, element_id: &str) -> Option<NodeId> {
        tree.get_element_by_id(self.into(), element_id)
    }
}

impl NonElementParentNode for Document {}
impl NonElementParentNode for DocumentFragment {}
