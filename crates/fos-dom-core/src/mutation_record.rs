//! Mutation Records and Hooks
//!
//! The tree only enqueues records; delivering them to observers is left to
//! whoever drains the queue with `DomTree::take_records`.

use crate::NodeId;

/// Kind of change a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub attribute_namespace: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    /// "childList" record
    pub fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            attribute_name: None,
            attribute_namespace: None,
            old_value: None,
        }
    }

    /// "attributes" record
    pub fn attributes(target: NodeId, name: &str, namespace: Option<&str>, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_string()),
            attribute_namespace: namespace.map(str::to_string),
            old_value,
        }
    }

    /// "characterData" record
    pub fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            attribute_namespace: None,
            old_value: Some(old_value),
        }
    }
}

/// One logical attribute change, passed to `MutationHooks::attribute_changed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub attribute: NodeId,
    /// Owner element at the time of the change
    pub element: Option<NodeId>,
    pub local_name: String,
    pub namespace: Option<String>,
    pub old_value: Option<String>,
    /// `None` when the attribute was removed
    pub new_value: Option<String>,
}

/// Extension points run synchronously by the mutation algorithms.
///
/// Every method has an empty default, so collaborators (custom element
/// reactions, observer bookkeeping) override only what they need.
pub trait MutationHooks {
    /// Runs once per attribute value change, append, replace or removal
    fn attribute_changed(&mut self, _change: &AttributeChange) {}

    /// Runs after `node` has been inserted under `parent`
    fn inserted(&mut self, _node: NodeId, _parent: NodeId) {}

    /// Runs after `node` has been removed from `old_parent`
    fn removed(&mut self, _node: NodeId, _old_parent: NodeId) {}

    /// Runs for each inclusive descendant moved out of `old_document`
    fn adopted(&mut self, _node: NodeId, _old_document: NodeId) {}
}
