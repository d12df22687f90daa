//! Cloning and node equality

use crate::node::{AttrData, ElementData, NodeData};
use crate::{DomTree, NodeId};

impl DomTree {
    /// `Node.cloneNode`
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        self.clone_into(node, None, deep)
    }

    /// Clone `node` into `document` (its own node document when `None`)
    pub(crate) fn clone_into(&mut self, node: NodeId, document: Option<NodeId>, deep: bool) -> NodeId {
        let source = self.node(node);
        let document = document.unwrap_or(source.document);

        let data = match &source.data {
            NodeData::Element(element) => NodeData::Element(ElementData::new(
                element.namespace.clone(),
                element.prefix.clone(),
                element.local_name.clone(),
            )),
            NodeData::Attr(attr) => NodeData::Attr(AttrData::new(
                attr.namespace.clone(),
                attr.prefix.clone(),
                attr.local_name.clone(),
                attr.value.clone(),
            )),
            other => other.clone(),
        };
        let attributes: Vec<NodeId> = source
            .as_element()
            .map(|element| element.attributes.iter().copied().collect())
            .unwrap_or_default();
        let children: Vec<NodeId> = if deep { self.children(node).to_vec() } else { Vec::new() };

        let copy = if source.is_document() {
            self.alloc(None, data)
        } else {
            self.alloc(Some(document), data)
        };
        let copy_document = self.node_document(copy);

        for attr in attributes {
            let attr_copy = self.clone_into(attr, Some(copy_document), false);
            if let Some(data) = self.node_mut(attr_copy).as_attr_mut() {
                data.owner_element = Some(copy);
            }
            if let Some(element) = self.node_mut(copy).as_element_mut() {
                element.attributes.append(attr_copy);
            }
        }

        for child in children {
            let child_copy = self.clone_into(child, Some(copy_document), true);
            self.append_unobserved(child_copy, copy);
        }

        tracing::trace!("Cloned {:?} as {:?} (deep: {})", node, copy, deep);
        copy
    }

    /// `Node.isSameNode`
    pub fn is_same_node(&self, a: NodeId, b: Option<NodeId>) -> bool {
        b == Some(a)
    }

    /// `Node.isEqualNode`: same kind, same kind-specific data, equal attribute
    /// sets in any order and pairwise-equal children
    pub fn is_equal_node(&self, a: NodeId, b: Option<NodeId>) -> bool {
        let Some(b) = b else {
            return false;
        };
        if a == b {
            return true;
        }

        let (left, right) = (self.node(a), self.node(b));
        let data_equal = match (&left.data, &right.data) {
            (NodeData::Document(_), NodeData::Document(_)) => true,
            (NodeData::DocumentFragment, NodeData::DocumentFragment) => true,
            (NodeData::Doctype(x), NodeData::Doctype(y)) => x == y,
            (NodeData::Element(x), NodeData::Element(y)) => {
                x.namespace == y.namespace
                    && x.prefix == y.prefix
                    && x.local_name == y.local_name
                    && x.attributes.len() == y.attributes.len()
                    && x.attributes.iter().all(|&attr| {
                        y.attributes
                            .iter()
                            .any(|&other| self.attributes_equal(attr, other))
                    })
            }
            (NodeData::Attr(_), NodeData::Attr(_)) => self.attributes_equal(a, b),
            (
                NodeData::ProcessingInstruction { target: t1, data: d1 },
                NodeData::ProcessingInstruction { target: t2, data: d2 },
            ) => t1 == t2 && d1 == d2,
            (NodeData::Text(x), NodeData::Text(y))
            | (NodeData::CdataSection(x), NodeData::CdataSection(y))
            | (NodeData::Comment(x), NodeData::Comment(y)) => x == y,
            _ => false,
        };

        if !data_equal {
            return false;
        }

        let (left_children, right_children) = (self.children(a), self.children(b));
        left_children.len() == right_children.len()
            && left_children
                .iter()
                .zip(right_children)
                .all(|(&x, &y)| self.is_equal_node(x, Some(y)))
    }

    fn attributes_equal(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node(a).as_attr(), self.node(b).as_attr()) {
            (Some(x), Some(y)) => x.namespace == y.namespace && x.local_name == y.local_name && x.value == y.value,
            _ => false,
        }
    }
}
