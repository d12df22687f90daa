//! Node Interface Operations
//!
//! Names, values, text content, normalization, document position and
//! namespace lookup.

use crate::namespace::{HTML_NAMESPACE, XML_NAMESPACE, XMLNS_NAMESPACE};
use crate::node::NodeData;
use crate::{DomResult, DomTree, NodeId};

/// `compareDocumentPosition` bit flags
pub struct DocumentPosition;

impl DocumentPosition {
    pub const DISCONNECTED: u16 = 0x01;
    pub const PRECEDING: u16 = 0x02;
    pub const FOLLOWING: u16 = 0x04;
    pub const CONTAINS: u16 = 0x08;
    pub const CONTAINED_BY: u16 = 0x10;
    pub const IMPLEMENTATION_SPECIFIC: u16 = 0x20;
}

impl DomTree {
    // =======================================================================
    // Names
    // =======================================================================

    /// `Node.nodeName`
    pub fn node_name(&self, node: NodeId) -> String {
        match &self.node(node).data {
            NodeData::Element(_) => self.tag_name(node).unwrap_or_default(),
            NodeData::Attr(attr) => attr.qualified_name(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::CdataSection(_) => "#cdata-section".to_string(),
            NodeData::ProcessingInstruction { target, .. } => target.clone(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::Document(_) => "#document".to_string(),
            NodeData::Doctype(doctype) => doctype.name.clone(),
            NodeData::DocumentFragment => "#document-fragment".to_string(),
        }
    }

    /// `Element.tagName`: uppercased for HTML elements in HTML documents
    pub fn tag_name(&self, element: NodeId) -> Option<String> {
        let data = self.node(element).as_element()?;
        let name = data.qualified_name();
        if data.is_in_namespace(HTML_NAMESPACE) && self.is_html_document(element) {
            Some(name.to_ascii_uppercase())
        } else {
            Some(name)
        }
    }

    /// Local name of an element or attribute
    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element(element) => Some(&element.local_name),
            NodeData::Attr(attr) => Some(&attr.local_name),
            _ => None,
        }
    }

    /// Namespace of an element or attribute
    pub fn namespace_uri(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element(element) => element.namespace.as_deref(),
            NodeData::Attr(attr) => attr.namespace.as_deref(),
            _ => None,
        }
    }

    /// Namespace prefix of an element or attribute
    pub fn prefix(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element(element) => element.prefix.as_deref(),
            NodeData::Attr(attr) => attr.prefix.as_deref(),
            _ => None,
        }
    }

    // =======================================================================
    // Values and text
    // =======================================================================

    /// `Node.nodeValue`: attribute value or character data
    pub fn node_value(&self, node: NodeId) -> Option<String> {
        match &self.node(node).data {
            NodeData::Attr(attr) => Some(attr.value.clone()),
            data => data.character_data().map(str::to_string),
        }
    }

    /// `Node.nodeValue` setter; `None` means the empty string. No-op for other
    /// node kinds.
    pub fn set_node_value(&mut self, node: NodeId, value: Option<&str>) -> DomResult<()> {
        let value = value.unwrap_or_default();
        let target = self.node(node);
        if target.is_attr() {
            self.set_attr_value(node, value)
        } else if target.is_character_data() {
            self.set_data(node, value)
        } else {
            Ok(())
        }
    }

    /// Concatenated data of the Text descendants of `node`
    fn descendant_text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter(|&descendant| self.node(descendant).is_text_like())
            .filter_map(|descendant| self.data(descendant))
            .collect()
    }

    /// `Node.textContent`; `None` for documents and doctypes
    pub fn text_content(&self, node: NodeId) -> Option<String> {
        match &self.node(node).data {
            NodeData::Document(_) | NodeData::Doctype(_) => None,
            NodeData::Element(_) | NodeData::DocumentFragment => Some(self.descendant_text_content(node)),
            NodeData::Attr(attr) => Some(attr.value.clone()),
            data => data.character_data().map(str::to_string),
        }
    }

    /// `Node.textContent` setter. Elements and fragments have their children
    /// replaced by one Text node, or by nothing for an empty string.
    pub fn set_text_content(&mut self, node: NodeId, value: Option<&str>) -> DomResult<()> {
        let value = value.unwrap_or_default();
        let target = self.node(node);

        if target.is_element() || target.is_document_fragment() {
            let text = (!value.is_empty()).then(|| self.create_text_node(node, value));
            self.replace_all(text, node);
            Ok(())
        } else if target.is_attr() {
            self.set_attr_value(node, value)
        } else if target.is_character_data() {
            self.set_data(node, value)
        } else {
            Ok(())
        }
    }

    /// `Node.normalize`: drop empty Text descendants and merge adjacent ones
    pub fn normalize(&mut self, node: NodeId) -> DomResult<()> {
        let texts: Vec<NodeId> = self
            .descendants(node)
            .filter(|&descendant| self.node(descendant).is_text())
            .collect();

        for text in texts {
            // Already merged into a previous sibling.
            if self.parent(text).is_none() {
                continue;
            }

            let length = self.data_length(text);
            if length == 0 {
                self.remove_node(text, false);
                continue;
            }

            let mut following = Vec::new();
            let mut current = self.next_sibling(text);
            while let Some(sibling) = current {
                if !self.node(sibling).is_text() {
                    break;
                }
                following.push(sibling);
                current = self.next_sibling(sibling);
            }
            if following.is_empty() {
                continue;
            }

            let merged: String = following.iter().filter_map(|&sibling| self.data(sibling)).collect();
            self.replace_data(text, length, 0, &merged)?;
            for sibling in following {
                self.remove_node(sibling, false);
            }
        }
        Ok(())
    }

    /// `Node.getRootNode`
    pub fn get_root_node(&self, node: NodeId) -> NodeId {
        self.root(node)
    }

    // =======================================================================
    // Document position
    // =======================================================================

    /// `Node.compareDocumentPosition`: position of `other` relative to `node`
    pub fn compare_document_position(&self, node: NodeId, other: NodeId) -> u16 {
        if node == other {
            return 0;
        }

        let mut node1 = Some(other);
        let mut node2 = Some(node);
        let mut attr1 = None;
        let mut attr2 = None;

        if self.node(other).is_attr() {
            attr1 = Some(other);
            node1 = self.owner_element(other);
        }

        if self.node(node).is_attr() {
            attr2 = Some(node);
            node2 = self.owner_element(node);

            if let (Some(attr1), Some(n1), Some(n2)) = (attr1, node1, node2) {
                if n1 == n2 {
                    for &attr in self.attribute_list(n2) {
                        if attr == attr1 {
                            return DocumentPosition::IMPLEMENTATION_SPECIFIC | DocumentPosition::PRECEDING;
                        }
                        if Some(attr) == attr2 {
                            return DocumentPosition::IMPLEMENTATION_SPECIFIC | DocumentPosition::FOLLOWING;
                        }
                    }
                }
            }
        }

        let (Some(node1), Some(node2)) = (node1, node2) else {
            return self.disconnected_position(node, other);
        };
        if self.root(node1) != self.root(node2) {
            return self.disconnected_position(node, other);
        }

        if (node1 != node2 && self.is_inclusive_ancestor(node1, node2) && attr1.is_none())
            || (node1 == node2 && attr2.is_some())
        {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }

        if (node1 != node2 && self.is_inclusive_ancestor(node2, node1) && attr2.is_none())
            || (node1 == node2 && attr1.is_some())
        {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }

        let root = self.root(node1);
        match self.tree_order(root).find(|&current| current == node1 || current == node2) {
            Some(first) if first == node1 => DocumentPosition::PRECEDING,
            _ => DocumentPosition::FOLLOWING,
        }
    }

    /// Disconnected nodes order consistently by arena slot
    fn disconnected_position(&self, node: NodeId, other: NodeId) -> u16 {
        let direction = if other < node {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        };
        DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC | direction
    }

    // =======================================================================
    // Namespace lookup
    // =======================================================================

    /// Element used as the starting point for namespace lookups
    fn namespace_lookup_element(&self, node: NodeId) -> Option<NodeId> {
        match &self.node(node).data {
            NodeData::Element(_) => Some(node),
            NodeData::Document(_) => self.document_element(node),
            NodeData::Doctype(_) | NodeData::DocumentFragment => None,
            NodeData::Attr(attr) => attr.owner_element,
            _ => self.parent_element(node),
        }
    }

    fn locate_namespace(&self, element: NodeId, prefix: Option<&str>) -> Option<String> {
        let data = self.node(element).as_element()?;

        if let Some(namespace) = &data.namespace {
            if data.prefix.as_deref() == prefix {
                return Some(namespace.clone());
            }
        }

        let declaration = self.attribute_list(element).iter().find_map(|&attr| {
            let attr = self.node(attr).as_attr()?;
            if attr.namespace.as_deref() != Some(XMLNS_NAMESPACE) {
                return None;
            }
            let declares = match prefix {
                Some(prefix) => attr.prefix.as_deref() == Some("xmlns") && attr.local_name == prefix,
                None => attr.prefix.is_none() && attr.local_name == "xmlns",
            };
            declares.then(|| attr.value.clone())
        });
        if let Some(value) = declaration {
            return (!value.is_empty()).then_some(value);
        }

        self.parent_element(element)
            .and_then(|parent| self.locate_namespace(parent, prefix))
    }

    fn locate_namespace_prefix(&self, element: NodeId, namespace: &str) -> Option<String> {
        let data = self.node(element).as_element()?;

        if data.namespace.as_deref() == Some(namespace) {
            if let Some(prefix) = &data.prefix {
                return Some(prefix.clone());
            }
        }

        let declared = self.attribute_list(element).iter().find_map(|&attr| {
            let attr = self.node(attr).as_attr()?;
            (attr.prefix.as_deref() == Some("xmlns") && attr.value == namespace).then(|| attr.local_name.clone())
        });
        if declared.is_some() {
            return declared;
        }

        self.parent_element(element)
            .and_then(|parent| self.locate_namespace_prefix(parent, namespace))
    }

    /// `Node.lookupNamespaceURI`
    pub fn lookup_namespace_uri(&self, node: NodeId, prefix: Option<&str>) -> Option<String> {
        let prefix = prefix.filter(|prefix| !prefix.is_empty());
        match prefix {
            Some("xml") => return Some(XML_NAMESPACE.to_string()),
            Some("xmlns") => return Some(XMLNS_NAMESPACE.to_string()),
            _ => {}
        }
        let element = self.namespace_lookup_element(node)?;
        self.locate_namespace(element, prefix)
    }

    /// `Node.lookupPrefix`
    pub fn lookup_prefix(&self, node: NodeId, namespace: Option<&str>) -> Option<String> {
        let namespace = namespace.filter(|namespace| !namespace.is_empty())?;
        let element = self.namespace_lookup_element(node)?;
        self.locate_namespace_prefix(element, namespace)
    }

    /// `Node.isDefaultNamespace`
    pub fn is_default_namespace(&self, node: NodeId, namespace: Option<&str>) -> bool {
        let namespace = namespace.filter(|namespace| !namespace.is_empty());
        self.lookup_namespace_uri(node, None).as_deref() == namespace
    }
}
