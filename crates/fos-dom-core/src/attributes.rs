//! Attributes
//!
//! Attr nodes live in the arena like every other node; an element keeps an
//! ordered list of them. All value changes go through
//! `handle_attribute_changes`, which queues the record and runs the hooks.

use crate::mutation_record::{AttributeChange, MutationRecord};
use crate::namespace::{self, HTML_NAMESPACE};
use crate::node::{AttrData, NodeData};
use crate::{DomException, DomResult, DomTree, NodeId};

impl DomTree {
    // =======================================================================
    // Lookup
    // =======================================================================

    fn attr(&self, attr: NodeId) -> Option<&AttrData> {
        self.node(attr).as_attr()
    }

    fn ensure_element(&self, node: NodeId) -> DomResult<()> {
        if self.node(node).is_element() {
            Ok(())
        } else {
            Err(DomException::InvalidNodeType)
        }
    }

    /// Attr nodes of `element` in order; empty for non-elements
    pub(crate) fn attribute_list(&self, element: NodeId) -> &[NodeId] {
        self.node(element)
            .as_element()
            .map(|data| data.attributes.as_slice())
            .unwrap_or_default()
    }

    /// HTML elements in HTML documents match attribute names lowercased
    fn attribute_lookup_name(&self, element: NodeId, qualified_name: &str) -> String {
        let is_html_element = self
            .node(element)
            .as_element()
            .is_some_and(|data| data.is_in_namespace(HTML_NAMESPACE));
        if is_html_element && self.is_html_document(element) {
            qualified_name.to_ascii_lowercase()
        } else {
            qualified_name.to_string()
        }
    }

    /// First attribute whose qualified name matches
    pub(crate) fn attribute_by_name(&self, element: NodeId, qualified_name: &str) -> Option<NodeId> {
        let name = self.attribute_lookup_name(element, qualified_name);
        self.attribute_list(element)
            .iter()
            .copied()
            .find(|&attr| self.attr(attr).is_some_and(|data| data.qualified_name() == name))
    }

    /// Attribute with the given namespace and local name; an empty namespace
    /// means none
    pub(crate) fn attribute_by_namespace(&self, element: NodeId, namespace: Option<&str>, local_name: &str) -> Option<NodeId> {
        let namespace = namespace::normalize_namespace(namespace);
        self.attribute_list(element).iter().copied().find(|&attr| {
            self.attr(attr)
                .is_some_and(|data| data.namespace == namespace && data.local_name == local_name)
        })
    }

    // =======================================================================
    // Change steps
    // =======================================================================

    /// Queue an "attributes" record for the owner element (if any) and run
    /// the attribute hooks once.
    pub(crate) fn handle_attribute_changes(
        &mut self,
        attr: NodeId,
        element: Option<NodeId>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        let Some(data) = self.attr(attr) else {
            return;
        };
        let change = AttributeChange {
            attribute: attr,
            element,
            local_name: data.local_name.clone(),
            namespace: data.namespace.clone(),
            old_value,
            new_value,
        };

        tracing::trace!("Attribute {:?} changed on {:?}", change.local_name, element);

        if let Some(element) = element {
            self.queue_record(MutationRecord::attributes(
                element,
                &change.local_name,
                change.namespace.as_deref(),
                change.old_value.clone(),
            ));
        }
        self.run_hooks(|hooks| hooks.attribute_changed(&change));
    }

    /// Change an attribute's value in place, keeping its identity
    pub(crate) fn change_attribute(&mut self, attr: NodeId, value: &str) {
        let Some(data) = self.node_mut(attr).as_attr_mut() else {
            return;
        };
        let old_value = std::mem::replace(&mut data.value, value.to_string());
        let element = data.owner_element;
        self.handle_attribute_changes(attr, element, Some(old_value), Some(value.to_string()));
    }

    /// Append a free attribute to `element`
    pub(crate) fn append_attribute(&mut self, attr: NodeId, element: NodeId) {
        let document = self.node_document(element);
        if let Some(data) = self.node_mut(element).as_element_mut() {
            data.attributes.append(attr);
        }
        let attr_node = self.node_mut(attr);
        attr_node.document = document;
        let value = match attr_node.as_attr_mut() {
            Some(data) => {
                data.owner_element = Some(element);
                data.value.clone()
            }
            None => return,
        };
        self.handle_attribute_changes(attr, Some(element), None, Some(value));
    }

    /// Detach an attribute from its owner element
    pub(crate) fn remove_attribute_from_owner(&mut self, attr: NodeId) {
        let Some(data) = self.node_mut(attr).as_attr_mut() else {
            return;
        };
        let Some(element) = data.owner_element.take() else {
            return;
        };
        let value = data.value.clone();
        if let Some(element_data) = self.node_mut(element).as_element_mut() {
            element_data.attributes.remove_where(|&candidate| candidate == attr);
        }
        self.handle_attribute_changes(attr, Some(element), Some(value), None);
    }

    /// Put `new_attr` in `old_attr`'s slot
    pub(crate) fn replace_attribute(&mut self, old_attr: NodeId, new_attr: NodeId) {
        let Some(element) = self.attr(old_attr).and_then(|data| data.owner_element) else {
            return;
        };
        let document = self.node_document(element);

        if let Some(element_data) = self.node_mut(element).as_element_mut() {
            element_data
                .attributes
                .replace_where(|&candidate| candidate == old_attr, new_attr);
        }

        let new_node = self.node_mut(new_attr);
        new_node.document = document;
        let new_value = match new_node.as_attr_mut() {
            Some(data) => {
                data.owner_element = Some(element);
                data.value.clone()
            }
            None => return,
        };
        let old_value = match self.node_mut(old_attr).as_attr_mut() {
            Some(data) => {
                data.owner_element = None;
                data.value.clone()
            }
            None => return,
        };

        self.handle_attribute_changes(old_attr, Some(element), Some(old_value), Some(new_value));
    }

    fn new_attribute(&mut self, element: NodeId, namespace: Option<String>, prefix: Option<String>, local_name: String, value: &str) -> NodeId {
        let document = self.node_document(element);
        self.alloc(Some(document), NodeData::Attr(AttrData::new(namespace, prefix, local_name, value)))
    }

    // =======================================================================
    // Element attribute API
    // =======================================================================

    /// `Element.getAttribute`
    pub fn get_attribute(&self, element: NodeId, qualified_name: &str) -> Option<String> {
        self.attribute_by_name(element, qualified_name)
            .and_then(|attr| self.attr(attr))
            .map(|data| data.value.clone())
    }

    /// `Element.getAttributeNS`
    pub fn get_attribute_ns(&self, element: NodeId, namespace: Option<&str>, local_name: &str) -> Option<String> {
        self.attribute_by_namespace(element, namespace, local_name)
            .and_then(|attr| self.attr(attr))
            .map(|data| data.value.clone())
    }

    pub fn get_attribute_node(&self, element: NodeId, qualified_name: &str) -> Option<NodeId> {
        self.attribute_by_name(element, qualified_name)
    }

    pub fn get_attribute_node_ns(&self, element: NodeId, namespace: Option<&str>, local_name: &str) -> Option<NodeId> {
        self.attribute_by_namespace(element, namespace, local_name)
    }

    pub fn has_attribute(&self, element: NodeId, qualified_name: &str) -> bool {
        self.attribute_by_name(element, qualified_name).is_some()
    }

    pub fn has_attribute_ns(&self, element: NodeId, namespace: Option<&str>, local_name: &str) -> bool {
        self.attribute_by_namespace(element, namespace, local_name).is_some()
    }

    pub fn has_attributes(&self, element: NodeId) -> bool {
        !self.attribute_list(element).is_empty()
    }

    /// Qualified names in attribute-list order
    pub fn get_attribute_names(&self, element: NodeId) -> Vec<String> {
        self.attribute_list(element)
            .iter()
            .filter_map(|&attr| self.attr(attr))
            .map(AttrData::qualified_name)
            .collect()
    }

    /// `Element.setAttribute`: change in place when present, append otherwise
    pub fn set_attribute(&mut self, element: NodeId, qualified_name: &str, value: &str) -> DomResult<()> {
        self.ensure_element(element)?;
        namespace::validate_name(qualified_name)?;

        let name = self.attribute_lookup_name(element, qualified_name);
        match self.attribute_by_name(element, &name) {
            Some(attr) => self.change_attribute(attr, value),
            None => {
                let attr = self.new_attribute(element, None, None, name, value);
                self.append_attribute(attr, element);
            }
        }
        Ok(())
    }

    /// `Element.setAttributeNS`
    pub fn set_attribute_ns(&mut self, element: NodeId, namespace: Option<&str>, qualified_name: &str, value: &str) -> DomResult<()> {
        self.ensure_element(element)?;
        let extracted = namespace::validate_and_extract(namespace, qualified_name)?;

        match self.attribute_by_namespace(element, extracted.namespace.as_deref(), &extracted.local_name) {
            Some(attr) => self.change_attribute(attr, value),
            None => {
                let attr = self.new_attribute(element, extracted.namespace, extracted.prefix, extracted.local_name, value);
                self.append_attribute(attr, element);
            }
        }
        Ok(())
    }

    /// `Element.setAttributeNode`: returns the attribute it displaced
    pub fn set_attribute_node(&mut self, element: NodeId, attr: NodeId) -> DomResult<Option<NodeId>> {
        self.ensure_element(element)?;
        let Some(data) = self.attr(attr) else {
            return Err(DomException::InvalidNodeType);
        };

        if data.owner_element.is_some_and(|owner| owner != element) {
            tracing::debug!("Rejected attribute {:?}: owned by another element", attr);
            return Err(DomException::InUseAttribute);
        }

        let old_attr = self.attribute_by_namespace(element, data.namespace.as_deref(), &data.local_name);
        match old_attr {
            Some(old_attr) if old_attr == attr => return Ok(Some(attr)),
            Some(old_attr) => self.replace_attribute(old_attr, attr),
            None => self.append_attribute(attr, element),
        }
        Ok(old_attr)
    }

    /// `Element.setAttributeNodeNS`
    pub fn set_attribute_node_ns(&mut self, element: NodeId, attr: NodeId) -> DomResult<Option<NodeId>> {
        self.set_attribute_node(element, attr)
    }

    /// Remove by qualified name; returns the removed attribute
    pub(crate) fn remove_attribute_by_name(&mut self, element: NodeId, qualified_name: &str) -> Option<NodeId> {
        let attr = self.attribute_by_name(element, qualified_name)?;
        self.remove_attribute_from_owner(attr);
        Some(attr)
    }

    pub(crate) fn remove_attribute_by_namespace(&mut self, element: NodeId, namespace: Option<&str>, local_name: &str) -> Option<NodeId> {
        let attr = self.attribute_by_namespace(element, namespace, local_name)?;
        self.remove_attribute_from_owner(attr);
        Some(attr)
    }

    /// `Element.removeAttribute`
    pub fn remove_attribute(&mut self, element: NodeId, qualified_name: &str) -> DomResult<()> {
        self.ensure_element(element)?;
        self.remove_attribute_by_name(element, qualified_name);
        Ok(())
    }

    /// `Element.removeAttributeNS`
    pub fn remove_attribute_ns(&mut self, element: NodeId, namespace: Option<&str>, local_name: &str) -> DomResult<()> {
        self.ensure_element(element)?;
        self.remove_attribute_by_namespace(element, namespace, local_name);
        Ok(())
    }

    /// `Element.removeAttributeNode`
    pub fn remove_attribute_node(&mut self, element: NodeId, attr: NodeId) -> DomResult<NodeId> {
        self.ensure_element(element)?;
        if !self.attribute_list(element).contains(&attr) {
            return Err(DomException::NotFound);
        }
        self.remove_attribute_from_owner(attr);
        Ok(attr)
    }

    /// `Element.toggleAttribute`; returns whether the attribute is present
    /// afterwards
    pub fn toggle_attribute(&mut self, element: NodeId, qualified_name: &str, force: Option<bool>) -> DomResult<bool> {
        self.ensure_element(element)?;
        namespace::validate_name(qualified_name)?;

        let name = self.attribute_lookup_name(element, qualified_name);
        match self.attribute_by_name(element, &name) {
            None if force != Some(false) => {
                let attr = self.new_attribute(element, None, None, name, "");
                self.append_attribute(attr, element);
                Ok(true)
            }
            None => Ok(false),
            Some(attr) if force != Some(true) => {
                self.remove_attribute_from_owner(attr);
                Ok(false)
            }
            Some(_) => Ok(true),
        }
    }

    /// `Element.id` (empty when absent)
    pub fn id(&self, element: NodeId) -> String {
        self.get_attribute_ns(element, None, "id").unwrap_or_default()
    }

    pub fn set_id(&mut self, element: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute_ns(element, None, "id", value)
    }

    /// `Element.className` (empty when absent)
    pub fn class_name(&self, element: NodeId) -> String {
        self.get_attribute_ns(element, None, "class").unwrap_or_default()
    }

    pub fn set_class_name(&mut self, element: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute_ns(element, None, "class", value)
    }

    // =======================================================================
    // Attr API
    // =======================================================================

    /// `Attr.value`
    pub fn attr_value(&self, attr: NodeId) -> Option<&str> {
        self.attr(attr).map(|data| data.value.as_str())
    }

    /// `Attr.value` setter; runs the change steps
    pub fn set_attr_value(&mut self, attr: NodeId, value: &str) -> DomResult<()> {
        if self.attr(attr).is_none() {
            return Err(DomException::InvalidNodeType);
        }
        self.change_attribute(attr, value);
        Ok(())
    }

    /// `Attr.ownerElement`
    pub fn owner_element(&self, attr: NodeId) -> Option<NodeId> {
        self.attr(attr).and_then(AttrData::owner_element)
    }

    /// `Attr.name`
    pub fn attr_name(&self, attr: NodeId) -> Option<String> {
        self.attr(attr).map(AttrData::qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::namespace::{XLINK_NAMESPACE, XMLNS_NAMESPACE};
    use crate::{AttributeChange, DocumentInit, DomException, DomTree, MutationHooks, MutationType, NodeId};

    fn element() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let div = tree.create_element(doc, "div").unwrap();
        (tree, doc, div)
    }

    #[derive(Default)]
    struct Recorder {
        changes: Rc<RefCell<Vec<AttributeChange>>>,
    }

    impl MutationHooks for Recorder {
        fn attribute_changed(&mut self, change: &AttributeChange) {
            self.changes.borrow_mut().push(change.clone());
        }
    }

    #[test]
    fn test_set_and_get() {
        let (mut tree, _, div) = element();
        tree.set_attribute(div, "Title", "hello").unwrap();
        assert_eq!(tree.get_attribute(div, "title").as_deref(), Some("hello"));
        assert_eq!(tree.get_attribute(div, "TITLE").as_deref(), Some("hello"));
        assert_eq!(tree.get_attribute_names(div), vec!["title"]);
        assert!(tree.has_attributes(div));
        assert_eq!(tree.get_attribute(div, "missing"), None);
    }

    #[test]
    fn test_identity_preserved_on_change() {
        let (mut tree, _, div) = element();
        tree.set_attribute(div, "class", "a").unwrap();
        let attr = tree.get_attribute_node(div, "class").unwrap();
        tree.set_attribute(div, "class", "b").unwrap();
        assert_eq!(tree.get_attribute_node(div, "class"), Some(attr));
        assert_eq!(tree.attr_value(attr), Some("b"));
        assert_eq!(tree.owner_element(attr), Some(div));
    }

    #[test]
    fn test_invalid_names() {
        let (mut tree, _, div) = element();
        assert_eq!(tree.set_attribute(div, "1x", "v"), Err(DomException::InvalidCharacter));
        assert_eq!(tree.set_attribute(div, "a b", "v"), Err(DomException::InvalidCharacter));
        assert_eq!(
            tree.set_attribute_ns(div, Some("not-xmlns-uri"), "xmlns:foo", "v"),
            Err(DomException::Namespace)
        );
        assert!(!tree.has_attributes(div));
    }

    #[test]
    fn test_namespaced_attributes() {
        let (mut tree, _, div) = element();
        tree.set_attribute_ns(div, Some(XLINK_NAMESPACE), "xlink:href", "#a").unwrap();
        tree.set_attribute_ns(div, Some(XMLNS_NAMESPACE), "xmlns:x", "urn:x").unwrap();
        assert_eq!(tree.get_attribute_ns(div, Some(XLINK_NAMESPACE), "href").as_deref(), Some("#a"));
        assert_eq!(tree.get_attribute(div, "xlink:href").as_deref(), Some("#a"));
        assert!(tree.has_attribute_ns(div, Some(XMLNS_NAMESPACE), "x"));

        tree.set_attribute_ns(div, Some(XLINK_NAMESPACE), "other:href", "#b").unwrap();
        assert_eq!(tree.get_attribute_names(div), vec!["xlink:href", "xmlns:x"]);
        assert_eq!(tree.get_attribute_ns(div, Some(XLINK_NAMESPACE), "href").as_deref(), Some("#b"));

        tree.remove_attribute_ns(div, Some(XLINK_NAMESPACE), "href").unwrap();
        assert!(!tree.has_attribute_ns(div, Some(XLINK_NAMESPACE), "href"));
    }

    #[test]
    fn test_set_attribute_node() {
        let (mut tree, doc, div) = element();
        let other = tree.create_element(doc, "span").unwrap();
        let first = tree.create_attribute(doc, "lang").unwrap();
        tree.set_attr_value(first, "en").unwrap();

        assert_eq!(tree.set_attribute_node(div, first), Ok(None));
        assert_eq!(tree.set_attribute_node(div, first), Ok(Some(first)));
        assert_eq!(tree.set_attribute_node(other, first), Err(DomException::InUseAttribute));

        let second = tree.create_attribute(doc, "lang").unwrap();
        tree.set_attr_value(second, "fr").unwrap();
        assert_eq!(tree.set_attribute_node(div, second), Ok(Some(first)));
        assert_eq!(tree.owner_element(first), None);
        assert_eq!(tree.owner_element(second), Some(div));
        assert_eq!(tree.get_attribute(div, "lang").as_deref(), Some("fr"));
    }

    #[test]
    fn test_remove_attribute_node() {
        let (mut tree, doc, div) = element();
        tree.set_attribute(div, "a", "1").unwrap();
        let attr = tree.get_attribute_node(div, "a").unwrap();
        let stray = tree.create_attribute(doc, "a").unwrap();
        assert_eq!(tree.remove_attribute_node(div, stray), Err(DomException::NotFound));
        assert_eq!(tree.remove_attribute_node(div, attr), Ok(attr));
        assert_eq!(tree.owner_element(attr), None);
        assert!(!tree.has_attribute(div, "a"));
    }

    #[test]
    fn test_toggle_attribute() {
        let (mut tree, _, div) = element();
        assert_eq!(tree.toggle_attribute(div, "hidden", None), Ok(true));
        assert_eq!(tree.get_attribute(div, "hidden").as_deref(), Some(""));
        assert_eq!(tree.toggle_attribute(div, "hidden", Some(true)), Ok(true));
        assert_eq!(tree.toggle_attribute(div, "hidden", None), Ok(false));
        assert_eq!(tree.toggle_attribute(div, "hidden", Some(false)), Ok(false));
        assert!(!tree.has_attribute(div, "hidden"));
    }

    #[test]
    fn test_id_and_class_name() {
        let (mut tree, _, div) = element();
        assert_eq!(tree.id(div), "");
        tree.set_id(div, "main").unwrap();
        tree.set_class_name(div, "a b").unwrap();
        assert_eq!(tree.id(div), "main");
        assert_eq!(tree.class_name(div), "a b");
        assert_eq!(tree.get_attribute(div, "class").as_deref(), Some("a b"));
    }

    #[test]
    fn test_non_element_rejected() {
        let (mut tree, doc, _) = element();
        let text = tree.create_text_node(doc, "x");
        assert_eq!(tree.set_attribute(text, "a", "b"), Err(DomException::InvalidNodeType));
        assert_eq!(tree.get_attribute(text, "a"), None);
        assert_eq!(tree.set_attr_value(text, "v"), Err(DomException::InvalidNodeType));
    }

    #[test]
    fn test_records_and_hooks() {
        let (mut tree, _, div) = element();
        let recorder = Recorder::default();
        let changes = recorder.changes.clone();
        tree.register_hooks(Box::new(recorder));

        tree.set_attribute(div, "title", "one").unwrap();
        tree.set_attribute(div, "title", "two").unwrap();
        tree.remove_attribute(div, "title").unwrap();

        let records = tree.take_records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.mutation_type == MutationType::Attributes && r.target == div));
        assert_eq!(records[0].old_value, None);
        assert_eq!(records[1].old_value.as_deref(), Some("one"));
        assert_eq!(records[2].old_value.as_deref(), Some("two"));

        let changes = changes.borrow();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[1].new_value.as_deref(), Some("two"));
        assert_eq!(changes[2].new_value, None);
        assert_eq!(changes[2].element, Some(div));
    }

    #[test]
    fn test_ownerless_attr_change_queues_no_record() {
        let (mut tree, doc, _) = element();
        let attr = tree.create_attribute(doc, "x").unwrap();
        tree.set_attr_value(attr, "1").unwrap();
        assert!(tree.take_records().is_empty());
        assert_eq!(tree.attr_name(attr).as_deref(), Some("x"));
    }
}
