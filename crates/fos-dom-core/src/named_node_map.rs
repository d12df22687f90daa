//! NamedNodeMap
//!
//! Live view over an element's attribute list.

use crate::{DomException, DomResult, DomTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedNodeMap {
    element: NodeId,
}

impl NamedNodeMap {
    pub fn new(element: NodeId) -> Self {
        Self { element }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn length(&self, tree: &DomTree) -> usize {
        tree.attribute_list(self.element).len()
    }

    pub fn item(&self, tree: &DomTree, index: usize) -> Option<NodeId> {
        tree.attribute_list(self.element).get(index).copied()
    }

    pub fn iter<'a>(&self, tree: &'a DomTree) -> impl Iterator<Item = NodeId> + 'a {
        tree.attribute_list(self.element).iter().copied()
    }

    pub fn get_named_item(&self, tree: &DomTree, qualified_name: &str) -> Option<NodeId> {
        tree.get_attribute_node(self.element, qualified_name)
    }

    pub fn get_named_item_ns(&self, tree: &DomTree, namespace: Option<&str>, local_name: &str) -> Option<NodeId> {
        tree.get_attribute_node_ns(self.element, namespace, local_name)
    }

    pub fn set_named_item(&self, tree: &mut DomTree, attr: NodeId) -> DomResult<Option<NodeId>> {
        tree.set_attribute_node(self.element, attr)
    }

    pub fn set_named_item_ns(&self, tree: &mut DomTree, attr: NodeId) -> DomResult<Option<NodeId>> {
        tree.set_attribute_node_ns(self.element, attr)
    }

    pub fn remove_named_item(&self, tree: &mut DomTree, qualified_name: &str) -> DomResult<NodeId> {
        tree.remove_attribute_by_name(self.element, qualified_name)
            .ok_or(DomException::NotFound)
    }

    pub fn remove_named_item_ns(&self, tree: &mut DomTree, namespace: Option<&str>, local_name: &str) -> DomResult<NodeId> {
        tree.remove_attribute_by_namespace(self.element, namespace, local_name)
            .ok_or(DomException::NotFound)
    }

    /// Qualified names; HTML elements in HTML documents skip names with
    /// uppercase ASCII, which lookups could never reach
    pub fn names(&self, tree: &DomTree) -> Vec<String> {
        let names = tree.get_attribute_names(self.element);
        let is_html = tree.namespace_uri(self.element) == Some(crate::namespace::HTML_NAMESPACE)
            && tree.is_html_document(self.element);
        if is_html {
            names
                .into_iter()
                .filter(|name| !name.chars().any(|c| c.is_ascii_uppercase()))
                .collect()
        } else {
            names
        }
    }
}

impl DomTree {
    /// `Element.attributes`
    pub fn attributes(&self, element: NodeId) -> NamedNodeMap {
        NamedNodeMap::new(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::XLINK_NAMESPACE;
    use crate::DocumentInit;

    #[test]
    fn test_live_view() {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let a = tree.create_element(doc, "a").unwrap();
        let map = tree.attributes(a);
        assert_eq!(map.length(&tree), 0);

        tree.set_attribute(a, "href", "/").unwrap();
        tree.set_attribute_ns(a, Some(XLINK_NAMESPACE), "xlink:title", "t").unwrap();
        assert_eq!(map.length(&tree), 2);
        assert_eq!(map.item(&tree, 0), tree.get_attribute_node(a, "href"));
        assert_eq!(map.get_named_item_ns(&tree, Some(XLINK_NAMESPACE), "title"), map.item(&tree, 1));
        assert_eq!(map.names(&tree), vec!["href", "xlink:title"]);
        assert_eq!(map.iter(&tree).count(), 2);
    }

    #[test]
    fn test_set_and_remove() {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let a = tree.create_element(doc, "a").unwrap();
        let map = tree.attributes(a);

        let attr = tree.create_attribute(doc, "target").unwrap();
        assert_eq!(map.set_named_item(&mut tree, attr), Ok(None));
        assert_eq!(map.get_named_item(&tree, "target"), Some(attr));
        assert_eq!(map.remove_named_item(&mut tree, "target"), Ok(attr));
        assert_eq!(map.remove_named_item(&mut tree, "target"), Err(DomException::NotFound));
        assert_eq!(
            map.remove_named_item_ns(&mut tree, None, "target"),
            Err(DomException::NotFound)
        );
        assert_eq!(map.length(&tree), 0);
    }
}
