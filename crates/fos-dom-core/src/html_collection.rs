//! HTMLCollection
//!
//! Live element collections. Like `NodeList`, nothing is cached.

use std::fmt;
use std::rc::Rc;

use crate::collections::OrderedSet;
use crate::namespace::{self, HTML_NAMESPACE};
use crate::node_list::{collect_matches, NodeFilter, Scope};
use crate::{DomTree, NodeId};

/// Live collection of elements under a root
#[derive(Clone)]
pub struct HtmlCollection {
    root: NodeId,
    scope: Scope,
    filter: NodeFilter,
}

impl HtmlCollection {
    /// Elements under `root` passing `filter`; non-elements never match
    pub fn new<F>(root: NodeId, scope: Scope, filter: F) -> Self
    where
        F: Fn(&DomTree, NodeId) -> bool + 'static,
    {
        Self {
            root,
            scope,
            filter: Rc::new(move |tree: &DomTree, node: NodeId| {
                tree.get(node).is_some_and(|n| n.is_element()) && filter(tree, node)
            }),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn length(&self, tree: &DomTree) -> usize {
        self.iter(tree).count()
    }

    pub fn item(&self, tree: &DomTree, index: usize) -> Option<NodeId> {
        self.iter(tree).nth(index)
    }

    pub fn iter<'a>(&'a self, tree: &'a DomTree) -> impl Iterator<Item = NodeId> + 'a {
        collect_matches(tree, self.root, self.scope, &self.filter)
    }

    pub fn to_vec(&self, tree: &DomTree) -> Vec<NodeId> {
        self.iter(tree).collect()
    }

    /// First element whose `id` is `key`, or an HTML element whose `name`
    /// attribute is `key`
    pub fn named_item(&self, tree: &DomTree, key: &str) -> Option<NodeId> {
        if key.is_empty() {
            return None;
        }
        self.iter(tree).find(|&element| {
            tree.get_attribute_ns(element, None, "id").as_deref() == Some(key)
                || (is_html_element(tree, element) && tree.get_attribute_ns(element, None, "name").as_deref() == Some(key))
        })
    }

    /// Supported property names: ids, then names of HTML elements, in tree
    /// order without duplicates
    pub fn names(&self, tree: &DomTree) -> Vec<String> {
        let mut names = OrderedSet::new();
        for element in self.iter(tree) {
            if let Some(id) = tree.get_attribute_ns(element, None, "id").filter(|id| !id.is_empty()) {
                names.append(id);
            }
            if is_html_element(tree, element) {
                if let Some(name) = tree.get_attribute_ns(element, None, "name").filter(|name| !name.is_empty()) {
                    names.append(name);
                }
            }
        }
        names.to_vec()
    }
}

fn is_html_element(tree: &DomTree, element: NodeId) -> bool {
    tree.namespace_uri(element) == Some(HTML_NAMESPACE)
}

impl fmt::Debug for HtmlCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlCollection")
            .field("root", &self.root)
            .field("scope", &self.scope)
            .finish()
    }
}

impl DomTree {
    /// `ParentNode.children`
    pub fn element_children(&self, node: NodeId) -> HtmlCollection {
        HtmlCollection::new(node, Scope::Children, |_, _| true)
    }

    /// `getElementsByTagName`: `*` matches every element; HTML elements in
    /// HTML documents compare against the lowercased name
    pub fn get_elements_by_tag_name(&self, root: NodeId, qualified_name: &str) -> HtmlCollection {
        if qualified_name == "*" {
            return HtmlCollection::new(root, Scope::Descendants, |_, _| true);
        }

        let qualified_name = qualified_name.to_string();
        let lowercase = qualified_name.to_ascii_lowercase();
        HtmlCollection::new(root, Scope::Descendants, move |tree, element| {
            let Some(data) = tree.get(element).and_then(|node| node.as_element()) else {
                return false;
            };
            let name = data.qualified_name();
            if data.is_in_namespace(HTML_NAMESPACE) && tree.is_html_document(element) {
                name == lowercase
            } else {
                name == qualified_name
            }
        })
    }

    /// `getElementsByTagNameNS`: `*` is a wildcard for either part
    pub fn get_elements_by_tag_name_ns(&self, root: NodeId, namespace: Option<&str>, local_name: &str) -> HtmlCollection {
        let any_namespace = namespace == Some("*");
        let namespace = namespace::normalize_namespace(namespace);
        let local_name = local_name.to_string();

        HtmlCollection::new(root, Scope::Descendants, move |tree, element| {
            let Some(data) = tree.get(element).and_then(|node| node.as_element()) else {
                return false;
            };
            (any_namespace || data.namespace == namespace) && (local_name == "*" || data.local_name == local_name)
        })
    }

    /// `getElementsByClassName`: elements carrying every given class; an
    /// empty class list matches nothing
    pub fn get_elements_by_class_name(&self, root: NodeId, class_names: &str) -> HtmlCollection {
        let wanted: OrderedSet<String> = namespace::split_ascii_whitespace(class_names)
            .map(str::to_string)
            .collect();

        HtmlCollection::new(root, Scope::Descendants, move |tree, element| {
            if wanted.is_empty() {
                return false;
            }
            let Some(classes) = tree.get_attribute_ns(element, None, "class") else {
                return false;
            };
            let present: Vec<&str> = namespace::split_ascii_whitespace(&classes).collect();
            wanted.iter().all(|class| present.contains(&class.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::SVG_NAMESPACE;
    use crate::DocumentInit;

    fn page() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let body = tree.create_element(doc, "body").unwrap();
        tree.append_child(doc, body).unwrap();
        (tree, doc, body)
    }

    #[test]
    fn test_children_collection_is_live() {
        let (mut tree, doc, body) = page();
        let children = tree.element_children(body);
        let text = tree.create_text_node(doc, "t");
        tree.append_child(body, text).unwrap();
        assert_eq!(children.length(&tree), 0);

        let p = tree.create_element(doc, "p").unwrap();
        tree.append_child(body, p).unwrap();
        assert_eq!(children.length(&tree), 1);
        assert_eq!(children.item(&tree, 0), Some(p));
    }

    #[test]
    fn test_by_tag_name() {
        let (mut tree, doc, body) = page();
        let p = tree.create_element(doc, "p").unwrap();
        let svg = tree.create_element_ns(doc, Some(SVG_NAMESPACE), "foreignObject").unwrap();
        tree.append_child(body, p).unwrap();
        tree.append_child(body, svg).unwrap();

        assert_eq!(tree.get_elements_by_tag_name(doc, "P").to_vec(&tree), vec![p]);
        assert_eq!(tree.get_elements_by_tag_name(doc, "foreignObject").to_vec(&tree), vec![svg]);
        assert_eq!(tree.get_elements_by_tag_name(doc, "foreignobject").length(&tree), 0);
        assert_eq!(tree.get_elements_by_tag_name(doc, "*").length(&tree), 3);
        assert_eq!(
            tree.get_elements_by_tag_name_ns(doc, Some(SVG_NAMESPACE), "*").to_vec(&tree),
            vec![svg]
        );
        assert_eq!(tree.get_elements_by_tag_name_ns(doc, Some("*"), "p").to_vec(&tree), vec![p]);
    }

    #[test]
    fn test_by_class_name_live() {
        let (mut tree, doc, body) = page();
        let a = tree.create_element(doc, "div").unwrap();
        let b = tree.create_element(doc, "div").unwrap();
        tree.append_child(body, a).unwrap();
        tree.append_child(body, b).unwrap();
        tree.set_attribute(a, "class", "x y").unwrap();
        tree.set_attribute(b, "class", "y").unwrap();

        let both = tree.get_elements_by_class_name(doc, " y  x ");
        assert_eq!(both.to_vec(&tree), vec![a]);
        tree.set_attribute(b, "class", "x y z").unwrap();
        assert_eq!(both.to_vec(&tree), vec![a, b]);
        assert_eq!(tree.get_elements_by_class_name(doc, "   ").length(&tree), 0);
    }

    #[test]
    fn test_named_item_and_names() {
        let (mut tree, doc, body) = page();
        let form = tree.create_element(doc, "form").unwrap();
        let input = tree.create_element(doc, "input").unwrap();
        tree.append_child(body, form).unwrap();
        tree.append_child(body, input).unwrap();
        tree.set_attribute(form, "id", "f").unwrap();
        tree.set_attribute(input, "name", "q").unwrap();
        tree.set_attribute(input, "id", "f").unwrap();

        let all = tree.get_elements_by_tag_name(doc, "*");
        assert_eq!(all.named_item(&tree, "f"), Some(form));
        assert_eq!(all.named_item(&tree, "q"), Some(input));
        assert_eq!(all.named_item(&tree, ""), None);
        assert_eq!(all.names(&tree), vec!["f", "q"]);
    }
}
