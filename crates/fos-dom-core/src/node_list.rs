//! NodeList
//!
//! A list is a (root, scope, filter) triple. Nothing is cached: every read
//! walks the tree again, so a live list always reflects the current state.

use std::fmt;
use std::rc::Rc;

use crate::{DomTree, NodeId};

/// Predicate deciding membership in a live view
pub type NodeFilter = Rc<dyn Fn(&DomTree, NodeId) -> bool>;

/// Which nodes under the root a view walks (the root itself never counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Children,
    Descendants,
}

/// Nodes of `root` selected by `scope` that pass `filter`, in tree order
pub(crate) fn collect_matches<'a>(
    tree: &'a DomTree,
    root: NodeId,
    scope: Scope,
    filter: &'a NodeFilter,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    match scope {
        Scope::Children => Box::new(
            tree.children(root)
                .iter()
                .copied()
                .filter(move |&node| filter(tree, node)),
        ),
        Scope::Descendants => Box::new(tree.descendants(root).filter(move |&node| filter(tree, node))),
    }
}

/// `NodeList`, live or static
#[derive(Clone)]
pub struct NodeList {
    root: NodeId,
    scope: Scope,
    filter: NodeFilter,
    is_static: bool,
}

impl NodeList {
    /// Live list over `root`
    pub fn new<F>(root: NodeId, scope: Scope, filter: F) -> Self
    where
        F: Fn(&DomTree, NodeId) -> bool + 'static,
    {
        Self {
            root,
            scope,
            filter: Rc::new(filter),
            is_static: false,
        }
    }

    /// Static list: `root` is deep-cloned once and the clone is filtered from
    /// then on, so later changes to the original never show up.
    pub fn new_static<F>(tree: &mut DomTree, root: NodeId, scope: Scope, filter: F) -> Self
    where
        F: Fn(&DomTree, NodeId) -> bool + 'static,
    {
        let snapshot = tree.clone_node(root, true);
        Self {
            root: snapshot,
            scope,
            filter: Rc::new(filter),
            is_static: true,
        }
    }

    /// Root the list walks (the snapshot root for static lists)
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_static(&self) -> bool {
        self.is_static
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
}

impl fmt::Debug for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeList")
            .field("root", &self.root)
            .field("scope", &self.scope)
            .field("is_static", &self.is_static)
            .finish()
    }
}

impl DomTree {
    /// `Node.childNodes` (live)
    pub fn child_nodes(&self, node: NodeId) -> NodeList {
        NodeList::new(node, Scope::Children, |_, _| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentInit;

    #[test]
    fn test_child_nodes_live() {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let div = tree.create_element(doc, "div").unwrap();
        let list = tree.child_nodes(div);
        assert_eq!(list.length(&tree), 0);

        let a = tree.create_text_node(doc, "a");
        let b = tree.create_element(doc, "b").unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        assert_eq!(list.length(&tree), 2);
        assert_eq!(list.item(&tree, 1), Some(b));
        assert_eq!(list.item(&tree, 2), None);

        tree.remove_child(div, a).unwrap();
        assert_eq!(list.to_vec(&tree), vec![b]);
    }

    #[test]
    fn test_descendant_filter() {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let div = tree.create_element(doc, "div").unwrap();
        let span = tree.create_element(doc, "span").unwrap();
        let text = tree.create_text_node(doc, "t");
        tree.append_child(div, span).unwrap();
        tree.append_child(span, text).unwrap();

        let texts = NodeList::new(div, Scope::Descendants, |tree, node| tree.get(node).is_some_and(|n| n.is_text()));
        assert_eq!(texts.to_vec(&tree), vec![text]);
    }

    #[test]
    fn test_static_snapshot() {
        let mut tree = DomTree::new();
        let doc = tree.create_document(DocumentInit::html());
        let div = tree.create_element(doc, "div").unwrap();
        let p = tree.create_element(doc, "p").unwrap();
        tree.append_child(div, p).unwrap();

        let snapshot = NodeList::new_static(&mut tree, div, Scope::Children, |_, _| true);
        assert!(snapshot.is_static());
        assert_ne!(snapshot.root(), div);
        assert_eq!(snapshot.length(&tree), 1);

        let extra = tree.create_element(doc, "p").unwrap();
        tree.append_child(div, extra).unwrap();
        tree.remove_child(div, p).unwrap();
        assert_eq!(snapshot.length(&tree), 1);
    }
}
