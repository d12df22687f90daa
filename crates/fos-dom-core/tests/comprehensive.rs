//! Comprehensive tests for fos-dom-core
//!
//! Tree invariants, batching of mutation records and live collections.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom_core::{
    ChildNode, CompoundSelector, Document, DocumentInit, DomConfig, DomException, DomTree, Element, MutationHooks,
    MutationType, NodeId, NodeList, ParentNode, Scope,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn html_page() -> (DomTree, NodeId, NodeId) {
    init_tracing();
    let mut tree = DomTree::new();
    let doc = tree.create_document(DocumentInit::html());
    let html = tree.create_element(doc, "html").unwrap();
    let body = tree.create_element(doc, "body").unwrap();
    tree.append_child(doc, html).unwrap();
    tree.append_child(html, body).unwrap();
    tree.take_records();
    (tree, doc, body)
}

#[test]
fn test_single_parent_invariant() {
    let (mut tree, doc, body) = html_page();
    let first = tree.create_element(doc, "div").unwrap();
    let second = tree.create_element(doc, "div").unwrap();
    let child = tree.create_element(doc, "span").unwrap();
    tree.append_child(body, first).unwrap();
    tree.append_child(body, second).unwrap();

    tree.append_child(first, child).unwrap();
    tree.append_child(second, child).unwrap();

    assert_eq!(tree.parent(child), Some(second));
    assert!(!tree.children(first).contains(&child));
    assert_eq!(tree.children(second), &[child]);

    for node in tree.tree_order(doc) {
        if let Some(parent) = tree.parent(node) {
            assert_eq!(tree.children(parent).iter().filter(|&&c| c == node).count(), 1);
        }
    }
}

#[test]
fn test_no_cycles() {
    let (mut tree, doc, body) = html_page();
    let outer = tree.create_element(doc, "div").unwrap();
    let inner = tree.create_element(doc, "div").unwrap();
    tree.append_child(body, outer).unwrap();
    tree.append_child(outer, inner).unwrap();
    tree.take_records();

    assert_eq!(tree.append_child(inner, outer), Err(DomException::HierarchyRequest));
    assert_eq!(tree.insert_before(inner, body, None), Err(DomException::HierarchyRequest));
    assert_eq!(tree.replace_child(inner, outer, inner), Err(DomException::HierarchyRequest));
    assert!(tree.take_records().is_empty());
    assert_eq!(tree.parent(outer), Some(body));
}

#[test]
fn test_order_preservation() {
    let (mut tree, doc, body) = html_page();
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    let c = tree.create_element(doc, "c").unwrap();
    tree.append_child(body, a).unwrap();
    tree.append_child(body, c).unwrap();
    tree.insert_before(body, b, Some(c)).unwrap();
    assert_eq!(tree.children(body), &[a, b, c]);
    assert_eq!(tree.index(b), 1);
}

#[test]
fn test_fragment_expansion_atomicity() {
    let (mut tree, doc, body) = html_page();
    let fragment = tree.create_document_fragment(doc);
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    let c = tree.create_element(doc, "c").unwrap();
    for node in [a, b, c] {
        tree.append_child(fragment, node).unwrap();
    }
    tree.take_records();

    tree.append_child(body, fragment).unwrap();

    assert_eq!(tree.children(body), &[a, b, c]);
    assert!(!tree.has_child_nodes(fragment));
    let records = tree.take_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, body);
    assert_eq!(records[0].added_nodes, vec![a, b, c]);
    assert!(records[0].removed_nodes.is_empty());
}

#[test]
fn test_replace_all_batching() {
    let (mut tree, doc, body) = html_page();
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    tree.append_child(body, a).unwrap();
    tree.append_child(body, b).unwrap();
    tree.take_records();

    let x = tree.create_element(doc, "x").unwrap();
    let y = tree.create_element(doc, "y").unwrap();
    let body_handle = Element::from_node(&tree, body).unwrap();
    body_handle.replace_children(&mut tree, vec![x.into(), y.into()]).unwrap();

    let records = tree.take_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mutation_type, MutationType::ChildList);
    assert_eq!(records[0].removed_nodes, vec![a, b]);
    assert_eq!(records[0].added_nodes, vec![x, y]);
}

#[test]
fn test_live_collection_freshness() {
    let (mut tree, doc, body) = html_page();
    let divs = tree.get_elements_by_tag_name(doc, "div");
    assert_eq!(divs.length(&tree), 0);

    let div = tree.create_element(doc, "div").unwrap();
    tree.append_child(body, div).unwrap();
    assert_eq!(divs.length(&tree), 1);

    tree.remove_child(body, div).unwrap();
    assert_eq!(divs.length(&tree), 0);
}

#[test]
fn test_static_snapshot_stability() {
    let (mut tree, doc, body) = html_page();
    let div = tree.create_element(doc, "div").unwrap();
    tree.append_child(body, div).unwrap();

    let snapshot = NodeList::new_static(&mut tree, body, Scope::Descendants, |tree, node| {
        tree.get(node).is_some_and(|n| n.is_element())
    });
    assert_eq!(snapshot.length(&tree), 1);

    let another = tree.create_element(doc, "div").unwrap();
    tree.append_child(body, another).unwrap();
    tree.remove_child(body, div).unwrap();
    assert_eq!(snapshot.length(&tree), 1);
}

#[test]
fn test_token_set_round_trip() {
    let (mut tree, doc, body) = html_page();
    let div = tree.create_element(doc, "div").unwrap();
    tree.append_child(body, div).unwrap();
    tree.set_attribute(div, "class", "a b  c").unwrap();

    let classes = tree.class_list(div);
    classes.add(&mut tree, &["d"]).unwrap();
    assert_eq!(tree.get_attribute(div, "class").as_deref(), Some("a b c d"));
    assert_eq!(classes.toggle(&mut tree, "a", None), Ok(false));
    assert_eq!(classes.toggle(&mut tree, "z", None), Ok(true));
    assert_eq!(tree.get_attribute(div, "class").as_deref(), Some("b c d z"));
}

#[test]
fn test_attribute_identity_preservation() {
    let (mut tree, doc, _) = html_page();
    let div = tree.create_element(doc, "div").unwrap();
    tree.set_attribute(div, "title", "first").unwrap();
    let attr = tree.get_attribute_node(div, "title").unwrap();
    tree.set_attribute(div, "title", "second").unwrap();
    assert_eq!(tree.get_attribute_node(div, "title"), Some(attr));
    assert_eq!(tree.attr_value(attr), Some("second"));
}

#[test]
fn test_clone_equivalence() {
    let (mut tree, doc, body) = html_page();
    let section = tree.create_element(doc, "section").unwrap();
    let text = tree.create_text_node(doc, "content");
    tree.set_attribute(section, "data-kind", "demo").unwrap();
    tree.append_child(section, text).unwrap();
    tree.append_child(body, section).unwrap();

    let copy = tree.clone_node(section, true);
    assert!(tree.is_equal_node(section, Some(copy)));
    let original: Vec<_> = tree.tree_order(section).collect();
    assert!(tree.tree_order(copy).all(|node| !original.contains(&node)));
}

#[test]
fn test_xmlns_prefix_namespace_error() {
    let (mut tree, doc, _) = html_page();
    let div = tree.create_element(doc, "div").unwrap();
    assert_eq!(
        tree.set_attribute_ns(div, Some("not-xmlns-uri"), "xmlns:foo", "v"),
        Err(DomException::Namespace)
    );
}

#[derive(Default)]
struct Log {
    events: Rc<RefCell<Vec<String>>>,
}

impl MutationHooks for Log {
    fn inserted(&mut self, node: NodeId, parent: NodeId) {
        self.events.borrow_mut().push(format!("inserted {:?} into {:?}", node, parent));
    }

    fn removed(&mut self, node: NodeId, old_parent: NodeId) {
        self.events.borrow_mut().push(format!("removed {:?} from {:?}", node, old_parent));
    }

    fn adopted(&mut self, node: NodeId, _old_document: NodeId) {
        self.events.borrow_mut().push(format!("adopted {:?}", node));
    }
}

#[test]
fn test_hooks_run_in_order() {
    let (mut tree, doc, body) = html_page();
    let log = Log::default();
    let events = log.events.clone();
    tree.register_hooks(Box::new(log));

    let other = tree.create_document(DocumentInit::xml());
    let node = tree.create_element(other, "item").unwrap();
    tree.append_child(body, node).unwrap();
    tree.remove_child(body, node).unwrap();

    let events = events.borrow();
    assert_eq!(
        *events,
        vec![
            format!("adopted {:?}", node),
            format!("inserted {:?} into {:?}", node, body),
            format!("removed {:?} from {:?}", node, body),
        ]
    );
    assert_eq!(tree.node_document(node), doc);
}

#[test]
fn test_record_queue_configuration() {
    init_tracing();
    let mut tree = DomTree::with_config(DomConfig {
        mutation_record_limit: 2,
        ..Default::default()
    });
    let doc = tree.create_document(DocumentInit::html());
    let body = tree.create_element(doc, "body").unwrap();
    tree.append_child(doc, body).unwrap();
    for name in ["a", "b", "c"] {
        tree.set_attribute(body, name, "1").unwrap();
    }
    let records = tree.take_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].attribute_name.as_deref(), Some("b"));

    let mut quiet = DomTree::with_config(DomConfig {
        queue_mutation_records: false,
        ..Default::default()
    });
    let doc = quiet.create_document(DocumentInit::html());
    let body = quiet.create_element(doc, "body").unwrap();
    quiet.append_child(doc, body).unwrap();
    assert!(quiet.take_records().is_empty());
}

#[test]
fn test_query_through_parent_node() {
    let (mut tree, doc, body) = html_page();
    let list = tree.create_element(doc, "ul").unwrap();
    tree.append_child(body, list).unwrap();
    let list_handle = Element::from_node(&tree, list).unwrap();
    for label in ["one", "two"] {
        let item = tree.create_element(doc, "li").unwrap();
        tree.set_text_content(item, Some(label)).unwrap();
        list_handle.append(&mut tree, vec![item.into()]).unwrap();
    }

    let items = CompoundSelector::parse("li").unwrap();
    let found = list_handle.query_selector_all(&tree, &items);
    assert_eq!(found.len(), 2);
    assert_eq!(tree.text_content(found[1]).as_deref(), Some("two"));

    let first = Element::from_node(&tree, found[0]).unwrap();
    first.remove(&mut tree);
    assert_eq!(list_handle.child_element_count(&tree), 1);
}

#[test]
fn test_rejected_node_list_calls_leave_tree_untouched() {
    let (mut tree, doc, body) = html_page();
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    tree.append_child(body, a).unwrap();
    tree.append_child(body, b).unwrap();
    tree.take_records();

    let html = tree.parent(body).unwrap();
    let doc_handle = Document::from_node(&tree, doc).unwrap();
    let html_handle = Element::from_node(&tree, html).unwrap();
    let body_handle = Element::from_node(&tree, body).unwrap();

    assert_eq!(doc_handle.append(&mut tree, vec![a.into(), b.into()]), Err(DomException::HierarchyRequest));
    assert_eq!(html_handle.after(&mut tree, vec![a.into(), "x".into()]), Err(DomException::HierarchyRequest));
    assert_eq!(html_handle.replace_with(&mut tree, vec![a.into(), b.into()]), Err(DomException::HierarchyRequest));
    assert_eq!(body_handle.prepend(&mut tree, vec![b.into(), html.into()]), Err(DomException::HierarchyRequest));

    assert_eq!(tree.children(doc), &[html]);
    assert_eq!(tree.children(body), &[a, b]);
    assert!(tree.take_records().is_empty());

    body_handle.append(&mut tree, vec![a.into(), "tail".into()]).unwrap();
    assert_eq!(tree.children(body).len(), 3);
    assert_eq!(tree.children(body)[0], b);
    assert_eq!(tree.children(body)[1], a);
}
