//! fOS DOM Core - Document Object Model tree engine
//!
//! Arena-backed node tree with the standard mutation algorithms, the
//! attribute subsystem and live collections.
//!
//! # Example
//! ```rust
//! use fos_dom_core::{DomTree, DocumentInit};
//!
//! let mut tree = DomTree::new();
//! let doc = tree.create_document(DocumentInit::html());
//! let html = tree.create_element(doc, "html").unwrap();
//! tree.append_child(doc, html).unwrap();
//! tree.set_attribute(html, "lang", "en").unwrap();
//! assert_eq!(tree.get_attribute(html, "lang").as_deref(), Some("en"));
//! ```

mod attributes;
mod character_data;
mod clone;
pub mod collections;
mod config;
mod document;
mod error;
mod html_collection;
mod mixins;
mod mutation;
mod mutation_record;
mod named_node_map;
pub mod namespace;
mod node;
mod node_list;
mod node_ops;
mod query;
mod token_list;
mod tree;

pub use config::DomConfig;
pub use document::{DocumentInit, DomImplementation};
pub use error::{DomException, DomResult};
pub use html_collection::HtmlCollection;
pub use mixins::{
    CharacterData, ChildNode, Document, DocumentFragment, DocumentType, Element,
    NodeOrString, NonDocumentTypeChildNode, NonElementParentNode, ParentNode,
};
pub use mutation_record::{AttributeChange, MutationHooks, MutationRecord, MutationType};
pub use named_node_map::NamedNodeMap;
pub use node::{AttrData, DoctypeData, DocumentData, DocumentKind, ElementData, Node, NodeData, NodeType};
pub use node_list::{NodeFilter, NodeList, Scope};
pub use node_ops::DocumentPosition;
pub use query::{CompoundSelector, SelectorMatcher, SimpleSelector};
pub use token_list::DomTokenList;
pub use tree::{DomTree, TreeOrder};

/// Node identifier (index into the tree's arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
