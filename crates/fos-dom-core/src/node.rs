//! DOM Node
//!
//! One arena slot per node. Tree links are plain `NodeId` indices: the
//! children set is owned by the node, the parent field is a back-reference
//! that never implies ownership.

use url::{Origin, Url};

use crate::NodeId;
use crate::collections::{List, OrderedSet};
use crate::namespace::qualified_name;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Node document (a document points at itself)
    pub(crate) document: NodeId,
    /// Parent node, if any
    pub(crate) parent: Option<NodeId>,
    /// Children in tree order
    pub(crate) children: OrderedSet<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(document: NodeId, data: NodeData) -> Self {
        Self {
            document,
            parent: None,
            children: OrderedSet::new(),
            data,
        }
    }

    /// Node kind
    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    /// Node document
    #[inline]
    pub fn document(&self) -> NodeId {
        self.document
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &OrderedSet<NodeId> {
        &self.children
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document(_))
    }

    #[inline]
    pub fn is_document_fragment(&self) -> bool {
        matches!(self.data, NodeData::DocumentFragment)
    }

    #[inline]
    pub fn is_doctype(&self) -> bool {
        matches!(self.data, NodeData::Doctype(_))
    }

    #[inline]
    pub fn is_attr(&self) -> bool {
        matches!(self.data, NodeData::Attr(_))
    }

    /// Text, CDATA section, comment or processing instruction
    #[inline]
    pub fn is_character_data(&self) -> bool {
        self.data.character_data().is_some()
    }

    /// Text or CDATA section
    #[inline]
    pub fn is_text_like(&self) -> bool {
        matches!(self.data, NodeData::Text(_) | NodeData::CdataSection(_))
    }

    /// Document, fragment or element
    #[inline]
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document(_) | NodeData::DocumentFragment | NodeData::Element(_)
        )
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_attr(&self) -> Option<&AttrData> {
        match &self.data {
            NodeData::Attr(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_attr_mut(&mut self) -> Option<&mut AttrData> {
        match &mut self.data {
            NodeData::Attr(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_document(&self) -> Option<&DocumentData> {
        match &self.data {
            NodeData::Document(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_doctype(&self) -> Option<&DoctypeData> {
        match &self.data {
            NodeData::Doctype(d) => Some(d),
            _ => None,
        }
    }
}

/// Node kind, numbered as `Node.nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
}

impl NodeType {
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document(DocumentData),
    /// DOCTYPE
    Doctype(DoctypeData),
    /// Lightweight container, never in a tree itself
    DocumentFragment,
    /// Element
    Element(ElementData),
    /// Attribute (never a child)
    Attr(AttrData),
    /// Text content
    Text(String),
    /// CDATA section
    CdataSection(String),
    /// Comment
    Comment(String),
    /// Processing instruction
    ProcessingInstruction { target: String, data: String },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document(_) => NodeType::Document,
            Self::Doctype(_) => NodeType::DocumentType,
            Self::DocumentFragment => NodeType::DocumentFragment,
            Self::Element(_) => NodeType::Element,
            Self::Attr(_) => NodeType::Attribute,
            Self::Text(_) => NodeType::Text,
            Self::CdataSection(_) => NodeType::CdataSection,
            Self::Comment(_) => NodeType::Comment,
            Self::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }

    /// Character data payload
    pub fn character_data(&self) -> Option<&str> {
        match self {
            Self::Text(data) | Self::CdataSection(data) | Self::Comment(data) => Some(data),
            Self::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    pub(crate) fn character_data_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Text(data) | Self::CdataSection(data) | Self::Comment(data) => Some(data),
            Self::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// HTML or XML document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    Html,
    #[default]
    Xml,
}

/// Document-specific data
#[derive(Debug, Clone)]
pub struct DocumentData {
    pub kind: DocumentKind,
    pub content_type: String,
    /// `None` reads as `about:blank`
    pub url: Option<Url>,
    pub origin: Origin,
}

/// DOCTYPE data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
    /// Attr nodes in insertion order
    pub(crate) attributes: List<NodeId>,
}

impl ElementData {
    pub fn new(namespace: Option<String>, prefix: Option<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace,
            prefix,
            local_name: local_name.into(),
            attributes: List::new(),
        }
    }

    /// `prefix:localName` or `localName`
    pub fn qualified_name(&self) -> String {
        qualified_name(self.prefix.as_deref(), &self.local_name)
    }

    pub fn attributes(&self) -> &List<NodeId> {
        &self.attributes
    }

    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

/// Attribute data
#[derive(Debug, Clone)]
pub struct AttrData {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
    pub value: String,
    /// Element whose attribute list holds this attribute
    pub(crate) owner_element: Option<NodeId>,
}

impl AttrData {
    pub fn new(namespace: Option<String>, prefix: Option<String>, local_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace,
            prefix,
            local_name: local_name.into(),
            value: value.into(),
            owner_element: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(self.prefix.as_deref(), &self.local_name)
    }

    pub fn owner_element(&self) -> Option<NodeId> {
        self.owner_element
    }
}
