//! Document
//!
//! Document creation, node factories and `DOMImplementation`. Every factory
//! takes the owning document explicitly.

use url::{Origin, Url};

use crate::namespace::{self, HTML_NAMESPACE, SVG_NAMESPACE};
use crate::node::{AttrData, DoctypeData, DocumentData, DocumentKind, ElementData, NodeData};
use crate::{DomException, DomResult, DomTree, NodeId};

/// Parameters for a new document
#[derive(Debug, Clone, Default)]
pub struct DocumentInit {
    pub kind: DocumentKind,
    /// Defaults to `text/html` or `application/xml` by kind
    pub content_type: Option<String>,
    /// Defaults to the tree's configured URL
    pub url: Option<Url>,
    /// Defaults to the URL's origin
    pub origin: Option<Origin>,
}

impl DocumentInit {
    /// HTML document (`text/html`)
    pub fn html() -> Self {
        Self {
            kind: DocumentKind::Html,
            ..Default::default()
        }
    }

    /// XML document (`application/xml`)
    pub fn xml() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl DomTree {
    /// Create a new document, its own node document
    pub fn create_document(&mut self, init: DocumentInit) -> NodeId {
        let content_type = init.content_type.unwrap_or_else(|| {
            match init.kind {
                DocumentKind::Html => "text/html",
                DocumentKind::Xml => "application/xml",
            }
            .to_string()
        });

        let url = init.url.or_else(|| match Url::parse(&self.config().default_url) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Invalid default URL {:?}: {}", self.config().default_url, e);
                None
            }
        });
        let origin = init
            .origin
            .or_else(|| url.as_ref().map(Url::origin))
            .unwrap_or_else(Origin::new_opaque);

        let document = self.alloc(
            None,
            NodeData::Document(DocumentData {
                kind: init.kind,
                content_type,
                url,
                origin,
            }),
        );
        tracing::debug!("Created {:?} document {:?}", init.kind, document);
        document
    }

    fn document_data(&self, node: NodeId) -> Option<&DocumentData> {
        self.node(self.node_document(node)).as_document()
    }

    /// The node document of `node` is an HTML document
    pub fn is_html_document(&self, node: NodeId) -> bool {
        self.document_data(node).is_some_and(|data| data.kind == DocumentKind::Html)
    }

    /// `Document.contentType`
    pub fn content_type(&self, document: NodeId) -> &str {
        self.document_data(document).map_or("application/xml", |data| data.content_type.as_str())
    }

    /// `Document.URL`
    pub fn document_url(&self, document: NodeId) -> String {
        self.document_data(document)
            .and_then(|data| data.url.as_ref())
            .map_or_else(|| "about:blank".to_string(), |url| url.to_string())
    }

    /// Origin of the node document of `document`
    pub fn origin(&self, document: NodeId) -> Origin {
        self.document_data(document)
            .map_or_else(Origin::new_opaque, |data| data.origin.clone())
    }

    /// The doctype child of a document
    pub fn doctype(&self, document: NodeId) -> Option<NodeId> {
        self.children(document)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_doctype())
    }

    /// The element child of a document
    pub fn document_element(&self, document: NodeId) -> Option<NodeId> {
        self.children(document)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_element())
    }

    /// First element descendant of `root` whose `id` is `element_id`
    pub fn get_element_by_id(&self, root: NodeId, element_id: &str) -> Option<NodeId> {
        if element_id.is_empty() {
            return None;
        }
        self.descendants(root)
            .find(|&node| self.node(node).is_element() && self.get_attribute_ns(node, None, "id").as_deref() == Some(element_id))
    }

    /// `Document.implementation`
    pub fn implementation(&self, document: NodeId) -> DomImplementation {
        DomImplementation {
            document: self.node_document(document),
        }
    }

    // =======================================================================
    // Factories
    // =======================================================================

    /// `Document.createElement`: lowercased in HTML documents, HTML namespace
    /// for HTML and XHTML documents
    pub fn create_element(&mut self, document: NodeId, local_name: &str) -> DomResult<NodeId> {
        namespace::validate_name(local_name)?;
        let document = self.node_document(document);

        let local_name = if self.is_html_document(document) {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_string()
        };
        let namespace = (self.is_html_document(document) || self.content_type(document) == "application/xhtml+xml")
            .then(|| HTML_NAMESPACE.to_string());

        Ok(self.alloc(
            Some(document),
            NodeData::Element(ElementData::new(namespace, None, local_name)),
        ))
    }

    /// `Document.createElementNS`
    pub fn create_element_ns(&mut self, document: NodeId, namespace: Option<&str>, qualified_name: &str) -> DomResult<NodeId> {
        let extracted = namespace::validate_and_extract(namespace, qualified_name)?;
        let document = self.node_document(document);
        Ok(self.alloc(
            Some(document),
            NodeData::Element(ElementData::new(extracted.namespace, extracted.prefix, extracted.local_name)),
        ))
    }

    pub fn create_text_node(&mut self, document: NodeId, data: &str) -> NodeId {
        let document = self.node_document(document);
        self.alloc(Some(document), NodeData::Text(data.to_string()))
    }

    pub fn create_comment(&mut self, document: NodeId, data: &str) -> NodeId {
        let document = self.node_document(document);
        self.alloc(Some(document), NodeData::Comment(data.to_string()))
    }

    /// `Document.createCDATASection`
    pub fn create_cdata_section(&mut self, document: NodeId, data: &str) -> DomResult<NodeId> {
        if self.is_html_document(document) {
            return Err(DomException::NotSupported);
        }
        if data.contains("]]>") {
            return Err(DomException::InvalidCharacter);
        }
        let document = self.node_document(document);
        Ok(self.alloc(Some(document), NodeData::CdataSection(data.to_string())))
    }

    /// `Document.createProcessingInstruction`
    pub fn create_processing_instruction(&mut self, document: NodeId, target: &str, data: &str) -> DomResult<NodeId> {
        namespace::validate_name(target)?;
        if data.contains("?>") {
            return Err(DomException::InvalidCharacter);
        }
        let document = self.node_document(document);
        Ok(self.alloc(
            Some(document),
            NodeData::ProcessingInstruction {
                target: target.to_string(),
                data: data.to_string(),
            },
        ))
    }

    pub fn create_document_fragment(&mut self, document: NodeId) -> NodeId {
        let document = self.node_document(document);
        self.alloc(Some(document), NodeData::DocumentFragment)
    }

    /// `Document.createAttribute`
    pub fn create_attribute(&mut self, document: NodeId, local_name: &str) -> DomResult<NodeId> {
        namespace::validate_name(local_name)?;
        let local_name = if self.is_html_document(document) {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_string()
        };
        let document = self.node_document(document);
        Ok(self.alloc(Some(document), NodeData::Attr(AttrData::new(None, None, local_name, ""))))
    }

    /// `Document.createAttributeNS`
    pub fn create_attribute_ns(&mut self, document: NodeId, namespace: Option<&str>, qualified_name: &str) -> DomResult<NodeId> {
        let extracted = namespace::validate_and_extract(namespace, qualified_name)?;
        let document = self.node_document(document);
        Ok(self.alloc(
            Some(document),
            NodeData::Attr(AttrData::new(extracted.namespace, extracted.prefix, extracted.local_name, "")),
        ))
    }

    /// Unvalidated doctype, for tree builders that already parsed one
    pub fn create_doctype(&mut self, document: NodeId, name: &str, public_id: &str, system_id: &str) -> NodeId {
        let document = self.node_document(document);
        self.alloc(
            Some(document),
            NodeData::Doctype(DoctypeData {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            }),
        )
    }
}

/// `DOMImplementation`, bound to the document it was obtained from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomImplementation {
    document: NodeId,
}

impl DomImplementation {
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// `createDocumentType`
    pub fn create_document_type(&self, tree: &mut DomTree, qualified_name: &str, public_id: &str, system_id: &str) -> DomResult<NodeId> {
        namespace::validate_qualified_name(qualified_name)?;
        Ok(tree.create_doctype(self.document, qualified_name, public_id, system_id))
    }

    /// `createDocument`: an XML document, optionally with a doctype and a
    /// document element
    pub fn create_document(
        &self,
        tree: &mut DomTree,
        namespace: Option<&str>,
        qualified_name: &str,
        doctype: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let content_type = match namespace {
            Some(HTML_NAMESPACE) => "application/xhtml+xml",
            Some(SVG_NAMESPACE) => "image/svg+xml",
            _ => "application/xml",
        };

        if let Some(doctype) = doctype {
            if !tree.node(doctype).is_doctype() {
                return Err(DomException::HierarchyRequest);
            }
        }
        // Validate before allocating so a bad name leaves no stray document.
        if !qualified_name.is_empty() {
            namespace::validate_and_extract(namespace, qualified_name)?;
        }

        let origin = tree.origin(self.document);
        let document = tree.create_document(DocumentInit::xml().with_content_type(content_type).with_origin(origin));

        if let Some(doctype) = doctype {
            tree.append_child(document, doctype)?;
        }
        if !qualified_name.is_empty() {
            let element = tree.create_element_ns(document, namespace, qualified_name)?;
            tree.append_child(document, element)?;
        }

        tree.discard_records_for(document);
        Ok(document)
    }

    /// `createHTMLDocument`: doctype, `html`, `head`, optional `title`, `body`
    pub fn create_html_document(&self, tree: &mut DomTree, title: Option<&str>) -> NodeId {
        let origin = tree.origin(self.document);
        let document = tree.create_document(DocumentInit::html().with_origin(origin));

        let doctype = tree.create_doctype(document, "html", "", "");
        tree.append_unobserved(doctype, document);

        let html = tree.alloc_html_element(document, "html");
        tree.append_unobserved(html, document);
        let head = tree.alloc_html_element(document, "head");
        tree.append_unobserved(head, html);

        if let Some(title) = title {
            let title_element = tree.alloc_html_element(document, "title");
            tree.append_unobserved(title_element, head);
            let text = tree.create_text_node(document, title);
            tree.append_unobserved(text, title_element);
        }

        let body = tree.alloc_html_element(document, "body");
        tree.append_unobserved(body, html);

        document
    }

    /// `hasFeature` always returns true
    pub fn has_feature(&self) -> bool {
        true
    }
}

impl DomTree {
    fn alloc_html_element(&mut self, document: NodeId, local_name: &str) -> NodeId {
        self.alloc(
            Some(document),
            NodeData::Element(ElementData::new(Some(HTML_NAMESPACE.to_string()), None, local_name)),
        )
    }

    /// Drop queued records targeting nodes of `document`
    fn discard_records_for(&mut self, document: NodeId) {
        let pending = self.take_records();
        for record in pending {
            if self.node_document(record.target) != document {
                self.queue_record(record);
            }
        }
    }
}
