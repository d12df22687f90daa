//! Selector Queries
//!
//! The tree only walks; deciding whether an element matches belongs to a
//! `SelectorMatcher`. Closures work as matchers, and `CompoundSelector`
//! covers the simple `tag.class#id[attr]` forms.

use crate::namespace::{self, HTML_NAMESPACE};
use crate::{DomException, DomResult, DomTree, NodeId};

/// Element matching contract used by the query operations
pub trait SelectorMatcher {
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool;
}

impl<F> SelectorMatcher for F
where
    F: Fn(&DomTree, NodeId) -> bool,
{
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self(tree, element)
    }
}

/// Simple selector types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Universal selector (*)
    Universal,
    /// Tag name selector (div, span, etc.)
    Tag(Box<str>),
    /// Class selector (.class)
    Class(Box<str>),
    /// ID selector (#id)
    Id(Box<str>),
    /// Attribute existence ([attr])
    AttrExists(Box<str>),
    /// Attribute equals ([attr=value])
    AttrEquals(Box<str>, Box<str>),
}

impl SimpleSelector {
    /// Match against an element
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        let Some(data) = tree.get(element).and_then(|node| node.as_element()) else {
            return false;
        };

        match self {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => {
                if data.is_in_namespace(HTML_NAMESPACE) && tree.is_html_document(element) {
                    data.local_name.eq_ignore_ascii_case(tag)
                } else {
                    data.local_name == tag.as_ref()
                }
            }
            SimpleSelector::Class(class) => tree
                .get_attribute_ns(element, None, "class")
                .is_some_and(|classes| namespace::split_ascii_whitespace(&classes).any(|c| c == class.as_ref())),
            SimpleSelector::Id(id) => tree.get_attribute_ns(element, None, "id").as_deref() == Some(id.as_ref()),
            SimpleSelector::AttrExists(name) => tree.has_attribute(element, name),
            SimpleSelector::AttrEquals(name, value) => {
                tree.get_attribute(element, name).as_deref() == Some(value.as_ref())
            }
        }
    }
}

impl SelectorMatcher for SimpleSelector {
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        SimpleSelector::matches(self, tree, element)
    }
}

/// Compound selector (multiple simple selectors that must all match)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn new(selectors: Vec<SimpleSelector>) -> Self {
        Self { selectors }
    }

    /// Parse `tag`, `*`, `.class`, `#id`, `[attr]` and `[attr=value]` parts
    /// written back to back. Anything else (combinators, pseudo-classes,
    /// selector lists) is a SyntaxError.
    pub fn parse(text: &str) -> DomResult<Self> {
        let text = text.trim_matches(namespace::is_ascii_whitespace);
        if text.is_empty() {
            return Err(DomException::Syntax);
        }

        let mut selectors = Vec::new();
        let mut rest = text;

        while let Some(first) = rest.chars().next() {
            match first {
                '*' => {
                    selectors.push(SimpleSelector::Universal);
                    rest = &rest[1..];
                }
                '.' | '#' => {
                    let (ident, remainder) = split_ident(&rest[1..]);
                    if ident.is_empty() {
                        return Err(DomException::Syntax);
                    }
                    selectors.push(if first == '.' {
                        SimpleSelector::Class(ident.into())
                    } else {
                        SimpleSelector::Id(ident.into())
                    });
                    rest = remainder;
                }
                '[' => {
                    let Some(end) = rest.find(']') else {
                        return Err(DomException::Syntax);
                    };
                    let inner = &rest[1..end];
                    let selector = match inner.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim_matches(|c| c == '"' || c == '\'');
                            SimpleSelector::AttrEquals(name.trim().into(), value.into())
                        }
                        None => SimpleSelector::AttrExists(inner.trim().into()),
                    };
                    if matches!(&selector, SimpleSelector::AttrExists(name) | SimpleSelector::AttrEquals(name, _) if name.is_empty())
                    {
                        return Err(DomException::Syntax);
                    }
                    selectors.push(selector);
                    rest = &rest[end + 1..];
                }
                _ if selectors.is_empty() => {
                    let (ident, remainder) = split_ident(rest);
                    if ident.is_empty() {
                        return Err(DomException::Syntax);
                    }
                    selectors.push(SimpleSelector::Tag(ident.into()));
                    rest = remainder;
                }
                _ => return Err(DomException::Syntax),
            }
        }

        Ok(Self { selectors })
    }
}

fn split_ident(text: &str) -> (&str, &str) {
    let end = text
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()))
        .map_or(text.len(), |(index, _)| index);
    text.split_at(end)
}

impl SelectorMatcher for CompoundSelector {
    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.selectors.iter().all(|selector| selector.matches(tree, element))
    }
}

impl DomTree {
    /// First element descendant of `root` accepted by `matcher`
    pub fn query_selector(&self, root: NodeId, matcher: &dyn SelectorMatcher) -> Option<NodeId> {
        self.descendants(root)
            .find(|&node| self.node(node).is_element() && matcher.matches(self, node))
    }

    /// Every element descendant of `root` accepted by `matcher`, in tree order
    pub fn query_selector_all(&self, root: NodeId, matcher: &dyn SelectorMatcher) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&node| self.node(node).is_element() && matcher.matches(self, node))
            .collect()
    }

    /// `Element.matches`
    pub fn matches(&self, element: NodeId, matcher: &dyn SelectorMatcher) -> bool {
        self.node(element).is_element() && matcher.matches(self, element)
    }

    /// `Element.closest`: nearest inclusive ancestor element accepted by
    /// `matcher`
    pub fn closest(&self, element: NodeId, matcher: &dyn SelectorMatcher) -> Option<NodeId> {
        self.inclusive_ancestors(element)
            .filter(|&node| self.node(node).is_element())
            .find(|&node| matcher.matches(self, node))
    }
}
