//! DOMTokenList (classList)
//!
//! Bound to an element and an attribute local name. The token set is parsed
//! from the attribute on every read and written back through the attribute
//! API after every change.

use crate::collections::OrderedSet;
use crate::namespace::{self, is_ascii_whitespace};
use crate::{DomException, DomResult, DomTree, NodeId};

/// Ordered token set view over one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomTokenList {
    element: NodeId,
    local_name: String,
}

fn validate_token(token: &str) -> DomResult<()> {
    if token.is_empty() {
        return Err(DomException::Syntax);
    }
    if token.chars().any(is_ascii_whitespace) {
        return Err(DomException::InvalidCharacter);
    }
    Ok(())
}

impl DomTokenList {
    pub fn new(element: NodeId, local_name: impl Into<String>) -> Self {
        Self {
            element,
            local_name: local_name.into(),
        }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    fn tokens(&self, tree: &DomTree) -> OrderedSet<String> {
        tree.get_attribute_ns(self.element, None, &self.local_name)
            .map(|value| namespace::split_ascii_whitespace(&value).map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Serialize `tokens` into the attribute. An absent attribute stays absent
    /// when there is nothing to write.
    fn update(&self, tree: &mut DomTree, tokens: &OrderedSet<String>) -> DomResult<()> {
        if tokens.is_empty() && !tree.has_attribute_ns(self.element, None, &self.local_name) {
            return Ok(());
        }
        let value = tokens.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
        tree.set_attribute_ns(self.element, None, &self.local_name, &value)
    }

    pub fn length(&self, tree: &DomTree) -> usize {
        self.tokens(tree).len()
    }

    pub fn item(&self, tree: &DomTree, index: usize) -> Option<String> {
        self.tokens(tree).get(index).cloned()
    }

    pub fn contains(&self, tree: &DomTree, token: &str) -> bool {
        self.tokens(tree).iter().any(|t| t == token)
    }

    pub fn iter(&self, tree: &DomTree) -> impl Iterator<Item = String> {
        self.tokens(tree).into_iter()
    }

    /// Raw attribute value
    pub fn value(&self, tree: &DomTree) -> String {
        tree.get_attribute_ns(self.element, None, &self.local_name)
            .unwrap_or_default()
    }

    pub fn set_value(&self, tree: &mut DomTree, value: &str) -> DomResult<()> {
        tree.set_attribute_ns(self.element, None, &self.local_name, value)
    }

    /// Add token(s)
    pub fn add(&self, tree: &mut DomTree, tokens: &[&str]) -> DomResult<()> {
        for token in tokens {
            validate_token(token)?;
        }
        let mut set = self.tokens(tree);
        for token in tokens {
            set.append(token.to_string());
        }
        self.update(tree, &set)
    }

    /// Remove token(s)
    pub fn remove(&self, tree: &mut DomTree, tokens: &[&str]) -> DomResult<()> {
        for token in tokens {
            validate_token(token)?;
        }
        let mut set = self.tokens(tree);
        for token in tokens {
            set.remove(&token.to_string());
        }
        self.update(tree, &set)
    }

    /// Toggle token, returns whether it is present afterwards
    pub fn toggle(&self, tree: &mut DomTree, token: &str, force: Option<bool>) -> DomResult<bool> {
        validate_token(token)?;
        let mut set = self.tokens(tree);
        let token = token.to_string();

        if set.contains(&token) {
            if force == Some(true) {
                return Ok(true);
            }
            set.remove(&token);
            self.update(tree, &set)?;
            return Ok(false);
        }

        if force == Some(false) {
            return Ok(false);
        }
        set.append(token);
        self.update(tree, &set)?;
        Ok(true)
    }

    /// Replace `token` with `new_token`; false when `token` is absent
    pub fn replace(&self, tree: &mut DomTree, token: &str, new_token: &str) -> DomResult<bool> {
        if token.is_empty() || new_token.is_empty() {
            return Err(DomException::Syntax);
        }
        validate_token(token)?;
        validate_token(new_token)?;

        let mut set = self.tokens(tree);
        let token = token.to_string();
        if !set.contains(&token) {
            return Ok(false);
        }
        set.replace(&token, new_token.to_string());
        self.update(tree, &set)?;
        Ok(true)
    }
}

impl DomTree {
    /// `Element.classList`
    pub fn class_list(&self, element: NodeId) -> DomTokenList {
        DomTokenList::new(element, "class")
    }
}
