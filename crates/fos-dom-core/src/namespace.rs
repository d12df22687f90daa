//! Namespaces and Names
//!
//! Namespace URIs, XML `Name`/`QName` production checks and the
//! validate-and-extract step shared by `createElementNS`, `setAttributeNS`
//! and `createAttributeNS`.

use crate::{DomException, DomResult};

pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Namespace, prefix and local name split out of a qualified name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedName {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
}

/// Empty namespace strings mean "no namespace"
pub fn normalize_namespace(namespace: Option<&str>) -> Option<String> {
    namespace.filter(|ns| !ns.is_empty()).map(str::to_string)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Matches the XML `Name` production
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_valid_ncname(name: &str) -> bool {
    !name.contains(':') && is_valid_name(name)
}

/// Matches the XML `QName` production
pub fn is_valid_qualified_name(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// `Name` check raising InvalidCharacterError
pub fn validate_name(name: &str) -> DomResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        tracing::debug!("Rejected name {:?}", name);
        Err(DomException::InvalidCharacter)
    }
}

/// `QName` check raising InvalidCharacterError
pub fn validate_qualified_name(name: &str) -> DomResult<()> {
    if is_valid_qualified_name(name) {
        Ok(())
    } else {
        tracing::debug!("Rejected qualified name {:?}", name);
        Err(DomException::InvalidCharacter)
    }
}

/// Split a qualified name into (namespace, prefix, local name), enforcing the
/// fixed `xml`/`xmlns` bindings.
pub fn validate_and_extract(namespace: Option<&str>, qualified_name: &str) -> DomResult<ExtractedName> {
    let namespace = normalize_namespace(namespace);
    validate_qualified_name(qualified_name)?;

    let (prefix, local_name) = match qualified_name.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, qualified_name.to_string()),
    };

    if prefix.is_some() && namespace.is_none() {
        return Err(DomException::Namespace);
    }
    if prefix.as_deref() == Some("xml") && namespace.as_deref() != Some(XML_NAMESPACE) {
        return Err(DomException::Namespace);
    }
    let is_xmlns = qualified_name == "xmlns" || prefix.as_deref() == Some("xmlns");
    if is_xmlns && namespace.as_deref() != Some(XMLNS_NAMESPACE) {
        return Err(DomException::Namespace);
    }
    if namespace.as_deref() == Some(XMLNS_NAMESPACE) && !is_xmlns {
        return Err(DomException::Namespace);
    }

    Ok(ExtractedName {
        namespace,
        prefix,
        local_name,
    })
}

/// `prefix:local` or `local`
pub fn qualified_name(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local_name),
        None => local_name.to_string(),
    }
}

/// ASCII whitespace as the DOM defines it (no vertical tab)
#[inline]
pub fn is_ascii_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\u{C}' | '\r' | ' ')
}

/// Split on ASCII whitespace, dropping empty pieces
pub fn split_ascii_whitespace(value: &str) -> impl Iterator<Item = &str> {
    value.split(is_ascii_whitespace).filter(|token| !token.is_empty())
}
