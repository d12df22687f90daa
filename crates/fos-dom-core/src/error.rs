//! DOM operation errors
//!
//! Every failure is reported synchronously before any mutation happens.

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomException>;

/// DOMException names raised by the tree engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DomException {
    /// Offset outside the character data
    #[error("IndexSizeError: the index is not in the allowed range")]
    IndexSize,

    /// The operation would yield an incorrect node tree
    #[error("HierarchyRequestError: the operation would yield an incorrect node tree")]
    HierarchyRequest,

    /// Name does not match the XML production
    #[error("InvalidCharacterError: the string contains invalid characters")]
    InvalidCharacter,

    /// The object can not be found here
    #[error("NotFoundError: the object can not be found here")]
    NotFound,

    /// The operation is not supported
    #[error("NotSupportedError: the operation is not supported")]
    NotSupported,

    /// The attribute is in use by another element
    #[error("InUseAttributeError: the attribute is in use by another element")]
    InUseAttribute,

    /// The string did not match the expected pattern
    #[error("SyntaxError: the string did not match the expected pattern")]
    Syntax,

    /// The operation is not allowed by Namespaces in XML
    #[error("NamespaceError: the operation is not allowed by Namespaces in XML")]
    Namespace,

    /// The node is of the wrong kind for this operation
    #[error("InvalidNodeTypeError: the supplied node is incorrect or has an incorrect ancestor")]
    InvalidNodeType,
}

impl DomException {
    pub const INDEX_SIZE_ERR: u16 = 1;
    pub const HIERARCHY_REQUEST_ERR: u16 = 3;
    pub const INVALID_CHARACTER_ERR: u16 = 5;
    pub const NOT_FOUND_ERR: u16 = 8;
    pub const NOT_SUPPORTED_ERR: u16 = 9;
    pub const INUSE_ATTRIBUTE_ERR: u16 = 10;
    pub const SYNTAX_ERR: u16 = 12;
    pub const NAMESPACE_ERR: u16 = 14;
    pub const INVALID_NODE_TYPE_ERR: u16 = 24;

    /// DOMException name as exposed to script
    pub fn name(&self) -> &'static str {
        match self {
            Self::IndexSize => "IndexSizeError",
            Self::HierarchyRequest => "HierarchyRequestError",
            Self::InvalidCharacter => "InvalidCharacterError",
            Self::NotFound => "NotFoundError",
            Self::NotSupported => "NotSupportedError",
            Self::InUseAttribute => "InUseAttributeError",
            Self::Syntax => "SyntaxError",
            Self::Namespace => "NamespaceError",
            Self::InvalidNodeType => "InvalidNodeTypeError",
        }
    }

    /// Legacy numeric code
    pub fn code(&self) -> u16 {
        match self {
            Self::IndexSize => Self::INDEX_SIZE_ERR,
            Self::HierarchyRequest => Self::HIERARCHY_REQUEST_ERR,
            Self::InvalidCharacter => Self::INVALID_CHARACTER_ERR,
            Self::NotFound => Self::NOT_FOUND_ERR,
            Self::NotSupported => Self::NOT_SUPPORTED_ERR,
            Self::InUseAttribute => Self::INUSE_ATTRIBUTE_ERR,
            Self::Syntax => Self::SYNTAX_ERR,
            Self::Namespace => Self::NAMESPACE_ERR,
            Self::InvalidNodeType => Self::INVALID_NODE_TYPE_ERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_codes() {
        assert_eq!(DomException::HierarchyRequest.name(), "HierarchyRequestError");
        assert_eq!(DomException::HierarchyRequest.code(), 3);
        assert_eq!(DomException::Namespace.code(), 14);
        assert_eq!(DomException::InUseAttribute.code(), 10);
    }

    #[test]
    fn test_display() {
        let message = DomException::NotFound.to_string();
        assert!(message.starts_with("NotFoundError"));
    }
}
