//! Qualified names and namespace bindings.
//!
//! Identity of a name is the `(namespace_uri, local_name)` pair. The prefix
//! is serialization metadata: two names that differ only by prefix compare
//! equal and hash alike.

use std::fmt;
use std::hash::{Hash, Hasher};

use memchr::memchr;
use unicode_xid::UnicodeXID;

use crate::error::NameError;
use crate::scope::NamespaceScope;

/// Namespace URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace-qualified name.
///
/// An empty `namespace_uri` means "no namespace"; an empty `prefix` means
/// the name is written unprefixed.
#[derive(Debug, Clone, Default, Eq)]
pub struct QName {
    pub namespace_uri: String,
    pub local_name: String,
    pub prefix: String,
}

impl QName {
    /// Name in `namespace_uri` with no prefix.
    pub fn new(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        QName {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            prefix: String::new(),
        }
    }

    /// Name in no namespace.
    pub fn local(local_name: impl Into<String>) -> Self {
        QName::new("", local_name)
    }

    /// Name written as `prefix:local_name`.
    pub fn prefixed(
        prefix: impl Into<String>,
        namespace_uri: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        QName {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            prefix: prefix.into(),
        }
    }

    /// Parse a lexical `prefix:local` or `local` name, resolving the prefix
    /// through `scope`.
    ///
    /// An unprefixed name takes the in-scope default namespace, which is the
    /// rule for element names. Attribute names never take the default
    /// namespace; use [`QName::parse_attribute`] for those.
    pub fn parse(lexical: &str, scope: &NamespaceScope) -> Result<Self, NameError> {
        Self::parse_with(lexical, scope, true)
    }

    /// Like [`QName::parse`] but an unprefixed name stays in no namespace.
    pub fn parse_attribute(lexical: &str, scope: &NamespaceScope) -> Result<Self, NameError> {
        Self::parse_with(lexical, scope, false)
    }

    fn parse_with(
        lexical: &str,
        scope: &NamespaceScope,
        use_default: bool,
    ) -> Result<Self, NameError> {
        if lexical.is_empty() {
            return Err(NameError::Empty);
        }

        let (prefix, local) = match memchr(b':', lexical.as_bytes()) {
            Some(pos) => (&lexical[..pos], &lexical[pos + 1..]),
            None => ("", lexical),
        };

        if !prefix.is_empty() && !is_valid_ncname(prefix) {
            return Err(NameError::InvalidPrefix(prefix.to_string()));
        }
        if !is_valid_ncname(local) {
            return Err(NameError::InvalidLocalName(local.to_string()));
        }

        let namespace_uri = if prefix.is_empty() {
            if use_default {
                scope.resolve_default().unwrap_or("")
            } else {
                ""
            }
        } else {
            scope
                .resolve(prefix)
                .ok_or_else(|| NameError::UnboundPrefix(prefix.to_string()))?
        };

        Ok(QName::prefixed(prefix, namespace_uri, local))
    }

    /// True if the name lives in some namespace.
    pub fn has_namespace(&self) -> bool {
        !self.namespace_uri.is_empty()
    }

    /// The `prefix:local` form as it would be written.
    pub fn lexical(&self) -> String {
        if self.prefix.is_empty() {
            self.local_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.local_name)
        }
    }

    /// The `{uri}local` (Clark) form, which identifies the name without a prefix.
    pub fn clark(&self) -> String {
        if self.namespace_uri.is_empty() {
            self.local_name.clone()
        } else {
            format!("{{{}}}{}", self.namespace_uri, self.local_name)
        }
    }

    /// Same name with a different prefix.
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        QName {
            namespace_uri: self.namespace_uri.clone(),
            local_name: self.local_name.clone(),
            prefix: prefix.into(),
        }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace_uri == other.namespace_uri && self.local_name == other.local_name
    }
}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace_uri.hash(state);
        self.local_name.hash(state);
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.local_name)
        } else {
            write!(f, "{}:{}", self.prefix, self.local_name)
        }
    }
}

/// A `prefix -> uri` declaration made on one element.
///
/// An empty prefix declares (or, with an empty uri, undeclares) the default
/// namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceBinding {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        NamespaceBinding {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    /// Default namespace declaration (`xmlns="uri"`).
    pub fn default_namespace(uri: impl Into<String>) -> Self {
        NamespaceBinding::new("", uri)
    }

    pub fn is_default(&self) -> bool {
        self.prefix.is_empty()
    }
}

/// Check a string against the NCName production (a name without colons).
///
/// Uses the Unicode identifier classes, plus `-` and `.` which XML allows
/// after the first character.
pub fn is_valid_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_xid_start() => {}
        _ => return false,
    }
    chars.all(|c| c == '-' || c == '.' || c.is_xid_continue())
}
