//! Namespace scope.
//!
//! Stack-based prefix resolver. Bindings are tagged with the depth of the
//! element that declared them and dropped when that element's scope closes.

use crate::name::{NamespaceBinding, XML_NAMESPACE};

#[derive(Debug, Clone)]
struct ScopedBinding {
    prefix: String,
    uri: String,
    depth: u32,
}

/// In-scope namespace bindings for the element currently being visited.
#[derive(Debug, Clone)]
pub struct NamespaceScope {
    bindings: Vec<ScopedBinding>,
    depth: u32,
}

impl NamespaceScope {
    /// Create a scope with only the `xml` prefix bound.
    pub fn new() -> Self {
        NamespaceScope {
            bindings: vec![ScopedBinding {
                prefix: "xml".to_string(),
                uri: XML_NAMESPACE.to_string(),
                depth: 0,
            }],
            depth: 0,
        }
    }

    /// Enter an element scope.
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it.
    pub fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a binding in the current scope.
    ///
    /// The `xml` and `xmlns` prefixes cannot be rebound; such declarations
    /// are ignored.
    pub fn declare(&mut self, prefix: &str, uri: &str) {
        if prefix == "xml" || prefix == "xmlns" {
            return;
        }
        self.bindings.push(ScopedBinding {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            depth: self.depth,
        });
    }

    /// Declare every binding of one element.
    pub fn declare_all(&mut self, bindings: &[NamespaceBinding]) {
        for binding in bindings {
            self.declare(&binding.prefix, &binding.uri);
        }
    }

    /// Resolve a prefix to its URI. The empty prefix is the default namespace.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix == prefix)
            .map(|b| b.uri.as_str())
    }

    /// Resolve the default namespace.
    pub fn resolve_default(&self) -> Option<&str> {
        self.resolve("")
    }

    /// True if writing `prefix` would denote `uri` here.
    ///
    /// An unprefixed name in no namespace is bound as long as no default
    /// namespace (other than an undeclaration) is in scope.
    pub fn is_bound(&self, prefix: &str, uri: &str) -> bool {
        match self.resolve(prefix) {
            Some(bound) => bound == uri,
            None => prefix.is_empty() && uri.is_empty(),
        }
    }

    /// True if `prefix` was declared by the innermost open scope.
    pub fn declared_here(&self, prefix: &str) -> bool {
        self.bindings
            .iter()
            .rev()
            .take_while(|b| b.depth == self.depth)
            .any(|b| b.prefix == prefix)
    }

    /// Current element depth (0 outside any element).
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Default for NamespaceScope {
    fn default() -> Self {
        Self::new()
    }
}
