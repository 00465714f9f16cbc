//! Member keys
//!
//! Members are addressed by string names, but callers can also hold symbolic
//! keys (the analog of JavaScript symbols). The recording primitives are
//! string-keyed, so symbolic keys are never interceptable: the value surface
//! degrades with a diagnostic and the inspection surface rejects them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A member key on a mock surface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// String-named member (interceptable)
    Name(String),

    /// Symbol-named member (never interceptable)
    Symbol(Symbol),
}

impl Key {
    /// The member name, when this key is string-named
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Symbol(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Symbol(sym) => write!(f, "{}", sym),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<Symbol> for Key {
    fn from(sym: Symbol) -> Self {
        Key::Symbol(sym)
    }
}

/// A process-unique symbolic key
///
/// Two symbols are equal only if one was cloned from the other; the
/// description is cosmetic and carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: u64,
    description: String,
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

impl Symbol {
    /// Mint a fresh symbol with the given description
    pub fn new(description: impl Into<String>) -> Self {
        Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// The symbol's description
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::new("tag");
        let b = Symbol::new("tag");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_key_from_str() {
        let key: Key = "publicMethod".into();
        assert_eq!(key.as_name(), Some("publicMethod"));
    }

    #[test]
    fn test_symbol_key_has_no_name() {
        let key: Key = Symbol::new("hidden").into();
        assert_eq!(key.as_name(), None);
        assert_eq!(key.to_string(), "Symbol(hidden)");
    }
}
