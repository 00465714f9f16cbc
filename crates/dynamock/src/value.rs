//! Dynamic value representation for mock members
//!
//! Mock members hold JavaScript-like values: a member can be a string one
//! moment and a callable the next. This module implements the dynamic value
//! enum those members traffic in.
//!
//! # Design Philosophy
//!
//! - **Dynamic until read**: member values are opaque to the type system
//! - **Missing members read as Undefined**: no compile-time structure validation
//! - **Callables are values**: functions can be stored, read, and invoked
//! - **Identity for handles**: callables and facades compare by identity,
//!   everything else compares structurally

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::facade::SpyFacade;

/// Runtime representation of a mock member value
///
/// This is the value enum that flows through the value surface: whatever a
/// test writes into a mock, and whatever a mock hands back, is one of these.
#[derive(Clone)]
pub enum Value {
    /// Undefined value (unwritten members, default spy returns)
    Undefined,

    /// Null
    Null,

    /// Boolean (true/false)
    Bool(bool),

    /// Number (always f64, following the JSON spec)
    Number(f64),

    /// UTF-8 string
    String(String),

    /// Ordered list of values
    Array(Vec<Value>),

    /// String-keyed map of values
    Object(FxHashMap<String, Value>),

    /// Callable value (a function stored in a member slot)
    Callable(Callable),

    /// The inspection surface of a mock, readable through the reserved
    /// accessor on the value surface
    Facade(SpyFacade),
}

impl Value {
    /// Check whether this value is `Undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check whether this value can be invoked
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    /// Extract the boolean, if this value is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract the number, if this value is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract the string slice, if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the callable handle, if this value is one
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Extract the inspection facade, if this value is one
    pub fn as_facade(&self) -> Option<&SpyFacade> {
        match self {
            Value::Facade(f) => Some(f),
            _ => None,
        }
    }

    /// Get the type name as a string (for typeof-style dispatch)
    ///
    /// Returns:
    /// - "undefined" for Undefined
    /// - "null" for Null
    /// - "boolean" for Bool
    /// - "number" for Number
    /// - "string" for String
    /// - "object" for Array, Object and Facade (following JavaScript convention)
    /// - "function" for Callable
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) | Value::Object(_) | Value::Facade(_) => "object",
            Value::Callable(_) => "function",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Facade(a), Value::Facade(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(a) => f.debug_list().entries(a).finish(),
            Value::Object(o) => f.debug_map().entries(o).finish(),
            Value::Callable(_) => write!(f, "[function]"),
            Value::Facade(_) => write!(f, "[spy facade]"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

/// A callable value
///
/// Cheap to clone; clones share the underlying function, so identity
/// survives round trips through member slots.
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Callable {
    /// Wrap a function as a callable value
    pub fn new(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Callable(Arc::new(f))
    }

    /// Invoke the callable with the given arguments
    pub fn invoke(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// Check whether two handles refer to the same underlying function
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[function]")
    }
}
