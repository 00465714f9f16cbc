//! Shape descriptors
//!
//! A mock needs to know the shape it imitates: which member names are
//! callable and which are plain or computed properties. Shapes are declared
//! explicitly as a [`Prototype`] (there is no runtime reflection to discover
//! them from an opaque value) and handed to the factory through the
//! [`Blueprint`] trait, which is implemented both for constructor-like
//! values ([`Class`]) and for plain prototypes used directly.
//!
//! Prototypes chain: a subclass shape extends its parent, and member lookup
//! walks the chain with own members shadowing inherited ones. The prototype
//! is read-only reference material for the mock; it is never mutated.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A declared getter body
///
/// Runs during member classification; a body that fails models a computed
/// getter that reads state not available at that point.
pub type Getter = Arc<dyn Fn() -> Result<Value, String> + Send + Sync>;

/// A member as declared on a prototype
#[derive(Clone)]
pub enum Member {
    /// A callable declared on the prototype
    Method,

    /// A plain data member with its declared value
    Data(Value),

    /// A computed member: optional getter body, optional setter
    Accessor {
        /// The getter body, if the member is readable
        get: Option<Getter>,
        /// Whether the member declares a setter
        has_set: bool,
    },
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method => write!(f, "Method"),
            Member::Data(value) => write!(f, "Data({:?})", value),
            Member::Accessor { get, has_set } => f
                .debug_struct("Accessor")
                .field("get", &get.is_some())
                .field("has_set", has_set)
                .finish(),
        }
    }
}

/// The shape a mock imitates: named members plus an optional parent chain
#[derive(Debug)]
pub struct Prototype {
    name: String,
    members: FxHashMap<String, Member>,
    parent: Option<Arc<Prototype>>,
}

impl Prototype {
    /// Start declaring a prototype
    pub fn builder(name: impl Into<String>) -> PrototypeBuilder {
        PrototypeBuilder {
            name: name.into(),
            members: FxHashMap::default(),
            parent: None,
        }
    }

    /// The declared shape name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent shape, for chained (subclass) prototypes
    pub fn parent(&self) -> Option<&Arc<Prototype>> {
        self.parent.as_ref()
    }

    /// Look up a member by name, walking the parent chain
    ///
    /// Own members shadow inherited ones.
    pub fn lookup(&self, name: &str) -> Option<&Member> {
        let mut current = self;
        loop {
            if let Some(member) = current.members.get(name) {
                return Some(member);
            }
            current = current.parent.as_deref()?;
        }
    }
}

/// Builder for [`Prototype`]
#[derive(Debug)]
pub struct PrototypeBuilder {
    name: String,
    members: FxHashMap<String, Member>,
    parent: Option<Arc<Prototype>>,
}

impl PrototypeBuilder {
    /// Declare a callable member
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.members.insert(name.into(), Member::Method);
        self
    }

    /// Declare a plain data member with its declared value
    pub fn data(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), Member::Data(value.into()));
        self
    }

    /// Declare a getter body for a member
    ///
    /// Merges with a previously declared setter on the same name.
    pub fn getter(
        mut self,
        name: impl Into<String>,
        body: impl Fn() -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        let getter: Getter = Arc::new(body);
        match self.members.entry(name.into()).or_insert(Member::Accessor {
            get: None,
            has_set: false,
        }) {
            Member::Accessor { get, .. } => *get = Some(getter),
            other => {
                *other = Member::Accessor {
                    get: Some(getter),
                    has_set: false,
                }
            }
        }
        self
    }

    /// Declare a setter for a member
    ///
    /// Merges with a previously declared getter on the same name.
    pub fn setter(mut self, name: impl Into<String>) -> Self {
        match self.members.entry(name.into()).or_insert(Member::Accessor {
            get: None,
            has_set: true,
        }) {
            Member::Accessor { has_set, .. } => *has_set = true,
            other => {
                *other = Member::Accessor {
                    get: None,
                    has_set: true,
                }
            }
        }
        self
    }

    /// Chain this prototype under a parent shape
    pub fn extends(mut self, parent: Arc<Prototype>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Arc<Prototype> {
        Arc::new(Prototype {
            name: self.name,
            members: self.members,
            parent: self.parent,
        })
    }
}

/// Anything the factory can resolve to a prototype
///
/// Implemented for [`Class`] (a constructor-like value carrying its
/// prototype) and for `Arc<Prototype>` (a shape reference used directly).
pub trait Blueprint {
    /// Resolve to the prototype whose members define what can be intercepted
    fn prototype(&self) -> Arc<Prototype>;
}

impl Blueprint for Arc<Prototype> {
    fn prototype(&self) -> Arc<Prototype> {
        self.clone()
    }
}

/// A constructor-like blueprint: a named handle owning its prototype
#[derive(Debug, Clone)]
pub struct Class {
    prototype: Arc<Prototype>,
}

impl Class {
    /// Wrap a prototype as a constructor-like value
    pub fn new(prototype: Arc<Prototype>) -> Self {
        Class { prototype }
    }

    /// The class name (the prototype's shape name)
    pub fn name(&self) -> &str {
        self.prototype.name()
    }
}

impl Blueprint for Class {
    fn prototype(&self) -> Arc<Prototype> {
        self.prototype.clone()
    }
}
