//! Value and inspection surfaces
//!
//! A mock is two coordinated views over one registry. The value surface
//! ([`Mock`]) behaves like the real object: members are read, written and
//! called, and every touch routes through the registry so the interceptor
//! exists before the access completes. The inspection surface
//! ([`SpyFacade`]) is the parallel, read-mostly view test authors use to
//! configure spies and assert on recorded traffic.
//!
//! The inspection surface is reachable from the value surface by reading
//! the reserved `"_spy"` member (or the typed [`Mock::spy`] method); the
//! reserved name itself is excluded from member routing and rejects writes.

use std::fmt;
use std::sync::Arc;

use crate::blueprint::Blueprint;
use crate::key::Key;
use crate::registry::{MemberKind, Record, Registry};
use crate::value::Value;
use crate::{MockError, MockResult};

/// The reserved member name that exposes the inspection surface
pub const RESERVED_ACCESSOR: &str = "_spy";

struct MockBase {
    registry: Registry,
}

/// The value surface: the mock object test code interacts with
///
/// Cloning is cheap and clones are the same mock (same registry, same
/// interceptors).
#[derive(Clone)]
pub struct Mock {
    base: Arc<MockBase>,
}

impl Mock {
    /// Read a member
    ///
    /// The reserved accessor returns the inspection surface. String names
    /// are classified on first touch, then read through the live slot:
    /// function-kind members read as their permanent callable, property-kind
    /// members route through the getter spy. Symbol keys are not
    /// interceptable; the read degrades to `Undefined` with a diagnostic.
    pub fn get(&self, key: impl Into<Key>) -> Value {
        match key.into() {
            Key::Name(name) if name == RESERVED_ACCESSOR => Value::Facade(self.spy()),
            Key::Name(name) => {
                self.base.registry.ensure(&name);
                self.base.registry.stub().read(&name)
            }
            Key::Symbol(sym) => {
                tracing::warn!(
                    key = %sym,
                    "only string-named members can be spied; read returns undefined"
                );
                Value::Undefined
            }
        }
    }

    /// Write a member
    ///
    /// The reserved accessor is immutable from this side. A name the
    /// prototype declares callable rejects the write, whether or not the
    /// member was ever touched, because the permanent call spy cannot be
    /// replaced. Property-kind names (including names absent from the
    /// prototype, which are created on write) route through the setter spy.
    /// Symbol keys are ignored with a diagnostic.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> MockResult<()> {
        match key.into() {
            Key::Name(name) if name == RESERVED_ACCESSOR => Err(MockError::ReservedAccessor),
            Key::Name(name) => {
                if self.base.registry.is_function(&name) {
                    return Err(MockError::PermanentSpy(name));
                }
                self.base.registry.ensure(&name);
                self.base.registry.stub().write(&name, value.into());
                Ok(())
            }
            Key::Symbol(sym) => {
                tracing::warn!(
                    key = %sym,
                    "only string-named members can be spied; write is ignored"
                );
                Ok(())
            }
        }
    }

    /// Call a member
    ///
    /// Function-kind members run their recording spy. Property-kind members
    /// are read through the getter spy first; if the current value is a
    /// caller-stored callable it runs directly, without call interception;
    /// no prototype classification applies to stored values. Anything else
    /// is not callable.
    pub fn call(&self, name: &str, args: &[Value]) -> MockResult<Value> {
        if name == RESERVED_ACCESSOR {
            return Err(MockError::NotCallable(name.to_string()));
        }
        let record = self.base.registry.ensure(name);
        match record.kind() {
            MemberKind::Function => Ok(record.func()?.call(args)),
            MemberKind::Property => match self.base.registry.stub().read(name) {
                Value::Callable(callable) => Ok(callable.invoke(args)),
                _ => Err(MockError::NotCallable(name.to_string())),
            },
        }
    }

    /// The reserved accessor: the inspection surface for this mock
    pub fn spy(&self) -> SpyFacade {
        SpyFacade {
            base: self.base.clone(),
        }
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("prototype", &self.base.registry.prototype().name())
            .finish()
    }
}

/// The inspection surface: per-member spy records
///
/// Reads go through the same registry as the value surface, so inspecting a
/// member initializes it exactly as touching it would. Records are never
/// replaced through this surface; spies are configured through the handles
/// inside each record.
#[derive(Clone)]
pub struct SpyFacade {
    base: Arc<MockBase>,
}

impl SpyFacade {
    /// Get the interceptor record for a member, creating it on first touch
    ///
    /// Symbol keys fail: the recording primitives are string-keyed, and the
    /// inspection surface has no sensible degraded behavior.
    pub fn get(&self, key: impl Into<Key>) -> MockResult<Arc<Record>> {
        match key.into() {
            Key::Name(name) => Ok(self.base.registry.ensure(&name)),
            Key::Symbol(sym) => Err(MockError::SymbolNamed(sym.to_string())),
        }
    }

    /// Writing through the inspection surface always fails
    ///
    /// Interceptor behavior is configured through the spy handles inside a
    /// record, never by replacing the record itself.
    pub fn set(&self, key: impl Into<Key>, _value: impl Into<Value>) -> MockResult<()> {
        Err(MockError::ImmutableRecord(key.into().to_string()))
    }

    /// Check whether two facades inspect the same mock
    pub fn ptr_eq(&self, other: &SpyFacade) -> bool {
        Arc::ptr_eq(&self.base, &other.base)
    }
}

impl fmt::Debug for SpyFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyFacade")
            .field("prototype", &self.base.registry.prototype().name())
            .finish()
    }
}

/// The factory: the sole public entry point
pub struct MockFactory;

impl MockFactory {
    /// Create a mock object exposing the same shape as the blueprint
    ///
    /// Accepts anything resolvable to a prototype: a [`Class`] value or a
    /// plain `Arc<Prototype>` used directly as the shape reference. Each
    /// call builds an entirely independent registry and surface pair.
    ///
    /// [`Class`]: crate::blueprint::Class
    pub fn create<B: Blueprint>(blueprint: &B) -> Mock {
        Mock {
            base: Arc::new(MockBase {
                registry: Registry::new(blueprint.prototype()),
            }),
        }
    }
}
