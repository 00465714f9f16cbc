//! Dynamic test-double factory
//!
//! This crate manufactures mock objects from an explicit shape description:
//! every member of the shape, callable or property, is backed by a
//! recording, reconfigurable [`Spy`], created lazily on first touch. Test
//! code interacts with the mock through its value surface ([`Mock`]) and
//! configures/asserts through the inspection surface ([`SpyFacade`]).
//!
//! # Example
//!
//! ```
//! use dynamock::{MockFactory, Prototype, Value};
//!
//! let proto = Prototype::builder("Greeter")
//!     .method("greet")
//!     .data("name", Value::Undefined)
//!     .build();
//!
//! let mock = MockFactory::create(&proto);
//!
//! // properties read undefined until written
//! assert_eq!(mock.get("name"), Value::Undefined);
//! mock.set("name", "milo").unwrap();
//! assert_eq!(mock.get("name"), Value::from("milo"));
//!
//! // methods are permanent recording spies with configurable returns
//! let greet = mock.spy().get("greet").unwrap().func().unwrap();
//! greet.and_return(Value::from(42));
//! assert_eq!(mock.call("greet", &[Value::from("hi")]).unwrap(), Value::from(42));
//! assert!(greet.was_called_with(&[Value::from("hi")]));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod blueprint;
pub mod facade;
pub mod key;
pub mod object;
pub mod registry;
pub mod spy;
pub mod value;

pub use blueprint::{Blueprint, Class, Getter, Member, Prototype, PrototypeBuilder};
pub use facade::{Mock, MockFactory, SpyFacade, RESERVED_ACCESSOR};
pub use key::{Key, Symbol};
pub use object::{AccessorKind, PropertyBag, WatchError};
pub use registry::{MemberKind, Record, Registry};
pub use spy::{CallRecord, Spy};
pub use value::{Callable, Value};

/// Mock configuration errors
///
/// Raised synchronously at the point of the illegal operation, never
/// deferred. Unsupported symbol keys on the value surface are not errors;
/// they degrade with a diagnostic instead.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// The reserved inspection accessor was written
    #[error("cannot modify `{RESERVED_ACCESSOR}`; it is part of the mock factory")]
    ReservedAccessor,

    /// A record was assigned through the inspection surface
    #[error("cannot replace `{RESERVED_ACCESSOR}.{0}`; records are part of the mock factory")]
    ImmutableRecord(String),

    /// A function-kind member was assigned on the value surface
    #[error("cannot change `{0}`; the mock factory attached a permanent spy to it")]
    PermanentSpy(String),

    /// `_func` was requested on a property-kind record
    #[error("`{0}` is a property, not a function; configure its getter and setter spies via `_get` and `_set`")]
    NoCallSurface(String),

    /// `_get` or `_set` was requested on a function-kind record
    #[error("`{name}` is a function, not a property; `{handle}` does not exist, configure its call spy via `_func`")]
    NoAccessorSurface {
        /// The member name
        name: String,
        /// The handle that was requested (`_get` or `_set`)
        handle: &'static str,
    },

    /// A symbol key reached the inspection surface
    #[error("`{0}` is a symbol-named member; only string-named members expose a spy surface")]
    SymbolNamed(String),

    /// A member that does not hold a callable was invoked
    #[error("`{0}` is not a function")]
    NotCallable(String),

    /// Accessor-watch installation failed
    #[error(transparent)]
    Watch(#[from] WatchError),
}

/// Mock operation result
pub type MockResult<T> = Result<T, MockError>;
