//! Stub storage object and accessor watching
//!
//! Every mock owns one [`PropertyBag`]: the storage object holding its live
//! member slots. A slot is either plain data or accessor-based; reads and
//! writes of an accessor slot route through installed [`Spy`] watchers, so
//! every touch is recorded and reconfigurable.
//!
//! Watching follows the accessor-watcher contract: the target slot must be
//! pre-declared accessor-based before a watcher can be installed, and each
//! direction (get/set) accepts at most one watcher.

use std::fmt;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::spy::Spy;
use crate::value::Value;

/// Which side of an accessor a watcher intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// Intercept reads
    Get,
    /// Intercept writes
    Set,
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKind::Get => write!(f, "get"),
            AccessorKind::Set => write!(f, "set"),
        }
    }
}

/// Accessor-watch installation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WatchError {
    /// The slot was never declared on the storage object
    #[error("`{0}` is not declared on the storage object")]
    Undeclared(String),

    /// The slot holds plain data and has no accessors to watch
    #[error("`{0}` is a data slot; only accessor slots can be watched")]
    NotAnAccessor(String),

    /// A watcher for that direction is already installed
    #[error("`{name}` already has a {kind} watcher installed")]
    AlreadyWatched {
        /// The slot name
        name: String,
        /// The direction that was already watched
        kind: AccessorKind,
    },
}

enum Slot {
    Data(Value),
    Accessor { get: Option<Spy>, set: Option<Spy> },
}

/// A mock's internal storage object
///
/// Owns the live value of every touched member. Exclusively owned by one
/// mock instance; nothing is shared across mocks.
pub struct PropertyBag {
    slots: Mutex<FxHashMap<String, Slot>>,
}

impl PropertyBag {
    /// Create an empty storage object
    pub fn new() -> Self {
        PropertyBag {
            slots: Mutex::new(FxHashMap::default()),
        }
    }

    /// Declare a plain data slot holding `value`
    ///
    /// Replaces any existing slot of the same name.
    pub fn define_data(&self, name: &str, value: Value) {
        self.slots
            .lock()
            .insert(name.to_string(), Slot::Data(value));
    }

    /// Declare an accessor slot with no watchers installed yet
    ///
    /// Until watchers are installed the slot is inert: reads return
    /// `Undefined` and writes are dropped. Replaces any existing slot of the
    /// same name.
    pub fn define_accessor(&self, name: &str) {
        self.slots.lock().insert(
            name.to_string(),
            Slot::Accessor {
                get: None,
                set: None,
            },
        );
    }

    /// Whether a slot of this name has been declared
    pub fn contains(&self, name: &str) -> bool {
        self.slots.lock().contains_key(name)
    }

    /// Install a recording watcher on one side of an accessor slot
    ///
    /// Returns the installed [`Spy`]; its default behavior returns
    /// `Undefined`, so callers wire up the real read/write behavior through
    /// `and_call_fake`. Fails if the slot is undeclared, data-backed, or
    /// already watched in that direction.
    pub fn watch(&self, name: &str, kind: AccessorKind) -> Result<Spy, WatchError> {
        let mut slots = self.slots.lock();
        match slots.get_mut(name) {
            None => Err(WatchError::Undeclared(name.to_string())),
            Some(Slot::Data(_)) => Err(WatchError::NotAnAccessor(name.to_string())),
            Some(Slot::Accessor { get, set }) => {
                let side = match kind {
                    AccessorKind::Get => get,
                    AccessorKind::Set => set,
                };
                if side.is_some() {
                    return Err(WatchError::AlreadyWatched {
                        name: name.to_string(),
                        kind,
                    });
                }
                let spy = Spy::named(format!("{}.{}", name, kind));
                *side = Some(spy.clone());
                Ok(spy)
            }
        }
    }

    /// Read a slot
    ///
    /// Data slots return their value, accessor slots route through the
    /// getter watcher, undeclared names read as `Undefined`.
    pub fn read(&self, name: &str) -> Value {
        let getter = {
            let slots = self.slots.lock();
            match slots.get(name) {
                None => return Value::Undefined,
                Some(Slot::Data(value)) => return value.clone(),
                Some(Slot::Accessor { get, .. }) => match get {
                    None => return Value::Undefined,
                    Some(spy) => spy.clone(),
                },
            }
        };
        // invoke outside the slot lock: watcher behavior is caller code
        getter.call(&[])
    }

    /// Write a slot
    ///
    /// Accessor slots route through the setter watcher (the value is the
    /// single call argument); data slots and undeclared names take the value
    /// as plain data.
    pub fn write(&self, name: &str, value: Value) {
        let setter = {
            let mut slots = self.slots.lock();
            match slots.get(name) {
                None | Some(Slot::Data(_)) => {
                    slots.insert(name.to_string(), Slot::Data(value));
                    return;
                }
                Some(Slot::Accessor { set, .. }) => match set {
                    // declared accessor without a setter watcher: dropped
                    None => return,
                    Some(spy) => spy.clone(),
                },
            }
        };
        setter.call(&[value]);
    }
}

impl Default for PropertyBag {
    fn default() -> Self {
        PropertyBag::new()
    }
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBag")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_slot_read_write() {
        let bag = PropertyBag::new();
        assert_eq!(bag.read("missing"), Value::Undefined);

        bag.write("field", Value::from("a"));
        assert_eq!(bag.read("field"), Value::from("a"));

        bag.write("field", Value::from("b"));
        assert_eq!(bag.read("field"), Value::from("b"));
    }

    #[test]
    fn test_accessor_slot_routes_through_watchers() {
        let bag = PropertyBag::new();
        bag.define_accessor("prop");

        let get = bag.watch("prop", AccessorKind::Get).unwrap();
        let set = bag.watch("prop", AccessorKind::Set).unwrap();
        get.and_return(Value::from("seen"));

        assert_eq!(bag.read("prop"), Value::from("seen"));
        bag.write("prop", Value::from("stored"));

        assert_eq!(get.call_count(), 1);
        assert!(set.was_called_with(&[Value::from("stored")]));
    }

    #[test]
    fn test_inert_accessor_slot() {
        let bag = PropertyBag::new();
        bag.define_accessor("quiet");
        assert_eq!(bag.read("quiet"), Value::Undefined);
        bag.write("quiet", Value::from(1));
        assert_eq!(bag.read("quiet"), Value::Undefined);
    }

    #[test]
    fn test_watch_requires_declared_accessor() {
        let bag = PropertyBag::new();
        assert_eq!(
            bag.watch("ghost", AccessorKind::Get).unwrap_err(),
            WatchError::Undeclared("ghost".to_string())
        );

        bag.define_data("plain", Value::Null);
        assert_eq!(
            bag.watch("plain", AccessorKind::Set).unwrap_err(),
            WatchError::NotAnAccessor("plain".to_string())
        );
    }

    #[test]
    fn test_watch_rejects_double_install() {
        let bag = PropertyBag::new();
        bag.define_accessor("prop");
        bag.watch("prop", AccessorKind::Get).unwrap();

        assert_eq!(
            bag.watch("prop", AccessorKind::Get).unwrap_err(),
            WatchError::AlreadyWatched {
                name: "prop".to_string(),
                kind: AccessorKind::Get,
            }
        );
        // the other direction is still free
        assert!(bag.watch("prop", AccessorKind::Set).is_ok());
    }

    #[test]
    fn test_redefining_replaces_slot() {
        let bag = PropertyBag::new();
        bag.define_data("x", Value::from(1));
        bag.define_accessor("x");
        assert_eq!(bag.read("x"), Value::Undefined);
    }
}
