//! Call-recording spies
//!
//! A [`Spy`] is a callable that records every invocation and can be told,
//! at any time, what to do on future calls. Spies back every intercepted
//! member of a mock: function members are one spy, property members are a
//! getter/setter pair.
//!
//! Recording and configuration are independent: reconfiguring a spy never
//! touches its call history, and resetting the history never touches its
//! behavior.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::value::Value;

/// One recorded invocation of a spy
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// The arguments the call was made with, in order
    pub args: Vec<Value>,
}

/// What a spy does when invoked
enum Behavior {
    /// Return `Undefined` (the default)
    Stub,
    /// Return a fixed value
    Return(Value),
    /// Run a caller-supplied function
    Fake(Box<dyn FnMut(&[Value]) -> Value + Send>),
}

struct SpyInner {
    name: String,
    calls: Mutex<Vec<CallRecord>>,
    behavior: Mutex<Behavior>,
}

/// A call-recording, behavior-configurable callable
///
/// Cloning is cheap and clones share the same underlying spy: calls recorded
/// through one handle are visible through all of them. [`Spy::ptr_eq`]
/// exposes that identity.
#[derive(Clone)]
pub struct Spy {
    inner: Arc<SpyInner>,
}

impl Spy {
    /// Create a named spy with default behavior (every call returns
    /// `Undefined`)
    pub fn named(name: impl Into<String>) -> Self {
        Spy {
            inner: Arc::new(SpyInner {
                name: name.into(),
                calls: Mutex::new(Vec::new()),
                behavior: Mutex::new(Behavior::Stub),
            }),
        }
    }

    /// The name the spy was created with
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Invoke the spy: record the call, then run the configured behavior
    pub fn call(&self, args: &[Value]) -> Value {
        self.inner.calls.lock().push(CallRecord {
            args: args.to_vec(),
        });

        let mut behavior = self.inner.behavior.lock();
        match &mut *behavior {
            Behavior::Stub => Value::Undefined,
            Behavior::Return(value) => value.clone(),
            Behavior::Fake(f) => f(args),
        }
    }

    /// Make future calls return a fixed value
    ///
    /// Legal at any time; calls already recorded are unaffected.
    pub fn and_return(&self, value: impl Into<Value>) {
        *self.inner.behavior.lock() = Behavior::Return(value.into());
    }

    /// Make future calls run the given function
    pub fn and_call_fake(&self, f: impl FnMut(&[Value]) -> Value + Send + 'static) {
        *self.inner.behavior.lock() = Behavior::Fake(Box::new(f));
    }

    /// Restore the default behavior (return `Undefined`)
    pub fn and_stub(&self) {
        *self.inner.behavior.lock() = Behavior::Stub;
    }

    /// Whether the spy has been called at least once
    pub fn was_called(&self) -> bool {
        !self.inner.calls.lock().is_empty()
    }

    /// Number of recorded calls
    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().len()
    }

    /// Whether any recorded call was made with exactly these arguments
    pub fn was_called_with(&self, args: &[Value]) -> bool {
        self.inner.calls.lock().iter().any(|call| call.args == args)
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.calls.lock().clone()
    }

    /// The most recently recorded call, if any
    pub fn most_recent_call(&self) -> Option<CallRecord> {
        self.inner.calls.lock().last().cloned()
    }

    /// Clear the recorded history without touching the configured behavior
    pub fn reset(&self) {
        self.inner.calls.lock().clear();
    }

    /// Check whether two handles refer to the same underlying spy
    pub fn ptr_eq(&self, other: &Spy) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wrap this spy as a [`Callable`](crate::value::Callable) value
    ///
    /// Invoking the callable records on this spy.
    pub fn as_callable(&self) -> crate::value::Callable {
        let spy = self.clone();
        crate::value::Callable::new(move |args| spy.call(args))
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spy")
            .field("name", &self.inner.name)
            .field("call_count", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spy_default_returns_undefined() {
        let spy = Spy::named("noop");
        assert_eq!(spy.call(&[]), Value::Undefined);
        assert_eq!(spy.call(&[Value::from(1)]), Value::Undefined);
    }

    #[test]
    fn test_spy_records_calls_in_order() {
        let spy = Spy::named("recorded");
        assert!(!spy.was_called());

        spy.call(&[Value::from("a")]);
        spy.call(&[Value::from("b"), Value::from(2)]);

        assert!(spy.was_called());
        assert_eq!(spy.call_count(), 2);
        let calls = spy.calls();
        assert_eq!(calls[0].args, vec![Value::from("a")]);
        assert_eq!(calls[1].args, vec![Value::from("b"), Value::from(2)]);
        assert_eq!(
            spy.most_recent_call().map(|c| c.args),
            Some(vec![Value::from("b"), Value::from(2)])
        );
    }

    #[test]
    fn test_spy_was_called_with() {
        let spy = Spy::named("args");
        spy.call(&[Value::from("x")]);
        assert!(spy.was_called_with(&[Value::from("x")]));
        assert!(!spy.was_called_with(&[Value::from("y")]));
        assert!(!spy.was_called_with(&[]));
    }

    #[test]
    fn test_spy_configure_before_first_call() {
        let spy = Spy::named("configured");
        spy.and_return(Value::from(999));
        assert_eq!(spy.call(&[]), Value::from(999));
        assert_eq!(spy.call(&[]), Value::from(999));
    }

    #[test]
    fn test_spy_reconfigure_after_calls() {
        let spy = Spy::named("reconfigured");
        assert_eq!(spy.call(&[]), Value::Undefined);

        spy.and_return(Value::from(111));
        assert_eq!(spy.call(&[]), Value::from(111));

        spy.and_return(Value::from(999));
        assert_eq!(spy.call(&[]), Value::from(999));

        // history kept all three calls
        assert_eq!(spy.call_count(), 3);
    }

    #[test]
    fn test_spy_call_fake_sees_arguments() {
        let spy = Spy::named("fake");
        spy.and_call_fake(|args| args.first().cloned().unwrap_or(Value::Undefined));
        assert_eq!(spy.call(&[Value::from("echo")]), Value::from("echo"));
        assert_eq!(spy.call(&[]), Value::Undefined);
    }

    #[test]
    fn test_spy_and_stub_restores_default() {
        let spy = Spy::named("stubbed");
        spy.and_return(Value::from(1));
        spy.and_stub();
        assert_eq!(spy.call(&[]), Value::Undefined);
    }

    #[test]
    fn test_spy_reset_clears_history_not_behavior() {
        let spy = Spy::named("reset");
        spy.and_return(Value::from(5));
        spy.call(&[]);
        spy.reset();

        assert_eq!(spy.call_count(), 0);
        assert!(!spy.was_called());
        assert_eq!(spy.call(&[]), Value::from(5));
    }

    #[test]
    fn test_spy_clones_share_state() {
        let spy = Spy::named("shared");
        let other = spy.clone();

        other.call(&[Value::from(1)]);
        assert_eq!(spy.call_count(), 1);
        assert!(spy.ptr_eq(&other));
        assert!(!spy.ptr_eq(&Spy::named("shared")));
    }

    #[test]
    fn test_spy_as_callable_records() {
        let spy = Spy::named("callable");
        spy.and_return(Value::from(7));
        let callable = spy.as_callable();

        assert_eq!(callable.invoke(&[Value::from("arg")]), Value::from(7));
        assert!(spy.was_called_with(&[Value::from("arg")]));
    }
}
