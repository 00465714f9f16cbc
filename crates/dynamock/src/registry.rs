//! Interceptor registry
//!
//! The registry owns the mapping from member name to interceptor record and
//! the lazy-creation policy behind it. On first touch of a name, from
//! either surface, the registry classifies the member against the
//! prototype and materializes the matching record exactly once; every later
//! touch observes that same record.
//!
//! Classification is prototype-derived, not touch-derived: a name the
//! prototype declares callable is function-kind even before anything reads
//! or calls it.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::blueprint::{Member, Prototype};
use crate::object::{AccessorKind, PropertyBag};
use crate::spy::Spy;
use crate::value::Value;
use crate::{MockError, MockResult};

/// The fixed kind of an interceptor record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A callable member backed by one permanent call spy
    Function,
    /// A readable/writable member backed by a getter/setter spy pair
    Property,
}

/// One member's interceptor record
///
/// Created lazily on first touch and owned by the registry for the life of
/// the mock; the kind never changes after creation. The spy handles for the
/// record's kind are reachable through [`func`](Record::func),
/// [`get`](Record::get) and [`set`](Record::set); asking for a handle the
/// kind does not have is a configuration error.
pub struct Record {
    name: String,
    kind: MemberKind,
    func: Option<Spy>,
    get: Option<Spy>,
    set: Option<Spy>,
    /// Default storage: what the default getter returns and the default
    /// setter writes, until the user overrides either behavior.
    cell: Arc<Mutex<Value>>,
}

impl Record {
    /// The member name this record intercepts
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record's kind, fixed at creation
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The call spy of a function-kind record
    ///
    /// Fails with [`MockError::NoCallSurface`] on a property-kind record.
    pub fn func(&self) -> MockResult<Spy> {
        match &self.func {
            Some(spy) => Ok(spy.clone()),
            None => Err(MockError::NoCallSurface(self.name.clone())),
        }
    }

    /// The getter spy of a property-kind record
    ///
    /// Fails with [`MockError::NoAccessorSurface`] on a function-kind record.
    pub fn get(&self) -> MockResult<Spy> {
        match &self.get {
            Some(spy) => Ok(spy.clone()),
            None => Err(MockError::NoAccessorSurface {
                name: self.name.clone(),
                handle: "_get",
            }),
        }
    }

    /// The setter spy of a property-kind record
    ///
    /// Fails with [`MockError::NoAccessorSurface`] on a function-kind record.
    pub fn set(&self) -> MockResult<Spy> {
        match &self.set {
            Some(spy) => Ok(spy.clone()),
            None => Err(MockError::NoAccessorSurface {
                name: self.name.clone(),
                handle: "_set",
            }),
        }
    }

    /// Current contents of the default-storage cell
    ///
    /// This is what the default getter behavior returns: the value the
    /// setter most recently received, `Undefined` before any write. Custom
    /// getter/setter behaviors bypass the cell entirely.
    pub fn stored(&self) -> Value {
        self.cell.lock().clone()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Member-name to interceptor-record table with lazy exactly-once creation
///
/// One registry per mock, bound to one prototype, exclusively owned by the
/// pair of surfaces routed through it.
pub struct Registry {
    prototype: Arc<Prototype>,
    records: Mutex<FxHashMap<String, Arc<Record>>>,
    stub: PropertyBag,
}

impl Registry {
    /// Create an empty registry bound to a prototype
    pub fn new(prototype: Arc<Prototype>) -> Self {
        Registry {
            prototype,
            records: Mutex::new(FxHashMap::default()),
            stub: PropertyBag::new(),
        }
    }

    /// The prototype this registry classifies against
    pub fn prototype(&self) -> &Arc<Prototype> {
        &self.prototype
    }

    /// The storage object holding the live member slots
    pub fn stub(&self) -> &PropertyBag {
        &self.stub
    }

    /// Prototype-derived classification without touching records
    ///
    /// Backs the replacement rule: a function-kind name rejects writes even
    /// before its record exists.
    pub fn is_function(&self, name: &str) -> bool {
        self.classify(name) == MemberKind::Function
    }

    fn classify(&self, name: &str) -> MemberKind {
        match self.prototype.lookup(name) {
            Some(Member::Method) => MemberKind::Function,
            Some(Member::Data(value)) if value.is_callable() => MemberKind::Function,
            Some(Member::Accessor { get: Some(body), .. }) => match body() {
                Ok(value) if value.is_callable() => MemberKind::Function,
                // a getter that fails here reads state that is not set up
                // yet; recover by treating the member as a property
                _ => MemberKind::Property,
            },
            _ => MemberKind::Property,
        }
    }

    /// Get the record for `name`, classifying and creating it on first touch
    ///
    /// Idempotent: repeated calls return the same record, and the records
    /// table stays locked across classification so the two surfaces can
    /// never race a record into existence twice.
    pub fn ensure(&self, name: &str) -> Arc<Record> {
        let mut records = self.records.lock();
        if let Some(record) = records.get(name) {
            return record.clone();
        }

        let record = match self.classify(name) {
            MemberKind::Function => self.create_function(name),
            MemberKind::Property => self.create_property(name),
        };
        records.insert(name.to_string(), record.clone());
        record
    }

    fn create_function(&self, name: &str) -> Arc<Record> {
        let spy = Spy::named(name);
        // the live value test code reads and calls; permanent for the life
        // of the mock
        self.stub
            .define_data(name, Value::Callable(spy.as_callable()));
        Arc::new(Record {
            name: name.to_string(),
            kind: MemberKind::Function,
            func: Some(spy),
            get: None,
            set: None,
            cell: Arc::new(Mutex::new(Value::Undefined)),
        })
    }

    fn create_property(&self, name: &str) -> Arc<Record> {
        self.stub.define_accessor(name);
        let get = self
            .stub
            .watch(name, AccessorKind::Get)
            .expect("accessor slot declared above");
        let set = self
            .stub
            .watch(name, AccessorKind::Set)
            .expect("accessor slot declared above");

        // by default the getter returns whatever the setter most recently
        // received; either side can be overridden independently later
        let cell = Arc::new(Mutex::new(Value::Undefined));
        let read_cell = cell.clone();
        get.and_call_fake(move |_| read_cell.lock().clone());
        let write_cell = cell.clone();
        set.and_call_fake(move |args| {
            *write_cell.lock() = args.first().cloned().unwrap_or(Value::Undefined);
            Value::Undefined
        });

        Arc::new(Record {
            name: name.to_string(),
            kind: MemberKind::Property,
            func: None,
            get: Some(get),
            set: Some(set),
            cell,
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("prototype", &self.prototype.name())
            .field("records", &self.records.lock().len())
            .finish()
    }
}
