//! Per-evaluation variable bindings and the property-resolution seam.
//!
//! An [`Environment`] is caller-owned, constructed fresh per evaluation, and
//! only ever *read* by the evaluator.  It resolves the first segment of an
//! identifier path; later segments go through the installed
//! [`PropertyResolver`] — the bridge to whatever object model the host has
//! (reflection, maps, records).  The crate ships one reference resolver,
//! [`MapResolver`], which understands the in-crate [`ValueMap`] host object;
//! hosts with richer object models replace it via [`Environment::set_resolver`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{EvalError, Result};
use crate::value::{HostObject, Value};

/// Host-supplied capability for walking one segment of a dotted identifier
/// path, e.g. resolving `a` against the value bound to `foo` in `foo.a`.
pub trait PropertyResolver: Send + Sync {
    fn resolve(&self, base: &Value, segment: &str) -> Result<Value>;
}

/// A string-keyed bag of values exposed to expressions as an opaque host
/// object, so that `map.key` works out of the box.
#[derive(Debug, Default)]
pub struct ValueMap {
    entries: HashMap<String, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_owned(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl<const N: usize> From<[(&str, Value); N]> for ValueMap {
    fn from(entries: [(&str, Value); N]) -> Self {
        let mut map = ValueMap::new();

        for (key, value) in entries {
            map.insert(key, value);
        }

        map
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::object(map)
    }
}

impl HostObject for ValueMap {
    fn type_name(&self) -> &str {
        "map"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Reference [`PropertyResolver`]: resolves segments against [`ValueMap`]
/// host objects and nothing else.
#[derive(Debug, Default)]
pub struct MapResolver;

impl PropertyResolver for MapResolver {
    fn resolve(&self, base: &Value, segment: &str) -> Result<Value> {
        match base {
            Value::Opaque(object) => object
                .as_any()
                .downcast_ref::<ValueMap>()
                .and_then(|map| map.get(segment).cloned())
                .ok_or_else(|| {
                    EvalError::property(format!(
                        "no property '{}' on {}",
                        segment,
                        object.type_name()
                    ))
                }),

            other => Err(EvalError::property(format!(
                "cannot access property '{}' on {}",
                segment,
                other.kind()
            ))),
        }
    }
}

/// The binding set one evaluation runs against.
pub struct Environment {
    values: HashMap<String, Value>,
    resolver: Arc<dyn PropertyResolver>,
}

impl Environment {
    /// An empty environment with the reference [`MapResolver`] installed.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            resolver: Arc::new(MapResolver),
        }
    }

    /// Bind `name` (a path *first segment*) to `value`.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    /// Look up a first segment.  Absence is reported by the evaluator as an
    /// unresolved-identifier error, never defaulted to `nil`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Replace the property resolver with a host-supplied one.
    pub fn set_resolver(&mut self, resolver: Arc<dyn PropertyResolver>) {
        self.resolver = resolver;
    }

    /// Walk one path segment beyond the first.
    pub fn resolve_property(&self, base: &Value, segment: &str) -> Result<Value> {
        self.resolver.resolve(base, segment)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
