//! Property store behavior
//!
//! [`PropertyStore`] keeps the name → value mapping of a dynamic object.
//! [`Properties`] is the bulk view over that mapping: it aliases the live
//! storage, so every clone observes and mutates the same state. Use
//! [`Properties::snapshot`] for a detached copy.

use crate::arguments::Arguments;
use crate::behavior::{Behavior, Capabilities, Capability, Outcome};
use crate::error::Result;
use crate::operation::Operation;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Live, shared view of a property map
///
/// Keys are case-sensitive and keep insertion order. Each call takes the
/// lock for the duration of one map access only.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    inner: Arc<RwLock<IndexMap<String, Value>>>,
}

impl Properties {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().get(key).cloned()
    }

    /// Insert or overwrite, returning the previous value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.write().insert(key.into(), value.into())
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.write().shift_remove(key)
    }

    /// Insert every pair, in order
    pub fn extend<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let entries: Vec<(String, Value)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.inner.write().extend(entries);
    }

    /// Check if `key` is stored
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Keys in insertion order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Number of stored properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if no properties are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Detached copy of the current contents
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.inner.read().clone()
    }

    /// Check if both views alias the same storage
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Behavior storing named properties
///
/// # Characteristics
/// - Get claims stored names, declines unknown ones
/// - Set always claims (insert or overwrite) and returns the value
/// - Delete claims only names that existed
/// - Invoke acts as a fluent accessor: no arguments reads, one positional
///   argument writes and returns the receiver
///
/// A store is stateful: give each object its own instance rather than sharing
/// one between objects that should be independent.
#[derive(Debug, Default)]
pub struct PropertyStore {
    properties: Properties,
}

impl PropertyStore {
    /// Behavior name reported to the chain
    pub const NAME: &'static str = "properties";

    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store over an existing view
    #[inline]
    #[must_use]
    pub fn from_properties(properties: Properties) -> Self {
        Self { properties }
    }

    /// Bulk view aliasing the live mapping
    #[inline]
    #[must_use]
    pub fn properties(&self) -> Properties {
        self.properties.clone()
    }
}

impl Behavior for PropertyStore {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
            .with(Capability::HandlesGet)
            .with(Capability::HandlesSet)
            .with(Capability::HandlesInvoke)
            .with(Capability::HandlesDelete)
            .with(Capability::EnumeratesMembers)
            .with(Capability::Counts)
    }

    fn get_member(&self, _operation: &Operation<'_>, name: &str) -> Result<Outcome> {
        Ok(match self.properties.get(name) {
            Some(value) => Outcome::Handled(value),
            None => Outcome::Declined,
        })
    }

    fn set_member(&self, _operation: &Operation<'_>, name: &str, value: &Value) -> Result<Outcome> {
        self.properties.insert(name, value.clone());
        Ok(Outcome::Handled(value.clone()))
    }

    fn invoke_member(
        &self,
        operation: &Operation<'_>,
        name: &str,
        arguments: &Arguments,
    ) -> Result<Outcome> {
        match (arguments.len(), arguments.first()) {
            (0, _) => self.get_member(operation, name),
            (1, Some(value)) => {
                self.properties.insert(name, value.clone());
                let result = match operation.receiver() {
                    Some(receiver) => Value::Object(receiver.clone()),
                    None => value.clone(),
                };
                Ok(Outcome::Handled(result))
            }
            _ => Ok(Outcome::Declined),
        }
    }

    fn delete_member(&self, _operation: &Operation<'_>, name: &str) -> Result<Outcome> {
        Ok(match self.properties.remove(name) {
            Some(removed) => Outcome::Handled(removed),
            None => Outcome::Declined,
        })
    }

    fn members(&self) -> Vec<String> {
        self.properties.keys()
    }

    fn count(&self) -> Option<usize> {
        Some(self.properties.len())
    }

    fn as_property_store(&self) -> Option<&PropertyStore> {
        Some(self)
    }
}
