//! Dynamic proxy object
//!
//! [`Clay`] is the user-facing handle. Every operation on it becomes an
//! [`Operation`] dispatched through the object's [`BehaviorChain`].
//!
//! Rust cannot intercept `obj.name` or `obj["key"] = v`, so the dynamic
//! surface is exposed as named methods ([`Clay::get`], [`Clay::set`],
//! [`Clay::invoke`], [`Clay::item`], [`Clay::set_item`], ...). The add- and
//! remove-property operators are available as `&obj + "key"` and
//! `&obj - "key"`; they yield `Result<Clay>` because they need a property
//! store.

use crate::arguments::Arguments;
use crate::behavior::Behavior;
use crate::chain::BehaviorChain;
use crate::config::{ClayConfig, DEFAULT_TO_STRING_MEMBER};
use crate::error::{ClayError, Result};
use crate::factory;
use crate::operation::{BinaryOperator, Conversion, Operation, UnaryOperator};
use crate::property::{Properties, PropertyStore};
use crate::value::Value;
use std::fmt;
use std::ops::{Add, Sub};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Unique identity of a dynamic object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Uuid);

impl ObjectId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

struct ClayInner {
    id: ObjectId,
    chain: BehaviorChain,
}

/// Dynamic object whose semantics come from its behavior chain
///
/// Cloning produces another handle to the same object. Equality is identity:
/// two objects with identical properties are still different objects.
///
/// Handles are reference counted. An object stored in its own properties, or
/// in the properties of anything it reaches, forms a cycle and is never freed
/// unless the key is removed (or overwritten) first.
#[derive(Clone)]
pub struct Clay {
    inner: Arc<ClayInner>,
}

impl Clay {
    /// Create object with an empty chain; every operation falls back
    #[must_use]
    pub fn new() -> Self {
        Self::with_chain(BehaviorChain::new())
    }

    /// Create object from shared behaviors, keeping their order
    #[must_use]
    pub fn with_behaviors<I>(behaviors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Behavior>>,
    {
        Self::with_chain(BehaviorChain::from_behaviors(behaviors))
    }

    /// Create object owning `chain`
    #[must_use]
    pub fn with_chain(chain: BehaviorChain) -> Self {
        Self {
            inner: Arc::new(ClayInner {
                id: ObjectId::new(),
                chain,
            }),
        }
    }

    /// Create object with a single fresh property store
    #[must_use]
    pub fn with_properties() -> Self {
        Self::with_chain(BehaviorChain::new().with(PropertyStore::new()))
    }

    /// Object identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.inner.id
    }

    /// Behavior chain of this object
    #[inline]
    #[must_use]
    pub fn behavior(&self) -> &BehaviorChain {
        &self.inner.chain
    }

    /// Check if both handles refer to the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Dispatch an operation through the chain
    ///
    /// This is the single entry point for host adapters; the named methods
    /// below are built on it.
    ///
    /// # Errors
    /// A behavior failure, or the operation's fallback error.
    pub fn dispatch(&self, operation: Operation<'_>) -> Result<Value> {
        self.inner.chain.dispatch(operation)
    }

    /// Read member `name`
    ///
    /// # Errors
    /// [`ClayError::MissingMember`] if no behavior answers.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.dispatch(Operation::get_member(name).with_receiver(self.clone()))
    }

    /// Assign member `name`, returning the assigned value
    ///
    /// # Errors
    /// [`ClayError::MissingMember`] if no behavior accepts the assignment.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<Value> {
        self.dispatch(Operation::set_member(name, value).with_receiver(self.clone()))
    }

    /// Call member `name`
    ///
    /// An unanswered `to_string` call yields the default representation.
    ///
    /// # Errors
    /// [`ClayError::MissingMember`] if no behavior answers.
    pub fn invoke(&self, name: &str, arguments: Arguments) -> Result<Value> {
        self.invoke_as(name, arguments, DEFAULT_TO_STRING_MEMBER)
    }

    /// Call member `name`, treating the configured string-conversion member
    /// like `to_string` in [`Clay::invoke`]
    ///
    /// # Errors
    /// [`ClayError::MissingMember`] if no behavior answers.
    pub fn invoke_with(
        &self,
        name: &str,
        arguments: Arguments,
        config: &ClayConfig,
    ) -> Result<Value> {
        self.invoke_as(name, arguments, &config.to_string_member)
    }

    fn invoke_as(&self, name: &str, arguments: Arguments, to_string_member: &str) -> Result<Value> {
        let op = Operation::invoke_member(name, arguments).with_receiver(self.clone());
        if name == to_string_member {
            let repr = self.default_repr();
            return self.dispatch(op.with_fallback(move || Ok(Value::Str(repr))));
        }
        self.dispatch(op)
    }

    /// Remove member `name`, returning the removed value or [`Value::Null`]
    ///
    /// # Errors
    /// A behavior failure.
    pub fn delete(&self, name: &str) -> Result<Value> {
        self.dispatch(Operation::delete_member(name).with_receiver(self.clone()))
    }

    /// Convert the object
    ///
    /// Unclaimed conversions fall back to the default semantics: text is the
    /// default representation, truthiness is `true`, anything else fails.
    ///
    /// # Errors
    /// [`ClayError::NotConvertible`] for unclaimed non-text, non-bool targets.
    pub fn convert(&self, conversion: Conversion) -> Result<Value> {
        let repr = self.default_repr();
        let op = Operation::convert(conversion)
            .with_receiver(self.clone())
            .with_fallback(move || match conversion {
                Conversion::Text => Ok(Value::Str(repr)),
                Conversion::Bool => Ok(Value::Bool(true)),
                target => Err(ClayError::NotConvertible { target }),
            });
        self.dispatch(op)
    }

    /// Apply a unary operator
    ///
    /// # Errors
    /// [`ClayError::UnsupportedOperator`] if no behavior implements it.
    pub fn unary(&self, operator: UnaryOperator) -> Result<Value> {
        self.dispatch(Operation::unary(operator).with_receiver(self.clone()))
    }

    /// Apply a binary operator with this object on the left
    ///
    /// # Errors
    /// [`ClayError::UnsupportedOperator`] if no behavior implements it.
    pub fn binary(&self, operator: BinaryOperator, rhs: impl Into<Value>) -> Result<Value> {
        self.dispatch(Operation::binary(operator, rhs).with_receiver(self.clone()))
    }

    /// Member names reported by the chain
    #[must_use]
    pub fn members(&self) -> Vec<String> {
        self.inner.chain.members()
    }

    /// Member count reported by the chain
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        self.inner.chain.count()
    }

    /// Default representation used when nothing claims string conversion
    #[must_use]
    pub fn default_repr(&self) -> String {
        format!("Clay#{}", self.inner.id)
    }

    /// String conversion through the conventional `to_string` member
    ///
    /// Non-text results become an empty string.
    ///
    /// # Errors
    /// A behavior failure while answering the member.
    pub fn to_text(&self) -> Result<String> {
        self.to_text_member(DEFAULT_TO_STRING_MEMBER)
    }

    /// String conversion through the configured member
    ///
    /// # Errors
    /// A behavior failure while answering the member.
    pub fn to_text_with(&self, config: &ClayConfig) -> Result<String> {
        self.to_text_member(&config.to_string_member)
    }

    fn to_text_member(&self, member: &str) -> Result<String> {
        Ok(match self.invoke_as(member, Arguments::empty(), member)? {
            Value::Str(text) => text,
            _ => String::new(),
        })
    }

    /// Bulk view of the first property store in the chain
    #[must_use]
    pub fn to_dictionary(&self) -> Option<Properties> {
        self.inner.chain.property_store().map(PropertyStore::properties)
    }

    /// Bulk view, failing if the chain has no property store
    ///
    /// # Errors
    /// [`ClayError::NoPropertyStore`].
    pub fn require_dictionary(&self) -> Result<Properties> {
        self.to_dictionary().ok_or(ClayError::NoPropertyStore)
    }

    /// Indexer read
    ///
    /// # Errors
    /// [`ClayError::MissingKey`] for absent keys,
    /// [`ClayError::NoPropertyStore`] without a store.
    pub fn item(&self, key: &str) -> Result<Value> {
        self.require_dictionary()?
            .get(key)
            .ok_or_else(|| ClayError::MissingKey(key.to_string()))
    }

    /// Indexer write; inserts absent keys
    ///
    /// # Errors
    /// [`ClayError::NoPropertyStore`] without a store.
    pub fn set_item(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.require_dictionary()?.insert(key, value);
        Ok(())
    }

    /// Assign a freshly vivified object to `key`; returns this object
    ///
    /// # Errors
    /// [`ClayError::NoPropertyStore`] without a store.
    pub fn add_property(&self, key: &str) -> Result<Clay> {
        self.set_item(key, factory::new_object())?;
        Ok(self.clone())
    }

    /// Remove `key` if present; returns this object
    ///
    /// # Errors
    /// [`ClayError::NoPropertyStore`] without a store.
    pub fn remove_property(&self, key: &str) -> Result<Clay> {
        self.require_dictionary()?.remove(key);
        Ok(self.clone())
    }
}

impl Default for Clay {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Clay {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Clay {}

impl fmt::Debug for Clay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clay")
            .field("id", &self.inner.id)
            .field("behaviors", &self.inner.chain.names())
            .finish()
    }
}

impl fmt::Display for Clay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => f.write_str(&text),
            Err(e) => {
                warn!(object = %self.inner.id, error = %e, "string conversion failed");
                Ok(())
            }
        }
    }
}

impl Add<&str> for &Clay {
    type Output = Result<Clay>;

    fn add(self, key: &str) -> Self::Output {
        self.add_property(key)
    }
}

impl Add<&str> for Clay {
    type Output = Result<Clay>;

    fn add(self, key: &str) -> Self::Output {
        self.add_property(key)
    }
}

impl Sub<&str> for &Clay {
    type Output = Result<Clay>;

    fn sub(self, key: &str) -> Self::Output {
        self.remove_property(key)
    }
}

impl Sub<&str> for Clay {
    type Output = Result<Clay>;

    fn sub(self, key: &str) -> Self::Output {
        self.remove_property(key)
    }
}
