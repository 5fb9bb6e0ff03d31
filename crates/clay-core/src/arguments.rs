//! Argument packs
//!
//! Describes the arguments of one invocation independently of whichever
//! behavior ends up handling it, so dispatch code never special-cases arity.

use crate::value::Value;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static EMPTY: Lazy<Arguments> = Lazy::new(|| Arguments {
    positional: Arc::from(Vec::new()),
    named: None,
});

/// Immutable positional and named call arguments
///
/// Cloning is cheap; the payload is shared. The empty pack is a process-wide
/// singleton obtained from [`Arguments::empty`].
#[derive(Debug, Clone)]
pub struct Arguments {
    positional: Arc<[Value]>,
    named: Option<Arc<IndexMap<String, Value>>>,
}

impl Arguments {
    /// Shared zero-argument pack
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Create pack from positional and named values
    #[must_use]
    pub fn new<P, N>(positional: P, named: N) -> Self
    where
        P: IntoIterator<Item = Value>,
        N: IntoIterator<Item = (String, Value)>,
    {
        let positional: Vec<Value> = positional.into_iter().collect();
        let named: IndexMap<String, Value> = named.into_iter().collect();

        if positional.is_empty() && named.is_empty() {
            return Self::empty();
        }

        Self {
            positional: Arc::from(positional),
            named: (!named.is_empty()).then(|| Arc::new(named)),
        }
    }

    /// Create pack from positional values only
    #[must_use]
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(values.into_iter().map(Into::into), std::iter::empty())
    }

    /// Create one-argument pack
    #[inline]
    #[must_use]
    pub fn single(value: impl Into<Value>) -> Self {
        Self::positional([value.into()])
    }

    /// Total number of arguments, positional and named
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.as_ref().map_or(0, |n| n.len())
    }

    /// Check for zero arguments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional argument at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// First positional argument
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.positional.first()
    }

    /// Positional arguments in call order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.positional
    }

    /// Iterate positional arguments
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.positional.iter()
    }

    /// Named argument by name
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.named.as_ref().and_then(|n| n.get(name))
    }

    /// Names of named arguments in call order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named
            .iter()
            .flat_map(|n| n.keys().map(String::as_str))
    }

    /// Check whether this pack shares the empty singleton
    #[must_use]
    pub fn is_shared_empty(&self) -> bool {
        Arc::ptr_eq(&self.positional, &EMPTY.positional) && self.named.is_none()
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Arguments {
    fn eq(&self, other: &Self) -> bool {
        self.positional == other.positional
            && self.named.as_deref() == other.named.as_deref()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values, std::iter::empty())
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter, std::iter::empty())
    }
}
