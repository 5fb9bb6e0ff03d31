//! Behavior chain
//!
//! Provides [`BehaviorChain`], the ordered composite that dispatches every
//! operation of a dynamic object.
//!
//! # Dispatch
//!
//! Behaviors are consulted in registration order. The first one to claim an
//! operation wins and later behaviors are not asked. A failing behavior ends
//! the dispatch with its error. Only when every behavior declines does the
//! operation's fallback run, exactly once.

use crate::behavior::{Behavior, Capabilities, Capability, Outcome};
use crate::error::Result;
use crate::operation::Operation;
use crate::property::PropertyStore;
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered, first-match composite of behaviors
///
/// Behaviors are shared (`Arc`), so stateless behaviors can be reused by many
/// objects. The order is fixed once the chain is built. The chain is itself a
/// [`Behavior`] and nests: an inner chain declines when all of its members
/// decline, and the outer chain carries on.
#[derive(Debug, Clone, Default)]
pub struct BehaviorChain {
    behaviors: Vec<Arc<dyn Behavior>>,
}

impl BehaviorChain {
    /// Create empty chain (every dispatch falls back)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            behaviors: Vec::new(),
        }
    }

    /// Create chain from shared behaviors, keeping their order
    #[must_use]
    pub fn from_behaviors<I>(behaviors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Behavior>>,
    {
        Self {
            behaviors: behaviors.into_iter().collect(),
        }
    }

    /// Append a behavior while building
    #[must_use]
    pub fn with(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    /// Append a shared behavior while building
    #[must_use]
    pub fn with_shared(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Number of behaviors (nested chains count once)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Check if chain is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Iterate behaviors in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Behavior>> {
        self.behaviors.iter()
    }

    /// Behavior names in dispatch order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    /// Run the operation through the chain, falling back if nobody claims it
    ///
    /// # Errors
    /// The first behavior failure, or the fallback's own error.
    pub fn dispatch(&self, operation: Operation<'_>) -> Result<Value> {
        match self.attempt(&operation)? {
            Outcome::Handled(value) => Ok(value),
            Outcome::Declined => {
                debug!(
                    kind = ?operation.kind(),
                    member = ?operation.member(),
                    "no behavior claimed operation, running fallback"
                );
                operation.run_fallback()
            }
        }
    }

    /// First property store in dispatch order, searching nested chains
    #[must_use]
    pub fn property_store(&self) -> Option<&PropertyStore> {
        self.behaviors.iter().find_map(|b| b.as_property_store())
    }
}

impl Behavior for BehaviorChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn capabilities(&self) -> Capabilities {
        self.behaviors
            .iter()
            .fold(Capabilities::NONE, |caps, b| caps.union(b.capabilities()))
    }

    fn attempt(&self, operation: &Operation<'_>) -> Result<Outcome> {
        let kind = operation.kind();
        for behavior in &self.behaviors {
            if !behavior.capabilities().supports(kind) {
                continue;
            }

            trace!(behavior = behavior.name(), ?kind, member = ?operation.member(), "attempting");

            match behavior.attempt(operation) {
                Ok(Outcome::Handled(value)) => {
                    debug!(behavior = behavior.name(), ?kind, member = ?operation.member(), "claimed");
                    return Ok(Outcome::Handled(value));
                }
                Ok(Outcome::Declined) => {}
                Err(e) => {
                    debug!(behavior = behavior.name(), ?kind, error = %e, "behavior failed");
                    return Err(e);
                }
            }
        }
        Ok(Outcome::Declined)
    }

    fn members(&self) -> Vec<String> {
        let mut seen = indexmap::IndexSet::new();
        for behavior in &self.behaviors {
            if behavior
                .capabilities()
                .contains(Capability::EnumeratesMembers)
            {
                seen.extend(behavior.members());
            }
        }
        seen.into_iter().collect()
    }

    fn count(&self) -> Option<usize> {
        self.behaviors
            .iter()
            .filter(|b| b.capabilities().contains(Capability::Counts))
            .find_map(|b| b.count())
    }

    fn as_property_store(&self) -> Option<&PropertyStore> {
        self.property_store()
    }
}

impl FromIterator<Arc<dyn Behavior>> for BehaviorChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Behavior>>>(iter: I) -> Self {
        Self::from_behaviors(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClayError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Fixed {
        name: &'static str,
        answer: i64,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, answer: i64) -> Self {
            Self {
                name,
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Behavior for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::NONE
                .with(Capability::HandlesGet)
                .with(Capability::EnumeratesMembers)
        }

        fn get_member(&self, _operation: &Operation<'_>, _name: &str) -> Result<Outcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::handled(self.answer))
        }

        fn members(&self) -> Vec<String> {
            vec![self.name.to_string(), "shared".to_string()]
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Behavior for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::NONE.with(Capability::HandlesGet)
        }

        fn get_member(&self, _operation: &Operation<'_>, name: &str) -> Result<Outcome> {
            Err(ClayError::behavior("broken", format!("cannot read {name}")))
        }
    }

    #[test]
    fn empty_chain_falls_back() {
        let chain = BehaviorChain::new();
        let err = chain.dispatch(Operation::get_member("x")).unwrap_err();
        assert!(err.is_missing_member());
    }

    #[test]
    fn first_claim_wins() {
        let a = Arc::new(Fixed::new("a", 1));
        let b = Arc::new(Fixed::new("b", 2));
        let chain = BehaviorChain::new()
            .with_shared(a.clone())
            .with_shared(b.clone());

        for _ in 0..5 {
            let v = chain.dispatch(Operation::get_member("x")).unwrap();
            assert_eq!(v, Value::Int(1));
        }
        assert_eq!(a.calls.load(Ordering::SeqCst), 5);
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn incapable_behaviors_are_skipped() {
        let chain = BehaviorChain::new().with(Fixed::new("a", 1));
        let op = Operation::set_member("x", 1).with_fallback(|| Ok(Value::from("fallback")));
        assert_eq!(chain.dispatch(op).unwrap(), Value::from("fallback"));
    }

    #[test]
    fn failure_is_terminal() {
        let later = Arc::new(Fixed::new("later", 7));
        let chain = BehaviorChain::new().with(Broken).with_shared(later.clone());

        let err = chain.dispatch(Operation::get_member("x")).unwrap_err();
        assert!(matches!(err, ClayError::Behavior { .. }));
        assert_eq!(later.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn nested_chain_declines_to_outer() {
        let inner = BehaviorChain::new();
        let chain = BehaviorChain::new().with(inner).with(Fixed::new("outer", 3));
        assert_eq!(chain.dispatch(Operation::get_member("x")).unwrap(), Value::Int(3));
    }

    #[test]
    fn nested_chain_claims_first() {
        let inner = BehaviorChain::new().with(Fixed::new("inner", 9));
        let chain = BehaviorChain::new().with(inner).with(Fixed::new("outer", 3));
        assert_eq!(chain.dispatch(Operation::get_member("x")).unwrap(), Value::Int(9));
        assert_eq!(chain.names(), vec!["chain", "outer"]);
    }

    #[test]
    fn members_deduplicated_in_first_reporter_order() {
        let chain = BehaviorChain::new()
            .with(Fixed::new("b", 1))
            .with(Fixed::new("a", 2));
        assert_eq!(chain.members(), vec!["b", "shared", "a"]);
    }

    #[test]
    fn capabilities_are_union() {
        let chain = BehaviorChain::new().with(Fixed::new("a", 1)).with(Broken);
        let caps = chain.capabilities();
        assert!(caps.contains(Capability::HandlesGet));
        assert!(caps.contains(Capability::EnumeratesMembers));
        assert!(!caps.contains(Capability::HandlesSet));
        assert!(BehaviorChain::new().capabilities().is_empty());
    }

    #[test]
    fn count_absent_without_counter() {
        let chain = BehaviorChain::new().with(Fixed::new("a", 1));
        assert_eq!(chain.count(), None);
        assert!(chain.property_store().is_none());
    }
}
