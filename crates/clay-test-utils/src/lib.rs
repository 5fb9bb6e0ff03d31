//! Testing utilities for Clay workspace
//!
//! Shared test behaviors, fallback counters and tracing setup.

#![allow(missing_docs)]

use clay_core::{
    Behavior, BehaviorChain, Capabilities, Capability, Clay, ClayError, Operation, OperationKind,
    Outcome, PropertyStore, Result, Value,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Install a test-friendly tracing subscriber (`RUST_LOG` controls the level)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Claims every operation it is capable of with a fixed answer
#[derive(Debug)]
pub struct ScriptedBehavior {
    name: String,
    capabilities: Capabilities,
    answer: Value,
    calls: AtomicUsize,
}

impl ScriptedBehavior {
    pub fn new(name: &str, answer: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            capabilities: Capabilities::ALL,
            answer: answer.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Behavior for ScriptedBehavior {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn attempt(&self, _operation: &Operation<'_>) -> Result<Outcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Outcome::Handled(self.answer.clone()))
    }
}

/// Records what it was asked and always declines
#[derive(Debug, Default)]
pub struct RecordingBehavior {
    seen: Mutex<Vec<(OperationKind, Option<String>)>>,
}

impl RecordingBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<(OperationKind, Option<String>)> {
        self.seen.lock().clone()
    }

    pub fn seen_members(&self) -> Vec<String> {
        self.seen
            .lock()
            .iter()
            .filter_map(|(_, member)| member.clone())
            .collect()
    }
}

impl Behavior for RecordingBehavior {
    fn name(&self) -> &str {
        "recorder"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn attempt(&self, operation: &Operation<'_>) -> Result<Outcome> {
        self.seen
            .lock()
            .push((operation.kind(), operation.member().map(str::to_string)));
        Ok(Outcome::Declined)
    }
}

/// Rejects assignments that fail a predicate; passes everything else on
pub struct VetoBehavior {
    rule: Box<dyn Fn(&str, &Value) -> bool + Send + Sync>,
    reason: String,
}

impl VetoBehavior {
    /// Veto assignments for which `allowed` returns false
    pub fn new<F>(reason: &str, allowed: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + Send + Sync + 'static,
    {
        Self {
            rule: Box::new(allowed),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Debug for VetoBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VetoBehavior")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

impl Behavior for VetoBehavior {
    fn name(&self) -> &str {
        "veto"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with(Capability::HandlesSet)
    }

    fn set_member(&self, _operation: &Operation<'_>, name: &str, value: &Value) -> Result<Outcome> {
        if (self.rule)(name, value) {
            Ok(Outcome::Declined)
        } else {
            Err(ClayError::behavior("veto", format!("{name}: {}", self.reason)))
        }
    }
}

/// Fails every operation it is asked about
#[derive(Debug, Default)]
pub struct FailingBehavior;

impl Behavior for FailingBehavior {
    fn name(&self) -> &str {
        "failing"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn attempt(&self, operation: &Operation<'_>) -> Result<Outcome> {
        Err(ClayError::behavior(
            "failing",
            format!("refused {:?}", operation.kind()),
        ))
    }
}

/// Counts fallback invocations
#[derive(Debug, Clone, Default)]
pub struct FallbackCounter {
    count: Arc<AtomicUsize>,
}

impl FallbackCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback returning `value` and bumping the counter
    pub fn fallback(&self, value: impl Into<Value>) -> impl FnOnce() -> Result<Value> + 'static {
        let count = Arc::clone(&self.count);
        let value = value.into();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Object with one property store holding `a = 1` and `b = "s"`
pub fn seeded_clay() -> Clay {
    let obj = Clay::with_chain(BehaviorChain::new().with(PropertyStore::new()));
    obj.set_item("a", 1).unwrap();
    obj.set_item("b", "s").unwrap();
    obj
}

/// Object whose chain is `behaviors` followed by a property store
pub fn clay_with_store(behaviors: Vec<Arc<dyn Behavior>>) -> Clay {
    let mut chain = BehaviorChain::from_behaviors(behaviors);
    chain = chain.with(PropertyStore::new());
    Clay::with_chain(chain)
}
