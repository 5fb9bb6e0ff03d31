//! Behavior chain dispatch tests
//!
//! Exercises first-match ordering, fallback accounting, failure propagation
//! and composition of independent behaviors.

use clay_core::prelude::*;
use clay_core::{BinaryOperator, Conversion, OperationKind};
use clay_test_utils::{
    clay_with_store, init_tracing, FailingBehavior, FallbackCounter, RecordingBehavior,
    ScriptedBehavior, VetoBehavior,
};
use std::sync::Arc;

#[test]
fn earlier_behavior_always_wins() {
    init_tracing();
    let a = Arc::new(ScriptedBehavior::new("a", "from a"));
    let b = Arc::new(ScriptedBehavior::new("b", "from b"));
    let chain = BehaviorChain::new()
        .with_shared(a.clone())
        .with_shared(b.clone());

    for _ in 0..10 {
        assert_eq!(
            chain.dispatch(Operation::get_member("x")).unwrap(),
            Value::from("from a")
        );
    }
    assert_eq!(a.calls(), 10);
    assert_eq!(b.calls(), 0);
}

#[test]
fn fallback_runs_once_when_unclaimed() {
    let counter = FallbackCounter::new();
    let chain = BehaviorChain::new()
        .with(RecordingBehavior::new())
        .with(PropertyStore::new());

    let op = Operation::get_member("missing").with_fallback(counter.fallback("default"));
    assert_eq!(chain.dispatch(op).unwrap(), Value::from("default"));
    assert_eq!(counter.count(), 1);

    let op = Operation::get_member("missing").with_fallback(counter.fallback("default"));
    chain.dispatch(op).unwrap();
    assert_eq!(counter.count(), 2);
}

#[test]
fn fallback_skipped_when_claimed() {
    let counter = FallbackCounter::new();
    let chain = BehaviorChain::new().with(ScriptedBehavior::new("s", 1));

    let op = Operation::get_member("x").with_fallback(counter.fallback(0));
    assert_eq!(chain.dispatch(op).unwrap(), Value::Int(1));
    assert_eq!(counter.count(), 0);
}

#[test]
fn fallback_error_returned_unchanged() {
    let chain = BehaviorChain::new().with(RecordingBehavior::new());
    let op = Operation::invoke_member("launch", Arguments::empty())
        .with_fallback(|| Err(ClayError::InvalidArgument("host says no".into())));
    let err = chain.dispatch(op).unwrap_err();
    assert!(matches!(err, ClayError::InvalidArgument(msg) if msg == "host says no"));
}

#[test]
fn nested_fallback_runs_once() {
    let counter = FallbackCounter::new();
    let inner = BehaviorChain::new().with(RecordingBehavior::new());
    let chain = BehaviorChain::new()
        .with(inner)
        .with(BehaviorChain::new());

    let op = Operation::get_member("x").with_fallback(counter.fallback(Value::Null));
    chain.dispatch(op).unwrap();
    assert_eq!(counter.count(), 1);
}

#[test]
fn failure_stops_dispatch() {
    let recorder = Arc::new(RecordingBehavior::new());
    let chain = BehaviorChain::new()
        .with(FailingBehavior)
        .with_shared(recorder.clone());

    let counter = FallbackCounter::new();
    let op = Operation::get_member("x").with_fallback(counter.fallback(0));
    let err = chain.dispatch(op).unwrap_err();

    assert!(matches!(err, ClayError::Behavior { ref behavior, .. } if behavior == "failing"));
    assert!(recorder.seen().is_empty());
    assert_eq!(counter.count(), 0);
}

#[test]
fn observer_sees_every_operation_in_order() {
    let recorder = Arc::new(RecordingBehavior::new());
    let obj = clay_with_store(vec![recorder.clone() as Arc<dyn Behavior>]);

    obj.set("a", 1).unwrap();
    obj.get("a").unwrap();
    obj.invoke("a", Arguments::empty()).unwrap();
    obj.delete("a").unwrap();
    let _ = obj.convert(Conversion::Text);

    let kinds: Vec<_> = recorder.seen().into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::SetMember,
            OperationKind::GetMember,
            OperationKind::InvokeMember,
            OperationKind::DeleteMember,
            OperationKind::Convert,
        ]
    );
    assert_eq!(recorder.seen_members(), vec!["a", "a", "a", "a"]);
}

#[test]
fn veto_before_store_blocks_assignment() {
    let veto: Arc<dyn Behavior> = Arc::new(VetoBehavior::new("must not be null", |_, v| {
        !v.is_null()
    }));
    let obj = clay_with_store(vec![veto]);

    obj.set("name", "Ada").unwrap();
    let err = obj.set("name", Value::Null).unwrap_err();
    assert!(matches!(err, ClayError::Behavior { .. }));
    assert_eq!(obj.get("name").unwrap(), Value::from("Ada"));
}

#[test]
fn veto_placed_after_store_never_runs() {
    let veto: Arc<dyn Behavior> = Arc::new(VetoBehavior::new("never", |_, _| false));
    let chain = BehaviorChain::new()
        .with(PropertyStore::new())
        .with_shared(veto);
    let obj = Clay::with_chain(chain);

    assert_eq!(obj.set("x", 1).unwrap(), Value::Int(1));
}

#[test]
fn capability_filter_skips_behavior() {
    let scripted = Arc::new(
        ScriptedBehavior::new("reads-only", "scripted")
            .with_capabilities(Capabilities::NONE.with(Capability::HandlesGet)),
    );
    let obj = clay_with_store(vec![scripted.clone() as Arc<dyn Behavior>]);

    obj.set("x", 1).unwrap();
    assert_eq!(obj.get("x").unwrap(), Value::from("scripted"));
    assert_eq!(obj.item("x").unwrap(), Value::Int(1));
    assert_eq!(scripted.calls(), 1);
}

#[test]
fn operator_behavior_claims_binary() {
    let ops = Arc::new(
        ScriptedBehavior::new("ops", true)
            .with_capabilities(Capabilities::NONE.with(Capability::HandlesOperators)),
    );
    let obj = clay_with_store(vec![ops as Arc<dyn Behavior>]);
    assert_eq!(
        obj.binary(BinaryOperator::Equal, 1).unwrap(),
        Value::Bool(true)
    );
    assert!(obj.get("x").unwrap_err().is_missing_member());
}

#[test]
fn members_merge_across_behaviors() {
    let first = PropertyStore::new();
    first.properties().extend([("b", 1), ("a", 2)]);
    let second = PropertyStore::new();
    second.properties().extend([("a", 3), ("c", 4)]);

    let obj = Clay::with_chain(BehaviorChain::new().with(first).with(second));
    assert_eq!(obj.members(), vec!["b", "a", "c"]);
    assert_eq!(obj.get("a").unwrap(), Value::Int(2));
    assert_eq!(obj.get("c").unwrap(), Value::Int(4));
}

#[test]
fn shared_chain_reused_by_many_objects() {
    let recorder = Arc::new(RecordingBehavior::new());
    let shared: Arc<dyn Behavior> = Arc::new(BehaviorChain::new().with_shared(recorder.clone()));

    let a = clay_with_store(vec![shared.clone()]);
    let b = clay_with_store(vec![shared]);
    a.set("x", 1).unwrap();
    b.set("y", 2).unwrap();

    assert_eq!(recorder.seen_members(), vec!["x", "y"]);
    assert!(b.get("x").is_err());
}
