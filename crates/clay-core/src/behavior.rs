//! Behavior trait and capability sets
//!
//! A [`Behavior`] is asked, for one [`Operation`], either to produce a result
//! or to decline. Behaviors advertise which kinds of operation they take part
//! in through [`Capabilities`]; a behavior is never asked about an operation
//! outside its capability set, which is equivalent to it declining.

use crate::arguments::Arguments;
use crate::error::Result;
use crate::operation::{BinaryOperator, Conversion, Operation, OperationKind, UnaryOperator};
use crate::property::PropertyStore;
use crate::value::Value;
use std::fmt;

/// Single capability a behavior may implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Answers member reads
    HandlesGet,
    /// Answers member assignments
    HandlesSet,
    /// Answers member calls
    HandlesInvoke,
    /// Answers member removal
    HandlesDelete,
    /// Answers conversions
    HandlesConvert,
    /// Answers unary and binary operators
    HandlesOperators,
    /// Reports member names
    EnumeratesMembers,
    /// Reports a member count
    Counts,
}

impl Capability {
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of [`Capability`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// Empty set
    pub const NONE: Self = Self(0);

    /// Every capability
    pub const ALL: Self = Self(u8::MAX);

    /// Add a capability
    #[inline]
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    /// Union of two sets
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Check if a behavior with this set takes part in `kind`
    #[inline]
    #[must_use]
    pub fn supports(self, kind: OperationKind) -> bool {
        self.contains(kind.capability())
    }

    /// Check for the empty set
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Answer of a behavior to one operation
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome {
    /// The behavior claimed the operation and produced this result
    Handled(Value),

    /// The behavior passes; the next one is asked
    Declined,
}

impl Outcome {
    /// Claim with a value
    #[inline]
    pub fn handled(value: impl Into<Value>) -> Self {
        Self::Handled(value.into())
    }

    /// Check if the operation was claimed
    #[inline]
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Claimed value, if any
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Handled(v) => Some(v),
            Self::Declined => None,
        }
    }
}

/// Pluggable unit of dynamic object semantics
///
/// Implementors override the hooks for the capabilities they report and
/// leave the rest at their declining defaults. [`Behavior::attempt`] routes an
/// operation to the matching hook; composites such as
/// [`BehaviorChain`](crate::BehaviorChain) override it directly.
///
/// Declining must have no side effects. Returning `Err` is a terminal failure
/// for the dispatch, never a decline.
pub trait Behavior: Send + Sync + fmt::Debug {
    /// Behavior name (for tracing and diagnostics)
    fn name(&self) -> &str;

    /// Capabilities this behavior takes part in
    fn capabilities(&self) -> Capabilities;

    /// Answer one operation
    fn attempt(&self, operation: &Operation<'_>) -> Result<Outcome> {
        let kind = operation.kind();
        if kind.targets_member() {
            let Some(name) = operation.member() else {
                return Ok(Outcome::Declined);
            };
            return match kind {
                OperationKind::GetMember => self.get_member(operation, name),
                OperationKind::SetMember => match operation.value() {
                    Some(value) => self.set_member(operation, name, value),
                    None => Ok(Outcome::Declined),
                },
                OperationKind::InvokeMember => {
                    self.invoke_member(operation, name, operation.arguments())
                }
                _ => self.delete_member(operation, name),
            };
        }

        match kind {
            OperationKind::Convert => match operation.conversion() {
                Some(target) => self.convert(operation, target),
                None => Ok(Outcome::Declined),
            },
            OperationKind::UnaryOperation => match operation.unary_operator() {
                Some(op) => self.unary_operation(operation, op),
                None => Ok(Outcome::Declined),
            },
            _ => match (operation.binary_operator(), operation.value()) {
                (Some(op), Some(rhs)) => self.binary_operation(operation, op, rhs),
                _ => Ok(Outcome::Declined),
            },
        }
    }

    /// Read member `name`
    fn get_member(&self, _operation: &Operation<'_>, _name: &str) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Assign `value` to member `name`
    fn set_member(
        &self,
        _operation: &Operation<'_>,
        _name: &str,
        _value: &Value,
    ) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Call member `name`
    fn invoke_member(
        &self,
        _operation: &Operation<'_>,
        _name: &str,
        _arguments: &Arguments,
    ) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Remove member `name`
    fn delete_member(&self, _operation: &Operation<'_>, _name: &str) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Convert the receiver
    fn convert(&self, _operation: &Operation<'_>, _target: Conversion) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Apply a unary operator to the receiver
    fn unary_operation(
        &self,
        _operation: &Operation<'_>,
        _operator: UnaryOperator,
    ) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Apply a binary operator with the receiver on the left
    fn binary_operation(
        &self,
        _operation: &Operation<'_>,
        _operator: BinaryOperator,
        _rhs: &Value,
    ) -> Result<Outcome> {
        Ok(Outcome::Declined)
    }

    /// Member names known to this behavior
    fn members(&self) -> Vec<String> {
        Vec::new()
    }

    /// Member count, if this behavior keeps one
    fn count(&self) -> Option<usize> {
        None
    }

    /// Property store backing this behavior, if it is one (or contains one)
    fn as_property_store(&self) -> Option<&PropertyStore> {
        None
    }
}
