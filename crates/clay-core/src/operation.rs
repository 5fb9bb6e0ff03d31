//! Operation descriptors
//!
//! An [`Operation`] is the normalized form of one dynamic request: what kind
//! of operation it is, which member (if any) it targets, the arguments, the
//! object it is performed on, and the fallback that produces the default
//! result when no behavior claims it.

use crate::arguments::Arguments;
use crate::behavior::Capability;
use crate::clay::Clay;
use crate::error::{ClayError, Result};
use crate::value::Value;
use std::fmt;

/// Kind of dynamic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read a named member
    GetMember,

    /// Assign a named member
    SetMember,

    /// Call a named member
    InvokeMember,

    /// Remove a named member
    DeleteMember,

    /// Convert the object to another representation
    Convert,

    /// Apply a unary operator
    UnaryOperation,

    /// Apply a binary operator with the object on the left
    BinaryOperation,
}

impl OperationKind {
    /// Check if this kind addresses a named member
    #[inline]
    #[must_use]
    pub fn targets_member(self) -> bool {
        matches!(
            self,
            Self::GetMember | Self::SetMember | Self::InvokeMember | Self::DeleteMember
        )
    }

    /// Capability a behavior needs to be asked about this kind
    #[must_use]
    pub fn capability(self) -> Capability {
        match self {
            Self::GetMember => Capability::HandlesGet,
            Self::SetMember => Capability::HandlesSet,
            Self::InvokeMember => Capability::HandlesInvoke,
            Self::DeleteMember => Capability::HandlesDelete,
            Self::Convert => Capability::HandlesConvert,
            Self::UnaryOperation | Self::BinaryOperation => Capability::HandlesOperators,
        }
    }
}

/// Conversion target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Text representation
    Text,
    /// Truthiness
    Bool,
    /// Integer
    Int,
    /// Floating point
    Float,
    /// Sequence
    List,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::List => "list",
        })
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-x`
    Negate,
    /// `!x`
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Negate => "-",
            Self::Not => "!",
        })
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `a % b`
    Remainder,
    /// `a == b`
    Equal,
    /// `a != b`
    NotEqual,
    /// `a < b`
    LessThan,
    /// `a <= b`
    LessOrEqual,
    /// `a > b`
    GreaterThan,
    /// `a >= b`
    GreaterOrEqual,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
        })
    }
}

/// Thunk producing the default result of an unclaimed operation
pub type Fallback<'a> = Box<dyn FnOnce() -> Result<Value> + 'a>;

#[derive(Debug, Clone)]
enum Target {
    Member(String),
    Conversion(Conversion),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
}

/// One dispatch request
///
/// Constructors enforce that a member name is present exactly for the
/// member-addressing kinds. The fallback is consumed by
/// [`Operation::run_fallback`], so it can run at most once.
pub struct Operation<'a> {
    kind: OperationKind,
    target: Target,
    arguments: Arguments,
    receiver: Option<Clay>,
    fallback: Fallback<'a>,
}

impl Operation<'static> {
    /// Read member `name`; unclaimed reads fail with [`ClayError::MissingMember`]
    #[must_use]
    pub fn get_member(name: impl Into<String>) -> Self {
        Self::named(OperationKind::GetMember, name.into(), Arguments::empty())
    }

    /// Assign `value` to member `name`
    ///
    /// The value travels as the single positional argument.
    #[must_use]
    pub fn set_member(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::named(
            OperationKind::SetMember,
            name.into(),
            Arguments::single(value),
        )
    }

    /// Call member `name` with `arguments`
    #[must_use]
    pub fn invoke_member(name: impl Into<String>, arguments: Arguments) -> Self {
        Self::named(OperationKind::InvokeMember, name.into(), arguments)
    }

    /// Remove member `name`; unclaimed deletes yield [`Value::Null`]
    #[must_use]
    pub fn delete_member(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: OperationKind::DeleteMember,
            target: Target::Member(name),
            arguments: Arguments::empty(),
            receiver: None,
            fallback: Box::new(|| Ok(Value::Null)),
        }
    }

    /// Convert to `conversion`
    #[must_use]
    pub fn convert(conversion: Conversion) -> Self {
        Self {
            kind: OperationKind::Convert,
            target: Target::Conversion(conversion),
            arguments: Arguments::empty(),
            receiver: None,
            fallback: Box::new(move || Err(ClayError::NotConvertible { target: conversion })),
        }
    }

    /// Apply unary `operator`
    #[must_use]
    pub fn unary(operator: UnaryOperator) -> Self {
        Self {
            kind: OperationKind::UnaryOperation,
            target: Target::Unary(operator),
            arguments: Arguments::empty(),
            receiver: None,
            fallback: Box::new(move || {
                Err(ClayError::UnsupportedOperator {
                    operator: operator.to_string(),
                })
            }),
        }
    }

    /// Apply binary `operator` with `rhs` as the right operand
    #[must_use]
    pub fn binary(operator: BinaryOperator, rhs: impl Into<Value>) -> Self {
        Self {
            kind: OperationKind::BinaryOperation,
            target: Target::Binary(operator),
            arguments: Arguments::single(rhs),
            receiver: None,
            fallback: Box::new(move || {
                Err(ClayError::UnsupportedOperator {
                    operator: operator.to_string(),
                })
            }),
        }
    }

    fn named(kind: OperationKind, name: String, arguments: Arguments) -> Self {
        let missing = name.clone();
        Self {
            kind,
            target: Target::Member(name),
            arguments,
            receiver: None,
            fallback: Box::new(move || Err(ClayError::missing_member(missing))),
        }
    }
}

impl Operation<'_> {
    /// Attach the object the operation is performed on
    #[inline]
    #[must_use]
    pub fn with_receiver(mut self, receiver: Clay) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Replace the fallback
    #[must_use]
    pub fn with_fallback<'b, F>(self, fallback: F) -> Operation<'b>
    where
        F: FnOnce() -> Result<Value> + 'b,
    {
        Operation {
            kind: self.kind,
            target: self.target,
            arguments: self.arguments,
            receiver: self.receiver,
            fallback: Box::new(fallback),
        }
    }

    /// Operation kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Target member name, for member-addressing kinds
    #[inline]
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        match &self.target {
            Target::Member(name) => Some(name),
            _ => None,
        }
    }

    /// Conversion target, for [`OperationKind::Convert`]
    #[inline]
    #[must_use]
    pub fn conversion(&self) -> Option<Conversion> {
        match self.target {
            Target::Conversion(c) => Some(c),
            _ => None,
        }
    }

    /// Operator, for [`OperationKind::UnaryOperation`]
    #[inline]
    #[must_use]
    pub fn unary_operator(&self) -> Option<UnaryOperator> {
        match self.target {
            Target::Unary(op) => Some(op),
            _ => None,
        }
    }

    /// Operator, for [`OperationKind::BinaryOperation`]
    #[inline]
    #[must_use]
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        match self.target {
            Target::Binary(op) => Some(op),
            _ => None,
        }
    }

    /// Argument pack
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Assigned value (set) or right operand (binary)
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self.kind {
            OperationKind::SetMember | OperationKind::BinaryOperation => self.arguments.first(),
            _ => None,
        }
    }

    /// Object the operation is performed on, if attached
    #[inline]
    #[must_use]
    pub fn receiver(&self) -> Option<&Clay> {
        self.receiver.as_ref()
    }

    /// Consume the operation and produce its default result
    pub fn run_fallback(self) -> Result<Value> {
        (self.fallback)()
    }
}

impl fmt::Debug for Operation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("arguments", &self.arguments)
            .field("receiver", &self.receiver.as_ref().map(Clay::id))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_kinds_carry_names() {
        assert_eq!(Operation::get_member("a").member(), Some("a"));
        assert_eq!(Operation::set_member("a", 1).member(), Some("a"));
        assert_eq!(
            Operation::invoke_member("a", Arguments::empty()).member(),
            Some("a")
        );
        assert_eq!(Operation::delete_member("a").member(), Some("a"));
    }

    #[test]
    fn non_member_kinds_have_no_name() {
        let convert = Operation::convert(Conversion::Text);
        assert_eq!(convert.member(), None);
        assert!(!convert.kind().targets_member());
        assert_eq!(convert.conversion(), Some(Conversion::Text));

        let unary = Operation::unary(UnaryOperator::Not);
        assert_eq!(unary.member(), None);
        assert_eq!(unary.unary_operator(), Some(UnaryOperator::Not));

        let binary = Operation::binary(BinaryOperator::Add, 2);
        assert_eq!(binary.member(), None);
        assert_eq!(binary.value(), Some(&Value::Int(2)));
    }

    #[test]
    fn set_value_is_single_argument() {
        let op = Operation::set_member("name", "Ada");
        assert_eq!(op.arguments().len(), 1);
        assert_eq!(op.value(), Some(&Value::from("Ada")));
    }

    #[test]
    fn get_has_empty_arguments() {
        let op = Operation::get_member("x");
        assert!(op.arguments().is_shared_empty());
        assert_eq!(op.value(), None);
    }

    #[test]
    fn default_fallbacks() {
        let err = Operation::get_member("x").run_fallback().unwrap_err();
        assert!(err.is_missing_member());

        let deleted = Operation::delete_member("x").run_fallback().unwrap();
        assert!(deleted.is_null());

        let err = Operation::convert(Conversion::Int).run_fallback().unwrap_err();
        assert!(matches!(err, ClayError::NotConvertible { target: Conversion::Int }));

        let err = Operation::binary(BinaryOperator::LessThan, 1)
            .run_fallback()
            .unwrap_err();
        assert_eq!(err.to_string(), "unsupported operator: <");
    }

    #[test]
    fn custom_fallback_borrows_locals() {
        let default = String::from("fallback");
        let op = Operation::get_member("x").with_fallback(|| Ok(Value::from(default.as_str())));
        assert_eq!(op.run_fallback().unwrap(), Value::from("fallback"));
    }

    #[test]
    fn receiver_attached() {
        let obj = Clay::new();
        let op = Operation::get_member("x").with_receiver(obj.clone());
        assert!(op.receiver().is_some_and(|r| r.ptr_eq(&obj)));
    }
}
