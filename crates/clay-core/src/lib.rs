//! Clay Core
//!
//! Dynamic, schema-less objects whose member operations are resolved at call
//! time by an ordered chain of pluggable behaviors.
//!
//! # Core Concepts
//!
//! - [`Clay`]: The dynamic object handle (identity semantics)
//! - [`Operation`]: Descriptor of one dynamic request, with its fallback
//! - [`Arguments`]: Immutable positional and named call arguments
//! - [`Behavior`]: Pluggable unit that claims or declines operations
//! - [`BehaviorChain`]: Ordered first-match composite of behaviors
//! - [`PropertyStore`]: Behavior backing named properties
//! - [`DynamicFactory`]: Auto-vivification of nested objects
//!
//! # Example
//!
//! ```rust
//! use clay_core::{Clay, Value};
//!
//! let obj = Clay::with_properties();
//! obj.set("name", "Ada").unwrap();
//! assert_eq!(obj.get("name").unwrap(), Value::from("Ada"));
//!
//! // Add-property operator: vivify a nested object in place
//! let obj = (&obj + "address").unwrap();
//! let address = obj.item("address").unwrap().into_object().unwrap();
//! address.set_item("city", "London").unwrap();
//!
//! // Remove-property operator
//! let obj = (&obj - "name").unwrap();
//! assert_eq!(obj.members(), vec!["address"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod arguments;
mod behavior;
mod chain;
mod clay;
mod config;
mod error;
mod factory;
mod operation;
mod property;
mod value;

// Re-exports
pub use arguments::Arguments;
pub use behavior::{Behavior, Capabilities, Capability, Outcome};
pub use chain::BehaviorChain;
pub use clay::{Clay, ObjectId};
pub use config::{ClayConfig, FactoryConfig, DEFAULT_TO_STRING_MEMBER};
pub use error::{ClayError, Result};
pub use factory::{new_object, DynamicFactory};
pub use operation::{
    BinaryOperator, Conversion, Fallback, Operation, OperationKind, UnaryOperator,
};
pub use property::{Properties, PropertyStore};
pub use value::Value;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with dynamic objects
    pub use crate::{
        Arguments, Behavior, BehaviorChain, Capabilities, Capability, Clay, ClayError, Operation,
        Outcome, PropertyStore, Value,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
