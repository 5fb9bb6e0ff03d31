//! Auto-vivification factory
//!
//! Produces fresh dynamic objects wherever a nested placeholder is needed
//! instead of an absent value, e.g. by the add-property operator.

use crate::behavior::Behavior;
use crate::chain::BehaviorChain;
use crate::clay::Clay;
use crate::config::{ClayConfig, FactoryConfig};
use crate::property::PropertyStore;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

static DEFAULT_FACTORY: Lazy<DynamicFactory> = Lazy::new(DynamicFactory::default);

/// Create a new object with the process-wide default factory
///
/// The object has an empty property store of its own.
#[must_use]
pub fn new_object() -> Clay {
    DEFAULT_FACTORY.new_object()
}

/// Builder of fresh dynamic objects
///
/// Shared behaviors are placed, in registration order, ahead of the per-object
/// property store in every chain the factory builds. They are shared by all
/// objects, so they should not hold per-object state.
#[derive(Debug, Clone, Default)]
pub struct DynamicFactory {
    config: FactoryConfig,
    shared: Vec<Arc<dyn Behavior>>,
}

impl DynamicFactory {
    /// Create factory from settings
    #[inline]
    #[must_use]
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            shared: Vec::new(),
        }
    }

    /// Create factory from the factory section of a full configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &ClayConfig) -> Self {
        Self::new(config.factory)
    }

    /// Add a behavior shared by every object this factory creates
    #[must_use]
    pub fn with_shared_behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.shared.push(behavior);
        self
    }

    /// Factory settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Create a new object
    #[must_use]
    pub fn new_object(&self) -> Clay {
        let mut chain = BehaviorChain::from_behaviors(self.shared.iter().cloned());
        if self.config.property_store {
            chain = chain.with(PropertyStore::new());
        }
        let obj = Clay::with_chain(chain);
        debug!(object = %obj.id(), behaviors = obj.behavior().len(), "vivified object");
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_objects_have_properties() {
        let obj = new_object();
        assert!(obj.to_dictionary().is_some());
        assert_eq!(obj.behavior().names(), vec![PropertyStore::NAME]);
    }

    #[test]
    fn objects_are_distinct() {
        let a = new_object();
        let b = new_object();
        assert!(!a.ptr_eq(&b));
        a.set_item("x", 1).unwrap();
        assert!(b.item("x").is_err());
    }

    #[test]
    fn without_property_store() {
        let factory = DynamicFactory::new(FactoryConfig::new().with_property_store(false));
        let obj = factory.new_object();
        assert!(obj.behavior().is_empty());
        assert!(obj.to_dictionary().is_none());
    }

    #[test]
    fn shared_behaviors_precede_store() {
        let shared: Arc<dyn Behavior> = Arc::new(BehaviorChain::new());
        let factory = DynamicFactory::default().with_shared_behavior(shared.clone());

        let a = factory.new_object();
        let b = factory.new_object();
        assert_eq!(a.behavior().names(), vec!["chain", PropertyStore::NAME]);
        assert!(Arc::ptr_eq(
            a.behavior().iter().next().unwrap(),
            b.behavior().iter().next().unwrap()
        ));
        assert!(!a.to_dictionary().unwrap().ptr_eq(&b.to_dictionary().unwrap()));
    }

    #[test]
    fn from_config() {
        let config = ClayConfig::new().with_factory(FactoryConfig::new().with_property_store(false));
        assert!(!DynamicFactory::from_config(&config).config().property_store);
    }
}
