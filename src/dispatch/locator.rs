//! Name-keyed service locator used to wire the logger into a host.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Name under which the event bus is expected.
pub const EVENTS: &str = "events";

/// Name under which the logger registers itself.
pub const LOGGER: &str = "logger";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("no instance registered as {0:?}")]
    NotRegistered(String),

    #[error("instance {name:?} is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

/// Registry of shared instances, looked up by name and type.
///
/// Instances are stored by value and cloned on resolve, so register
/// `Arc`s for anything that must be shared.
#[derive(Default)]
pub struct Locator {
    instances: RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl Locator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instance` under `name`, replacing anything already there.
    pub fn register_instance<T>(&self, name: impl Into<String>, instance: T)
    where
        T: Any + Send + Sync,
    {
        self.instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Box::new(instance));
    }

    /// Clone out the instance registered under `name`.
    pub fn resolve<T>(&self, name: &str) -> Result<T, LocatorError>
    where
        T: Any + Send + Sync + Clone,
    {
        let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
        let instance = instances
            .get(name)
            .ok_or_else(|| LocatorError::NotRegistered(name.to_string()))?;
        instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| LocatorError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = instances.keys().collect();
        names.sort();
        f.debug_struct("Locator").field("instances", &names).finish()
    }
}
