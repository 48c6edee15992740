//! Name-to-service registry consulted once per chapter.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::service::{SagaValue, Service};

/// Maps chapter names to the services that execute them.
///
/// Lookup is an exact, case-sensitive match on [`Service::name`].
/// Registering a name twice replaces the earlier service.
pub struct ServiceDiscovery<T: SagaValue> {
    services: HashMap<String, Arc<dyn Service<T>>>,
}

impl<T> ServiceDiscovery<T>
where
    T: SagaValue,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Registers a service and returns the registry, for chaining.
    pub fn discover<S>(mut self, service: S) -> Self
    where
        S: Service<T> + 'static,
    {
        self.register(Arc::new(service));
        self
    }

    /// Registers an already shared service.
    pub fn register(&mut self, service: Arc<dyn Service<T>>) {
        let name = service.name().to_string();
        if self.services.insert(name.clone(), service).is_some() {
            tracing::debug!(service = %name, "service registration replaced");
        }
    }

    /// Looks up the service registered under `name`.
    pub fn find(&self, name: &str) -> Option<Arc<dyn Service<T>>> {
        self.services.get(name).cloned()
    }

    /// Returns true if a service is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<T> Default for ServiceDiscovery<T>
where
    T: SagaValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SagaValue> Clone for ServiceDiscovery<T> {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
        }
    }
}

impl<T: SagaValue> Debug for ServiceDiscovery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.services.keys().collect();
        names.sort_unstable();
        f.debug_struct("ServiceDiscovery")
            .field("services", &names)
            .finish()
    }
}
