use crate::container::descriptor::ServiceId;
use crate::errors::CoreError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Factory producing a fresh, type-erased service instance
pub type ProviderFn = dyn Fn() -> Result<Box<dyn Any + Send>, CoreError> + Send + Sync;

struct Provider {
    service_id: ServiceId,
    factory: Arc<ProviderFn>,
}

/// Registry mapping a service type to the function that constructs it.
///
/// Every resolution calls the factory again; nothing is cached, so instances
/// are never shared between callers. The registry is filled during setup and
/// only read afterwards, which keeps it `Send + Sync` without locking.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<TypeId, Provider>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("services", &self.registered_services())
            .finish()
    }
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transient factory for `T`, replacing any previous one
    pub fn register_transient<T, F>(&mut self, factory: F)
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert::<T>(Arc::new(move || {
            Ok::<_, CoreError>(Box::new(factory()) as Box<dyn Any + Send>)
        }));
    }

    /// Register `T` constructed through its `Default` implementation
    pub fn register_default<T>(&mut self)
    where
        T: Default + Send + 'static,
    {
        self.register_transient(T::default);
    }

    /// Register a factory that may fail to build `T`
    pub fn register_fallible<T, F>(&mut self, factory: F)
    where
        T: Send + 'static,
        F: Fn() -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.insert::<T>(Arc::new(move || {
            factory().map(|instance| Box::new(instance) as Box<dyn Any + Send>)
        }));
    }

    fn insert<T: 'static>(&mut self, factory: Arc<ProviderFn>) {
        let service_id = ServiceId::of::<T>();
        tracing::debug!(service = service_id.type_name, "registered provider");
        self.providers.insert(
            service_id.type_id,
            Provider {
                service_id,
                factory,
            },
        );
    }

    /// Check whether a provider exists for `T`
    pub fn contains<T: 'static>(&self) -> bool {
        self.providers.contains_key(&TypeId::of::<T>())
    }

    /// Check whether a provider exists for the given service
    pub fn contains_service(&self, service_id: &ServiceId) -> bool {
        self.providers.contains_key(&service_id.type_id)
    }

    /// Construct a fresh `T`
    pub fn construct<T: Send + 'static>(&self) -> Result<T, CoreError> {
        let service_id = ServiceId::of::<T>();
        let instance = self.construct_any(&service_id)?;
        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| {
                CoreError::service_construction(
                    service_id.type_name,
                    "provider returned a value of a different type",
                )
            })
    }

    /// Construct a fresh, type-erased instance of the given service
    pub fn construct_any(&self, service_id: &ServiceId) -> Result<Box<dyn Any + Send>, CoreError> {
        let provider = self
            .providers
            .get(&service_id.type_id)
            .ok_or_else(|| CoreError::service_not_found(service_id.type_name))?;

        (provider.factory)()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if no providers are registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// All services that have a provider
    pub fn registered_services(&self) -> Vec<ServiceId> {
        self.providers.values().map(|p| p.service_id).collect()
    }
}
