use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// Lifecycle trait for engine systems owned by the [`Application`](crate::kernel::Application).
///
/// `name` doubles as the system id carried by
/// [`SystemChangeEvent`](crate::event::SystemChangeEvent).
#[async_trait]
pub trait KernelComponent: Any + Send + Sync + Debug {
    fn name(&self) -> &'static str;
    async fn initialize(&self) -> Result<()>;
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
}

/// Components stored as `Arc<dyn KernelComponent>`, keyed by concrete type
#[derive(Default, Debug)]
pub struct DependencyRegistry {
    instances: HashMap<TypeId, Arc<dyn KernelComponent>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }

    /// Register a component instance. Returns false, leaving the registry
    /// untouched, when a component of the same concrete type exists.
    pub fn register_instance<V>(&mut self, instance: Arc<V>) -> bool
    where
        V: KernelComponent + 'static,
    {
        let type_id = TypeId::of::<V>();
        if self.instances.contains_key(&type_id) {
            return false;
        }
        self.instances.insert(type_id, instance);
        true
    }

    pub fn get_component_by_id(&self, type_id: &TypeId) -> Option<Arc<dyn KernelComponent>> {
        self.instances.get(type_id).cloned()
    }

    /// Get a component instance by concrete type T.
    pub fn get_concrete<T: KernelComponent + 'static>(&self) -> Option<Arc<T>> {
        self.instances
            .get(&TypeId::of::<T>())
            .and_then(|component| {
                let any: Arc<dyn Any + Send + Sync> = component.clone();
                Arc::downcast::<T>(any).ok()
            })
    }

    pub fn remove(&mut self, type_id: &TypeId) -> Option<Arc<dyn KernelComponent>> {
        self.instances.remove(type_id)
    }

    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.instances.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
