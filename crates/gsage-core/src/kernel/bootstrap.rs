use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;

use crate::config::EngineSettings;
use crate::event::{EventDispatcher, EventType, SystemChangeEvent};
use crate::kernel::component::{DependencyRegistry, KernelComponent};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::ui::UiManager;

/// Owns the engine dispatcher, the registered systems and the UI manager.
///
/// Every system transition is announced on the engine dispatcher with a
/// [`SystemChangeEvent`] carrying the component name.
pub struct Application {
    settings: EngineSettings,
    ui_manager: OnceLock<UiManager>,
    engine: Arc<EventDispatcher>,
    dependencies: Arc<Mutex<DependencyRegistry>>,
    component_order: Vec<TypeId>,
    running: bool,
}

impl Application {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        log::info!("Initializing {} v{}", settings.app_name, constants::APP_VERSION);
        Application {
            settings,
            ui_manager: OnceLock::new(),
            engine: Arc::new(EventDispatcher::named(constants::ENGINE_DISPATCHER)),
            dependencies: Arc::new(Mutex::new(DependencyRegistry::new())),
            component_order: Vec::new(),
            running: false,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Central dispatcher for input, system and UI context events
    pub fn engine(&self) -> &Arc<EventDispatcher> {
        &self.engine
    }

    /// The UI manager, subscribed to the engine on first access
    pub fn ui_manager(&self) -> &UiManager {
        self.ui_manager
            .get_or_init(|| UiManager::new(&self.engine, self.settings.ui_input_priority))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Gets a specific component instance by its concrete type T.
    pub async fn get_component<T: KernelComponent + 'static>(&self) -> Option<Arc<T>> {
        let registry = self.dependencies.lock().await;
        registry.get_concrete::<T>()
    }

    /// Add a system. A running application initializes and starts it right away.
    pub async fn register_component<V>(&mut self, component: Arc<V>) -> Result<()>
    where
        V: KernelComponent + 'static,
    {
        let name = component.name();
        let type_id = TypeId::of::<V>();
        if !self.dependencies.lock().await.register_instance(component.clone()) {
            return Err(Error::ComponentRegistryError {
                operation: "RegisterComponent".to_string(),
                component_name: Some(name.to_string()),
                message: "A component of this type is already registered".to_string(),
            });
        }
        self.component_order.push(type_id);
        log::debug!("Registered component: {}", name);

        if self.running {
            let component: Arc<dyn KernelComponent> = component;
            if let Err(e) = self.bring_up(&component).await {
                log::warn!("Component {} failed to come up, unregistering it: {}", name, e);
                self.dependencies.lock().await.remove(&type_id);
                self.component_order.retain(|id| *id != type_id);
                self.announce(SystemChangeEvent::SYSTEM_REMOVED, name);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Remove a system, stopping it first when the application is running.
    pub async fn remove_component<V>(&mut self) -> Result<()>
    where
        V: KernelComponent + 'static,
    {
        let type_id = TypeId::of::<V>();
        let component = self.dependencies.lock().await.get_component_by_id(&type_id).ok_or_else(|| {
            Error::ComponentRegistryError {
                operation: "RemoveComponent".to_string(),
                component_name: None,
                message: format!("No component of type {} is registered", std::any::type_name::<V>()),
            }
        })?;

        if self.running {
            self.announce(SystemChangeEvent::SYSTEM_STOPPING, component.name());
            component
                .stop()
                .await
                .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Shutdown, component.name(), e))?;
        }

        self.dependencies.lock().await.remove(&type_id);
        self.component_order.retain(|id| *id != type_id);
        self.announce(SystemChangeEvent::SYSTEM_REMOVED, component.name());
        log::info!("Removed component: {}", component.name());
        Ok(())
    }

    /// Initialize every component in registration order, then start them.
    ///
    /// On failure the components brought up so far are stopped again in
    /// reverse order and the application stays idle.
    pub async fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::RunPreCheck,
                component_name: None,
                message: "Application already running".to_string(),
                source: None,
            });
        }

        let components = self.ordered_components().await;
        log::info!("Initializing components...");
        for (initialized, component) in components.iter().enumerate() {
            if let Err(e) = self.initialize_component(component).await {
                self.roll_back(&components[..initialized], 0).await;
                return Err(e);
            }
        }
        log::info!("Starting components...");
        for (started, component) in components.iter().enumerate() {
            if let Err(e) = self.start_component(component).await {
                self.roll_back(&components, started).await;
                return Err(e);
            }
        }

        self.running = true;
        log::info!("{} started with {} component(s)", self.settings.app_name, components.len());
        Ok(())
    }

    /// Stop every component in reverse order. The first failure is reported
    /// after the remaining components have been stopped.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }

        log::info!("Shutting down components...");
        let mut first_error = None;
        for component in self.ordered_components().await.iter().rev() {
            self.announce(SystemChangeEvent::SYSTEM_STOPPING, component.name());
            log::info!("Stopping component: {}", component.name());
            if let Err(e) = component.stop().await {
                log::error!("Error stopping component {}: {}", component.name(), e);
                first_error.get_or_insert(Error::lifecycle(KernelLifecyclePhase::Shutdown, component.name(), e));
            }
        }
        self.running = false;
        log::info!("Component shutdown complete.");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop `components` in reverse after a failed start. The first `started`
    /// of them announced SYSTEM_STARTED and get a SYSTEM_STOPPING first.
    /// Stop failures are logged; the start error is what gets reported.
    async fn roll_back(&self, components: &[Arc<dyn KernelComponent>], started: usize) {
        if components.is_empty() {
            return;
        }
        log::warn!("Start failed, stopping {} component(s) brought up so far", components.len());
        for (index, component) in components.iter().enumerate().rev() {
            if index < started {
                self.announce(SystemChangeEvent::SYSTEM_STOPPING, component.name());
            }
            if let Err(e) = component.stop().await {
                log::error!("Error stopping component {} during rollback: {}", component.name(), e);
            }
        }
    }

    async fn ordered_components(&self) -> Vec<Arc<dyn KernelComponent>> {
        let registry = self.dependencies.lock().await;
        self.component_order
            .iter()
            .filter_map(|type_id| registry.get_component_by_id(type_id))
            .collect()
    }

    async fn bring_up(&self, component: &Arc<dyn KernelComponent>) -> Result<()> {
        self.initialize_component(component).await?;
        self.start_component(component).await
    }

    async fn initialize_component(&self, component: &Arc<dyn KernelComponent>) -> Result<()> {
        log::info!("Initializing component: {}", component.name());
        component
            .initialize()
            .await
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Initialize, component.name(), e))?;
        self.announce(SystemChangeEvent::SYSTEM_ADDED, component.name());
        Ok(())
    }

    async fn start_component(&self, component: &Arc<dyn KernelComponent>) -> Result<()> {
        log::info!("Starting component: {}", component.name());
        component
            .start()
            .await
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Start, component.name(), e))?;
        self.announce(SystemChangeEvent::SYSTEM_STARTED, component.name());
        Ok(())
    }

    fn announce(&self, event_type: EventType, system_id: &str) {
        let handled = self.engine.fire_event(&SystemChangeEvent::new(event_type, system_id));
        log::trace!("{} '{}' handled by {} listener(s)", event_type, system_id, handled);
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}
