//! Plugin registration
//!
//! The agent presents itself to the host as a named, versioned unit
//! with an `init` entry point. Hosts that keep a plugin registry call
//! `init` once at load time; when no registry exists, registration
//! falls back to initializing immediately.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use vskip_common::events::EventBus;

use crate::host::PlayerHost;
use crate::metadata::SegmentProvider;
use crate::session::SessionController;

pub const PLUGIN_NAME: &str = "vskip";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name and version the plugin registers under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub version: &'static str,
}

/// A plugin handed to the host: descriptor plus its `init` entry point
pub struct RegisteredPlugin {
    pub descriptor: PluginDescriptor,
    init: Box<dyn FnOnce() -> JoinHandle<()> + Send>,
}

impl RegisteredPlugin {
    /// Invoke the entry point; the host calls this once at load time
    ///
    /// Must run inside a tokio runtime: the entry point spawns the
    /// session controller loop and returns its task handle.
    pub fn init(self) -> JoinHandle<()> {
        (self.init)()
    }
}

impl fmt::Debug for RegisteredPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredPlugin")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Host-side plugin registry
pub trait HostRegistry {
    fn add(&mut self, plugin: RegisteredPlugin);
}

/// The vskip plugin, ready to register
pub struct SkipPlugin {
    controller: SessionController,
}

impl SkipPlugin {
    pub fn new(
        host: Arc<dyn PlayerHost>,
        provider: Arc<dyn SegmentProvider>,
        events: EventBus,
    ) -> Self {
        Self {
            controller: SessionController::new(host, provider, events),
        }
    }

    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor {
            name: PLUGIN_NAME,
            version: PLUGIN_VERSION,
        }
    }

    /// Package the plugin for a host registry
    pub fn into_registered(self) -> RegisteredPlugin {
        let controller = self.controller;
        RegisteredPlugin {
            descriptor: Self::descriptor(),
            init: Box::new(move || {
                info!(name = PLUGIN_NAME, version = PLUGIN_VERSION, "plugin initialized");
                tokio::spawn(controller.run())
            }),
        }
    }

    /// Register with the host, or initialize directly when it has no registry
    ///
    /// Returns the controller task handle on the direct-init path, None
    /// when the host took ownership of the entry point.
    pub fn register(self, registry: Option<&mut dyn HostRegistry>) -> Option<JoinHandle<()>> {
        match registry {
            Some(registry) => {
                registry.add(self.into_registered());
                info!(name = PLUGIN_NAME, version = PLUGIN_VERSION, "plugin registered with host");
                None
            }
            None => {
                info!("no host registry; initializing plugin directly");
                Some(self.into_registered().init())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast;

    use crate::host::HostEvent;
    use crate::metadata::StubProvider;
    use crate::surface::VideoSurface;

    struct IdleHost {
        tx: broadcast::Sender<HostEvent>,
    }

    impl IdleHost {
        fn new() -> Self {
            let (tx, _) = broadcast::channel(8);
            Self { tx }
        }
    }

    impl PlayerHost for IdleHost {
        fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
            self.tx.subscribe()
        }

        fn video_surface(&self) -> Option<Arc<dyn VideoSurface>> {
            None
        }
    }

    #[derive(Default)]
    struct VecRegistry {
        plugins: Vec<RegisteredPlugin>,
    }

    impl HostRegistry for VecRegistry {
        fn add(&mut self, plugin: RegisteredPlugin) {
            self.plugins.push(plugin);
        }
    }

    fn plugin() -> SkipPlugin {
        SkipPlugin::new(
            Arc::new(IdleHost::new()),
            Arc::new(StubProvider::unavailable()),
            EventBus::new(16),
        )
    }

    #[test]
    fn test_descriptor() {
        let descriptor = SkipPlugin::descriptor();
        assert_eq!(descriptor.name, "vskip");
        assert_eq!(descriptor.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_register_with_registry_defers_init() {
        let mut registry = VecRegistry::default();
        let handle = plugin().register(Some(&mut registry));

        assert!(handle.is_none());
        assert_eq!(registry.plugins.len(), 1);
        assert_eq!(registry.plugins[0].descriptor.name, "vskip");

        // Host invokes the entry point later
        let task = registry.plugins.pop().unwrap().init();
        task.abort();
    }

    #[tokio::test]
    async fn test_register_without_registry_inits_immediately() {
        let handle = plugin().register(None);
        let task = handle.expect("direct init should return the controller task");
        assert!(!task.is_finished());
        task.abort();
    }
}
