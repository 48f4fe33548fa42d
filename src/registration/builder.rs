//! Builder for wiring a [`PushManager`] out of its injected capabilities.
//!
//! Platform capabilities have no sensible defaults and must be supplied;
//! the key-value store defaults to the sled adapter at the configured path.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::PushManager;
use super::RegistrationState;
use crate::sled_adapter::SledKeyValueStore;
use crate::DelegateRegistry;
use crate::Error;
use crate::KeyValueStore;
use crate::NotificationDispatcher;
use crate::NotificationRenderer;
use crate::PermissionCapability;
use crate::PushConfig;
use crate::RegistrationStore;
use crate::RemoteTopicService;
use crate::Result;
use crate::TagSynchronizer;
use crate::TokenProvider;

pub struct PushManagerBuilder {
    config: PushConfig,
    kv: Option<Arc<dyn KeyValueStore>>,
    permissions: Option<Arc<dyn PermissionCapability>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    remote: Option<Arc<dyn RemoteTopicService>>,
    renderer: Option<Arc<dyn NotificationRenderer>>,
    delegates: DelegateRegistry,
}

impl PushManagerBuilder {
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            kv: None,
            permissions: None,
            token_provider: None,
            remote: None,
            renderer: None,
            delegates: DelegateRegistry::new(),
        }
    }

    /// Overrides the default sled-backed store.
    pub fn key_value_store(
        mut self,
        kv: Arc<dyn KeyValueStore>,
    ) -> Self {
        self.kv = Some(kv);
        self
    }

    pub fn permission_capability(
        mut self,
        permissions: Arc<dyn PermissionCapability>,
    ) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn token_provider(
        mut self,
        provider: Arc<dyn TokenProvider>,
    ) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn remote_topic_service(
        mut self,
        remote: Arc<dyn RemoteTopicService>,
    ) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn notification_renderer(
        mut self,
        renderer: Arc<dyn NotificationRenderer>,
    ) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Shares an externally owned delegate registry (e.g. one the host's
    /// dependency scope also registers into).
    pub fn delegates(
        mut self,
        delegates: DelegateRegistry,
    ) -> Self {
        self.delegates = delegates;
        self
    }

    pub fn build(self) -> Result<Arc<PushManager>> {
        self.config.validate()?;

        let kv: Arc<dyn KeyValueStore> = match self.kv {
            Some(kv) => kv,
            None => SledKeyValueStore::open(&self.config.store.path)?,
        };
        let store = Arc::new(RegistrationStore::new(kv)?);

        let permissions = self
            .permissions
            .ok_or_else(|| missing("permission capability"))?;
        let token_provider = self.token_provider.ok_or_else(|| missing("token provider"))?;
        let remote = self.remote.ok_or_else(|| missing("remote topic service"))?;
        let renderer = self.renderer.ok_or_else(|| missing("notification renderer"))?;

        let dispatcher = Arc::new(NotificationDispatcher::new(
            self.config.dispatch.event_channel_capacity,
            self.delegates.clone(),
            renderer,
        ));
        let tags = TagSynchronizer::new(store.clone(), remote);
        let (native_tx, native_rx) = mpsc::channel(self.config.dispatch.native_event_buffer);

        Ok(Arc::new(PushManager {
            store,
            permissions,
            token_provider,
            delegates: self.delegates,
            dispatcher,
            tags,
            state: Mutex::new(RegistrationState::Unregistered),
            native_tx,
            native_rx: Mutex::new(Some(native_rx)),
            shutdown: CancellationToken::new(),
        }))
    }
}

fn missing(what: &str) -> Error {
    Error::Fatal(format!("PushManagerBuilder: {what} was not provided"))
}
