//! Application-level push consumers.
//!
//! Zero or more [`PushDelegate`]s register with the process-lifetime
//! [`DelegateRegistry`]; the registry is rebuilt on every process start,
//! nothing here is persisted. Fan-out goes through [`run_delegates`], which
//! invokes every delegate regardless of earlier failures.

mod runner;
pub use runner::*;


use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::BoxError;
use crate::NotificationResponse;
use crate::PushNotification;

/// An application consumer of push lifecycle events.
#[async_trait]
pub trait PushDelegate: Send + Sync + 'static {
    /// Stable name used when reporting this delegate's failures.
    fn name(&self) -> &str;

    /// The registration token changed (initial registration or external
    /// refresh).
    async fn on_token_changed(
        &self,
        token: &str,
    ) -> std::result::Result<(), BoxError>;

    /// An inbound push arrived.
    async fn on_received(
        &self,
        notification: &PushNotification,
    ) -> std::result::Result<(), BoxError>;

    /// The user interacted with a displayed notification.
    async fn on_entry(
        &self,
        response: &NotificationResponse,
    ) -> std::result::Result<(), BoxError>;
}

/// Process-lifetime set of registered delegates. Cloning shares the set.
#[derive(Clone, Default)]
pub struct DelegateRegistry {
    delegates: Arc<RwLock<Vec<Arc<dyn PushDelegate>>>>,
}

impl std::fmt::Debug for DelegateRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("DelegateRegistry")
            .field("len", &self.delegates.read().len())
            .finish()
    }
}

impl DelegateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        delegate: Arc<dyn PushDelegate>,
    ) {
        self.delegates.write().push(delegate);
    }

    /// Snapshot of the currently registered delegates.
    pub fn resolve(&self) -> Vec<Arc<dyn PushDelegate>> {
        self.delegates.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.read().is_empty()
    }
}
