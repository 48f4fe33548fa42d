use std::collections::BTreeSet;
use std::sync::Arc;

use futures::Stream;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::RegistrationState;
use crate::metrics::TOKEN_REFRESH_METRIC;
use crate::platform::NativeEvent;
use crate::platform::TokenProviderError;
use crate::run_delegates;
use crate::store::unix_now_millis;
use crate::AccessState;
use crate::DelegateRegistry;
use crate::NotificationDispatcher;
use crate::PermissionCapability;
use crate::PushAccessState;
use crate::PushDelegate;
use crate::PushNotification;
use crate::RegistrationError;
use crate::RegistrationRecord;
use crate::RegistrationStore;
use crate::Result;
use crate::TagSynchronizer;
use crate::TokenProvider;

/// The registration state machine and the hub every other component hangs
/// off. Construct via [`super::PushManagerBuilder`], then call [`start`]
/// once at process start.
///
/// [`start`]: PushManager::start
pub struct PushManager {
    pub(super) store: Arc<RegistrationStore>,
    pub(super) permissions: Arc<dyn PermissionCapability>,
    pub(super) token_provider: Arc<dyn TokenProvider>,
    pub(super) delegates: DelegateRegistry,
    pub(super) dispatcher: Arc<NotificationDispatcher>,
    pub(super) tags: TagSynchronizer,
    pub(super) state: Mutex<RegistrationState>,
    pub(super) native_tx: mpsc::Sender<NativeEvent>,
    // taken exactly once by start()
    pub(super) native_rx: Mutex<Option<mpsc::Receiver<NativeEvent>>>,
    pub(super) shutdown: CancellationToken,
}

impl std::fmt::Debug for PushManager {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PushManager")
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl PushManager {
    /// Requests push access: permission prompt, then native token fetch,
    /// then one atomic store write of token + acquisition timestamp.
    ///
    /// Any non-`Available` outcome (including a provider denial) returns
    /// with the store untouched. Cancellation at either suspension point
    /// surfaces [`RegistrationError::Cancelled`], also with no mutation.
    /// The core never retries; that is the caller's policy.
    pub async fn request_access(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PushAccessState> {
        let access = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RegistrationError::Cancelled.into()),
            r = self.permissions.request_access() => r?,
        };
        if access != AccessState::Available {
            info!(state = %access, "Push permission not available");
            return Ok(PushAccessState::unavailable(access));
        }

        self.set_state(RegistrationState::Registering);
        self.token_provider.set_listening(true).await;

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.restore_state_from_store();
                return Err(RegistrationError::Cancelled.into());
            }
            r = self.token_provider.request_token() => r,
        };

        match fetched {
            Ok(token) => {
                self.store.set_registration(&token, unix_now_millis())?;
                self.set_state(RegistrationState::Registered);
                info!("Push registration complete");
                Ok(PushAccessState::available(token))
            }
            Err(TokenProviderError::Denied) => {
                self.restore_state_from_store();
                Ok(PushAccessState::unavailable(AccessState::Denied))
            }
            Err(TokenProviderError::Unsupported) => {
                self.restore_state_from_store();
                Ok(PushAccessState::unavailable(AccessState::NotSupported))
            }
            Err(TokenProviderError::Failed(source)) => {
                self.restore_state_from_store();
                Err(RegistrationError::TokenFetch { source }.into())
            }
        }
    }

    /// Tears the registration down. The remote invalidation is best-effort;
    /// the local record is cleared unconditionally because a stale local
    /// record is worse than a stale remote one. Idempotent.
    pub async fn unregister(&self) -> Result<()> {
        self.token_provider.set_listening(false).await;
        if let Err(e) = self.token_provider.invalidate_token().await {
            warn!(error = %e, "Remote token invalidation failed, clearing local record anyway");
        }
        self.store.clear()?;
        self.set_state(RegistrationState::Unregistered);
        Ok(())
    }

    /// Process-start hook: re-arms native listening when a registration
    /// already exists and spawns the native event loop. Call once.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        if self.store.registration_token()?.is_some() {
            let provider = self.token_provider.clone();
            tokio::spawn(async move {
                provider.set_listening(true).await;
            });
            self.set_state(RegistrationState::Registered);
        }

        let rx = self
            .native_rx
            .lock()
            .take()
            .ok_or_else(|| crate::Error::Fatal("PushManager::start called twice".to_string()))?;

        let manager = self.clone();
        tokio::spawn(async move {
            manager.run_event_loop(rx).await;
        });
        Ok(())
    }

    /// Stops the native event loop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Feed the platform glue pushes [`NativeEvent`]s into.
    pub fn native_sender(&self) -> mpsc::Sender<NativeEvent> {
        self.native_tx.clone()
    }

    pub fn register_delegate(
        &self,
        delegate: Arc<dyn PushDelegate>,
    ) {
        self.delegates.register(delegate);
    }

    /// Live, replay-free stream of dispatched notifications. Late
    /// subscribers miss prior events; the stream never completes and never
    /// errors (lagged values are silently dropped).
    pub fn when_received(&self) -> impl Stream<Item = PushNotification> {
        BroadcastStream::new(self.dispatcher.subscribe()).filter_map(|r| async move { r.ok() })
    }

    pub fn registration_state(&self) -> RegistrationState {
        *self.state.lock()
    }

    pub fn current_registration_token(&self) -> Result<Option<String>> {
        self.store.registration_token()
    }

    /// Unix milliseconds UTC of the last token acquisition.
    pub fn current_registration_token_date(&self) -> Result<Option<i64>> {
        self.store.token_acquired_at()
    }

    pub fn registered_tags(&self) -> Result<BTreeSet<String>> {
        self.store.tags()
    }

    pub fn registration_record(&self) -> Result<RegistrationRecord> {
        self.store.record()
    }

    pub async fn add_tag(
        &self,
        tag: &str,
    ) -> Result<()> {
        self.tags.add_tag(tag).await
    }

    pub async fn remove_tag(
        &self,
        tag: &str,
    ) -> Result<()> {
        self.tags.remove_tag(tag).await
    }

    pub async fn clear_tags(&self) -> Result<()> {
        self.tags.clear_tags().await
    }

    pub async fn set_tags(
        &self,
        tags: &[String],
    ) -> Result<()> {
        self.tags.set_tags(tags).await
    }

    fn set_state(
        &self,
        next: RegistrationState,
    ) {
        let mut state = self.state.lock();
        debug!(from = %*state, to = %next, "Registration state transition");
        *state = next;
    }

    // A failed or cancelled attempt falls back to whatever the store says:
    // a prior registration survives, otherwise Unregistered.
    fn restore_state_from_store(&self) {
        let registered = matches!(self.store.registration_token(), Ok(Some(_)));
        self.set_state(if registered {
            RegistrationState::Registered
        } else {
            RegistrationState::Unregistered
        });
    }

    async fn run_event_loop(
        &self,
        mut rx: mpsc::Receiver<NativeEvent>,
    ) {
        info!("Push native event loop started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Push native event loop shutting down");
                    return;
                }
                event = rx.recv() => {
                    match event {
                        Some(event) => self.handle_native_event(event).await,
                        None => {
                            info!("Native event feed closed, stopping event loop");
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn handle_native_event(
        &self,
        event: NativeEvent,
    ) {
        match event {
            NativeEvent::TokenRefreshed(token) => {
                if let Err(e) = self.handle_token_refresh(token).await {
                    error!(error = %e, "Failed to apply external token refresh");
                }
            }
            NativeEvent::MessageReceived(message) => {
                let notification = PushNotification::from_native(message);
                if let Err(e) = self.dispatcher.dispatch(notification).await {
                    warn!(error = %e, "Delegate fan-out reported failures for inbound push");
                }
            }
            NativeEvent::Entry(response) => {
                let fanout = run_delegates(&self.delegates, |d| {
                    let r = response.clone();
                    async move { d.on_entry(&r).await }
                })
                .await;
                if let Err(e) = fanout {
                    warn!(error = %e, "Delegate fan-out reported failures for notification entry");
                }
            }
        }
    }

    /// Applies an externally triggered token refresh iff a registration
    /// already exists. Without one the refresh is dropped: the core never
    /// starts a registration the caller did not request.
    pub(crate) async fn handle_token_refresh(
        &self,
        token: String,
    ) -> Result<()> {
        if self.store.registration_token()?.is_none() {
            debug!("Ignoring external token refresh, no registration exists");
            TOKEN_REFRESH_METRIC.with_label_values(&["ignored"]).inc();
            return Ok(());
        }

        self.store.set_registration(&token, unix_now_millis())?;
        self.set_state(RegistrationState::Registered);
        TOKEN_REFRESH_METRIC.with_label_values(&["applied"]).inc();

        let fanout = run_delegates(&self.delegates, |d| {
            let t = token.clone();
            async move { d.on_token_changed(&t).await }
        })
        .await;
        if let Err(e) = fanout {
            warn!(error = %e, "Delegate fan-out reported failures for token change");
        }
        Ok(())
    }
}
