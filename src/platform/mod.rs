//! Platform capability boundary.
//!
//! The native SDK singletons of a real device build (FCM, APNs, the system
//! notification center) are injected behind the traits in this module so the
//! registration state machine runs without a device. Platform glue pushes
//! inbound events through [`NativeEvent`]; the core never calls back into
//! the glue except through these traits.

use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;

use crate::errors::BoxError;
use crate::AccessState;
use crate::NotificationContent;
use crate::NotificationResponse;
use crate::Result;

/// Failure modes of the native token acquisition call.
#[derive(Debug, thiserror::Error)]
pub enum TokenProviderError {
    /// The platform refused to issue a token for this app
    #[error("Token request denied by the platform")]
    Denied,

    /// Push tokens are not supported on this device/build
    #[error("Push tokens are not supported on this platform")]
    Unsupported,

    /// SDK or network failure while fetching the token
    #[error("Token fetch failed: {0}")]
    Failed(#[source] BoxError),
}

/// Platform-specific registration token source (FCM instance token,
/// APNs device token).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    /// Requests a fresh registration token. Safe to call repeatedly over
    /// the process lifetime, e.g. after an external refresh.
    async fn request_token(&self) -> std::result::Result<String, TokenProviderError>;

    /// Invalidates the current remote token (FCM `deleteToken`,
    /// `unregisterForRemoteNotifications`).
    async fn invalidate_token(&self) -> std::result::Result<(), TokenProviderError>;

    /// Arms or disarms the native token/message listening machinery
    /// (FCM auto-init). Disarmed providers stop reporting refreshes.
    async fn set_listening(
        &self,
        enabled: bool,
    );
}

/// System permission prompt for user-visible notifications.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PermissionCapability: Send + Sync + 'static {
    async fn request_access(&self) -> Result<AccessState>;
}

/// Remote topic/tag subscription service of the push backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteTopicService: Send + Sync + 'static {
    async fn subscribe(
        &self,
        tag: &str,
    ) -> std::result::Result<(), BoxError>;

    async fn unsubscribe(
        &self,
        tag: &str,
    ) -> std::result::Result<(), BoxError>;
}

/// On-screen renderer for visible notifications.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRenderer: Send + Sync + 'static {
    async fn send(
        &self,
        content: NotificationContent,
    ) -> std::result::Result<(), BoxError>;
}

/// Raw inbound message as the platform layer hands it over, before
/// normalization. Empty strings are preserved here; normalization strips
/// them (see [`crate::PushNotification::from_native`]).
#[derive(Debug, Clone, Default)]
pub struct NativeMessage {
    pub data: HashMap<String, String>,
    pub notification: Option<NativeAlert>,
}

/// The visible-alert portion of a native message, field-for-field as the
/// SDK reports it (empty strings mean "not set").
#[derive(Debug, Clone, Default)]
pub struct NativeAlert {
    pub title: String,
    pub body: String,
    pub channel_id: String,
    pub icon: String,
    pub color: String,
}

/// Events the platform glue feeds into the core's event loop.
#[derive(Debug)]
pub enum NativeEvent {
    /// The platform spontaneously issued a new registration token
    TokenRefreshed(String),

    /// An inbound push message arrived
    MessageReceived(NativeMessage),

    /// The user interacted with a displayed notification
    Entry(NotificationResponse),
}
