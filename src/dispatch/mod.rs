//! Inbound notification dispatch pipeline.
//!
//! One normalized notification is delivered three ways, in order: the live
//! multicast stream, the registered delegates, and (for visible alerts) the
//! external renderer. Delegate failures never block the other two paths;
//! they surface only as the returned aggregate error.


use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::metrics::PUSH_RECEIVED_METRIC;
use crate::run_delegates;
use crate::DelegateRegistry;
use crate::NotificationRenderer;
use crate::PushNotification;
use crate::Result;

pub struct NotificationDispatcher {
    events: broadcast::Sender<PushNotification>,
    delegates: DelegateRegistry,
    renderer: Arc<dyn NotificationRenderer>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(
        capacity: usize,
        delegates: DelegateRegistry,
        renderer: Arc<dyn NotificationRenderer>,
    ) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            events,
            delegates,
            renderer,
        }
    }

    /// Live, replay-free feed of dispatched notifications. Subscribing late
    /// misses prior events; lagged receivers drop the oldest values.
    pub fn subscribe(&self) -> broadcast::Receiver<PushNotification> {
        self.events.subscribe()
    }

    /// Delivers one notification: stream, delegates, renderer.
    ///
    /// The returned error, if any, is the delegate aggregate; the stream
    /// emission and renderer forwarding have already happened by then.
    pub async fn dispatch(
        &self,
        notification: PushNotification,
    ) -> Result<()> {
        PUSH_RECEIVED_METRIC.inc();

        // no subscribers: the value is dropped, not buffered
        let _ = self.events.send(notification.clone());

        let fanout = run_delegates(&self.delegates, |d| {
            let n = notification.clone();
            async move { d.on_received(&n).await }
        })
        .await;

        if let Some(content) = notification.notification() {
            if let Err(e) = self.renderer.send(content.clone()).await {
                warn!(error = %e, "Notification renderer failed");
            }
        }

        fanout
    }
}
