//! Tag subscription reconciliation.
//!
//! The remote subscription service is the source of truth; a tag reaches
//! the persisted set only after the remote call for it succeeded. There is
//! no transaction across tags: a push backend has no atomic multi-topic
//! API, so each tag is reconciled independently in forward order.

#[cfg(test)]
mod tag_synchronizer_test;

use std::sync::Arc;

use tracing::warn;

use crate::RegistrationStore;
use crate::RemoteTopicService;
use crate::Result;
use crate::SubscriptionError;

pub struct TagSynchronizer {
    store: Arc<RegistrationStore>,
    remote: Arc<dyn RemoteTopicService>,
}

impl std::fmt::Debug for TagSynchronizer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("TagSynchronizer").finish()
    }
}

impl TagSynchronizer {
    pub fn new(
        store: Arc<RegistrationStore>,
        remote: Arc<dyn RemoteTopicService>,
    ) -> Self {
        Self { store, remote }
    }

    /// Subscribes `tag` remotely, then persists it. The remote call is
    /// issued even for an already-persisted tag: the service owns
    /// subscription state, the store only mirrors it.
    pub async fn add_tag(
        &self,
        tag: &str,
    ) -> Result<()> {
        self.remote
            .subscribe(tag)
            .await
            .map_err(|source| SubscriptionError::Remote {
                tag: tag.to_string(),
                source,
            })?;
        self.store.add_tag(tag)
    }

    /// Unsubscribes `tag` remotely, then removes it from the persisted set.
    /// The store removal is a no-op for an absent tag.
    pub async fn remove_tag(
        &self,
        tag: &str,
    ) -> Result<()> {
        self.remote
            .unsubscribe(tag)
            .await
            .map_err(|source| SubscriptionError::Remote {
                tag: tag.to_string(),
                source,
            })?;
        self.store.remove_tag(tag)
    }

    /// Unsubscribes every persisted tag, one remote call at a time.
    ///
    /// A failed unsubscribe leaves that tag persisted and moves on; tags
    /// already removed stay removed. Partial progress is deliberate.
    pub async fn clear_tags(&self) -> Result<()> {
        for tag in self.store.tags()? {
            match self.remote.unsubscribe(&tag).await {
                Ok(()) => self.store.remove_tag(&tag)?,
                Err(e) => {
                    warn!(tag = %tag, error = %e, "Unsubscribe failed during clear, tag kept");
                }
            }
        }
        Ok(())
    }

    /// Replaces the subscription set: clear, then add each entry in the
    /// caller's order. The first failed add aborts the remainder.
    pub async fn set_tags(
        &self,
        tags: &[String],
    ) -> Result<()> {
        self.clear_tags().await?;
        for tag in tags {
            self.add_tag(tag).await?;
        }
        Ok(())
    }
}
