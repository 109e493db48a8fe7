//! Remote catalog source
//!
//! Port for the hosted data service: one bulk query plus one long-lived
//! change subscription. The core depends only on this contract shape,
//! never on a concrete transport.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::catalog::{CatalogEntry, EntryId};

/// Errors surfaced by the remote catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogSourceError {
    /// The bulk fetch failed; recoverable via a manual refresh.
    #[error("catalog fetch failed: {0}")]
    Fetch(String),

    /// The change subscription could not be established.
    #[error("catalog subscription unavailable: {0}")]
    Subscribe(String),
}

/// One change notification from the entries table.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A new entry was created.
    Inserted(CatalogEntry),
    /// An existing entry was modified; carries the full new record.
    Updated(CatalogEntry),
    /// An entry was deleted.
    Deleted(EntryId),
}

/// Live change stream, released on drop.
///
/// Dropping the subscription closes the channel, which is how the
/// transport side learns the consumer is gone. Unmounting a view only has
/// to let the guard go out of scope, on every exit path.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Build a subscription and the sender half that feeds it.
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<ChangeEvent>, Self) {
        let (sender, events) = mpsc::channel(capacity);

        (sender, Self { events })
    }

    /// Next event, or `None` once the transport side has closed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.events.close();
        tracing::debug!("catalog subscription released");
    }
}

/// Remote data-service contract for catalog entries.
#[automock]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every active entry, newest first.
    async fn fetch_active(&self) -> Result<Vec<CatalogEntry>, CatalogSourceError>;

    /// Open the change subscription covering inserts, updates and deletes.
    async fn subscribe(&self) -> Result<Subscription, CatalogSourceError>;
}
