//! Live catalog sync
//!
//! Keeps a locally cached view of the server-side listing: one bulk fetch
//! for the snapshot, then a stream of change events reconciled into it by
//! a pure reducer. The listing is only ever a cache of remote truth.

use crate::{
    catalog::{CatalogEntry, Category},
    notify::{Notification, Notifier},
    source::{CatalogSource, CatalogSourceError, ChangeEvent, Subscription},
};

/// What applying one change event did to the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A new entry was prepended.
    Inserted,
    /// An existing entry was replaced in place and is still visible.
    Updated,
    /// An entry left the visible listing.
    Removed,
    /// The event had no effect.
    Ignored,
}

/// Reconcile one change event into the listing.
///
/// Events may arrive in any order relative to the bulk fetch and to each
/// other, so every rule here is tolerant of the record not being where a
/// strictly ordered stream would put it:
///
/// - an insert for an id already present replaces that entry in place
///   rather than duplicating it;
/// - an update for an unknown id is a no-op (an earlier or later insert
///   establishes the entry);
/// - an update also re-filters the whole listing to active entries, so a
///   status flip disappears in the same pass;
/// - a delete for an unknown id is a no-op.
pub fn apply_event(listing: &mut Vec<CatalogEntry>, event: &ChangeEvent) -> Applied {
    match event {
        ChangeEvent::Inserted(entry) => {
            if !entry.is_visible() {
                return Applied::Ignored;
            }

            if let Some(existing) = listing.iter_mut().find(|e| e.id == entry.id) {
                *existing = entry.clone();
                return Applied::Updated;
            }

            listing.insert(0, entry.clone());
            Applied::Inserted
        }
        ChangeEvent::Updated(entry) => {
            let Some(existing) = listing.iter_mut().find(|e| e.id == entry.id) else {
                return Applied::Ignored;
            };

            *existing = entry.clone();

            let before = listing.len();
            listing.retain(CatalogEntry::is_visible);

            if listing.len() < before {
                Applied::Removed
            } else {
                Applied::Updated
            }
        }
        ChangeEvent::Deleted(id) => {
            let before = listing.len();
            listing.retain(|e| e.id != *id);

            if listing.len() < before {
                Applied::Removed
            } else {
                Applied::Ignored
            }
        }
    }
}

/// Real-time-consistent view of the active catalog.
#[derive(Debug)]
pub struct LiveCatalog<C, N> {
    source: C,
    notifier: N,
    listing: Vec<CatalogEntry>,
    loading: bool,
    error: Option<CatalogSourceError>,
}

impl<C: CatalogSource, N: Notifier> LiveCatalog<C, N> {
    /// Create an empty view over the given source.
    #[must_use]
    pub fn new(source: C, notifier: N) -> Self {
        Self {
            source,
            notifier,
            listing: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Activate: open the subscription, then take the initial snapshot.
    ///
    /// Subscribing before fetching means changes made during the fetch are
    /// queued rather than lost; the reducer absorbs the resulting overlap.
    /// A subscription failure degrades to a non-live listing and returns
    /// `None`; the snapshot is still taken.
    pub async fn start(&mut self) -> Option<Subscription> {
        let subscription = self.subscribe().await;

        self.load().await;

        subscription
    }

    /// Take (or retake) the bulk snapshot of active entries.
    ///
    /// On failure the previous listing is kept as a stale-but-correct view
    /// and the retryable [`LiveCatalog::error`] state is set.
    pub async fn load(&mut self) {
        self.loading = true;

        match self.source.fetch_active().await {
            Ok(entries) => {
                self.listing = entries;
                self.error = None;
            }
            Err(error) => {
                tracing::warn!("catalog fetch failed: {error}");
                self.notifier.notify(Notification::error(
                    "Could not load listings",
                    error.to_string(),
                ));
                self.error = Some(error);
            }
        }

        self.loading = false;
    }

    /// Manual retry entry point; repeats the bulk fetch.
    pub async fn refresh(&mut self) {
        self.load().await;
    }

    /// Open the change subscription.
    ///
    /// Failure is logged and returns `None`: the UI degrades to the
    /// snapshot instead of becoming unusable.
    pub async fn subscribe(&self) -> Option<Subscription> {
        match self.source.subscribe().await {
            Ok(subscription) => Some(subscription),
            Err(error) => {
                tracing::warn!("catalog subscription unavailable, listing is not live: {error}");
                None
            }
        }
    }

    /// Apply events until the subscription's transport closes.
    ///
    /// Callers `select!` this against their own shutdown signal; dropping
    /// the subscription afterwards releases the transport.
    pub async fn pump(&mut self, subscription: &mut Subscription) {
        while let Some(event) = subscription.next().await {
            self.apply(&event);
        }

        tracing::debug!("catalog change stream ended");
    }

    /// Reconcile one event and surface the user-visible changes.
    pub fn apply(&mut self, event: &ChangeEvent) -> Applied {
        let applied = apply_event(&mut self.listing, event);

        match (event, applied) {
            (ChangeEvent::Inserted(entry), Applied::Inserted) => {
                self.notifier.notify(Notification::info(
                    "New listing",
                    format!("{} was just added", entry.name),
                ));
            }
            (ChangeEvent::Deleted(_), Applied::Removed) => {
                self.notifier
                    .notify(Notification::info("Listing removed", "An item is no longer available"));
            }
            _ => {}
        }

        applied
    }

    /// The visible listing, most recent insert first.
    #[must_use]
    pub fn listing(&self) -> &[CatalogEntry] {
        &self.listing
    }

    /// Whether a bulk fetch is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The last fetch failure, cleared by a successful refresh.
    #[must_use]
    pub fn error(&self) -> Option<&CatalogSourceError> {
        self.error.as_ref()
    }

    /// Look up a visible entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.listing.iter().find(|entry| entry.id == id)
    }

    /// Visible entries on one side of the marketplace.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.listing
            .iter()
            .filter(move |entry| entry.category == category)
    }

    /// Visible entries pinned to the featured strip.
    pub fn featured(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.listing.iter().filter(|entry| entry.featured)
    }
}
