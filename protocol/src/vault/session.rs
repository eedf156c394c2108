//! # Session — Explicit, Owned, No Globals
//!
//! The presentation layer needs somewhere to keep the current account, the
//! attached attestation, the last token listing, and the "is something
//! already in flight for this?" flags. The original design kept all of
//! that in ambient global observer state; here it is one owned object,
//! passed by handle to whoever needs it, with an explicit subscribe
//! lifecycle for change notifications.
//!
//! Ownership rules, enforced by construction:
//!
//! - The pending flag for an operation is owned by whoever started it:
//!   [`Session::begin`] hands back an RAII [`PendingGuard`] and nobody
//!   else can clear the flag.
//! - The token cache is only ever a read-through copy; any mutate marks
//!   it stale and [`Session::cached_tokens`] stops serving it until the
//!   next stored listing.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::broadcast;

use crate::attestation::ActivityStats;
use crate::vault::token::TokenListing;

/// Capacity of the session event channel. Enough to absorb a burst of
/// refreshes without disconnecting a slow subscriber.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notifications emitted as the session's state changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// An attestation was attached for the given username.
    AttestationAttached {
        /// The attested username.
        username: String,
    },
    /// A fresh token listing was stored.
    TokensRefreshed {
        /// Number of well-formed tokens in the listing.
        count: usize,
    },
    /// The cache was invalidated (a mutate was submitted).
    CacheInvalidated,
}

/// One user's session against one account.
pub struct Session {
    address: String,
    attestation: RwLock<Option<ActivityStats>>,
    cache: RwLock<Cache>,
    pending: Mutex<HashSet<String>>,
    events: broadcast::Sender<SessionEvent>,
}

#[derive(Default)]
struct Cache {
    listing: Option<TokenListing>,
    fresh: bool,
}

impl Session {
    /// Opens a session for an account address.
    pub fn new(address: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            address: address.to_string(),
            attestation: RwLock::new(None),
            cache: RwLock::new(Cache::default()),
            pending: Mutex::new(HashSet::new()),
            events,
        }
    }

    /// The account this session is bound to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Subscribes to session events. Dropping the receiver unsubscribes;
    /// there is nothing else to clean up.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(event);
    }

    // -- attestation --

    /// Attaches a derived attestation, replacing any previous one.
    pub fn attach_attestation(&self, stats: ActivityStats) {
        let username = stats.username.clone();
        *self.attestation.write() = Some(stats);
        self.emit(SessionEvent::AttestationAttached { username });
    }

    /// The currently attached attestation, if any.
    pub fn attestation(&self) -> Option<ActivityStats> {
        self.attestation.read().clone()
    }

    /// Drops the attached attestation.
    pub fn clear_attestation(&self) {
        *self.attestation.write() = None;
    }

    // -- token cache --

    /// Stores a freshly queried listing and marks the cache fresh.
    pub fn store_listing(&self, listing: TokenListing) {
        let count = listing.tokens.len();
        *self.cache.write() = Cache {
            listing: Some(listing),
            fresh: true,
        };
        self.emit(SessionEvent::TokensRefreshed { count });
    }

    /// Marks the cache stale. Call after every mutate — there is no push
    /// invalidation from the ledger.
    pub fn mark_stale(&self) {
        self.cache.write().fresh = false;
        self.emit(SessionEvent::CacheInvalidated);
    }

    /// The cached listing, but only while it is still fresh. A stale cache
    /// returns `None` and the caller should re-query.
    pub fn cached_tokens(&self) -> Option<TokenListing> {
        let cache = self.cache.read();
        if cache.fresh {
            cache.listing.clone()
        } else {
            None
        }
    }

    // -- pending flags --

    /// Marks `operation` as in flight. Returns `None` if it already is —
    /// the caller should not start a second one. The returned guard clears
    /// the flag on drop and is the only way to clear it.
    pub fn begin<'s>(&'s self, operation: &str) -> Option<PendingGuard<'s>> {
        let mut pending = self.pending.lock();
        if !pending.insert(operation.to_string()) {
            return None;
        }
        Some(PendingGuard {
            session: self,
            operation: operation.to_string(),
        })
    }

    /// Whether `operation` is currently in flight.
    pub fn is_pending(&self, operation: &str) -> bool {
        self.pending.lock().contains(operation)
    }
}

/// RAII clear for a pending flag. Held by the component that set the flag;
/// dropping it (on success, failure, or panic unwind) releases the flag.
pub struct PendingGuard<'s> {
    session: &'s Session,
    operation: String,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.session.pending.lock().remove(&self.operation);
    }
}
