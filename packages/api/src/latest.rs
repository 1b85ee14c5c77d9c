//! Latest-wins guard for overlapping fetches.
//!
//! Changing the filter while a fetch is in flight starts a second fetch.
//! The responses can arrive in either order, and only the one issued for
//! the current filter may reach the view. Each fetch takes a [`Ticket`]
//! before it starts and hands it back with its result; a result whose
//! ticket has been superseded is dropped.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
}

impl<K> Ticket<K> {
    /// The key the fetch was issued for.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Issue order, starting at 1.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
struct Latest<K> {
    key: Option<K>,
    seq: u64,
}

/// Tracks the newest fetch for one view section.
#[derive(Debug)]
pub struct LatestRequest<K> {
    latest: Mutex<Latest<K>>,
}

impl<K> Default for LatestRequest<K> {
    fn default() -> Self {
        Self {
            latest: Mutex::new(Latest { key: None, seq: 0 }),
        }
    }
}

impl<K: Clone + PartialEq + fmt::Debug> LatestRequest<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new fetch for `key`, superseding every earlier ticket.
    pub fn issue(&self, key: K) -> Ticket<K> {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.seq += 1;
        latest.key = Some(key.clone());
        log::trace!("Issued fetch #{} for {key:?}", latest.seq);
        Ticket {
            key,
            seq: latest.seq,
        }
    }

    /// Returns `true` if `ticket` is still the newest one issued.
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.seq == ticket.seq && latest.key.as_ref() == Some(&ticket.key)
    }

    /// Passes `result` through if `ticket` is current, otherwise drops it.
    pub fn accept<T>(&self, ticket: &Ticket<K>, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            log::debug!(
                "Discarding stale response #{} for {:?}",
                ticket.seq,
                ticket.key
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let guard = LatestRequest::new();
        let first = guard.issue("Pacific Coast");
        let second = guard.issue("Rocky Mountain");

        assert_eq!(guard.accept(&first, 1), None);
        assert_eq!(guard.accept(&second, 2), Some(2));
        assert_eq!(second.seq(), 2);
        assert_eq!(*second.key(), "Rocky Mountain");
    }

    #[test]
    fn reissuing_same_key_still_supersedes() {
        let guard = LatestRequest::new();
        let first = guard.issue("South");
        let second = guard.issue("South");
        assert!(!guard.is_current(&first));
        assert!(guard.is_current(&second));
    }

    #[tokio::test]
    async fn slow_stale_response_is_dropped() {
        let guard = Arc::new(LatestRequest::new());

        let slow = {
            let guard = Arc::clone(&guard);
            let ticket = guard.issue("North");
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                guard.accept(&ticket, "north rows")
            })
        };
        let fast = {
            let guard = Arc::clone(&guard);
            let ticket = guard.issue("South");
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                guard.accept(&ticket, "south rows")
            })
        };

        assert_eq!(fast.await.unwrap(), Some("south rows"));
        assert_eq!(slow.await.unwrap(), None);
    }
}
