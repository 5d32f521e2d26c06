//! Per-key, self-expiring ownership claims
//!
//! `KeyLocks` is a non-blocking probe: `lock` either claims the key right
//! away or reports that somebody else holds it. Claims expire on their own
//! so a crashed or hung holder never blocks a key forever.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Identifies one successful claim on a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockToken(NonZeroU64);

impl LockToken {
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

#[derive(Debug)]
struct LockEntry {
    token: NonZeroU64,
    deadline: Instant,
}

/// Table of per-key claims
#[derive(Debug)]
pub struct KeyLocks {
    entries: DashMap<String, LockEntry>,
    next_token: AtomicU64,
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyLocks {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_token: AtomicU64::new(1),
        }
    }

    /// Try to claim `key` for at most `timeout`.
    ///
    /// Returns `None` immediately when a live claim already exists.
    pub fn lock(&self, key: &str, timeout: Duration) -> Option<LockToken> {
        let now = Instant::now();
        let token = self.issue_token();
        let entry = LockEntry {
            token,
            deadline: now + timeout,
        };

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().deadline > now {
                    return None;
                }
                occupied.insert(entry);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }

        Some(LockToken(token))
    }

    /// Release `key` if `token` still identifies the current claim.
    ///
    /// A stale token (its claim expired and the key was re-claimed) is ignored.
    pub fn unlock(&self, key: &str, token: LockToken) {
        self.entries
            .remove_if(key, |_, entry| entry.token == token.0);
    }

    /// Drop every expired claim, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.deadline > now);
        before.saturating_sub(self.entries.len())
    }

    /// Number of claims currently tracked (live or expired)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn issue_token(&self) -> NonZeroU64 {
        loop {
            // Skips zero on wrap-around.
            if let Some(token) = NonZeroU64::new(self.next_token.fetch_add(1, Ordering::Relaxed)) {
                return token;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_second_lock_is_refused_until_unlock() {
        let locks = KeyLocks::new();
        let first = locks.lock("k", Duration::from_secs(2)).unwrap();
        assert!(locks.lock("k", Duration::from_secs(2)).is_none());

        locks.unlock("k", first);
        let second = locks.lock("k", Duration::from_secs(2));
        assert!(second.is_some());
        assert_ne!(second.unwrap(), first);
    }

    #[test]
    fn test_claim_expires() {
        let locks = KeyLocks::new();
        let _first = locks.lock("k", Duration::from_millis(20)).unwrap();
        assert!(locks.lock("k", Duration::from_millis(20)).is_none());

        thread::sleep(Duration::from_millis(40));
        assert!(locks.lock("k", Duration::from_secs(2)).is_some());
    }

    #[test]
    fn test_stale_token_does_not_release_newer_claim() {
        let locks = KeyLocks::new();
        let stale = locks.lock("k", Duration::from_millis(10)).unwrap();
        thread::sleep(Duration::from_millis(30));

        let fresh = locks.lock("k", Duration::from_secs(2)).unwrap();
        locks.unlock("k", stale);
        assert!(locks.lock("k", Duration::from_secs(2)).is_none());

        locks.unlock("k", fresh);
        assert!(locks.is_empty());
    }

    #[test]
    fn test_independent_keys() {
        let locks = KeyLocks::new();
        assert!(locks.lock("a", Duration::from_secs(2)).is_some());
        assert!(locks.lock("b", Duration::from_secs(2)).is_some());
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_exactly_one_concurrent_winner() {
        let locks = Arc::new(KeyLocks::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let locks = Arc::clone(&locks);
                thread::spawn(move || locks.lock("k", Duration::from_secs(2)).is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_purge_expired() {
        let locks = KeyLocks::new();
        locks.lock("short", Duration::from_millis(10)).unwrap();
        locks.lock("long", Duration::from_secs(60)).unwrap();
        thread::sleep(Duration::from_millis(30));

        assert_eq!(locks.purge_expired(), 1);
        assert_eq!(locks.len(), 1);
        assert!(locks.lock("long", Duration::from_secs(1)).is_none());
    }
}
