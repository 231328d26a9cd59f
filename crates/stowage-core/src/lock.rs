//! Advisory, time-bounded mutual exclusion keyed by string.
//!
//! Migrations for one owner are serialized through this seam. The contract
//! is deliberately small: a non-blocking acquire that returns a token on
//! success, and a token-checked release. Any store offering
//! compare-and-swap-with-expiry semantics can back it; stowage-db ships a
//! Postgres lease table, and [`InMemoryLock`] covers single-process
//! deployments and tests.
//!
//! There is no cancellation. If a holder crashes, the lease expires after
//! its TTL and a later attempt may proceed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;

#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Attempt to take the lease for `key`. Returns a release token on
    /// success, `None` if the lease is currently held. Never blocks waiting
    /// for the holder.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<Uuid>, AppError>;

    /// Release the lease identified by `key` if `token` still owns it. A
    /// release with a stale token (the lease expired and was re-acquired)
    /// must leave the current holder untouched.
    async fn release(&self, key: &str, token: Uuid) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy)]
struct Lease {
    token: Uuid,
    expires_at: Instant,
}

/// Process-local [`DistributedLock`] over a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryLock {
    leases: Mutex<HashMap<String, Lease>>,
}

impl InMemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an unexpired lease currently exists for `key`.
    pub fn is_held(&self, key: &str) -> bool {
        let leases = self.leases.lock().expect("lease map poisoned");
        leases
            .get(key)
            .map(|lease| lease.expires_at > Instant::now())
            .unwrap_or(false)
    }
}

#[async_trait]
impl DistributedLock for InMemoryLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<Uuid>, AppError> {
        let mut leases = self.leases.lock().expect("lease map poisoned");
        let now = Instant::now();

        if let Some(existing) = leases.get(key) {
            if existing.expires_at > now {
                return Ok(None);
            }
        }

        let token = Uuid::new_v4();
        leases.insert(
            key.to_string(),
            Lease {
                token,
                expires_at: now + ttl,
            },
        );
        Ok(Some(token))
    }

    async fn release(&self, key: &str, token: Uuid) -> Result<(), AppError> {
        let mut leases = self.leases.lock().expect("lease map poisoned");
        if let Some(existing) = leases.get(key) {
            if existing.token == token {
                leases.remove(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn acquire_then_contend_then_release() {
        let lock = InMemoryLock::new();

        let token = lock.try_acquire("k", TTL).await.unwrap().unwrap();
        assert!(lock.is_held("k"));
        assert!(lock.try_acquire("k", TTL).await.unwrap().is_none());

        lock.release("k", token).await.unwrap();
        assert!(!lock.is_held("k"));
        assert!(lock.try_acquire("k", TTL).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn expired_lease_can_be_taken_over() {
        let lock = InMemoryLock::new();

        let stale = lock
            .try_acquire("k", Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;

        let fresh = lock.try_acquire("k", TTL).await.unwrap().unwrap();
        assert_ne!(stale, fresh);

        // The crashed holder's late release must not evict the new owner.
        lock.release("k", stale).await.unwrap();
        assert!(lock.is_held("k"));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let lock = InMemoryLock::new();
        lock.try_acquire("a", TTL).await.unwrap().unwrap();
        assert!(lock.try_acquire("b", TTL).await.unwrap().is_some());
    }
}
