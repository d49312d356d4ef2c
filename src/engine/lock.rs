use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use ulid::Ulid;

/// Per-provider serialization point for the booking guard's check-and-write.
///
/// Bookings for different providers proceed independently; bookings for the
/// same provider queue on its mutex. Entries are created lazily and kept for
/// the provider's lifetime (bounded by the provider population).
#[derive(Default)]
pub struct ProviderLocks {
    locks: DashMap<Ulid, Arc<Mutex<()>>>,
}

impl ProviderLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the exclusive section for one provider. The guard releases on
    /// drop, so every exit path out of the critical section unlocks.
    pub async fn acquire(&self, provider_id: Ulid) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(provider_id).or_default().value().clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_provider_serializes() {
        let locks = ProviderLocks::new();
        let id = Ulid::new();
        let held = locks.acquire(id).await;

        let blocked = tokio::time::timeout(Duration::from_millis(20), locks.acquire(id)).await;
        assert!(blocked.is_err());

        drop(held);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(20), locks.acquire(id)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_providers_do_not_contend() {
        let locks = ProviderLocks::new();
        let _held = locks.acquire(Ulid::new()).await;

        let other = tokio::time::timeout(Duration::from_millis(20), locks.acquire(Ulid::new()))
            .await;
        assert!(other.is_ok());
    }
}
