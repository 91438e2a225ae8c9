//! Ordered read locks over the shared collaborators.
//!
//! Global acquisition order is index, then wallet, then pool. Guards are
//! released on drop, so every exit path (including `?`) unlocks.

use parking_lot::{RwLock, RwLockReadGuard};

use crate::ports::outbound::WalletOwnership;

/// Read snapshot of the name index plus the optional wallet.
pub struct IndexSnapshot<'a, I, W> {
    index: RwLockReadGuard<'a, I>,
    wallet: Option<RwLockReadGuard<'a, W>>,
}

impl<'a, I, W: WalletOwnership> IndexSnapshot<'a, I, W> {
    pub fn acquire(index: &'a RwLock<I>, wallet: Option<&'a RwLock<W>>) -> Self {
        let index = index.read();
        let wallet = wallet.map(|w| w.read());
        Self { index, wallet }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn wallet(&self) -> Option<&dyn WalletOwnership> {
        self.wallet
            .as_deref()
            .map(|wallet| wallet as &dyn WalletOwnership)
    }
}

/// Read snapshot of the optional wallet plus the pending pool.
pub struct PoolSnapshot<'a, W, P> {
    wallet: Option<RwLockReadGuard<'a, W>>,
    pool: RwLockReadGuard<'a, P>,
}

impl<'a, W: WalletOwnership, P> PoolSnapshot<'a, W, P> {
    pub fn acquire(wallet: Option<&'a RwLock<W>>, pool: &'a RwLock<P>) -> Self {
        let wallet = wallet.map(|w| w.read());
        let pool = pool.read();
        Self { wallet, pool }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn wallet(&self) -> Option<&dyn WalletOwnership> {
        self.wallet
            .as_deref()
            .map(|wallet| wallet as &dyn WalletOwnership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryNameIndex, InMemoryPendingPool, InMemoryWallet};
    use crate::ports::outbound::NoWallet;

    #[test]
    fn test_guards_released_on_drop() {
        let index = RwLock::new(InMemoryNameIndex::new(false));
        let wallet = RwLock::new(InMemoryWallet::default());
        {
            let snapshot = IndexSnapshot::acquire(&index, Some(&wallet));
            assert!(snapshot.wallet().is_some());
            assert!(index.try_write().is_none());
            assert!(wallet.try_write().is_none());
        }
        assert!(index.try_write().is_some());
        assert!(wallet.try_write().is_some());
    }

    #[test]
    fn test_readers_share_the_index() {
        let index = RwLock::new(InMemoryNameIndex::new(false));
        let first = IndexSnapshot::<_, NoWallet>::acquire(&index, None);
        let second = IndexSnapshot::<_, NoWallet>::acquire(&index, None);
        assert!(first.wallet().is_none());
        assert_eq!(first.index().len(), second.index().len());
    }

    #[test]
    fn test_pool_snapshot_without_wallet() {
        let pool = RwLock::new(InMemoryPendingPool::default());
        {
            let snapshot = PoolSnapshot::<NoWallet, _>::acquire(None, &pool);
            assert!(snapshot.wallet().is_none());
            assert!(pool.try_write().is_none());
        }
        assert!(pool.try_write().is_some());
    }
}
