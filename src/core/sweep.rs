use tracing::debug;

use super::ledger::LedgerStore;

/// Minimum gap between two global sweeps, independent of the window length.
pub const SWEEP_INTERVAL_SECS: u64 = 2000;

/// Periodic bulk pruning of the whole ledger store.
///
/// Between sweeps the store may hold stale records; aggregation re-prunes
/// the ledger it touches, so totals are never affected.
#[derive(Debug, Default)]
pub struct WindowMaintainer {
    last_sweep_timestamp: u64,
}

impl WindowMaintainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sweep_timestamp(&self) -> u64 {
        self.last_sweep_timestamp
    }

    /// Sweep the store if more than `SWEEP_INTERVAL_SECS` passed since the
    /// last sweep. Returns `true` when a sweep ran.
    pub fn maybe_sweep(&mut self, store: &mut LedgerStore, timestamp: u64, window_secs: u64) -> bool {
        if timestamp.saturating_sub(self.last_sweep_timestamp) <= SWEEP_INTERVAL_SECS {
            return false;
        }

        let evicted = store.prune_all(timestamp.saturating_sub(window_secs));
        self.last_sweep_timestamp = timestamp;
        debug!(
            timestamp,
            evicted,
            addresses = store.len(),
            "Swept deposit ledgers"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DepositRecord;
    use num_bigint::BigUint;

    fn store_with(entries: &[(&str, u64)]) -> LedgerStore {
        let mut store = LedgerStore::new();
        for (address, timestamp) in entries {
            store
                .get_or_create(address)
                .push(DepositRecord::new(*timestamp, BigUint::from(1u8)));
        }
        store
    }

    #[test]
    fn skips_until_interval_elapsed() {
        let mut store = store_with(&[("0xa", 0)]);
        let mut sweeper = WindowMaintainer::new();

        assert!(!sweeper.maybe_sweep(&mut store, SWEEP_INTERVAL_SECS, 60));
        assert_eq!(store.len(), 1);
        assert_eq!(sweeper.last_sweep_timestamp(), 0);
    }

    #[test]
    fn sweep_drops_stale_ledgers() {
        let mut store = store_with(&[("0xa", 0), ("0xb", 1990), ("0xb", 2000)]);
        let mut sweeper = WindowMaintainer::new();

        assert!(sweeper.maybe_sweep(&mut store, 2001, 11));
        assert!(store.get("0xa").is_none());
        assert_eq!(store.get("0xb").map(|l| l.len()), Some(2));
        assert_eq!(sweeper.last_sweep_timestamp(), 2001);
    }

    #[test]
    fn next_sweep_measured_from_last() {
        let mut store = store_with(&[("0xa", 2500)]);
        let mut sweeper = WindowMaintainer::new();

        assert!(sweeper.maybe_sweep(&mut store, 2001, 100));
        assert!(!sweeper.maybe_sweep(&mut store, 4001, 100));
        assert!(sweeper.maybe_sweep(&mut store, 4002, 100));
        assert!(store.is_empty());
    }
}
