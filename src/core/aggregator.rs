use num_bigint::BigUint;
use tracing::debug;

use super::ledger::LedgerStore;
use super::{DepositEvent, DepositRecord};

/// Windowed total for an address that crossed the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breach {
    pub address: String,
    pub total: BigUint,
    /// Contributing records, oldest first.
    pub records: Vec<DepositRecord>,
}

/// Per-event rolling-sum evaluation over the ledger store.
#[derive(Debug, Clone)]
pub struct Aggregator {
    threshold: BigUint,
    window_secs: u64,
}

impl Aggregator {
    pub fn new(threshold: BigUint, window_secs: u64) -> Self {
        Self {
            threshold,
            window_secs,
        }
    }

    pub fn threshold(&self) -> &BigUint {
        &self.threshold
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Record a deposit and return a breach if the windowed total now
    /// strictly exceeds the threshold. Non-native deposits are ignored.
    pub fn apply(&self, store: &mut LedgerStore, event: &DepositEvent, timestamp: u64) -> Option<Breach> {
        if !event.is_native() {
            return None;
        }

        let address = event.depositor.to_lowercase();
        store.prune_address(&address, timestamp.saturating_sub(self.window_secs));

        let ledger = store.get_or_create(&address);
        ledger.push(DepositRecord::new(timestamp, event.amount.clone()));
        let total = ledger.total();

        if total <= self.threshold {
            debug!(%address, %total, "Deposit within threshold");
            return None;
        }

        Some(Breach {
            records: ledger.records().cloned().collect(),
            address,
            total,
        })
    }
}
