use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use num_bigint::BigUint;

use super::DepositRecord;

/// Time-ordered deposit history for one depositor.
///
/// Records are appended at the tail and evicted from the head, which relies
/// on timestamps arriving in non-decreasing order.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    records: VecDeque<DepositRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DepositRecord) {
        self.records.push_back(record);
    }

    /// Drop records older than `cutoff`. Returns how many were evicted.
    pub fn evict_before(&mut self, cutoff: u64) -> usize {
        let mut evicted = 0;
        while self.records.front().is_some_and(|r| r.timestamp < cutoff) {
            self.records.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Exact sum of every record still held.
    pub fn total(&self) -> BigUint {
        self.records.iter().map(|r| &r.value).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &DepositRecord> {
        self.records.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Per-address deposit ledgers. Addresses are stored lower-cased.
#[derive(Debug, Default)]
pub struct LedgerStore {
    ledgers: HashMap<String, Ledger>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &str) -> Option<&Ledger> {
        self.ledgers.get(&address.to_lowercase())
    }

    pub fn get_or_create(&mut self, address: &str) -> &mut Ledger {
        self.ledgers.entry(address.to_lowercase()).or_default()
    }

    /// Evict stale records from one ledger, removing it if nothing is left.
    pub fn prune_address(&mut self, address: &str, cutoff: u64) -> usize {
        match self.ledgers.entry(address.to_lowercase()) {
            Entry::Occupied(mut entry) => {
                let evicted = entry.get_mut().evict_before(cutoff);
                if entry.get().is_empty() {
                    entry.remove();
                }
                evicted
            }
            Entry::Vacant(_) => 0,
        }
    }

    /// Evict stale records from every ledger and drop the empty ones.
    /// Returns how many records were evicted.
    pub fn prune_all(&mut self, cutoff: u64) -> usize {
        let mut evicted = 0;
        self.ledgers.retain(|_, ledger| {
            evicted += ledger.evict_before(cutoff);
            !ledger.is_empty()
        });
        evicted
    }

    /// Number of tracked addresses.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Total records held across every ledger.
    pub fn record_count(&self) -> usize {
        self.ledgers.values().map(Ledger::len).sum()
    }
}
