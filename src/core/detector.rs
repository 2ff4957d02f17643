use ethers::types::Address;
use num_bigint::BigUint;
use tracing::{debug, info, warn};

use super::aggregator::Aggregator;
use super::ledger::LedgerStore;
use super::sweep::WindowMaintainer;
use super::DepositEvent;
use crate::config::DetectorConfig;
use crate::error::{DetectorError, SetupError};
use crate::findings::{Finding, FindingContext};
use crate::rpc::NetworkIdentity;

/// Immutable settings resolved once at setup.
#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub chain_id: u64,
    pub watched_addresses: Vec<Address>,
    pub report_deposits: bool,
    aggregator: Aggregator,
    findings: FindingContext,
}

impl DetectorSettings {
    pub fn from_config(config: &DetectorConfig, chain_id: u64) -> Result<Self, DetectorError> {
        let raw_threshold = config
            .threshold_for(chain_id)
            .ok_or(DetectorError::MissingThreshold { chain_id })?;
        let threshold = BigUint::parse_bytes(raw_threshold.trim().as_bytes(), 10).ok_or_else(|| {
            DetectorError::InvalidThreshold {
                value: raw_threshold.to_string(),
            }
        })?;
        let watched_addresses = config
            .watched_addresses_for(chain_id)
            .ok_or(DetectorError::MissingWatchedAddresses { chain_id })?
            .iter()
            .map(|a| {
                a.trim().parse::<Address>().map_err(|_| DetectorError::InvalidWatchedAddress {
                    value: a.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if config.observation_window_minutes == 0 {
            return Err(DetectorError::InvalidWindow);
        }
        let window_secs = config
            .observation_window_minutes
            .checked_mul(60)
            .ok_or(DetectorError::InvalidWindow)?;

        Ok(Self {
            chain_id,
            watched_addresses,
            report_deposits: config.report_deposits,
            aggregator: Aggregator::new(threshold, window_secs),
            findings: FindingContext::new(chain_id, config.developer_tag.clone()),
        })
    }

    pub fn threshold(&self) -> &BigUint {
        self.aggregator.threshold()
    }

    pub fn window_secs(&self) -> u64 {
        self.aggregator.window_secs()
    }

    pub fn developer_tag(&self) -> &str {
        &self.findings.developer_tag
    }
}

/// Sequences the sweep and per-event aggregation for each transaction.
///
/// Holds the only copy of the ledger state; callers must not interleave
/// `handle_transaction` calls from different threads.
#[derive(Debug, Default)]
pub struct Detector {
    settings: Option<DetectorSettings>,
    store: LedgerStore,
    sweeper: WindowMaintainer,
}

impl Detector {
    /// An uninitialized detector. `handle_transaction` fails until setup runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the chain id once and apply the matching config.
    pub async fn setup<N: NetworkIdentity>(config: &DetectorConfig, network: &N) -> Result<Self, SetupError> {
        let chain_id = network.chain_id().await?;
        let mut detector = Self::new();
        detector.initialize(config, chain_id)?;
        Ok(detector)
    }

    pub fn initialize(&mut self, config: &DetectorConfig, chain_id: u64) -> Result<(), DetectorError> {
        let settings = DetectorSettings::from_config(config, chain_id)?;
        info!(
            chain_id,
            window_secs = settings.window_secs(),
            threshold = %settings.threshold(),
            watched = settings.watched_addresses.len(),
            "Detector initialized"
        );
        self.settings = Some(settings);
        Ok(())
    }

    pub fn settings(&self) -> Option<&DetectorSettings> {
        self.settings.as_ref()
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Process one transaction's deposits in log order, returning findings in
    /// the order they fired.
    pub fn handle_transaction(
        &mut self,
        timestamp: u64,
        deposits: &[DepositEvent],
    ) -> Result<Vec<Finding>, DetectorError> {
        let settings = self.settings.as_ref().ok_or(DetectorError::NotInitialized)?;
        let mut findings = Vec::new();

        self.sweeper
            .maybe_sweep(&mut self.store, timestamp, settings.window_secs());

        for deposit in deposits {
            if !deposit.is_native() {
                debug!(asset_id = %deposit.asset_id, "Ignoring non-native deposit");
                continue;
            }

            if settings.report_deposits {
                findings.push(
                    settings
                        .findings
                        .native_deposit(&deposit.depositor.to_lowercase(), &deposit.amount),
                );
            }

            if let Some(breach) = settings.aggregator.apply(&mut self.store, deposit, timestamp) {
                warn!(
                    address = %breach.address,
                    total = %breach.total,
                    deposits = breach.records.len(),
                    "Deposit threshold exceeded"
                );
                findings.push(settings.findings.native_laundering(
                    &breach.address,
                    &breach.total,
                    &breach.records,
                ));
            }
        }

        Ok(findings)
    }
}
