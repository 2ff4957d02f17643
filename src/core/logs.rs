use std::collections::HashSet;
use std::str::FromStr;

use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use num_bigint::BigUint;
use tracing::warn;

use super::{DepositEvent, EventLog};
use crate::error::DecodeError;

/// Canonical signature of the watched protocol's deposit event:
/// `Deposit(uint256 indexed assetId, address indexed depositorAddress, uint256 depositValue)`.
pub const DEPOSIT_EVENT_SIGNATURE: &str = "Deposit(uint256,address,uint256)";

/// keccak256 of an event signature, as the 32-byte topic0.
pub fn event_topic(signature: &str) -> H256 {
    H256::from(keccak256(signature.as_bytes()))
}

/// Extracts `Deposit` events emitted by watched contracts.
#[derive(Debug, Clone)]
pub struct DepositDecoder {
    watched: HashSet<Address>,
    topic0: H256,
}

impl DepositDecoder {
    pub fn new<I>(watched: I) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        Self {
            watched: watched.into_iter().collect(),
            topic0: event_topic(DEPOSIT_EVENT_SIGNATURE),
        }
    }

    /// Emitter strings that are not valid addresses are never watched.
    pub fn is_watched(&self, address: &str) -> bool {
        Address::from_str(address).is_ok_and(|a| self.watched.contains(&a))
    }

    /// Decode matching deposit logs in log order. Logs from other contracts or
    /// with other signatures are ignored; malformed deposit logs are skipped.
    pub fn decode(&self, logs: &[EventLog]) -> Vec<DepositEvent> {
        logs.iter()
            .filter(|log| self.is_watched(&log.address) && self.matches_signature(log))
            .filter_map(|log| match decode_deposit(log) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(address = %log.address, log_index = log.log_index, "Skipping malformed deposit log: {e}");
                    None
                }
            })
            .collect()
    }

    fn matches_signature(&self, log: &EventLog) -> bool {
        log.topics
            .first()
            .and_then(|t| parse_topic("topic0", t).ok())
            .is_some_and(|t| t == self.topic0)
    }
}

fn decode_deposit(log: &EventLog) -> Result<DepositEvent, DecodeError> {
    if log.topics.len() != 3 {
        return Err(DecodeError::TopicCount {
            expected: 3,
            got: log.topics.len(),
        });
    }

    let asset_id = U256::from_big_endian(parse_topic("assetId", &log.topics[1])?.as_bytes());
    let depositor = Address::from_slice(&parse_topic("depositorAddress", &log.topics[2])?.as_bytes()[12..]);

    let data = Bytes::from_str(&log.data).map_err(|e| DecodeError::Hex {
        field: "depositValue",
        reason: e.to_string(),
    })?;
    if data.len() != 32 {
        return Err(DecodeError::WordLength {
            field: "depositValue",
            len: data.len(),
        });
    }
    let value = U256::from_big_endian(&data);

    Ok(DepositEvent {
        asset_id: asset_id.to_string(),
        depositor: format!("{depositor:#x}"),
        amount: to_biguint(value),
    })
}

fn parse_topic(field: &'static str, input: &str) -> Result<H256, DecodeError> {
    H256::from_str(input).map_err(|e| DecodeError::Hex {
        field,
        reason: e.to_string(),
    })
}

/// Widen an ABI word into the engine's unbounded integer.
pub fn to_biguint(value: U256) -> BigUint {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    BigUint::from_bytes_be(&word)
}
