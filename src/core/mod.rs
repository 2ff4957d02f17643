pub mod aggregator;
pub mod detector;
pub mod ledger;
pub mod logs;
pub mod pipeline;
pub mod sweep;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::DecodeError;

/// Asset id the watched protocol uses for the chain's native coin.
pub const NATIVE_ASSET_ID: &str = "0";

/// A transaction as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxEvent {
    pub hash: String,
    #[serde(default)]
    pub block_number: u64,
    /// Block timestamp, unix seconds.
    pub timestamp: u64,
    #[serde(default)]
    pub logs: Vec<EventLog>,
}

/// A raw event log emitted during a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub address: String,
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub log_index: u64,
}

/// A decoded `Deposit` event from a watched contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEvent {
    pub asset_id: String,
    pub depositor: String,
    pub amount: BigUint,
}

impl DepositEvent {
    /// Build from the decimal-string tuple a log filter produces.
    pub fn from_decimal(asset_id: &str, depositor: &str, amount: &str) -> Result<Self, DecodeError> {
        let amount = BigUint::parse_bytes(amount.as_bytes(), 10)
            .ok_or_else(|| DecodeError::Amount(amount.to_string()))?;
        Ok(Self {
            asset_id: asset_id.to_string(),
            depositor: depositor.to_string(),
            amount,
        })
    }

    pub fn is_native(&self) -> bool {
        self.asset_id == NATIVE_ASSET_ID
    }
}

/// One deposit held in an address ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositRecord {
    pub timestamp: u64,
    #[serde(serialize_with = "serialize_decimal")]
    pub value: BigUint,
}

impl DepositRecord {
    pub fn new(timestamp: u64, value: BigUint) -> Self {
        Self { timestamp, value }
    }
}

/// Serialize a big integer as its exact decimal string.
pub fn serialize_decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_event_from_decimal() {
        let event = DepositEvent::from_decimal("0", "0xabc", "4000000000000000001").unwrap();
        assert!(event.is_native());
        assert_eq!(event.amount.to_string(), "4000000000000000001");
    }

    #[test]
    fn non_native_asset() {
        let event = DepositEvent::from_decimal("3", "0xabc", "1").unwrap();
        assert!(!event.is_native());
    }

    #[test]
    fn malformed_amount_rejected() {
        assert_eq!(
            DepositEvent::from_decimal("0", "0xabc", "1.5"),
            Err(DecodeError::Amount("1.5".into()))
        );
    }

    #[test]
    fn record_serializes_value_as_string() {
        let record = DepositRecord::new(1199, BigUint::from(4u8) * BigUint::from(10u64).pow(18));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"timestamp":1199,"value":"4000000000000000000"}"#);
    }

    #[test]
    fn tx_event_from_feed_line() {
        let line = r#"{"hash":"0x01","timestamp":12,"logs":[{"address":"0xF0","topics":["0x00"]}]}"#;
        let tx: TxEvent = serde_json::from_str(line).unwrap();
        assert_eq!(tx.timestamp, 12);
        assert_eq!(tx.block_number, 0);
        assert_eq!(tx.logs[0].data, "");
    }
}
