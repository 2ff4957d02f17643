pub mod format;

use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::DepositRecord;
use format::{NATIVE_DECIMALS, format_units, format_units_fixed, humanize_duration, native_symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FindingSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingType {
    Info,
    Suspicious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelType {
    Eoa,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub entity_type: EntityType,
    pub label_type: LabelType,
    pub confidence: f64,
    pub entity: String,
    pub custom_value: String,
}

/// An alert ready to hand to a publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub alert_id: String,
    pub name: String,
    pub description: String,
    pub finding_type: FindingType,
    pub severity: FindingSeverity,
    pub addresses: Vec<String>,
    pub labels: Vec<Label>,
    pub metadata: BTreeMap<String, String>,
}

/// Compact JSON array of `{timestamp, value}` with values as exact decimal strings.
fn deposits_json(records: &[DepositRecord]) -> String {
    Value::Array(
        records
            .iter()
            .map(|r| json!({ "timestamp": r.timestamp, "value": r.value.to_string() }))
            .collect(),
    )
    .to_string()
}

/// Rendering context shared by every finding of one detector instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingContext {
    pub chain_id: u64,
    pub developer_tag: String,
}

impl FindingContext {
    pub fn new(chain_id: u64, developer_tag: impl Into<String>) -> Self {
        Self {
            chain_id,
            developer_tag: developer_tag.into(),
        }
    }

    /// Alert for an address whose windowed deposits exceeded the threshold.
    pub fn native_laundering(&self, address: &str, total: &BigUint, records: &[DepositRecord]) -> Finding {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|r| r.timestamp);

        let amount = format!(
            "{} {}",
            format_units_fixed(total, NATIVE_DECIMALS, 3),
            native_symbol(self.chain_id)
        );
        let period = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) if first.timestamp != last.timestamp => {
                format!("in {}", humanize_duration(last.timestamp - first.timestamp))
            }
            _ => "in one transaction".to_string(),
        };

        let deposits = deposits_json(&sorted);

        let mut metadata = BTreeMap::new();
        metadata.insert("totalDepositValue".to_string(), total.to_string());
        metadata.insert("deposits".to_string(), deposits);

        Finding {
            alert_id: format!(
                "{}-AZTEC-PROTOCOL-POSSIBLE-MONEY-LAUNDERING-NATIVE",
                self.developer_tag
            ),
            name: "Possible Money Laundering Through Aztec Protocol".to_string(),
            description: format!(
                "{address} potentially engaged in money laundering. \
                 The account deposited {amount} {period}."
            ),
            finding_type: FindingType::Suspicious,
            severity: FindingSeverity::High,
            addresses: vec![address.to_string()],
            labels: vec![Label {
                entity_type: EntityType::Address,
                label_type: LabelType::Eoa,
                confidence: 0.75,
                entity: address.to_string(),
                custom_value: total.to_string(),
            }],
            metadata,
        }
    }

    /// Informational alert for a single native deposit.
    pub fn native_deposit(&self, address: &str, value: &BigUint) -> Finding {
        let amount = format!(
            "{} {}",
            format_units(value, NATIVE_DECIMALS),
            native_symbol(self.chain_id)
        );

        let mut metadata = BTreeMap::new();
        metadata.insert("depositValue".to_string(), value.to_string());

        Finding {
            alert_id: format!("{}-AZTEC-PROTOCOL-DEPOSIT-EVENT", self.developer_tag),
            name: "Aztec Protocol Deposit Event".to_string(),
            description: format!("Account {address} deposited {amount}."),
            finding_type: FindingType::Info,
            severity: FindingSeverity::Info,
            addresses: vec![address.to_string()],
            labels: vec![Label {
                entity_type: EntityType::Address,
                label_type: LabelType::Eoa,
                confidence: 1.0,
                entity: address.to_string(),
                custom_value: String::new(),
            }],
            metadata,
        }
    }
}
