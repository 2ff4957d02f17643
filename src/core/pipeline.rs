use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::TxEvent;
use super::detector::Detector;
use super::logs::DepositDecoder;
use crate::findings::Finding;

/// Messages from the pipeline to publishers.
#[derive(Debug, Clone)]
pub enum PipelineOutput {
    Findings { tx_hash: String, findings: Vec<Finding> },
}

/// Run the pipeline: receive transactions, decode deposits, detect, forward findings.
///
/// The loop owns the detector, so transactions are handled strictly one at a time.
pub async fn run_pipeline(
    mut rx: mpsc::UnboundedReceiver<TxEvent>,
    out: mpsc::UnboundedSender<PipelineOutput>,
    mut detector: Detector,
    decoder: DepositDecoder,
) {
    let mut tx_count: u64 = 0;
    let mut deposit_count: u64 = 0;
    let mut finding_count: u64 = 0;

    info!("Pipeline started, waiting for transactions...");

    while let Some(tx) = rx.recv().await {
        let deposits = decoder.decode(&tx.logs);
        deposit_count += deposits.len() as u64;

        let findings = match detector.handle_transaction(tx.timestamp, &deposits) {
            Ok(findings) => findings,
            Err(e) => {
                error!("Detector rejected transaction {}: {e}", tx.hash);
                break;
            }
        };

        tx_count += 1;
        if tx_count % 1000 == 0 {
            info!(
                "Pipeline processed {tx_count} txs, {deposit_count} deposits, {} tracked addresses",
                detector.store().len()
            );
        }

        if findings.is_empty() {
            continue;
        }
        debug!(tx_hash = %tx.hash, count = findings.len(), "Findings raised");
        finding_count += findings.len() as u64;

        if out
            .send(PipelineOutput::Findings {
                tx_hash: tx.hash,
                findings,
            })
            .is_err()
        {
            info!("Output channel closed, stopping pipeline");
            break;
        }
    }

    info!("Pipeline shutting down after {tx_count} txs, {deposit_count} deposits, {finding_count} findings");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::core::EventLog;
    use crate::core::logs::{DEPOSIT_EVENT_SIGNATURE, event_topic};
    use ethers::types::{Address, H256};
    use num_bigint::BigUint;
    use std::collections::HashMap;

    const WATCHED: &str = "0xf0f0000000000000000000000000000000000000";

    fn word(bytes: &[u8]) -> String {
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(bytes);
        format!("{:#x}", H256::from(padded))
    }

    fn decoder() -> DepositDecoder {
        DepositDecoder::new([WATCHED.parse::<Address>().unwrap()])
    }

    fn deposit_tx(hash: &str, timestamp: u64, value: &BigUint) -> TxEvent {
        TxEvent {
            hash: hash.into(),
            block_number: 1,
            timestamp,
            logs: vec![EventLog {
                address: WATCHED.into(),
                topics: vec![
                    format!("{:#x}", event_topic(DEPOSIT_EVENT_SIGNATURE)),
                    word(&[0]),
                    word(&[0x11; 20]),
                ],
                data: word(&value.to_bytes_be()),
                log_index: 0,
            }],
        }
    }

    fn make_detector() -> Detector {
        let config = DetectorConfig {
            developer_tag: "TEST".into(),
            observation_window_minutes: 20,
            report_deposits: false,
            threshold_by_chain_id: HashMap::from([("1".to_string(), "100".to_string())]),
            watched_addresses_by_chain_id: HashMap::from([("1".to_string(), vec![WATCHED.to_string()])]),
        };
        let mut detector = Detector::new();
        detector.initialize(&config, 1).unwrap();
        detector
    }

    #[tokio::test]
    async fn forwards_findings_per_transaction() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        tx.send(deposit_tx("0xaa", 0, &BigUint::from(60u8))).unwrap();
        tx.send(deposit_tx("0xbb", 10, &BigUint::from(60u8))).unwrap();
        drop(tx);

        run_pipeline(rx, out_tx, make_detector(), decoder()).await;

        let PipelineOutput::Findings { tx_hash, findings } = out_rx.recv().await.unwrap();
        assert_eq!(tx_hash, "0xbb");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metadata["totalDepositValue"], "120");
        assert_eq!(
            findings[0].addresses,
            vec![format!("0x{}", "11".repeat(20))]
        );
        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn uninitialized_detector_stops_the_pipeline() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        tx.send(deposit_tx("0xaa", 0, &BigUint::from(200u8))).unwrap();

        run_pipeline(rx, out_tx, Detector::new(), decoder()).await;
        assert!(out_rx.recv().await.is_none());
    }
}
