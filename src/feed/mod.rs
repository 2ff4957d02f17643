use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::TxEvent;

/// Parse one feed line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<TxEvent, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Read JSON-lines transactions from `reader` into `tx` until EOF.
/// Malformed lines are logged and skipped. Returns the number of transactions sent.
pub async fn read_feed<R>(reader: R, tx: mpsc::UnboundedSender<TxEvent>) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no: u64 = 0;
    let mut sent: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match parse_line(&line) {
            None => {}
            Some(Ok(event)) => {
                if tx.send(event).is_err() {
                    info!("Channel closed, stopping feed reader");
                    break;
                }
                sent += 1;
            }
            Some(Err(e)) => warn!(line = line_no, "Skipping malformed feed line: {e}"),
        }
    }

    Ok(sent)
}

/// Spawn the feed reader for a file path, or stdin when `path` is `-`.
pub fn start_feed_reader(path: String, tx: mpsc::UnboundedSender<TxEvent>) -> JoinHandle<std::io::Result<u64>> {
    tokio::spawn(read_path(path, tx))
}

async fn read_path(path: String, tx: mpsc::UnboundedSender<TxEvent>) -> std::io::Result<u64> {
    let sent = if path == "-" {
        info!("Reading transactions from stdin");
        read_feed(BufReader::new(tokio::io::stdin()), tx).await?
    } else {
        let file = tokio::fs::File::open(&path).await?;
        info!(path = %path, "Reading transactions from file");
        read_feed(BufReader::new(file), tx).await?
    };
    info!("Feed exhausted after {sent} transactions");
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_line("   ").is_none());
        assert!(parse_line(r#"{"hash":"0x1","timestamp":3}"#).unwrap().is_ok());
        assert!(parse_line("{not json").unwrap().is_err());
    }

    #[tokio::test]
    async fn reads_until_eof_skipping_bad_lines() {
        let input = b"{\"hash\":\"0x1\",\"timestamp\":1}\n\ngarbage\n{\"hash\":\"0x2\",\"timestamp\":2,\"logs\":[]}\n";
        let (tx, mut rx) = mpsc::unbounded_channel();

        let sent = read_feed(&input[..], tx).await.unwrap();
        assert_eq!(sent, 2);
        assert_eq!(rx.recv().await.unwrap().hash, "0x1");
        assert_eq!(rx.recv().await.unwrap().timestamp, 2);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.jsonl");
        std::fs::write(&path, "{\"hash\":\"0xf\",\"timestamp\":9}\n").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = start_feed_reader(path.display().to_string(), tx);
        assert_eq!(handle.await.unwrap().unwrap(), 1);
        assert_eq!(rx.recv().await.unwrap().hash, "0xf");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = start_feed_reader("/nonexistent/feed.jsonl".into(), tx);
        assert!(handle.await.unwrap().is_err());
    }
}
