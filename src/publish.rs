use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::findings::Finding;

/// One published line: the finding plus where and when it was raised.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<'a> {
    pub tx_hash: &'a str,
    pub published_at: DateTime<Utc>,
    pub finding: &'a Finding,
}

/// Writes findings as JSON lines.
pub struct JsonLinesPublisher<W: Write> {
    out: W,
    published: u64,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out, published: 0 }
    }

    pub fn publish(&mut self, tx_hash: &str, findings: &[Finding]) -> std::io::Result<()> {
        let published_at = Utc::now();
        for finding in findings {
            let envelope = Envelope {
                tx_hash,
                published_at,
                finding,
            };
            serde_json::to_writer(&mut self.out, &envelope)?;
            self.out.write_all(b"\n")?;
            self.published += 1;
        }
        self.out.flush()
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
