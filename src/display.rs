//! Human readable blocks output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hashledger::block::Block;

/// Line printed between blocks in the dump output.
pub const SEPARATOR: &str = "/*********************************************************************/";

/// Format UTC timestamp in milliseconds
/// as `YYYY-MM-DD HH:MM:SS.mmm`.
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp).ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| format!("{timestamp} ms"))
}

pub fn format_block(block: &Block) -> String {
    format!(
        "index    = {}\ntimestamp= {}\nprevhash = {}\nhash     = {}\ndata     = {}\n",
        block.index(),
        format_timestamp(block.timestamp()),
        block.prev_digest(),
        block.digest(),
        String::from_utf8_lossy(block.payload())
    )
}

#[derive(Debug, Serialize)]
struct BlockJson<'a> {
    index: u64,
    timestamp: u64,
    prev_digest: &'a str,
    digest: &'a str,

    /// Hex encoded payload.
    payload: String
}

pub fn format_block_json(block: &Block) -> serde_json::Result<String> {
    serde_json::to_string(&BlockJson {
        index: block.index(),
        timestamp: block.timestamp(),
        prev_digest: block.prev_digest(),
        digest: block.digest(),
        payload: hex::encode(block.payload())
    })
}
