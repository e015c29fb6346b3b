//! Per-request nonce for the feed URL.

use rand::{rngs::OsRng, TryRngCore};

use crate::error::SyncError;

/// 16 bytes from the OS random source, formatted as GUID-shaped lowercase hex
/// (`8-4-4-4-12`). No version or variant bits are set.
pub fn request_id() -> Result<String, SyncError> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SyncError::RandomSource(e.to_string()))?;
    Ok(format_request_id(&bytes))
}

fn format_request_id(b: &[u8; 16]) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        hex::encode(&b[0..4]),
        hex::encode(&b[4..6]),
        hex::encode(&b[6..8]),
        hex::encode(&b[8..10]),
        hex::encode(&b[10..16]),
    )
}
