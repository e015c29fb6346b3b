//! Fetching and decoding the vendor endpoint feed.

use iplsync_core::EndpointRecord;

use crate::{
    api::FeedSource,
    error::{Stage, SyncError},
    nonce,
};

/// Decode a feed body into endpoint records.
///
/// The body must be a JSON array; record fields are lenient (see [`EndpointRecord`]).
pub fn decode(body: &str) -> Result<Vec<EndpointRecord>, SyncError> {
    Ok(serde_json::from_str(body)?)
}

/// Fetch the feed with a fresh request id and decode it.
pub fn fetch<F: FeedSource + ?Sized>(source: &F) -> Result<Vec<EndpointRecord>, SyncError> {
    let request_id = nonce::request_id()?;
    tracing::debug!(%request_id, "fetching endpoint feed");
    let body = source
        .fetch(&request_id)
        .map_err(|e| SyncError::from_api(Stage::FetchFeed, e))?;
    let records = decode(&body)?;
    tracing::debug!(records = records.len(), "decoded endpoint feed");
    Ok(records)
}
