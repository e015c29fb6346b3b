//! Seams to the two remote systems a sync run talks to.
//!
//! The engine holds no HTTP code; the CLI supplies blocking implementations
//! and tests supply in-memory ones.

use iplsync_core::{AddressListResource, Handle, LifecycleState};

use crate::error::ApiError;

/// The vendor endpoint feed.
pub trait FeedSource {
    /// Fetch the raw feed body. `request_id` is sent as the per-request nonce.
    fn fetch(&self, request_id: &str) -> Result<String, ApiError>;
}

/// IP list operations on the policy compute engine.
pub trait PolicyApi {
    /// Every IP list in one namespace.
    fn list_ip_lists(&self, state: LifecycleState) -> Result<Vec<AddressListResource>, ApiError>;

    /// Create `list` as a new draft. The returned resource carries its handle.
    fn create_ip_list(&self, list: &AddressListResource) -> Result<AddressListResource, ApiError>;

    /// Replace the name and entries of the resource addressed by `list.handle`.
    fn update_ip_list(&self, list: &AddressListResource) -> Result<(), ApiError>;

    /// Commit pending changes of the resource behind `handle`.
    fn provision(&self, handle: &Handle) -> Result<(), ApiError>;
}
