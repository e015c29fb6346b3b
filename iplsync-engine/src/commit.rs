//! Optional provisioning after a write.

use iplsync_core::Handle;

use crate::{api::PolicyApi, error::SyncError};

/// Result of the commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Provisioned(Handle),
    /// Provisioning was not requested.
    Skipped,
    /// Dry run with provisioning requested.
    WouldProvision,
}

/// Provision `handle` if `requested`; otherwise do nothing.
///
/// Failures become [`SyncError::Commit`] so callers can tell "written but not
/// provisioned" apart from "not written".
pub fn commit<A: PolicyApi + ?Sized>(
    api: &A,
    handle: &Handle,
    requested: bool,
) -> Result<CommitOutcome, SyncError> {
    if !requested {
        tracing::debug!(%handle, "provisioning not requested");
        return Ok(CommitOutcome::Skipped);
    }
    api.provision(handle).map_err(|source| SyncError::Commit {
        handle: handle.clone(),
        source,
    })?;
    tracing::info!(%handle, "provisioned IP list");
    Ok(CommitOutcome::Provisioned(handle.clone()))
}
