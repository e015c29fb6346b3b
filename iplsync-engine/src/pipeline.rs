//! Shared sync pipeline entrypoint.
//!
//! Strictly sequential and fail-fast: fetch feed → decode → extract → list
//! both namespaces → locate → create or update → optional provision. The
//! first error ends the run; nothing is retried.

use iplsync_core::SyncConfig;

use crate::{
    api::{FeedSource, PolicyApi},
    commit::{self, CommitOutcome},
    error::SyncError,
    extract::extract_addresses,
    feed,
    locate::Inventory,
    reconcile::{self, Outcome},
};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: Outcome,
    /// Number of distinct address entries written (or that would be).
    pub entries: usize,
    pub commit: CommitOutcome,
}

/// Run one sync.
///
/// With `dry_run` both namespaces are still read so the create/update decision
/// is real, but no write and no provision is issued.
pub fn run<F, A>(
    config: &SyncConfig,
    feed: &F,
    api: &A,
    dry_run: bool,
) -> Result<SyncReport, SyncError>
where
    F: FeedSource + ?Sized,
    A: PolicyApi + ?Sized,
{
    config.validate()?;

    let records = feed::fetch(feed)?;
    let entries = extract_addresses(&records);
    let entry_count = entries.len();
    tracing::debug!(entries = entry_count, "extracted address entries");

    let inventory = Inventory::fetch(api)?;
    let plan = reconcile::plan(&config.name, entries, &inventory);

    if dry_run {
        let outcome = reconcile::preview(&plan);
        tracing::info!(?outcome, "[dry-run] no changes written");
        return Ok(SyncReport {
            outcome,
            entries: entry_count,
            commit: if config.provision {
                CommitOutcome::WouldProvision
            } else {
                CommitOutcome::Skipped
            },
        });
    }

    let outcome = reconcile::apply(api, plan)?;
    let commit = match outcome.handle() {
        Some(handle) => commit::commit(api, handle, config.provision)?,
        None => CommitOutcome::Skipped,
    };

    Ok(SyncReport {
        outcome,
        entries: entry_count,
        commit,
    })
}
