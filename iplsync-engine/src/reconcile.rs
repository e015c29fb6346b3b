//! Create-or-update decision for the target IP list.
//!
//! Split in two so `--dry-run` can stop after the decision:
//!
//! 1. [`plan`]: pure; picks create or update and builds the full payload.
//! 2. [`apply`]: issues exactly one write.
//!
//! Every write is a full replace of the entry set. Nothing is diffed against
//! the entries currently stored, so a run always writes even when nothing
//! changed, and repeated runs converge on the feed's addresses.

use iplsync_core::{AddressEntry, AddressListResource, Handle};

use crate::{
    api::PolicyApi,
    error::{ApiError, Stage, SyncError},
    locate::Inventory,
};

/// The write a run is about to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilePlan {
    /// No list with the target name exists; `handle` is `None`.
    Create(AddressListResource),
    /// A list exists; `handle` is set to the located handle.
    Update(AddressListResource),
}

impl ReconcilePlan {
    pub fn resource(&self) -> &AddressListResource {
        match self {
            ReconcilePlan::Create(r) | ReconcilePlan::Update(r) => r,
        }
    }
}

/// What a run did (or, in dry-run mode, would do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Handle),
    Updated(Handle),
    WouldCreate,
    WouldUpdate(Handle),
}

impl Outcome {
    /// Handle of the written resource; `None` only for [`Outcome::WouldCreate`].
    pub fn handle(&self) -> Option<&Handle> {
        match self {
            Outcome::Created(h) | Outcome::Updated(h) | Outcome::WouldUpdate(h) => Some(h),
            Outcome::WouldCreate => None,
        }
    }
}

/// Decide between create and update for `name`.
pub fn plan(name: &str, entries: Vec<AddressEntry>, inventory: &Inventory) -> ReconcilePlan {
    let mut candidate = AddressListResource::new(name, entries);
    match inventory.locate(name) {
        Some(handle) => {
            candidate.handle = Some(handle);
            ReconcilePlan::Update(candidate)
        }
        None => ReconcilePlan::Create(candidate),
    }
}

/// The outcome `plan` would produce, without writing.
pub fn preview(plan: &ReconcilePlan) -> Outcome {
    match plan {
        ReconcilePlan::Create(_) => Outcome::WouldCreate,
        ReconcilePlan::Update(r) => match &r.handle {
            Some(h) => Outcome::WouldUpdate(h.clone()),
            None => Outcome::WouldCreate,
        },
    }
}

/// Issue the single write described by `plan`.
pub fn apply<A: PolicyApi + ?Sized>(api: &A, plan: ReconcilePlan) -> Result<Outcome, SyncError> {
    match plan {
        ReconcilePlan::Create(resource) => {
            let created = api
                .create_ip_list(&resource)
                .map_err(|e| SyncError::from_api(Stage::Create, e))?;
            let handle = created.handle.ok_or_else(|| {
                SyncError::from_api(
                    Stage::Create,
                    ApiError::Body("created IP list has no href".to_string()),
                )
            })?;
            tracing::info!(%handle, entries = resource.entries.len(), "created IP list");
            Ok(Outcome::Created(handle))
        }
        ReconcilePlan::Update(resource) => {
            let Some(handle) = resource.handle.clone() else {
                return Err(SyncError::from_api(
                    Stage::Update,
                    ApiError::Body("update planned without a handle".to_string()),
                ));
            };
            api.update_ip_list(&resource)
                .map_err(|e| SyncError::from_api(Stage::Update, e))?;
            tracing::info!(%handle, entries = resource.entries.len(), "updated IP list");
            Ok(Outcome::Updated(handle))
        }
    }
}
