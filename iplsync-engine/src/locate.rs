//! Finding an existing IP list by name.

use iplsync_core::{AddressListResource, Handle, LifecycleState};

use crate::{
    api::PolicyApi,
    error::{Stage, SyncError},
};

/// Snapshot of both policy namespaces taken at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub active: Vec<AddressListResource>,
    pub draft: Vec<AddressListResource>,
}

impl Inventory {
    /// Read the draft and the active namespace.
    pub fn fetch<A: PolicyApi + ?Sized>(api: &A) -> Result<Self, SyncError> {
        let draft = api
            .list_ip_lists(LifecycleState::Draft)
            .map_err(|e| SyncError::from_api(Stage::ListDraft, e))?;
        let active = api
            .list_ip_lists(LifecycleState::Active)
            .map_err(|e| SyncError::from_api(Stage::ListActive, e))?;
        tracing::debug!(
            draft = draft.len(),
            active = active.len(),
            "read IP list inventory"
        );
        Ok(Self { active, draft })
    }

    /// Handle of the first list named exactly `name`, scanning active before draft.
    ///
    /// Names are not unique across namespaces; when both hold a match the
    /// active one is returned.
    pub fn locate(&self, name: &str) -> Option<Handle> {
        self.active
            .iter()
            .chain(self.draft.iter())
            .filter(|list| list.name == name)
            .find_map(|list| list.handle.clone())
    }
}
