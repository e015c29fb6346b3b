//! Error types for iplsync-engine.

use std::fmt;

use thiserror::Error;

use iplsync_core::{ConfigError, Handle};

/// The step of a sync run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchFeed,
    ListDraft,
    ListActive,
    Create,
    Update,
    Provision,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::FetchFeed => "fetching endpoint feed",
            Stage::ListDraft => "listing draft IP lists",
            Stage::ListActive => "listing active IP lists",
            Stage::Create => "creating IP list",
            Stage::Update => "updating IP list",
            Stage::Provision => "provisioning IP list",
        };
        f.write_str(s)
    }
}

/// Failure reported by a [`crate::FeedSource`] or [`crate::PolicyApi`] implementation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote end could not be reached or the connection failed mid-request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote end answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response arrived but could not be understood.
    #[error("unexpected response: {0}")]
    Body(String),

    /// Exchanging the configured credentials for a session failed.
    #[error("login failed: {0}")]
    Login(String),
}

/// All errors that can end a sync run. None are recovered from.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required settings missing or invalid; raised before any network call.
    #[error("invalid configuration: {0}")]
    Input(#[from] ConfigError),

    /// The operating system random source could not produce a request id.
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    /// A remote endpoint could not be reached or did not answer successfully.
    #[error("{stage} failed")]
    Transport {
        stage: Stage,
        #[source]
        source: ApiError,
    },

    /// The feed body is not a JSON array of endpoint records.
    #[error("failed to decode endpoint feed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The policy engine rejected a list, create or update call.
    #[error("{stage} failed")]
    Reconcile {
        stage: Stage,
        #[source]
        source: ApiError,
    },

    /// The IP list was written but provisioning it failed.
    #[error("IP list {handle} was written but provisioning failed")]
    Commit {
        handle: Handle,
        #[source]
        source: ApiError,
    },
}

impl SyncError {
    /// Classify a policy engine failure at `stage`.
    pub(crate) fn from_api(stage: Stage, source: ApiError) -> Self {
        match source {
            ApiError::Transport(_) => SyncError::Transport { stage, source },
            _ if stage == Stage::FetchFeed => SyncError::Transport { stage, source },
            _ => SyncError::Reconcile { stage, source },
        }
    }
}
