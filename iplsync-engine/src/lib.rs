//! # iplsync-engine
//!
//! Reconciles a policy engine IP list against the vendor endpoint feed.
//!
//! Call [`pipeline::run`] with a [`FeedSource`] and a [`PolicyApi`] to perform
//! one full sync. The individual stages are public for callers that need only
//! part of the flow (the `addresses` command stops after [`extract`]).

pub mod api;
pub mod commit;
pub mod error;
pub mod extract;
pub mod feed;
pub mod locate;
pub mod nonce;
pub mod pipeline;
pub mod reconcile;

pub use api::{FeedSource, PolicyApi};
pub use commit::CommitOutcome;
pub use error::{ApiError, Stage, SyncError};
pub use extract::extract_addresses;
pub use locate::Inventory;
pub use pipeline::SyncReport;
pub use reconcile::{Outcome, ReconcilePlan};
