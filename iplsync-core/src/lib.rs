//! iplsync core library: domain types, configuration, errors.
//!
//! - [`types`]: feed records, address entries, IP list resources
//! - [`config`]: layered run configuration and validation
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{FeedConfig, FileConfig, PceConfig, SyncConfig};
pub use error::ConfigError;
pub use types::{
    AddressEntry, AddressListResource, CloudInstance, EndpointRecord, Handle, LifecycleState,
};
