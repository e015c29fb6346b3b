//! Domain types shared by the engine and the CLI.
//!
//! Field names follow the wire formats they are decoded from: the vendor feed
//! is camelCase, the policy engine uses `href` and `ip_ranges`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque reference the policy engine assigns to a resource on creation,
/// e.g. `/orgs/1/sec_policy/draft/ip_lists/42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub String);

impl Handle {
    /// Lifecycle namespace encoded in the handle path, if recognisable.
    pub fn state(&self) -> Option<LifecycleState> {
        if self.0.contains("/sec_policy/active/") {
            Some(LifecycleState::Active)
        } else if self.0.contains("/sec_policy/draft/") {
            Some(LifecycleState::Draft)
        } else {
            None
        }
    }

    /// The draft counterpart of this handle. Only drafts are writable.
    pub fn to_draft(&self) -> Handle {
        Handle(self.0.replacen("/sec_policy/active/", "/sec_policy/draft/", 1))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Handle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Handle {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The two policy namespaces a resource can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Editable, not yet in effect.
    Draft,
    /// Committed and enforced.
    Active,
}

impl LifecycleState {
    /// Path segment used by the policy engine REST API.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Draft => "draft",
            LifecycleState::Active => "active",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the vendor's cloud instances to read endpoints for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CloudInstance {
    #[default]
    Worldwide,
    UsGovDod,
    UsGovGccHigh,
    China,
}

impl CloudInstance {
    /// Path segment the feed service expects for this instance.
    pub fn path_segment(&self) -> &'static str {
        match self {
            CloudInstance::Worldwide => "Worldwide",
            CloudInstance::UsGovDod => "USGOVDoD",
            CloudInstance::UsGovGccHigh => "USGOVGCCHigh",
            CloudInstance::China => "China",
        }
    }
}

impl fmt::Display for CloudInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudInstance::Worldwide => write!(f, "worldwide"),
            CloudInstance::UsGovDod => write!(f, "usgovdod"),
            CloudInstance::UsGovGccHigh => write!(f, "usgovgcchigh"),
            CloudInstance::China => write!(f, "china"),
        }
    }
}

impl FromStr for CloudInstance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "worldwide" => Ok(Self::Worldwide),
            "usgovdod" => Ok(Self::UsGovDod),
            "usgovgcchigh" => Ok(Self::UsGovGccHigh),
            "china" => Ok(Self::China),
            other => Err(format!(
                "unknown cloud instance '{other}'; expected: worldwide, usgovdod, usgovgcchigh, china"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Feed records
// ---------------------------------------------------------------------------

/// One entry of the vendor endpoint feed.
///
/// Only `ips` takes part in reconciliation. Missing fields decode to their
/// empty value and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointRecord {
    pub id: i64,
    pub service_area: String,
    pub service_area_display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub urls: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ips: Vec<String>,
    pub tcp_ports: String,
    pub udp_ports: String,
    pub express_route: bool,
    pub category: String,
    pub required: bool,
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Policy engine resources
// ---------------------------------------------------------------------------

/// A single IP or CIDR literal inside an IP list.
///
/// Compared byte-for-byte; `10.0.0.0/8` and `10.00.0.0/8` are different entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressEntry {
    pub from_ip: String,
}

impl fmt::Display for AddressEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.from_ip.fmt(f)
    }
}

impl From<&str> for AddressEntry {
    fn from(s: &str) -> Self {
        Self {
            from_ip: s.to_owned(),
        }
    }
}

impl From<String> for AddressEntry {
    fn from(s: String) -> Self {
        Self { from_ip: s }
    }
}

/// A named IP list on the policy engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressListResource {
    /// Absent until the policy engine has created the resource.
    #[serde(rename = "href", default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<Handle>,
    pub name: String,
    #[serde(rename = "ip_ranges", default, deserialize_with = "null_as_default")]
    pub entries: Vec<AddressEntry>,
}

impl AddressListResource {
    /// A not-yet-created resource.
    pub fn new(name: impl Into<String>, entries: Vec<AddressEntry>) -> Self {
        Self {
            handle: None,
            name: name.into(),
            entries,
        }
    }
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
