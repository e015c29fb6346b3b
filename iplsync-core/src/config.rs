//! Run configuration.
//!
//! # Layering
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. command-line flags / environment variables (parsed by the CLI into a
//!    [`FileConfig`] of overrides)
//! 2. a YAML config file, `~/.iplsync/config.yaml` or an explicit path
//! 3. built-in defaults
//!
//! [`FileConfig::merge`] combines layers and [`SyncConfig::from_layers`]
//! applies defaults and validates. Validation happens before any network call.
//!
//! Like the rest of the crate, filesystem helpers come in `fn_at(home, …)`
//! form so tests can point them at a temporary directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::CloudInstance;

pub const DEFAULT_LIST_NAME: &str = "Office365";
pub const DEFAULT_PCE_PORT: u16 = 8443;
pub const DEFAULT_FEED_BASE_URL: &str = "https://endpoints.office.com";

// ---------------------------------------------------------------------------
// 1. File / override layer
// ---------------------------------------------------------------------------

/// One configuration layer. Every field is optional; unset fields fall
/// through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub fqdn: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub pwd: Option<String>,
    pub org: Option<u32>,
    pub disable_tls: Option<bool>,
    pub name: Option<String>,
    pub provision: Option<bool>,
    pub instance: Option<CloudInstance>,
    pub feed_url: Option<String>,
}

impl FileConfig {
    /// Fill every unset field of `self` from `lower`.
    pub fn merge(self, lower: FileConfig) -> FileConfig {
        FileConfig {
            fqdn: self.fqdn.or(lower.fqdn),
            port: self.port.or(lower.port),
            user: self.user.or(lower.user),
            pwd: self.pwd.or(lower.pwd),
            org: self.org.or(lower.org),
            disable_tls: self.disable_tls.or(lower.disable_tls),
            name: self.name.or(lower.name),
            provision: self.provision.or(lower.provision),
            instance: self.instance.or(lower.instance),
            feed_url: self.feed_url.or(lower.feed_url),
        }
    }
}

/// `<home>/.iplsync/config.yaml`: pure, no I/O.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(".iplsync").join("config.yaml")
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_file_at(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `<home>/.iplsync/config.yaml`, or an empty layer if it does not exist.
pub fn load_default_at(home: &Path) -> Result<FileConfig, ConfigError> {
    let path = default_path_at(home);
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    load_file_at(&path)
}

/// `load_default_at` convenience wrapper; an unknown home directory means no file layer.
pub fn load_default() -> Result<FileConfig, ConfigError> {
    match dirs::home_dir() {
        Some(home) => load_default_at(&home),
        None => Ok(FileConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// 2. Resolved configuration
// ---------------------------------------------------------------------------

/// Connection settings for the policy compute engine.
#[derive(Clone, PartialEq, Eq)]
pub struct PceConfig {
    /// Host name, optionally prefixed with `https://` or `http://`.
    pub fqdn: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Organisation id; discovered at login or defaulted to 1 when unset.
    pub org: Option<u32>,
    pub disable_tls: bool,
}

impl PceConfig {
    /// Host name without any scheme or trailing slash.
    pub fn host(&self) -> &str {
        split_scheme(&self.fqdn).1
    }

    /// `<scheme>://<host>:<port>/api/v2`
    pub fn base_url(&self) -> String {
        let (scheme, host) = split_scheme(&self.fqdn);
        format!("{scheme}://{host}:{}/api/v2", self.port)
    }

    /// API key ids are used directly; anything else goes through the login exchange.
    pub fn is_api_key(&self) -> bool {
        self.user.starts_with("api_")
    }
}

impl fmt::Debug for PceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PceConfig")
            .field("fqdn", &self.fqdn)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("org", &self.org)
            .field("disable_tls", &self.disable_tls)
            .finish()
    }
}

fn split_scheme(fqdn: &str) -> (&'static str, &str) {
    let fqdn = fqdn.trim();
    let (scheme, host) = if let Some(rest) = fqdn.strip_prefix("https://") {
        ("https", rest)
    } else if let Some(rest) = fqdn.strip_prefix("http://") {
        ("http", rest)
    } else {
        ("https", fqdn)
    };
    (scheme, host.trim_end_matches('/'))
}

/// Where to read the vendor endpoint feed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub base_url: String,
    pub instance: CloudInstance,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_BASE_URL.to_string(),
            instance: CloudInstance::default(),
        }
    }
}

impl FeedConfig {
    /// Feed layer only; needs no policy engine settings.
    pub fn from_layers(layers: &FileConfig) -> Self {
        let defaults = FeedConfig::default();
        Self {
            base_url: layers.feed_url.clone().unwrap_or(defaults.base_url),
            instance: layers.instance.unwrap_or(defaults.instance),
        }
    }

    /// `<base>/endpoints/<instance>`; the request id is appended as a query parameter.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/endpoints/{}",
            self.base_url.trim_end_matches('/'),
            self.instance.path_segment()
        )
    }
}

/// Everything one sync run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub pce: PceConfig,
    pub feed: FeedConfig,
    /// Name of the IP list to create or update.
    pub name: String,
    /// Provision the IP list after writing it.
    pub provision: bool,
}

impl SyncConfig {
    /// Apply defaults to a merged layer and validate the result.
    pub fn from_layers(layers: FileConfig) -> Result<Self, ConfigError> {
        let feed = FeedConfig::from_layers(&layers);
        let config = SyncConfig {
            pce: PceConfig {
                fqdn: layers.fqdn.unwrap_or_default(),
                port: layers.port.unwrap_or(DEFAULT_PCE_PORT),
                user: layers.user.unwrap_or_default(),
                password: layers.pwd.unwrap_or_default(),
                org: layers.org,
                disable_tls: layers.disable_tls.unwrap_or(false),
            },
            feed,
            name: layers.name.unwrap_or_else(|| DEFAULT_LIST_NAME.to_string()),
            provision: layers.provision.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly reach the policy engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pce.host().is_empty() {
            return Err(ConfigError::Missing("fqdn"));
        }
        if self.pce.user.is_empty() {
            return Err(ConfigError::Missing("user"));
        }
        if self.pce.password.is_empty() {
            return Err(ConfigError::Missing("pwd"));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Missing("name"));
        }
        if self.pce.port == 0 {
            return Err(ConfigError::Invalid {
                field: "port",
                reason: "port must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
