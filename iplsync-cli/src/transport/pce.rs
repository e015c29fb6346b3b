//! Policy compute engine REST client (API v2).
//!
//! # Authentication
//!
//! API key ids (`api_…`) are sent as HTTP Basic credentials as-is. Any other
//! user is treated as an e-mail login and exchanged for session credentials:
//!
//! ```text
//! POST /api/v2/login_users/authenticate?pce_fqdn=<host>   Basic user:pwd → auth_token
//! GET  /api/v2/users/login                                 Token token=<auth_token>
//!                                                          → auth_username, session_token, orgs
//! ```
//!
//! Session credentials are then used as Basic auth for every other call.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;

use iplsync_core::{AddressEntry, AddressListResource, Handle, LifecycleState, PceConfig};
use iplsync_engine::{ApiError, PolicyApi};

use super::{build_agent, map_ureq};

const DEFAULT_ORG: u32 = 1;

pub struct PceClient {
    agent: ureq::Agent,
    base_url: String,
    org: u32,
    authorization: String,
}

/// Body of create and update calls. `href` is never sent; it is in the URL.
#[derive(Debug, Serialize)]
struct IpListBody<'a> {
    name: &'a str,
    ip_ranges: &'a [AddressEntry],
}

impl<'a> From<&'a AddressListResource> for IpListBody<'a> {
    fn from(list: &'a AddressListResource) -> Self {
        Self {
            name: &list.name,
            ip_ranges: &list.entries,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthenticateResponse {
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct UserLogin {
    auth_username: String,
    session_token: String,
    #[serde(default)]
    orgs: Vec<LoginOrg>,
}

#[derive(Debug, Deserialize)]
struct LoginOrg {
    #[serde(default)]
    org_id: Option<u32>,
    #[serde(default)]
    href: Option<String>,
}

impl LoginOrg {
    fn id(&self) -> Option<u32> {
        self.org_id.or_else(|| {
            self.href
                .as_deref()?
                .strip_prefix("/orgs/")?
                .trim_end_matches('/')
                .parse()
                .ok()
        })
    }
}

impl PceClient {
    /// Build a client, performing the login exchange for non-API-key users.
    pub fn connect(config: &PceConfig) -> Result<Self, ApiError> {
        let agent = build_agent(config.disable_tls)?;
        let base_url = config.base_url();

        if config.is_api_key() {
            return Ok(Self {
                agent,
                base_url,
                org: config.org.unwrap_or(DEFAULT_ORG),
                authorization: basic(&config.user, &config.password),
            });
        }

        let login = login(&agent, &base_url, config)?;
        let org = config
            .org
            .or_else(|| login.orgs.iter().find_map(LoginOrg::id))
            .unwrap_or(DEFAULT_ORG);
        tracing::debug!(user = %login.auth_username, org, "logged in to policy engine");

        Ok(Self {
            agent,
            base_url,
            org,
            authorization: basic(&login.auth_username, &login.session_token),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ip_lists_path(&self, state: LifecycleState) -> String {
        format!("/orgs/{}/sec_policy/{}/ip_lists", self.org, state.as_str())
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &self.url(path))
            .set("Authorization", &self.authorization)
            .set("Accept", "application/json")
    }
}

impl PolicyApi for PceClient {
    fn list_ip_lists(&self, state: LifecycleState) -> Result<Vec<AddressListResource>, ApiError> {
        self.request("GET", &self.ip_lists_path(state))
            .call()
            .map_err(map_ureq)?
            .into_json()
            .map_err(|e| ApiError::Body(format!("IP list inventory: {e}")))
    }

    fn create_ip_list(&self, list: &AddressListResource) -> Result<AddressListResource, ApiError> {
        self.request("POST", &self.ip_lists_path(LifecycleState::Draft))
            .send_json(IpListBody::from(list))
            .map_err(map_ureq)?
            .into_json()
            .map_err(|e| ApiError::Body(format!("created IP list: {e}")))
    }

    fn update_ip_list(&self, list: &AddressListResource) -> Result<(), ApiError> {
        let handle = list
            .handle
            .as_ref()
            .ok_or_else(|| ApiError::Body("IP list has no href".to_string()))?;
        self.request("PUT", &handle.to_draft().0)
            .send_json(IpListBody::from(list))
            .map_err(map_ureq)?;
        Ok(())
    }

    fn provision(&self, handle: &Handle) -> Result<(), ApiError> {
        let body = json!({
            "update_description": "iplsync: refresh endpoint IP list",
            "change_subset": { "ip_lists": [ { "href": handle.to_draft().0 } ] },
        });
        self.request("POST", &format!("/orgs/{}/sec_policy", self.org))
            .send_json(body)
            .map_err(map_ureq)?;
        Ok(())
    }
}

fn basic(user: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{secret}")))
}

fn login(agent: &ureq::Agent, base_url: &str, config: &PceConfig) -> Result<UserLogin, ApiError> {
    let auth: AuthenticateResponse = agent
        .post(&format!("{base_url}/login_users/authenticate"))
        .query("pce_fqdn", config.host())
        .set("Authorization", &basic(&config.user, &config.password))
        .call()
        .map_err(|e| ApiError::Login(format!("authenticate: {}", map_ureq(e))))?
        .into_json()
        .map_err(|e| ApiError::Login(format!("authenticate response: {e}")))?;

    agent
        .get(&format!("{base_url}/users/login"))
        .set("Authorization", &format!("Token token={}", auth.auth_token))
        .call()
        .map_err(|e| ApiError::Login(format!("session: {}", map_ureq(e))))?
        .into_json()
        .map_err(|e| ApiError::Login(format!("session response: {e}")))
}
