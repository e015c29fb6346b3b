//! Blocking HTTP implementations of the engine's collaborator traits.

pub mod feed;
pub mod pce;

use std::sync::Arc;
use std::time::Duration;

use iplsync_engine::ApiError;

const TIMEOUT: Duration = Duration::from_secs(60);

/// Agent shared by every request of one client.
///
/// `disable_tls` turns off certificate and hostname verification.
pub(crate) fn build_agent(disable_tls: bool) -> Result<ureq::Agent, ApiError> {
    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(disable_tls)
        .danger_accept_invalid_hostnames(disable_tls)
        .build()
        .map_err(|e| ApiError::Transport(format!("failed to build TLS connector: {e}")))?;
    Ok(ureq::AgentBuilder::new()
        .timeout(TIMEOUT)
        .user_agent(concat!("iplsync/", env!("CARGO_PKG_VERSION")))
        .tls_connector(Arc::new(connector))
        .build())
}

/// Split a ureq failure into "could not talk to it" and "it said no".
pub(crate) fn map_ureq(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => ApiError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    }
}
