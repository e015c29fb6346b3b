//! Vendor endpoint feed over HTTP.

use iplsync_core::FeedConfig;
use iplsync_engine::{ApiError, FeedSource};

use super::{build_agent, map_ureq};

pub struct HttpFeed {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpFeed {
    pub fn new(config: &FeedConfig) -> Result<Self, ApiError> {
        Ok(Self {
            agent: build_agent(false)?,
            endpoint: config.endpoint_url(),
        })
    }
}

impl FeedSource for HttpFeed {
    fn fetch(&self, request_id: &str) -> Result<String, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, "GET endpoint feed");
        self.agent
            .get(&self.endpoint)
            .query("clientrequestid", request_id)
            .set("Accept", "application/json")
            .call()
            .map_err(map_ureq)?
            .into_string()
            .map_err(|e| ApiError::Transport(format!("failed to read feed body: {e}")))
    }
}
