//! Artifact repository transport.
//!
//! The resolver and fetchers only ever need "GET this URL, give me the
//! bytes"; [`ArtifactSource`] is that seam so tests can serve canned
//! documents without a network.

use std::io::Read;
use std::time::Duration;

use crate::error::{retrieval_err, SyncError};

/// Connect timeout shared by every request the tool makes.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Blocking byte fetcher for repository URLs.
pub trait ArtifactSource {
    /// Download the resource at `url`. Any non-2xx status is an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, SyncError>;
}

/// Build the HTTP agent reused for every repository and registry call.
pub fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(CONNECT_TIMEOUT)
        .user_agent(concat!("publish-catalog/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// [`ArtifactSource`] backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl ArtifactSource for HttpSource {
    fn get(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        tracing::debug!("GET {url}");
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(retrieval_err(
                    url,
                    format!("HTTP {status} {}", response.status_text()),
                ))
            }
            Err(ureq::Error::Transport(transport)) => return Err(retrieval_err(url, transport)),
        };

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| retrieval_err(url, e))?;
        Ok(bytes)
    }
}
