//! Registry admin endpoint client.

use std::time::Duration;

use catalog_core::DescriptorKind;

use crate::error::SyncError;

/// Per-request timeout for publish calls.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(120);

/// How the registry accepted a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 202 — the registry accepted the new version.
    Accepted,
    /// 409 — the registry already knows this version.
    AlreadyExists,
}

/// Sends descriptor payloads to the registry.
pub trait Publisher {
    fn publish(&self, kind: DescriptorKind, payload: &[u8]) -> Result<PublishOutcome, SyncError>;
}

/// Admin endpoint path for `kind`.
pub fn endpoint_path(kind: DescriptorKind) -> &'static str {
    match kind {
        DescriptorKind::Platform => "/admin/v1/extension/catalog",
        DescriptorKind::Extension => "/admin/v1/extension",
    }
}

/// `Content-Type` of the payload published for `kind`.
pub fn content_type(kind: DescriptorKind) -> &'static str {
    match kind {
        DescriptorKind::Platform => "application/json",
        DescriptorKind::Extension => "application/yaml",
    }
}

/// `scheme://host[:port]` of `url`, dropping any path, query, or fragment.
pub fn origin(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find(['/', '?', '#']) {
        Some(end) => &url[..after_scheme + end],
        None => url,
    }
}

/// Absolute endpoint URL: the admin paths replace any path on the base URL.
pub fn endpoint_url(registry_url: &str, kind: DescriptorKind) -> String {
    format!("{}{}", origin(registry_url), endpoint_path(kind))
}

/// Map a registry status code to an outcome: 202 accepted, 409 already
/// present, anything else rejected.
pub fn classify_response(url: &str, status: u16, body: String) -> Result<PublishOutcome, SyncError> {
    match status {
        202 => Ok(PublishOutcome::Accepted),
        409 => Ok(PublishOutcome::AlreadyExists),
        _ => Err(SyncError::Publish {
            url: url.to_string(),
            status,
            body,
        }),
    }
}

/// [`Publisher`] posting to the registry over HTTP.
#[derive(Clone)]
pub struct RegistryClient {
    agent: ureq::Agent,
    registry_url: String,
    token: String,
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("registry_url", &self.registry_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl RegistryClient {
    pub fn new(agent: ureq::Agent, registry_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            agent,
            registry_url: registry_url.into(),
            token: token.into(),
        }
    }
}

impl Publisher for RegistryClient {
    fn publish(&self, kind: DescriptorKind, payload: &[u8]) -> Result<PublishOutcome, SyncError> {
        let url = endpoint_url(&self.registry_url, kind);
        let result = self
            .agent
            .post(&url)
            .timeout(PUBLISH_TIMEOUT)
            .set("Content-Type", content_type(kind))
            .set("Token", &self.token)
            .send_bytes(payload);

        let (status, body) = match result {
            Ok(response) => {
                let status = response.status();
                (status, response.into_string().unwrap_or_default())
            }
            Err(ureq::Error::Status(status, response)) => {
                (status, response.into_string().unwrap_or_default())
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SyncError::PublishTransport {
                    url,
                    reason: transport.to_string(),
                })
            }
        };

        let outcome = classify_response(&url, status, body)?;
        match outcome {
            PublishOutcome::Accepted => tracing::info!("{kind} published"),
            PublishOutcome::AlreadyExists => {
                tracing::info!("conflict, version already exists; ignoring")
            }
        }
        Ok(outcome)
    }
}
