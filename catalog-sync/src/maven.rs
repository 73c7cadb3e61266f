//! Maven repository layout: latest-version resolution and artifact fetches.
//!
//! ```text
//! {repo}/{group/path}/{artifact}/maven-metadata.xml
//! {repo}/{group/path}/{artifact}/{version}/{artifact}[-{classifier}]-{version}.json
//! {repo}/{group/path}/{artifact}/{version}/{artifact}-{version}.jar
//! ```

use serde::Deserialize;

use catalog_core::types::artifact_base_url;
use catalog_core::Coordinate;

use crate::archive::{self, EXTENSION_ENTRY};
use crate::error::{retrieval_err, SyncError};
use crate::source::ArtifactSource;

// ---------------------------------------------------------------------------
// maven-metadata.xml
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Metadata {
    versioning: Option<Versioning>,
}

#[derive(Debug, Deserialize)]
struct Versioning {
    latest: Option<String>,
    release: Option<String>,
    versions: Option<VersionList>,
}

#[derive(Debug, Deserialize)]
struct VersionList {
    #[serde(default)]
    version: Vec<String>,
}

/// `{repo}{group/path}/{artifact}/maven-metadata.xml`
pub fn metadata_url(repository: &str, group_id: &str, artifact_id: &str) -> String {
    format!(
        "{}maven-metadata.xml",
        artifact_base_url(repository, group_id, artifact_id)
    )
}

/// Extract the latest version from a `maven-metadata.xml` document.
///
/// Prefers `<latest>`, then `<release>`, then the last `<version>` listed.
pub fn parse_latest_version(xml: &[u8], url: &str) -> Result<String, SyncError> {
    let text = std::str::from_utf8(xml).map_err(|e| retrieval_err(url, e))?;
    let metadata: Metadata = quick_xml::de::from_str(text)
        .map_err(|e| retrieval_err(url, format!("invalid metadata: {e}")))?;
    let versioning = metadata
        .versioning
        .ok_or_else(|| retrieval_err(url, "invalid metadata: no <versioning> block"))?;

    let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    non_empty(versioning.latest)
        .or_else(|| non_empty(versioning.release))
        .or_else(|| non_empty(versioning.versions.and_then(|v| v.version.into_iter().last())))
        .ok_or_else(|| retrieval_err(url, "invalid metadata: no latest version declared"))
}

/// Fetch repository metadata and return the declared latest version.
pub fn latest_version(
    source: &dyn ArtifactSource,
    repository: &str,
    group_id: &str,
    artifact_id: &str,
) -> Result<String, SyncError> {
    let url = metadata_url(repository, group_id, artifact_id);
    let xml = source.get(&url)?;
    parse_latest_version(&xml, &url)
}

// ---------------------------------------------------------------------------
// Artifact payloads
// ---------------------------------------------------------------------------

/// URL of the JSON catalog a platform publishes for `coordinate`.
pub fn platform_url(coordinate: &Coordinate) -> String {
    let Coordinate {
        artifact_id,
        version,
        ..
    } = coordinate;
    match coordinate.classifier.as_deref() {
        Some(classifier) => format!(
            "{}{artifact_id}-{classifier}-{version}.json",
            coordinate.version_base_url()
        ),
        None => format!(
            "{}{artifact_id}-{version}.json",
            coordinate.version_base_url()
        ),
    }
}

/// URL of the jar an extension publishes for `coordinate`.
pub fn extension_url(coordinate: &Coordinate) -> String {
    format!(
        "{}{}-{}.jar",
        coordinate.version_base_url(),
        coordinate.artifact_id,
        coordinate.version
    )
}

/// Download the platform JSON catalog bytes.
pub fn fetch_platform(
    source: &dyn ArtifactSource,
    coordinate: &Coordinate,
) -> Result<Vec<u8>, SyncError> {
    source.get(&platform_url(coordinate))
}

/// Download the extension jar and return its `quarkus-extension.yaml` bytes.
pub fn fetch_extension(
    source: &dyn ArtifactSource,
    coordinate: &Coordinate,
) -> Result<Vec<u8>, SyncError> {
    let url = extension_url(coordinate);
    let jar = source.get(&url)?;
    archive::read_entry(&jar, EXTENSION_ENTRY, &url)
}
