//! Domain types for catalog descriptors.
//!
//! A descriptor file is kept as a raw YAML mapping so that unknown keys and
//! key order survive a rewrite; [`DescriptorSpec`] is the typed view of the
//! fields the synchronizer actually reads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default artifact repository when a descriptor has no `maven-repository`.
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2/";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which of the two descriptor sets a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    /// A platform ("BOM") published as a flat JSON artifact.
    Platform,
    /// A single extension whose metadata lives inside a jar.
    Extension,
}

impl DescriptorKind {
    /// Processing order: platforms first, then extensions.
    pub fn all() -> &'static [DescriptorKind] {
        &[DescriptorKind::Platform, DescriptorKind::Extension]
    }

    /// Subdirectory of the working directory holding this kind of descriptor.
    pub fn dir_name(self) -> &'static str {
        match self {
            DescriptorKind::Platform => "platforms",
            DescriptorKind::Extension => "extensions",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Platform => write!(f, "platform"),
            DescriptorKind::Extension => write!(f, "extension"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Typed view of the descriptor keys read during a sync.
///
/// `versions` is deliberately absent: it is read and mutated on the raw
/// document so that its entries keep their original YAML form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescriptorSpec {
    #[serde(default)]
    pub maven_repository: Option<String>,
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub classifier_as_version: bool,
}

impl DescriptorSpec {
    /// Repository base URL with exactly one trailing slash.
    pub fn repository(&self) -> String {
        normalize_repository(self.maven_repository.as_deref())
    }

    /// Classifier to use for `version`.
    ///
    /// `classifier-as-version` wins over any configured classifier; an empty
    /// classifier counts as none.
    pub fn effective_classifier(&self, version: &str) -> Option<String> {
        if self.classifier_as_version {
            return Some(version.to_string());
        }
        self.classifier
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// A fully resolved artifact coordinate for one sync of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    /// Repository base URL, always ending in `/`.
    pub repository: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl Coordinate {
    /// `{repo}{group/with/slashes}/{artifact}/`
    pub fn artifact_base_url(&self) -> String {
        artifact_base_url(&self.repository, &self.group_id, &self.artifact_id)
    }

    /// `{repo}{group/with/slashes}/{artifact}/{version}/`
    pub fn version_base_url(&self) -> String {
        format!("{}{}/", self.artifact_base_url(), self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// `{repo}{group/with/slashes}/{artifact}/` — `repository` must end in `/`.
pub fn artifact_base_url(repository: &str, group_id: &str, artifact_id: &str) -> String {
    format!("{repository}{}/{artifact_id}/", group_id.replace('.', "/"))
}

/// Default to Maven Central and force a single trailing slash.
pub fn normalize_repository(raw: Option<&str>) -> String {
    let base = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(MAVEN_CENTRAL);
    format!("{}/", base.trim_end_matches('/'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(classifier: Option<&str>, as_version: bool) -> DescriptorSpec {
        DescriptorSpec {
            maven_repository: None,
            group_id: "io.quarkus".to_string(),
            artifact_id: "quarkus-bom-quarkus-platform-descriptor".to_string(),
            classifier: classifier.map(str::to_string),
            classifier_as_version: as_version,
        }
    }

    #[test]
    fn kind_display_and_dirs() {
        assert_eq!(DescriptorKind::Platform.to_string(), "platform");
        assert_eq!(DescriptorKind::Extension.dir_name(), "extensions");
        assert_eq!(
            DescriptorKind::all(),
            &[DescriptorKind::Platform, DescriptorKind::Extension]
        );
    }

    #[test]
    fn repository_defaults_to_maven_central() {
        assert_eq!(normalize_repository(None), MAVEN_CENTRAL);
        assert_eq!(normalize_repository(Some("  ")), MAVEN_CENTRAL);
    }

    #[test]
    fn repository_gets_single_trailing_slash() {
        assert_eq!(
            normalize_repository(Some("https://repo.example.com/maven")),
            "https://repo.example.com/maven/"
        );
        assert_eq!(
            normalize_repository(Some("https://repo.example.com/maven//")),
            "https://repo.example.com/maven/"
        );
    }

    #[test]
    fn classifier_as_version_overrides_configured_classifier() {
        let s = spec(Some("static"), true);
        assert_eq!(s.effective_classifier("3.1"), Some("3.1".to_string()));
    }

    #[test]
    fn empty_classifier_is_none() {
        assert_eq!(spec(Some(""), false).effective_classifier("1.0"), None);
        assert_eq!(spec(None, false).effective_classifier("1.0"), None);
        assert_eq!(
            spec(Some("linux"), false).effective_classifier("1.0"),
            Some("linux".to_string())
        );
    }

    #[test]
    fn coordinate_urls_use_group_path() {
        let c = Coordinate {
            repository: MAVEN_CENTRAL.to_string(),
            group_id: "io.quarkus".to_string(),
            artifact_id: "quarkus-core".to_string(),
            version: "2.0.0.Final".to_string(),
            classifier: None,
        };
        assert_eq!(
            c.version_base_url(),
            "https://repo1.maven.org/maven2/io/quarkus/quarkus-core/2.0.0.Final/"
        );
        assert_eq!(c.to_string(), "io.quarkus:quarkus-core:2.0.0.Final");
    }
}
