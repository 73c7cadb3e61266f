//! # catalog-sync
//!
//! Resolves the latest artifact versions for catalog descriptors, publishes
//! the matching payloads to the registry, and records the new versions.
//!
//! Build a [`Synchronizer`] from [`SyncOptions`] plus the three collaborators
//! ([`ArtifactSource`], [`Publisher`], [`VersionControl`]) and call
//! [`Synchronizer::run`].

pub mod archive;
pub mod error;
pub mod git;
pub mod maven;
pub mod pipeline;
pub mod publish;
pub mod source;

pub use error::SyncError;
pub use git::{GitRepo, VersionControl};
pub use pipeline::{FileOutcome, FileReport, SyncOptions, Synchronizer};
pub use publish::{PublishOutcome, Publisher, RegistryClient};
pub use source::{build_agent, ArtifactSource, HttpSource};
