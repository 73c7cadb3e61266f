//! Catalog core library — descriptor domain types, descriptor files, errors.
//!
//! Public API surface:
//! - [`types`] — descriptor kinds, typed descriptor fields, resolved coordinates
//! - [`error`] — [`DescriptorError`]
//! - [`descriptor`] — load / scan / atomic save of descriptor YAML files

pub mod descriptor;
pub mod error;
pub mod types;

pub use descriptor::Descriptor;
pub use error::DescriptorError;
pub use types::{Coordinate, DescriptorKind, DescriptorSpec, MAVEN_CENTRAL};
