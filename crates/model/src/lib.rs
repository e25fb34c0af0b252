//! Restore dependency graph model.
//!
//! This crate holds the in-memory form of a multi-project restore graph, the
//! project closure algorithm, and the JSON document used to exchange graphs
//! with out-of-process tools.
//!
//! # Key Types
//!
//! - [`DependencyGraphSpec`]: projects keyed by unique name plus restore roots
//! - [`PackageSpec`]: one project's restore description
//! - [`ProjectRestoreMetadata`]: per-project settings and per-framework project references
//! - [`TargetFrameworkInformation`]: per-framework package dependencies
//! - [`AssetFlags`]: include/exclude/private asset sets carried by every reference
//!
//! # Example
//!
//! ```ignore
//! use dgspec_model::DependencyGraphSpec;
//!
//! let graph = DependencyGraphSpec::load_file("obj/project.dg")?;
//! for spec in graph.get_closure("/src/app/App.csproj") {
//!     println!("{}", spec.name);
//! }
//! ```

mod closure;
mod document;
mod error;
mod flags;
mod framework;
mod graph;
mod metadata;
mod reference;
mod spec;
mod version;

pub use error::{Error, Result};
pub use flags::{AssetFlags, HasAssetFlags, LibraryIncludeFlags, apply_include_flags};
pub use framework::{FrameworkOrder, FrameworkPrecedence, FrameworkVersion, TargetFramework};
pub use graph::{DependencyGraphSpec, MissingReference};
pub use metadata::{
    PackageSource, ProjectRestoreMetadata, ProjectRestoreMetadataFrameworkInfo, RestoreOutputType,
    TargetFrameworkInformation,
};
pub use reference::{
    LibraryDependency, PackageIdentity, PackageReference, ProjectRestoreReference,
    ProjectUniqueName,
};
pub use spec::PackageSpec;
pub use version::{PackageVersion, VersionRange};
