//! Bridge from legacy single-framework projects to the restore graph model.
//!
//! A host project system is reached through the [`ProjectAdapter`] trait.
//! [`LegacyProject`] turns the adapter's raw references into a
//! [`dgspec_model::PackageSpec`], and [`select_package_references`] collapses
//! per-framework package references into one list. Solution project lists
//! come from a [`ProjectListProvider`] chosen by [`BridgeConfig`].

mod adapter;
mod bridge;
mod config;
mod error;
mod merge;
mod solution;

pub use adapter::{
    ASSET_METADATA_KEYS, ProjectAdapter, RawPackageReference, RawProjectReference,
    ReferenceMetadata,
};
pub use bridge::{ASSETS_FILE_NAME, LegacyProject};
pub use config::{BridgeConfig, PROVIDER_ENV_VAR, ProjectListProviderKind, TOOLCHAIN_ENV_VAR};
pub use error::{Error, Result};
pub use merge::select_package_references;
pub use solution::{
    ProjectListProvider, SolutionFileProjectListProvider, ToolchainProjectListProvider,
};
