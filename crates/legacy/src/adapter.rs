//! The seam to the host project system.
//!
//! A [`ProjectAdapter`] answers questions about one loaded project: its
//! identity, its single target framework and its raw project and package
//! references. Everything behind it (an IDE, a build host, a test fake) is
//! opaque to the bridge.

use crate::error::Result;
use async_trait::async_trait;
use dgspec_model::TargetFramework;
use std::path::PathBuf;

/// Metadata keys requested for every project and package reference.
pub const ASSET_METADATA_KEYS: [&str; 3] = ["IncludeAssets", "ExcludeAssets", "PrivateAssets"];

/// Metadata values attached to a raw reference, keyed by item metadata name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMetadata {
    entries: Vec<(String, String)>,
}

impl ReferenceMetadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a value. Keys match ignoring case.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The value for `key`, or the empty string when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map_or("", |(_, value)| value.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReferenceMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

/// A project-to-project reference as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProjectReference {
    /// Unique name of the referenced project.
    pub unique_name: String,
    /// Path of the referenced project; empty when the host only knows the unique name.
    pub project_path: String,
    /// Requested item metadata.
    pub metadata: ReferenceMetadata,
}

/// A package reference as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPackageReference {
    /// Package id.
    pub name: String,
    /// Version string as written in the project file.
    pub version: String,
    /// Requested item metadata.
    pub metadata: ReferenceMetadata,
}

/// A loaded single-framework project in the host project system.
///
/// Calls may be slow (they can wait on the host). The bridge never retries;
/// a failed call fails the operation that made it. Dropping the returned
/// future cancels the request as far as the implementation allows.
#[async_trait]
pub trait ProjectAdapter: Send + Sync {
    /// Display name, if the host has one.
    fn name(&self) -> Option<&str>;

    /// Host-specific unique name.
    fn unique_name(&self) -> &str;

    /// Full path of the project file.
    fn full_path(&self) -> &str;

    /// The project's intermediate output directory (`obj/`).
    async fn base_intermediate_path(&self) -> Result<Option<PathBuf>>;

    /// The project's target framework.
    async fn target_framework(&self) -> Result<TargetFramework>;

    /// Project references with the values of `metadata_keys`.
    async fn project_references(&self, metadata_keys: &[&str]) -> Result<Vec<RawProjectReference>>;

    /// Package references with the values of `metadata_keys`.
    async fn package_references(&self, metadata_keys: &[&str]) -> Result<Vec<RawPackageReference>>;

    /// Adds a package reference or updates its version.
    async fn add_or_update_package(&self, id: &str, version: &str) -> Result<()>;

    /// Removes a package reference.
    async fn remove_package(&self, id: &str) -> Result<()>;
}
