//! Project-to-project and project-to-package references.

use crate::flags::{AssetFlags, HasAssetFlags};
use crate::framework::TargetFramework;
use crate::version::{PackageVersion, VersionRange};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Case-insensitive key identifying a project within a dependency graph.
///
/// The original spelling is preserved for display and serialization; equality
/// and hashing ignore ASCII case.
#[derive(Debug, Clone, Eq)]
pub struct ProjectUniqueName(String);

impl ProjectUniqueName {
    /// Wraps a project unique name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as originally spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ProjectUniqueName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for ProjectUniqueName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for ProjectUniqueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectUniqueName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProjectUniqueName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A project-to-project edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRestoreReference {
    /// Unique name of the referenced project (the join key into the graph).
    pub project_unique_name: ProjectUniqueName,
    /// Path to the referenced project file.
    pub project_path: String,
    /// Asset flags for the edge.
    pub flags: AssetFlags,
}

impl ProjectRestoreReference {
    /// Creates a reference with default asset flags.
    #[must_use]
    pub fn new(project_unique_name: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            project_unique_name: ProjectUniqueName::new(project_unique_name),
            project_path: project_path.into(),
            flags: AssetFlags::default(),
        }
    }

    /// Replaces the asset flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AssetFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl HasAssetFlags for ProjectRestoreReference {
    fn asset_flags_mut(&mut self) -> &mut AssetFlags {
        &mut self.flags
    }
}

/// A project-to-package edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDependency {
    /// Package id. Compared case-insensitively.
    pub name: String,
    /// Acceptable versions.
    pub version_range: VersionRange,
    /// Asset flags for the edge.
    pub flags: AssetFlags,
}

impl LibraryDependency {
    /// Creates a package dependency with default asset flags.
    #[must_use]
    pub fn new(name: impl Into<String>, version_range: VersionRange) -> Self {
        Self {
            name: name.into(),
            version_range,
            flags: AssetFlags::default(),
        }
    }

    /// Replaces the asset flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AssetFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether this dependency names `package_id` (ignoring case).
    #[must_use]
    pub fn is_package(&self, package_id: &str) -> bool {
        self.name.eq_ignore_ascii_case(package_id)
    }
}

impl HasAssetFlags for LibraryDependency {
    fn asset_flags_mut(&mut self) -> &mut AssetFlags {
        &mut self.flags
    }
}

/// A package id with an optional concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity {
    /// Package id.
    pub id: String,
    /// Version, if known.
    pub version: Option<PackageVersion>,
}

impl PackageIdentity {
    /// Creates an identity.
    #[must_use]
    pub fn new(id: impl Into<String>, version: Option<PackageVersion>) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {version}", self.id),
            None => f.write_str(&self.id),
        }
    }
}

/// A framework-agnostic view of one installed package, as exposed to callers
/// that need a single package list for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    /// Package id and the minimum version of its range.
    pub identity: PackageIdentity,
    /// Framework whose reference was chosen as canonical.
    pub target_framework: TargetFramework,
    /// Asset flags of the chosen reference.
    pub flags: AssetFlags,
}

impl PackageReference {
    /// Builds the installed-package view of a dependency declared under `framework`.
    #[must_use]
    pub fn from_dependency(dependency: &LibraryDependency, framework: &TargetFramework) -> Self {
        Self {
            identity: PackageIdentity::new(
                dependency.name.clone(),
                dependency.version_range.min_version().cloned(),
            ),
            target_framework: framework.clone(),
            flags: dependency.flags,
        }
    }
}
