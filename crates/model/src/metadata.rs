//! Per-project and per-framework restore metadata.

use crate::framework::TargetFramework;
use crate::reference::{LibraryDependency, ProjectRestoreReference, ProjectUniqueName};
use std::fmt;

/// How a project's restore output is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RestoreOutputType {
    /// Not known.
    #[default]
    Unknown,
    /// `project.json` projects with a lock file (`uap`).
    LockFileStyle,
    /// `PackageReference` projects producing `project.assets.json` (`netcore`).
    AssetsFileStyle,
    /// A dotnet CLI tool reference.
    DotnetCliTool,
    /// Standalone restore with no project file.
    Standalone,
    /// `packages.config` projects.
    PackagesConfigStyle,
}

impl RestoreOutputType {
    /// Document spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::LockFileStyle => "uap",
            Self::AssetsFileStyle => "netcore",
            Self::DotnetCliTool => "dotnetclitool",
            Self::Standalone => "standalone",
            Self::PackagesConfigStyle => "packagesconfig",
        }
    }

    /// Parses the document spelling, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        [
            Self::Unknown,
            Self::LockFileStyle,
            Self::AssetsFileStyle,
            Self::DotnetCliTool,
            Self::Standalone,
            Self::PackagesConfigStyle,
        ]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for RestoreOutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package feed location. Sources compare by location, ignoring case.
#[derive(Debug, Clone, Eq)]
pub struct PackageSource {
    /// Feed URL or local directory.
    pub source: String,
}

impl PackageSource {
    /// Creates a source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl PartialEq for PackageSource {
    fn eq(&self, other: &Self) -> bool {
        self.source.eq_ignore_ascii_case(&other.source)
    }
}

/// Project-to-project edges declared for one target framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRestoreMetadataFrameworkInfo {
    /// The framework these references apply to.
    pub framework: TargetFramework,
    /// References in declaration order, unique by project unique name.
    pub project_references: Vec<ProjectRestoreReference>,
}

impl ProjectRestoreMetadataFrameworkInfo {
    /// Creates an empty block for `framework`.
    #[must_use]
    pub fn new(framework: TargetFramework) -> Self {
        Self {
            framework,
            project_references: Vec::new(),
        }
    }

    /// Adds a reference, replacing any existing one to the same project.
    pub fn add_project_reference(&mut self, reference: ProjectRestoreReference) {
        if let Some(existing) = self
            .project_references
            .iter_mut()
            .find(|r| r.project_unique_name == reference.project_unique_name)
        {
            *existing = reference;
        } else {
            self.project_references.push(reference);
        }
    }
}

/// Package dependencies declared for one target framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFrameworkInformation {
    /// The framework.
    pub framework: TargetFramework,
    /// Dependencies in declaration order, unique by package id (ignoring case).
    pub dependencies: Vec<LibraryDependency>,
}

impl TargetFrameworkInformation {
    /// Creates an empty block for `framework`.
    #[must_use]
    pub fn new(framework: TargetFramework) -> Self {
        Self {
            framework,
            dependencies: Vec::new(),
        }
    }

    /// Adds a dependency, replacing any existing one with the same package id.
    pub fn add_dependency(&mut self, dependency: LibraryDependency) {
        if let Some(existing) = self
            .dependencies
            .iter_mut()
            .find(|d| d.is_package(&dependency.name))
        {
            *existing = dependency;
        } else {
            self.dependencies.push(dependency);
        }
    }

    /// Looks up a dependency by package id, ignoring case.
    #[must_use]
    pub fn dependency(&self, package_id: &str) -> Option<&LibraryDependency> {
        self.dependencies.iter().find(|d| d.is_package(package_id))
    }
}

/// Restore settings for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRestoreMetadata {
    /// Graph key of the project.
    pub project_unique_name: ProjectUniqueName,
    /// Path to the project file.
    pub project_path: String,
    /// Display name.
    pub project_name: String,
    /// Path to `project.json`, for lock-file style projects.
    pub project_json_path: Option<String>,
    /// Restore output style.
    pub output_type: RestoreOutputType,
    /// Global packages folder override.
    pub packages_path: Option<String>,
    /// Package sources in configured order.
    pub sources: Vec<PackageSource>,
    /// Fallback package folders in configured order.
    pub fallback_folders: Vec<String>,
    /// Project references grouped by framework.
    pub target_frameworks: Vec<ProjectRestoreMetadataFrameworkInfo>,
    /// Target framework names as written in the project file.
    pub original_target_frameworks: Vec<String>,
}

impl ProjectRestoreMetadata {
    /// Creates metadata with empty collections and an unknown output type.
    #[must_use]
    pub fn new(project_unique_name: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            project_unique_name: ProjectUniqueName::new(project_unique_name),
            project_path: project_path.into(),
            project_name: String::new(),
            project_json_path: None,
            output_type: RestoreOutputType::Unknown,
            packages_path: None,
            sources: Vec::new(),
            fallback_folders: Vec::new(),
            target_frameworks: Vec::new(),
            original_target_frameworks: Vec::new(),
        }
    }

    /// Returns the block for `framework`, creating it at the end if absent.
    pub fn framework_mut(
        &mut self,
        framework: &TargetFramework,
    ) -> &mut ProjectRestoreMetadataFrameworkInfo {
        let index = match self
            .target_frameworks
            .iter()
            .position(|info| info.framework == *framework)
        {
            Some(index) => index,
            None => {
                self.target_frameworks
                    .push(ProjectRestoreMetadataFrameworkInfo::new(framework.clone()));
                self.target_frameworks.len() - 1
            }
        };
        &mut self.target_frameworks[index]
    }

    /// Every project reference across all frameworks, in declaration order.
    /// A project referenced from several frameworks appears once per framework.
    pub fn project_references(&self) -> impl Iterator<Item = &ProjectRestoreReference> {
        self.target_frameworks
            .iter()
            .flat_map(|info| info.project_references.iter())
    }
}
