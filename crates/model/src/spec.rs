//! A single project's restore description.

use crate::framework::TargetFramework;
use crate::metadata::{ProjectRestoreMetadata, TargetFrameworkInformation};
use crate::reference::{ProjectRestoreReference, ProjectUniqueName};
use crate::version::PackageVersion;

/// Everything restore needs to know about one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Project name.
    pub name: String,
    /// Project version, `1.0.0` unless set.
    pub version: PackageVersion,
    /// Package dependencies per target framework, in declaration order.
    pub target_frameworks: Vec<TargetFrameworkInformation>,
    /// Restore settings; `None` for specs that are not restorable on their own.
    pub restore_metadata: Option<ProjectRestoreMetadata>,
}

impl PackageSpec {
    /// Creates an empty spec named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: PackageVersion::new(1, 0, 0),
            target_frameworks: Vec::new(),
            restore_metadata: None,
        }
    }

    /// Attaches restore metadata.
    #[must_use]
    pub fn with_restore_metadata(mut self, metadata: ProjectRestoreMetadata) -> Self {
        self.restore_metadata = Some(metadata);
        self
    }

    /// The graph key: the metadata's unique name when present, otherwise the
    /// spec name.
    #[must_use]
    pub fn project_unique_name(&self) -> ProjectUniqueName {
        self.restore_metadata.as_ref().map_or_else(
            || ProjectUniqueName::new(self.name.clone()),
            |metadata| metadata.project_unique_name.clone(),
        )
    }

    /// Returns the dependency block for `framework`, creating it at the end if
    /// absent.
    pub fn framework_mut(&mut self, framework: &TargetFramework) -> &mut TargetFrameworkInformation {
        let index = match self
            .target_frameworks
            .iter()
            .position(|info| info.framework == *framework)
        {
            Some(index) => index,
            None => {
                self.target_frameworks
                    .push(TargetFrameworkInformation::new(framework.clone()));
                self.target_frameworks.len() - 1
            }
        };
        &mut self.target_frameworks[index]
    }

    /// Project-to-project edges across every framework, in declaration order.
    pub fn project_references(&self) -> impl Iterator<Item = &ProjectRestoreReference> {
        self.restore_metadata
            .iter()
            .flat_map(ProjectRestoreMetadata::project_references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_falls_back_to_name() {
        let spec = PackageSpec::new("Lib");
        assert_eq!(spec.project_unique_name().as_str(), "Lib");
        assert_eq!(spec.version.to_string(), "1.0.0");
        assert_eq!(spec.project_references().count(), 0);
    }

    #[test]
    fn test_unique_name_from_metadata() {
        let spec = PackageSpec::new("Lib").with_restore_metadata(ProjectRestoreMetadata::new(
            "/src/lib/Lib.csproj",
            "/src/lib/Lib.csproj",
        ));
        assert_eq!(spec.project_unique_name().as_str(), "/src/lib/Lib.csproj");
    }
}
