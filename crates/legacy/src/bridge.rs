//! Restore specs for legacy single-framework projects.

use crate::adapter::{ASSET_METADATA_KEYS, ProjectAdapter, RawPackageReference, RawProjectReference};
use crate::error::{Error, Result};
use crate::merge::select_package_references;
use dgspec_model::{
    DependencyGraphSpec, FrameworkOrder, LibraryDependency, PackageIdentity, PackageReference,
    PackageSpec, PackageVersion, ProjectRestoreMetadata, ProjectRestoreMetadataFrameworkInfo,
    ProjectRestoreReference, RestoreOutputType, TargetFrameworkInformation, VersionRange,
    apply_include_flags,
};
use std::path::PathBuf;
use tracing::{debug, warn};

/// File name of the restore output written into the intermediate directory.
pub const ASSETS_FILE_NAME: &str = "project.assets.json";

/// A legacy project whose references live in the host project system.
///
/// Every query reads fresh data through the adapter; nothing is cached.
pub struct LegacyProject<A> {
    adapter: A,
}

impl<A: ProjectAdapter> LegacyProject<A> {
    /// Wraps a project adapter.
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// The wrapped adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Builds the project's restore spec from its current references.
    ///
    /// The spec has one target framework. Its unique name and path are the
    /// project's full path and its output type is assets-file style.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if any request fails, or
    /// [`Error::InvalidPackageReference`] for an unparseable package version.
    pub async fn package_spec(&self) -> Result<PackageSpec> {
        let (framework, project_references, package_references) = tokio::try_join!(
            self.adapter.target_framework(),
            self.adapter.project_references(&ASSET_METADATA_KEYS),
            self.adapter.package_references(&ASSET_METADATA_KEYS),
        )?;

        let full_path = self.adapter.full_path();
        let name = self
            .adapter
            .name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.adapter.unique_name());

        let mut information = TargetFrameworkInformation::new(framework.clone());
        for reference in &package_references {
            information.add_dependency(to_library_dependency(name, reference)?);
        }

        let mut framework_info = ProjectRestoreMetadataFrameworkInfo::new(framework.clone());
        for reference in project_references.iter().map(to_project_reference) {
            // First declaration of a project wins.
            if !framework_info
                .project_references
                .iter()
                .any(|existing| existing.project_unique_name == reference.project_unique_name)
            {
                framework_info.project_references.push(reference);
            }
        }

        let mut metadata = ProjectRestoreMetadata::new(full_path, full_path);
        metadata.project_name = name.to_string();
        metadata.output_type = RestoreOutputType::AssetsFileStyle;
        metadata.original_target_frameworks = vec![framework.short_folder_name().to_string()];
        metadata.target_frameworks.push(framework_info);

        let mut spec = PackageSpec::new(name).with_restore_metadata(metadata);
        spec.target_frameworks.push(information);

        debug!(
            project = full_path,
            framework = %framework,
            packages = package_references.len(),
            projects = project_references.len(),
            "Built legacy project restore spec"
        );
        Ok(spec)
    }

    /// The specs to restore for this project (always exactly one).
    ///
    /// # Errors
    ///
    /// See [`Self::package_spec`].
    pub async fn package_specs_for_restore(&self) -> Result<Vec<PackageSpec>> {
        Ok(vec![self.package_spec().await?])
    }

    /// A graph holding this project's spec as its only restore root.
    ///
    /// # Errors
    ///
    /// See [`Self::package_spec`].
    pub async fn restore_graph(&self) -> Result<DependencyGraphSpec> {
        let spec = self.package_spec().await?;
        let mut graph = DependencyGraphSpec::new();
        graph.add_restore(spec.project_unique_name());
        graph.add_project(spec);
        Ok(graph)
    }

    /// Installed packages, one per package id, chosen across frameworks with `order`.
    ///
    /// # Errors
    ///
    /// See [`Self::package_spec`].
    pub async fn installed_packages(
        &self,
        order: &dyn FrameworkOrder,
    ) -> Result<Vec<PackageReference>> {
        let spec = self.package_spec().await?;
        Ok(select_package_references(&spec, order))
    }

    /// Unique names of referenced projects, without case-insensitive duplicates.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the references cannot be read.
    pub async fn project_reference_names(&self) -> Result<Vec<String>> {
        let references = self
            .adapter
            .project_references(&ASSET_METADATA_KEYS)
            .await?;

        let mut names: Vec<String> = Vec::new();
        for reference in references {
            if !names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&reference.unique_name))
            {
                names.push(reference.unique_name);
            }
        }
        Ok(names)
    }

    /// Path of the restore output, `<intermediate dir>/project.assets.json`.
    /// A project without an intermediate directory uses a relative path.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the directory cannot be queried.
    pub async fn assets_file_path(&self) -> Result<PathBuf> {
        let base = self
            .adapter
            .base_intermediate_path()
            .await?
            .unwrap_or_default();
        Ok(base.join(ASSETS_FILE_NAME))
    }

    /// Whether a restore is needed. Legacy projects are always restored.
    #[must_use]
    pub fn is_restore_required(&self) -> bool {
        true
    }

    /// Adds or updates a package reference. Returns `false` and logs a warning
    /// when the identity has no version or the adapter fails.
    pub async fn install_package(&self, identity: &PackageIdentity) -> bool {
        let Some(version) = &identity.version else {
            warn!(
                project = self.display_name(),
                package = %identity.id,
                "Cannot install a package without a version"
            );
            return false;
        };

        match self
            .adapter
            .add_or_update_package(&identity.id, &version.to_string())
            .await
        {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    project = self.display_name(),
                    package = %identity,
                    error = %error,
                    "Failed to install package"
                );
                false
            }
        }
    }

    /// Removes a package reference. Returns `false` and logs a warning when
    /// the adapter fails.
    pub async fn uninstall_package(&self, id: &str) -> bool {
        match self.adapter.remove_package(id).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    project = self.display_name(),
                    package = id,
                    error = %error,
                    "Failed to uninstall package"
                );
                false
            }
        }
    }

    fn display_name(&self) -> &str {
        self.adapter
            .name()
            .unwrap_or_else(|| self.adapter.unique_name())
    }
}

fn to_project_reference(reference: &RawProjectReference) -> ProjectRestoreReference {
    let path = if reference.project_path.is_empty() {
        reference.unique_name.as_str()
    } else {
        reference.project_path.as_str()
    };

    let mut restore_reference = ProjectRestoreReference::new(reference.unique_name.as_str(), path);
    apply_include_flags(
        &mut restore_reference,
        reference.metadata.get(ASSET_METADATA_KEYS[0]),
        reference.metadata.get(ASSET_METADATA_KEYS[1]),
        reference.metadata.get(ASSET_METADATA_KEYS[2]),
    );
    restore_reference
}

fn to_library_dependency(project: &str, reference: &RawPackageReference) -> Result<LibraryDependency> {
    let version = PackageVersion::parse(&reference.version).map_err(|source| {
        Error::InvalidPackageReference {
            project: project.to_string(),
            package: reference.name.clone(),
            source,
        }
    })?;

    let mut dependency =
        LibraryDependency::new(reference.name.as_str(), VersionRange::at_least(version));
    apply_include_flags(
        &mut dependency,
        reference.metadata.get(ASSET_METADATA_KEYS[0]),
        reference.metadata.get(ASSET_METADATA_KEYS[1]),
        reference.metadata.get(ASSET_METADATA_KEYS[2]),
    );
    Ok(dependency)
}
