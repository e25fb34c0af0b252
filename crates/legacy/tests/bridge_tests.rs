//! Legacy project bridge behaviour against an in-memory project adapter.

use async_trait::async_trait;
use dgspec_legacy::{
    ASSET_METADATA_KEYS, Error, LegacyProject, ProjectAdapter, RawPackageReference,
    RawProjectReference, ReferenceMetadata, Result,
};
use dgspec_model::{
    AssetFlags, DependencyGraphSpec, FrameworkPrecedence, LibraryIncludeFlags, PackageIdentity,
    PackageVersion, RestoreOutputType, TargetFramework,
};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Default)]
struct FakeAdapter {
    name: Option<String>,
    framework: String,
    projects: Vec<RawProjectReference>,
    packages: Vec<RawPackageReference>,
    intermediate: Option<PathBuf>,
    fail_references: bool,
    fail_edits: bool,
    requested_keys: Mutex<Vec<Vec<String>>>,
    edits: Mutex<Vec<String>>,
}

impl FakeAdapter {
    fn app() -> Self {
        Self {
            name: Some("App".to_string()),
            framework: "net45".to_string(),
            projects: vec![
                project("/src/lib/Lib.csproj", ReferenceMetadata::new()),
                project(
                    "/src/util/Util.csproj",
                    ReferenceMetadata::new()
                        .with("IncludeAssets", "build")
                        .with("PrivateAssets", "all"),
                ),
                project("/SRC/LIB/LIB.CSPROJ", ReferenceMetadata::new()),
            ],
            packages: vec![
                package("Newtonsoft.Json", "9.0.1", ReferenceMetadata::new()),
                package(
                    "StyleCop.Analyzers",
                    "1.0.0-beta.1",
                    ReferenceMetadata::new().with("PrivateAssets", "all"),
                ),
            ],
            intermediate: Some(PathBuf::from("/src/app/obj")),
            ..Self::default()
        }
    }
}

fn project(unique_name: &str, metadata: ReferenceMetadata) -> RawProjectReference {
    RawProjectReference {
        unique_name: unique_name.to_string(),
        project_path: String::new(),
        metadata,
    }
}

fn package(name: &str, version: &str, metadata: ReferenceMetadata) -> RawPackageReference {
    RawPackageReference {
        name: name.to_string(),
        version: version.to_string(),
        metadata,
    }
}

#[async_trait]
impl ProjectAdapter for FakeAdapter {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn unique_name(&self) -> &str {
        "App.csproj"
    }

    fn full_path(&self) -> &str {
        "/src/app/App.csproj"
    }

    async fn base_intermediate_path(&self) -> Result<Option<PathBuf>> {
        Ok(self.intermediate.clone())
    }

    async fn target_framework(&self) -> Result<TargetFramework> {
        Ok(TargetFramework::parse(&self.framework))
    }

    async fn project_references(&self, metadata_keys: &[&str]) -> Result<Vec<RawProjectReference>> {
        self.requested_keys
            .lock()
            .unwrap()
            .push(metadata_keys.iter().map(ToString::to_string).collect());
        if self.fail_references {
            return Err(Error::adapter("App", "project system is busy"));
        }
        Ok(self.projects.clone())
    }

    async fn package_references(&self, _metadata_keys: &[&str]) -> Result<Vec<RawPackageReference>> {
        Ok(self.packages.clone())
    }

    async fn add_or_update_package(&self, id: &str, version: &str) -> Result<()> {
        if self.fail_edits {
            return Err(Error::adapter("App", "project file is read-only"));
        }
        self.edits.lock().unwrap().push(format!("add {id} {version}"));
        Ok(())
    }

    async fn remove_package(&self, id: &str) -> Result<()> {
        if self.fail_edits {
            return Err(Error::adapter("App", "project file is read-only"));
        }
        self.edits.lock().unwrap().push(format!("remove {id}"));
        Ok(())
    }
}

#[tokio::test]
async fn test_package_spec_shape() {
    let project = LegacyProject::new(FakeAdapter::app());
    let spec = project.package_spec().await.unwrap();

    assert_eq!(spec.name, "App");
    assert_eq!(spec.project_unique_name().as_str(), "/src/app/App.csproj");
    assert_eq!(spec.target_frameworks.len(), 1);

    let metadata = spec.restore_metadata.as_ref().unwrap();
    assert_eq!(metadata.project_path, "/src/app/App.csproj");
    assert_eq!(metadata.project_name, "App");
    assert_eq!(metadata.output_type, RestoreOutputType::AssetsFileStyle);
    assert_eq!(metadata.original_target_frameworks, vec!["net45"]);
    assert_eq!(metadata.target_frameworks.len(), 1);

    let references = &metadata.target_frameworks[0].project_references;
    assert_eq!(references.len(), 2);
    assert_eq!(references[0].project_path, "/src/lib/Lib.csproj");
    assert_eq!(references[0].flags, AssetFlags::default());
    assert_eq!(references[1].flags.include_assets, LibraryIncludeFlags::BUILD);
    assert_eq!(references[1].flags.private_assets, LibraryIncludeFlags::ALL);

    let dependencies = &spec.target_frameworks[0].dependencies;
    assert_eq!(dependencies[0].version_range.to_string(), "[9.0.1, )");
    assert_eq!(dependencies[1].flags.private_assets, LibraryIncludeFlags::ALL);
}

#[tokio::test]
async fn test_requests_asset_metadata_keys() {
    let project = LegacyProject::new(FakeAdapter::app());
    project.package_spec().await.unwrap();

    let requested = project.adapter().requested_keys.lock().unwrap().clone();
    assert_eq!(requested, vec![ASSET_METADATA_KEYS.map(String::from).to_vec()]);
}

#[tokio::test]
async fn test_name_falls_back_to_unique_name() {
    let adapter = FakeAdapter {
        name: None,
        ..FakeAdapter::app()
    };
    let spec = LegacyProject::new(adapter).package_spec().await.unwrap();

    assert_eq!(spec.name, "App.csproj");
}

#[tokio::test]
async fn test_adapter_failure_fails_spec() {
    let adapter = FakeAdapter {
        fail_references: true,
        ..FakeAdapter::app()
    };
    let result = LegacyProject::new(adapter).restore_graph().await;

    assert!(matches!(result, Err(Error::Adapter { .. })));
}

#[tokio::test]
async fn test_invalid_version_fails_spec() {
    let adapter = FakeAdapter {
        packages: vec![package("Broken", "one.two", ReferenceMetadata::new())],
        ..FakeAdapter::app()
    };
    let result = LegacyProject::new(adapter).package_spec().await;

    assert!(matches!(result, Err(Error::InvalidPackageReference { .. })));
}

#[tokio::test]
async fn test_restore_graph_marks_root() {
    let project = LegacyProject::new(FakeAdapter::app());
    let graph = project.restore_graph().await.unwrap();

    assert_eq!(graph.len(), 1);
    assert!(graph.is_restore_root("/src/app/App.csproj"));
    // Referenced projects are not part of this graph yet.
    assert_eq!(graph.missing_references().len(), 2);
    assert_eq!(graph.get_closure("/src/app/App.csproj").len(), 1);
}

#[tokio::test]
async fn test_restore_graph_merges_into_larger_graph() {
    let mut graph = DependencyGraphSpec::new();
    let lib = LegacyProject::new(FakeAdapter {
        name: Some("Lib".to_string()),
        projects: Vec::new(),
        ..FakeAdapter::app()
    });
    let app = LegacyProject::new(FakeAdapter::app());

    graph.merge(app.restore_graph().await.unwrap());
    let mut lib_spec = lib.package_spec().await.unwrap();
    if let Some(metadata) = lib_spec.restore_metadata.as_mut() {
        metadata.project_unique_name = "/src/lib/Lib.csproj".into();
    }
    graph.add_project(lib_spec);

    let closure: Vec<_> = graph
        .get_closure("/src/app/App.csproj")
        .iter()
        .map(|spec| spec.name.clone())
        .collect();
    assert_eq!(closure, vec!["App", "Lib"]);
}

#[tokio::test]
async fn test_package_specs_for_restore() {
    let specs = LegacyProject::new(FakeAdapter::app())
        .package_specs_for_restore()
        .await
        .unwrap();
    assert_eq!(specs.len(), 1);
}

#[tokio::test]
async fn test_installed_packages() {
    let project = LegacyProject::new(FakeAdapter::app());
    let installed = project.installed_packages(&FrameworkPrecedence).await.unwrap();

    let identities: Vec<_> = installed.iter().map(|r| r.identity.to_string()).collect();
    assert_eq!(
        identities,
        vec!["Newtonsoft.Json 9.0.1", "StyleCop.Analyzers 1.0.0-beta.1"]
    );
    assert!(
        installed
            .iter()
            .all(|r| r.target_framework.short_folder_name() == "net45")
    );
}

#[tokio::test]
async fn test_project_reference_names_are_distinct() {
    let names = LegacyProject::new(FakeAdapter::app())
        .project_reference_names()
        .await
        .unwrap();

    assert_eq!(names, vec!["/src/lib/Lib.csproj", "/src/util/Util.csproj"]);
}

#[tokio::test]
async fn test_assets_file_path() {
    let project = LegacyProject::new(FakeAdapter::app());
    assert_eq!(
        project.assets_file_path().await.unwrap(),
        PathBuf::from("/src/app/obj/project.assets.json")
    );

    let project = LegacyProject::new(FakeAdapter {
        intermediate: None,
        ..FakeAdapter::app()
    });
    assert_eq!(
        project.assets_file_path().await.unwrap(),
        PathBuf::from("project.assets.json")
    );
}

#[tokio::test]
async fn test_restore_always_required() {
    assert!(LegacyProject::new(FakeAdapter::app()).is_restore_required());
}

#[tokio::test]
async fn test_install_and_uninstall() {
    let project = LegacyProject::new(FakeAdapter::app());
    let identity = PackageIdentity::new("Foo", Some(PackageVersion::new(2, 1, 0)));

    assert!(project.install_package(&identity).await);
    assert!(project.uninstall_package("Foo").await);
    assert!(
        !project
            .install_package(&PackageIdentity::new("Foo", None))
            .await
    );

    let edits = project.adapter().edits.lock().unwrap().clone();
    assert_eq!(edits, vec!["add Foo 2.1.0", "remove Foo"]);
}

#[tokio::test]
async fn test_install_failure_returns_false() {
    let project = LegacyProject::new(FakeAdapter {
        fail_edits: true,
        ..FakeAdapter::app()
    });
    let identity = PackageIdentity::new("Foo", Some(PackageVersion::new(1, 0, 0)));

    assert!(!project.install_package(&identity).await);
    assert!(!project.uninstall_package("Foo").await);
}
