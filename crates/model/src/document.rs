//! Reading and writing the persisted restore graph document.
//!
//! The document is JSON:
//!
//! ```json
//! {
//!   "restore": { "<unique name>": {} },
//!   "projects": {
//!     "<unique name>": {
//!       "name": "<only when it differs from projectName or the key>",
//!       "version": "1.0.0",
//!       "restore": { "projectUniqueName": "...", "frameworks": { "net45": { "projectReferences": {} } } },
//!       "frameworks": { "net45": { "dependencies": { "Foo": { "version": "[1.0.0, )" } } } }
//!     }
//!   }
//! }
//! ```
//!
//! Object key order is preserved in both directions. Structural problems are
//! reported as [`Error::DocumentParse`] with a JSON pointer to the bad node.

use crate::error::{Error, Result};
use crate::flags::{AssetFlags, LibraryIncludeFlags};
use crate::framework::TargetFramework;
use crate::graph::DependencyGraphSpec;
use crate::metadata::{
    PackageSource, ProjectRestoreMetadata, ProjectRestoreMetadataFrameworkInfo, RestoreOutputType,
    TargetFrameworkInformation,
};
use crate::reference::{LibraryDependency, ProjectRestoreReference};
use crate::spec::PackageSpec;
use crate::version::{PackageVersion, VersionRange};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

type Object = Map<String, Value>;

impl DependencyGraphSpec {
    /// Parses a document from JSON text. Blank input is an empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for invalid JSON and [`Error::DocumentParse`]
    /// for a structurally invalid document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Builds a graph from an already parsed document. `null` is an empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentParse`] naming the first invalid node.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut graph = Self::new();
        if value.is_null() {
            return Ok(graph);
        }
        let root = as_object(value, "")?;

        if let Some(projects) = optional_object(root, "projects", "")? {
            for (key, project) in projects {
                let path = pointer("/projects", key);
                graph.add_project(read_package_spec(key, project, &path)?);
            }
        }

        if let Some(restore) = optional_object(root, "restore", "")? {
            for key in restore.keys() {
                graph.add_restore(key.as_str());
            }
        }

        debug!(
            projects = graph.len(),
            restore = graph.restore().len(),
            "Loaded restore graph"
        );
        Ok(graph)
    }

    /// Reads a document from disk. A missing file is an empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read, otherwise
    /// the errors of [`Self::from_json_str`] with the file path attached.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No restore graph file, using empty graph");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            source,
            path: Some(path.to_path_buf()),
            operation: "reading restore graph".to_string(),
        })?;

        Self::from_json_str(&content).map_err(|error| match error {
            Error::Json { source, .. } => Error::Json {
                source,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })
    }

    /// Converts the graph to its document form. Key order follows insertion
    /// order.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let restore: Object = self
            .restore()
            .map(|name| (name.to_string(), Value::Object(Object::new())))
            .collect();

        let projects: Object = self
            .project_names()
            .zip(self.projects())
            .map(|(name, spec)| (name.to_string(), write_package_spec(name.as_str(), spec)))
            .collect();

        let mut root = Object::new();
        root.insert("restore".to_string(), Value::Object(restore));
        root.insert("projects".to_string(), Value::Object(projects));
        Value::Object(root)
    }

    /// Pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Writes the document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_json_string()?;
        fs::write(path, content).map_err(|source| Error::Io {
            source,
            path: Some(path.to_path_buf()),
            operation: "writing restore graph".to_string(),
        })?;
        debug!(path = %path.display(), projects = self.len(), "Saved restore graph");
        Ok(())
    }
}

/// Appends `key` to a JSON pointer, escaping `~` and `/`.
fn pointer(base: &str, key: &str) -> String {
    format!("{base}/{}", key.replace('~', "~0").replace('/', "~1"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object> {
    value.as_object().ok_or_else(|| {
        Error::document(
            display_path(path),
            format!("expected an object, found {}", type_name(value)),
        )
    })
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

/// An object-valued property; `null` or absence yields `None`.
fn optional_object<'a>(parent: &'a Object, key: &str, path: &str) -> Result<Option<&'a Object>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_object(value, &pointer(path, key)).map(Some),
    }
}

/// A string-valued property; `null` or absence yields `None`.
fn optional_string<'a>(parent: &'a Object, key: &str, path: &str) -> Result<Option<&'a str>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(Error::document(
            pointer(path, key),
            format!("expected a string, found {}", type_name(other)),
        )),
    }
}

fn string_array(parent: &Object, key: &str, path: &str) -> Result<Vec<String>> {
    let Some(value) = parent.get(key).filter(|v| !v.is_null()) else {
        return Ok(Vec::new());
    };
    let path = pointer(path, key);
    let items = value.as_array().ok_or_else(|| {
        Error::document(
            path.clone(),
            format!("expected an array, found {}", type_name(value)),
        )
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                Error::document(
                    format!("{path}/{index}"),
                    format!("expected a string, found {}", type_name(item)),
                )
            })
        })
        .collect()
}

fn read_flags(
    object: &Object,
    path: &str,
    include_key: &str,
    exclude_key: &str,
    private_key: &str,
) -> Result<AssetFlags> {
    Ok(AssetFlags::from_tokens(
        optional_string(object, include_key, path)?.unwrap_or_default(),
        optional_string(object, exclude_key, path)?.unwrap_or_default(),
        optional_string(object, private_key, path)?.unwrap_or_default(),
    ))
}

fn read_package_spec(key: &str, value: &Value, path: &str) -> Result<PackageSpec> {
    let object = as_object(value, path)?;

    let restore_metadata = match optional_object(object, "restore", path)? {
        Some(restore) => Some(read_restore_metadata(
            key,
            restore,
            &pointer(path, "restore"),
        )?),
        None => None,
    };

    let name = match optional_string(object, "name", path)? {
        Some(name) => name,
        None => implied_name(key, restore_metadata.as_ref()),
    };
    let mut spec = PackageSpec::new(name);
    spec.restore_metadata = restore_metadata;

    if let Some(version) = optional_string(object, "version", path)? {
        spec.version = PackageVersion::parse(version)
            .map_err(|error| Error::document(pointer(path, "version"), error.to_string()))?;
    }

    if let Some(frameworks) = optional_object(object, "frameworks", path)? {
        let frameworks_path = pointer(path, "frameworks");
        for (short_name, framework) in frameworks {
            let framework_path = pointer(&frameworks_path, short_name);
            spec.target_frameworks.push(read_framework_information(
                short_name,
                framework,
                &framework_path,
            )?);
        }
    }

    Ok(spec)
}

/// Name a project gets when its document omits `name`.
fn implied_name<'a>(key: &'a str, metadata: Option<&'a ProjectRestoreMetadata>) -> &'a str {
    metadata
        .map(|metadata| metadata.project_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(key)
}

fn read_framework_information(
    short_name: &str,
    value: &Value,
    path: &str,
) -> Result<TargetFrameworkInformation> {
    let object = as_object(value, path)?;
    let mut information = TargetFrameworkInformation::new(TargetFramework::parse(short_name));

    if let Some(dependencies) = optional_object(object, "dependencies", path)? {
        let dependencies_path = pointer(path, "dependencies");
        for (id, dependency) in dependencies {
            let dependency_path = pointer(&dependencies_path, id);
            if information.dependency(id).is_some() {
                return Err(Error::document(
                    dependency_path,
                    format!("duplicate dependency '{id}' for framework '{short_name}'"),
                ));
            }
            information
                .dependencies
                .push(read_dependency(id, dependency, &dependency_path)?);
        }
    }

    Ok(information)
}

fn read_dependency(id: &str, value: &Value, path: &str) -> Result<LibraryDependency> {
    let parse_range = |text: &str, at: String| {
        VersionRange::parse(text).map_err(|error| Error::document(at, error.to_string()))
    };

    match value {
        Value::String(range) => Ok(LibraryDependency::new(
            id,
            parse_range(range.as_str(), path.to_string())?,
        )),
        Value::Object(object) => {
            let range = match optional_string(object, "version", path)? {
                Some(range) => parse_range(range, pointer(path, "version"))?,
                None => VersionRange::all(),
            };
            let flags = read_flags(object, path, "include", "exclude", "suppressParent")?;
            Ok(LibraryDependency::new(id, range).with_flags(flags))
        }
        other => Err(Error::document(
            path,
            format!("expected a version string or an object, found {}", type_name(other)),
        )),
    }
}

fn read_restore_metadata(key: &str, object: &Object, path: &str) -> Result<ProjectRestoreMetadata> {
    let unique_name = optional_string(object, "projectUniqueName", path)?.unwrap_or(key);
    let project_path = optional_string(object, "projectPath", path)?.unwrap_or_default();
    let mut metadata = ProjectRestoreMetadata::new(unique_name, project_path);

    metadata.project_name = optional_string(object, "projectName", path)?
        .unwrap_or_default()
        .to_string();
    metadata.project_json_path =
        optional_string(object, "projectJsonPath", path)?.map(str::to_string);
    metadata.packages_path = optional_string(object, "packagesPath", path)?.map(str::to_string);

    if let Some(output_type) = optional_string(object, "outputType", path)? {
        metadata.output_type = RestoreOutputType::parse(output_type).ok_or_else(|| {
            Error::document(
                pointer(path, "outputType"),
                format!("unknown output type '{output_type}'"),
            )
        })?;
    }

    if let Some(sources) = optional_object(object, "sources", path)? {
        metadata.sources = sources.keys().map(PackageSource::new).collect();
    }
    metadata.fallback_folders = string_array(object, "fallbackFolders", path)?;
    metadata.original_target_frameworks = string_array(object, "originalTargetFrameworks", path)?;

    if let Some(frameworks) = optional_object(object, "frameworks", path)? {
        let frameworks_path = pointer(path, "frameworks");
        for (short_name, framework) in frameworks {
            let framework_path = pointer(&frameworks_path, short_name);
            let framework_object = as_object(framework, &framework_path)?;
            let mut info =
                ProjectRestoreMetadataFrameworkInfo::new(TargetFramework::parse(short_name));

            if let Some(references) =
                optional_object(framework_object, "projectReferences", &framework_path)?
            {
                let references_path = pointer(&framework_path, "projectReferences");
                for (name, reference) in references {
                    let reference_path = pointer(&references_path, name);
                    let reference_object = as_object(reference, &reference_path)?;
                    let project_path =
                        optional_string(reference_object, "projectPath", &reference_path)?
                            .unwrap_or_default();
                    let flags = read_flags(
                        reference_object,
                        &reference_path,
                        "includeAssets",
                        "excludeAssets",
                        "privateAssets",
                    )?;
                    info.add_project_reference(
                        ProjectRestoreReference::new(name.as_str(), project_path).with_flags(flags),
                    );
                }
            }

            metadata.target_frameworks.push(info);
        }
    }

    Ok(metadata)
}

/// Writes the three flag properties, omitting any equal to its default.
fn write_flags(object: &mut Object, flags: &AssetFlags, keys: [&str; 3]) {
    let defaults = AssetFlags::default();
    let entries: [(&str, LibraryIncludeFlags, LibraryIncludeFlags); 3] = [
        (keys[0], flags.include_assets, defaults.include_assets),
        (keys[1], flags.exclude_assets, defaults.exclude_assets),
        (keys[2], flags.private_assets, defaults.private_assets),
    ];
    for (key, value, default) in entries {
        if value != default {
            object.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}

fn write_package_spec(key: &str, spec: &PackageSpec) -> Value {
    let mut object = Object::new();
    if spec.name != implied_name(key, spec.restore_metadata.as_ref()) {
        object.insert("name".to_string(), Value::String(spec.name.clone()));
    }
    object.insert("version".to_string(), Value::String(spec.version.to_string()));

    if let Some(metadata) = &spec.restore_metadata {
        object.insert("restore".to_string(), write_restore_metadata(metadata));
    }

    let frameworks: Object = spec
        .target_frameworks
        .iter()
        .map(|information| {
            let dependencies: Object = information
                .dependencies
                .iter()
                .map(|dependency| {
                    let mut entry = Object::new();
                    entry.insert(
                        "version".to_string(),
                        Value::String(dependency.version_range.to_string()),
                    );
                    write_flags(
                        &mut entry,
                        &dependency.flags,
                        ["include", "exclude", "suppressParent"],
                    );
                    (dependency.name.clone(), Value::Object(entry))
                })
                .collect();

            let mut framework = Object::new();
            framework.insert("dependencies".to_string(), Value::Object(dependencies));
            (
                information.framework.short_folder_name().to_string(),
                Value::Object(framework),
            )
        })
        .collect();
    object.insert("frameworks".to_string(), Value::Object(frameworks));

    Value::Object(object)
}

fn write_restore_metadata(metadata: &ProjectRestoreMetadata) -> Value {
    let mut object = Object::new();
    let mut put = |key: &str, value: Value| {
        object.insert(key.to_string(), value);
    };

    put(
        "projectUniqueName",
        Value::String(metadata.project_unique_name.to_string()),
    );
    if !metadata.project_name.is_empty() {
        put("projectName", Value::String(metadata.project_name.clone()));
    }
    put("projectPath", Value::String(metadata.project_path.clone()));
    if let Some(project_json_path) = &metadata.project_json_path {
        put("projectJsonPath", Value::String(project_json_path.clone()));
    }
    put(
        "outputType",
        Value::String(metadata.output_type.as_str().to_string()),
    );
    if let Some(packages_path) = &metadata.packages_path {
        put("packagesPath", Value::String(packages_path.clone()));
    }

    let sources: Object = metadata
        .sources
        .iter()
        .map(|source| (source.source.clone(), Value::Object(Object::new())))
        .collect();
    put("sources", Value::Object(sources));
    put(
        "fallbackFolders",
        Value::Array(
            metadata
                .fallback_folders
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        ),
    );

    let frameworks: Object = metadata
        .target_frameworks
        .iter()
        .map(|info| {
            let references: Object = info
                .project_references
                .iter()
                .map(|reference| {
                    let mut entry = Object::new();
                    entry.insert(
                        "projectPath".to_string(),
                        Value::String(reference.project_path.clone()),
                    );
                    write_flags(
                        &mut entry,
                        &reference.flags,
                        ["includeAssets", "excludeAssets", "privateAssets"],
                    );
                    (reference.project_unique_name.to_string(), Value::Object(entry))
                })
                .collect();

            let mut framework = Object::new();
            framework.insert("projectReferences".to_string(), Value::Object(references));
            (
                info.framework.short_folder_name().to_string(),
                Value::Object(framework),
            )
        })
        .collect();
    put("frameworks", Value::Object(frameworks));
    put(
        "originalTargetFrameworks",
        Value::Array(
            metadata
                .original_target_frameworks
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        ),
    );

    Value::Object(object)
}
