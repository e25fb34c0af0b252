//! The aggregate restore graph: projects keyed by unique name plus the
//! restore roots.

use crate::reference::ProjectUniqueName;
use crate::spec::PackageSpec;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use tracing::debug;

/// A project reference whose target is not in the graph.
///
/// Partial graphs are normal when a graph is produced out of process, so these
/// are reported as values rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    /// Project declaring the reference.
    pub from: ProjectUniqueName,
    /// Referenced project that is absent.
    pub to: ProjectUniqueName,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' references missing project '{}'", self.from, self.to)
    }
}

/// Projects keyed by [`ProjectUniqueName`] and the ordered set of restore roots.
///
/// Iteration follows insertion order. Equality ignores order, so a graph that
/// is written and read back compares equal to the original.
///
/// The graph has no interior mutability: build it on one thread, then share
/// `&DependencyGraphSpec` freely for concurrent closure queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraphSpec {
    projects: IndexMap<ProjectUniqueName, PackageSpec>,
    restore: IndexSet<ProjectUniqueName>,
}

impl DependencyGraphSpec {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `spec` under its unique name, replacing any existing entry in place.
    pub fn add_project(&mut self, spec: PackageSpec) {
        let key = spec.project_unique_name();
        if let Some((index, _, _)) = self.projects.shift_remove_full(&key) {
            debug!(project = %key, "Replacing project in restore graph");
            self.projects.shift_insert(index, key, spec);
        } else {
            debug!(project = %key, "Adding project to restore graph");
            self.projects.insert(key, spec);
        }
    }

    /// Marks a project as a restore root. Adding an existing root is a no-op.
    pub fn add_restore(&mut self, project_unique_name: impl Into<ProjectUniqueName>) {
        let name = project_unique_name.into();
        if !self.restore.contains(&name) {
            debug!(project = %name, "Adding restore root");
            self.restore.insert(name);
        }
    }

    /// Looks up a project, ignoring case.
    #[must_use]
    pub fn get_project_spec(&self, project_unique_name: &str) -> Option<&PackageSpec> {
        self.projects
            .get(&ProjectUniqueName::new(project_unique_name))
    }

    pub(crate) fn get_by_key(&self, key: &ProjectUniqueName) -> Option<&PackageSpec> {
        self.projects.get(key)
    }

    /// Projects in insertion order.
    pub fn projects(&self) -> impl ExactSizeIterator<Item = &PackageSpec> {
        self.projects.values()
    }

    /// Project keys in insertion order.
    pub fn project_names(&self) -> impl ExactSizeIterator<Item = &ProjectUniqueName> {
        self.projects.keys()
    }

    /// Restore roots in insertion order.
    pub fn restore(&self) -> impl ExactSizeIterator<Item = &ProjectUniqueName> {
        self.restore.iter()
    }

    /// Whether `project_unique_name` is a restore root.
    #[must_use]
    pub fn is_restore_root(&self, project_unique_name: &str) -> bool {
        self.restore
            .contains(&ProjectUniqueName::new(project_unique_name))
    }

    /// Number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the graph has neither projects nor restore roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.restore.is_empty()
    }

    /// Folds `other` into this graph: its projects replace same-named entries
    /// and its restore roots are appended.
    pub fn merge(&mut self, other: Self) {
        for (_, spec) in other.projects {
            self.add_project(spec);
        }
        for name in other.restore {
            self.add_restore(name);
        }
    }

    /// Projects that declare a reference to `project_unique_name`, in
    /// insertion order.
    #[must_use]
    pub fn parents_of(&self, project_unique_name: &str) -> Vec<&PackageSpec> {
        let target = ProjectUniqueName::new(project_unique_name);
        self.projects
            .values()
            .filter(|spec| {
                spec.project_references()
                    .any(|reference| reference.project_unique_name == target)
            })
            .collect()
    }

    /// Every project reference that points outside the graph, once per
    /// (from, to) pair.
    #[must_use]
    pub fn missing_references(&self) -> Vec<MissingReference> {
        let mut missing = Vec::new();
        for (from, spec) in &self.projects {
            for reference in spec.project_references() {
                let to = &reference.project_unique_name;
                if self.projects.contains_key(to) {
                    continue;
                }
                let entry = MissingReference {
                    from: from.clone(),
                    to: to.clone(),
                };
                if !missing.contains(&entry) {
                    missing.push(entry);
                }
            }
        }
        missing
    }
}
