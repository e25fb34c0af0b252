//! Project closure: every project reachable from a root via project references.

use crate::graph::DependencyGraphSpec;
use crate::reference::ProjectUniqueName;
use crate::spec::PackageSpec;
use std::collections::HashSet;
use tracing::debug;

impl DependencyGraphSpec {
    /// Returns `project_unique_name` followed by every project reachable from it,
    /// in depth-first pre-order.
    ///
    /// Edges from all target frameworks are followed in declaration order.
    /// Each project appears once, cycles terminate, and references to projects
    /// not in the graph are skipped. An unknown root yields an empty closure.
    #[must_use]
    pub fn get_closure(&self, project_unique_name: &str) -> Vec<&PackageSpec> {
        let root = ProjectUniqueName::new(project_unique_name);
        let mut closure = Vec::new();
        let mut visited: HashSet<&ProjectUniqueName> = HashSet::new();
        let mut stack: Vec<(&ProjectUniqueName, Option<&ProjectUniqueName>)> =
            vec![(&root, None)];

        while let Some((name, parent)) = stack.pop() {
            if visited.contains(name) {
                continue;
            }
            let Some(spec) = self.get_by_key(name) else {
                if let Some(parent) = parent {
                    debug!(from = %parent, to = %name, "Skipping reference to project outside the graph");
                }
                continue;
            };
            visited.insert(name);
            closure.push(spec);

            // Reverse so the first declared reference is visited next.
            let children: Vec<_> = spec
                .project_references()
                .map(|reference| (&reference.project_unique_name, Some(name)))
                .collect();
            stack.extend(children.into_iter().rev());
        }

        debug!(root = %root, size = closure.len(), "Computed project closure");
        closure
    }

    /// Builds a graph holding the closure of `project_unique_name` with that
    /// project as the only restore root. Unknown roots give an empty graph.
    #[must_use]
    pub fn with_project_closure(&self, project_unique_name: &str) -> Self {
        let mut graph = Self::new();
        let closure = self.get_closure(project_unique_name);
        let Some(root) = closure.first() else {
            return graph;
        };
        graph.add_restore(root.project_unique_name());
        for spec in closure {
            graph.add_project(spec.clone());
        }
        graph
    }
}
