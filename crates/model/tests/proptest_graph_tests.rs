//! Property-based tests for restore graph invariants.
//!
//! These tests verify the behavioral contracts of the graph:
//! - Closures start at the root, contain each project once and match reachability
//! - Closures are transitive
//! - Writing and reading a document yields an equal graph

use dgspec_model::{
    AssetFlags, DependencyGraphSpec, LibraryDependency, LibraryIncludeFlags, PackageSpec,
    ProjectRestoreMetadata, ProjectRestoreReference, TargetFramework, VersionRange,
};
use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

// =============================================================================
// Strategies for generating test data
// =============================================================================

const FRAMEWORKS: [&str; 4] = ["net45", "net462", "netstandard1.3", "netcoreapp2.1"];

/// An edge target: an index into the project list, or a project outside the graph.
#[derive(Clone, Debug)]
enum Target {
    Project(usize),
    Missing(usize),
}

/// Raw graph shape: per project, a list of (framework index, target).
fn graph_shape_strategy() -> impl Strategy<Value = Vec<Vec<(usize, Target)>>> {
    (1_usize..=8).prop_flat_map(|count| {
        let edge = (
            0..FRAMEWORKS.len(),
            prop_oneof![
                4 => (0..count).prop_map(Target::Project),
                1 => (0_usize..3).prop_map(Target::Missing),
            ],
        );
        proptest::collection::vec(proptest::collection::vec(edge, 0..4), count)
    })
}

fn flags_strategy() -> impl Strategy<Value = AssetFlags> {
    let bits = (0_u16..=0xff).prop_map(LibraryIncludeFlags::from_bits_truncate);
    (bits.clone(), bits.clone(), bits).prop_map(|(include, exclude, private)| AssetFlags {
        include_assets: include,
        exclude_assets: exclude,
        private_assets: private,
    })
}

/// How a project's display name relates to its spec name.
#[derive(Clone, Copy, Debug)]
enum NameStyle {
    SameAsSpec,
    Empty,
    Different,
}

fn name_styles_strategy() -> impl Strategy<Value = Vec<NameStyle>> {
    proptest::collection::vec(
        prop_oneof![
            Just(NameStyle::SameAsSpec),
            Just(NameStyle::Empty),
            Just(NameStyle::Different),
        ],
        1..8,
    )
}

fn name(index: usize) -> String {
    format!("/src/P{index}/P{index}.csproj")
}

fn target_name(target: &Target) -> String {
    match target {
        Target::Project(index) => name(*index),
        Target::Missing(index) => format!("/elsewhere/M{index}.csproj"),
    }
}

fn build_graph(
    shape: &[Vec<(usize, Target)>],
    flags: AssetFlags,
    styles: &[NameStyle],
) -> DependencyGraphSpec {
    let mut graph = DependencyGraphSpec::new();
    for (index, edges) in shape.iter().enumerate() {
        let unique_name = name(index);
        let mut metadata = ProjectRestoreMetadata::new(unique_name.clone(), unique_name.clone());
        metadata.project_name = match styles[index % styles.len()] {
            NameStyle::SameAsSpec => format!("P{index}"),
            NameStyle::Empty => String::new(),
            NameStyle::Different => format!("Display {index}"),
        };

        let mut spec = PackageSpec::new(format!("P{index}"));
        for (framework, target) in edges {
            let framework = TargetFramework::parse(FRAMEWORKS[*framework]);
            let target = target_name(target);
            metadata
                .framework_mut(&framework)
                .add_project_reference(
                    ProjectRestoreReference::new(target.clone(), target).with_flags(flags),
                );
            spec.framework_mut(&framework).add_dependency(
                LibraryDependency::new(format!("Pkg{index}"), VersionRange::all())
                    .with_flags(flags),
            );
        }

        graph.add_project(spec.with_restore_metadata(metadata));
        if index % 2 == 0 {
            graph.add_restore(unique_name);
        }
    }
    graph
}

/// Reachable project indices computed independently of the closure walk.
fn reachable(shape: &[Vec<(usize, Target)>], root: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for (_, target) in &shape[current] {
            if let Target::Project(next) = target {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
    }
    seen
}

// =============================================================================
// Closure properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The closure starts at the root and lists each reachable project once.
    #[test]
    fn closure_matches_reachability(shape in graph_shape_strategy()) {
        let graph = build_graph(&shape, AssetFlags::default(), &[NameStyle::SameAsSpec]);

        for root in 0..shape.len() {
            let closure = graph.get_closure(&name(root));
            prop_assert_eq!(&closure[0].name, &format!("P{root}"));

            let names: Vec<_> = closure.iter().map(|spec| spec.name.clone()).collect();
            let unique: HashSet<_> = names.iter().cloned().collect();
            prop_assert_eq!(unique.len(), names.len(), "duplicate in closure {:?}", names);

            let expected: HashSet<_> = reachable(&shape, root)
                .into_iter()
                .map(|index| format!("P{index}"))
                .collect();
            prop_assert_eq!(unique, expected);
        }
    }

    /// Every member's closure is contained in the root's closure.
    #[test]
    fn closure_is_transitive(shape in graph_shape_strategy()) {
        let graph = build_graph(&shape, AssetFlags::default(), &[NameStyle::SameAsSpec]);
        let root: HashSet<_> = graph
            .get_closure(&name(0))
            .iter()
            .map(|spec| spec.name.clone())
            .collect();

        for member in &root {
            let unique_name = format!("/src/{member}/{member}.csproj");
            for spec in graph.get_closure(&unique_name) {
                prop_assert!(root.contains(&spec.name));
            }
        }
    }

    /// Unknown roots always produce an empty closure.
    #[test]
    fn closure_of_unknown_root_is_empty(shape in graph_shape_strategy()) {
        let graph = build_graph(&shape, AssetFlags::default(), &[NameStyle::SameAsSpec]);
        prop_assert!(graph.get_closure("/nowhere/X.csproj").is_empty());
    }
}

// =============================================================================
// Document properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Writing then reading a graph produces an equal graph.
    #[test]
    fn document_round_trip(
        shape in graph_shape_strategy(),
        flags in flags_strategy(),
        styles in name_styles_strategy(),
    ) {
        let graph = build_graph(&shape, flags, &styles);
        let text = graph.to_json_string().unwrap();
        let loaded = DependencyGraphSpec::from_json_str(&text).unwrap();

        prop_assert_eq!(&loaded, &graph);
        prop_assert_eq!(loaded.to_json_string().unwrap(), text);
    }
}
