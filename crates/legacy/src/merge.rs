//! Cross-framework package reference selection.
//!
//! A project evaluated once per target framework can list the same package
//! several times. Callers that need one list (installed-package views) get a
//! single reference per package id: the one declared under the framework that
//! sorts lowest in the supplied [`FrameworkOrder`]. Per-framework detail stays
//! in the `PackageSpec` itself.

use dgspec_model::{FrameworkOrder, PackageReference, PackageSpec};
use std::cmp::Ordering;

/// One reference per package id (ignoring case), in order of first appearance.
///
/// Within a group the reference whose framework is lowest under `order` wins;
/// frameworks that compare equal keep the first one seen.
#[must_use]
pub fn select_package_references(
    spec: &PackageSpec,
    order: &dyn FrameworkOrder,
) -> Vec<PackageReference> {
    let mut selected: Vec<PackageReference> = Vec::new();

    for information in &spec.target_frameworks {
        for dependency in &information.dependencies {
            let candidate = PackageReference::from_dependency(dependency, &information.framework);
            match selected
                .iter_mut()
                .find(|existing| existing.identity.id.eq_ignore_ascii_case(&dependency.name))
            {
                Some(existing) => {
                    if order.compare(&candidate.target_framework, &existing.target_framework)
                        == Ordering::Less
                    {
                        *existing = candidate;
                    }
                }
                None => selected.push(candidate),
            }
        }
    }

    selected
}
