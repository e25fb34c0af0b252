//! Asset inclusion flags carried by project and package references.
//!
//! Every reference carries three [`LibraryIncludeFlags`] values:
//!
//! - `include_assets` (default [`LibraryIncludeFlags::ALL`])
//! - `exclude_assets` (default [`LibraryIncludeFlags::NONE`])
//! - `private_assets` (default [`LibraryIncludeFlags::DEFAULT_SUPPRESS_PARENT`])
//!
//! The assets a consumer actually sees are `include & !exclude`; private assets
//! additionally stop flowing to consumers of the referencing project.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Asset kinds that can be selectively consumed from a dependency.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LibraryIncludeFlags: u16 {
        /// Runtime assemblies.
        const RUNTIME              = 0b0000_0001;
        /// Compile-time reference assemblies.
        const COMPILE              = 0b0000_0010;
        /// Build props and targets.
        const BUILD                = 0b0000_0100;
        /// Native binaries.
        const NATIVE               = 0b0000_1000;
        /// Content files.
        const CONTENT_FILES        = 0b0001_0000;
        /// Roslyn analyzers.
        const ANALYZERS            = 0b0010_0000;
        /// Build logic that flows transitively.
        const BUILD_TRANSITIVE     = 0b0100_0000;
        /// Build logic for multi-targeting outer builds.
        const BUILD_MULTITARGETING = 0b1000_0000;
    }
}

/// Token names in display order. Matching is case-insensitive.
const ASSET_TOKENS: [(&str, LibraryIncludeFlags); 8] = [
    ("Runtime", LibraryIncludeFlags::RUNTIME),
    ("Compile", LibraryIncludeFlags::COMPILE),
    ("Build", LibraryIncludeFlags::BUILD),
    ("Native", LibraryIncludeFlags::NATIVE),
    ("ContentFiles", LibraryIncludeFlags::CONTENT_FILES),
    ("Analyzers", LibraryIncludeFlags::ANALYZERS),
    ("BuildTransitive", LibraryIncludeFlags::BUILD_TRANSITIVE),
    ("BuildMultitargeting", LibraryIncludeFlags::BUILD_MULTITARGETING),
];

impl LibraryIncludeFlags {
    /// No assets.
    pub const NONE: Self = Self::empty();

    /// Every asset kind.
    pub const ALL: Self = Self::all();

    /// Assets suppressed from flowing to parents unless configured otherwise.
    pub const DEFAULT_SUPPRESS_PARENT: Self = Self::BUILD
        .union(Self::CONTENT_FILES)
        .union(Self::ANALYZERS);

    /// Parses a comma or semicolon separated token list.
    ///
    /// Tokens are case-insensitive asset names or the literals `All`/`None`.
    /// Unknown tokens are ignored. Returns `None` when the input contains no
    /// recognized token, so callers can fall back to their default.
    #[must_use]
    pub fn parse_tokens(input: &str) -> Option<Self> {
        let mut flags = Self::NONE;
        let mut recognized = false;

        for token in input
            .split([',', ';'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            if token.eq_ignore_ascii_case("all") {
                flags |= Self::ALL;
                recognized = true;
            } else if token.eq_ignore_ascii_case("none") {
                recognized = true;
            } else if let Some((_, flag)) = ASSET_TOKENS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(token))
            {
                flags |= *flag;
                recognized = true;
            } else {
                tracing::trace!(token, "Ignoring unknown asset token");
            }
        }

        recognized.then_some(flags)
    }
}

impl fmt::Display for LibraryIncludeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return f.write_str("All");
        }
        if self.is_empty() {
            return f.write_str("None");
        }

        let names: Vec<&str> = ASSET_TOKENS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(", "))
    }
}

/// The three asset flag sets attached to a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetFlags {
    /// Assets consumed from the dependency.
    pub include_assets: LibraryIncludeFlags,
    /// Assets removed from `include_assets`.
    pub exclude_assets: LibraryIncludeFlags,
    /// Assets that do not flow to consumers of the referencing project.
    pub private_assets: LibraryIncludeFlags,
}

impl Default for AssetFlags {
    fn default() -> Self {
        Self {
            include_assets: LibraryIncludeFlags::ALL,
            exclude_assets: LibraryIncludeFlags::NONE,
            private_assets: LibraryIncludeFlags::DEFAULT_SUPPRESS_PARENT,
        }
    }
}

impl AssetFlags {
    /// Builds flags from free-form token lists, falling back to defaults for
    /// unset, empty or unrecognized input.
    #[must_use]
    pub fn from_tokens(include: &str, exclude: &str, private: &str) -> Self {
        let defaults = Self::default();
        Self {
            include_assets: LibraryIncludeFlags::parse_tokens(include)
                .unwrap_or(defaults.include_assets),
            exclude_assets: LibraryIncludeFlags::parse_tokens(exclude)
                .unwrap_or(defaults.exclude_assets),
            private_assets: LibraryIncludeFlags::parse_tokens(private)
                .unwrap_or(defaults.private_assets),
        }
    }

    /// Asset kinds visible to the referencing project.
    #[must_use]
    pub fn effective(&self) -> LibraryIncludeFlags {
        self.include_assets & !self.exclude_assets
    }

    /// Asset kinds that continue to flow to consumers of the referencing project.
    #[must_use]
    pub fn flowing(&self) -> LibraryIncludeFlags {
        self.effective() & !self.private_assets
    }
}

/// Implemented by reference types that carry [`AssetFlags`].
pub trait HasAssetFlags {
    /// Mutable access to the reference's flags.
    fn asset_flags_mut(&mut self) -> &mut AssetFlags;
}

/// Applies include/exclude/private asset token lists to a reference.
///
/// Each input is a comma or semicolon separated list of asset names, or the
/// literal `All`/`None`. Empty input leaves the corresponding default in place;
/// unknown tokens are ignored. This never fails.
pub fn apply_include_flags<R: HasAssetFlags + ?Sized>(
    reference: &mut R,
    include_assets: &str,
    exclude_assets: &str,
    private_assets: &str,
) {
    *reference.asset_flags_mut() =
        AssetFlags::from_tokens(include_assets, exclude_assets, private_assets);
}
