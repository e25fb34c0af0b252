//! Target frameworks and the ordering used to pick canonical references.
//!
//! Frameworks are written in their short folder form (`net45`,
//! `netstandard1.3`, `net6.0-windows`). Parsing is total: names that are not
//! recognized keep their alphabetic prefix as the identifier, so every input
//! still has a stable position under [`FrameworkPrecedence`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maps short folder prefixes to framework identifiers, longest prefix first.
const KNOWN_PREFIXES: [(&str, &str); 16] = [
    ("netstandardapp", ".NETStandardApp"),
    ("netstandard", ".NETStandard"),
    ("netcoreapp", ".NETCoreApp"),
    ("xamarinios", "Xamarin.iOS"),
    ("monoandroid", "MonoAndroid"),
    ("portable", ".NETPortable"),
    ("netcore", ".NETCore"),
    ("dotnet", ".NETPlatform"),
    ("native", "native"),
    ("netmf", ".NETMicroFramework"),
    ("tizen", "Tizen"),
    ("net", ".NETFramework"),
    ("uap", "UAP"),
    ("wpa", "WindowsPhoneApp"),
    ("win", "Windows"),
    ("wp", "WindowsPhone"),
];

/// Framework version as up to four numeric components.
pub type FrameworkVersion = [u32; 4];

/// A parsed target framework.
#[derive(Debug, Clone)]
pub struct TargetFramework {
    identifier: String,
    version: FrameworkVersion,
    profile: String,
    short_folder_name: String,
}

impl TargetFramework {
    /// Parses a short folder name such as `net45` or `netstandard1.3`.
    #[must_use]
    pub fn parse(short_folder_name: &str) -> Self {
        let normalized = short_folder_name.trim().to_ascii_lowercase();

        let (head, profile) = match normalized.split_once('-') {
            Some((head, profile)) => (head, profile.to_string()),
            None => (normalized.as_str(), String::new()),
        };

        let alpha_len = head
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(head.len());
        let prefix = &head[..alpha_len];
        let digits = &head[alpha_len..];

        let mut identifier = KNOWN_PREFIXES
            .iter()
            .find(|(short, _)| *short == prefix)
            .map_or_else(|| prefix.to_string(), |(_, full)| (*full).to_string());

        let version = parse_framework_version(digits);

        // net5.0 and later are .NET (Core) rather than .NET Framework.
        if prefix == "net" && digits.contains('.') && version[0] >= 5 {
            identifier = ".NETCoreApp".to_string();
        }

        Self {
            identifier,
            version,
            profile,
            short_folder_name: normalized,
        }
    }

    /// Full framework identifier, e.g. `.NETFramework`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Framework version.
    #[must_use]
    pub fn version(&self) -> FrameworkVersion {
        self.version
    }

    /// Profile or platform suffix (text after the first `-`), possibly empty.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Normalized short folder name, used as the document key.
    #[must_use]
    pub fn short_folder_name(&self) -> &str {
        &self.short_folder_name
    }
}

/// Dotted versions parse per component; undotted digits are one digit per
/// component (`45` is 4.5, `462` is 4.6.2).
fn parse_framework_version(digits: &str) -> FrameworkVersion {
    let mut version = [0_u32; 4];
    if digits.is_empty() {
        return version;
    }

    if digits.contains('.') {
        for (slot, part) in version.iter_mut().zip(digits.split('.')) {
            *slot = part.parse().unwrap_or(0);
        }
    } else {
        for (slot, c) in version.iter_mut().zip(digits.chars()) {
            *slot = c.to_digit(10).unwrap_or(0);
        }
    }
    version
}

/// Frameworks are equal when their normalized short folder names match, so
/// equal frameworks always share a document key. Aliases such as `net5.0` and
/// `netcoreapp5.0` stay distinct; [`FrameworkPrecedence`] ranks them as equal.
impl PartialEq for TargetFramework {
    fn eq(&self, other: &Self) -> bool {
        self.short_folder_name == other.short_folder_name
    }
}

impl Eq for TargetFramework {}

impl Hash for TargetFramework {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.short_folder_name.hash(state);
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_folder_name)
    }
}

/// A total order over target frameworks.
///
/// Used by the cross-framework merge to choose which framework's reference is
/// canonical (the lowest wins). Callers may plug in their own order; any
/// `Fn(&TargetFramework, &TargetFramework) -> Ordering` implements this trait.
pub trait FrameworkOrder: Send + Sync {
    /// Compares two frameworks.
    fn compare(&self, a: &TargetFramework, b: &TargetFramework) -> Ordering;
}

impl<F> FrameworkOrder for F
where
    F: Fn(&TargetFramework, &TargetFramework) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &TargetFramework, b: &TargetFramework) -> Ordering {
        self(a, b)
    }
}

/// Default framework order: identifier (ordinal, ignoring case), then
/// version, then profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameworkPrecedence;

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_uppercase())
        .cmp(b.bytes().map(|b| b.to_ascii_uppercase()))
}

impl FrameworkOrder for FrameworkPrecedence {
    fn compare(&self, a: &TargetFramework, b: &TargetFramework) -> Ordering {
        cmp_ignore_case(&a.identifier, &b.identifier)
            .then_with(|| a.version.cmp(&b.version))
            .then_with(|| cmp_ignore_case(&a.profile, &b.profile))
    }
}
