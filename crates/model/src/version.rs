//! Package versions and version ranges.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A package version with up to four numeric parts and an optional
/// pre-release label. Build metadata (`+...`) is accepted and dropped.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    parts: [u64; 4],
    release: Option<String>,
}

impl PackageVersion {
    /// Creates a stable `major.minor.patch` version.
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            parts: [major, minor, patch, 0],
            release: None,
        }
    }

    /// Parses a version string such as `1.0`, `1.0.0.1` or `2.0.0-beta.1+sha`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] for empty input, more than four
    /// numeric parts, non-numeric parts or an empty pre-release label.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::version(input, "version is empty"));
        }

        let without_metadata = trimmed.split('+').next().unwrap_or(trimmed);
        let (numbers, release) = match without_metadata.split_once('-') {
            Some((numbers, label)) if label.is_empty() => {
                return Err(Error::version(
                    input,
                    format!("empty pre-release label after '{numbers}-'"),
                ));
            }
            Some((numbers, label)) => (numbers, Some(label.to_string())),
            None => (without_metadata, None),
        };

        let mut parts = [0_u64; 4];
        let mut count = 0;
        for segment in numbers.split('.') {
            if count == parts.len() {
                return Err(Error::version(input, "more than four numeric parts"));
            }
            parts[count] = segment
                .parse()
                .map_err(|_| Error::version(input, format!("'{segment}' is not a number")))?;
            count += 1;
        }

        Ok(Self { parts, release })
    }

    /// Major version.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.parts[0]
    }

    /// Minor version.
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.parts[1]
    }

    /// Patch version.
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.parts[2]
    }

    /// Fourth (revision) part, zero when absent.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.parts[3]
    }

    /// Pre-release label, if any.
    #[must_use]
    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    /// Whether this is a pre-release version.
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.release.is_some()
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| match (&self.release, &other.release) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_labels(a, b),
            })
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

/// One pre-release label segment, normalized the way `compare_labels` sees it.
#[derive(Hash)]
enum LabelSegment {
    Numeric(u64),
    Text(String),
}

impl LabelSegment {
    fn new(segment: &str) -> Self {
        segment
            .parse()
            .map_or_else(|_| Self::Text(segment.to_ascii_lowercase()), Self::Numeric)
    }
}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
        self.release
            .as_deref()
            .map(|release| release.split('.').map(LabelSegment::new).collect::<Vec<_>>())
            .hash(state);
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, revision] = self.parts;
        write!(f, "{major}.{minor}.{patch}")?;
        if revision > 0 {
            write!(f, ".{revision}")?;
        }
        if let Some(release) = &self.release {
            write!(f, "-{release}")?;
        }
        Ok(())
    }
}

impl FromStr for PackageVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of acceptable package versions.
///
/// A bare version (`1.0.0`) means "at least this version", which is the
/// default for package references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VersionRange {
    min: Option<PackageVersion>,
    include_min: bool,
    max: Option<PackageVersion>,
    include_max: bool,
}

impl VersionRange {
    /// The unbounded range.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// `[version, )`
    #[must_use]
    pub fn at_least(version: PackageVersion) -> Self {
        Self {
            min: Some(version),
            include_min: true,
            max: None,
            include_max: false,
        }
    }

    /// `[version]`
    #[must_use]
    pub fn exactly(version: PackageVersion) -> Self {
        Self {
            min: Some(version.clone()),
            include_min: true,
            max: Some(version),
            include_max: true,
        }
    }

    /// Creates a range from explicit bounds. An inclusive flag on a missing
    /// bound is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] when the lower bound is above the
    /// upper bound.
    pub fn new(
        min: Option<PackageVersion>,
        include_min: bool,
        max: Option<PackageVersion>,
        include_max: bool,
    ) -> Result<Self> {
        let range = Self::from_bounds(min, include_min, max, include_max);
        if range.is_inverted() {
            return Err(Error::version(
                range.to_string(),
                "lower bound exceeds upper bound",
            ));
        }
        Ok(range)
    }

    fn from_bounds(
        min: Option<PackageVersion>,
        include_min: bool,
        max: Option<PackageVersion>,
        include_max: bool,
    ) -> Self {
        Self {
            include_min: include_min && min.is_some(),
            min,
            include_max: include_max && max.is_some(),
            max,
        }
    }

    fn is_inverted(&self) -> bool {
        matches!((&self.min, &self.max), (Some(min), Some(max)) if min > max)
    }

    /// Parses `1.0.0`, `[1.0.0]`, `[1.0, 2.0)`, `(, 2.0]` and similar.
    /// Empty input is the unbounded range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] for unbalanced brackets, an
    /// invalid bound, or a lower bound above the upper bound.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::all());
        }

        let first = trimmed.chars().next().unwrap_or_default();
        if first != '[' && first != '(' {
            return Ok(Self::at_least(PackageVersion::parse(trimmed)?));
        }

        let last = trimmed.chars().last().unwrap_or_default();
        if trimmed.len() < 2 || (last != ']' && last != ')') {
            return Err(Error::version(input, "unterminated range"));
        }
        let include_min = first == '[';
        let include_max = last == ']';
        let body = &trimmed[1..trimmed.len() - 1];

        let Some((low, high)) = body.split_once(',') else {
            if !(include_min && include_max) {
                return Err(Error::version(input, "exact versions must use '[x]'"));
            }
            return Ok(Self::exactly(PackageVersion::parse(body)?));
        };

        let bound = |text: &str| -> Result<Option<PackageVersion>> {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                PackageVersion::parse(text).map(Some)
            }
        };
        let range = Self::from_bounds(bound(low)?, include_min, bound(high)?, include_max);
        if range.is_inverted() {
            return Err(Error::version(input, "lower bound exceeds upper bound"));
        }
        Ok(range)
    }

    /// Lower bound.
    #[must_use]
    pub fn min_version(&self) -> Option<&PackageVersion> {
        self.min.as_ref()
    }

    /// Upper bound.
    #[must_use]
    pub fn max_version(&self) -> Option<&PackageVersion> {
        self.max.as_ref()
    }

    /// Whether `version` lies within the range.
    #[must_use]
    pub fn satisfies(&self, version: &PackageVersion) -> bool {
        let above_min = self.min.as_ref().is_none_or(|min| {
            if self.include_min {
                version >= min
            } else {
                version > min
            }
        });
        let below_max = self.max.as_ref().is_none_or(|max| {
            if self.include_max {
                version <= max
            } else {
                version < max
            }
        });
        above_min && below_max
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if self.include_min && self.include_max && min == max {
                return write!(f, "[{min}]");
            }
        }

        f.write_str(if self.include_min { "[" } else { "(" })?;
        if let Some(min) = &self.min {
            write!(f, "{min}")?;
        }
        f.write_str(", ")?;
        if let Some(max) = &self.max {
            write!(f, "{max}")?;
        }
        f.write_str(if self.include_max { "]" } else { ")" })
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
