use crate::error::{Result, SinceError};
use std::fmt;

/// Semantic version of a release, remembering whether its tag carried a `v`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub v_prefix: bool,
}

impl Version {
    /// Create a new version without a `v` prefix
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            v_prefix: false,
        }
    }

    pub fn with_v_prefix(mut self, v_prefix: bool) -> Self {
        self.v_prefix = v_prefix;
        self
    }

    /// Parse a strict `X.Y.Z` version from a tag (e.g., "v1.2.3" -> 1.2.3 with prefix)
    pub fn parse(tag: &str) -> Result<Self> {
        let (number, v_prefix) = split_prefix(tag);

        let parts: Vec<&str> = number.split('.').collect();
        if parts.len() != 3 {
            return Err(SinceError::invalid_version(format!(
                "'{}' is not of the form X.Y.Z",
                tag
            )));
        }

        let component = |name: &str, value: &str| {
            value.parse::<u32>().map_err(|_| {
                SinceError::invalid_version(format!(
                    "'{}' has a non-numeric {} part '{}'",
                    tag, name, value
                ))
            })
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
            v_prefix,
        })
    }

    /// Parse a version without ever failing.
    ///
    /// Missing or non-numeric components read as `0` and anything past the
    /// third component is dropped.
    pub fn parse_lenient(tag: &str) -> Self {
        let (number, v_prefix) = split_prefix(tag);
        let mut parts = number.split('.').map(|p| p.trim().parse::<u32>().unwrap_or(0));

        Version {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
            v_prefix,
        }
    }

    /// Apply a bump, or `None` when no component changes
    pub fn bump(&self, component: ChangeComponent) -> Option<Self> {
        let bumped = match component {
            ChangeComponent::Major => Version {
                major: self.major.saturating_add(1),
                minor: 0,
                patch: 0,
                v_prefix: self.v_prefix,
            },
            ChangeComponent::Minor => Version {
                minor: self.minor.saturating_add(1),
                patch: 0,
                ..*self
            },
            ChangeComponent::Patch => Version {
                patch: self.patch.saturating_add(1),
                ..*self
            },
            ChangeComponent::None => return None,
        };
        Some(bumped)
    }

    /// The dotted triple without any prefix
    pub fn number(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.v_prefix {
            write!(f, "v")?;
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn split_prefix(tag: &str) -> (&str, bool) {
    match tag.strip_prefix('v') {
        Some(rest) => (rest, true),
        None => (tag, false),
    }
}

/// Which part of the version a set of changes bumps.
///
/// Declared lowest first so the derived ordering is None < Patch < Minor < Major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeComponent {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for ChangeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeComponent::Major => "major",
            ChangeComponent::Minor => "minor",
            ChangeComponent::Patch => "patch",
            ChangeComponent::None => "none",
        };
        f.write_str(name)
    }
}
