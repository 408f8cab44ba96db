//! Player version handling.
//!
//! Unity stores the player version as a single string such as `1.2.3b4`:
//! up to three dot-separated semantic components followed by a `b`-prefixed
//! build number. Increments are applied by parsing that string, bumping one
//! component, zeroing everything after it and writing the result back.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of numeric components (`major.minor.patch` + build number).
const MAX_COMPONENTS: usize = 4;

const BUILD_PREFIX: char = 'b';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version string: {0:?}")]
    InvalidFormat(String),
    #[error("version code overflow for {0:?}")]
    CodeOverflow(String),
}

/// Which component of the version a bump applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum IncrementKind {
    None,
    #[default]
    BuildNumber,
    Patch,
    Minor,
    Major,
}

impl IncrementKind {
    pub fn from_str_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "buildNumber" => Some(Self::BuildNumber),
            "patch" => Some(Self::Patch),
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            _ => None,
        }
    }
}

/// Result of one increment: the new serialized version plus the derived
/// fields the editor wants alongside it (per-platform build number and the
/// Android bundle version code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionBump {
    pub version: String,
    pub build_number: String,
    pub version_code: i64,
}

/// A parsed player version. The last component is always the build number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Parses a version string into numeric components.
    ///
    /// A version with fewer than four components and no build suffix gets an
    /// explicit zero build number appended; anything beyond four components
    /// is truncated. Non-numeric tokens are rejected outright.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let mut parts = Vec::new();
        for token in trimmed.split(['.', BUILD_PREFIX]) {
            let value = token
                .parse::<u64>()
                .map_err(|_| VersionError::InvalidFormat(s.to_string()))?;
            parts.push(value);
        }

        if parts.len() < MAX_COMPONENTS && !trimmed.contains(BUILD_PREFIX) {
            parts.push(0);
        }
        parts.truncate(MAX_COMPONENTS);

        Ok(Self { parts })
    }

    /// Applies one increment policy in place.
    ///
    /// The targeted component is incremented by one and every component after
    /// it reset to zero; components before it are untouched. Missing
    /// components are zero-filled ahead of the trailing build number so the
    /// serialized form always keeps its build suffix.
    pub fn increment(&mut self, kind: IncrementKind) {
        let target = match kind {
            IncrementKind::None => return,
            IncrementKind::Major => Some(0),
            IncrementKind::Minor => Some(1),
            IncrementKind::Patch => Some(2),
            IncrementKind::BuildNumber => None,
        };

        let index = match target {
            Some(index) => {
                // Grow until the target sits before the build number.
                while index >= self.parts.len() - 1 && self.parts.len() < MAX_COMPONENTS {
                    let at = self.parts.len() - 1;
                    self.parts.insert(at, 0);
                }
                index
            }
            // The build number is whatever component comes last.
            None => self.parts.len() - 1,
        };

        self.parts[index] += 1;
        for part in &mut self.parts[index + 1..] {
            *part = 0;
        }
    }

    /// The trailing build-number component.
    pub fn build_number(&self) -> u64 {
        *self.parts.last().expect("version always has components")
    }

    /// Platform build code formed by concatenating the decimal digits of
    /// every component (`1.2.3b1` -> 1231).
    ///
    /// Only monotonic while every component stays below 100; components
    /// large enough to overflow an `i64` are rejected rather than truncated.
    pub fn version_code(&self) -> Result<i64, VersionError> {
        let digits: String = self.parts.iter().map(|p| p.to_string()).collect();
        digits
            .parse::<i64>()
            .map_err(|_| VersionError::CodeOverflow(self.to_string()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.parts.len() - 1;
        for (i, part) in self.parts.iter().enumerate() {
            if i == 0 && last > 0 {
                write!(f, "{part}")?;
            } else if i < last {
                write!(f, ".{part}")?;
            } else {
                write!(f, "{BUILD_PREFIX}{part}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One-shot increment over the persisted version string.
///
/// `IncrementKind::None` is the identity: the input comes back verbatim with
/// the derived fields of the current version.
pub fn increment(current: &str, kind: IncrementKind) -> Result<VersionBump, VersionError> {
    let mut version = Version::parse(current)?;

    if kind == IncrementKind::None {
        return Ok(VersionBump {
            version: current.to_string(),
            build_number: version.build_number().to_string(),
            version_code: version.version_code()?,
        });
    }

    version.increment(kind);
    Ok(VersionBump {
        build_number: version.build_number().to_string(),
        version_code: version.version_code()?,
        version: version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(current: &str, kind: IncrementKind) -> VersionBump {
        increment(current, kind).expect("valid version")
    }

    #[test]
    fn build_number_appends_slot_when_missing() {
        let b = bump("1.2.3", IncrementKind::BuildNumber);
        assert_eq!(b.version, "1.2.3b1");
        assert_eq!(b.build_number, "1");
        assert_eq!(b.version_code, 1231);
    }

    #[test]
    fn build_number_bumps_existing_suffix() {
        let b = bump("1.0.1b5", IncrementKind::BuildNumber);
        assert_eq!(b.version, "1.0.1b6");
        assert_eq!(b.build_number, "6");
    }

    #[test]
    fn patch_resets_build_number() {
        let b = bump("1.2.3b4", IncrementKind::Patch);
        assert_eq!(b.version, "1.2.4b0");
        assert_eq!(b.build_number, "0");
        assert_eq!(b.version_code, 1240);
    }

    #[test]
    fn minor_resets_patch_and_build() {
        let b = bump("1.2.3b4", IncrementKind::Minor);
        assert_eq!(b.version, "1.3.0b0");
        assert_eq!(b.version_code, 1300);
    }

    #[test]
    fn major_resets_everything_after_it() {
        let b = bump("1.2.3b4", IncrementKind::Major);
        assert_eq!(b.version, "2.0.0b0");
        assert_eq!(b.version_code, 2000);
    }

    #[test]
    fn short_versions_grow_placeholders() {
        // A bare major.minor with no suffix gains zero-filled slots.
        assert_eq!(bump("1.2", IncrementKind::Patch).version, "1.2.1b0");
        assert_eq!(bump("1.2", IncrementKind::Minor).version, "1.3b0");
        // A version that already carries a suffix keeps it last.
        assert_eq!(bump("1b2", IncrementKind::Minor).version, "1.1b0");
        assert_eq!(bump("1b2", IncrementKind::Patch).version, "1.0.1b0");
        assert_eq!(bump("5", IncrementKind::BuildNumber).version, "5b1");
    }

    #[test]
    fn none_is_identity() {
        let b = bump("1.2.3", IncrementKind::None);
        assert_eq!(b.version, "1.2.3");
        let b = bump("1.2.3b4", IncrementKind::None);
        assert_eq!(b.version, "1.2.3b4");
        assert_eq!(b.build_number, "4");
    }

    #[test]
    fn every_kind_bumps_target_by_one_and_zeroes_the_rest() {
        let kinds = [
            (IncrementKind::Major, 0usize),
            (IncrementKind::Minor, 1),
            (IncrementKind::Patch, 2),
            (IncrementKind::BuildNumber, 3),
        ];
        for (kind, index) in kinds {
            let before = Version::parse("3.5.7b9").unwrap();
            let mut after = before.clone();
            after.increment(kind);
            assert_eq!(after.parts[index], before.parts[index] + 1, "{kind:?}");
            for i in index + 1..after.parts.len() {
                assert_eq!(after.parts[i], 0, "{kind:?} should zero index {i}");
            }
            for i in 0..index {
                assert_eq!(after.parts[i], before.parts[i], "{kind:?} touched index {i}");
            }
        }
    }

    #[test]
    fn parse_serialize_round_trip() {
        for v in ["1.2.3b4", "1.2.3", "1b2", "0.9", "12.0.1b44"] {
            let parsed = Version::parse(v).unwrap();
            let reparsed = Version::parse(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip of {v:?}");
        }
    }

    #[test]
    fn extra_components_are_truncated() {
        let v = Version::parse("1.2.3.4.5").unwrap();
        assert_eq!(v.to_string(), "1.2.3b4");
    }

    #[test]
    fn non_numeric_tokens_are_fatal() {
        for v in ["", "a.b.c", "1.2.x", "1..2", "b5", "5b", "1.2.3-rc1"] {
            assert!(
                matches!(increment(v, IncrementKind::Patch), Err(VersionError::InvalidFormat(_))),
                "{v:?} should be rejected"
            );
        }
    }

    #[test]
    fn version_code_overflow_is_an_error() {
        let v = Version::parse("9999999999.9999999999.9999999999b9999999999").unwrap();
        assert!(matches!(v.version_code(), Err(VersionError::CodeOverflow(_))));
    }
}
