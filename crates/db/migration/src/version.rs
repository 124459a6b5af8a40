use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid schema version '{0}', expected MAJOR.MINOR.PATCH")]
pub struct InvalidSchemaVersion(pub String);

/// Semantic version a migration belongs to. Upgrading to a target version
/// applies every migration whose version is lower or equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SchemaVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = InvalidSchemaVersion;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSchemaVersion(raw.to_string());
        // Pre-release and build suffixes ("0.1.0-rc.1", "0.1.0+abc") do not
        // change which migrations apply.
        let core = raw
            .trim()
            .trim_start_matches('v')
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let mut parts = core.split('.');
        let mut next = || -> Result<u64, InvalidSchemaVersion> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u64>()
                .map_err(|_| invalid())
        };
        let version = SchemaVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
