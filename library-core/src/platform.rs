//! Closed Domains - Architectures and Build Backends
//!
//! Adding a platform or backend is a change to one enum; every match on it
//! is exhaustive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Container architecture an image is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Architecture {
    #[default]
    #[serde(rename = "amd64")]
    Amd64,
    #[serde(rename = "arm32v5")]
    Arm32v5,
    #[serde(rename = "arm32v6")]
    Arm32v6,
    #[serde(rename = "arm32v7")]
    Arm32v7,
    #[serde(rename = "arm64v8")]
    Arm64v8,
    #[serde(rename = "windows-amd64")]
    WindowsAmd64,
}

impl Architecture {
    pub const ALL: [Architecture; 6] = [
        Architecture::Amd64,
        Architecture::Arm32v5,
        Architecture::Arm32v6,
        Architecture::Arm32v7,
        Architecture::Arm64v8,
        Architecture::WindowsAmd64,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Amd64 => "amd64",
            Architecture::Arm32v5 => "arm32v5",
            Architecture::Arm32v6 => "arm32v6",
            Architecture::Arm32v7 => "arm32v7",
            Architecture::Arm64v8 => "arm64v8",
            Architecture::WindowsAmd64 => "windows-amd64",
        }
    }
}

/// Docker build backend used to execute the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Builder {
    #[default]
    Buildkit,
    Classic,
    OciImport,
}

impl Builder {
    pub const ALL: [Builder; 3] = [Builder::Buildkit, Builder::Classic, Builder::OciImport];

    pub fn as_str(&self) -> &'static str {
        match self {
            Builder::Buildkit => "buildkit",
            Builder::Classic => "classic",
            Builder::OciImport => "oci-import",
        }
    }
}

/// A value outside a closed domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of: {}", .allowed.join(", "))]
pub struct UnknownVariant {
    pub value: String,
    pub allowed: Vec<&'static str>,
}

/// Names of every member of a closed domain, in declaration order.
pub trait ClosedDomain: Sized + Copy + 'static {
    fn variants() -> &'static [Self];
    fn name(&self) -> &'static str;

    fn allowed() -> Vec<&'static str> {
        Self::variants().iter().map(|v| v.name()).collect()
    }

    fn lookup(value: &str) -> Result<Self, UnknownVariant> {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.name() == value)
            .ok_or_else(|| UnknownVariant {
                value: value.to_string(),
                allowed: Self::allowed(),
            })
    }
}

impl ClosedDomain for Architecture {
    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        self.as_str()
    }
}

impl ClosedDomain for Builder {
    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for Architecture {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl FromStr for Builder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_as_str() {
        for arch in Architecture::ALL {
            let json = serde_json::to_value(arch).unwrap();
            assert_eq!(json, arch.as_str());
        }
        for builder in Builder::ALL {
            let json = serde_json::to_value(builder).unwrap();
            assert_eq!(json, builder.as_str());
        }
    }

    #[test]
    fn test_parse_known_values() {
        assert_eq!("arm64v8".parse::<Architecture>().unwrap(), Architecture::Arm64v8);
        assert_eq!("windows-amd64".parse::<Architecture>().unwrap(), Architecture::WindowsAmd64);
        assert_eq!("oci-import".parse::<Builder>().unwrap(), Builder::OciImport);
    }

    #[test]
    fn test_unknown_value_lists_allowed_set() {
        let err = "docker-legacy".parse::<Builder>().unwrap_err();
        assert_eq!(err.value, "docker-legacy");
        assert_eq!(err.allowed, vec!["buildkit", "classic", "oci-import"]);
        assert_eq!(
            err.to_string(),
            "'docker-legacy' is not one of: buildkit, classic, oci-import"
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Architecture::default(), Architecture::Amd64);
        assert_eq!(Builder::default(), Builder::Buildkit);
    }
}
