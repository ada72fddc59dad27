//! Manifest Model - validated, immutable values
//!
//! Values are only ever produced by the validator. Fields are private; a
//! changed manifest is a new manifest, built by [`Manifest::edit`] through
//! the same validation as the original.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::hashing::compute_fingerprint;
use crate::platform::{Architecture, Builder};
use crate::validation::{validate_manifest, ValidationFailure};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationFailure),
}

impl ManifestError {
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ManifestError::Invalid(failure) => Some(failure),
            ManifestError::Json(_) | ManifestError::Yaml(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Maintainer {
    pub(crate) name: String,
    pub(crate) email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) gitlab: Option<String>,
}

impl Maintainer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn github(&self) -> Option<&str> {
        self.github.as_deref()
    }

    pub fn gitlab(&self) -> Option<&str> {
        self.gitlab.as_deref()
    }
}

/// What to check out after fetching: a commit or a tag, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Checkout {
    Sha(String),
    Tag(String),
}

impl Checkout {
    pub fn reference(&self) -> &str {
        match self {
            Checkout::Sha(r) | Checkout::Tag(r) => r,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Git {
    /// Echoed exactly as written.
    pub(crate) repo: String,
    #[serde(skip)]
    pub(crate) repo_url: Url,
    pub(crate) fetch: String,
    #[serde(flatten)]
    pub(crate) checkout: Checkout,
}

impl Git {
    pub fn repo(&self) -> &Url {
        &self.repo_url
    }

    pub fn repo_str(&self) -> &str {
        &self.repo
    }

    pub fn fetch(&self) -> &str {
        &self.fetch
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn sha(&self) -> Option<&str> {
        match &self.checkout {
            Checkout::Sha(sha) => Some(sha),
            Checkout::Tag(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.checkout {
            Checkout::Tag(tag) => Some(tag),
            Checkout::Sha(_) => None,
        }
    }
}

/// Command the build orchestrator runs inside the built image.
/// A non-zero exit code fails the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Run {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) cmd: Option<String>,
}

impl Run {
    pub fn cmd(&self) -> Option<&str> {
        self.cmd.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Build {
    pub(crate) path: String,
    pub(crate) dockerfile: String,
    pub(crate) context: String,
    pub(crate) builder: Builder,
    pub(crate) platforms: Vec<Architecture>,
    pub(crate) tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) args: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) annotations: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) test: Option<Run>,
}

impl Build {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dockerfile(&self) -> &str {
        &self.dockerfile
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn builder(&self) -> Builder {
        self.builder
    }

    /// Target platforms, in declaration order, without repeats.
    pub fn platforms(&self) -> &[Architecture] {
        &self.platforms
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn args(&self) -> Option<&BTreeMap<String, String>> {
        self.args.as_ref()
    }

    pub fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.annotations.as_ref()
    }

    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.labels.as_ref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn test(&self) -> Option<&Run> {
        self.test.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub(crate) identifier: String,
    pub(crate) project: String,
}

impl Metadata {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn project(&self) -> &str {
        &self.project
    }
}

/// A validated image manifest.
///
/// Deserializing a `Manifest` with any serde format runs the full
/// validation; there is no way to obtain one that skipped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Manifest {
    pub(crate) version: f64,
    pub(crate) name: String,
    pub(crate) maintainers: Vec<Maintainer>,
    pub(crate) git: Git,
    pub(crate) build: Build,
    pub(crate) metadata: Metadata,
}

impl Manifest {
    /// Validate an untyped record and build the manifest, or report every
    /// violated constraint.
    pub fn from_value(record: &Value) -> Result<Self, ValidationFailure> {
        validate_manifest(record)
    }

    pub fn from_json_str(document: &str) -> Result<Self, ManifestError> {
        let record: Value = serde_json::from_str(document)?;
        Ok(Self::from_value(&record)?)
    }

    pub fn from_yaml_str(document: &str) -> Result<Self, ManifestError> {
        let record: Value = serde_yaml::from_str(document)?;
        Ok(Self::from_value(&record)?)
    }

    /// Normalized record form, every default spelled out.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Apply `change` to the record form and validate the result as a new
    /// manifest. `self` is left untouched either way.
    pub fn edit<F>(&self, change: F) -> Result<Self, ManifestError>
    where
        F: FnOnce(&mut Value),
    {
        let mut record = self.to_value()?;
        change(&mut record);
        Ok(Self::from_value(&record)?)
    }

    /// Hex SHA-256 of the canonical JSON of the normalized manifest.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        compute_fingerprint(self)
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maintainers(&self) -> &[Maintainer] {
        &self.maintainers
    }

    pub fn git(&self) -> &Git {
        &self.git
    }

    pub fn build(&self) -> &Build {
        &self.build
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl TryFrom<Value> for Manifest {
    type Error = ValidationFailure;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        Self::from_value(&record)
    }
}
