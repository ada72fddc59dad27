//! Field Tables - the declared shape of every manifest record
//!
//! Each record level lists every key it accepts. The validator takes its
//! allow-lists, required set and defaults from here and the schema emitter
//! renders the same tables, so the two cannot disagree.

use serde_json::{json, Value};

use crate::platform::{Architecture, Builder};
use crate::{DEFAULT_ARCHITECTURE, DEFAULT_BUILDER, DEFAULT_FETCH_REF, SCHEMA_VERSION};

/// Semantic type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    NonEmptyText,
    Url,
    Number,
    Builder,
    Architectures,
    Tags,
    TextMap,
    Maintainers,
    Record(Record),
    /// Command string or a `Run` record.
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Number(f64),
    Builder(Builder),
    Architectures(&'static [Architecture]),
}

impl DefaultValue {
    pub fn to_json(&self) -> Value {
        match self {
            DefaultValue::Text(s) => json!(s),
            DefaultValue::Number(n) => json!(n),
            DefaultValue::Builder(b) => json!(b.as_str()),
            DefaultValue::Architectures(archs) => {
                Value::Array(archs.iter().map(|a| json!(a.as_str())).collect())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    Defaulted(DefaultValue),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub title: Option<&'static str>,
    pub description: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub examples: &'static [&'static str],
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, presence: Presence) -> Self {
        Self {
            name,
            title: None,
            description: "",
            kind,
            presence,
            examples: &[],
        }
    }

    const fn titled(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    const fn examples(mut self, examples: &'static [&'static str]) -> Self {
        self.examples = examples;
        self
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn default_value(&self) -> Option<DefaultValue> {
        match self.presence {
            Presence::Defaulted(d) => Some(d),
            Presence::Required | Presence::Optional => None,
        }
    }
}

/// Record levels of a manifest document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Record {
    Manifest,
    Maintainer,
    Git,
    Build,
    Run,
    Metadata,
}

impl Record {
    pub const ALL: [Record; 6] = [
        Record::Manifest,
        Record::Maintainer,
        Record::Git,
        Record::Build,
        Record::Run,
        Record::Metadata,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Record::Manifest => "Manifest",
            Record::Maintainer => "Maintainer",
            Record::Git => "Git",
            Record::Build => "Build",
            Record::Run => "Run",
            Record::Metadata => "Metadata",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Record::Manifest => "Manifest information.",
            Record::Maintainer => "Build Maintainer Information.",
            Record::Git => "Git repository which contains build source.",
            Record::Build => "Build information.",
            Record::Run => "Test information for the image.",
            Record::Metadata => "Metadata for the image.",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Record::Manifest => MANIFEST_FIELDS,
            Record::Maintainer => MAINTAINER_FIELDS,
            Record::Git => GIT_FIELDS,
            Record::Build => BUILD_FIELDS,
            Record::Run => RUN_FIELDS,
            Record::Metadata => METADATA_FIELDS,
        }
    }

    /// Allow-list of keys accepted at this level.
    pub fn accepts(&self, key: &str) -> bool {
        self.fields().iter().any(|f| f.name == key)
    }
}

use FieldKind as K;
use Presence::{Defaulted, Optional, Required};

// --- Maintainer ---

pub const MAINTAINER_NAME: FieldSpec = FieldSpec::new("name", K::NonEmptyText, Required)
    .titled("Name")
    .describe("Full name of the maintainer.");
pub const MAINTAINER_EMAIL: FieldSpec = FieldSpec::new("email", K::NonEmptyText, Required)
    .titled("Email")
    .describe("Contact email, required for traceability.");
pub const MAINTAINER_GITHUB: FieldSpec = FieldSpec::new("github", K::Text, Optional)
    .titled("Maintainer Github")
    .describe("Github handle without the leading '@'.");
pub const MAINTAINER_GITLAB: FieldSpec = FieldSpec::new("gitlab", K::Text, Optional)
    .titled("Maintainer Gitlab")
    .describe("GitLab handle without the leading '@'.");

pub const MAINTAINER_FIELDS: &[FieldSpec] = &[
    MAINTAINER_NAME,
    MAINTAINER_EMAIL,
    MAINTAINER_GITHUB,
    MAINTAINER_GITLAB,
];

// --- Git ---

pub const GIT_REPO: FieldSpec = FieldSpec::new("repo", K::Url, Required)
    .titled("Repository")
    .describe("Git repository which contains the Dockerfile.");
pub const GIT_FETCH: FieldSpec = FieldSpec::new("fetch", K::Text, Defaulted(DefaultValue::Text(DEFAULT_FETCH_REF)))
    .titled("Fetch")
    .describe("Reference to fetch before resolving commits.")
    .examples(&["refs/heads/main", "refs/tags/v1.0.0"]);
pub const GIT_SHA: FieldSpec = FieldSpec::new("sha", K::Text, Optional)
    .titled("Git Commit SHA")
    .describe("Commit SHA to checkout for builds.");
pub const GIT_TAG: FieldSpec = FieldSpec::new("tag", K::Text, Optional)
    .titled("Git Tag")
    .describe("Tag to checkout for builds.");

pub const GIT_FIELDS: &[FieldSpec] = &[GIT_REPO, GIT_FETCH, GIT_SHA, GIT_TAG];

// --- Build ---

pub const BUILD_PATH: FieldSpec = FieldSpec::new("path", K::Text, Defaulted(DefaultValue::Text(".")))
    .titled("Path")
    .describe("Path to the directory containing the Dockerfile; defaults to the root of the repository.");
pub const BUILD_DOCKERFILE: FieldSpec = FieldSpec::new("dockerfile", K::Text, Defaulted(DefaultValue::Text("Dockerfile")))
    .titled("Dockerfile")
    .describe("Name of the Dockerfile relative to the path.")
    .examples(&["Dockerfile", "Dockerfile-alternate"]);
pub const BUILD_CONTEXT: FieldSpec = FieldSpec::new("context", K::Text, Defaulted(DefaultValue::Text(".")))
    .titled("Build Context")
    .describe("Build context path relative to the Dockerfile.")
    .examples(&[".", "../"]);
pub const BUILD_BUILDER: FieldSpec = FieldSpec::new("builder", K::Builder, Defaulted(DefaultValue::Builder(DEFAULT_BUILDER)))
    .titled("Build Backend")
    .describe("Builder backend used for this entry.")
    .examples(&["buildkit", "classic", "oci-import"]);
pub const BUILD_PLATFORMS: FieldSpec = FieldSpec::new(
    "platforms",
    K::Architectures,
    Defaulted(DefaultValue::Architectures(&[DEFAULT_ARCHITECTURE])),
)
.titled("Image Platforms")
.describe("Set target platforms for the build.");
pub const BUILD_TAGS: FieldSpec = FieldSpec::new("tags", K::Tags, Required)
    .titled("Image Tags")
    .describe("Tags produced by this build entry.");
pub const BUILD_ARGS: FieldSpec = FieldSpec::new("args", K::TextMap, Optional)
    .titled("Build Args")
    .describe("Set build-time variables for the build.");
pub const BUILD_ANNOTATIONS: FieldSpec = FieldSpec::new("annotations", K::TextMap, Optional)
    .titled("Image Annotations")
    .describe("Add annotation to the container image.");
pub const BUILD_LABELS: FieldSpec = FieldSpec::new("labels", K::TextMap, Optional)
    .titled("Image Labels")
    .describe("Add metadata to the container image.");
pub const BUILD_TARGET: FieldSpec = FieldSpec::new("target", K::Text, Optional)
    .titled("Build Target")
    .describe("Set the target build stage to build.");
pub const BUILD_TEST: FieldSpec = FieldSpec::new("test", K::Test, Optional)
    .titled("Image Test Command")
    .describe("Command to run in the created container to verify the image is working.");

pub const BUILD_FIELDS: &[FieldSpec] = &[
    BUILD_PATH,
    BUILD_DOCKERFILE,
    BUILD_CONTEXT,
    BUILD_BUILDER,
    BUILD_PLATFORMS,
    BUILD_TAGS,
    BUILD_ARGS,
    BUILD_ANNOTATIONS,
    BUILD_LABELS,
    BUILD_TARGET,
    BUILD_TEST,
];

// --- Run ---

pub const RUN_CMD: FieldSpec = FieldSpec::new("cmd", K::Text, Optional)
    .titled("Testing Command")
    .describe(
        "Command to run in the created container to verify the image is working. \
         The command is run with `docker run --rm -it <image> <cmd>`, where image is populated \
         automatically from the build process. If the command returns a non-zero exit code, \
         the test is considered to have failed.",
    )
    .examples(&["bash -c 'echo hello world'"]);

pub const RUN_FIELDS: &[FieldSpec] = &[RUN_CMD];

// --- Metadata ---

pub const METADATA_IDENTIFIER: FieldSpec = FieldSpec::new("identifier", K::NonEmptyText, Required)
    .describe("Unique science identifier for the image.");
pub const METADATA_PROJECT: FieldSpec = FieldSpec::new("project", K::NonEmptyText, Required)
    .describe("SRCnet Project name for the image.");

pub const METADATA_FIELDS: &[FieldSpec] = &[METADATA_IDENTIFIER, METADATA_PROJECT];

// --- Manifest ---

pub const MANIFEST_VERSION: FieldSpec = FieldSpec::new("version", K::Number, Defaulted(DefaultValue::Number(SCHEMA_VERSION)))
    .titled("Version")
    .describe("Library manifest version.");
pub const MANIFEST_NAME: FieldSpec = FieldSpec::new("name", K::NonEmptyText, Required)
    .describe("Name of the image.")
    .examples(&["astroml"]);
pub const MANIFEST_MAINTAINERS: FieldSpec = FieldSpec::new("maintainers", K::Maintainers, Required)
    .titled("Maintainers")
    .describe("List of maintainers responsible for the image.");
pub const MANIFEST_GIT: FieldSpec = FieldSpec::new("git", K::Record(Record::Git), Required)
    .titled("Git Info")
    .describe("Repository information for the image.");
pub const MANIFEST_BUILD: FieldSpec = FieldSpec::new("build", K::Record(Record::Build), Required)
    .titled("Build Info")
    .describe("Build information for the image.");
pub const MANIFEST_METADATA: FieldSpec = FieldSpec::new("metadata", K::Record(Record::Metadata), Required)
    .titled("Metadata")
    .describe("Metadata for the image.");

pub const MANIFEST_FIELDS: &[FieldSpec] = &[
    MANIFEST_VERSION,
    MANIFEST_NAME,
    MANIFEST_MAINTAINERS,
    MANIFEST_GIT,
    MANIFEST_BUILD,
    MANIFEST_METADATA,
];
