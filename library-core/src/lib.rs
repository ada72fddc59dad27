//! Image Library Core - manifest model and validation
//!
//! A manifest describes how one container image in the science platform's
//! image library is owned, built, tested and identified.
//!
//! # Contract
//! 1. Closed records: unknown keys are rejected at every level
//! 2. Every violation is reported, not just the first
//! 3. All-or-nothing: no partial manifest on failure
//! 4. Validated manifests are immutable
//! 5. The exported schema is rendered from the validator's own field tables

pub mod fields;
pub mod hashing;
pub mod manifest;
pub mod platform;
pub mod schema;
pub mod validation;

pub use hashing::{canonical_json, compute_fingerprint, sha256_hex};
pub use manifest::{Build, Checkout, Git, Maintainer, Manifest, ManifestError, Metadata, Run};
pub use platform::{Architecture, Builder, ClosedDomain, UnknownVariant};
pub use schema::emit_schema;
pub use validation::{validate_manifest, ValidationFailure, ValidationViolation, ViolationKind};

/// Manifest format version applied when a document omits `version`.
pub const SCHEMA_VERSION: f64 = 0.2;

/// `$id` of the exported JSON Schema.
pub const SCHEMA_ID: &str = "https://images.canfar.net/schemas/library/manifest.schema.json";

/// Ref fetched before resolving the checkout when `git.fetch` is omitted.
pub const DEFAULT_FETCH_REF: &str = "refs/heads/main";

/// Sole target platform when `build.platforms` is omitted.
pub const DEFAULT_ARCHITECTURE: Architecture = Architecture::Amd64;

/// Build backend used when `build.builder` is omitted.
pub const DEFAULT_BUILDER: Builder = Builder::Buildkit;
