//! Validation System - untyped record in, typed manifest or every violation out
//!
//! Each record level is read through a [`RecordReader`] which enforces the
//! level's allow-list and the presence, type and default of every field
//! declared in [`crate::fields`]. Readers never stop at the first problem;
//! violations accumulate and the manifest is only built when none were found.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::fields::{self, FieldKind, FieldSpec, Presence, Record};
use crate::manifest::{Build, Checkout, Git, Maintainer, Manifest, Metadata, Run};
use crate::platform::{Architecture, Builder, ClosedDomain};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingField,
    TypeMismatch,
    UnknownField,
    EnumViolation,
    CrossFieldViolation,
    EmptyCollection,
    DuplicateEntry,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "missing_field",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::UnknownField => "unknown_field",
            ViolationKind::EnumViolation => "enum_violation",
            ViolationKind::CrossFieldViolation => "cross_field_violation",
            ViolationKind::EmptyCollection => "empty_collection",
            ViolationKind::DuplicateEntry => "duplicate_entry",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated constraint.
///
/// `path` is a dotted locator from the document root (`build.tags`,
/// `maintainers[0].email`); the root itself is `$`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationViolation {
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A rejected manifest, with every violation found.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("Manifest validation failed: {}", render(.violations))]
pub struct ValidationFailure {
    violations: Vec<ValidationViolation>,
}

fn render(violations: &[ValidationViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationFailure {
    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<ValidationViolation> {
        self.violations
    }

    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Violations reported at exactly `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationViolation> + 'a {
        self.violations.iter().filter(move |v| v.path == path)
    }
}

// --- Violation sink ---

#[derive(Debug, Default)]
struct Violations {
    found: Vec<ValidationViolation>,
}

impl Violations {
    fn push(&mut self, path: &FieldPath, kind: ViolationKind, message: String) -> &mut ValidationViolation {
        self.found.push(ValidationViolation {
            path: path.to_string(),
            kind,
            message,
            expected: None,
            actual: None,
        });
        let last = self.found.len() - 1;
        &mut self.found[last]
    }

    fn missing(&mut self, path: &FieldPath) {
        self.push(path, ViolationKind::MissingField, "Field required".to_string());
    }

    fn mismatch(&mut self, path: &FieldPath, expected: &str, actual: &Value) {
        let v = self.push(
            path,
            ViolationKind::TypeMismatch,
            format!("Expected {}, found {}", expected, describe(actual)),
        );
        v.expected = Some(expected.to_string());
        v.actual = Some(describe(actual));
    }

    fn unknown(&mut self, path: &FieldPath) {
        self.push(path, ViolationKind::UnknownField, "Extra fields not permitted".to_string());
    }

    fn not_in_domain(&mut self, path: &FieldPath, value: &str, allowed: &[&'static str]) {
        let v = self.push(
            path,
            ViolationKind::EnumViolation,
            format!("'{}' is not one of: {}", value, allowed.join(", ")),
        );
        v.expected = Some(allowed.join(" | "));
        v.actual = Some(value.to_string());
    }

    fn empty(&mut self, path: &FieldPath) {
        let v = self.push(
            path,
            ViolationKind::EmptyCollection,
            "List should have at least 1 item".to_string(),
        );
        v.expected = Some("at least 1 item".to_string());
        v.actual = Some("0 items".to_string());
    }

    fn duplicate(&mut self, path: &FieldPath, value: &str) {
        let v = self.push(path, ViolationKind::DuplicateEntry, format!("'{}' is listed more than once", value));
        v.actual = Some(value.to_string());
    }

    fn cross_field(&mut self, path: &FieldPath, message: &str) {
        self.push(path, ViolationKind::CrossFieldViolation, message.to_string());
    }

    fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) if s.is_empty() => "empty string".to_string(),
        Value::String(s) => format!("string '{}'", s),
        Value::Array(_) => "list".to_string(),
        Value::Object(_) => "mapping".to_string(),
    }
}

// --- Field paths ---

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldPath(String);

impl FieldPath {
    fn root() -> Self {
        Self::default()
    }

    fn key(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    fn index(&self, i: usize) -> Self {
        Self(format!("{}[{}]", self.0, i))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("$")
        } else {
            f.write_str(&self.0)
        }
    }
}

// --- Field reads ---

/// Outcome of reading one field.
#[derive(Debug)]
enum Read<T> {
    Present(T),
    /// Optional field omitted or null.
    Absent,
    /// A violation was recorded.
    Invalid,
}

impl<T> Read<T> {
    fn required(self) -> Option<T> {
        match self {
            Read::Present(t) => Some(t),
            Read::Absent | Read::Invalid => None,
        }
    }

    fn optional(self) -> Option<Option<T>> {
        match self {
            Read::Present(t) => Some(Some(t)),
            Read::Absent => Some(None),
            Read::Invalid => None,
        }
    }
}

enum Slot<'a> {
    Value(Cow<'a, Value>),
    Absent,
    Rejected,
}

/// Reader over one record level. Opening it checks the allow-list.
struct RecordReader<'a> {
    path: FieldPath,
    map: &'a Map<String, Value>,
}

impl<'a> RecordReader<'a> {
    fn open(record: Record, path: FieldPath, value: &'a Value, sink: &mut Violations) -> Option<Self> {
        let Value::Object(map) = value else {
            sink.mismatch(&path, "mapping", value);
            return None;
        };
        for key in map.keys() {
            if !record.accepts(key) {
                sink.unknown(&path.key(key));
            }
        }
        Some(Self { path, map })
    }

    fn slot(&self, field: &FieldSpec, sink: &mut Violations) -> Slot<'a> {
        let path = self.path.key(field.name);
        match (self.map.get(field.name), field.presence) {
            (None, Presence::Required) => {
                sink.missing(&path);
                Slot::Rejected
            }
            (None, Presence::Defaulted(default)) => Slot::Value(Cow::Owned(default.to_json())),
            (None, Presence::Optional) | (Some(Value::Null), Presence::Optional) => Slot::Absent,
            (Some(value), _) => Slot::Value(Cow::Borrowed(value)),
        }
    }

    fn read<T>(
        &self,
        field: &FieldSpec,
        sink: &mut Violations,
        convert: impl FnOnce(&FieldPath, &Value, &mut Violations) -> Option<T>,
    ) -> Read<T> {
        match self.slot(field, sink) {
            Slot::Value(value) => match convert(&self.path.key(field.name), &*value, sink) {
                Some(t) => Read::Present(t),
                None => Read::Invalid,
            },
            Slot::Absent => Read::Absent,
            Slot::Rejected => Read::Invalid,
        }
    }

    fn text(&self, field: &FieldSpec, sink: &mut Violations) -> Read<String> {
        let non_empty = field.kind == FieldKind::NonEmptyText;
        self.read(field, sink, |path, value, sink| text_value(path, value, non_empty, sink))
    }

    /// The text as written, alongside its parsed form.
    fn url(&self, field: &FieldSpec, sink: &mut Violations) -> Read<(String, Url)> {
        self.read(field, sink, |path, value, sink| {
            let raw = text_value(path, value, true, sink)?;
            match Url::parse(&raw) {
                Ok(url) => Some((raw, url)),
                Err(_) => {
                    sink.mismatch(path, "URL", value);
                    None
                }
            }
        })
    }

    fn number(&self, field: &FieldSpec, sink: &mut Violations) -> Read<f64> {
        self.read(field, sink, |path, value, sink| match value.as_f64() {
            Some(n) => Some(n),
            None => {
                sink.mismatch(path, "number", value);
                None
            }
        })
    }

    fn member<T: ClosedDomain>(&self, field: &FieldSpec, sink: &mut Violations) -> Read<T> {
        self.read(field, sink, domain_value::<T>)
    }

    /// Non-empty list of distinct domain members.
    fn member_set<T: ClosedDomain + PartialEq>(&self, field: &FieldSpec, sink: &mut Violations) -> Read<Vec<T>> {
        self.read(field, sink, |path, value, sink| {
            let items = list_value(path, value, sink)?;
            let mut members: Vec<T> = Vec::with_capacity(items.len());
            let mut ok = true;
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                match domain_value::<T>(&item_path, item, sink) {
                    Some(m) if members.contains(&m) => {
                        sink.duplicate(&item_path, m.name());
                        ok = false;
                    }
                    Some(m) => members.push(m),
                    None => ok = false,
                }
            }
            ok.then_some(members)
        })
    }

    /// Non-empty list of non-empty strings.
    fn text_list(&self, field: &FieldSpec, sink: &mut Violations) -> Read<Vec<String>> {
        self.read(field, sink, |path, value, sink| {
            let items = list_value(path, value, sink)?;
            let texts: Vec<Option<String>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| text_value(&path.index(i), item, true, sink))
                .collect();
            texts.into_iter().collect()
        })
    }

    fn text_map(&self, field: &FieldSpec, sink: &mut Violations) -> Read<BTreeMap<String, String>> {
        self.read(field, sink, |path, value, sink| {
            let Value::Object(map) = value else {
                sink.mismatch(path, "mapping of strings", value);
                return None;
            };
            let entries: Vec<Option<(String, String)>> = map
                .iter()
                .map(|(k, v)| text_value(&path.key(k), v, false, sink).map(|v| (k.clone(), v)))
                .collect();
            entries.into_iter().collect()
        })
    }

    fn record<T>(
        &self,
        field: &FieldSpec,
        sink: &mut Violations,
        parse: fn(FieldPath, &Value, &mut Violations) -> Option<T>,
    ) -> Read<T> {
        self.read(field, sink, |path, value, sink| parse(path.clone(), value, sink))
    }

    /// Non-empty list of nested records.
    fn records<T>(
        &self,
        field: &FieldSpec,
        sink: &mut Violations,
        parse: fn(FieldPath, &Value, &mut Violations) -> Option<T>,
    ) -> Read<Vec<T>> {
        self.read(field, sink, |path, value, sink| {
            let items = list_value(path, value, sink)?;
            let parsed: Vec<Option<T>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| parse(path.index(i), item, sink))
                .collect();
            parsed.into_iter().collect()
        })
    }
}

fn text_value(path: &FieldPath, value: &Value, non_empty: bool, sink: &mut Violations) -> Option<String> {
    match value {
        Value::String(s) if non_empty && s.is_empty() => {
            sink.mismatch(path, "non-empty string", value);
            None
        }
        Value::String(s) => Some(s.clone()),
        _ => {
            sink.mismatch(path, if non_empty { "non-empty string" } else { "string" }, value);
            None
        }
    }
}

fn domain_value<T: ClosedDomain>(path: &FieldPath, value: &Value, sink: &mut Violations) -> Option<T> {
    let Value::String(raw) = value else {
        sink.mismatch(path, "string", value);
        return None;
    };
    match T::lookup(raw) {
        Ok(member) => Some(member),
        Err(unknown) => {
            sink.not_in_domain(path, &unknown.value, &unknown.allowed);
            None
        }
    }
}

fn list_value<'v>(path: &FieldPath, value: &'v Value, sink: &mut Violations) -> Option<&'v Vec<Value>> {
    match value {
        Value::Array(items) if items.is_empty() => {
            sink.empty(path);
            None
        }
        Value::Array(items) => Some(items),
        _ => {
            sink.mismatch(path, "list", value);
            None
        }
    }
}

// --- Records ---

fn parse_maintainer(path: FieldPath, value: &Value, sink: &mut Violations) -> Option<Maintainer> {
    let reader = RecordReader::open(Record::Maintainer, path, value, sink)?;
    let name = reader.text(&fields::MAINTAINER_NAME, sink).required();
    let email = reader.text(&fields::MAINTAINER_EMAIL, sink).required();
    let github = reader.text(&fields::MAINTAINER_GITHUB, sink).optional();
    let gitlab = reader.text(&fields::MAINTAINER_GITLAB, sink).optional();
    Some(Maintainer {
        name: name?,
        email: email?,
        github: github?,
        gitlab: gitlab?,
    })
}

/// Exactly one of `sha` / `tag`. Only judged once both fields type-checked.
fn checkout_rule(path: &FieldPath, sha: Read<String>, tag: Read<String>, sink: &mut Violations) -> Option<Checkout> {
    match (sha, tag) {
        (Read::Invalid, _) | (_, Read::Invalid) => None,
        (Read::Present(sha), Read::Absent) => Some(Checkout::Sha(sha)),
        (Read::Absent, Read::Present(tag)) => Some(Checkout::Tag(tag)),
        (Read::Absent, Read::Absent) => {
            sink.cross_field(path, "Either sha or tag must be provided.");
            None
        }
        (Read::Present(_), Read::Present(_)) => {
            sink.cross_field(path, "Only one of sha or tag may be provided.");
            None
        }
    }
}

fn parse_git(path: FieldPath, value: &Value, sink: &mut Violations) -> Option<Git> {
    let reader = RecordReader::open(Record::Git, path, value, sink)?;
    let repo = reader.url(&fields::GIT_REPO, sink).required();
    let fetch = reader.text(&fields::GIT_FETCH, sink).required();
    let sha = reader.text(&fields::GIT_SHA, sink);
    let tag = reader.text(&fields::GIT_TAG, sink);
    let checkout = checkout_rule(&reader.path, sha, tag, sink);
    let (repo, repo_url) = repo?;
    Some(Git {
        repo,
        repo_url,
        fetch: fetch?,
        checkout: checkout?,
    })
}

fn parse_run(path: FieldPath, value: &Value, sink: &mut Violations) -> Option<Run> {
    // Bare string is shorthand for `{cmd: <string>}`.
    if let Value::String(cmd) = value {
        return Some(Run { cmd: Some(cmd.clone()) });
    }
    if !value.is_object() {
        sink.mismatch(&path, "command string or mapping", value);
        return None;
    }
    let reader = RecordReader::open(Record::Run, path, value, sink)?;
    let cmd = reader.text(&fields::RUN_CMD, sink).optional();
    Some(Run { cmd: cmd? })
}

fn parse_build(path: FieldPath, value: &Value, sink: &mut Violations) -> Option<Build> {
    let reader = RecordReader::open(Record::Build, path, value, sink)?;
    let build_path = reader.text(&fields::BUILD_PATH, sink).required();
    let dockerfile = reader.text(&fields::BUILD_DOCKERFILE, sink).required();
    let context = reader.text(&fields::BUILD_CONTEXT, sink).required();
    let builder = reader.member::<Builder>(&fields::BUILD_BUILDER, sink).required();
    let platforms = reader.member_set::<Architecture>(&fields::BUILD_PLATFORMS, sink).required();
    let tags = reader.text_list(&fields::BUILD_TAGS, sink).required();
    let args = reader.text_map(&fields::BUILD_ARGS, sink).optional();
    let annotations = reader.text_map(&fields::BUILD_ANNOTATIONS, sink).optional();
    let labels = reader.text_map(&fields::BUILD_LABELS, sink).optional();
    let target = reader.text(&fields::BUILD_TARGET, sink).optional();
    let test = reader.record(&fields::BUILD_TEST, sink, parse_run).optional();
    Some(Build {
        path: build_path?,
        dockerfile: dockerfile?,
        context: context?,
        builder: builder?,
        platforms: platforms?,
        tags: tags?,
        args: args?,
        annotations: annotations?,
        labels: labels?,
        target: target?,
        test: test?,
    })
}

fn parse_metadata(path: FieldPath, value: &Value, sink: &mut Violations) -> Option<Metadata> {
    let reader = RecordReader::open(Record::Metadata, path, value, sink)?;
    let identifier = reader.text(&fields::METADATA_IDENTIFIER, sink).required();
    let project = reader.text(&fields::METADATA_PROJECT, sink).required();
    Some(Metadata {
        identifier: identifier?,
        project: project?,
    })
}

fn parse_manifest(value: &Value, sink: &mut Violations) -> Option<Manifest> {
    let reader = RecordReader::open(Record::Manifest, FieldPath::root(), value, sink)?;
    let version = reader.number(&fields::MANIFEST_VERSION, sink).required();
    let name = reader.text(&fields::MANIFEST_NAME, sink).required();
    let maintainers = reader.records(&fields::MANIFEST_MAINTAINERS, sink, parse_maintainer).required();
    let git = reader.record(&fields::MANIFEST_GIT, sink, parse_git).required();
    let build = reader.record(&fields::MANIFEST_BUILD, sink, parse_build).required();
    let metadata = reader.record(&fields::MANIFEST_METADATA, sink, parse_metadata).required();
    Some(Manifest {
        version: version?,
        name: name?,
        maintainers: maintainers?,
        git: git?,
        build: build?,
        metadata: metadata?,
    })
}

/// Validate an untyped record into a [`Manifest`].
///
/// All-or-nothing: any violation, including an unknown key that did not
/// stop the typed value from being assembled, rejects the whole record.
pub fn validate_manifest(record: &Value) -> Result<Manifest, ValidationFailure> {
    let mut sink = Violations::default();
    let manifest = parse_manifest(record, &mut sink);
    match manifest {
        Some(manifest) if sink.is_empty() => {
            tracing::debug!(name = %manifest.name, "manifest validated");
            Ok(manifest)
        }
        _ => Err(ValidationFailure { violations: sink.found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(failure: &ValidationFailure) -> Vec<(String, ViolationKind)> {
        failure
            .violations()
            .iter()
            .map(|v| (v.path.clone(), v.kind))
            .collect()
    }

    #[test]
    fn test_field_path_rendering() {
        let root = FieldPath::root();
        assert_eq!(root.to_string(), "$");
        assert_eq!(root.key("build").key("tags").index(2).to_string(), "build.tags[2]");
    }

    #[test]
    fn test_checkout_rule_outcomes() {
        let path = FieldPath::root().key("git");
        let mut sink = Violations::default();

        let sha = checkout_rule(&path, Read::Present("abc".into()), Read::Absent, &mut sink);
        assert_eq!(sha, Some(Checkout::Sha("abc".into())));
        let tag = checkout_rule(&path, Read::Absent, Read::Present("v1".into()), &mut sink);
        assert_eq!(tag, Some(Checkout::Tag("v1".into())));
        assert!(sink.is_empty());

        assert!(checkout_rule(&path, Read::Absent, Read::Absent, &mut sink).is_none());
        assert!(checkout_rule(&path, Read::Present("a".into()), Read::Present("b".into()), &mut sink).is_none());
        assert_eq!(sink.found.len(), 2);
        assert!(sink.found.iter().all(|v| v.kind == ViolationKind::CrossFieldViolation));
    }

    #[test]
    fn test_checkout_rule_skips_mistyped_fields() {
        let path = FieldPath::root().key("git");
        let mut sink = Violations::default();
        assert!(checkout_rule(&path, Read::Invalid, Read::Present("v1".into()), &mut sink).is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_record_must_be_mapping() {
        let mut sink = Violations::default();
        assert!(parse_metadata(FieldPath::root().key("metadata"), &json!(["x"]), &mut sink).is_none());
        assert_eq!(sink.found[0].kind, ViolationKind::TypeMismatch);
        assert_eq!(sink.found[0].actual.as_deref(), Some("list"));
    }

    #[test]
    fn test_run_shorthand_and_record() {
        let mut sink = Violations::default();
        let path = FieldPath::root().key("test");
        let short = parse_run(path.clone(), &json!("true"), &mut sink).unwrap();
        assert_eq!(short.cmd(), Some("true"));
        let full = parse_run(path.clone(), &json!({"cmd": "true"}), &mut sink).unwrap();
        assert_eq!(short, full);
        let empty = parse_run(path.clone(), &json!({}), &mut sink).unwrap();
        assert_eq!(empty.cmd(), None);
        assert!(sink.is_empty());

        assert!(parse_run(path, &json!({"command": "true"}), &mut sink).is_some());
        assert_eq!(kinds(&ValidationFailure { violations: sink.found }), vec![(
            "test.command".to_string(),
            ViolationKind::UnknownField
        )]);
    }

    #[test]
    fn test_platform_duplicates_and_domain() {
        let mut sink = Violations::default();
        let build = json!({
            "tags": ["latest"],
            "platforms": ["amd64", "arm64v8", "amd64", "linux/riscv64"]
        });
        assert!(parse_build(FieldPath::root().key("build"), &build, &mut sink).is_none());
        assert_eq!(
            kinds(&ValidationFailure { violations: sink.found }),
            vec![
                ("build.platforms[2]".to_string(), ViolationKind::DuplicateEntry),
                ("build.platforms[3]".to_string(), ViolationKind::EnumViolation),
            ]
        );
    }

    #[test]
    fn test_map_values_must_be_strings() {
        let mut sink = Violations::default();
        let build = json!({"tags": ["latest"], "args": {"PY": "3.12", "JOBS": 4}});
        assert!(parse_build(FieldPath::root().key("build"), &build, &mut sink).is_none());
        assert_eq!(sink.found.len(), 1);
        assert_eq!(sink.found[0].path, "build.args.JOBS");
        assert_eq!(sink.found[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_null_optional_is_absent_but_null_default_is_not() {
        let mut sink = Violations::default();
        let build = json!({"tags": ["latest"], "target": null});
        let parsed = parse_build(FieldPath::root().key("build"), &build, &mut sink).unwrap();
        assert_eq!(parsed.target(), None);
        assert!(sink.is_empty());

        let build = json!({"tags": ["latest"], "path": null});
        assert!(parse_build(FieldPath::root().key("build"), &build, &mut sink).is_none());
        assert_eq!(sink.found[0].path, "build.path");
        assert_eq!(sink.found[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_repo_must_parse_as_url() {
        let mut sink = Violations::default();
        let git = json!({"repo": "not a url", "tag": "v1"});
        assert!(parse_git(FieldPath::root().key("git"), &git, &mut sink).is_none());
        let git = json!({"repo": "", "tag": "v1"});
        assert!(parse_git(FieldPath::root().key("git"), &git, &mut sink).is_none());
        assert_eq!(sink.found.len(), 2);
        assert!(sink.found.iter().all(|v| v.path == "git.repo"));
        assert_eq!(sink.found[0].expected.as_deref(), Some("URL"));
    }

    #[test]
    fn test_repo_without_host_accepted() {
        let mut sink = Violations::default();
        let git = json!({"repo": "file:///srv/git/astroml.git", "tag": "v1"});
        let parsed = parse_git(FieldPath::root().key("git"), &git, &mut sink).unwrap();
        assert!(sink.is_empty());
        assert_eq!(parsed.repo().scheme(), "file");
        assert_eq!(parsed.repo_str(), "file:///srv/git/astroml.git");
    }

    #[test]
    fn test_failure_display_lists_every_violation() {
        let failure = validate_manifest(&json!({"name": ""})).unwrap_err();
        let text = failure.to_string();
        for path in ["name", "maintainers", "git", "build", "metadata"] {
            assert!(text.contains(&format!("{}: ", path)), "{} missing from {}", path, text);
        }
    }
}
