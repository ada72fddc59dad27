//! Schema Export - JSON Schema (draft 2020-12) for manifest documents
//!
//! Rendered from the field tables the validator reads, for editors, CI
//! linters and documentation sites. Carries no validation logic of its own.

use serde_json::{json, Map, Value};

use crate::fields::{FieldKind, FieldSpec, Presence, Record};
use crate::platform::{Architecture, Builder, ClosedDomain};
use crate::SCHEMA_ID;

pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

fn def_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/$defs/{}", name) })
}

fn kind_schema(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => json!({ "type": "string" }),
        FieldKind::NonEmptyText => json!({ "type": "string", "minLength": 1 }),
        FieldKind::Url => json!({ "type": "string", "format": "uri", "minLength": 1 }),
        FieldKind::Number => json!({ "type": "number" }),
        FieldKind::Builder => def_ref("Builder"),
        FieldKind::Architectures => json!({
            "type": "array",
            "items": def_ref("Architecture"),
            "minItems": 1,
            "uniqueItems": true,
        }),
        FieldKind::Tags => json!({
            "type": "array",
            "items": { "type": "string", "minLength": 1 },
            "minItems": 1,
        }),
        FieldKind::TextMap => json!({
            "type": "object",
            "additionalProperties": { "type": "string" },
        }),
        FieldKind::Maintainers => json!({
            "type": "array",
            "items": def_ref(Record::Maintainer.name()),
            "minItems": 1,
        }),
        FieldKind::Record(record) => def_ref(record.name()),
        FieldKind::Test => json!({
            "anyOf": [{ "type": "string" }, def_ref(Record::Run.name())],
        }),
    }
}

fn field_schema(field: &FieldSpec) -> Value {
    let base = kind_schema(field.kind);
    let mut schema = match field.presence {
        // Optional fields accept an explicit null.
        Presence::Optional => {
            let mut m = Map::new();
            m.insert("anyOf".into(), json!([base, { "type": "null" }]));
            m
        }
        Presence::Required | Presence::Defaulted(_) => match base {
            Value::Object(m) => m,
            other => {
                let mut m = Map::new();
                m.insert("allOf".into(), json!([other]));
                m
            }
        },
    };
    if let Some(title) = field.title {
        schema.insert("title".into(), json!(title));
    }
    if !field.description.is_empty() {
        schema.insert("description".into(), json!(field.description));
    }
    match field.presence {
        Presence::Defaulted(default) => {
            schema.insert("default".into(), default.to_json());
        }
        Presence::Optional => {
            schema.insert("default".into(), Value::Null);
        }
        Presence::Required => {}
    }
    if !field.examples.is_empty() {
        schema.insert("examples".into(), json!(field.examples));
    }
    Value::Object(schema)
}

fn record_schema(record: Record) -> Map<String, Value> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in record.fields() {
        properties.insert(field.name.to_string(), field_schema(field));
        if field.is_required() {
            required.push(json!(field.name));
        }
    }

    let mut schema = Map::new();
    schema.insert("title".into(), json!(record.name()));
    schema.insert("description".into(), json!(record.description()));
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema.insert("additionalProperties".into(), json!(false));

    if record == Record::Git {
        schema.insert(
            "oneOf".into(),
            json!([
                { "required": ["sha"], "properties": { "sha": { "type": "string" } } },
                { "required": ["tag"], "properties": { "tag": { "type": "string" } } },
            ]),
        );
    }
    schema
}

fn domain_schema<T: ClosedDomain>(title: &str, description: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "type": "string",
        "enum": T::allowed(),
    })
}

/// The full manifest schema document.
pub fn emit_schema() -> Value {
    let mut defs = Map::new();
    for record in Record::ALL {
        if record != Record::Manifest {
            defs.insert(record.name().to_string(), Value::Object(record_schema(record)));
        }
    }
    defs.insert(
        "Architecture".into(),
        domain_schema::<Architecture>("Architecture", "Container Architectures."),
    );
    defs.insert(
        "Builder".into(),
        domain_schema::<Builder>("Builder", "Docker build backends."),
    );

    let mut root = Map::new();
    root.insert("$schema".into(), json!(JSON_SCHEMA_DIALECT));
    root.insert("$id".into(), json!(SCHEMA_ID));
    root.extend(record_schema(Record::Manifest));
    root.insert("$defs".into(), Value::Object(defs));

    tracing::trace!(definitions = root.len(), "manifest schema rendered");
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let schema = emit_schema();
        assert_eq!(schema["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(schema["$id"], SCHEMA_ID);
        assert_eq!(schema["title"], "Manifest");
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_enums_rendered() {
        let schema = emit_schema();
        assert_eq!(
            schema["$defs"]["Builder"]["enum"],
            json!(["buildkit", "classic", "oci-import"])
        );
        assert_eq!(
            schema["$defs"]["Architecture"]["enum"],
            json!(["amd64", "arm32v5", "arm32v6", "arm32v7", "arm64v8", "windows-amd64"])
        );
    }

    #[test]
    fn test_defaults_and_optionals() {
        let schema = emit_schema();
        let build = &schema["$defs"]["Build"]["properties"];
        assert_eq!(build["path"]["default"], ".");
        assert_eq!(build["builder"]["default"], "buildkit");
        assert_eq!(build["builder"]["$ref"], "#/$defs/Builder");
        assert_eq!(build["platforms"]["default"], json!(["amd64"]));
        assert_eq!(build["target"]["anyOf"][1], json!({"type": "null"}));
        assert_eq!(schema["properties"]["version"]["default"], json!(0.2));
        assert_eq!(
            schema["$defs"]["Git"]["properties"]["fetch"]["default"],
            "refs/heads/main"
        );
    }

    #[test]
    fn test_git_one_of() {
        let schema = emit_schema();
        let one_of = schema["$defs"]["Git"]["oneOf"].as_array().unwrap();
        assert_eq!(one_of.len(), 2);
        assert_eq!(schema["$defs"]["Git"]["required"], json!(["repo"]));
    }
}
