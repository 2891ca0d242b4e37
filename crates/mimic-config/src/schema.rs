use schemars::schema::{RootSchema, Schema};
use schemars::schema_for;
use serde_json::json;

use crate::MimicConfig;

/// JSON schema for `mimic.toml`.
///
/// Intended for editor tooling (TOML JSON schema integration) and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(MimicConfig);
    apply_semantic_constraints(&mut schema);
    schema
}

fn apply_semantic_constraints(schema: &mut RootSchema) {
    // `before` / `after` overrides must name their insertion point.
    let Some(override_schema) = schema.definitions.get_mut("MethodOverride") else {
        return;
    };
    let Schema::Object(object) = override_schema else {
        return;
    };
    let constraint = json!({
        "if": {
            "required": ["mode"],
            "properties": { "mode": { "enum": ["before", "after"] } }
        },
        "then": {
            "required": ["insertion_point"],
            "properties": { "insertion_point": { "type": "string", "minLength": 1 } }
        }
    });
    if let Ok(constraint) = serde_json::from_value::<Schema>(constraint) {
        object
            .subschemas()
            .all_of
            .get_or_insert_with(Vec::new)
            .push(constraint);
    }
}
