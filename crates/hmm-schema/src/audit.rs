//! # Schema Audit
//!
//! Undeclared elements are reported as Warnings only where the governing
//! object schema sets `additionalProperties: false`. This module walks a
//! catalog schema and lists every object schema that leaves the setting
//! open, so catalog authors can see where unknown elements would pass
//! silently.
//!
//! Walked locations: `properties/*`, `$defs/*`, `definitions/*`, `items`,
//! and each branch of `allOf`/`anyOf`/`oneOf`. `$ref` targets are reached
//! through `$defs`, never followed.

use std::fmt;

use serde_json::Value;

/// An object schema that admits undeclared elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalPropertiesFinding {
    /// JSON Pointer path to the `additionalProperties` field.
    pub json_path: String,
    /// Current value of `additionalProperties`.
    pub current_value: String,
}

impl fmt::Display for AdditionalPropertiesFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {}: {} (set to false to report undeclared elements)",
            self.json_path, self.current_value
        )
    }
}

/// Audit every object schema in `schema`.
pub fn audit_additional_properties(schema: &Value) -> Vec<AdditionalPropertiesFinding> {
    let mut findings = Vec::new();
    walk(schema, "", &mut findings);
    findings
}

fn walk(schema: &Value, path: &str, findings: &mut Vec<AdditionalPropertiesFinding>) {
    let Value::Object(map) = schema else {
        return;
    };
    check_object(schema, path, findings);

    for keyword in ["properties", "$defs", "definitions"] {
        if let Some(Value::Object(children)) = map.get(keyword) {
            for (name, child) in children {
                walk(child, &format!("{path}/{keyword}/{}", escape(name)), findings);
            }
        }
    }
    if let Some(items) = map.get("items") {
        walk(items, &format!("{path}/items"), findings);
    }
    for keyword in ["allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(branches)) = map.get(keyword) {
            for (i, branch) in branches.iter().enumerate() {
                walk(branch, &format!("{path}/{keyword}/{i}"), findings);
            }
        }
    }
}

fn check_object(schema: &Value, path: &str, findings: &mut Vec<AdditionalPropertiesFinding>) {
    if !describes_object(schema) {
        return;
    }
    let current_value = match schema.get("additionalProperties") {
        Some(Value::Bool(false)) | Some(Value::Object(_)) => return,
        Some(other) => other.to_string(),
        None => "(absent, defaults to true)".to_string(),
    };
    findings.push(AdditionalPropertiesFinding {
        json_path: format!("{path}/additionalProperties"),
        current_value,
    });
}

fn describes_object(schema: &Value) -> bool {
    let typed_object = match schema.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    };
    typed_object || schema.get("properties").is_some() || schema.get("required").is_some()
}

fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
