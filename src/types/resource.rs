// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Loosely-typed cluster resource document

use crate::constants::kinds;
use crate::error::{ProvisionError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// A single cluster resource of any shape.
///
/// The body is always a JSON object; only `apiVersion`, `kind` and the
/// `metadata` name/namespace are interpreted by the provisioner.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    body: Map<String, Value>,
}

impl Resource {
    /// Wrap a decoded document, rejecting anything that is not a mapping
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            other => Err(ProvisionError::InvalidResource(format!(
                "expected a mapping, found {}",
                type_name(&other)
            ))),
        }
    }

    pub fn api_version(&self) -> Option<&str> {
        self.body.get("apiVersion").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.body.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace").filter(|ns| !ns.is_empty())
    }

    pub fn set_namespace(&mut self, namespace: &str) {
        let metadata = self
            .body
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(meta) = metadata {
            meta.insert("namespace".to_string(), Value::String(namespace.to_string()));
        }
    }

    /// True when the kind is one of `kinds`
    pub fn is_kind(&self, kinds: &[&str]) -> bool {
        self.kind().is_some_and(|k| kinds.contains(&k))
    }

    /// Documents of this kind create the namespace named after them
    pub fn is_namespace_establishing(&self) -> bool {
        self.is_kind(kinds::NAMESPACE_ESTABLISHING)
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.is_kind(kinds::CLUSTER_SCOPED)
    }

    /// Nested documents of a `Template` (`objects`) or `List` (`items`)
    pub fn contained(&self) -> Option<&[Value]> {
        let field = match self.kind()? {
            kinds::TEMPLATE => "objects",
            kinds::LIST => "items",
            _ => return None,
        };
        Some(
            self.body
                .get(field)
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice),
        )
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.body.clone())
    }

    fn metadata_str(&self, field: &str) -> Option<&str> {
        self.body
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.kind().unwrap_or("<no kind>"),
            self.name().unwrap_or("<no name>")
        )
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
