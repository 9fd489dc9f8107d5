// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decodes processed template text into resource documents

use crate::error::Result;
use crate::types::Resource;
use serde::Deserialize;
use serde_json::Value;

/// Decode every YAML document in `text`.
///
/// `Template` and `List` documents are replaced by their contained objects,
/// empty documents are skipped. Decoding errors are returned untouched so the
/// caller can attach the template name.
pub fn parse_documents(text: &str) -> std::result::Result<Vec<Value>, serde_yaml::Error> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

/// Turn decoded documents into resources, flattening container kinds
pub fn into_resources(documents: Vec<Value>) -> Result<Vec<Resource>> {
    let mut resources = Vec::with_capacity(documents.len());
    for document in documents {
        let resource = Resource::from_value(document)?;
        match resource.contained() {
            Some(objects) => resources.extend(into_resources(objects.to_vec())?),
            None => resources.push(resource),
        }
    }
    Ok(resources)
}
