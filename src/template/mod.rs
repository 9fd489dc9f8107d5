// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template loading, variable substitution and document parsing.

pub mod catalog;
pub mod loader;
pub mod parser;
pub mod substitute;

pub use catalog::{TemplateCatalog, TemplateSource};
pub use loader::{TemplateLoader, TenantTemplates};
pub use substitute::substitute;

use crate::error::{ProvisionError, Result};
use crate::types::{Resource, Variables};

/// Raw template text keyed by its catalog name
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub content: String,
}

impl Template {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self> {
        let content = String::from_utf8(bytes)
            .map_err(|_| ProvisionError::TemplateEncodingError(name.to_string()))?;
        Ok(Self::new(name, content))
    }

    /// Substitute `variables` and decode the result into resources
    pub fn process(&self, variables: &Variables) -> Result<Vec<Resource>> {
        let text = substitute(&self.content, variables);
        let documents =
            parser::parse_documents(&text).map_err(|source| ProvisionError::ParseError {
                template: self.name.clone(),
                source,
            })?;
        parser::into_resources(documents).map_err(|e| match e {
            ProvisionError::InvalidResource(msg) => {
                ProvisionError::InvalidResource(format!("{} in template {}", msg, self.name))
            }
            other => other,
        })
    }
}
