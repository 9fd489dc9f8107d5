// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tenant identity, namespace naming and template variables

use crate::constants::{namespaces, vars};
use crate::error::{ProvisionError, Result};
use std::collections::BTreeMap;

/// The user whose namespaces are being provisioned
#[derive(Debug, Clone)]
pub struct Tenant {
    pub username: String,
    /// Caller-supplied variables; never override the base set
    pub extra_vars: BTreeMap<String, String>,
}

impl Tenant {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            extra_vars: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_vars.insert(name.into(), value.into());
        self
    }

    /// Project name derived from the username
    pub fn project_name(&self) -> String {
        let local = self.username.split('@').next().unwrap_or_default();
        let sanitized: String = local
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        sanitized.trim_matches('-').to_string()
    }

    /// Reject usernames whose project name would be empty
    pub fn validate(&self) -> Result<()> {
        if self.project_name().is_empty() {
            return Err(ProvisionError::InvalidTenant(self.username.clone()));
        }
        Ok(())
    }

    pub fn user_namespace(&self) -> String {
        self.project_name()
    }

    pub fn jenkins_namespace(&self) -> String {
        format!("{}{}", self.project_name(), namespaces::JENKINS_SUFFIX)
    }

    pub fn che_namespace(&self) -> String {
        format!("{}{}", self.project_name(), namespaces::CHE_SUFFIX)
    }

    /// Base variables overlaid with the tenant's extra variables
    pub fn variables(&self, admin_user: &str) -> Variables {
        let project = self.project_name();
        let mut variables = Variables::default();
        variables.set(vars::PROJECT_NAME, &project);
        variables.set(vars::PROJECT_DISPLAYNAME, &project);
        variables.set(vars::PROJECT_DESCRIPTION, &project);
        variables.set(vars::PROJECT_USER, &self.username);
        variables.set(vars::PROJECT_REQUESTING_USER, &self.username);
        variables.set(vars::PROJECT_ADMIN_USER, admin_user);

        for (name, value) in &self.extra_vars {
            variables.set_if_absent(name, value);
        }
        variables
    }
}

/// Placeholder name to value mapping used for template substitution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(BTreeMap<String, String>);

impl Variables {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn set_if_absent(&mut self, name: &str, value: &str) {
        self.0
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
