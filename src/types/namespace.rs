// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::namespaces;
use std::fmt;

/// Role a namespace plays for its tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceType {
    /// The tenant's personal project
    User,
    Jenkins,
    Che,
    Team,
}

impl NamespaceType {
    /// Classify `namespace` relative to the tenant's project name
    pub fn classify(namespace: &str, project_name: &str) -> Self {
        if namespace == project_name {
            return NamespaceType::User;
        }
        match namespace.strip_prefix(project_name) {
            Some(namespaces::JENKINS_SUFFIX) => NamespaceType::Jenkins,
            Some(namespaces::CHE_SUFFIX) => NamespaceType::Che,
            _ => NamespaceType::Team,
        }
    }
}

impl fmt::Display for NamespaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamespaceType::User => "user",
            NamespaceType::Jenkins => "jenkins",
            NamespaceType::Che => "che",
            NamespaceType::Team => "team",
        };
        f.write_str(name)
    }
}
