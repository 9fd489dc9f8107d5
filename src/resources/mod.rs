// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Classification, grouping and ordering of resource documents.

use crate::constants::kinds;
use crate::error::{ProvisionError, Result};
use crate::types::Resource;
use std::collections::HashMap;

/// Selects documents by kind
#[derive(Debug, Clone, Copy)]
pub enum KindFilter<'a> {
    /// Keep documents whose kind is in the list
    Include(&'a [&'a str]),
    /// Keep documents whose kind is not in the list
    Exclude(&'a [&'a str]),
}

impl KindFilter<'_> {
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            KindFilter::Include(list) => resource.is_kind(list),
            KindFilter::Exclude(list) => !resource.is_kind(list),
        }
    }
}

/// The documents matching `filter`, in their original order
pub fn filter_by_kind(resources: &[Resource], filter: KindFilter<'_>) -> Vec<Resource> {
    resources
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

fn priority(resource: &Resource) -> u32 {
    resource
        .kind()
        .and_then(|kind| kinds::PRIORITY.iter().find(|(k, _)| *k == kind))
        .map(|(_, p)| *p)
        .unwrap_or(kinds::UNKNOWN_PRIORITY)
}

/// Stable sort so namespaces and access control come before workloads
pub fn sort_by_kind(mut resources: Vec<Resource>) -> Vec<Resource> {
    resources.sort_by_key(priority);
    resources
}

/// All documents destined for one namespace
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceGroup {
    pub namespace: String,
    pub resources: Vec<Resource>,
}

/// Namespace a document belongs to.
///
/// Namespace-establishing documents without an explicit namespace belong to
/// the namespace they create.
pub fn target_namespace(resource: &Resource) -> Result<String> {
    if let Some(namespace) = resource.namespace() {
        return Ok(namespace.to_string());
    }
    if resource.is_namespace_establishing() {
        if let Some(name) = resource.name() {
            return Ok(name.to_string());
        }
    }
    Err(ProvisionError::UnassignedNamespace {
        kind: resource.kind().unwrap_or("<no kind>").to_string(),
        name: resource.name().unwrap_or("<no name>").to_string(),
    })
}

/// Group documents by target namespace and sort each group by kind priority.
///
/// Groups are returned in the order their namespace first appears.
pub fn group_and_sort(resources: Vec<Resource>) -> Result<Vec<NamespaceGroup>> {
    let mut groups: Vec<NamespaceGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for resource in resources {
        let namespace = target_namespace(&resource)?;
        match index.get(&namespace) {
            Some(&i) => groups[i].resources.push(resource),
            None => {
                index.insert(namespace.clone(), groups.len());
                groups.push(NamespaceGroup {
                    namespace,
                    resources: vec![resource],
                });
            }
        }
    }

    for group in &mut groups {
        group.resources = sort_by_kind(std::mem::take(&mut group.resources));
    }
    Ok(groups)
}
