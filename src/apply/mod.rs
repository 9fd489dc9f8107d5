// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Strategies that push a processed template into the cluster.
//!
//! - [`DirectApplier`] applies every document through the cluster API and
//!   returns the first error.
//! - [`DeferredApplier`] runs the same work as a spawned task and hands back a
//!   [`PendingApply`] that is awaited later.
//! - [`CliApplier`] pipes the template through `oc process | oc apply` for
//!   idempotent updates.

pub mod cli;
pub mod deferred;
pub mod direct;

pub use cli::CliApplier;
pub use deferred::{DeferredApplier, PendingApply};
pub use direct::DirectApplier;

use crate::error::Result;
use crate::template::Template;
use crate::types::{Resource, Variables};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Reported after each document is accepted by the cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyEvent {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl ApplyEvent {
    pub fn for_resource(resource: &Resource) -> Self {
        Self {
            kind: resource.kind().unwrap_or_default().to_string(),
            name: resource.name().unwrap_or_default().to_string(),
            namespace: resource.namespace().map(str::to_string),
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(&ApplyEvent) + Send + Sync>;

/// Target cluster, credential and namespace for an apply
#[derive(Clone)]
pub struct ApplyOptions {
    pub cluster_url: String,
    pub token: String,
    /// Namespace used for namespaced documents that do not name one
    pub namespace: Option<String>,
    pub progress: Option<ProgressCallback>,
}

impl ApplyOptions {
    pub fn new(cluster_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            cluster_url: cluster_url.into(),
            token: token.into(),
            namespace: None,
            progress: None,
        }
    }

    /// Same target with a different credential, e.g. the user scope derived from the master scope
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..self.clone()
        }
    }

    pub fn with_namespace(&self, namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..self.clone()
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn report(&self, event: &ApplyEvent) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }
}

impl fmt::Debug for ApplyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyOptions")
            .field("cluster_url", &self.cluster_url)
            .field("namespace", &self.namespace)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

/// Pushes a template into the cluster
#[async_trait]
pub trait Applier: Send + Sync {
    async fn apply(
        &self,
        template: &Template,
        variables: &Variables,
        opts: &ApplyOptions,
    ) -> Result<()>;
}
