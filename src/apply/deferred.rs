// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::apply::{ApplyOptions, Applier, DirectApplier};
use crate::error::{ProvisionError, Result};
use crate::template::Template;
use crate::types::Variables;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Runs a direct apply as its own task
#[derive(Clone)]
pub struct DeferredApplier {
    inner: DirectApplier,
}

impl DeferredApplier {
    pub fn new(inner: DirectApplier) -> Self {
        Self { inner }
    }

    /// Start applying `template` and return a handle to its single outcome
    pub fn dispatch(
        &self,
        template: Template,
        variables: Variables,
        opts: ApplyOptions,
    ) -> PendingApply {
        let label = template.name.clone();
        let namespace = opts.namespace.clone().unwrap_or_default();
        let inner = self.inner.clone();

        debug!("Dispatching {} to {}", label, namespace);
        let task = tokio::spawn(async move { inner.apply(&template, &variables, &opts).await });

        PendingApply {
            label,
            namespace,
            task,
        }
    }
}

#[async_trait]
impl Applier for DeferredApplier {
    async fn apply(
        &self,
        template: &Template,
        variables: &Variables,
        opts: &ApplyOptions,
    ) -> Result<()> {
        self.dispatch(template.clone(), variables.clone(), opts.clone())
            .wait()
            .await
    }
}

/// Outcome of a dispatched apply, available once the task finishes.
///
/// Dropping the handle before the outcome was received aborts the task.
#[derive(Debug)]
pub struct PendingApply {
    label: String,
    namespace: String,
    task: JoinHandle<Result<()>>,
}

impl PendingApply {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Wait for the task; a task that ends without reporting counts as failed
    pub async fn wait(mut self) -> Result<()> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Apply task for {} ended abnormally: {}", self.label, e);
                Err(ProvisionError::TaskLost(self.label.clone()))
            }
        }
    }
}

impl Drop for PendingApply {
    fn drop(&mut self) {
        self.task.abort();
    }
}
