// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::apply::{ApplyEvent, ApplyOptions, Applier};
use crate::error::Result;
use crate::kubernetes::ResourceClient;
use crate::resources::sort_by_kind;
use crate::template::Template;
use crate::types::{Resource, Variables};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Applies documents one by one through the cluster API, stopping at the first error
#[derive(Clone)]
pub struct DirectApplier {
    client: Arc<dyn ResourceClient>,
}

impl DirectApplier {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Apply already processed documents in the given order
    pub async fn apply_resources(&self, resources: &[Resource], opts: &ApplyOptions) -> Result<()> {
        for resource in resources {
            debug!("Applying {}", resource);
            self.client.apply(resource, opts).await?;
            let mut event = ApplyEvent::for_resource(resource);
            if event.namespace.is_none() && !resource.is_cluster_scoped() {
                event.namespace = opts.namespace.clone();
            }
            opts.report(&event);
        }
        Ok(())
    }
}

#[async_trait]
impl Applier for DirectApplier {
    #[instrument(skip(self, template, variables, opts), fields(template = %template.name, namespace = ?opts.namespace))]
    async fn apply(
        &self,
        template: &Template,
        variables: &Variables,
        opts: &ApplyOptions,
    ) -> Result<()> {
        let resources = sort_by_kind(template.process(variables)?);
        self.apply_resources(&resources, opts).await
    }
}
