// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template-at-a-time provisioning into the tenant's fixed namespaces.
//!
//! Every step runs even when an earlier one failed. Failures are collected
//! and returned together once all steps, including dispatched background
//! applies, have finished.

use crate::apply::{Applier, ApplyOptions, PendingApply};
use crate::error::Result;
use crate::provision::{FailureCollector, Provisioner};
use crate::template::{Template, TenantTemplates};
use crate::types::{Tenant, Variables};
use tracing::{debug, info, instrument};

impl Provisioner {
    /// Create a new tenant's namespaces, one template at a time
    #[instrument(skip(self, tenant, user_token), fields(tenant = %tenant.username))]
    pub async fn init_tenant(&self, tenant: &Tenant, user_token: &str) -> Result<()> {
        let templates = self.load_templates(tenant).await?;
        let vars = &templates.variables;
        let master = self.master_options();
        let user_ns = tenant.user_namespace();
        let failures = FailureCollector::new();

        let user = master.with_token(user_token).with_namespace(&user_ns);
        self.step(&failures, &self.direct, &templates.user_project, vars, &user)
            .await;

        let project = master.with_namespace(&user_ns);
        for template in [&templates.role_bindings, &templates.collaborators]
            .into_iter()
            .flatten()
        {
            self.step(&failures, &self.direct, template, vars, &project)
                .await;
        }
        self.step(&failures, &self.direct, &templates.team, vars, &project)
            .await;

        self.apply_quotas(&failures, tenant, &templates, &master).await;

        let pending = [
            self.deferred.dispatch(
                templates.jenkins.clone(),
                vars.clone(),
                master.with_namespace(&tenant.jenkins_namespace()),
            ),
            self.deferred.dispatch(
                templates.che.clone(),
                vars.clone(),
                master.with_namespace(&tenant.che_namespace()),
            ),
        ];

        if let Some(expose) = &templates.expose {
            self.step(&failures, &self.direct, expose, vars, &project)
                .await;
        }

        drain(&failures, pending).await;
        failures.finish()?;
        info!("Initialized tenant {}", tenant.username);
        Ok(())
    }

    /// Re-apply the tenant's tool templates over existing namespaces
    #[instrument(skip(self, tenant), fields(tenant = %tenant.username))]
    pub async fn update_tenant(&self, tenant: &Tenant) -> Result<()> {
        let templates = self.load_templates(tenant).await?;
        let vars = &templates.variables;
        let master = self.master_options();
        let failures = FailureCollector::new();

        self.apply_quotas(&failures, tenant, &templates, &master).await;

        let cli = self.cli.as_ref();
        self.step(
            &failures,
            cli,
            &templates.jenkins,
            vars,
            &master.with_namespace(&tenant.jenkins_namespace()),
        )
        .await;
        self.step(
            &failures,
            cli,
            &templates.che,
            vars,
            &master.with_namespace(&tenant.che_namespace()),
        )
        .await;

        if let Some(expose) = &templates.expose {
            let project = master.with_namespace(&tenant.user_namespace());
            self.step(&failures, &self.direct, expose, vars, &project)
                .await;
        }

        failures.finish()?;
        info!("Updated tenant {}", tenant.username);
        Ok(())
    }

    async fn apply_quotas(
        &self,
        failures: &FailureCollector,
        tenant: &Tenant,
        templates: &TenantTemplates,
        master: &ApplyOptions,
    ) {
        let quotas = [
            (&templates.jenkins_quotas, tenant.jenkins_namespace()),
            (&templates.che_quotas, tenant.che_namespace()),
        ];
        for (template, namespace) in quotas {
            if let Some(template) = template {
                let opts = master.with_namespace(&namespace);
                self.step(failures, &self.direct, template, &templates.variables, &opts)
                    .await;
            }
        }
    }

    async fn step(
        &self,
        failures: &FailureCollector,
        applier: &dyn Applier,
        template: &Template,
        variables: &Variables,
        opts: &ApplyOptions,
    ) {
        let namespace = opts.namespace.as_deref().unwrap_or_default();
        debug!("Applying {} to {}", template.name, namespace);
        if let Err(e) = applier.apply(template, variables, opts).await {
            failures.record(&template.name, namespace, e);
        }
    }
}

/// Wait for every dispatched apply and record the ones that failed
async fn drain<I>(failures: &FailureCollector, pending: I)
where
    I: IntoIterator<Item = PendingApply>,
{
    for apply in pending {
        let label = apply.label().to_string();
        let namespace = apply.namespace().to_string();
        if let Err(e) = apply.wait().await {
            failures.record(&label, &namespace, e);
        }
    }
}
