// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolves the set of templates a tenant needs for the configured cluster flavor.

use crate::config::{ClusterFlavor, Config};
use crate::constants::{templates, vars};
use crate::error::Result;
use crate::kubernetes::SsoDiscovery;
use crate::template::{Template, TemplateSource};
use crate::types::Variables;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Every template loaded for one tenant, with the variables to process them with
#[derive(Debug, Clone)]
pub struct TenantTemplates {
    pub variables: Variables,
    pub user_project: Template,
    /// Not loaded on Kubernetes
    pub role_bindings: Option<Template>,
    /// Not loaded on Kubernetes
    pub collaborators: Option<Template>,
    pub team: Template,
    pub jenkins: Template,
    pub che: Template,
    pub jenkins_quotas: Option<Template>,
    pub che_quotas: Option<Template>,
    /// Only loaded on Kubernetes
    pub expose: Option<Template>,
}

impl TenantTemplates {
    /// All loaded templates in load order
    pub fn all(&self) -> Vec<&Template> {
        let mut all = vec![&self.user_project];
        all.extend(self.role_bindings.as_ref());
        all.extend(self.collaborators.as_ref());
        all.push(&self.team);
        all.push(&self.jenkins);
        all.push(&self.che);
        all.extend(self.jenkins_quotas.as_ref());
        all.extend(self.che_quotas.as_ref());
        all.extend(self.expose.as_ref());
        all
    }
}

pub struct TemplateLoader {
    source: Arc<dyn TemplateSource>,
    sso: Arc<dyn SsoDiscovery>,
    config: Config,
}

impl TemplateLoader {
    pub fn new(source: Arc<dyn TemplateSource>, sso: Arc<dyn SsoDiscovery>, config: Config) -> Self {
        Self { source, sso, config }
    }

    fn flavored(&self, base: &str) -> String {
        format!(
            "{}{}-{}.yml",
            templates::PREFIX,
            base,
            self.config.flavor().template_suffix()
        )
    }

    async fn fetch(&self, name: &str) -> Result<Template> {
        debug!("Loading template {}", name);
        self.source.fetch(name).await
    }

    /// Load the tenant's templates; the first failing lookup aborts the load
    #[instrument(skip(self, variables), fields(flavor = ?self.config.flavor()))]
    pub async fn load(&self, mut variables: Variables) -> Result<TenantTemplates> {
        let kubernetes = self.config.flavor() == ClusterFlavor::Kubernetes;

        if kubernetes {
            let url = self.sso.discover().await?;
            variables.set(vars::KEYCLOAK_URL, &url);
        }

        let user_project = self.fetch(&self.flavored(templates::USER_PROJECT)).await?;
        let (role_bindings, collaborators) = if kubernetes {
            (None, None)
        } else {
            (
                Some(self.fetch(templates::ROLE_BINDINGS).await?),
                Some(self.fetch(templates::COLLABORATORS).await?),
            )
        };
        let team = self.fetch(&self.flavored(templates::TEAM)).await?;
        let jenkins = self.fetch(&self.flavored(templates::JENKINS)).await?;
        let che = self.fetch(&self.flavored(templates::CHE)).await?;

        let (jenkins_quotas, che_quotas) = if self.config.quotas_enabled() {
            (
                Some(self.fetch(templates::JENKINS_QUOTAS).await?),
                Some(self.fetch(templates::CHE_QUOTAS).await?),
            )
        } else {
            (None, None)
        };

        let expose = if kubernetes {
            let expose = self.fetch(templates::EXPOSE).await?;
            variables.set(vars::EXPOSER, &self.config.exposer);
            variables.set(vars::DOMAIN, &self.config.expose_domain);
            Some(expose)
        } else {
            None
        };

        let loaded = TenantTemplates {
            variables,
            user_project,
            role_bindings,
            collaborators,
            team,
            jenkins,
            che,
            jenkins_quotas,
            che_quotas,
            expose,
        };
        info!("Loaded {} templates", loaded.all().len());
        Ok(loaded)
    }
}
