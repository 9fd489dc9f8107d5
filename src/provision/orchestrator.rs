// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::apply::{
    Applier, ApplyOptions, CliApplier, DeferredApplier, DirectApplier, ProgressCallback,
};
use crate::config::Config;
use crate::constants::kinds;
use crate::error::Result;
use crate::kubernetes::{
    connect, IngressSsoDiscovery, KubeResourceClient, ResourceClient, SsoDiscovery, StaticSso,
};
use crate::resources::{filter_by_kind, group_and_sort, KindFilter, NamespaceGroup};
use crate::template::{TemplateCatalog, TemplateLoader, TenantTemplates};
use crate::types::{NamespaceType, Resource, Tenant};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

/// Kinds handled by the first two phases of a user namespace
const PHASED_KINDS: &[&str] = &[
    kinds::PROJECT_REQUEST,
    kinds::NAMESPACE,
    kinds::ROLE_BINDING_RESTRICTION,
];

/// Provisions and updates the namespaces of a tenant
pub struct Provisioner {
    pub(super) config: Config,
    pub(super) loader: TemplateLoader,
    pub(super) direct: DirectApplier,
    pub(super) deferred: DeferredApplier,
    pub(super) cli: Arc<dyn Applier>,
    pub(super) progress: Option<ProgressCallback>,
}

impl Provisioner {
    pub fn new(config: Config, loader: TemplateLoader, client: Arc<dyn ResourceClient>) -> Self {
        let direct = DirectApplier::new(client);
        Self {
            cli: Arc::new(CliApplier::from_config(&config)),
            deferred: DeferredApplier::new(direct.clone()),
            direct,
            loader,
            config,
            progress: None,
        }
    }

    /// Wire the provisioner to the configured template sources and cluster
    pub fn from_config(config: Config) -> Result<Self> {
        let source = Arc::new(TemplateCatalog::from_config(&config));
        let sso: Arc<dyn SsoDiscovery> = match &config.keycloak_url {
            Some(url) => Arc::new(StaticSso::new(url)),
            None => {
                let client = connect(&ApplyOptions::new(&config.cluster_url, &config.master_token))?;
                Arc::new(IngressSsoDiscovery::new(
                    client,
                    &config.keycloak_namespace,
                    &config.keycloak_ingress,
                ))
            }
        };
        let loader = TemplateLoader::new(source, sso, config.clone());
        Ok(Self::new(config, loader, Arc::new(KubeResourceClient::new())))
    }

    /// Replace the applier used for tool updates
    pub fn with_cli_applier(mut self, cli: Arc<dyn Applier>) -> Self {
        self.cli = cli;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Options carrying the administrative credential
    pub fn master_options(&self) -> ApplyOptions {
        let opts = ApplyOptions::new(&self.config.cluster_url, &self.config.master_token);
        match &self.progress {
            Some(progress) => opts.with_progress(progress.clone()),
            None => opts,
        }
    }

    /// Load the tenant's templates after checking the tenant has a usable project name
    pub(super) async fn load_templates(&self, tenant: &Tenant) -> Result<TenantTemplates> {
        tenant.validate()?;
        self.loader
            .load(tenant.variables(&self.config.master_user))
            .await
    }

    /// Provision every namespace of `tenant` concurrently.
    ///
    /// Loading and processing errors are returned. Once namespaces are being
    /// provisioned a failure only stops the namespace it happened in and is
    /// logged; the call still succeeds.
    #[instrument(skip(self, tenant, user_token), fields(tenant = %tenant.username))]
    pub async fn provision(&self, tenant: &Tenant, user_token: &str) -> Result<()> {
        let templates = self.load_templates(tenant).await?;

        let mut resources = Vec::new();
        for template in templates.all() {
            resources.extend(template.process(&templates.variables)?);
        }
        let groups = group_and_sort(resources)?;

        let project = tenant.project_name();
        let master = self.master_options();
        let user = master.with_token(user_token);

        let mut tasks = JoinSet::new();
        for group in groups {
            let namespace_type = NamespaceType::classify(&group.namespace, &project);
            let master = master.with_namespace(&group.namespace);
            let user = user.with_namespace(&group.namespace);
            let direct = self.direct.clone();
            debug!("Starting {} namespace {}", namespace_type, group.namespace);
            tasks.spawn(provision_namespace(direct, namespace_type, group, master, user));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Namespace task ended abnormally: {}", e);
            }
        }

        info!("Provisioned tenant {}", tenant.username);
        Ok(())
    }
}

struct Phase<'a> {
    purpose: &'static str,
    resources: Vec<Resource>,
    opts: &'a ApplyOptions,
}

/// Split a namespace group into its ordered apply phases
fn phases<'a>(
    namespace_type: NamespaceType,
    group: &NamespaceGroup,
    master: &'a ApplyOptions,
    user: &'a ApplyOptions,
) -> Vec<Phase<'a>> {
    match namespace_type {
        NamespaceType::User => vec![
            Phase {
                purpose: "create namespace",
                resources: filter_by_kind(
                    &group.resources,
                    KindFilter::Include(kinds::NAMESPACE_ESTABLISHING),
                ),
                opts: user,
            },
            Phase {
                purpose: "apply role binding restrictions",
                resources: filter_by_kind(
                    &group.resources,
                    KindFilter::Include(&[kinds::ROLE_BINDING_RESTRICTION]),
                ),
                opts: master,
            },
            Phase {
                purpose: "apply namespace resources",
                resources: filter_by_kind(&group.resources, KindFilter::Exclude(PHASED_KINDS)),
                opts: user,
            },
        ],
        _ => vec![Phase {
            purpose: "apply namespace resources",
            resources: group.resources.clone(),
            opts: master,
        }],
    }
}

async fn provision_namespace(
    direct: DirectApplier,
    namespace_type: NamespaceType,
    group: NamespaceGroup,
    master: ApplyOptions,
    user: ApplyOptions,
) {
    let namespace = group.namespace.as_str();
    for phase in phases(namespace_type, &group, &master, &user) {
        if phase.resources.is_empty() {
            continue;
        }
        if let Err(e) = direct.apply_resources(&phase.resources, phase.opts).await {
            error!(namespace, phase = phase.purpose, "Failed to provision namespace: {}", e);
            return;
        }
    }
    info!(namespace, "Provisioned {} namespace", namespace_type);
}
