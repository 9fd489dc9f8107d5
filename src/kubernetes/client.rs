// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation and generic resource apply

use crate::apply::ApplyOptions;
use crate::constants::{kinds, FIELD_MANAGER};
use crate::error::{ProvisionError, Result};
use crate::kubernetes::projects::ensure_project_exists;
use crate::types::Resource;
use async_trait::async_trait;
use kube::{
    api::{ApiResource, DynamicObject, Patch, PatchParams},
    core::GroupVersionKind,
    Api, Client, Config as KConfig,
};
use tracing::{debug, instrument};

/// Applies a single resource document to the cluster
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn apply(&self, resource: &Resource, opts: &ApplyOptions) -> Result<()>;
}

/// Create a client for the cluster and credential in `opts`
pub fn connect(opts: &ApplyOptions) -> Result<Client> {
    let cluster_url: http::Uri = opts.cluster_url.parse().map_err(|e| {
        ProvisionError::ClientConfigError(format!("Invalid URL {}: {}", opts.cluster_url, e))
    })?;

    let mut config = KConfig::new(cluster_url);
    config.auth_info.token = Some(opts.token.clone().into());
    if let Some(namespace) = &opts.namespace {
        config.default_namespace = namespace.clone();
    }

    Client::try_from(config)
        .map_err(|e| ProvisionError::ClientConfigError(format!("Failed to create client: {}", e)))
}

/// Split an `apiVersion` into group and version
pub fn group_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

pub(crate) fn api_resource(resource: &Resource) -> Result<ApiResource> {
    let api_version = resource.api_version().ok_or_else(|| {
        ProvisionError::InvalidResource(format!("{} has no apiVersion", resource))
    })?;
    let kind = resource
        .kind()
        .ok_or_else(|| ProvisionError::InvalidResource(format!("{} has no kind", resource)))?;
    let (group, version) = group_version(api_version);
    Ok(ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, kind)))
}

pub(crate) fn to_dynamic(resource: &Resource) -> Result<DynamicObject> {
    serde_json::from_value(resource.as_value())
        .map_err(|e| ProvisionError::InvalidResource(format!("{}: {}", resource, e)))
}

/// Applies documents with server-side apply through kube-rs
#[derive(Clone, Default)]
pub struct KubeResourceClient {
    client: Option<Client>,
}

impl KubeResourceClient {
    /// Connect per call using the URL and token of the apply options
    pub fn new() -> Self {
        Self { client: None }
    }

    /// Always use `client`, ignoring the credential in the apply options
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    fn client_for(&self, opts: &ApplyOptions) -> Result<Client> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => connect(opts),
        }
    }
}

#[async_trait]
impl ResourceClient for KubeResourceClient {
    #[instrument(skip(self, resource, opts), fields(resource = %resource))]
    async fn apply(&self, resource: &Resource, opts: &ApplyOptions) -> Result<()> {
        let name = resource
            .name()
            .ok_or_else(|| ProvisionError::InvalidResource(format!("{} has no name", resource)))?;
        let ar = api_resource(resource)?;
        let client = self.client_for(opts)?;

        if resource.is_kind(&[kinds::PROJECT_REQUEST]) {
            return ensure_project_exists(&client, resource).await;
        }

        let mut resource = resource.clone();
        let api: Api<DynamicObject> = if resource.is_cluster_scoped() {
            Api::all_with(client, &ar)
        } else {
            let namespace = resource
                .namespace()
                .map(str::to_string)
                .or_else(|| opts.namespace.clone())
                .ok_or_else(|| {
                    ProvisionError::InvalidResource(format!("{} has no namespace", resource))
                })?;
            resource.set_namespace(&namespace);
            Api::namespaced_with(client, &namespace, &ar)
        };

        let object = to_dynamic(&resource)?;
        let pp = PatchParams::apply(FIELD_MANAGER).force();
        api.patch(name, &pp, &Patch::Apply(&object)).await?;

        debug!(
            "Applied {} in {}",
            resource,
            resource.namespace().unwrap_or("<cluster>")
        );
        Ok(())
    }
}
