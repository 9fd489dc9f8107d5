// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::constants::env as keys;

const DEFAULT_TEMPLATE_REPO_URL: &str = "https://repo1.maven.org/maven2/io/fabric8/tenant/packages";

/// Which cluster API dialect the tenant namespaces are provisioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterFlavor {
    OpenShift,
    Kubernetes,
}

impl ClusterFlavor {
    /// Suffix of the flavor-specific template file names
    pub fn template_suffix(&self) -> &'static str {
        match self {
            ClusterFlavor::OpenShift => "openshift",
            ClusterFlavor::Kubernetes => "kubernetes",
        }
    }
}

/// Provisioner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the cluster API
    pub cluster_url: String,
    /// Administrative bearer token
    pub master_token: String,
    /// Admin user placed in the PROJECT_ADMIN_USER variable
    pub master_user: String,
    pub kubernetes_mode: bool,
    pub disable_quotas: bool,
    /// Pass an insecure TLS flag to the CLI pipeline
    pub skip_host_verify: bool,
    /// Directory whose templates override the bundled ones
    pub template_dir: Option<PathBuf>,
    pub template_repo_url: String,
    /// When set, templates are fetched from the artifact repository at this version
    pub template_version: Option<String>,
    pub oc_path: String,
    /// Fixed single-sign-on endpoint, skips discovery when set
    pub keycloak_url: Option<String>,
    pub keycloak_namespace: String,
    pub keycloak_ingress: String,
    pub expose_domain: String,
    pub exposer: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cluster_url = lookup(keys::CLUSTER_URL)
            .context("CLUSTER_URL environment variable not set")?;
        let master_token = lookup(keys::MASTER_TOKEN)
            .context("MASTER_TOKEN environment variable not set")?;
        url::Url::parse(&cluster_url)
            .with_context(|| format!("CLUSTER_URL is not a valid URL: {}", cluster_url))?;

        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            cluster_url,
            master_token,
            master_user: non_empty(keys::MASTER_USER).unwrap_or_else(|| "master".to_string()),
            kubernetes_mode: flag(keys::KUBERNETES_MODE),
            disable_quotas: flag(keys::DISABLE_QUOTAS),
            skip_host_verify: flag(keys::SKIP_HOST_VERIFY),
            template_dir: non_empty(keys::TEMPLATE_DIR).map(PathBuf::from),
            template_repo_url: non_empty(keys::TEMPLATE_REPO_URL)
                .unwrap_or_else(|| DEFAULT_TEMPLATE_REPO_URL.to_string()),
            template_version: non_empty(keys::TEMPLATE_VERSION),
            oc_path: non_empty(keys::OC_PATH).unwrap_or_else(|| "oc".to_string()),
            keycloak_url: non_empty(keys::KEYCLOAK_URL),
            keycloak_namespace: non_empty(keys::KEYCLOAK_NAMESPACE)
                .unwrap_or_else(|| "fabric8".to_string()),
            keycloak_ingress: non_empty(keys::KEYCLOAK_INGRESS)
                .unwrap_or_else(|| "keycloak".to_string()),
            expose_domain: non_empty(keys::EXPOSE_DOMAIN).unwrap_or_default(),
            exposer: non_empty(keys::EXPOSER).unwrap_or_else(|| "Ingress".to_string()),
        })
    }

    pub fn flavor(&self) -> ClusterFlavor {
        if self.kubernetes_mode {
            ClusterFlavor::Kubernetes
        } else {
            ClusterFlavor::OpenShift
        }
    }

    /// Quotas only exist for OpenShift and can be switched off there
    pub fn quotas_enabled(&self) -> bool {
        !self.disable_quotas && self.flavor() == ClusterFlavor::OpenShift
    }
}
