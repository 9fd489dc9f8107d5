// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Single sign-on endpoint discovery for plain Kubernetes clusters

use crate::error::{ProvisionError, Result};
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Api, Client};
use tracing::{debug, instrument};

/// Finds the base URL of the single sign-on service
#[async_trait]
pub trait SsoDiscovery: Send + Sync {
    async fn discover(&self) -> Result<String>;
}

/// A URL known up front
#[derive(Debug, Clone)]
pub struct StaticSso {
    url: String,
}

impl StaticSso {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl SsoDiscovery for StaticSso {
    async fn discover(&self) -> Result<String> {
        Ok(self.url.clone())
    }
}

/// Reads the host of the single sign-on ingress
pub struct IngressSsoDiscovery {
    client: Client,
    namespace: String,
    name: String,
}

impl IngressSsoDiscovery {
    pub fn new(client: Client, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

#[async_trait]
impl SsoDiscovery for IngressSsoDiscovery {
    #[instrument(skip(self), fields(ingress = %format!("{}/{}", self.namespace, self.name)))]
    async fn discover(&self) -> Result<String> {
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), &self.namespace);

        let ingress = ingresses.get(&self.name).await.map_err(|e| {
            ProvisionError::SsoDiscoveryError(format!(
                "Failed to get ingress {}/{}: {}",
                self.namespace, self.name, e
            ))
        })?;

        let Some(host) = ingress
            .spec
            .as_ref()
            .and_then(|s| s.rules.as_ref())
            .and_then(|rules| rules.iter().find_map(|r| r.host.clone()))
        else {
            return Err(ProvisionError::SsoDiscoveryError(format!(
                "Ingress {}/{} has no host",
                self.namespace, self.name
            )));
        };

        let url = format!("https://{}", host);
        debug!("Discovered single sign-on endpoint {}", url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;
    use serde_json::json;

    const INGRESS: &str = "/apis/networking.k8s.io/v1/namespaces/fabric8/ingresses/keycloak";

    #[tokio::test]
    async fn test_static_sso() {
        let url = StaticSso::new("https://sso.example").discover().await.unwrap();
        assert_eq!(url, "https://sso.example");
    }

    #[tokio::test]
    async fn test_discovers_ingress_host() {
        let body = json!({
            "apiVersion": "networking.k8s.io/v1",
            "kind": "Ingress",
            "metadata": {"name": "keycloak", "namespace": "fabric8"},
            "spec": {"rules": [{"host": "keycloak.fabric8.example"}]}
        })
        .to_string();
        let client = MockService::new().on_get(INGRESS, 200, &body).into_client();

        let url = IngressSsoDiscovery::new(client, "fabric8", "keycloak")
            .discover()
            .await
            .unwrap();

        assert_eq!(url, "https://keycloak.fabric8.example");
    }

    #[tokio::test]
    async fn test_ingress_without_host() {
        let body = json!({
            "apiVersion": "networking.k8s.io/v1",
            "kind": "Ingress",
            "metadata": {"name": "keycloak", "namespace": "fabric8"},
            "spec": {"rules": []}
        })
        .to_string();
        let client = MockService::new().on_get(INGRESS, 200, &body).into_client();

        let err = IngressSsoDiscovery::new(client, "fabric8", "keycloak")
            .discover()
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::SsoDiscoveryError(_)));
    }

    #[tokio::test]
    async fn test_missing_ingress() {
        let client = MockService::new().into_client();

        let err = IngressSsoDiscovery::new(client, "fabric8", "keycloak")
            .discover()
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to get ingress fabric8/keycloak"));
    }
}
