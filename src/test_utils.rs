// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Kubernetes API and the provisioner's collaborators.

use crate::apply::{Applier, ApplyOptions};
use crate::config::Config;
use crate::error::{ProvisionError, Result};
use crate::kubernetes::{ResourceClient, SsoDiscovery};
use crate::template::{Template, TemplateSource};
use crate::types::{Resource, Variables};
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// A request seen by [`MockService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: String,
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests with `method` matching the exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or_default().to_string();

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = match req.into_body().collect().await {
                Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).to_string(),
                Err(_) => String::new(),
            };
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                body,
            });

            let (status, body) = response.unwrap_or_else(|| {
                (
                    404,
                    r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#
                        .to_string(),
                )
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Configuration with the required keys set, overlaid with `pairs`
pub fn make_config(pairs: &[(&str, &str)]) -> Config {
    let mut map: HashMap<String, String> = HashMap::new();
    map.insert("CLUSTER_URL".to_string(), "https://api.cluster.example:6443".to_string());
    map.insert("MASTER_TOKEN".to_string(), "master-token".to_string());
    for (key, value) in pairs {
        map.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| map.get(key).cloned()).unwrap()
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// One call seen by [`RecordingClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedResource {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
    pub token: String,
}

/// A [`ResourceClient`] that records every apply and fails on request
#[derive(Clone, Default)]
pub struct RecordingClient {
    applied: Arc<Mutex<Vec<AppliedResource>>>,
    failures: Arc<Mutex<Vec<(String, String)>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    kind_delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail applies of `kind` whose effective namespace is `namespace`
    pub fn fail_on(self, namespace: &str, kind: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push((namespace.to_string(), kind.to_string()));
        self
    }

    /// Delay applies into `namespace`
    pub fn delay(self, namespace: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(namespace.to_string(), delay);
        self
    }

    /// Delay applies of `kind` in any namespace
    pub fn delay_kind(self, kind: &str, delay: Duration) -> Self {
        self.kind_delays
            .lock()
            .unwrap()
            .insert(kind.to_string(), delay);
        self
    }

    pub fn applied(&self) -> Vec<AppliedResource> {
        self.applied.lock().unwrap().clone()
    }

    /// Applied resources for one namespace as `Kind/name` strings
    pub fn applied_in(&self, namespace: &str) -> Vec<String> {
        self.applied()
            .into_iter()
            .filter(|a| a.namespace.as_deref() == Some(namespace))
            .map(|a| format!("{}/{}", a.kind, a.name))
            .collect()
    }
}

#[async_trait]
impl ResourceClient for RecordingClient {
    async fn apply(&self, resource: &Resource, opts: &ApplyOptions) -> Result<()> {
        let kind = resource.kind().unwrap_or_default().to_string();
        let namespace = if resource.is_namespace_establishing() {
            resource.name().map(str::to_string)
        } else {
            resource
                .namespace()
                .map(str::to_string)
                .or_else(|| opts.namespace.clone())
        };

        let delay = namespace
            .as_ref()
            .and_then(|ns| self.delays.lock().unwrap().get(ns).copied())
            .or_else(|| self.kind_delays.lock().unwrap().get(&kind).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(ns, k)| Some(ns) == namespace.as_ref() && *k == kind);
        if failing {
            return Err(ProvisionError::InvalidResource(format!(
                "forced failure for {}",
                resource
            )));
        }

        self.applied.lock().unwrap().push(AppliedResource {
            kind,
            name: resource.name().unwrap_or_default().to_string(),
            namespace,
            token: opts.token.clone(),
        });
        Ok(())
    }
}

/// A [`TemplateSource`] serving fixed templates and recording requested names
#[derive(Clone, Default)]
pub struct RecordingSource {
    templates: HashMap<String, String>,
    fallback: Option<String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl RecordingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: &str, content: &str) -> Self {
        self.templates.insert(name.to_string(), content.to_string());
        self
    }

    /// Serve `content` for every name without its own template
    pub fn with_fallback(mut self, content: &str) -> Self {
        self.fallback = Some(content.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl TemplateSource for RecordingSource {
    async fn fetch(&self, name: &str) -> Result<Template> {
        self.requested.lock().unwrap().push(name.to_string());
        self.templates
            .get(name)
            .or(self.fallback.as_ref())
            .map(|content| Template::new(name, content.clone()))
            .ok_or_else(|| ProvisionError::TemplateNotFound(name.to_string()))
    }
}

/// An [`SsoDiscovery`] that always fails
pub struct FailingSso;

#[async_trait]
impl SsoDiscovery for FailingSso {
    async fn discover(&self) -> Result<String> {
        Err(ProvisionError::SsoDiscoveryError("no ingress".to_string()))
    }
}

/// One call seen by [`RecordingApplier`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTemplate {
    pub template: String,
    pub namespace: Option<String>,
    pub token: String,
}

/// An [`Applier`] that records whole-template applies and fails on request
#[derive(Clone, Default)]
pub struct RecordingApplier {
    applied: Arc<Mutex<Vec<AppliedTemplate>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl RecordingApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(self, template: &str) -> Self {
        self.failing.lock().unwrap().push(template.to_string());
        self
    }

    pub fn applied(&self) -> Vec<AppliedTemplate> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl Applier for RecordingApplier {
    async fn apply(
        &self,
        template: &Template,
        _variables: &Variables,
        opts: &ApplyOptions,
    ) -> Result<()> {
        if self.failing.lock().unwrap().contains(&template.name) {
            return Err(ProvisionError::CliError {
                message: format!("apply of {} exited with 1", template.name),
                output: "error: forbidden".to_string(),
            });
        }
        self.applied.lock().unwrap().push(AppliedTemplate {
            template: template.name.clone(),
            namespace: opts.namespace.clone(),
            token: opts.token.clone(),
        });
        Ok(())
    }
}
