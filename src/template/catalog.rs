// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template lookup by catalog name.
//!
//! A template is resolved from the versioned artifact repository when a
//! version is configured, otherwise from the override directory when it holds
//! a file of that name, otherwise from the templates bundled into the binary.

use crate::config::Config;
use crate::error::{ProvisionError, Result};
use crate::template::Template;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Name to template content lookup
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Template>;
}

macro_rules! bundled {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../../templates/", $name)))),*]
    };
}

static BUNDLED: &[(&str, &str)] = bundled![
    "fabric8-online-user-project-openshift.yml",
    "fabric8-online-user-project-kubernetes.yml",
    "fabric8-online-user-rolebindings.yml",
    "fabric8-online-user-colaborators.yml",
    "fabric8-online-team-openshift.yml",
    "fabric8-online-team-kubernetes.yml",
    "fabric8-online-jenkins-openshift.yml",
    "fabric8-online-jenkins-kubernetes.yml",
    "fabric8-online-che-openshift.yml",
    "fabric8-online-che-kubernetes.yml",
    "fabric8-online-jenkins-quotas-oso-openshift.yml",
    "fabric8-online-che-quotas-oso-openshift.yml",
    "fabric8-online-expose-kubernetes.yml",
];

/// Templates compiled into the binary
#[derive(Debug, Clone, Default)]
pub struct BundledSource;

#[async_trait]
impl TemplateSource for BundledSource {
    async fn fetch(&self, name: &str) -> Result<Template> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(bundled, content)| Template::new(*bundled, *content))
            .ok_or_else(|| ProvisionError::TemplateNotFound(name.to_string()))
    }
}

/// Local directory holding template overrides
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read `name` if the directory holds a regular file of that name.
    ///
    /// Only a missing entry falls through; any other I/O error is returned.
    pub async fn read(&self, name: &str) -> Result<Option<Template>> {
        let path = self.dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                debug!("Loading template {} from {}", name, path.display());
                let bytes = tokio::fs::read(&path).await?;
                Template::from_bytes(name, bytes).map(Some)
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Versioned artifact repository reached over HTTP
#[derive(Debug, Clone)]
pub struct RepositorySource {
    http: reqwest::Client,
    base_url: String,
    version: String,
}

impl RepositorySource {
    pub fn new(base_url: &str, version: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.to_string(),
        }
    }

    /// `<base>/<artifact>/<version>/<artifact>-<version>.yml`
    pub fn url_for(&self, name: &str) -> String {
        let artifact = name.strip_suffix(".yml").unwrap_or(name);
        format!(
            "{}/{}/{}/{}-{}.yml",
            self.base_url, artifact, self.version, artifact, self.version
        )
    }
}

#[async_trait]
impl TemplateSource for RepositorySource {
    #[instrument(skip(self), fields(version = %self.version))]
    async fn fetch(&self, name: &str) -> Result<Template> {
        let url = self.url_for(name);
        debug!("Fetching template {} from {}", name, url);

        let fetch_error = |message: String| ProvisionError::TemplateFetchError {
            name: name.to_string(),
            message,
        };

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("{} returned {}", url, status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read body of {}: {}", url, e)))?;
        Template::from_bytes(name, bytes.to_vec())
    }
}

/// The configured chain of template sources
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    repository: Option<RepositorySource>,
    directory: Option<DirectorySource>,
    bundled: BundledSource,
}

impl TemplateCatalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            repository: config
                .template_version
                .as_deref()
                .map(|version| RepositorySource::new(&config.template_repo_url, version)),
            directory: config.template_dir.clone().map(DirectorySource::new),
            bundled: BundledSource,
        }
    }

    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(DirectorySource::new(dir));
        self
    }
}

#[async_trait]
impl TemplateSource for TemplateCatalog {
    async fn fetch(&self, name: &str) -> Result<Template> {
        if let Some(repository) = &self.repository {
            return repository.fetch(name).await;
        }
        if let Some(directory) = &self.directory {
            if let Some(template) = directory.read(name).await? {
                return Ok(template);
            }
        }
        self.bundled.fetch(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variables;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_bundled_templates_parse() {
        let vars: Variables = [("PROJECT_NAME", "alice")].into_iter().collect();
        for (name, _) in BUNDLED {
            let template = BundledSource.fetch(name).await.unwrap();
            let resources = template.process(&vars).unwrap();
            assert!(!resources.is_empty(), "{} has no resources", name);
            assert!(
                resources.iter().all(|r| r.kind().is_some() && r.name().is_some()),
                "{} has a resource without kind or name",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_bundled_unknown_name() {
        let err = BundledSource.fetch("nope.yml").await.unwrap_err();
        assert!(matches!(err, ProvisionError::TemplateNotFound(ref n) if n == "nope.yml"));
    }

    #[tokio::test]
    async fn test_directory_overrides_bundled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("fabric8-online-team-openshift.yml"),
            "kind: ConfigMap\nmetadata:\n  name: override\n",
        )
        .unwrap();
        let catalog = TemplateCatalog::default().with_directory(dir.path());

        let team = catalog.fetch("fabric8-online-team-openshift.yml").await.unwrap();
        assert!(team.content.contains("override"));

        let che = catalog.fetch("fabric8-online-che-openshift.yml").await.unwrap();
        assert_eq!(che.content, BundledSource.fetch(&che.name).await.unwrap().content);
    }

    #[tokio::test]
    async fn test_directory_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fabric8-online-che-openshift.yml")).unwrap();
        let source = DirectorySource::new(dir.path());

        assert!(source.read("fabric8-online-che-openshift.yml").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_read_error_is_not_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("templates");
        std::fs::write(&not_a_dir, "plain file").unwrap();
        let catalog = TemplateCatalog::default().with_directory(&not_a_dir);

        let err = catalog
            .fetch("fabric8-online-che-openshift.yml")
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::IoError(_)));
    }

    #[test]
    fn test_repository_url() {
        let source = RepositorySource::new("https://repo.example/packages/", "1.0.7");

        assert_eq!(
            source.url_for("fabric8-online-team-openshift.yml"),
            "https://repo.example/packages/fabric8-online-team-openshift/1.0.7/fabric8-online-team-openshift-1.0.7.yml"
        );
    }

    const CHE_ARTIFACT: &str =
        "/fabric8-online-che-openshift/2.0.1/fabric8-online-che-openshift-2.0.1.yml";

    #[tokio::test]
    async fn test_repository_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CHE_ARTIFACT))
            .respond_with(ResponseTemplate::new(200).set_body_string("kind: Secret\n"))
            .expect(1)
            .mount(&server)
            .await;
        let source = RepositorySource::new(&server.uri(), "2.0.1");

        let template = source.fetch("fabric8-online-che-openshift.yml").await.unwrap();

        assert_eq!(template.name, "fabric8-online-che-openshift.yml");
        assert_eq!(template.content, "kind: Secret\n");
    }

    #[tokio::test]
    async fn test_repository_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CHE_ARTIFACT))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        let source = RepositorySource::new(&server.uri(), "2.0.1");

        let err = source.fetch("fabric8-online-che-openshift.yml").await.unwrap_err();

        assert!(matches!(err, ProvisionError::TemplateFetchError { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_catalog_prefers_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/fabric8-online-user-rolebindings/1/fabric8-online-user-rolebindings-1.yml",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("kind: Role\n"))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fabric8-online-user-rolebindings.yml"), "kind: Secret\n")
            .unwrap();
        let catalog = TemplateCatalog {
            repository: Some(RepositorySource::new(&server.uri(), "1")),
            directory: Some(DirectorySource::new(dir.path())),
            bundled: BundledSource,
        };

        let template = catalog.fetch("fabric8-online-user-rolebindings.yml").await.unwrap();

        assert_eq!(template.content, "kind: Role\n");
    }
}
