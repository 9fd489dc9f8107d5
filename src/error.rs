// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Username {0:?} does not yield a project name")]
    InvalidTenant(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to fetch template {name}: {message}")]
    TemplateFetchError { name: String, message: String },

    #[error("Template {0} is not valid UTF-8")]
    TemplateEncodingError(String),

    #[error("Failed to parse template {template}: {source}")]
    ParseError {
        template: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid resource document: {0}")]
    InvalidResource(String),

    #[error("Unable to determine namespace for {kind} {name}")]
    UnassignedNamespace { kind: String, name: String },

    #[error("Single sign-on discovery failed: {0}")]
    SsoDiscoveryError(String),

    #[error("CLI pipeline failed: {message}\n{output}")]
    CliError { message: String, output: String },

    #[error("Failed to create cluster client: {0}")]
    ClientConfigError(String),

    #[error("Apply task for {0} ended without reporting a result")]
    TaskLost(String),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

/// One failed unit of work inside a tenant operation
#[derive(Debug)]
pub struct StepFailure {
    pub step: String,
    pub namespace: String,
    pub error: ProvisionError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.step, self.namespace, self.error)
    }
}

/// Failures collected from concurrently running steps, reported as one error
#[derive(Debug)]
pub struct AggregateError {
    failures: Vec<StepFailure>,
}

impl AggregateError {
    /// Returns `None` when there is nothing to report
    pub fn from_failures(failures: Vec<StepFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    pub fn failures(&self) -> &[StepFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} step(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
