// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `oc process | oc apply` pipeline used to update existing tenants

use crate::apply::{ApplyOptions, Applier};
use crate::config::{ClusterFlavor, Config};
use crate::error::{ProvisionError, Result};
use crate::template::{substitute, Template};
use crate::types::Variables;
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Applies templates by shelling out to the `oc` CLI
#[derive(Debug, Clone)]
pub struct CliApplier {
    program: String,
    flavor: ClusterFlavor,
    skip_tls_verify: bool,
}

impl CliApplier {
    pub fn new(program: impl Into<String>, flavor: ClusterFlavor, skip_tls_verify: bool) -> Self {
        Self {
            program: program.into(),
            flavor,
            skip_tls_verify,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.oc_path, config.flavor(), config.skip_host_verify)
    }

    fn common_args(&self, opts: &ApplyOptions) -> Vec<String> {
        let mut args = vec![format!("--token={}", opts.token)];
        if let Some(namespace) = &opts.namespace {
            args.push(format!("--namespace={}", namespace));
        }
        if self.skip_tls_verify {
            args.push("--insecure-skip-tls-verify=true".to_string());
        }
        args
    }

    /// Arguments of the stage rendering the template into a resource list
    pub fn process_args(&self, opts: &ApplyOptions) -> Vec<String> {
        let server = match self.flavor {
            ClusterFlavor::OpenShift => format!("--server={}", opts.cluster_url),
            ClusterFlavor::Kubernetes => "--local=true".to_string(),
        };
        let mut args = vec!["process".to_string(), "-f".to_string(), "-".to_string(), server];
        args.extend(self.common_args(opts));
        args
    }

    /// Arguments of the stage applying the rendered list
    pub fn apply_args(&self, opts: &ApplyOptions) -> Vec<String> {
        let mut args = vec![
            "apply".to_string(),
            "-f".to_string(),
            "-".to_string(),
            "--overwrite=true".to_string(),
            "--force=true".to_string(),
            format!("--server={}", opts.cluster_url),
        ];
        args.extend(self.common_args(opts));
        args
    }

    fn stage(&self, args: Vec<String>) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// A stage that could not be awaited or exited non-zero fails with the output so far
    fn check_stage(&self, stage: &str, status: io::Result<ExitStatus>, output: &str) -> Result<()> {
        let message = match status {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => format!("{} {} exited with {}", self.program, stage, status),
            Err(e) => format!("failed to wait for {} {}: {}", self.program, stage, e),
        };
        Err(ProvisionError::CliError {
            message,
            output: output.to_string(),
        })
    }

    /// Run the pipeline and return its combined output
    #[instrument(skip(self, template, variables, opts), fields(template = %template.name, namespace = ?opts.namespace))]
    pub async fn run(
        &self,
        template: &Template,
        variables: &Variables,
        opts: &ApplyOptions,
    ) -> Result<String> {
        let text = substitute(&template.content, variables);
        let cli_error = |message: String, output: String| ProvisionError::CliError { message, output };

        let mut process = self
            .stage(self.process_args(opts))
            .spawn()
            .map_err(|e| {
                cli_error(
                    format!("failed to start {} process: {}", self.program, e),
                    String::new(),
                )
            })?;
        let mut apply = self
            .stage(self.apply_args(opts))
            .spawn()
            .map_err(|e| {
                cli_error(
                    format!("failed to start {} apply: {}", self.program, e),
                    String::new(),
                )
            })?;

        let (Some(mut process_in), Some(mut process_out), Some(mut process_err), Some(mut apply_in)) = (
            process.stdin.take(),
            process.stdout.take(),
            process.stderr.take(),
            apply.stdin.take(),
        ) else {
            return Err(cli_error("pipeline stdio not captured".to_string(), String::new()));
        };

        let feed = async move {
            process_in.write_all(text.as_bytes()).await?;
            process_in.shutdown().await
        };
        let pipe = async move {
            tokio::io::copy(&mut process_out, &mut apply_in).await?;
            apply_in.shutdown().await
        };
        let process_stderr = async move {
            let mut buf = Vec::new();
            process_err.read_to_end(&mut buf).await.map(|_| buf)
        };

        let (fed, piped, process_stderr, apply_output) =
            tokio::join!(feed, pipe, process_stderr, apply.wait_with_output());
        let process_status = process.wait().await;

        let mut output = String::from_utf8_lossy(&process_stderr.unwrap_or_default()).to_string();
        let apply_status = apply_output.map(|apply_output| {
            output.push_str(&String::from_utf8_lossy(&apply_output.stdout));
            output.push_str(&String::from_utf8_lossy(&apply_output.stderr));
            apply_output.status
        });

        self.check_stage("process", process_status, &output)?;
        self.check_stage("apply", apply_status, &output)?;

        let io_error = fed.err().or(piped.err());
        if let Some(e) = io_error.filter(|e| e.kind() != io::ErrorKind::BrokenPipe) {
            return Err(cli_error(format!("pipeline I/O failed: {}", e), output));
        }

        debug!("CLI pipeline output: {}", output);
        Ok(output)
    }
}

#[async_trait]
impl Applier for CliApplier {
    async fn apply(
        &self,
        template: &Template,
        variables: &Variables,
        opts: &ApplyOptions,
    ) -> Result<()> {
        self.run(template, variables, opts).await.map(|_| ())
    }
}
