// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use tracing::info;

use tenant_provisioner::config::Config;
use tenant_provisioner::provision::Provisioner;
use tenant_provisioner::types::Tenant;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: cluster_url={}, flavor={:?}, quotas={}",
        config.cluster_url,
        config.flavor(),
        config.quotas_enabled()
    );

    let username = env::var("TENANT_USERNAME").context("TENANT_USERNAME must be set")?;
    let action = env::var("TENANT_ACTION").unwrap_or_else(|_| "provision".to_string());
    let tenant = Tenant::new(username);

    let provisioner = Provisioner::from_config(config)?;

    match action.as_str() {
        "provision" => {
            let token = user_token()?;
            provisioner.provision(&tenant, &token).await?;
        }
        "init" => {
            let token = user_token()?;
            provisioner.init_tenant(&tenant, &token).await?;
        }
        "update" => provisioner.update_tenant(&tenant).await?,
        other => bail!("Unknown TENANT_ACTION {}, expected provision, init or update", other),
    }

    info!("Finished {} for {}", action, tenant.username);
    Ok(())
}

fn user_token() -> Result<String> {
    env::var("TENANT_USER_TOKEN").context("TENANT_USER_TOKEN must be set")
}
