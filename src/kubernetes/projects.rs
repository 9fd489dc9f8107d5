// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! OpenShift project creation through project requests

use crate::constants::openshift::{PROJECT_GROUP, PROJECT_KIND, PROJECT_VERSION};
use crate::error::{ProvisionError, Result};
use crate::kubernetes::client::to_dynamic;
use crate::types::Resource;
use kube::{
    api::{ApiResource, DynamicObject, PostParams},
    core::GroupVersionKind,
    Api, Client,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

fn project_api(client: &Client, kind: &str) -> Api<DynamicObject> {
    let gvk = GroupVersionKind::gvk(PROJECT_GROUP, PROJECT_VERSION, kind);
    Api::all_with(client.clone(), &ApiResource::from_gvk(&gvk))
}

/// Ensure the project named by a `ProjectRequest` exists, request it if it doesn't.
///
/// Project requests cannot be updated, so an existing project is left alone.
#[instrument(skip(client, request), fields(project = request.name().unwrap_or_default()))]
pub async fn ensure_project_exists(client: &Client, request: &Resource) -> Result<()> {
    let name = request.name().ok_or_else(|| {
        ProvisionError::InvalidResource(format!("{} has no name", request))
    })?;
    let projects = project_api(client, PROJECT_KIND);

    match projects.get(name).await {
        Ok(_) => {
            debug!("Project {} already exists", name);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Requesting project {}", name);
            let mut body = request.as_value();
            body["apiVersion"] = Value::String(format!("{}/{}", PROJECT_GROUP, PROJECT_VERSION));
            let object = to_dynamic(&Resource::from_value(body)?)?;

            let requests = project_api(client, crate::constants::kinds::PROJECT_REQUEST);
            match requests.create(&PostParams::default(), &object).await {
                Ok(_) => {
                    info!("Project {} requested successfully", name);
                    Ok(())
                }
                Err(kube::Error::Api(err)) if err.code == 409 => {
                    debug!("Project {} was created concurrently", name);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}
