// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, resource apply, project creation and SSO discovery.

pub mod client;
pub mod projects;
pub mod sso;

pub use client::{connect, KubeResourceClient, ResourceClient};
pub use projects::ensure_project_exists;
pub use sso::{IngressSsoDiscovery, SsoDiscovery, StaticSso};
