// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tenant provisioning.
//!
//! [`Provisioner::provision`] groups every document by namespace and provisions
//! the namespaces concurrently, logging failures per namespace.
//! [`Provisioner::init_tenant`] and [`Provisioner::update_tenant`] apply whole
//! templates to the tenant's fixed namespaces and fail with an aggregate error
//! when any step failed.

pub mod failures;
pub mod orchestrator;
pub mod sequential;

pub use failures::FailureCollector;
pub use orchestrator::Provisioner;
