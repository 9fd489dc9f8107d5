// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Data types shared by the template pipeline and the provisioner.

pub mod namespace;
pub mod resource;
pub mod tenant;

pub use namespace::NamespaceType;
pub use resource::Resource;
pub use tenant::{Tenant, Variables};
