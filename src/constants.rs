// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "tenant-provisioner";

/// Environment variable keys read by [`crate::config::Config`]
pub mod env {
    pub const CLUSTER_URL: &str = "CLUSTER_URL";
    pub const MASTER_TOKEN: &str = "MASTER_TOKEN";
    pub const MASTER_USER: &str = "MASTER_USER";
    /// When "true", targets a plain Kubernetes cluster instead of OpenShift
    pub const KUBERNETES_MODE: &str = "F8_KUBERNETES_MODE";
    /// When "true", quota templates are not loaded on OpenShift
    pub const DISABLE_QUOTAS: &str = "DISABLE_OSO_QUOTAS";
    /// When "true", the CLI pipeline skips TLS host verification
    pub const SKIP_HOST_VERIFY: &str = "KEYCLOAK_SKIP_HOST_VERIFY";
    pub const TEMPLATE_DIR: &str = "TEMPLATE_DIR";
    pub const TEMPLATE_REPO_URL: &str = "TEMPLATE_REPO_URL";
    pub const TEMPLATE_VERSION: &str = "TEMPLATE_VERSION";
    pub const OC_PATH: &str = "OC_PATH";
    pub const KEYCLOAK_URL: &str = "KEYCLOAK_URL";
    pub const KEYCLOAK_NAMESPACE: &str = "KEYCLOAK_NAMESPACE";
    pub const KEYCLOAK_INGRESS: &str = "KEYCLOAK_INGRESS";
    pub const EXPOSE_DOMAIN: &str = "EXPOSE_DOMAIN";
    pub const EXPOSER: &str = "EXPOSER";
}

/// Template variable names
pub mod vars {
    pub const PROJECT_NAME: &str = "PROJECT_NAME";
    pub const PROJECT_DISPLAYNAME: &str = "PROJECT_DISPLAYNAME";
    pub const PROJECT_DESCRIPTION: &str = "PROJECT_DESCRIPTION";
    pub const PROJECT_USER: &str = "PROJECT_USER";
    pub const PROJECT_REQUESTING_USER: &str = "PROJECT_REQUESTING_USER";
    pub const PROJECT_ADMIN_USER: &str = "PROJECT_ADMIN_USER";
    pub const KEYCLOAK_URL: &str = "KEYCLOAK_URL";
    pub const EXPOSER: &str = "EXPOSER";
    pub const DOMAIN: &str = "DOMAIN";
}

/// Template catalog names
pub mod templates {
    pub const PREFIX: &str = "fabric8-online-";
    pub const USER_PROJECT: &str = "user-project";
    pub const TEAM: &str = "team";
    pub const JENKINS: &str = "jenkins";
    pub const CHE: &str = "che";
    pub const ROLE_BINDINGS: &str = "fabric8-online-user-rolebindings.yml";
    pub const COLLABORATORS: &str = "fabric8-online-user-colaborators.yml";
    pub const JENKINS_QUOTAS: &str = "fabric8-online-jenkins-quotas-oso-openshift.yml";
    pub const CHE_QUOTAS: &str = "fabric8-online-che-quotas-oso-openshift.yml";
    pub const EXPOSE: &str = "fabric8-online-expose-kubernetes.yml";
}

/// Resource kinds the provisioner treats specially
pub mod kinds {
    pub const PROJECT_REQUEST: &str = "ProjectRequest";
    pub const NAMESPACE: &str = "Namespace";
    pub const ROLE_BINDING_RESTRICTION: &str = "RoleBindingRestriction";
    pub const TEMPLATE: &str = "Template";
    pub const LIST: &str = "List";

    /// Kinds whose documents create the namespace they describe
    pub const NAMESPACE_ESTABLISHING: &[&str] = &[PROJECT_REQUEST, NAMESPACE];

    /// Kinds that are not namespaced in the cluster API
    pub const CLUSTER_SCOPED: &[&str] = &[
        PROJECT_REQUEST,
        NAMESPACE,
        "Project",
        "ClusterRole",
        "ClusterRoleBinding",
        "CustomResourceDefinition",
        "PersistentVolume",
        "StorageClass",
    ];

    /// Apply priority; kinds not listed sort after all of these
    pub const PRIORITY: &[(&str, u32)] = &[
        (PROJECT_REQUEST, 1),
        (NAMESPACE, 1),
        ("Role", 2),
        ("RoleBinding", 3),
        (ROLE_BINDING_RESTRICTION, 4),
        ("LimitRange", 5),
        ("ResourceQuota", 6),
        ("Secret", 7),
        ("ServiceAccount", 8),
        ("Service", 9),
        ("Route", 10),
        ("Ingress", 10),
        ("PersistentVolumeClaim", 11),
        ("ConfigMap", 12),
        ("DeploymentConfig", 13),
        ("Deployment", 13),
    ];

    pub const UNKNOWN_PRIORITY: u32 = 100;
}

/// OpenShift project API coordinates
pub mod openshift {
    pub const PROJECT_GROUP: &str = "project.openshift.io";
    pub const PROJECT_VERSION: &str = "v1";
    pub const PROJECT_KIND: &str = "Project";
}

/// Namespace name suffixes for the tenant's tool namespaces
pub mod namespaces {
    pub const JENKINS_SUFFIX: &str = "-jenkins";
    pub const CHE_SUFFIX: &str = "-che";
}
