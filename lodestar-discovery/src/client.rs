//! Registry lookup contract

use crate::model::ServiceInstance;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Registry lookup errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Service lookup failed: {0}")]
    LookupFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Lookup parameters for finding service instances.
///
/// `preferred_version` of `None` means "latest available"; `minimum_version`
/// of `None` means "no minimum".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceQuery {
    pub service_name: String,
    pub preferred_version: Option<String>,
    pub minimum_version: Option<String>,
}

impl InstanceQuery {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            preferred_version: None,
            minimum_version: None,
        }
    }

    pub fn with_preferred_version(mut self, version: impl Into<String>) -> Self {
        self.preferred_version = Some(version.into());
        self
    }

    pub fn with_minimum_version(mut self, version: impl Into<String>) -> Self {
        self.minimum_version = Some(version.into());
        self
    }

    /// Whether the instance satisfies this query's name and version
    /// constraints.
    ///
    /// An instance that registered no version matches only unconstrained
    /// queries. The preferred version requires an exact match; the minimum
    /// version compares dotted numeric components.
    pub fn matches(&self, instance: &ServiceInstance) -> bool {
        if instance.service_name != self.service_name {
            return false;
        }

        if self.preferred_version.is_none() && self.minimum_version.is_none() {
            return true;
        }

        let Some(version) = instance.version.as_deref() else {
            return false;
        };

        if let Some(preferred) = self.preferred_version.as_deref()
            && version != preferred
        {
            return false;
        }

        if let Some(minimum) = self.minimum_version.as_deref()
            && compare_versions(version, minimum) == Ordering::Less
        {
            return false;
        }

        true
    }
}

/// Compare two dotted version strings component by component, treating
/// non-numeric components as zero and missing components as zero.
fn compare_versions(left: &str, right: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect()
    };

    let left = parse(left);
    let right = parse(right);
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// A client that can look up service instances in a registry.
///
/// Returns zero, one, or many matching instances. Version-matching semantics
/// belong to the implementation; callers selecting among multiple matches is
/// not this trait's concern.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn find_service_instances_by(
        &self,
        query: &InstanceQuery,
    ) -> Result<Vec<ServiceInstance>, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceInstance;

    fn versioned_instance(version: &str) -> ServiceInstance {
        ServiceInstance::new("svc-1", "api", "localhost").with_version(version)
    }

    #[test]
    fn unconstrained_query_matches_any_version() {
        let query = InstanceQuery::new("api");

        assert!(query.matches(&versioned_instance("1.0.0")));
        assert!(query.matches(&ServiceInstance::new("svc-2", "api", "localhost")));
    }

    #[test]
    fn query_never_matches_other_service_names() {
        let query = InstanceQuery::new("api");

        assert!(!query.matches(&ServiceInstance::new("svc-1", "other", "localhost")));
    }

    #[test]
    fn preferred_version_requires_exact_match() {
        let query = InstanceQuery::new("api").with_preferred_version("2.1.0");

        assert!(query.matches(&versioned_instance("2.1.0")));
        assert!(!query.matches(&versioned_instance("2.1.1")));
    }

    #[test]
    fn minimum_version_is_a_lower_bound() {
        let query = InstanceQuery::new("api").with_minimum_version("1.2.0");

        assert!(query.matches(&versioned_instance("1.2.0")));
        assert!(query.matches(&versioned_instance("1.10.0")));
        assert!(query.matches(&versioned_instance("2.0")));
        assert!(!query.matches(&versioned_instance("1.1.9")));
    }

    #[test]
    fn versionless_instance_fails_constrained_queries() {
        let unversioned = ServiceInstance::new("svc-1", "api", "localhost");

        assert!(
            !InstanceQuery::new("api")
                .with_preferred_version("1.0")
                .matches(&unversioned)
        );
        assert!(
            !InstanceQuery::new("api")
                .with_minimum_version("1.0")
                .matches(&unversioned)
        );
    }

    #[test]
    fn version_comparison_is_numeric_not_lexicographic() {
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("0.9", "1.0"), Ordering::Less);
    }
}
