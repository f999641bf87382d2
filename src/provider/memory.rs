// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory provider
//!
//! Serves a fixed set of handles with the same filter semantics as the EC2
//! API. Used by tests and for dry runs against a recorded inventory.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Filters, ResourceProvider, NAME_FILTER, SUBNET_FILTER, VPC_FILTER};
use crate::domain::{ResourceHandle, ResourceKind};
use crate::errors::ProviderError;

/// Fixture-backed [`ResourceProvider`]
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    resources: Vec<ResourceHandle>,
    failures: BTreeMap<ResourceKind, ProviderError>,
    queries: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new(resources: Vec<ResourceHandle>) -> Self {
        Self {
            resources,
            ..Self::default()
        }
    }

    /// Add a resource
    pub fn with(mut self, resource: ResourceHandle) -> Self {
        self.resources.push(resource);
        self
    }

    /// Make every query for `kind` fail with `error`
    pub fn failing(mut self, kind: ResourceKind, error: ProviderError) -> Self {
        self.failures.insert(kind, error);
        self
    }

    /// Number of `describe` calls served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn resources(&self) -> &[ResourceHandle] {
        &self.resources
    }
}

/// Does `resource` satisfy the filter `name` with any of `values`?
fn matches_filter(
    resource: &ResourceHandle,
    name: &str,
    values: &[String],
) -> Result<bool, ProviderError> {
    let actual = if let Some(key) = name.strip_prefix("tag:") {
        resource.tag(key)
    } else if name == VPC_FILTER {
        resource.vpc_id()
    } else if name == SUBNET_FILTER {
        match resource.kind() {
            ResourceKind::Subnet => Some(resource.id()),
            _ => resource.subnet_id(),
        }
    } else {
        return Err(ProviderError::UnsupportedFilter(name.to_string()));
    };

    Ok(actual.is_some_and(|actual| values.iter().any(|v| v == actual)))
}

#[async_trait]
impl ResourceProvider for InMemoryProvider {
    async fn describe(
        &self,
        kind: ResourceKind,
        filters: &Filters,
    ) -> Result<Vec<ResourceHandle>, ProviderError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failures.get(&kind) {
            return Err(error.clone());
        }

        let mut matched = Vec::new();
        for resource in self.resources.iter().filter(|r| r.kind() == kind) {
            let mut keep = true;
            for (name, values) in filters.iter() {
                if !matches_filter(resource, name, values)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(resource.clone());
            }
        }
        Ok(matched)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
