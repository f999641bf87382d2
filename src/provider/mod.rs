// Copyright (c) 2025 - Cowboy AI, Inc.

//! Resource Provider - the cloud query seam
//!
//! The resolver never talks to the cloud directly. It asks a
//! [`ResourceProvider`] to describe resources of a kind matching a set of
//! filters, using the provider's own filter vocabulary:
//!
//! ```text
//! describe(Subnet, { "tag:Name": ["public-subnet-network-dev-eu-west-1a"] })
//! describe(NatGateway, { "vpc-id": ["vpc-0abc"] })
//! ```
//!
//! A resource matches when, for every filter, one of its values matches.
//!
//! # Implementations
//!
//! - [`AwsCliProvider`] - drives `aws ec2 describe-*`
//! - [`InMemoryProvider`] - fixture-backed, for tests and dry runs

pub mod aws_cli;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{ResourceHandle, ResourceKind};
use crate::errors::ProviderError;

pub use aws_cli::{AwsCliConfig, AwsCliProvider};
pub use memory::InMemoryProvider;

/// Filter on the `Name` tag
pub const NAME_FILTER: &str = "tag:Name";

/// Filter on the owning VPC
pub const VPC_FILTER: &str = "vpc-id";

/// Filter on the containing subnet
pub const SUBNET_FILTER: &str = "subnet-id";

/// Query filters (`name` → accepted values)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, Vec<String>>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted value for `name`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Match on the `Name` tag
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with(NAME_FILTER, name)
    }

    /// Restrict to one VPC
    pub fn in_vpc(self, vpc_id: impl Into<String>) -> Self {
        self.with(VPC_FILTER, vpc_id)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .iter()
            .map(|(name, values)| format!("{}={}", name, values.join("|")))
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&rendered)
    }
}

/// Provider query capability
///
/// Implementations must:
/// - Return every match, never a truncated or deduplicated subset
/// - Build fresh handles on every call (no caching)
/// - Report transport failures as [`ProviderError`], never as "no matches"
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Describe all resources of `kind` matching `filters`
    async fn describe(
        &self,
        kind: ResourceKind,
        filters: &Filters,
    ) -> Result<Vec<ResourceHandle>, ProviderError>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}
