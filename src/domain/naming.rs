// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Naming Convention
//!
//! Every named resource carries a `Name` tag built from a kind prefix, the
//! component, the deployment identifier and, for zonal resources, the
//! availability zone:
//!
//! ```text
//! vpc-{component}-{deployment_identifier}
//! public-subnet-{component}-{deployment_identifier}-{zone}
//! public-routetable-{component}-{deployment_identifier}
//! igw-{component}-{deployment_identifier}
//! ```
//!
//! Key construction is pure; resolving a name against a provider lives in
//! [`crate::resolver`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::resource::ResourceKind;

/// Naming errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("{0} resources are not located by name")]
    Unnamed(ResourceKind),

    #[error("{0} names require an availability zone")]
    ZoneRequired(ResourceKind),

    #[error("{kind} names do not take an availability zone (got {zone})")]
    UnexpectedZone { kind: ResourceKind, zone: String },
}

/// Component and deployment identifier shared by every name in a deployment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamingContext {
    component: String,
    deployment_identifier: String,
}

impl NamingContext {
    pub fn new(component: impl Into<String>, deployment_identifier: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            deployment_identifier: deployment_identifier.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn deployment_identifier(&self) -> &str {
        &self.deployment_identifier
    }

    /// Build the canonical name for a resource of `kind`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vpc_verify::domain::{NamingContext, ResourceKind};
    ///
    /// let ctx = NamingContext::new("network", "dev");
    /// assert_eq!(ctx.name(ResourceKind::Vpc, None).unwrap(), "vpc-network-dev");
    /// assert_eq!(
    ///     ctx.name(ResourceKind::Subnet, Some("eu-west-1a")).unwrap(),
    ///     "public-subnet-network-dev-eu-west-1a"
    /// );
    /// ```
    pub fn name(&self, kind: ResourceKind, zone: Option<&str>) -> Result<String, NamingError> {
        resource_name(kind, self, zone)
    }
}

impl fmt::Display for NamingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.component, self.deployment_identifier)
    }
}

/// Prefix the naming convention uses for `kind`, if it names that kind at all
///
/// NAT gateways are found through their VPC instead.
pub fn name_prefix(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Vpc => Some("vpc"),
        ResourceKind::Subnet => Some("public-subnet"),
        ResourceKind::RouteTable => Some("public-routetable"),
        ResourceKind::InternetGateway => Some("igw"),
        ResourceKind::NatGateway => None,
    }
}

/// True for kinds whose names end with the availability zone
pub fn is_zonal(kind: ResourceKind) -> bool {
    matches!(kind, ResourceKind::Subnet)
}

/// Build the canonical name for `kind` in `ctx`
pub fn resource_name(
    kind: ResourceKind,
    ctx: &NamingContext,
    zone: Option<&str>,
) -> Result<String, NamingError> {
    let prefix = name_prefix(kind).ok_or(NamingError::Unnamed(kind))?;

    match (is_zonal(kind), zone) {
        (true, Some(zone)) => Ok(format!(
            "{prefix}-{}-{}-{zone}",
            ctx.component, ctx.deployment_identifier
        )),
        (true, None) => Err(NamingError::ZoneRequired(kind)),
        (false, None) => Ok(format!(
            "{prefix}-{}-{}",
            ctx.component, ctx.deployment_identifier
        )),
        (false, Some(zone)) => Err(NamingError::UnexpectedZone {
            kind,
            zone: zone.to_string(),
        }),
    }
}
