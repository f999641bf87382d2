// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Resource Handles
//!
//! Read-only snapshots of the network resources a verification run inspects.
//! A handle is built fresh from each provider response and never mutated
//! afterwards; the `vpc_id` back-reference is for lookups only.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Resource tags (`Key` → `Value`)
pub type Tags = BTreeMap<String, String>;

/// Tag carrying the resource name used by the naming convention
pub const NAME_TAG: &str = "Name";

/// Kinds of network resource the resolver can look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Virtual private cloud
    Vpc,
    /// Subnet within a VPC
    Subnet,
    /// Route table within a VPC
    RouteTable,
    /// Internet gateway attached to a VPC
    InternetGateway,
    /// NAT gateway placed in a subnet
    NatGateway,
}

impl ResourceKind {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vpc => "vpc",
            Self::Subnet => "subnet",
            Self::RouteTable => "route_table",
            Self::InternetGateway => "internet_gateway",
            Self::NatGateway => "nat_gateway",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant of a route target, without the id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Internet (or virtual private) gateway
    Gateway,
    /// NAT gateway
    NatGateway,
    /// EC2 instance
    Instance,
    /// Implicit route for the VPC's own range
    Local,
    /// Any other target (peering, transit gateway, interface, ...)
    Other,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Gateway => "gateway",
            Self::NatGateway => "nat gateway",
            Self::Instance => "instance",
            Self::Local => "local",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Where a route sends matching traffic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RouteTarget {
    Gateway(String),
    NatGateway(String),
    Instance(String),
    Local,
    Other(String),
}

impl RouteTarget {
    /// Get the target variant
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Gateway(_) => TargetKind::Gateway,
            Self::NatGateway(_) => TargetKind::NatGateway,
            Self::Instance(_) => TargetKind::Instance,
            Self::Local => TargetKind::Local,
            Self::Other(_) => TargetKind::Other,
        }
    }

    /// Get the target id, if the variant carries one
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Gateway(id) | Self::NatGateway(id) | Self::Instance(id) | Self::Other(id) => {
                Some(id)
            }
            Self::Local => None,
        }
    }

    /// Equality on the `(kind, id)` pair
    pub fn matches(&self, kind: TargetKind, id: &str) -> bool {
        self.kind() == kind && self.id() == Some(id)
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{} {}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Single route table entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub destination_cidr: String,
    pub target: RouteTarget,
}

impl Route {
    pub fn new(destination_cidr: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            destination_cidr: destination_cidr.into(),
            target,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.destination_cidr, self.target)
    }
}

/// Kind-specific attributes of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceDetails {
    Vpc {
        cidr_block: String,
    },
    Subnet {
        cidr_block: String,
        availability_zone: String,
    },
    RouteTable {
        routes: Vec<Route>,
        associated_subnet_ids: BTreeSet<String>,
    },
    InternetGateway,
    NatGateway {
        subnet_id: String,
    },
}

impl ResourceDetails {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Vpc { .. } => ResourceKind::Vpc,
            Self::Subnet { .. } => ResourceKind::Subnet,
            Self::RouteTable { .. } => ResourceKind::RouteTable,
            Self::InternetGateway => ResourceKind::InternetGateway,
            Self::NatGateway { .. } => ResourceKind::NatGateway,
        }
    }
}

/// Snapshot of one provider resource
///
/// # Examples
///
/// ```rust
/// use vpc_verify::domain::{ResourceHandle, ResourceKind};
///
/// let subnet = ResourceHandle::subnet("subnet-1", "10.0.0.0/24", "eu-west-1a")
///     .in_vpc("vpc-1")
///     .with_tag("Tier", "public");
/// assert_eq!(subnet.kind(), ResourceKind::Subnet);
/// assert_eq!(subnet.tag("Tier"), Some("public"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    id: String,
    vpc_id: Option<String>,
    tags: Tags,
    details: ResourceDetails,
}

impl ResourceHandle {
    pub fn new(id: impl Into<String>, details: ResourceDetails) -> Self {
        Self {
            id: id.into(),
            vpc_id: None,
            tags: Tags::new(),
            details,
        }
    }

    /// VPC handle; a VPC is its own scope, so `vpc_id` is its id
    pub fn vpc(id: impl Into<String>, cidr_block: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(
            id.clone(),
            ResourceDetails::Vpc {
                cidr_block: cidr_block.into(),
            },
        )
        .in_vpc(id)
    }

    pub fn subnet(
        id: impl Into<String>,
        cidr_block: impl Into<String>,
        availability_zone: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            ResourceDetails::Subnet {
                cidr_block: cidr_block.into(),
                availability_zone: availability_zone.into(),
            },
        )
    }

    pub fn route_table<I, S>(id: impl Into<String>, routes: Vec<Route>, associated_subnet_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            id,
            ResourceDetails::RouteTable {
                routes,
                associated_subnet_ids: associated_subnet_ids.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn internet_gateway(id: impl Into<String>) -> Self {
        Self::new(id, ResourceDetails::InternetGateway)
    }

    pub fn nat_gateway(id: impl Into<String>, subnet_id: impl Into<String>) -> Self {
        Self::new(
            id,
            ResourceDetails::NatGateway {
                subnet_id: subnet_id.into(),
            },
        )
    }

    /// Set the VPC back-reference
    pub fn in_vpc(mut self, vpc_id: impl Into<String>) -> Self {
        self.vpc_id = Some(vpc_id.into());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replace all tags
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.details.kind()
    }

    pub fn vpc_id(&self) -> Option<&str> {
        self.vpc_id.as_deref()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Value of the `Name` tag
    pub fn name(&self) -> Option<&str> {
        self.tag(NAME_TAG)
    }

    pub fn details(&self) -> &ResourceDetails {
        &self.details
    }

    /// CIDR block of a VPC or subnet
    pub fn cidr_block(&self) -> Option<&str> {
        match &self.details {
            ResourceDetails::Vpc { cidr_block } | ResourceDetails::Subnet { cidr_block, .. } => {
                Some(cidr_block)
            }
            _ => None,
        }
    }

    pub fn availability_zone(&self) -> Option<&str> {
        match &self.details {
            ResourceDetails::Subnet {
                availability_zone, ..
            } => Some(availability_zone),
            _ => None,
        }
    }

    pub fn routes(&self) -> Option<&[Route]> {
        match &self.details {
            ResourceDetails::RouteTable { routes, .. } => Some(routes),
            _ => None,
        }
    }

    pub fn associated_subnet_ids(&self) -> Option<&BTreeSet<String>> {
        match &self.details {
            ResourceDetails::RouteTable {
                associated_subnet_ids,
                ..
            } => Some(associated_subnet_ids),
            _ => None,
        }
    }

    /// Subnet a NAT gateway is placed in
    pub fn subnet_id(&self) -> Option<&str> {
        match &self.details {
            ResourceDetails::NatGateway { subnet_id } => Some(subnet_id),
            _ => None,
        }
    }

    /// Short label for diagnostics: `kind id (Name)`
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => format!("{} {} ({})", self.kind(), self.id, name),
            None => format!("{} {}", self.kind(), self.id),
        }
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
