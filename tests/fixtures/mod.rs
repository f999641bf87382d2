// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for vpc-verify
//!
//! Provides a deterministic, healthy two-zone deployment and helpers to
//! break it in specific ways.
//!
//! # Design Principles
//! - All ids and CIDRs are fixed constants
//! - Fixtures are the only place that builds a whole deployment
//! - Tests break one thing at a time on top of the healthy fixture

#![allow(dead_code)]

use vpc_verify::domain::{ResourceHandle, Route, RouteTarget, NAME_TAG};
use vpc_verify::outputs::{names, StaticOutputs};
use vpc_verify::provider::InMemoryProvider;
use vpc_verify::VerifyConfig;

pub const COMPONENT: &str = "network";
pub const DEPLOYMENT_IDENTIFIER: &str = "dev42";
pub const VPC_CIDR: &str = "10.0.0.0/16";
pub const ZONES: &str = "eu-west-1a,eu-west-1b";

pub const VPC_ID: &str = "vpc-0001";
pub const SUBNET_A_ID: &str = "subnet-000a";
pub const SUBNET_B_ID: &str = "subnet-000b";
pub const ROUTE_TABLE_ID: &str = "rtb-0001";
pub const IGW_ID: &str = "igw-0001";
pub const NAT_ID: &str = "nat-0001";

pub fn config() -> VerifyConfig {
    VerifyConfig::new(COMPONENT, DEPLOYMENT_IDENTIFIER, VPC_CIDR, ZONES)
        .expect("Invalid fixture configuration")
}

fn tagged(handle: ResourceHandle, name: &str) -> ResourceHandle {
    handle
        .with_tag(NAME_TAG, name)
        .with_tag("Component", COMPONENT)
        .with_tag("DeploymentIdentifier", DEPLOYMENT_IDENTIFIER)
}

pub fn vpc() -> ResourceHandle {
    tagged(
        ResourceHandle::vpc(VPC_ID, VPC_CIDR),
        "vpc-network-dev42",
    )
}

pub fn subnet(id: &str, cidr: &str, zone: &str) -> ResourceHandle {
    tagged(
        ResourceHandle::subnet(id, cidr, zone).in_vpc(VPC_ID),
        &format!("public-subnet-network-dev42-{}", zone),
    )
    .with_tag("Tier", "public")
}

pub fn subnet_a() -> ResourceHandle {
    subnet(SUBNET_A_ID, "10.0.0.0/24", "eu-west-1a")
}

pub fn subnet_b() -> ResourceHandle {
    subnet(SUBNET_B_ID, "10.0.1.0/24", "eu-west-1b")
}

pub fn route_table_with(routes: Vec<Route>, subnets: &[&str]) -> ResourceHandle {
    tagged(
        ResourceHandle::route_table(ROUTE_TABLE_ID, routes, subnets.iter().copied()).in_vpc(VPC_ID),
        "public-routetable-network-dev42",
    )
    .with_tag("Tier", "public")
}

pub fn route_table() -> ResourceHandle {
    route_table_with(
        vec![
            Route::new(VPC_CIDR, RouteTarget::Local),
            Route::new("0.0.0.0/0", RouteTarget::Gateway(IGW_ID.to_string())),
        ],
        &[SUBNET_A_ID, SUBNET_B_ID],
    )
}

pub fn internet_gateway() -> ResourceHandle {
    tagged(
        ResourceHandle::internet_gateway(IGW_ID).in_vpc(VPC_ID),
        "igw-network-dev42",
    )
}

pub fn nat_gateway() -> ResourceHandle {
    ResourceHandle::nat_gateway(NAT_ID, SUBNET_A_ID).in_vpc(VPC_ID)
}

/// Every resource of the healthy deployment
pub fn healthy_resources() -> Vec<ResourceHandle> {
    vec![
        vpc(),
        subnet_a(),
        subnet_b(),
        route_table(),
        internet_gateway(),
        nat_gateway(),
    ]
}

pub fn healthy_provider() -> InMemoryProvider {
    InMemoryProvider::new(healthy_resources())
}

/// Healthy deployment with the resources for which `keep` is false removed
pub fn provider_without(keep: impl Fn(&ResourceHandle) -> bool) -> InMemoryProvider {
    InMemoryProvider::new(healthy_resources().into_iter().filter(|r| keep(r)).collect())
}

pub fn healthy_outputs() -> StaticOutputs {
    StaticOutputs::new()
        .with(names::PUBLIC_SUBNET_IDS, "subnet-000a,subnet-000b")
        .with(names::PUBLIC_SUBNET_CIDR_BLOCKS, "10.0.0.0/24,10.0.1.0/24")
        .with(names::PUBLIC_ROUTE_TABLE_ID, ROUTE_TABLE_ID)
}
