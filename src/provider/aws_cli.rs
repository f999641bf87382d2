// Copyright (c) 2025 - Cowboy AI, Inc.

//! AWS CLI Resource Provider
//!
//! Answers provider queries by running the AWS CLI's EC2 describe calls with
//! JSON output and decoding the response into [`ResourceHandle`]s:
//!
//! ```text
//! Vpc             → aws ec2 describe-vpcs --filters Name=...,Values=...
//! Subnet          → aws ec2 describe-subnets --filters ...
//! RouteTable      → aws ec2 describe-route-tables --filters ...
//! InternetGateway → aws ec2 describe-internet-gateways --filters ...
//! NatGateway      → aws ec2 describe-nat-gateways --filter ...
//! ```
//!
//! Credentials, retries and throttling back-off are left to the CLI's own
//! configuration. The only policy applied here is the per-command timeout.
//!
//! # Example
//!
//! ```rust,no_run
//! use vpc_verify::provider::{AwsCliConfig, AwsCliProvider, Filters, ResourceProvider};
//! use vpc_verify::domain::ResourceKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = AwsCliProvider::new(AwsCliConfig {
//!     region: Some("eu-west-1".to_string()),
//!     ..AwsCliConfig::default()
//! });
//! let vpcs = provider
//!     .describe(ResourceKind::Vpc, &Filters::named("vpc-network-dev"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{Filters, ResourceProvider, VPC_FILTER};
use crate::domain::{ResourceHandle, ResourceKind, Route, RouteTarget, Tags};
use crate::errors::ProviderError;
use crate::process::run_command;

/// NAT gateway states that no longer represent a live gateway
const RETIRED_NAT_STATES: [&str; 2] = ["deleted", "failed"];

/// Configuration for the AWS CLI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsCliConfig {
    /// Program to run (normally `aws`)
    #[serde(default = "default_program")]
    pub program: String,

    /// `--region`, if not taken from the CLI's own configuration
    pub region: Option<String>,

    /// `--profile`, if not taken from the CLI's own configuration
    pub profile: Option<String>,

    /// Per-command timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_program() -> String {
    "aws".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for AwsCliConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            region: None,
            profile: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// [`ResourceProvider`] backed by the AWS CLI
pub struct AwsCliProvider {
    config: AwsCliConfig,
}

impl AwsCliProvider {
    pub fn new(config: AwsCliConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AwsCliConfig {
        &self.config
    }

    /// Arguments for one describe call
    pub fn build_args(&self, kind: ResourceKind, filters: &Filters) -> Vec<String> {
        let mut args = vec![
            "ec2".to_string(),
            subcommand(kind).to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];

        if let Some(region) = &self.config.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        if let Some(profile) = &self.config.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }

        if !filters.is_empty() {
            // describe-nat-gateways names its parameter in the singular
            args.push(match kind {
                ResourceKind::NatGateway => "--filter".to_string(),
                _ => "--filters".to_string(),
            });
            for (name, values) in filters.iter() {
                args.push(format!(
                    "Name={},Values={}",
                    api_filter_name(kind, name),
                    values.join(",")
                ));
            }
        }

        args
    }
}

#[async_trait]
impl ResourceProvider for AwsCliProvider {
    async fn describe(
        &self,
        kind: ResourceKind,
        filters: &Filters,
    ) -> Result<Vec<ResourceHandle>, ProviderError> {
        let args = self.build_args(kind, filters);
        let stdout = run_command(
            &self.config.program,
            &args,
            None,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await?;

        let handles = decode_response(kind, &stdout)?;
        debug!(%kind, %filters, matches = handles.len(), "described resources");
        Ok(handles)
    }

    fn name(&self) -> &str {
        "aws-cli"
    }
}

fn subcommand(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Vpc => "describe-vpcs",
        ResourceKind::Subnet => "describe-subnets",
        ResourceKind::RouteTable => "describe-route-tables",
        ResourceKind::InternetGateway => "describe-internet-gateways",
        ResourceKind::NatGateway => "describe-nat-gateways",
    }
}

/// Internet gateways are scoped through their attachment
fn api_filter_name(kind: ResourceKind, name: &str) -> String {
    match (kind, name) {
        (ResourceKind::InternetGateway, VPC_FILTER) => "attachment.vpc-id".to_string(),
        _ => name.to_string(),
    }
}

// ============================================================================
// Response Decoding
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsTag {
    key: String,
    value: String,
}

fn tags(raw: Vec<AwsTag>) -> Tags {
    raw.into_iter().map(|t| (t.key, t.value)).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcs {
    #[serde(default)]
    vpcs: Vec<AwsVpc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsVpc {
    vpc_id: String,
    cidr_block: String,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnets {
    #[serde(default)]
    subnets: Vec<AwsSubnet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsSubnet {
    subnet_id: String,
    vpc_id: String,
    cidr_block: String,
    availability_zone: String,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRouteTables {
    #[serde(default)]
    route_tables: Vec<AwsRouteTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsRouteTable {
    route_table_id: String,
    vpc_id: String,
    #[serde(default)]
    routes: Vec<AwsRoute>,
    #[serde(default)]
    associations: Vec<AwsAssociation>,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AwsRoute {
    destination_cidr_block: Option<String>,
    destination_ipv6_cidr_block: Option<String>,
    destination_prefix_list_id: Option<String>,
    gateway_id: Option<String>,
    nat_gateway_id: Option<String>,
    instance_id: Option<String>,
    transit_gateway_id: Option<String>,
    vpc_peering_connection_id: Option<String>,
    egress_only_internet_gateway_id: Option<String>,
    local_gateway_id: Option<String>,
    carrier_gateway_id: Option<String>,
    network_interface_id: Option<String>,
}

impl AwsRoute {
    fn into_route(self) -> Route {
        let target = if let Some(id) = self.instance_id {
            RouteTarget::Instance(id)
        } else if let Some(id) = self.nat_gateway_id {
            RouteTarget::NatGateway(id)
        } else if let Some(id) = self.gateway_id {
            if id == "local" {
                RouteTarget::Local
            } else {
                RouteTarget::Gateway(id)
            }
        } else {
            RouteTarget::Other(
                self.transit_gateway_id
                    .or(self.vpc_peering_connection_id)
                    .or(self.egress_only_internet_gateway_id)
                    .or(self.local_gateway_id)
                    .or(self.carrier_gateway_id)
                    .or(self.network_interface_id)
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        };

        let destination = self
            .destination_cidr_block
            .or(self.destination_ipv6_cidr_block)
            .or(self.destination_prefix_list_id)
            .unwrap_or_default();

        Route::new(destination, target)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsAssociation {
    subnet_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInternetGateways {
    #[serde(default)]
    internet_gateways: Vec<AwsInternetGateway>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsInternetGateway {
    internet_gateway_id: String,
    #[serde(default)]
    attachments: Vec<AwsAttachment>,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsAttachment {
    vpc_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeNatGateways {
    #[serde(default)]
    nat_gateways: Vec<AwsNatGateway>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsNatGateway {
    nat_gateway_id: String,
    vpc_id: String,
    subnet_id: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

/// Decode a describe-* JSON response for `kind`
pub fn decode_response(kind: ResourceKind, body: &[u8]) -> Result<Vec<ResourceHandle>, ProviderError> {
    let decode_error = |e: serde_json::Error| ProviderError::Decode {
        kind,
        reason: e.to_string(),
    };

    let handles = match kind {
        ResourceKind::Vpc => {
            let response: DescribeVpcs = serde_json::from_slice(body).map_err(decode_error)?;
            response
                .vpcs
                .into_iter()
                .map(|v| ResourceHandle::vpc(v.vpc_id, v.cidr_block).with_tags(tags(v.tags)))
                .collect()
        }
        ResourceKind::Subnet => {
            let response: DescribeSubnets = serde_json::from_slice(body).map_err(decode_error)?;
            response
                .subnets
                .into_iter()
                .map(|s| {
                    ResourceHandle::subnet(s.subnet_id, s.cidr_block, s.availability_zone)
                        .in_vpc(s.vpc_id)
                        .with_tags(tags(s.tags))
                })
                .collect()
        }
        ResourceKind::RouteTable => {
            let response: DescribeRouteTables =
                serde_json::from_slice(body).map_err(decode_error)?;
            response
                .route_tables
                .into_iter()
                .map(|t| {
                    let routes = t.routes.into_iter().map(AwsRoute::into_route).collect();
                    let subnets = t.associations.into_iter().filter_map(|a| a.subnet_id);
                    ResourceHandle::route_table(t.route_table_id, routes, subnets)
                        .in_vpc(t.vpc_id)
                        .with_tags(tags(t.tags))
                })
                .collect()
        }
        ResourceKind::InternetGateway => {
            let response: DescribeInternetGateways =
                serde_json::from_slice(body).map_err(decode_error)?;
            response
                .internet_gateways
                .into_iter()
                .map(|g| {
                    let handle = ResourceHandle::internet_gateway(g.internet_gateway_id)
                        .with_tags(tags(g.tags));
                    match g.attachments.into_iter().next() {
                        Some(attachment) => handle.in_vpc(attachment.vpc_id),
                        None => handle,
                    }
                })
                .collect()
        }
        ResourceKind::NatGateway => {
            let response: DescribeNatGateways =
                serde_json::from_slice(body).map_err(decode_error)?;
            response
                .nat_gateways
                .into_iter()
                .filter(|n| {
                    n.state
                        .as_deref()
                        .map_or(true, |state| !RETIRED_NAT_STATES.contains(&state))
                })
                .map(|n| {
                    ResourceHandle::nat_gateway(n.nat_gateway_id, n.subnet_id)
                        .in_vpc(n.vpc_id)
                        .with_tags(tags(n.tags))
                })
                .collect()
        }
    };

    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_args() {
        let provider = AwsCliProvider::new(AwsCliConfig {
            region: Some("eu-west-1".to_string()),
            ..AwsCliConfig::default()
        });
        let args = provider.build_args(ResourceKind::Subnet, &Filters::named("public-subnet-net-dev-eu-west-1a"));
        assert_eq!(
            args,
            vec![
                "ec2",
                "describe-subnets",
                "--output",
                "json",
                "--region",
                "eu-west-1",
                "--filters",
                "Name=tag:Name,Values=public-subnet-net-dev-eu-west-1a",
            ]
        );
    }

    #[test]
    fn test_build_args_scoping() {
        let provider = AwsCliProvider::new(AwsCliConfig::default());

        let nat = provider.build_args(ResourceKind::NatGateway, &Filters::new().in_vpc("vpc-1"));
        assert_eq!(nat[nat.len() - 2..], ["--filter", "Name=vpc-id,Values=vpc-1"]);

        let igw = provider.build_args(ResourceKind::InternetGateway, &Filters::new().in_vpc("vpc-1"));
        assert_eq!(igw.last().map(String::as_str), Some("Name=attachment.vpc-id,Values=vpc-1"));

        let unfiltered = provider.build_args(ResourceKind::Vpc, &Filters::new());
        assert_eq!(unfiltered, vec!["ec2", "describe-vpcs", "--output", "json"]);
    }

    #[test]
    fn test_decode_subnets() {
        let body = br#"{
            "Subnets": [{
                "SubnetId": "subnet-0a",
                "VpcId": "vpc-01",
                "CidrBlock": "10.0.0.0/24",
                "AvailabilityZone": "eu-west-1a",
                "MapPublicIpOnLaunch": false,
                "Tags": [
                    {"Key": "Name", "Value": "public-subnet-net-dev-eu-west-1a"},
                    {"Key": "Tier", "Value": "public"}
                ]
            }]
        }"#;
        let subnets = decode_response(ResourceKind::Subnet, body).unwrap();
        assert_eq!(subnets.len(), 1);
        let subnet = &subnets[0];
        assert_eq!(subnet.id(), "subnet-0a");
        assert_eq!(subnet.vpc_id(), Some("vpc-01"));
        assert_eq!(subnet.availability_zone(), Some("eu-west-1a"));
        assert_eq!(subnet.tag("Tier"), Some("public"));
    }

    #[test]
    fn test_decode_route_tables() {
        let body = br#"{
            "RouteTables": [{
                "RouteTableId": "rtb-01",
                "VpcId": "vpc-01",
                "Routes": [
                    {"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local", "State": "active"},
                    {"DestinationCidrBlock": "0.0.0.0/0", "GatewayId": "igw-01", "State": "active"},
                    {"DestinationCidrBlock": "192.168.0.0/16", "InstanceId": "i-01", "NetworkInterfaceId": "eni-01"},
                    {"DestinationIpv6CidrBlock": "::/0", "TransitGatewayId": "tgw-01"}
                ],
                "Associations": [
                    {"RouteTableAssociationId": "rtbassoc-1", "SubnetId": "subnet-0a", "Main": false},
                    {"RouteTableAssociationId": "rtbassoc-2", "Main": true}
                ],
                "Tags": []
            }]
        }"#;
        let tables = decode_response(ResourceKind::RouteTable, body).unwrap();
        let table = &tables[0];
        let routes = table.routes().unwrap();

        assert_eq!(routes[0].target, RouteTarget::Local);
        assert!(routes[1].target.matches(TargetKind::Gateway, "igw-01"));
        assert_eq!(routes[2].target, RouteTarget::Instance("i-01".to_string()));
        assert_eq!(routes[3].destination_cidr, "::/0");
        assert_eq!(routes[3].target, RouteTarget::Other("tgw-01".to_string()));
        assert_eq!(
            table.associated_subnet_ids().unwrap().iter().collect::<Vec<_>>(),
            vec!["subnet-0a"]
        );
    }

    #[test]
    fn test_decode_keeps_ids_of_other_gateways() {
        let body = br#"{
            "RouteTables": [{
                "RouteTableId": "rtb-01",
                "VpcId": "vpc-01",
                "Routes": [
                    {"DestinationIpv6CidrBlock": "::/0", "EgressOnlyInternetGatewayId": "eigw-01"},
                    {"DestinationCidrBlock": "172.16.0.0/16", "LocalGatewayId": "lgw-01"},
                    {"DestinationCidrBlock": "0.0.0.0/0", "CarrierGatewayId": "cagw-01"},
                    {"DestinationCidrBlock": "192.168.0.0/16"}
                ]
            }]
        }"#;
        let tables = decode_response(ResourceKind::RouteTable, body).unwrap();
        let targets: Vec<_> = tables[0]
            .routes()
            .unwrap()
            .iter()
            .map(|r| r.target.clone())
            .collect();

        assert_eq!(
            targets,
            vec![
                RouteTarget::Other("eigw-01".to_string()),
                RouteTarget::Other("lgw-01".to_string()),
                RouteTarget::Other("cagw-01".to_string()),
                RouteTarget::Other("unknown".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_internet_gateway_takes_vpc_from_attachment() {
        let body = br#"{
            "InternetGateways": [{
                "InternetGatewayId": "igw-01",
                "Attachments": [{"State": "available", "VpcId": "vpc-01"}],
                "Tags": [{"Key": "Name", "Value": "igw-net-dev"}]
            }]
        }"#;
        let gateways = decode_response(ResourceKind::InternetGateway, body).unwrap();
        assert_eq!(gateways[0].vpc_id(), Some("vpc-01"));
        assert_eq!(gateways[0].name(), Some("igw-net-dev"));
    }

    #[test]
    fn test_decode_nat_gateways_skips_deleted() {
        let body = br#"{
            "NatGateways": [
                {"NatGatewayId": "nat-old", "VpcId": "vpc-01", "SubnetId": "subnet-0a", "State": "deleted"},
                {"NatGatewayId": "nat-new", "VpcId": "vpc-01", "SubnetId": "subnet-0a", "State": "available"}
            ]
        }"#;
        let nats = decode_response(ResourceKind::NatGateway, body).unwrap();
        assert_eq!(nats.len(), 1);
        assert_eq!(nats[0].id(), "nat-new");
        assert_eq!(nats[0].subnet_id(), Some("subnet-0a"));
    }

    #[test]
    fn test_decode_error() {
        let result = decode_response(ResourceKind::Vpc, b"not json");
        assert!(matches!(
            result,
            Err(ProviderError::Decode { kind: ResourceKind::Vpc, .. })
        ));
    }
}
