// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Check Functions - Deployment Invariants
//!
//! This module contains the catalog of structural checks run against a
//! deployed network. Every function is pure: it takes handles that were
//! already resolved (and outputs that were already fetched) and returns a
//! detailed result. No check performs I/O and none retries.
//!
//! # Check Categories
//!
//! 1. **Tagging**: [`has_tag`]
//! 2. **Association**: [`belongs_to_vpc`], [`associates_subnet`], [`resides_in_subnet`]
//! 3. **Distribution**: [`covers_zones`]
//! 4. **Addressing**: [`valid_subnet_cidrs`]
//! 5. **Routing**: [`has_default_route`]
//! 6. **Outputs**: [`output_equals`]
//!
//! A check either fully passes or fails with the first violated
//! sub-condition; there is no partial credit.

use std::collections::{BTreeMap, BTreeSet};

use super::network::Ipv4Cidr;
use super::output::{join_list, OutputValue};
use super::resource::{ResourceHandle, ResourceKind, RouteTarget, TargetKind};

/// Destination of the default route
pub const DEFAULT_ROUTE: &str = "0.0.0.0/0";

/// Prefix length every public subnet must use
pub const SUBNET_PREFIX_LENGTH: u8 = 24;

/// Check result with detailed failure information
pub type CheckOutcome = Result<(), InvariantFailure>;

/// A violated invariant, carrying expected vs actual
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantFailure {
    /// Check applied to a handle of the wrong kind
    #[error("expected a {expected} but {resource} is a {actual}")]
    WrongKind {
        resource: String,
        expected: ResourceKind,
        actual: ResourceKind,
    },

    /// Tag key absent
    #[error("{resource} has no {key} tag (expected {expected:?})")]
    MissingTag {
        resource: String,
        key: String,
        expected: String,
    },

    /// Tag present with another value
    #[error("{resource} has {key}={actual:?}, expected {expected:?}")]
    TagMismatch {
        resource: String,
        key: String,
        expected: String,
        actual: String,
    },

    /// Resource not in the expected VPC
    #[error("{resource} belongs to {}, expected {expected}", .actual.as_deref().unwrap_or("no VPC"))]
    WrongVpc {
        resource: String,
        expected: String,
        actual: Option<String>,
    },

    /// Zone set differs from the configured zones
    #[error("subnet zones differ from configured zones (missing: {missing:?}, unexpected: {unexpected:?})")]
    ZoneMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Subnet CIDR does not parse
    #[error("{subnet} has unparseable CIDR {cidr:?}: {reason}")]
    UnparseableCidr {
        subnet: String,
        cidr: String,
        reason: String,
    },

    /// Subnet CIDR uses another prefix length
    #[error("{subnet} uses {cidr}, expected a /{expected} network")]
    WrongNetmask {
        subnet: String,
        cidr: String,
        expected: u8,
    },

    /// Subnet CIDR has host bits set
    #[error("{subnet} uses {cidr}, which is not a network address")]
    NotNetworkAddress { subnet: String, cidr: String },

    /// Subnet CIDR falls outside the VPC CIDR
    #[error("{subnet} uses {cidr}, which is outside VPC CIDR {vpc_cidr}")]
    OutsideVpc {
        subnet: String,
        cidr: String,
        vpc_cidr: String,
    },

    /// Two subnets share a CIDR
    #[error("{first} and {second} both use {cidr}")]
    DuplicateCidr {
        cidr: String,
        first: String,
        second: String,
    },

    /// No route for 0.0.0.0/0
    #[error("{route_table} has no default route (0.0.0.0/0)")]
    NoDefaultRoute { route_table: String },

    /// Default route points elsewhere
    #[error("{route_table} sends 0.0.0.0/0 to {actual}, expected {expected_kind} {expected_id}")]
    DefaultRouteTarget {
        route_table: String,
        expected_kind: TargetKind,
        expected_id: String,
        actual: RouteTarget,
    },

    /// Subnet missing from the route table's associations
    #[error("{route_table} is not associated with subnet {subnet}")]
    SubnetNotAssociated { route_table: String, subnet: String },

    /// Output differs from the value computed from live resources
    #[error("output {name} is {actual:?}, expected {expected:?}")]
    OutputMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Resource placed in another subnet
    #[error("{resource} resides in subnet {actual}, expected {expected}")]
    WrongSubnet {
        resource: String,
        expected: String,
        actual: String,
    },
}

fn wrong_kind(resource: &ResourceHandle, expected: ResourceKind) -> InvariantFailure {
    InvariantFailure::WrongKind {
        resource: resource.label(),
        expected,
        actual: resource.kind(),
    }
}

/// Tag `key` must equal `expected`
pub fn has_tag(resource: &ResourceHandle, key: &str, expected: &str) -> CheckOutcome {
    match resource.tag(key) {
        None => Err(InvariantFailure::MissingTag {
            resource: resource.label(),
            key: key.to_string(),
            expected: expected.to_string(),
        }),
        Some(actual) if actual != expected => Err(InvariantFailure::TagMismatch {
            resource: resource.label(),
            key: key.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Resource's VPC back-reference must be `vpc`
pub fn belongs_to_vpc(resource: &ResourceHandle, vpc: &ResourceHandle) -> CheckOutcome {
    if vpc.kind() != ResourceKind::Vpc {
        return Err(wrong_kind(vpc, ResourceKind::Vpc));
    }

    if resource.vpc_id() == Some(vpc.id()) {
        return Ok(());
    }

    Err(InvariantFailure::WrongVpc {
        resource: resource.label(),
        expected: vpc.id().to_string(),
        actual: resource.vpc_id().map(str::to_string),
    })
}

/// The subnets' zones must equal `expected_zones` exactly
pub fn covers_zones(subnets: &[ResourceHandle], expected_zones: &[String]) -> CheckOutcome {
    let mut actual = BTreeSet::new();
    for subnet in subnets {
        let zone = subnet
            .availability_zone()
            .ok_or_else(|| wrong_kind(subnet, ResourceKind::Subnet))?;
        actual.insert(zone);
    }
    let expected: BTreeSet<&str> = expected_zones.iter().map(String::as_str).collect();

    if actual == expected {
        return Ok(());
    }

    Err(InvariantFailure::ZoneMismatch {
        missing: expected.difference(&actual).map(|z| z.to_string()).collect(),
        unexpected: actual.difference(&expected).map(|z| z.to_string()).collect(),
    })
}

/// Every subnet must be a distinct /24 network inside `vpc_cidr`
///
/// Sub-conditions are checked per subnet in order (parse, netmask, network
/// address, containment), then uniqueness across the set.
pub fn valid_subnet_cidrs(vpc_cidr: &Ipv4Cidr, subnets: &[ResourceHandle]) -> CheckOutcome {
    let mut seen: BTreeMap<Ipv4Cidr, &ResourceHandle> = BTreeMap::new();
    let mut parsed = Vec::with_capacity(subnets.len());

    for subnet in subnets {
        if subnet.kind() != ResourceKind::Subnet {
            return Err(wrong_kind(subnet, ResourceKind::Subnet));
        }
        let raw = subnet.cidr_block().unwrap_or_default();

        let cidr = Ipv4Cidr::new(raw).map_err(|e| InvariantFailure::UnparseableCidr {
            subnet: subnet.label(),
            cidr: raw.to_string(),
            reason: e.to_string(),
        })?;

        if cidr.prefix_length() != SUBNET_PREFIX_LENGTH {
            return Err(InvariantFailure::WrongNetmask {
                subnet: subnet.label(),
                cidr: cidr.to_string(),
                expected: SUBNET_PREFIX_LENGTH,
            });
        }

        if !cidr.is_network_address() {
            return Err(InvariantFailure::NotNetworkAddress {
                subnet: subnet.label(),
                cidr: cidr.to_string(),
            });
        }

        if !vpc_cidr.contains(&cidr) {
            return Err(InvariantFailure::OutsideVpc {
                subnet: subnet.label(),
                cidr: cidr.to_string(),
                vpc_cidr: vpc_cidr.to_string(),
            });
        }

        parsed.push((cidr, subnet));
    }

    for (cidr, subnet) in parsed {
        if let Some(first) = seen.insert(cidr, subnet) {
            return Err(InvariantFailure::DuplicateCidr {
                cidr: cidr.to_string(),
                first: first.label(),
                second: subnet.label(),
            });
        }
    }

    Ok(())
}

/// Route table must send 0.0.0.0/0 to `(target_kind, target_id)`
pub fn has_default_route(
    route_table: &ResourceHandle,
    target_kind: TargetKind,
    target_id: &str,
) -> CheckOutcome {
    let routes = route_table
        .routes()
        .ok_or_else(|| wrong_kind(route_table, ResourceKind::RouteTable))?;

    let defaults: Vec<_> = routes
        .iter()
        .filter(|route| route.destination_cidr == DEFAULT_ROUTE)
        .collect();

    if defaults
        .iter()
        .any(|route| route.target.matches(target_kind, target_id))
    {
        return Ok(());
    }

    match defaults.first() {
        None => Err(InvariantFailure::NoDefaultRoute {
            route_table: route_table.label(),
        }),
        Some(route) => Err(InvariantFailure::DefaultRouteTarget {
            route_table: route_table.label(),
            expected_kind: target_kind,
            expected_id: target_id.to_string(),
            actual: route.target.clone(),
        }),
    }
}

/// Route table must be explicitly associated with `subnet_id`
pub fn associates_subnet(route_table: &ResourceHandle, subnet_id: &str) -> CheckOutcome {
    let associated = route_table
        .associated_subnet_ids()
        .ok_or_else(|| wrong_kind(route_table, ResourceKind::RouteTable))?;

    if associated.contains(subnet_id) {
        return Ok(());
    }

    Err(InvariantFailure::SubnetNotAssociated {
        route_table: route_table.label(),
        subnet: subnet_id.to_string(),
    })
}

/// Output must equal `expected` verbatim
pub fn output_equals(output: &OutputValue, expected: &str) -> CheckOutcome {
    if output.value == expected {
        return Ok(());
    }

    Err(InvariantFailure::OutputMismatch {
        name: output.name.clone(),
        expected: expected.to_string(),
        actual: output.value.clone(),
    })
}

/// NAT gateway must be placed in `subnet`
pub fn resides_in_subnet(nat_gateway: &ResourceHandle, subnet: &ResourceHandle) -> CheckOutcome {
    let actual = nat_gateway
        .subnet_id()
        .ok_or_else(|| wrong_kind(nat_gateway, ResourceKind::NatGateway))?;

    if actual == subnet.id() {
        return Ok(());
    }

    Err(InvariantFailure::WrongSubnet {
        resource: nat_gateway.label(),
        expected: subnet.id().to_string(),
        actual: actual.to_string(),
    })
}

/// Expected list output: resource ids in the order given
pub fn joined_ids(resources: &[ResourceHandle]) -> String {
    join_list(resources.iter().map(ResourceHandle::id))
}

/// Expected list output: CIDR blocks in the order given
pub fn joined_cidr_blocks(resources: &[ResourceHandle]) -> String {
    join_list(resources.iter().map(|r| r.cidr_block().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::Route;
    use pretty_assertions::assert_eq;

    fn vpc() -> ResourceHandle {
        ResourceHandle::vpc("vpc-1", "10.0.0.0/16")
    }

    fn subnet(id: &str, cidr: &str, zone: &str) -> ResourceHandle {
        ResourceHandle::subnet(id, cidr, zone).in_vpc("vpc-1")
    }

    fn zones(list: &[&str]) -> Vec<String> {
        list.iter().map(|z| z.to_string()).collect()
    }

    fn vpc_cidr() -> Ipv4Cidr {
        Ipv4Cidr::new("10.0.0.0/16").unwrap()
    }

    // ========================================================================
    // Tagging
    // ========================================================================

    #[test]
    fn test_has_tag() {
        let s = subnet("subnet-a", "10.0.0.0/24", "eu-west-1a").with_tag("Tier", "public");
        assert_eq!(has_tag(&s, "Tier", "public"), Ok(()));
    }

    #[test]
    fn test_has_tag_distinguishes_missing_from_wrong() {
        let s = subnet("subnet-a", "10.0.0.0/24", "eu-west-1a").with_tag("Tier", "private");

        let missing = has_tag(&s, "Component", "network").unwrap_err();
        assert!(matches!(missing, InvariantFailure::MissingTag { ref key, .. } if key == "Component"));

        let wrong = has_tag(&s, "Tier", "public").unwrap_err();
        assert_eq!(
            wrong,
            InvariantFailure::TagMismatch {
                resource: "subnet subnet-a".to_string(),
                key: "Tier".to_string(),
                expected: "public".to_string(),
                actual: "private".to_string(),
            }
        );
    }

    // ========================================================================
    // Association
    // ========================================================================

    #[test]
    fn test_belongs_to_vpc() {
        assert_eq!(belongs_to_vpc(&subnet("subnet-a", "10.0.0.0/24", "a"), &vpc()), Ok(()));

        let stray = ResourceHandle::subnet("subnet-x", "10.0.0.0/24", "a").in_vpc("vpc-2");
        assert!(matches!(
            belongs_to_vpc(&stray, &vpc()),
            Err(InvariantFailure::WrongVpc { actual: Some(ref id), .. }) if id == "vpc-2"
        ));

        let orphan = ResourceHandle::internet_gateway("igw-1");
        assert!(matches!(
            belongs_to_vpc(&orphan, &vpc()),
            Err(InvariantFailure::WrongVpc { actual: None, .. })
        ));
    }

    #[test]
    fn test_associates_subnet() {
        let table = ResourceHandle::route_table("rtb-1", vec![], ["subnet-a"]);
        assert_eq!(associates_subnet(&table, "subnet-a"), Ok(()));
        assert!(matches!(
            associates_subnet(&table, "subnet-b"),
            Err(InvariantFailure::SubnetNotAssociated { .. })
        ));
        assert!(matches!(
            associates_subnet(&vpc(), "subnet-a"),
            Err(InvariantFailure::WrongKind { expected: ResourceKind::RouteTable, .. })
        ));
    }

    #[test]
    fn test_resides_in_subnet() {
        let first = subnet("subnet-a", "10.0.0.0/24", "eu-west-1a");
        let second = subnet("subnet-b", "10.0.1.0/24", "eu-west-1b");
        let nat = ResourceHandle::nat_gateway("nat-1", "subnet-a").in_vpc("vpc-1");

        assert_eq!(resides_in_subnet(&nat, &first), Ok(()));
        assert!(matches!(
            resides_in_subnet(&nat, &second),
            Err(InvariantFailure::WrongSubnet { ref actual, .. }) if actual == "subnet-a"
        ));
    }

    // ========================================================================
    // Distribution
    // ========================================================================

    #[test]
    fn test_covers_zones_exactly() {
        let subnets = vec![
            subnet("subnet-a", "10.0.0.0/24", "eu-west-1a"),
            subnet("subnet-b", "10.0.1.0/24", "eu-west-1b"),
        ];
        assert_eq!(covers_zones(&subnets, &zones(&["eu-west-1b", "eu-west-1a"])), Ok(()));

        assert_eq!(
            covers_zones(&subnets, &zones(&["eu-west-1a", "eu-west-1c"])),
            Err(InvariantFailure::ZoneMismatch {
                missing: zones(&["eu-west-1c"]),
                unexpected: zones(&["eu-west-1b"]),
            })
        );
    }

    #[test]
    fn test_covers_zones_rejects_missing_zone() {
        let subnets = vec![
            subnet("subnet-a", "10.0.0.0/24", "eu-west-1a"),
            subnet("subnet-b", "10.0.1.0/24", "eu-west-1a"),
        ];
        assert_eq!(
            covers_zones(&subnets, &zones(&["eu-west-1a", "eu-west-1b"])),
            Err(InvariantFailure::ZoneMismatch {
                missing: zones(&["eu-west-1b"]),
                unexpected: vec![],
            })
        );
    }

    // ========================================================================
    // Addressing
    // ========================================================================

    #[test]
    fn test_valid_subnet_cidrs() {
        let subnets = vec![
            subnet("subnet-a", "10.0.0.0/24", "eu-west-1a"),
            subnet("subnet-b", "10.0.1.0/24", "eu-west-1b"),
        ];
        assert_eq!(valid_subnet_cidrs(&vpc_cidr(), &subnets), Ok(()));
    }

    #[test]
    fn test_valid_subnet_cidrs_wrong_netmask() {
        let subnets = vec![subnet("subnet-a", "10.0.0.0/25", "eu-west-1a")];
        assert_eq!(
            valid_subnet_cidrs(&vpc_cidr(), &subnets),
            Err(InvariantFailure::WrongNetmask {
                subnet: "subnet subnet-a".to_string(),
                cidr: "10.0.0.0/25".to_string(),
                expected: 24,
            })
        );
    }

    #[test]
    fn test_valid_subnet_cidrs_outside_vpc() {
        let subnets = vec![
            subnet("subnet-a", "10.0.0.0/24", "eu-west-1a"),
            subnet("subnet-b", "10.1.0.0/24", "eu-west-1b"),
        ];
        assert!(matches!(
            valid_subnet_cidrs(&vpc_cidr(), &subnets),
            Err(InvariantFailure::OutsideVpc { ref subnet, .. }) if subnet == "subnet subnet-b"
        ));
    }

    #[test]
    fn test_valid_subnet_cidrs_duplicates() {
        let subnets = vec![
            subnet("subnet-a", "10.0.3.0/24", "eu-west-1a"),
            subnet("subnet-b", "10.0.3.0/24", "eu-west-1b"),
        ];
        assert_eq!(
            valid_subnet_cidrs(&vpc_cidr(), &subnets),
            Err(InvariantFailure::DuplicateCidr {
                cidr: "10.0.3.0/24".to_string(),
                first: "subnet subnet-a".to_string(),
                second: "subnet subnet-b".to_string(),
            })
        );
    }

    #[test]
    fn test_valid_subnet_cidrs_unparseable_and_host_bits() {
        let garbage = vec![subnet("subnet-a", "not-a-cidr", "eu-west-1a")];
        assert!(matches!(
            valid_subnet_cidrs(&vpc_cidr(), &garbage),
            Err(InvariantFailure::UnparseableCidr { .. })
        ));

        let host_bits = vec![subnet("subnet-a", "10.0.0.9/24", "eu-west-1a")];
        assert!(matches!(
            valid_subnet_cidrs(&vpc_cidr(), &host_bits),
            Err(InvariantFailure::NotNetworkAddress { .. })
        ));
    }

    // ========================================================================
    // Routing
    // ========================================================================

    #[test]
    fn test_default_route_to_gateway() {
        let table = ResourceHandle::route_table(
            "rtb-1",
            vec![
                Route::new("10.0.0.0/16", RouteTarget::Local),
                Route::new(DEFAULT_ROUTE, RouteTarget::Gateway("igw-X".into())),
            ],
            Vec::<String>::new(),
        );
        assert_eq!(has_default_route(&table, TargetKind::Gateway, "igw-X"), Ok(()));
    }

    #[test]
    fn test_no_default_route() {
        let table = ResourceHandle::route_table(
            "rtb-1",
            vec![Route::new("10.0.0.0/16", RouteTarget::Local)],
            Vec::<String>::new(),
        );
        let failure = has_default_route(&table, TargetKind::Gateway, "igw-X").unwrap_err();
        assert!(matches!(failure, InvariantFailure::NoDefaultRoute { .. }));
        assert!(failure.to_string().contains("no default route"));
    }

    #[test]
    fn test_default_route_wrong_target() {
        let table = ResourceHandle::route_table(
            "rtb-1",
            vec![Route::new(DEFAULT_ROUTE, RouteTarget::NatGateway("igw-X".into()))],
            Vec::<String>::new(),
        );
        assert_eq!(
            has_default_route(&table, TargetKind::Gateway, "igw-X"),
            Err(InvariantFailure::DefaultRouteTarget {
                route_table: "route_table rtb-1".to_string(),
                expected_kind: TargetKind::Gateway,
                expected_id: "igw-X".to_string(),
                actual: RouteTarget::NatGateway("igw-X".into()),
            })
        );
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    #[test]
    fn test_output_equals_in_zone_order() {
        let subnets = vec![
            subnet("id-a", "10.0.0.0/24", "a"),
            subnet("id-b", "10.0.1.0/24", "b"),
            subnet("id-c", "10.0.2.0/24", "c"),
        ];
        let output = OutputValue::new("public_subnet_ids", "id-a,id-b,id-c");

        assert_eq!(output_equals(&output, &joined_ids(&subnets)), Ok(()));
        assert!(output_equals(&output, "id-b,id-a,id-c").is_err());
        assert_eq!(
            joined_cidr_blocks(&subnets),
            "10.0.0.0/24,10.0.1.0/24,10.0.2.0/24"
        );
    }
}
