// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Subnet Address Checks
//!
//! The subnet CIDR check is a pure function of the VPC block and the subnet
//! list, so it must be idempotent, insensitive to subnet order, and accept
//! any set of distinct /24 networks carved out of the VPC.

use proptest::prelude::*;
use std::net::Ipv4Addr;
use vpc_verify::domain::invariants::{self, InvariantFailure};
use vpc_verify::domain::{Ipv4Cidr, ResourceHandle};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// A /16 VPC block in 10.0.0.0/8
fn vpc_block() -> impl Strategy<Value = Ipv4Cidr> {
    any::<u8>().prop_map(|second| {
        Ipv4Cidr::from_parts(Ipv4Addr::new(10, second, 0, 0), 16).expect("valid /16")
    })
}

/// Distinct third octets, i.e. distinct /24s inside a /16
fn third_octets() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(any::<u8>(), 1..6).prop_map(|set| set.into_iter().collect())
}

fn subnets_in(vpc: &Ipv4Cidr, octets: &[u8]) -> Vec<ResourceHandle> {
    let [a, b, _, _] = vpc.network().octets();
    octets
        .iter()
        .enumerate()
        .map(|(i, third)| {
            ResourceHandle::subnet(
                format!("subnet-{i:04}"),
                format!("{a}.{b}.{third}.0/24"),
                format!("eu-west-1{}", (b'a' + i as u8) as char),
            )
        })
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Distinct /24 networks inside the VPC always pass
    #[test]
    fn prop_distinct_slash_24s_pass(vpc in vpc_block(), octets in third_octets()) {
        let subnets = subnets_in(&vpc, &octets);
        prop_assert_eq!(invariants::valid_subnet_cidrs(&vpc, &subnets), Ok(()));
    }

    /// Property: The check is idempotent and order-insensitive on success
    #[test]
    fn prop_check_is_idempotent(vpc in vpc_block(), octets in third_octets()) {
        let subnets = subnets_in(&vpc, &octets);
        let first = invariants::valid_subnet_cidrs(&vpc, &subnets);
        let second = invariants::valid_subnet_cidrs(&vpc, &subnets);
        prop_assert_eq!(&first, &second);

        let mut reversed = subnets.clone();
        reversed.reverse();
        prop_assert_eq!(invariants::valid_subnet_cidrs(&vpc, &reversed), first);
    }

    /// Property: Repeating any /24 is always reported as a duplicate
    #[test]
    fn prop_repeated_block_is_duplicate(vpc in vpc_block(), octets in third_octets(), pick in any::<prop::sample::Index>()) {
        let mut with_repeat = octets.clone();
        with_repeat.push(octets[pick.index(octets.len())]);
        let subnets = subnets_in(&vpc, &with_repeat);

        let is_duplicate = matches!(
            invariants::valid_subnet_cidrs(&vpc, &subnets),
            Err(InvariantFailure::DuplicateCidr { .. })
        );
        prop_assert!(is_duplicate);
    }

    /// Property: A /24 from another /16 is never contained
    #[test]
    fn prop_foreign_block_is_outside(vpc in vpc_block(), other in any::<u8>(), third in any::<u8>()) {
        let [_, second, _, _] = vpc.network().octets();
        prop_assume!(other != second);

        let foreign = Ipv4Cidr::from_parts(Ipv4Addr::new(10, other, third, 0), 24).unwrap();
        prop_assert!(!vpc.contains(&foreign));

        let subnets = vec![ResourceHandle::subnet("subnet-ffff", foreign.to_string(), "eu-west-1a")];
        let is_outside = matches!(
            invariants::valid_subnet_cidrs(&vpc, &subnets),
            Err(InvariantFailure::OutsideVpc { .. })
        );
        prop_assert!(is_outside);
    }

    /// Property: Containment agrees with address membership of both ends
    #[test]
    fn prop_containment_matches_endpoints(vpc in vpc_block(), raw in any::<u32>(), prefix in 16u8..=32) {
        let candidate = Ipv4Cidr::from_parts(Ipv4Addr::from(raw), prefix).unwrap();
        let network = Ipv4Cidr::from_parts(candidate.network(), prefix).unwrap();

        let expected = vpc.contains_address(network.network()) && vpc.contains_address(network.broadcast());
        prop_assert_eq!(vpc.contains(&network), expected);
    }
}
