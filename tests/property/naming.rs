// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Resource Naming
//!
//! Names drive resource identity, so key construction must be deterministic
//! and must keep distinct contexts and zones apart.

use proptest::prelude::*;
use vpc_verify::domain::{resource_name, NamingContext, ResourceKind};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Lowercase labels like the ones used for components and deployments
fn label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}"
}

/// Availability zone names
fn zone() -> impl Strategy<Value = String> {
    ("[a-z]{2}-[a-z]{4,9}-[1-9]", "[a-f]").prop_map(|(region, suffix)| format!("{region}{suffix}"))
}

fn named_kind() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![
        Just(ResourceKind::Vpc),
        Just(ResourceKind::RouteTable),
        Just(ResourceKind::InternetGateway),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Naming is deterministic
    #[test]
    fn prop_naming_is_deterministic(component in label(), deployment in label(), zone in zone()) {
        let ctx = NamingContext::new(component.clone(), deployment.clone());
        let again = NamingContext::new(component, deployment);

        for kind in [ResourceKind::Vpc, ResourceKind::RouteTable, ResourceKind::InternetGateway] {
            prop_assert_eq!(ctx.name(kind, None), again.name(kind, None));
        }
        prop_assert_eq!(
            resource_name(ResourceKind::Subnet, &ctx, Some(&zone)),
            resource_name(ResourceKind::Subnet, &again, Some(&zone))
        );
    }

    /// Property: Names embed component and deployment identifier in order
    #[test]
    fn prop_names_follow_convention(kind in named_kind(), component in label(), deployment in label()) {
        let name = NamingContext::new(component.clone(), deployment.clone())
            .name(kind, None)
            .unwrap();
        let suffix = format!("-{component}-{deployment}");
        prop_assert!(name.ends_with(&suffix), "{} should end with {}", name, suffix);
    }

    /// Property: Subnets in different zones never share a name
    #[test]
    fn prop_zones_yield_distinct_subnet_names(
        component in label(),
        deployment in label(),
        a in zone(),
        b in zone(),
    ) {
        prop_assume!(a != b);
        let ctx = NamingContext::new(component, deployment);
        prop_assert_ne!(
            ctx.name(ResourceKind::Subnet, Some(&a)).unwrap(),
            ctx.name(ResourceKind::Subnet, Some(&b)).unwrap()
        );
    }
}
