// Copyright (c) 2025 - Cowboy AI, Inc.
//! Verification Domain Models
//!
//! Core concepts for verifying a deployed public network: how resources are
//! named, what a resolved resource looks like, the address arithmetic the
//! checks need, and the pure check catalog itself.
//!
//! # Value Objects with Invariants
//!
//! - [`NamingContext`] - component + deployment identifier naming scope
//! - [`Ipv4Cidr`] - IPv4 network in CIDR notation
//! - [`OutputValue`] - provisioning tool output, compared verbatim
//!
//! # Resource Snapshots
//!
//! - [`ResourceHandle`] - read-only snapshot of a VPC, subnet, route table,
//!   internet gateway or NAT gateway
//! - [`Route`] / [`RouteTarget`] - route table entries
//!
//! # Checks
//!
//! - [`invariants`] - pure functions returning [`CheckOutcome`]

pub mod invariants;
pub mod naming;
pub mod network;
pub mod output;
pub mod resource;

pub use invariants::{CheckOutcome, InvariantFailure, DEFAULT_ROUTE, SUBNET_PREFIX_LENGTH};
pub use naming::{resource_name, NamingContext, NamingError};
pub use network::{Ipv4Cidr, NetworkError};
pub use output::{join_list, OutputValue, LIST_DELIMITER};
pub use resource::{
    ResourceDetails, ResourceHandle, ResourceKind, Route, RouteTarget, Tags, TargetKind, NAME_TAG,
};
