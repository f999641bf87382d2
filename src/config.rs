// Copyright (c) 2025 - Cowboy AI, Inc.
//! Verification run configuration
//!
//! Read once per run from the environment (or the command line) and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::domain::{Ipv4Cidr, NamingContext, NetworkError};

/// Environment variable names
pub mod env {
    pub const COMPONENT: &str = "COMPONENT";
    pub const DEPLOYMENT_IDENTIFIER: &str = "DEPLOYMENT_IDENTIFIER";
    pub const VPC_CIDR: &str = "VPC_CIDR";
    pub const AVAILABILITY_ZONES: &str = "AVAILABILITY_ZONES";
    pub const VERIFY_NAT: &str = "VERIFY_NAT";
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid VPC CIDR: {0}")]
    InvalidCidr(#[from] NetworkError),

    #[error("availability zone list {0:?} contains an empty entry")]
    EmptyZone(String),

    #[error("availability zone {0} listed more than once")]
    DuplicateZone(String),

    #[error("invalid value {value:?} for {var} (expected true/false, yes/no or 1/0)")]
    InvalidFlag { var: &'static str, value: String },
}

/// Settings of one verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyConfig {
    naming: NamingContext,
    vpc_cidr: Ipv4Cidr,
    availability_zones: Vec<String>,
    verify_nat: bool,
}

impl VerifyConfig {
    /// Validate raw settings
    ///
    /// # Invariants
    /// - Component and deployment identifier are non-empty
    /// - VPC CIDR is an IPv4 network
    /// - At least one zone, no empty entries, no duplicates
    pub fn new(
        component: &str,
        deployment_identifier: &str,
        vpc_cidr: &str,
        availability_zones: &str,
    ) -> Result<Self, ConfigError> {
        if component.trim().is_empty() {
            return Err(ConfigError::Empty(env::COMPONENT));
        }
        if deployment_identifier.trim().is_empty() {
            return Err(ConfigError::Empty(env::DEPLOYMENT_IDENTIFIER));
        }

        Ok(Self {
            naming: NamingContext::new(component.trim(), deployment_identifier.trim()),
            vpc_cidr: Ipv4Cidr::new(vpc_cidr)?,
            availability_zones: parse_zones(availability_zones)?,
            verify_nat: true,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));

        let config = Self::new(
            &required(env::COMPONENT)?,
            &required(env::DEPLOYMENT_IDENTIFIER)?,
            &required(env::VPC_CIDR)?,
            &required(env::AVAILABILITY_ZONES)?,
        )?;

        let verify_nat = match lookup(env::VERIFY_NAT) {
            Some(value) => parse_flag(env::VERIFY_NAT, &value)?,
            None => true,
        };

        Ok(config.with_nat(verify_nat))
    }

    /// Enable or disable the NAT placement check
    pub fn with_nat(mut self, verify_nat: bool) -> Self {
        self.verify_nat = verify_nat;
        self
    }

    pub fn naming(&self) -> &NamingContext {
        &self.naming
    }

    pub fn vpc_cidr(&self) -> &Ipv4Cidr {
        &self.vpc_cidr
    }

    /// Zones in configured order
    pub fn availability_zones(&self) -> &[String] {
        &self.availability_zones
    }

    pub fn verify_nat(&self) -> bool {
        self.verify_nat
    }
}

/// Split a comma-joined zone list, preserving order
pub fn parse_zones(raw: &str) -> Result<Vec<String>, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::Empty(env::AVAILABILITY_ZONES));
    }

    let mut seen = BTreeSet::new();
    let mut zones = Vec::new();
    for zone in raw.split(',').map(str::trim) {
        if zone.is_empty() {
            return Err(ConfigError::EmptyZone(raw.to_string()));
        }
        if !seen.insert(zone) {
            return Err(ConfigError::DuplicateZone(zone.to_string()));
        }
        zones.push(zone.to_string());
    }
    Ok(zones)
}

/// Parse a boolean setting such as `VERIFY_NAT`
pub fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
