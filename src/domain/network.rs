// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4)")]
    InvalidPrefixLength(u8),
}

/// IPv4 network in CIDR notation
///
/// Represents an address block such as a VPC or subnet range.
/// Invariants:
/// - Valid dotted-quad address
/// - Prefix length 0-32
/// - The address is kept as written; [`Ipv4Cidr::network`] masks host bits
///
/// # Examples
///
/// ```rust
/// use vpc_verify::domain::Ipv4Cidr;
///
/// let vpc = Ipv4Cidr::new("10.0.0.0/16").unwrap();
/// let subnet = Ipv4Cidr::new("10.0.1.0/24").unwrap();
/// assert!(vpc.contains(&subnet));
/// assert_eq!(subnet.netmask().to_string(), "255.255.255.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr {
    address: Ipv4Addr,
    prefix_length: u8,
}

impl Ipv4Cidr {
    /// Longest IPv4 prefix
    pub const MAX_PREFIX: u8 = 32;

    /// Parse CIDR notation (e.g., "10.0.0.0/16")
    ///
    /// # Invariants
    /// - The prefix is mandatory and written in decimal digits only
    /// - Prefix length 0-32
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref().trim();

        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| NetworkError::InvalidCidr(cidr.to_string()))?;

        let address = Ipv4Addr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

        if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NetworkError::InvalidCidr(cidr.to_string()));
        }
        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

        Self::from_parts(address, prefix_length)
    }

    /// Create from separate address and prefix
    pub fn from_parts(address: Ipv4Addr, prefix_length: u8) -> Result<Self, NetworkError> {
        if prefix_length > Self::MAX_PREFIX {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    /// Get the address as written
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Dotted-quad netmask for the prefix
    pub fn netmask(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.mask())
    }

    /// First address of the block
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) & self.mask())
    }

    /// Last address of the block
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) | !self.mask())
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (Self::MAX_PREFIX - self.prefix_length)
    }

    /// True when no host bits are set (e.g. "10.0.1.0/24" but not "10.0.1.5/24")
    pub fn is_network_address(&self) -> bool {
        self.address == self.network()
    }

    /// Check whether an address lies inside this block
    pub fn contains_address(&self, address: Ipv4Addr) -> bool {
        u32::from(address) & self.mask() == u32::from(self.network())
    }

    /// Check whether `other` lies entirely inside this block
    ///
    /// A block contains another iff the other's prefix is at least as long
    /// and its first address falls inside this block.
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_length >= self.prefix_length && self.contains_address(other.network())
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        format!("{}/{}", self.address, self.prefix_length)
    }

    fn mask(&self) -> u32 {
        match self.prefix_length {
            0 => 0,
            prefix => u32::MAX << (Self::MAX_PREFIX - prefix),
        }
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for Ipv4Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ipv4Cidr> for String {
    fn from(cidr: Ipv4Cidr) -> Self {
        cidr.as_cidr()
    }
}
