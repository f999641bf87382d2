// Copyright (c) 2025 - Cowboy AI, Inc.

//! Output Store - the provisioning tool seam
//!
//! Deployments record outputs at apply time (`public_subnet_ids`,
//! `public_route_table_id`, ...). Checks compare them verbatim against values
//! computed from the live resources, so stores must hand back exactly what was
//! recorded, with list outputs comma-joined in recorded order.
//!
//! # Implementations
//!
//! - [`TerraformOutputs`] - drives `terraform output -json`
//! - [`StaticOutputs`] - fixed values, for tests and dry runs

pub mod memory;
pub mod terraform;

use async_trait::async_trait;

use crate::domain::OutputValue;
use crate::errors::OutputError;

pub use memory::StaticOutputs;
pub use terraform::{TerraformConfig, TerraformOutputs};

/// Output names the public network suite reads
pub mod names {
    pub const PUBLIC_SUBNET_IDS: &str = "public_subnet_ids";
    pub const PUBLIC_SUBNET_CIDR_BLOCKS: &str = "public_subnet_cidr_blocks";
    pub const PUBLIC_ROUTE_TABLE_ID: &str = "public_route_table_id";
}

/// Provisioning tool output capability
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// Fetch one output by name
    async fn output(&self, name: &str) -> Result<OutputValue, OutputError>;

    /// Get the name of this store
    fn name(&self) -> &str;
}
