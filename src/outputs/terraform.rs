// Copyright (c) 2025 - Cowboy AI, Inc.

//! Terraform Output Store
//!
//! Reads outputs with `terraform output -json` from the deployment's working
//! directory. The JSON document maps each output name to its recorded value
//! and type:
//!
//! ```text
//! {
//!   "public_subnet_ids":     { "value": "subnet-a,subnet-b", "type": "string" },
//!   "public_route_table_id": { "value": "rtb-01",            "type": "string" }
//! }
//! ```
//!
//! String values are returned verbatim. A list of strings is comma-joined in
//! recorded order; any other value is rendered as compact JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use super::OutputStore;
use crate::domain::{join_list, OutputValue};
use crate::errors::OutputError;
use crate::process::run_command;

/// Configuration for reading Terraform outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerraformConfig {
    /// Program to run (normally `terraform`)
    #[serde(default = "default_program")]
    pub program: String,

    /// Directory holding the applied configuration
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Per-command timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_program() -> String {
    "terraform".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout() -> u64 {
    60
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            working_dir: default_working_dir(),
            timeout_secs: default_timeout(),
        }
    }
}

/// [`OutputStore`] backed by `terraform output -json`
pub struct TerraformOutputs {
    config: TerraformConfig,
}

impl TerraformOutputs {
    pub fn new(config: TerraformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TerraformConfig {
        &self.config
    }
}

#[derive(Debug, Deserialize)]
struct RecordedOutput {
    value: serde_json::Value,
}

/// Render a recorded value the way checks compare it
fn render_value(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            join_list(items.iter().filter_map(Value::as_str))
        }
        other => other.to_string(),
    }
}

/// Pick output `name` out of a `terraform output -json` document
pub fn decode_output(body: &[u8], name: &str) -> Result<OutputValue, OutputError> {
    let outputs: BTreeMap<String, RecordedOutput> = serde_json::from_slice(body)?;
    let recorded = outputs
        .get(name)
        .ok_or_else(|| OutputError::Missing(name.to_string()))?;
    Ok(OutputValue::new(name, render_value(&recorded.value)))
}

#[async_trait]
impl OutputStore for TerraformOutputs {
    async fn output(&self, name: &str) -> Result<OutputValue, OutputError> {
        let args = vec!["output".to_string(), "-json".to_string()];
        let stdout = run_command(
            &self.config.program,
            &args,
            Some(&self.config.working_dir),
            Duration::from_secs(self.config.timeout_secs),
        )
        .await?;

        let value = decode_output(&stdout, name)?;
        debug!(output = name, "read terraform output");
        Ok(value)
    }

    fn name(&self) -> &str {
        "terraform"
    }
}
