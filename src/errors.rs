// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for resolution and transport

use std::time::Duration;
use thiserror::Error;

use crate::domain::{NamingError, ResourceKind};

/// Failure running an external command (`aws`, `terraform`)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The program could not be started
    #[error("failed to spawn `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The program ran and exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The program did not finish in time
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Errors raised while querying the cloud provider
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Running the provider client failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The provider answered with something we could not decode
    #[error("failed to decode {kind} response: {reason}")]
    Decode { kind: ResourceKind, reason: String },

    /// The provider does not understand a filter
    #[error("unsupported filter {0}")]
    UnsupportedFilter(String),

    /// Provider unreachable for any other reason
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while reading provisioning tool outputs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// Running the provisioning tool failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The output store answered with something we could not decode
    #[error("failed to decode outputs: {0}")]
    Decode(String),

    /// No output with this name was recorded
    #[error("output {0} is not defined")]
    Missing(String),

    /// Output store unreachable for any other reason
    #[error("output store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::Decode(err.to_string())
    }
}

/// Errors raised while resolving a named resource
///
/// `NotFound` and `Ambiguous` mean the infrastructure is wrong; `Transport`
/// means the question could not be asked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Zero matches
    #[error("no {kind} matches {lookup}")]
    NotFound { kind: ResourceKind, lookup: String },

    /// More than one match; never resolved by picking one
    #[error("{kind} lookup {lookup} is ambiguous: {} matches ({})", .ids.len(), .ids.join(", "))]
    Ambiguous {
        kind: ResourceKind,
        lookup: String,
        ids: Vec<String>,
    },

    /// The provider query itself failed
    #[error("could not query {kind} {lookup}: {source}")]
    Transport {
        kind: ResourceKind,
        lookup: String,
        #[source]
        source: ProviderError,
    },

    /// No name can be built for the request
    #[error("cannot name resource: {0}")]
    Naming(#[from] NamingError),
}

impl ResolveError {
    /// True when the failure is about reaching the provider, not the infrastructure
    pub fn is_transport(&self) -> bool {
        matches!(self, ResolveError::Transport { .. })
    }
}

/// Result type for resolution
pub type VerifyResult<T> = Result<T, ResolveError>;
