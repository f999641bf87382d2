// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fixed output values

use async_trait::async_trait;
use std::collections::BTreeMap;

use super::OutputStore;
use crate::domain::OutputValue;
use crate::errors::OutputError;

/// [`OutputStore`] serving values given up front
#[derive(Debug, Clone, Default)]
pub struct StaticOutputs {
    values: BTreeMap<String, String>,
    failure: Option<String>,
}

impl StaticOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an output
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Make every fetch fail as if the store were unreachable
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }
}

#[async_trait]
impl OutputStore for StaticOutputs {
    async fn output(&self, name: &str) -> Result<OutputValue, OutputError> {
        if let Some(reason) = &self.failure {
            return Err(OutputError::Unavailable(reason.clone()));
        }

        self.values
            .get(name)
            .map(|value| OutputValue::new(name, value.clone()))
            .ok_or_else(|| OutputError::Missing(name.to_string()))
    }

    fn name(&self) -> &str {
        "static"
    }
}
