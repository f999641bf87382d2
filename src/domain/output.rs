// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Tool Output Values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter used when a list output is recorded as a single string
pub const LIST_DELIMITER: &str = ",";

/// Named output recorded by the provisioning tool at apply time
///
/// Values are compared verbatim; list outputs arrive comma-joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputValue {
    pub name: String,
    pub value: String,
}

impl OutputValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Join values in the order given, using the list delimiter
pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}
