//! Verification of deployed public networks
//!
//! Locates cloud resources by a deterministic naming convention and checks a
//! fixed set of structural invariants (tagging, addressing, routing,
//! associations, recorded outputs) against the live environment.
//!
//! The cloud provider and the provisioning tool's output store are injected
//! through [`provider::ResourceProvider`] and [`outputs::OutputStore`], so the
//! naming and check logic runs without either.

pub mod config;
pub mod domain;
pub mod errors;
pub mod exit_codes;
pub mod outputs;
pub mod process;
pub mod provider;
pub mod report;
pub mod resolver;
pub mod verifier;

// Re-export commonly used types
pub use config::{ConfigError, VerifyConfig};
pub use errors::{CommandError, OutputError, ProviderError, ResolveError, VerifyResult};
pub use report::{CheckResult, CheckStatus, Report};
pub use resolver::{Lookup, Resolver};
pub use verifier::{evaluate, Snapshot, Verifier};
