// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stable exit codes for the `vpc-verify` binary.

/// Every check passed.
pub const PASSED: u8 = 0;
/// At least one invariant did not hold.
pub const INVARIANT_FAILED: u8 = 1;
/// No invariant failed, but at least one check could not be evaluated.
pub const CHECK_ERRORED: u8 = 2;
/// The run could not start (configuration or setup error).
pub const INVALID: u8 = 3;
