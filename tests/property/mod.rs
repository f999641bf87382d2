// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - [`naming`] - deterministic, collision-free resource names
//! - [`cidr`] - subnet CIDR check over generated address plans

mod cidr;
mod naming;
