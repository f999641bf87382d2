// Copyright (c) 2025 - Cowboy AI, Inc.
//! Public Network Verifier
//!
//! Resolves the deployment's VPC, public subnets, public route table,
//! internet gateway and NAT gateway through the AWS CLI, reads Terraform
//! outputs, and checks them against the naming and network conventions.
//!
//! Run with: cargo run --bin vpc-verify -- --format text
//!
//! Prerequisites:
//! 1. AWS CLI on PATH with credentials for the target account
//! 2. Terraform on PATH, with the applied configuration in TERRAFORM_DIR
//! 3. COMPONENT, DEPLOYMENT_IDENTIFIER, VPC_CIDR and AVAILABILITY_ZONES set
//!    (or passed as flags)
//!
//! The report goes to stdout; logs go to stderr (`RUST_LOG`, default `info`).
//! Any configuration error, including a missing or malformed flag, exits
//! with `exit_codes::INVALID`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use vpc_verify::config::{self, env, ConfigError};
use vpc_verify::exit_codes;
use vpc_verify::outputs::{TerraformConfig, TerraformOutputs};
use vpc_verify::provider::{AwsCliConfig, AwsCliProvider};
use vpc_verify::{Report, Verifier, VerifyConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Verify a deployed public network against its naming and network conventions
#[derive(Debug, Parser)]
#[command(name = "vpc-verify", version)]
struct Cli {
    /// Component name used in resource names
    #[arg(long, env = env::COMPONENT)]
    component: String,

    /// Deployment identifier used in resource names
    #[arg(long, env = env::DEPLOYMENT_IDENTIFIER)]
    deployment_identifier: String,

    /// VPC CIDR block, e.g. 10.0.0.0/16
    #[arg(long, env = env::VPC_CIDR)]
    vpc_cidr: String,

    /// Comma-separated availability zones, in deployment order
    #[arg(long, env = env::AVAILABILITY_ZONES)]
    availability_zones: String,

    /// Check that the NAT gateway sits in the first public subnet
    /// (true/false, yes/no or 1/0)
    #[arg(
        long,
        env = env::VERIFY_NAT,
        default_value = "true",
        value_parser = parse_nat_flag,
        action = ArgAction::Set
    )]
    verify_nat: bool,

    /// AWS region (defaults to the CLI's configuration)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// AWS profile (defaults to the CLI's configuration)
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Directory holding the applied Terraform configuration
    #[arg(long, env = "TERRAFORM_DIR", default_value = ".")]
    terraform_dir: PathBuf,

    /// Timeout for each aws/terraform invocation, in seconds
    #[arg(long, env = "VERIFY_COMMAND_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn parse_nat_flag(value: &str) -> std::result::Result<bool, ConfigError> {
    config::parse_flag(env::VERIFY_NAT, value)
}

async fn run(cli: Cli) -> Result<Report> {
    let config = VerifyConfig::new(
        &cli.component,
        &cli.deployment_identifier,
        &cli.vpc_cidr,
        &cli.availability_zones,
    )
    .context("Invalid verification configuration")?
    .with_nat(cli.verify_nat);

    info!("📋 Configuration loaded:");
    info!("  - Naming: {}", config.naming());
    info!("  - VPC CIDR: {}", config.vpc_cidr());
    info!("  - Zones: {}", config.availability_zones().join(","));
    info!("  - Terraform dir: {}", cli.terraform_dir.display());

    let provider = AwsCliProvider::new(AwsCliConfig {
        region: cli.region,
        profile: cli.profile,
        timeout_secs: cli.timeout_secs,
        ..AwsCliConfig::default()
    });
    let outputs = TerraformOutputs::new(TerraformConfig {
        working_dir: cli.terraform_dir,
        timeout_secs: cli.timeout_secs,
        ..TerraformConfig::default()
    });

    let verifier = Verifier::new(provider, outputs, config);
    Ok(verifier.run().await)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Usage errors are configuration errors; --help and --version are not
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(exit_codes::INVALID)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let format = cli.format;

    let report = match run(cli).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(exit_codes::INVALID);
        }
    };

    match format {
        Format::Text => println!("{}", report),
        Format::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to render report: {}", e);
                return ExitCode::from(exit_codes::INVALID);
            }
        },
    }

    ExitCode::from(report.exit_code())
}
