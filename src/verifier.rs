// Copyright (c) 2025 - Cowboy AI, Inc.

//! Verification Run - the public network suite
//!
//! A run reads the live deployment once, then evaluates every check against
//! that read:
//!
//! ```text
//! VerifyConfig ──> snapshot() ──────────────> Snapshot ──> evaluate() ──> Report
//!                  │ resolve vpc                (Results)    (pure)
//!                  │ resolve subnets per zone
//!                  │ resolve route table, igw
//!                  │ resolve NAT in vpc
//!                  │ fetch outputs
//! ```
//!
//! Each resolution is kept as a `Result`. A check whose dependency did not
//! resolve is reported as errored with that resolution error; every other
//! check still runs, so the report always lists the whole suite. Nothing is
//! carried over between runs.

use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::VerifyConfig;
use crate::domain::invariants::{
    associates_subnet, belongs_to_vpc, covers_zones, has_default_route, has_tag, joined_cidr_blocks,
    joined_ids, output_equals, resides_in_subnet, valid_subnet_cidrs,
};
use crate::domain::{CheckOutcome, OutputValue, ResourceHandle, ResourceKind, TargetKind};
use crate::errors::{OutputError, VerifyResult};
use crate::outputs::{names, OutputStore};
use crate::provider::ResourceProvider;
use crate::report::{CheckResult, CheckStatus, Report};
use crate::resolver::Resolver;

/// Tags every public resource must carry
pub mod tags {
    pub const COMPONENT: &str = "Component";
    pub const DEPLOYMENT_IDENTIFIER: &str = "DeploymentIdentifier";
    pub const TIER: &str = "Tier";
    pub const PUBLIC_TIER: &str = "public";
}

/// Outputs read by every run
pub const SUITE_OUTPUTS: [&str; 3] = [
    names::PUBLIC_SUBNET_IDS,
    names::PUBLIC_SUBNET_CIDR_BLOCKS,
    names::PUBLIC_ROUTE_TABLE_ID,
];

/// One read of the live deployment
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub vpc: VerifyResult<ResourceHandle>,
    /// One subnet per configured zone, in zone order
    pub public_subnets: VerifyResult<Vec<ResourceHandle>>,
    pub public_route_table: VerifyResult<ResourceHandle>,
    pub internet_gateway: VerifyResult<ResourceHandle>,
    /// `None` when the NAT check is disabled
    pub nat_gateway: Option<VerifyResult<ResourceHandle>>,
    pub outputs: BTreeMap<String, Result<OutputValue, OutputError>>,
}

/// Why a check could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocked(String);

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn needs<T, E: fmt::Display>(dependency: &Result<T, E>) -> Result<&T, Blocked> {
    dependency.as_ref().map_err(|e| Blocked(e.to_string()))
}

fn needs_output<'a>(snapshot: &'a Snapshot, name: &str) -> Result<&'a OutputValue, Blocked> {
    match snapshot.outputs.get(name) {
        Some(fetched) => needs(fetched),
        None => Err(Blocked(format!("output {} was not fetched", name))),
    }
}

fn check<F>(description: String, evaluate: F) -> CheckResult
where
    F: FnOnce() -> Result<CheckOutcome, Blocked>,
{
    match evaluate() {
        Ok(outcome) => CheckResult::from_outcome(description, outcome),
        Err(blocked) => CheckResult::error(description, blocked),
    }
}

/// One result per configured zone, against that zone's subnet
fn per_subnet<F>(
    results: &mut Vec<CheckResult>,
    config: &VerifyConfig,
    snapshot: &Snapshot,
    describe: impl Fn(&str) -> String,
    evaluate: F,
) where
    F: Fn(&ResourceHandle) -> Result<CheckOutcome, Blocked>,
{
    for (index, zone) in config.availability_zones().iter().enumerate() {
        results.push(check(describe(zone), || {
            let subnets = needs(&snapshot.public_subnets)?;
            let subnet = subnets
                .get(index)
                .ok_or_else(|| Blocked(format!("no public subnet resolved for {}", zone)))?;
            evaluate(subnet)
        }));
    }
}

/// Evaluate the whole suite against a snapshot
///
/// Pure: the same snapshot always yields the same results, in the same order.
pub fn evaluate(config: &VerifyConfig, snapshot: &Snapshot) -> Vec<CheckResult> {
    let naming = config.naming();
    let component = naming.component();
    let deployment_identifier = naming.deployment_identifier();
    let zones = config.availability_zones();
    let mut results = Vec::new();

    // Subnets
    per_subnet(
        &mut results,
        config,
        snapshot,
        |zone| format!("public subnet in {} has Component tag {}", zone, component),
        |subnet| Ok(has_tag(subnet, tags::COMPONENT, component)),
    );
    per_subnet(
        &mut results,
        config,
        snapshot,
        |zone| {
            format!(
                "public subnet in {} has DeploymentIdentifier tag {}",
                zone, deployment_identifier
            )
        },
        |subnet| Ok(has_tag(subnet, tags::DEPLOYMENT_IDENTIFIER, deployment_identifier)),
    );
    per_subnet(
        &mut results,
        config,
        snapshot,
        |zone| format!("public subnet in {} has Tier tag public", zone),
        |subnet| Ok(has_tag(subnet, tags::TIER, tags::PUBLIC_TIER)),
    );
    per_subnet(
        &mut results,
        config,
        snapshot,
        |zone| format!("public subnet in {} belongs to the created VPC", zone),
        |subnet| Ok(belongs_to_vpc(subnet, needs(&snapshot.vpc)?)),
    );

    results.push(check(
        format!("public subnets cover availability zones {}", zones.join(",")),
        || Ok(covers_zones(needs(&snapshot.public_subnets)?, zones)),
    ));
    results.push(check(
        format!(
            "public subnets use unique /24 networks inside {}",
            config.vpc_cidr()
        ),
        || Ok(valid_subnet_cidrs(config.vpc_cidr(), needs(&snapshot.public_subnets)?)),
    ));
    results.push(check(
        format!("output {} lists subnet ids in zone order", names::PUBLIC_SUBNET_IDS),
        || {
            let subnets = needs(&snapshot.public_subnets)?;
            let output = needs_output(snapshot, names::PUBLIC_SUBNET_IDS)?;
            Ok(output_equals(output, &joined_ids(subnets)))
        },
    ));
    results.push(check(
        format!(
            "output {} lists subnet CIDR blocks in zone order",
            names::PUBLIC_SUBNET_CIDR_BLOCKS
        ),
        || {
            let subnets = needs(&snapshot.public_subnets)?;
            let output = needs_output(snapshot, names::PUBLIC_SUBNET_CIDR_BLOCKS)?;
            Ok(output_equals(output, &joined_cidr_blocks(subnets)))
        },
    ));

    // Route table
    results.push(check(
        format!("public route table has Component tag {}", component),
        || Ok(has_tag(needs(&snapshot.public_route_table)?, tags::COMPONENT, component)),
    ));
    results.push(check(
        format!(
            "public route table has DeploymentIdentifier tag {}",
            deployment_identifier
        ),
        || {
            Ok(has_tag(
                needs(&snapshot.public_route_table)?,
                tags::DEPLOYMENT_IDENTIFIER,
                deployment_identifier,
            ))
        },
    ));
    results.push(check(
        "public route table has Tier tag public".to_string(),
        || Ok(has_tag(needs(&snapshot.public_route_table)?, tags::TIER, tags::PUBLIC_TIER)),
    ));
    results.push(check(
        "public route table belongs to the created VPC".to_string(),
        || {
            Ok(belongs_to_vpc(
                needs(&snapshot.public_route_table)?,
                needs(&snapshot.vpc)?,
            ))
        },
    ));
    results.push(check(
        "public route table routes 0.0.0.0/0 to the internet gateway".to_string(),
        || {
            let table = needs(&snapshot.public_route_table)?;
            let gateway = needs(&snapshot.internet_gateway)?;
            Ok(has_default_route(table, TargetKind::Gateway, gateway.id()))
        },
    ));
    per_subnet(
        &mut results,
        config,
        snapshot,
        |zone| format!("public route table is associated with the public subnet in {}", zone),
        |subnet| Ok(associates_subnet(needs(&snapshot.public_route_table)?, subnet.id())),
    );
    results.push(check(
        format!("output {} is the public route table id", names::PUBLIC_ROUTE_TABLE_ID),
        || {
            let table = needs(&snapshot.public_route_table)?;
            let output = needs_output(snapshot, names::PUBLIC_ROUTE_TABLE_ID)?;
            Ok(output_equals(output, table.id()))
        },
    ));

    // NAT
    if let Some(nat_gateway) = &snapshot.nat_gateway {
        let first_zone = zones.first().map(String::as_str).unwrap_or_default();
        results.push(check(
            format!("NAT gateway resides in the public subnet in {}", first_zone),
            || {
                let nat = needs(nat_gateway)?;
                let subnets = needs(&snapshot.public_subnets)?;
                let first = subnets
                    .first()
                    .ok_or_else(|| Blocked("no public subnets resolved".to_string()))?;
                Ok(resides_in_subnet(nat, first))
            },
        ));
    }

    results
}

/// Runs the public network suite against a provider and an output store
pub struct Verifier<P, O> {
    resolver: Resolver<P>,
    outputs: O,
    config: VerifyConfig,
}

impl<P: ResourceProvider, O: OutputStore> Verifier<P, O> {
    pub fn new(provider: P, outputs: O, config: VerifyConfig) -> Self {
        Self {
            resolver: Resolver::new(provider),
            outputs,
            config,
        }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver<P> {
        &self.resolver
    }

    /// Read the deployment: one query per resource, one per zone for subnets
    pub async fn snapshot(&self) -> Snapshot {
        let naming = self.config.naming();
        let zones = self.config.availability_zones();

        let vpc = self
            .resolver
            .resolve_single(ResourceKind::Vpc, naming, None)
            .await;
        let public_subnets = self
            .resolver
            .resolve_many(ResourceKind::Subnet, naming, zones)
            .await;
        let public_route_table = self
            .resolver
            .resolve_single(ResourceKind::RouteTable, naming, None)
            .await;
        let internet_gateway = self
            .resolver
            .resolve_single(ResourceKind::InternetGateway, naming, None)
            .await;

        let nat_gateway = if self.config.verify_nat() {
            Some(match &vpc {
                Ok(vpc) => {
                    self.resolver
                        .resolve_in_vpc(ResourceKind::NatGateway, vpc.id())
                        .await
                }
                Err(e) => Err(e.clone()),
            })
        } else {
            None
        };

        let mut outputs = BTreeMap::new();
        for name in SUITE_OUTPUTS {
            let fetched = self.outputs.output(name).await;
            if let Err(e) = &fetched {
                warn!(output = name, store = self.outputs.name(), error = %e, "output unavailable");
            }
            outputs.insert(name.to_string(), fetched);
        }

        Snapshot {
            vpc,
            public_subnets,
            public_route_table,
            internet_gateway,
            nat_gateway,
            outputs,
        }
    }

    /// Read the deployment and evaluate every check
    pub async fn run(&self) -> Report {
        let naming = self.config.naming();
        info!(
            component = naming.component(),
            deployment_identifier = naming.deployment_identifier(),
            zones = self.config.availability_zones().len(),
            "starting verification run"
        );

        let mut report = Report::new(naming, Utc::now());
        let snapshot = self.snapshot().await;

        for result in evaluate(&self.config, &snapshot) {
            match result.status {
                CheckStatus::Passed => debug!(check = %result.description, "passed"),
                CheckStatus::Failed => {
                    warn!(check = %result.description, detail = ?result.detail, "failed")
                }
                CheckStatus::Errored => {
                    warn!(check = %result.description, detail = ?result.detail, "errored")
                }
            }
            report.push(result);
        }
        report.finish(Utc::now());

        let counts = report.counts();
        info!(
            run_id = %report.run_id,
            passed = counts.passed,
            failed = counts.failed,
            errored = counts.errored,
            "verification run finished"
        );
        report
    }
}
