// Copyright (c) 2025 - Cowboy AI, Inc.

//! Resource Resolver
//!
//! Turns a naming context into exactly one provider resource, or fails.
//!
//! ```text
//! (kind, ctx, zone) ──name──> "public-subnet-net-dev-eu-west-1a"
//!                                      │
//!                       describe(kind, tag:Name=...)
//!                                      │
//!                 ┌────────────────────┼────────────────────┐
//!                 ▼                    ▼                    ▼
//!             0 matches            1 match             2+ matches
//!             NotFound          Found(handle)      Ambiguous(handles)
//! ```
//!
//! Ambiguity is a provisioning defect: the naming convention must identify a
//! resource uniquely within its scope, so the resolver never picks one of
//! several matches. Every call issues a fresh provider query; nothing is
//! cached between calls.

use tracing::{debug, warn};

use crate::domain::{NamingContext, ResourceHandle, ResourceKind};
use crate::errors::{ResolveError, VerifyResult};
use crate::provider::{Filters, ResourceProvider};

/// Outcome of a single lookup, before callers decide what is fatal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ResourceHandle),
    NotFound,
    Ambiguous(Vec<ResourceHandle>),
}

impl Lookup {
    /// Classify a provider response
    pub fn from_matches(mut matches: Vec<ResourceHandle>) -> Self {
        match matches.len() {
            0 => Lookup::NotFound,
            1 => Lookup::Found(matches.remove(0)),
            _ => Lookup::Ambiguous(matches),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Require exactly one match
    pub fn into_single(self, kind: ResourceKind, lookup: &str) -> VerifyResult<ResourceHandle> {
        match self {
            Lookup::Found(handle) => Ok(handle),
            Lookup::NotFound => Err(ResolveError::NotFound {
                kind,
                lookup: lookup.to_string(),
            }),
            Lookup::Ambiguous(handles) => Err(ResolveError::Ambiguous {
                kind,
                lookup: lookup.to_string(),
                ids: handles.iter().map(|h| h.id().to_string()).collect(),
            }),
        }
    }
}

/// Resolves named resources through a [`ResourceProvider`]
pub struct Resolver<P> {
    provider: P,
}

impl<P: ResourceProvider> Resolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one provider query and classify the result
    pub async fn lookup(&self, kind: ResourceKind, filters: &Filters) -> VerifyResult<Lookup> {
        debug!(%kind, %filters, provider = self.provider.name(), "querying provider");

        let matches = self
            .provider
            .describe(kind, filters)
            .await
            .map_err(|source| ResolveError::Transport {
                kind,
                lookup: filters.to_string(),
                source,
            })?;

        let lookup = Lookup::from_matches(matches);
        match &lookup {
            Lookup::Found(handle) => debug!(%kind, id = handle.id(), "resolved"),
            Lookup::NotFound => warn!(%kind, %filters, "no match"),
            Lookup::Ambiguous(handles) => {
                warn!(%kind, %filters, matches = handles.len(), "ambiguous match")
            }
        }
        Ok(lookup)
    }

    /// Resolve the single resource named by the convention
    pub async fn resolve_single(
        &self,
        kind: ResourceKind,
        ctx: &NamingContext,
        zone: Option<&str>,
    ) -> VerifyResult<ResourceHandle> {
        let name = ctx.name(kind, zone)?;
        let filters = Filters::named(name);
        self.lookup(kind, &filters)
            .await?
            .into_single(kind, &filters.to_string())
    }

    /// Resolve one resource per zone, in zone order
    ///
    /// Fails fast: the first zone that does not resolve aborts the call.
    pub async fn resolve_many(
        &self,
        kind: ResourceKind,
        ctx: &NamingContext,
        zones: &[String],
    ) -> VerifyResult<Vec<ResourceHandle>> {
        let mut handles = Vec::with_capacity(zones.len());
        for zone in zones {
            handles.push(self.resolve_single(kind, ctx, Some(zone)).await?);
        }
        Ok(handles)
    }

    /// Resolve the single resource of `kind` inside a VPC
    ///
    /// Used for kinds that are not located by name (NAT gateways).
    pub async fn resolve_in_vpc(
        &self,
        kind: ResourceKind,
        vpc_id: &str,
    ) -> VerifyResult<ResourceHandle> {
        let filters = Filters::new().in_vpc(vpc_id);
        self.lookup(kind, &filters)
            .await?
            .into_single(kind, &filters.to_string())
    }
}
