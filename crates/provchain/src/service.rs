//! The verification service: fetch, verify, project, aggregate.
//!
//! One service instance handles many concurrent requests; each request owns
//! its fetched bundle and shares nothing but the verdict cache.

use serde::Serialize;

use provchain_core::{canonical_bytes, project, Cid, GraphEdge, GraphNode};

use crate::cache::VerdictCache;
use crate::error::Result;
use crate::passport::{build_passport, Passport};
use crate::policy::{summarize_policy, PolicySummary};
use crate::source::BundleSource;
use crate::verifier::{ChainDiagnostics, Verdict, Verifier};

/// Construction-time service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Whether to memoize verdicts by bundle CID.
    pub cache_verdicts: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_verdicts: true,
        }
    }
}

/// The graph shape handed to consumers, wrapping a projection with its
/// trace identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExport {
    pub trace_id: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub count: usize,
}

/// Fetches bundles from a [`BundleSource`] and runs the verifier over them.
pub struct VerificationService<S: BundleSource> {
    source: S,
    verifier: Verifier,
    config: ServiceConfig,
    cache: VerdictCache,
}

impl<S: BundleSource> VerificationService<S> {
    /// Create a service with default configuration.
    pub fn new(source: S, verifier: Verifier) -> Self {
        Self::with_config(source, verifier, ServiceConfig::default())
    }

    /// Create a service with explicit configuration.
    pub fn with_config(source: S, verifier: Verifier, config: ServiceConfig) -> Self {
        Self {
            source,
            verifier,
            config,
            cache: VerdictCache::new(),
        }
    }

    /// The underlying verifier.
    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Fetch and verify the bundle for a trace.
    pub async fn verify(&self, trace_id: &str) -> Result<Verdict> {
        let fetched = self.source.fetch(trace_id).await?;

        let canonical = canonical_bytes(fetched.bundle.raw())?;
        let bundle_cid = Cid::address(&canonical);

        if self.config.cache_verdicts {
            if let Some(verdict) = self.cache.get(
                &bundle_cid,
                fetched.claimed_cid.as_ref(),
                fetched.signature.as_ref(),
            ) {
                tracing::debug!(trace_id, cid = %bundle_cid, "verdict cache hit");
                return Ok(verdict);
            }
        }

        let verdict = self.verifier.verify(
            &fetched.bundle,
            fetched.claimed_cid.as_ref(),
            fetched.signature.as_ref(),
        )?;

        tracing::debug!(
            trace_id,
            cid = %verdict.bundle_cid,
            chain_ok = verdict.chain_ok,
            cid_match = verdict.cid_match,
            sig_ok = verdict.sig_ok,
            "bundle verified"
        );

        if self.config.cache_verdicts {
            self.cache.insert(
                fetched.claimed_cid.as_ref(),
                fetched.signature.as_ref(),
                &verdict,
            );
        }

        Ok(verdict)
    }

    /// Fetch a bundle and project its chain for rendering.
    pub async fn graph(&self, trace_id: &str) -> Result<GraphExport> {
        let fetched = self.source.fetch(trace_id).await?;
        let projection = project(fetched.bundle.receipts());
        tracing::debug!(
            trace_id,
            nodes = projection.nodes.len(),
            edges = projection.edges.len(),
            "chain projected"
        );
        Ok(GraphExport {
            trace_id: trace_id.to_string(),
            count: projection.nodes.len(),
            nodes: projection.nodes,
            edges: projection.edges,
        })
    }

    /// Fetch a bundle and aggregate its passport.
    pub async fn passport(&self, trace_id: &str) -> Result<Passport> {
        let fetched = self.source.fetch(trace_id).await?;
        Ok(build_passport(&fetched.bundle))
    }

    /// Fetch a bundle and summarize its policy activity.
    pub async fn policy(&self, trace_id: &str) -> Result<PolicySummary> {
        let fetched = self.source.fetch(trace_id).await?;
        Ok(summarize_policy(&fetched.bundle))
    }

    /// Fetch a bundle and report chain diagnostics.
    pub async fn diagnostics(&self, trace_id: &str) -> Result<ChainDiagnostics> {
        let fetched = self.source.fetch(trace_id).await?;
        Ok(self.verifier.inspect(&fetched.bundle))
    }
}
