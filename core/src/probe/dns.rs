//! # DNS Phase
//!
//! Resolves target hostnames to IPv4 addresses with the host's configured
//! resolver, plus the warm-up lookup that absorbs the first-packet penalty
//! of freshly started pods.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use anyhow::Context;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::LookupIpStrategy;
use hickory_resolver::system_conf;

use egressr_common::network::report::PhaseOutcome;

use crate::classify;

/// An in-cluster name that resolves in any Kubernetes pod. Only the side
/// effect of looking it up matters; the answer is discarded.
const WARMUP_NAME: &str = "kubernetes.default.svc.cluster.local.";

/// Resolver handle shared across the run. Reads the system configuration
/// once instead of per lookup.
pub struct DnsProbe {
    resolver: TokioAsyncResolver,
}

impl DnsProbe {
    /// Builds the resolver from `/etc/resolv.conf`, restricted to A
    /// queries. Skipping the AAAA class avoids a multi-second stall in
    /// clusters whose DNS service mishandles it.
    pub fn from_system_conf(timeout: Duration) -> anyhow::Result<Self> {
        let (config, mut opts) =
            system_conf::read_system_conf().context("reading system resolver configuration")?;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;
        opts.timeout = timeout;

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }

    /// Resolves `host` to its IPv4 addresses under a hard deadline.
    ///
    /// Literal addresses succeed immediately without touching the network.
    /// The name is forced fully qualified before lookup: search-domain
    /// expansion would fan one query out into several sequential ones and
    /// charge their combined latency to this phase.
    pub async fn resolve(&self, host: &str, deadline: Duration) -> PhaseOutcome {
        if host.parse::<IpAddr>().is_ok() {
            return PhaseOutcome::success(Duration::ZERO, format!("{host} (literal)"));
        }

        let name: String = to_fqdn(host);
        let start: Instant = Instant::now();
        let lookup = tokio::time::timeout(deadline, self.resolver.ipv4_lookup(name.as_str())).await;
        let elapsed: Duration = start.elapsed();

        match lookup {
            Ok(Ok(records)) => {
                let addrs: Vec<String> = records.iter().map(|a| a.0.to_string()).collect();
                PhaseOutcome::success(elapsed, addrs.join(", "))
            }
            Ok(Err(err)) => PhaseOutcome::failure(elapsed, classify::simplify(&err.to_string())),
            Err(err) => PhaseOutcome::failure(elapsed, classify::simplify(&err.to_string())),
        }
    }

    /// One throwaway lookup before any timed measurement. In conntrack'd
    /// or NAT'd environments the very first UDP packet a process sends can
    /// be dropped outright; without this, that drop lands on the first
    /// real target and inflates or fails its DNS phase. Returns only the
    /// elapsed time, for an informational note.
    pub async fn warm_up(&self, deadline: Duration) -> Duration {
        let start: Instant = Instant::now();
        let _ = tokio::time::timeout(deadline, self.resolver.ipv4_lookup(WARMUP_NAME)).await;
        start.elapsed()
    }
}

fn to_fqdn(host: &str) -> String {
    if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{host}.")
    }
}
