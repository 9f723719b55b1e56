//! # Pipeline Orchestration
//!
//! Runs the three phases over a target list: DNS strictly sequentially
//! across targets, then TCP and TLS fanned out per target, with later
//! phases short-circuited when an earlier one fails.

use std::time::Duration;

use tokio::task::JoinSet;

use egressr_common::error;
use egressr_common::network::report::{PhaseOutcome, SKIPPED_DNS, SKIPPED_TCP, TargetResult};
use egressr_common::network::target::Target;

use crate::probe::dns::DnsProbe;
use crate::probe::tcp;
use crate::probe::tls::TlsProbe;

/// Orchestrates one validation run. Holds the shared resolver, the shared
/// TLS client config and the per-phase timeout; everything else lives for
/// a single probe.
pub struct Pipeline {
    dns: DnsProbe,
    tls: TlsProbe,
    timeout: Duration,
}

impl Pipeline {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            dns: DnsProbe::from_system_conf(timeout)?,
            tls: TlsProbe::from_native_roots()?,
            timeout,
        })
    }

    /// Throwaway lookup run before the timed pipeline; see
    /// [`DnsProbe::warm_up`].
    pub async fn warm_up(&self) -> Duration {
        self.dns.warm_up(self.timeout).await
    }

    /// Probes every target and returns one complete result per target,
    /// index-aligned with the input. Blocks until the slowest target has
    /// finished; no partial results are exposed.
    pub async fn run(&self, targets: &[Target]) -> Vec<TargetResult> {
        // DNS runs one lookup at a time across the whole list. Concurrent
        // UDP queries from one pod race conntrack table insertion; losers
        // get their packets dropped and stall ~5s on an otherwise healthy
        // lookup. Serial lookups cost O(targets) round-trips and avoid it.
        let mut dns_outcomes: Vec<PhaseOutcome> = Vec::with_capacity(targets.len());
        for target in targets {
            dns_outcomes.push(self.dns.resolve(&target.host, self.timeout).await);
        }

        // TCP and TLS own a dedicated socket per target, so they fan out
        // freely: one task per resolved target, each writing only its own
        // index's slot. Targets that failed DNS never spawn a task.
        let mut tasks: JoinSet<(usize, PhaseOutcome, PhaseOutcome)> = JoinSet::new();
        for (idx, target) in targets.iter().enumerate() {
            if !dns_outcomes[idx].succeeded {
                continue;
            }

            let host: String = target.host.clone();
            let port: u16 = target.port;
            let deadline: Duration = self.timeout;
            let tls: TlsProbe = self.tls.clone();

            tasks.spawn(async move {
                let tcp_outcome: PhaseOutcome = tcp::connect(&host, port, deadline).await;
                if !tcp_outcome.succeeded {
                    return (idx, tcp_outcome, PhaseOutcome::skipped(SKIPPED_TCP));
                }
                let tls_outcome: PhaseOutcome = tls.handshake(&host, port, deadline).await;
                (idx, tcp_outcome, tls_outcome)
            });
        }

        let mut transport: Vec<Option<(PhaseOutcome, PhaseOutcome)>> =
            (0..targets.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, tcp_outcome, tls_outcome)) => {
                    transport[idx] = Some((tcp_outcome, tls_outcome));
                }
                Err(err) => error!("transport probe task died: {err}"),
            }
        }

        targets
            .iter()
            .zip(dns_outcomes)
            .zip(transport)
            .map(|((target, dns), phases)| {
                let (tcp_outcome, tls_outcome) = match phases {
                    Some(pair) => pair,
                    // A task that died abnormally is still accounted for.
                    None if dns.succeeded => (
                        PhaseOutcome::failure(Duration::ZERO, "probe task failed"),
                        PhaseOutcome::skipped(SKIPPED_TCP),
                    ),
                    None => (
                        PhaseOutcome::skipped(SKIPPED_DNS),
                        PhaseOutcome::skipped(SKIPPED_DNS),
                    ),
                };
                TargetResult::new(target.clone(), dns, tcp_outcome, tls_outcome)
            })
            .collect()
    }
}
