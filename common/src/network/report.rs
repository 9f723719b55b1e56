//! # Probe Report Model
//!
//! The per-phase and per-target outcome types the pipeline produces and
//! the reporting layer consumes.

use std::time::Duration;

use crate::network::target::{Expectation, Target};

/// Detail sentinel for phases never attempted because resolution failed.
pub const SKIPPED_DNS: &str = "skipped (DNS failed)";
/// Detail sentinel for a TLS phase never attempted because TCP failed.
pub const SKIPPED_TCP: &str = "skipped (TCP failed)";

/// The outcome of one phase (DNS, TCP or TLS) for one target.
///
/// `detail` carries a success annotation (resolved addresses, "connected",
/// negotiated TLS parameters), a classified failure reason, or a skip
/// sentinel. Produced exactly once per phase per target.
#[derive(Clone, Debug)]
pub struct PhaseOutcome {
    pub succeeded: bool,
    pub elapsed: Duration,
    pub detail: String,
}

impl PhaseOutcome {
    pub fn success(elapsed: Duration, detail: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            elapsed,
            detail: detail.into(),
        }
    }

    pub fn failure(elapsed: Duration, detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            elapsed,
            detail: detail.into(),
        }
    }

    /// A phase short-circuited because an earlier phase failed. Not an
    /// error; rendered distinctly from genuine failures.
    pub fn skipped(sentinel: &'static str) -> Self {
        Self {
            succeeded: false,
            elapsed: Duration::ZERO,
            detail: sentinel.to_string(),
        }
    }

    pub fn is_skip(&self) -> bool {
        !self.succeeded && self.detail.starts_with("skipped")
    }
}

/// The complete, evaluated record for one target.
#[derive(Clone, Debug)]
pub struct TargetResult {
    pub target: Target,
    pub dns: PhaseOutcome,
    pub tcp: PhaseOutcome,
    pub tls: PhaseOutcome,
    /// True iff any phase did not succeed.
    pub blocked: bool,
    /// True iff the observed blocked/reachable state matches the target's
    /// expectation.
    pub passed: bool,
}

impl TargetResult {
    /// Finalizes a result once all three phases hold a value, evaluating
    /// the target's expectation against the observed outcome. An Allow
    /// target passes when fully reachable; a Deny target passes when
    /// blocked at any phase, regardless of which one.
    pub fn new(target: Target, dns: PhaseOutcome, tcp: PhaseOutcome, tls: PhaseOutcome) -> Self {
        let blocked: bool = !(dns.succeeded && tcp.succeeded && tls.succeeded);
        let passed: bool = match target.expectation {
            Expectation::Deny => blocked,
            Expectation::Allow => !blocked,
        };

        Self {
            target,
            dns,
            tcp,
            tls,
            blocked,
            passed,
        }
    }
}

/// Overall run success is the conjunction of every target's verdict.
pub fn all_passed(results: &[TargetResult]) -> bool {
    results.iter().all(|r| r.passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(expectation: Expectation) -> Target {
        Target {
            host: "example.com".to_string(),
            port: 443,
            expectation,
        }
    }

    fn ok() -> PhaseOutcome {
        PhaseOutcome::success(Duration::from_millis(10), "connected")
    }

    fn failed() -> PhaseOutcome {
        PhaseOutcome::failure(Duration::from_millis(10), "connection refused")
    }

    #[test]
    fn allow_passes_only_when_fully_reachable() {
        let result = TargetResult::new(target(Expectation::Allow), ok(), ok(), ok());
        assert!(!result.blocked);
        assert!(result.passed);

        let result = TargetResult::new(
            target(Expectation::Allow),
            ok(),
            failed(),
            PhaseOutcome::skipped(SKIPPED_TCP),
        );
        assert!(result.blocked);
        assert!(!result.passed);
    }

    #[test]
    fn deny_passes_when_blocked_at_any_phase() {
        let dns_blocked = TargetResult::new(
            target(Expectation::Deny),
            failed(),
            PhaseOutcome::skipped(SKIPPED_DNS),
            PhaseOutcome::skipped(SKIPPED_DNS),
        );
        assert!(dns_blocked.blocked);
        assert!(dns_blocked.passed);

        let tls_blocked = TargetResult::new(target(Expectation::Deny), ok(), ok(), failed());
        assert!(tls_blocked.blocked);
        assert!(tls_blocked.passed);

        let reachable = TargetResult::new(target(Expectation::Deny), ok(), ok(), ok());
        assert!(!reachable.blocked);
        assert!(!reachable.passed);
    }

    #[test]
    fn skips_are_not_genuine_failures() {
        assert!(PhaseOutcome::skipped(SKIPPED_DNS).is_skip());
        assert!(PhaseOutcome::skipped(SKIPPED_TCP).is_skip());
        assert!(!failed().is_skip());
        assert!(!ok().is_skip());
    }

    #[test]
    fn run_succeeds_only_when_every_target_passed() {
        let pass = TargetResult::new(target(Expectation::Allow), ok(), ok(), ok());
        let fail = TargetResult::new(target(Expectation::Deny), ok(), ok(), ok());

        assert!(all_passed(&[pass.clone()]));
        assert!(all_passed(&[]));
        assert!(!all_passed(&[pass, fail]));
    }
}
