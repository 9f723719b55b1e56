//! Machine-readable report: one JSON document on stdout, nothing else.

use std::time::Duration;

use serde::Serialize;

use egressr_common::network::report::{PhaseOutcome, TargetResult};
use egressr_common::network::target::Expectation;

#[derive(Serialize)]
struct Document {
    summary: Summary,
    results: Vec<Entry>,
}

#[derive(Serialize)]
struct Summary {
    total: usize,
    allow: usize,
    deny: usize,
    passed: usize,
    failed: usize,
    ok: bool,
    timeout: String,
}

#[derive(Serialize)]
struct Phase {
    success: bool,
    duration_ms: u64,
    detail: String,
}

#[derive(Serialize)]
struct Entry {
    host: String,
    port: u16,
    #[serde(rename = "type")]
    kind: &'static str,
    dns: Phase,
    tcp: Phase,
    tls: Phase,
    passed: bool,
    blocked: bool,
}

impl From<&PhaseOutcome> for Phase {
    fn from(outcome: &PhaseOutcome) -> Self {
        Self {
            success: outcome.succeeded,
            duration_ms: outcome.elapsed.as_millis() as u64,
            detail: outcome.detail.clone(),
        }
    }
}

pub fn render(results: &[TargetResult], timeout: Duration) -> anyhow::Result<()> {
    let document: Document = build(results, timeout);
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn build(results: &[TargetResult], timeout: Duration) -> Document {
    let allow: usize = results
        .iter()
        .filter(|r| r.target.expectation == Expectation::Allow)
        .count();
    let passed: usize = results.iter().filter(|r| r.passed).count();

    let entries: Vec<Entry> = results
        .iter()
        .map(|result| Entry {
            host: result.target.host.clone(),
            port: result.target.port,
            kind: match result.target.expectation {
                Expectation::Allow => "allow",
                Expectation::Deny => "deny",
            },
            dns: Phase::from(&result.dns),
            tcp: Phase::from(&result.tcp),
            tls: Phase::from(&result.tls),
            passed: result.passed,
            blocked: result.blocked,
        })
        .collect();

    Document {
        summary: Summary {
            total: results.len(),
            allow,
            deny: results.len() - allow,
            passed,
            failed: results.len() - passed,
            ok: results.len() == passed,
            timeout: format!("{timeout:?}"),
        },
        results: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egressr_common::network::report::SKIPPED_TCP;
    use egressr_common::network::target::Target;

    fn result(expectation: Expectation, reachable: bool) -> TargetResult {
        let target = Target {
            host: "example.com".to_string(),
            port: 443,
            expectation,
        };
        let ok = PhaseOutcome::success(Duration::from_millis(12), "connected");
        if reachable {
            TargetResult::new(target, ok.clone(), ok.clone(), ok)
        } else {
            TargetResult::new(
                target,
                ok.clone(),
                PhaseOutcome::failure(Duration::from_millis(3), "connection refused"),
                PhaseOutcome::skipped(SKIPPED_TCP),
            )
        }
    }

    #[test]
    fn document_counts_and_fields_line_up() {
        let results = vec![
            result(Expectation::Allow, true),
            result(Expectation::Deny, false),
        ];
        let document = build(&results, Duration::from_secs(5));

        assert_eq!(document.summary.total, 2);
        assert_eq!(document.summary.allow, 1);
        assert_eq!(document.summary.deny, 1);
        assert_eq!(document.summary.passed, 2);
        assert_eq!(document.summary.failed, 0);
        assert!(document.summary.ok);
        assert_eq!(document.summary.timeout, "5s");

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["results"][0]["type"], "allow");
        assert_eq!(value["results"][1]["type"], "deny");
        assert_eq!(value["results"][1]["blocked"], true);
        assert_eq!(value["results"][1]["tls"]["detail"], SKIPPED_TCP);
        assert_eq!(value["results"][0]["dns"]["duration_ms"], 12);
    }
}
