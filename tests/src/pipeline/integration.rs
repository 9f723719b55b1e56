#![cfg(test)]
use std::time::Duration;

use egressr_common::network::report::{SKIPPED_DNS, SKIPPED_TCP, all_passed};
use egressr_common::network::target::{Expectation, Target};
use egressr_core::pipeline::Pipeline;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

fn target(host: &str, port: u16, expectation: Expectation) -> Target {
    Target {
        host: host.to_string(),
        port,
        expectation,
    }
}

/// Pipelines need the system resolver config and the platform trust
/// store; environments missing either skip rather than fail.
fn pipeline(timeout: Duration) -> Option<Pipeline> {
    match Pipeline::new(timeout) {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("Skipping pipeline test: {e}");
            None
        }
    }
}

/// A listener that accepts one connection, reads whatever arrives and
/// hangs up without ever speaking TLS. TCP succeeds against it; a TLS
/// handshake cannot.
async fn tcp_only_listener() -> u16 {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        if let Ok((mut socket, _addr)) = listener.accept().await {
            let mut buffer = [0u8; 2048];
            let _ = socket.read(&mut buffer).await;
        }
    });
    port
}

/// A port guaranteed closed right now: bind, note the port, drop.
async fn closed_port() -> u16 {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn closed_port_blocks_at_tcp_and_fails_an_allow_target() {
    let Some(pipeline) = pipeline(Duration::from_secs(1)) else {
        return;
    };
    let port: u16 = closed_port().await;

    let targets = [target("127.0.0.1", port, Expectation::Allow)];
    let results = pipeline.run(&targets).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];

    assert!(result.dns.succeeded);
    assert_eq!(result.dns.detail, "127.0.0.1 (literal)");
    assert_eq!(result.dns.elapsed, Duration::ZERO);

    assert!(!result.tcp.succeeded);
    assert_eq!(result.tcp.detail, "connection refused");

    assert!(result.tls.is_skip());
    assert_eq!(result.tls.detail, SKIPPED_TCP);

    assert!(result.blocked);
    assert!(!result.passed);
}

#[tokio::test]
async fn deny_target_blocked_at_tls_passes() {
    let Some(pipeline) = pipeline(Duration::from_secs(1)) else {
        return;
    };
    let port: u16 = tcp_only_listener().await;

    let targets = [target("127.0.0.1", port, Expectation::Deny)];
    let results = pipeline.run(&targets).await;
    let result = &results[0];

    assert!(result.dns.succeeded);
    assert!(result.tcp.succeeded, "tcp failed: {}", result.tcp.detail);
    assert_eq!(result.tcp.detail, "connected");

    assert!(!result.tls.succeeded);
    assert!(!result.tls.is_skip(), "tls must run once tcp succeeded");

    assert!(result.blocked);
    assert!(result.passed);
}

#[tokio::test]
async fn dns_failure_skips_both_transport_phases() {
    let Some(pipeline) = pipeline(Duration::from_secs(1)) else {
        return;
    };

    let targets = [target("nonexistent.invalid", 443, Expectation::Deny)];
    let results = pipeline.run(&targets).await;
    let result = &results[0];

    assert!(!result.dns.succeeded);
    assert!(result.tcp.is_skip());
    assert_eq!(result.tcp.detail, SKIPPED_DNS);
    assert!(result.tls.is_skip());
    assert_eq!(result.tls.detail, SKIPPED_DNS);

    assert!(result.blocked);
    assert!(result.passed);
}

#[tokio::test]
async fn results_stay_in_input_order_with_mixed_verdicts() {
    let Some(pipeline) = pipeline(Duration::from_secs(1)) else {
        return;
    };
    let tls_less: u16 = tcp_only_listener().await;
    let closed: u16 = closed_port().await;

    let targets = [
        // Reachable at TCP but not TLS: this allow target must fail.
        target("127.0.0.1", tls_less, Expectation::Allow),
        // Fully blocked: this deny target must pass.
        target("127.0.0.1", closed, Expectation::Deny),
    ];
    let results = pipeline.run(&targets).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].target.port, tls_less);
    assert_eq!(results[1].target.port, closed);

    assert!(!results[0].passed);
    assert!(results[1].passed);
    assert!(!all_passed(&results));
}

#[tokio::test]
async fn empty_target_list_yields_an_empty_passing_run() {
    let Some(pipeline) = pipeline(Duration::from_secs(1)) else {
        return;
    };

    let results = pipeline.run(&[]).await;
    assert!(results.is_empty());
    assert!(all_passed(&results));
}

#[tokio::test]
async fn warm_up_returns_within_its_deadline() {
    let Some(pipeline) = pipeline(Duration::from_millis(500)) else {
        return;
    };

    let elapsed: Duration = pipeline.warm_up().await;
    // Bounded by the phase timeout plus scheduling slack; the result
    // itself is discarded.
    assert!(elapsed < Duration::from_secs(5));
}

/// Mixed run against well-known anycast endpoints: a healthy allow
/// target plus a deny target whose TCP port is open but refuses TLS.
/// Needs real egress, so it only runs on demand.
#[tokio::test]
#[ignore]
async fn healthy_allow_and_tls_blocked_deny_make_a_passing_run() {
    let pipeline = Pipeline::new(Duration::from_secs(5)).unwrap();

    let targets = [
        target("one.one.one.one", 443, Expectation::Allow),
        target("1.1.1.1", 53, Expectation::Deny),
    ];
    let results = pipeline.run(&targets).await;

    assert!(results[0].passed, "allow target failed: {:?}", results[0]);
    assert!(results[0].tls.detail.starts_with("TLS 1."));

    assert!(results[1].dns.succeeded);
    assert!(results[1].tcp.succeeded);
    assert!(!results[1].tls.succeeded);
    assert!(results[1].passed, "deny target failed: {:?}", results[1]);

    assert!(all_passed(&results));
}
