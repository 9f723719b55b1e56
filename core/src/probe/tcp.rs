//! # TCP Phase
//!
//! Establishes one connection to the target and closes it immediately;
//! reachability is the only question this phase answers.

use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::time::timeout;

use egressr_common::network::report::PhaseOutcome;

use crate::classify;

pub async fn connect(host: &str, port: u16, deadline: Duration) -> PhaseOutcome {
    let start: Instant = Instant::now();
    let attempt = timeout(deadline, TcpStream::connect((host, port))).await;
    let elapsed: Duration = start.elapsed();

    match attempt {
        Ok(Ok(stream)) => {
            drop(stream);
            PhaseOutcome::success(elapsed, "connected")
        }
        Ok(Err(err)) => PhaseOutcome::failure(elapsed, classify::simplify(&err.to_string())),
        Err(err) => PhaseOutcome::failure(elapsed, classify::simplify(&err.to_string())),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connect_should_succeed_against_a_listener() {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port: u16 = listener.local_addr().unwrap().port();

        let outcome: PhaseOutcome = connect("127.0.0.1", port, Duration::from_secs(1)).await;
        assert!(outcome.succeeded);
        assert_eq!(outcome.detail, "connected");
    }

    #[tokio::test]
    async fn connect_should_classify_a_closed_port() {
        // Bind-then-drop guarantees the port is closed right now.
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port: u16 = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome: PhaseOutcome = connect("127.0.0.1", port, Duration::from_secs(1)).await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.detail, "connection refused");
    }

    #[tokio::test]
    #[ignore]
    async fn connect_should_time_out_on_a_blackholed_address() {
        let outcome: PhaseOutcome = connect("10.255.255.1", 443, Duration::from_millis(250)).await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.detail, "timeout");
    }
}
