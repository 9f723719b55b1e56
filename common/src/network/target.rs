//! # Probe Target Model
//!
//! Defines the endpoints an egress validation run probes.
//!
//! This module handles normalizing operator-supplied endpoint strings,
//! which can be:
//! * A bare hostname (e.g., `mcr.microsoft.com`), probed on port 443.
//! * A `host:port` pair (e.g., `registry.example.com:5000`).
//! * A URL-ish string (e.g., `https://github.com/owner/repo`) whose scheme
//!   selects the default port and whose path is discarded.
//! * A literal IP address, with or without a port.

/// Port probed when neither the entry nor its scheme names one.
pub const DEFAULT_PORT: u16 = 443;

/// Whether an endpoint is supposed to make it past the egress firewall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// The firewall must let connections through; the target is expected
    /// to be fully reachable.
    Allow,
    /// The firewall must block the target at some phase.
    Deny,
}

/// One endpoint under test, normalized and ready to probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub expectation: Expectation,
}

impl Target {
    /// Normalizes one raw entry into a `Target`.
    ///
    /// Parsing is deliberately lenient: any string yields a target. A
    /// malformed or out-of-range explicit port falls back silently to the
    /// scheme-inferred default instead of failing, since the same behavior
    /// is observable in deployed configurations and may be relied upon.
    pub fn parse(raw: &str, expectation: Expectation) -> Self {
        let (rest, inferred_port) = strip_scheme(raw.trim());
        let rest = strip_path(rest);

        let (host, port) = match split_host_port(rest) {
            Some((host, port_str)) => {
                let port: u16 = match port_str.parse::<u16>().ok().filter(|p| *p != 0) {
                    Some(explicit) => explicit,
                    None => {
                        tracing::debug!("unusable port '{port_str}' in '{raw}', using {inferred_port}");
                        inferred_port
                    }
                };
                (host, port)
            }
            None => (rest, inferred_port),
        };

        Self {
            host: host.to_string(),
            port,
            expectation,
        }
    }
}

/// Parses a comma-separated list of entries (e.g., the value of
/// `ALLOW_TARGETS`), trimming whitespace and skipping empty slots.
pub fn parse_list(raw: &str, expectation: Expectation) -> Vec<Target> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| Target::parse(entry, expectation))
        .collect()
}

/// Strips an optional `scheme://` prefix and returns the remainder plus
/// the port the scheme implies. The scheme text itself is discarded.
fn strip_scheme(s: &str) -> (&str, u16) {
    let Some(idx) = s.find("://") else {
        return (s, DEFAULT_PORT);
    };

    let scheme: String = s[..idx].to_ascii_lowercase();
    let rest: &str = &s[idx + 3..];
    let port: u16 = match scheme.as_str() {
        "http" => 80,
        // https, tcp, tls and anything unrecognized all probe on 443
        _ => DEFAULT_PORT,
    };

    (rest, port)
}

/// Drops a trailing `/path` component, if any.
fn strip_path(s: &str) -> &str {
    match s.split_once('/') {
        Some((before, _)) => before,
        None => s,
    }
}

/// Splits `host:port`, refusing strings where the "host" side still holds
/// a colon (a bare IPv6 literal is a host, not a host:port pair).
fn split_host_port(s: &str) -> Option<(&str, &str)> {
    let (host, port) = s.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host, port))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
