//! # Failure Classification
//!
//! Maps the verbose, implementation-specific error strings produced by the
//! resolver, the socket layer and the TLS stack onto a small stable
//! vocabulary, so reports and test assertions never depend on library
//! wording.

use thiserror::Error;

/// The stable failure taxonomy. Every variant is an *expected, reportable*
/// outcome, not a defect.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("NXDOMAIN")]
    Nxdomain,
    #[error("timeout")]
    Timeout,
    #[error("connection refused")]
    ConnectionRefused,
    #[error("connection reset")]
    ConnectionReset,
    #[error("cert: unknown authority")]
    CertUnknownAuthority,
    #[error("cert: expired")]
    CertExpired,
    #[error("cert error")]
    CertOther,
    #[error("TLS handshake failure")]
    HandshakeFailure,
    /// Nothing matched; carries the terse tail of the raw message.
    #[error("{0}")]
    Other(String),
}

/// Ordered rules, first match wins. Later rules are more specific in the
/// certificate/handshake block below, so the order here must not grow a
/// generic rule that shadows them.
const RULES: &[(&[&str], Failure)] = &[
    (
        &["no such host", "nxdomain", "no record found", "no records found"],
        Failure::Nxdomain,
    ),
    (
        &[
            "i/o timeout",
            "timed out",
            "deadline has elapsed",
            "deadline exceeded",
            "timeout",
        ],
        Failure::Timeout,
    ),
    (&["connection refused"], Failure::ConnectionRefused),
    (&["connection reset"], Failure::ConnectionReset),
];

/// Classifies a raw error message. Matching runs against the lowercased
/// text; the unclassified fallback keeps the original casing.
pub fn classify(raw: &str) -> Failure {
    let msg: String = raw.to_ascii_lowercase();

    for (needles, class) in RULES {
        if contains_any(&msg, needles) {
            return class.clone();
        }
    }

    if msg.contains("certificate") {
        return if contains_any(&msg, &["unknown authority", "unknown issuer", "unknownissuer"]) {
            Failure::CertUnknownAuthority
        } else if msg.contains("expired") {
            Failure::CertExpired
        } else {
            Failure::CertOther
        };
    }

    if contains_any(&msg, &["handshake failure", "handshakefailure"]) {
        return Failure::HandshakeFailure;
    }

    // Most network-library errors wrap a terse OS-level reason after the
    // last ": " separator; surface just that tail.
    match raw.rsplit_once(": ") {
        Some((_, tail)) if !tail.is_empty() => Failure::Other(tail.to_string()),
        _ => Failure::Other(raw.to_string()),
    }
}

/// Classifies and renders in one step, for probe failure details.
pub fn simplify(raw: &str) -> String {
    classify(raw).to_string()
}

fn contains_any(msg: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| msg.contains(needle))
}
