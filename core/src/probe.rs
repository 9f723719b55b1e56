//! The three connectivity phases, each an independent, individually timed
//! check returning a [`PhaseOutcome`](egressr_common::network::report::PhaseOutcome).
//!
//! Probes never share sockets or mutable state; every call owns a fresh,
//! short-lived connection and treats its timeout as a hard deadline.

pub mod dns;
pub mod tcp;
pub mod tls;
