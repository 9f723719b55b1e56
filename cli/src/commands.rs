pub mod check;

use std::time::Duration;

use clap::Parser;
use egressr_common::network::target::{self, Expectation, Target};
use egressr_common::warn;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Parser)]
#[command(name = "egressr")]
#[command(about = "Validates egress firewall policy from inside a restricted network.")]
pub struct CommandLine {
    /// Endpoints that must be reachable, comma-separated host[:port] entries
    #[arg(long, env = "ALLOW_TARGETS", value_name = "LIST")]
    pub allow: Option<String>,

    /// Endpoints the firewall must block, same format
    #[arg(long, env = "DENY_TARGETS", value_name = "LIST")]
    pub deny: Option<String>,

    /// Legacy single-list form; entries are treated as allow targets
    #[arg(long, env = "TARGETS", value_name = "LIST", hide = true)]
    pub targets: Option<String>,

    /// Per-phase timeout in seconds
    #[arg(long, short = 't', env = "TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<String>,

    /// Emit one JSON document on stdout instead of the table
    #[arg(long)]
    pub json: bool,

    /// Suppress the banner and header
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Assembles the probe list: allow entries first, then deny entries,
    /// in the order the operator wrote them. The legacy `TARGETS` list
    /// only applies when neither primary list is present.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = Vec::new();

        if let Some(raw) = &self.allow {
            targets.extend(target::parse_list(raw, Expectation::Allow));
        }
        if let Some(raw) = &self.deny {
            targets.extend(target::parse_list(raw, Expectation::Deny));
        }
        if targets.is_empty()
            && let Some(raw) = &self.targets
        {
            warn!("TARGETS is a legacy alias for ALLOW_TARGETS; prefer --allow/--deny");
            targets.extend(target::parse_list(raw, Expectation::Allow));
        }

        targets
    }

    /// Per-phase timeout. Unparsable or non-positive values fall back to
    /// the default instead of failing, like the rest of the lenient
    /// configuration surface.
    pub fn timeout(&self) -> Duration {
        let secs: u64 = self
            .timeout
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// `--json`, or the legacy `OUTPUT=json` environment switch.
    pub fn json_mode(&self) -> bool {
        self.json || std::env::var("OUTPUT").is_ok_and(|value| value == "json")
    }
}
