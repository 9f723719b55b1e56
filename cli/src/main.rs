mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, check};
use egressr_common::config::Config;
use egressr_common::network::target::Target;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands: CommandLine = CommandLine::parse_args();

    logging::init();

    let cfg = Config {
        timeout: commands.timeout(),
        json: commands.json_mode(),
        no_banner: commands.no_banner,
    };

    let targets: Vec<Target> = commands.targets();
    if targets.is_empty() {
        eprintln!("Error: no targets specified.");
        eprintln!("Set ALLOW_TARGETS and/or DENY_TARGETS, or pass --allow/--deny.");
        eprintln!("Example: ALLOW_TARGETS=\"mcr.microsoft.com:443\" DENY_TARGETS=\"google.com\" egressr");
        return Ok(ExitCode::FAILURE);
    }

    if !cfg.json && !cfg.no_banner {
        print::banner();
    }

    let ok: bool = check::check(targets, &cfg).await?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
