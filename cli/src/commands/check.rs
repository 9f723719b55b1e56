use std::time::Duration;

use indicatif::ProgressBar;

use egressr_common::config::Config;
use egressr_common::network::report::{self, TargetResult};
use egressr_common::network::target::Target;
use egressr_core::pipeline::Pipeline;

use crate::terminal::{format, json, print, spinner};

/// Runs the full validation: warm-up, pipeline, rendering. Returns whether
/// every target matched its expectation.
pub async fn check(targets: Vec<Target>, cfg: &Config) -> anyhow::Result<bool> {
    let pipeline: Pipeline = Pipeline::new(cfg.timeout)?;

    if !cfg.json {
        print::header("egress validation");
        print::run_summary(&targets, cfg.timeout);
    }

    let warmup: Duration = pipeline.warm_up().await;
    if !cfg.json && warmup > Duration::from_secs(1) {
        print::warmup_note(warmup);
    }

    let probe_spinner: Option<ProgressBar> = (!cfg.json).then(|| spinner::start(targets.len()));
    let results: Vec<TargetResult> = pipeline.run(&targets).await;
    if let Some(probe_spinner) = probe_spinner {
        probe_spinner.finish_and_clear();
    }

    if cfg.json {
        json::render(&results, cfg.timeout)?;
    } else {
        format::render_table(&results);
        print::end_of_program();
    }

    Ok(report::all_passed(&results))
}
