use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Spins while the pipeline runs; the caller clears it before the table
/// is printed.
pub fn start(target_count: usize) -> ProgressBar {
    let pb: ProgressBar = ProgressBar::new_spinner();
    let style: ProgressStyle = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap()
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    let unit: &str = if target_count == 1 { "target" } else { "targets" };
    pb.set_message(format!(
        "Probing {} {unit}...",
        target_count.to_string().green().bold()
    ));

    pb
}
