//! Box-drawing results table, grouped into ALLOW and DENY sections.

use colored::*;
use console::measure_text_width;

use egressr_common::network::report::{PhaseOutcome, TargetResult};
use egressr_common::network::target::Expectation;

use crate::terminal::{colors, print};

const PORT_COL: usize = 6;
const PHASE_COL: usize = 16;
const RESULT_COL: usize = 8;
const MAX_HOST_CHARS: usize = 40;

pub fn render_table(results: &[TargetResult]) {
    let (allow, deny): (Vec<&TargetResult>, Vec<&TargetResult>) = results
        .iter()
        .partition(|r| r.target.expectation == Expectation::Allow);

    let max_host_chars: usize = results
        .iter()
        .map(|r| r.target.host.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, MAX_HOST_CHARS);
    let host_col: usize = max_host_chars + 2;
    let cols: [usize; 6] = [host_col, PORT_COL, PHASE_COL, PHASE_COL, PHASE_COL, RESULT_COL];
    let inner_width: usize = cols.iter().map(|w| w + 1).sum::<usize>() + 5;

    separator(&cols, "┌", "┬", "┐");
    row(&cols, [" FQDN", " PORT", " DNS", " TCP", " TLS/SNI", " RESULT"].map(String::from));

    if !allow.is_empty() {
        separator(&cols, "├", "┴", "┤");
        section_label(
            format!("  {} — should be reachable", "ALLOW".color(colors::ALLOW).bold()),
            inner_width,
        );
        separator(&cols, "├", "┬", "┤");
        for result in &allow {
            row(&cols, result_cells(result, max_host_chars));
        }
    }

    if !deny.is_empty() {
        separator(&cols, "├", "┴", "┤");
        section_label(
            format!("  {} — should be blocked", "DENY".color(colors::DENY).bold()),
            inner_width,
        );
        separator(&cols, "├", "┬", "┤");
        for result in &deny {
            row(&cols, result_cells(result, max_host_chars));
        }
    }

    separator(&cols, "└", "┴", "┘");
    summary(results);
}

fn result_cells(result: &TargetResult, max_host_chars: usize) -> [String; 6] {
    let host: String = console::truncate_str(&result.target.host, max_host_chars, "…").to_string();
    let verdict: String = if result.passed {
        format!(" {}", "OK".color(colors::ALLOW).bold())
    } else {
        format!(" {}", "FAIL".color(colors::FAIL).bold())
    };

    [
        format!(" {host}"),
        format!(" {}", result.target.port),
        phase_cell(&result.dns),
        phase_cell(&result.tcp),
        phase_cell(&result.tls),
        verdict,
    ]
}

/// One table cell for one phase: timing on success, classified reason on
/// failure, a dimmed dash for phases skipped after an earlier failure.
fn phase_cell(phase: &PhaseOutcome) -> String {
    if phase.is_skip() {
        return format!(" {}", "—".dimmed());
    }
    if phase.succeeded {
        let timing: String = format!("✅ {}ms", phase.elapsed.as_millis());
        return format!(" {}", timing.color(colors::ALLOW));
    }
    format!(" {}", format!("❌ {}", phase.detail).color(colors::FAIL))
}

fn summary(results: &[TargetResult]) {
    let total: usize = results.len();
    let ok: usize = results.iter().filter(|r| r.passed).count();
    let failed: usize = total - ok;

    let mut line: String = format!(
        "  Results: {}",
        format!("{ok}/{total} OK").color(colors::ALLOW)
    );
    if failed > 0 {
        line.push_str(&format!(
            " | {}",
            format!("{failed}/{total} FAIL").color(colors::FAIL)
        ));
    }

    print::print("");
    print::print(&line);
    print::print("");
}

fn row(cols: &[usize; 6], cells: [String; 6]) {
    let border: String = "│".color(colors::SEPARATOR).to_string();
    let mut line: String = border.clone();
    for (cell, width) in cells.iter().zip(cols) {
        line.push(' ');
        line.push_str(&pad_right(cell, *width));
        line.push_str(&border);
    }
    print::print(&line);
}

fn section_label(text: String, inner_width: usize) {
    let border: String = "│".color(colors::SEPARATOR).to_string();
    print::print(&format!(
        "{border}{}{border}",
        pad_right(&text, inner_width)
    ));
}

fn separator(cols: &[usize; 6], left: &str, mid: &str, right: &str) {
    let mut line: String = String::from(left);
    for (i, width) in cols.iter().enumerate() {
        line.push_str(&"─".repeat(width + 1));
        if i + 1 < cols.len() {
            line.push_str(mid);
        }
    }
    line.push_str(right);
    print::print(&line.color(colors::SEPARATOR).to_string());
}

/// ANSI- and emoji-aware padding; cells wider than their column are left
/// untouched rather than truncated.
fn pad_right(s: &str, width: usize) -> String {
    let visible: usize = measure_text_width(s);
    if visible >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - visible))
}
