use std::time::Duration;

use colored::*;
use unicode_width::UnicodeWidthStr;

use egressr_common::network::target::{Expectation, Target};

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    println!("{msg}");
}

pub fn banner() {
    let text_content: String = format!("⟦ EGRESSR v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat((TOTAL_WIDTH - text_width) / 2).bright_black();
    let output: String = format!("{}{}{}", sep, text, sep);

    print(&output);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

/// The pre-run header block: what is probed, under which budget.
pub fn run_summary(targets: &[Target], timeout: Duration) {
    let allow: usize = targets
        .iter()
        .filter(|t| t.expectation == Expectation::Allow)
        .count();
    let deny: usize = targets.len() - allow;

    print_status(format!(
        "Targets: {} ({} / {})",
        targets.len(),
        format!("{allow} allow").color(colors::ALLOW),
        format!("{deny} deny").color(colors::DENY),
    ));
    print_status(format!("Timeout: {}s per phase", timeout.as_secs()));
    print_status("Phases:  DNS → TCP → TLS/SNI");
    print("");
}

pub fn warmup_note(elapsed: Duration) {
    let note: String = format!(
        "  DNS warm-up: {}ms (first-packet penalty absorbed)",
        elapsed.as_millis()
    );
    print(&format!("{}", note.dimmed()));
    print("");
}

pub fn end_of_program() {
    print(&format!(
        "{}",
        "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)
    ));
}
