//! Colored status lines for the command-line front end.
//!
//! Responses go to stdout untouched; everything here goes to stderr so it
//! never mixes with phone output.

use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::transport::{FrameOutcome, TransportStats};

/// Status line for a response that did not end with the prompt.
#[must_use]
pub fn format_incomplete(command: &str, outcome: FrameOutcome) -> Option<String> {
    let reason = match outcome {
        FrameOutcome::Matched => return None,
        FrameOutcome::TimedOut => "timed out waiting for prompt",
        FrameOutcome::ProcessExited => "shell exited before prompt",
    };
    Some(format!(
        "{} {} {}",
        "[INCOMPLETE]".yellow().bold(),
        command.cyan(),
        reason
    ))
}

pub fn print_incomplete(command: &str, outcome: FrameOutcome) {
    if let Some(line) = format_incomplete(command, outcome) {
        eprintln!("{line}");
    }
}

pub fn print_started(pid: Option<u32>, binary: &str) {
    let pid = pid.map_or_else(|| "?".to_string(), |p| p.to_string());
    eprintln!("{} {binary} pid={pid}", "[SHELL]".blue().bold());
}

pub fn print_error(err: &dyn Display) {
    eprintln!("{} {err}", "[ERROR]".red().bold());
}

/// Transport counters as a single line.
#[must_use]
pub fn format_stats(stats: &TransportStats) -> String {
    format!(
        "{} requests={} matched={} timed_out={} exited={}",
        "[STATS]".dimmed(),
        stats.requests,
        stats.matched,
        stats.timed_out,
        stats.exited
    )
}

pub fn print_stats(stats: &TransportStats) {
    eprintln!("{}", format_stats(stats));
}
