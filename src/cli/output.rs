//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, MASKED
//! - Red: errors, LEAKED
//! - Yellow: warnings, SKIPPED
//! - Cyan: commands, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info, NOT FOUND

use console::style;
use std::fmt::Display;

use crate::core::classify::Verdict;

const RULE_WIDTH: usize = 56;

/// Check if color output is enabled.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ workflows installed`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ gh CLI not found`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("⚠").yellow(), msg);
    } else {
        println!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ inspect with: gh run list --workflow maskrace-cross-job.yml`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold section header.
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  run:  123456`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(label).dim(), style(value).bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a horizontal rule separator.
pub fn rule() {
    if colors_enabled() {
        println!("{}", style("─".repeat(RULE_WIDTH)).dim());
    } else {
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Format a command string in green.
pub fn cmd(c: &str) -> String {
    if colors_enabled() {
        style(c).green().to_string()
    } else {
        c.to_string()
    }
}

/// Format a verdict padded to `width`, colored by outcome.
pub fn verdict(v: Verdict, width: usize) -> String {
    let text = format!("{:<width$}", v.as_str(), width = width);
    if !colors_enabled() {
        return text;
    }
    match v {
        Verdict::Leaked => style(text).red().bold().to_string(),
        Verdict::Masked => style(text).green().to_string(),
        Verdict::NotFound => style(text).dim().to_string(),
        Verdict::Skipped(_) => style(text).yellow().to_string(),
    }
}

/// Print a section header with a separator line.
///
/// Example:
/// ```text
/// Cross-job matrix
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}
