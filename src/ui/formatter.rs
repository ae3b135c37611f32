//! Pure formatting functions for UI output.
//!
//! Human-facing output goes to stderr so that stdout carries only the new tag
//! name and can be captured by scripts.

use console::style;

use crate::analyzer::AppliedBump;
use crate::boundary::BoundaryWarning;

/// Applied bumps listed before the rest is summarised
pub const MAX_LISTED_BUMPS: usize = 10;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One line per applied bump, e.g. `minor  a1b2c3d feat(api): add endpoint (Jane Doe)`
pub fn format_applied_bump(applied: &AppliedBump) -> String {
    let commit = &applied.commit;
    let scope = commit
        .scope
        .as_ref()
        .map(|s| format!("({})", s))
        .unwrap_or_default();
    let marker = if commit.breaking { "!" } else { "" };

    let mut line = format!(
        "{:<6} {} {}{}{}: {}",
        applied.bump.as_str(),
        commit.short_hash(),
        commit.commit_type,
        scope,
        marker,
        commit.short_description
    );
    if !applied.author.is_empty() {
        line.push_str(&format!(" ({})", applied.author));
    }
    line
}

/// Display the commits that moved the version.
///
/// Shows up to 10 entries and the count of the remaining ones.
pub fn display_derivation(applied: &[AppliedBump], commit_count: usize) {
    eprintln!(
        "\n{}",
        style(format!(
            "{} of {} commit(s) trigger a release",
            applied.len(),
            commit_count
        ))
        .bold()
    );

    for entry in applied.iter().take(MAX_LISTED_BUMPS) {
        eprintln!("  {}", format_applied_bump(entry));
    }

    if applied.len() > MAX_LISTED_BUMPS {
        eprintln!("  ... and {} more", applied.len() - MAX_LISTED_BUMPS);
    }
}

/// Display the proposed tag change (or initial tag).
///
/// # Arguments
/// * `old_tag` - Previous tag (None if this is the initial tag)
/// * `new_tag` - The new tag being proposed
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            eprintln!("\n{}", style("Proposed Tag Change:").bold());
            eprintln!("  From: {}", style(old).red());
            eprintln!("  To:   {}", style(new_tag).green());
        }
        None => {
            eprintln!("\n{}", style("Initial Tag:").bold());
            eprintln!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Display manual push instruction for a tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    eprintln!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}
