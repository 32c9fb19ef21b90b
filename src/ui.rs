use crate::analyzer::{Decision, NextVersion};
use crate::domain::{LevelBump, ParsedCommit};

const MAX_LISTED_COMMITS: usize = 10;
const MAX_SUBJECT_WIDTH: usize = 60;

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_warning(message: &str) {
    eprintln!("\x1b[33mWARNING:\x1b[0m {}", message);
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

fn truncate(subject: &str) -> String {
    if subject.chars().count() > MAX_SUBJECT_WIDTH {
        let cut: String = subject.chars().take(MAX_SUBJECT_WIDTH).collect();
        format!("{}…", cut)
    } else {
        subject.to_string()
    }
}

/// One line per classified commit: short id, level and subject
pub fn format_commit_line(commit: &ParsedCommit) -> String {
    format!(
        "{} [{}] {}",
        commit.commit.short_id(),
        commit.bump,
        truncate(commit.commit.subject())
    )
}

pub fn display_commit_analysis(commits: &[ParsedCommit], branch_name: &str) {
    println!(
        "\n\x1b[1mAnalyzing commits on branch '{}'\x1b[0m",
        branch_name
    );
    println!("\x1b[4m{} unreleased commits:\x1b[0m", commits.len());

    for (i, commit) in commits.iter().take(MAX_LISTED_COMMITS).enumerate() {
        println!("  {}. {}", i + 1, format_commit_line(commit));
    }

    if commits.len() > MAX_LISTED_COMMITS {
        println!(
            "  ... and {} more commits",
            commits.len() - MAX_LISTED_COMMITS
        );
    }
}

pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str, level: LevelBump) {
    match old_tag {
        Some(old) => {
            println!("\n\x1b[1mProposed Tag Change ({}):\x1b[0m", level);
            println!("  From: \x1b[31m{}\x1b[0m", old);
            println!("  To:   \x1b[32m{}\x1b[0m", new_tag);
        }
        None => {
            println!("\n\x1b[1mInitial Tag:\x1b[0m");
            println!("  New tag: \x1b[32m{}\x1b[0m", new_tag);
        }
    }
}

/// Report the outcome of a run, warnings first
pub fn display_decision(outcome: &NextVersion, branch_name: &str) {
    for warning in &outcome.warnings {
        display_warning(&warning.to_string());
    }

    display_commit_analysis(&outcome.commits, branch_name);

    match &outcome.decision {
        Decision::Release { version, level } => {
            display_proposed_tag(outcome.baseline_tag.as_deref(), &version.as_tag(), *level);
        }
        Decision::NoReleaseDue => {
            display_status("No release due");
        }
    }
}
