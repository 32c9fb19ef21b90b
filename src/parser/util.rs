//! Message helpers shared by the commit grammars

use regex::Regex;
use std::sync::LazyLock;

static BREAKING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^BREAKING[ -]CHANGE:\s*(?P<description>.*)$").expect("Invalid regex")
});

static MERGE_REQUEST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\t ]+\((?:pull request )?(?P<number>[#!][0-9]+)\)[\t ]*$").expect("Invalid regex")
});

/// Message split into subject and body paragraphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParts {
    pub subject: String,
    /// Body paragraphs that are not breaking-change notes, lines joined by spaces
    pub paragraphs: Vec<String>,
    /// Text of every `BREAKING CHANGE:` / `BREAKING-CHANGE:` note in the body
    pub breaking: Vec<String>,
    /// Set when a breaking marker was seen, even one without text
    pub breaking_marker: bool,
}

/// Split a commit message into its subject, plain paragraphs and breaking notes.
///
/// A breaking note starts at a line beginning with the marker and runs to the
/// end of its paragraph, so it may follow other footer lines.
pub fn split_message(message: &str) -> MessageParts {
    let mut lines = message.lines();
    let subject = lines.next().unwrap_or("").trim().to_string();

    let mut paragraphs = Vec::new();
    let mut breaking = Vec::new();
    let mut breaking_marker = false;

    for block in blocks(lines) {
        match block.iter().position(|line| BREAKING_REGEX.is_match(line)) {
            Some(start) => {
                if start > 0 {
                    paragraphs.push(block[..start].join(" "));
                }
                breaking_marker = true;
                let note = block[start..].join(" ");
                if let Some(caps) = BREAKING_REGEX.captures(&note) {
                    let description = caps["description"].trim();
                    if !description.is_empty() {
                        breaking.push(description.to_string());
                    }
                }
            }
            None => paragraphs.push(block.join(" ")),
        }
    }

    MessageParts {
        subject,
        paragraphs,
        breaking,
        breaking_marker,
    }
}

/// Group lines into blank-line separated blocks of trimmed lines
fn blocks<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Vec<&'a str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Strip a trailing `(#123)` style reference from a subject
pub fn split_merge_request(subject: &str) -> (String, Option<String>) {
    match MERGE_REQUEST_REGEX.captures(subject) {
        Some(caps) => {
            let start = caps.get(0).map_or(subject.len(), |m| m.start());
            (
                subject[..start].trim_end().to_string(),
                Some(caps["number"].to_string()),
            )
        }
        None => (subject.to_string(), None),
    }
}

/// Whether any of the configured strings appears in `list`
pub fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item == value)
}
