//! CLI output formatting and display helpers.

use anyhow::Result;
use xdcc_search_core::{FileDescriptor, SearchOutcome};

/// Message printed when every source answered but nothing matched.
pub const NO_RESULTS_MESSAGE: &str = "No packs found.";

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Formats a byte count in the indexer's own `K`/`M`/`G` notation.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(size_bytes: i64) -> String {
    const KIB: f64 = 1024.0;
    if size_bytes < 0 {
        return "?".to_string();
    }
    let bytes = size_bytes as f64;
    if bytes >= KIB * KIB * KIB {
        format!("{:.2}G", bytes / (KIB * KIB * KIB))
    } else if bytes >= KIB * KIB {
        format!("{:.0}M", bytes / (KIB * KIB))
    } else {
        format!("{:.0}K", bytes / KIB)
    }
}

/// Renders one result as two lines: a summary and the command to send.
pub fn render_result_lines(file: &FileDescriptor, width: usize) -> [String; 2] {
    let summary = format!(
        "{:>8}  {:>5}  {}",
        format_size(file.size_bytes()),
        file.get_count(),
        file.file_name()
    );
    let command = format!(
        "          {}  [{} {}]",
        file.command(),
        file.network(),
        file.channel()
    );
    [
        truncate_to_width(&summary, width),
        truncate_to_width(&command, width),
    ]
}

/// Renders one result as a single JSON line.
pub fn render_json_line(file: &FileDescriptor) -> Result<String> {
    Ok(serde_json::to_string(file)?)
}

/// Prints the merged results to stdout.
pub fn print_outcome(outcome: &SearchOutcome, json: bool) -> Result<()> {
    if json {
        for file in outcome.results() {
            println!("{}", render_json_line(file)?);
        }
        return Ok(());
    }

    if outcome.results().is_empty() {
        if !outcome.all_failed() {
            println!("{NO_RESULTS_MESSAGE}");
        }
        return Ok(());
    }

    let width = terminal_width();
    for file in outcome.results() {
        for line in render_result_lines(file, width) {
            println!("{line}");
        }
    }
    Ok(())
}
