use crate::core::error::{KeySyncError, Result};
use crate::core::results::SyncResults;
use colored::Colorize;

pub const HEADER: &str = "#\n# Generated with sync-ssh-keys\n#\n";

pub const FORMATS: &[&str] = &["authorized_keys", "json"];

pub struct OutputFormatter;

impl OutputFormatter {
    /// Render results in the requested format (`authorized_keys` or `json`)
    pub fn render(results: &SyncResults, format: &str) -> Result<String> {
        match format {
            "authorized_keys" => Ok(Self::render_authorized_keys(results)),
            "json" => Ok(serde_json::to_string_pretty(results)? + "\n"),
            _ => Err(KeySyncError::Config(format!("Unknown format: {}", format))),
        }
    }

    /// One `# <source>` block per non-empty source; empty when there are no keys
    pub fn render_authorized_keys(results: &SyncResults) -> String {
        if results.is_empty() {
            return String::new();
        }

        let blocks: Vec<String> = results
            .sources
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(source, keys)| format!("# {}\n{}\n", source, keys.join("\n")))
            .collect();

        format!("{}\n{}", HEADER, blocks.join("\n"))
    }

    /// Per-source key counts
    pub fn print_summary(results: &SyncResults) {
        for (source, keys) in &results.sources {
            eprintln!(
                "  {} {}: {} keys",
                "•".bright_yellow(),
                source.bright_cyan(),
                keys.len().to_string().bright_white()
            );
        }
    }

    /// Print error message
    pub fn print_error(message: &str) {
        eprintln!("{} {}", "error:".bright_red().bold(), message.red());
    }

    /// Print warning message
    pub fn print_warning(message: &str) {
        eprintln!("{} {}", "warning:".bright_yellow().bold(), message.yellow());
    }

    /// Print success message
    pub fn print_success(message: &str) {
        eprintln!("{} {}", "✓".bright_green(), message.green());
    }
}
