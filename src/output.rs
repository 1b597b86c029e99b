//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: the per-file report
//! lines, the folder summary table and the progress bar shown while moving.
//! Report text goes to stdout; errors and the progress bar go to stderr.

use crate::report::{FileOutcome, RunReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::io::IsTerminal;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Disables colors when stdout is not a terminal.
    ///
    /// `colored` already honors `NO_COLOR` and `CLICOLOR`; this additionally
    /// keeps piped output free of escape codes.
    pub fn configure_colors() {
        if !std::io::stdout().is_terminal() {
            colored::control::set_override(false);
        }
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// OutputFormatter::error("configuration is invalid");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", message.yellow());
    }

    /// Creates a progress bar for file moves, drawn on stderr.
    ///
    /// The bar hides itself when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table with file counts per destination folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_folder_len = folder_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(6); // At least "Folder" width

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                file_word(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            file_word(total_files),
            width = max_folder_len
        );
    }

    /// Prints the full report of a run: header, one line per file, the
    /// folder summary and the trailing success/failure counts.
    pub fn report(report: &RunReport) {
        Self::info(&report.header_line());

        if report.is_empty() {
            Self::plain("No files found. Nothing to do.");
            return;
        }

        for outcome in &report.outcomes {
            let line = report.outcome_line(outcome);
            match outcome {
                FileOutcome::Moved(_) if report.mode.is_dry_run() => Self::dry_run_notice(&line),
                FileOutcome::Moved(_) => Self::plain(&line),
                FileOutcome::Failed { .. } => println!("{}", line.red()),
            }
        }

        let counts = report.folder_counts();
        if !counts.is_empty() {
            Self::summary_table(&counts, report.success_count());
        }

        println!();
        if report.mode.is_dry_run() {
            Self::dry_run_notice("Dry run complete. No files were modified.");
        }

        let totals = report.totals_line();
        if report.is_success() {
            Self::success(&totals);
        } else {
            Self::warning(&totals);
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
