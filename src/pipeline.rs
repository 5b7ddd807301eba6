//! Full installation pipeline
//!
//! Runs every step of a setup in order: destination root, backups, one tree
//! install per asset category, the settings merge, and the global
//! instructions merge. Steps are independent; a failing step is logged and
//! the remaining steps still run, so a broken settings file cannot block the
//! asset installs (or vice versa). The user re-runs the tool after fixing
//! the cause.

use crate::backup::{backup_file, BackupTag};
use crate::bundle::{
    display_path, ASSET_CATEGORIES, GLOBAL_INSTRUCTIONS, SETTINGS_FILE, SETTINGS_TEMPLATE,
};
use crate::install::{ensure_dir, install_tree};
use crate::instructions::{merge_instructions, InstructionsOutcome};
use crate::settings::merge_settings_file;
use colored::Colorize;
use std::path::PathBuf;

/// What to install, where, and how aggressively.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Source bundle directory.
    pub config_dir: PathBuf,
    /// Destination configuration root.
    pub claude_dir: PathBuf,
    /// Overwrite existing destination files.
    pub force: bool,
    /// Skip the pre-mutation backups of settings.json and CLAUDE.md.
    pub skip_backup: bool,
}

/// Summary of one pipeline run.
#[derive(Debug, Default)]
pub struct SetupReport {
    /// Files written across all asset categories.
    pub installed: usize,
    /// Files left untouched because they already existed.
    pub skipped: usize,
    /// Steps that reported an error and were abandoned.
    pub failed_steps: usize,
    /// Suffix shared by this run's backup files, when backups ran.
    pub backup_suffix: Option<String>,
}

/// Run the full pipeline. Never panics and never aborts early except when
/// the destination root itself cannot be created, in which case no later
/// step could do anything useful.
pub fn run(options: &SetupOptions) -> SetupReport {
    let mut report = SetupReport::default();

    step("Checking Claude Code installation...");
    if let Err(e) = ensure_dir(&options.claude_dir) {
        error(&e);
        report.failed_steps += 1;
        return report;
    }
    info(&format!(
        "Configuration root: {}",
        display_path(&options.claude_dir)
    ));

    if !options.skip_backup {
        step("Creating backups...");
        let tag = BackupTag::now();
        for file in [SETTINGS_FILE, GLOBAL_INSTRUCTIONS] {
            match backup_file(&options.claude_dir.join(file), &tag) {
                Ok(Some(backup)) => warn(&format!(
                    "Backed up: {} -> {}",
                    file,
                    display_path(&backup)
                )),
                Ok(None) => {}
                Err(e) => {
                    error(&e);
                    report.failed_steps += 1;
                }
            }
        }
        report.backup_suffix = Some(tag.suffix());
    }

    for category in ASSET_CATEGORIES {
        step(&format!("Installing {}...", category));
        match install_tree(
            &options.config_dir.join(category),
            &options.claude_dir.join(category),
            options.force,
        ) {
            Ok(tree) => {
                report.installed += tree.installed;
                report.skipped += tree.skipped;
            }
            Err(e) => {
                error(&e);
                report.failed_steps += 1;
            }
        }
    }

    step("Merging settings...");
    let template = options.config_dir.join(SETTINGS_TEMPLATE);
    if template.exists() {
        match merge_settings_file(&options.claude_dir.join(SETTINGS_FILE), &template) {
            Ok(outcome) => {
                for name in &outcome.added_servers {
                    info(&format!("Added MCP server: {}", name));
                }
                success("Settings merged successfully");
            }
            Err(e) => {
                error(&e);
                report.failed_steps += 1;
            }
        }
    }

    step("Installing CLAUDE.md...");
    let source = options.config_dir.join(GLOBAL_INSTRUCTIONS);
    if source.exists() {
        match merge_instructions(
            &options.claude_dir.join(GLOBAL_INSTRUCTIONS),
            &source,
            options.force,
        ) {
            Ok(InstructionsOutcome::Installed) => success("Installed CLAUDE.md"),
            Ok(InstructionsOutcome::Overwritten) => success("Replaced CLAUDE.md"),
            Ok(InstructionsOutcome::Appended) => success("Appended to existing CLAUDE.md"),
            Ok(InstructionsOutcome::AlreadyConfigured) => {
                info("CLAUDE.md already contains the managed section")
            }
            Err(e) => {
                error(&e);
                report.failed_steps += 1;
            }
        }
    }

    report
}

fn step(msg: &str) {
    println!("\n{} {}", "==>".blue().bold(), msg);
}

fn info(msg: &str) {
    println!("   {} {}", "[INFO]".blue(), msg);
}

fn success(msg: &str) {
    println!("   {} {}", "[OK]".green(), msg);
}

fn warn(msg: &str) {
    println!("   {} {}", "[WARN]".yellow(), msg);
}

fn error(msg: &str) {
    println!("   {} {}", "[ERROR]".red(), msg);
}
