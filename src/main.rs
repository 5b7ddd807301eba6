use ccsetup::pipeline::{self, SetupOptions, SetupReport};
use ccsetup::{bundle, display_path};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ccsetup")]
#[command(author, version)]
#[command(about = "Install Claude Code power-user agents, skills, commands, and hooks")]
#[command(after_help = "\
What gets installed:
  ~/.claude/agents/       Custom subagents
  ~/.claude/skills/       Skills & workflows
  ~/.claude/commands/     Slash commands
  ~/.claude/hooks/        Automation hooks
  ~/.claude/principles/   Core principles & guidelines
  ~/.claude/CLAUDE.md     Global instructions (merged)
  ~/.claude/settings.json Settings (merged, not overwritten)")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Overwrite existing files instead of skipping them
    #[arg(short, long)]
    force: bool,

    /// Skip creating timestamped backups of settings.json and CLAUDE.md
    #[arg(long)]
    no_backup: bool,

    /// Source bundle directory (defaults to config/ next to the executable)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Destination configuration root (defaults to ~/.claude)
    #[arg(long, value_name = "DIR")]
    claude_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let args = Args::parse();

    if let Some(Command::Completion { shell }) = args.command {
        let mut cmd = Args::command();
        generate(shell, &mut cmd, "ccsetup", &mut std::io::stdout());
        return;
    }

    banner();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => match bundle::default_config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red(), e);
                std::process::exit(1);
            }
        },
    };
    let claude_dir = match args.claude_dir {
        Some(dir) => dir,
        None => match bundle::default_claude_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red(), e);
                std::process::exit(1);
            }
        },
    };

    let options = SetupOptions {
        config_dir,
        claude_dir,
        force: args.force,
        skip_backup: args.no_backup,
    };
    let report = pipeline::run(&options);
    epilogue(&options, &report);
}

fn banner() {
    let text = "
╔═══════════════════════════════════════════════════════╗
║     Claude Code Power User Setup                      ║
║     Agents • Skills • Commands • Hooks                ║
╚═══════════════════════════════════════════════════════╝";
    println!("{}", text.blue());
}

fn epilogue(options: &SetupOptions, report: &SetupReport) {
    println!("\n{}", "Installation complete!".green().bold());
    println!(
        "   Installed {} file(s), skipped {} existing file(s)",
        report.installed, report.skipped
    );
    if report.failed_steps > 0 {
        println!(
            "   {} {} step(s) reported errors; re-run after fixing the cause",
            "[WARN]".yellow(),
            report.failed_steps
        );
    }

    println!("\n{}", "Next steps:".blue().bold());
    println!("  1. Restart Claude Code: {}", "claude".dimmed());
    println!("  2. Try a command: {}", "/cook your task".dimmed());
    println!("  3. List skills: {}", "/skill list".dimmed());

    println!("\n{} Some MCP servers may require API keys.", "Note:".yellow());
    println!(
        "      Check {} to configure.",
        display_path(&options.claude_dir.join(ccsetup::SETTINGS_FILE))
    );

    if let Some(suffix) = &report.backup_suffix {
        let line = format!("Backups saved with suffix: {}", suffix);
        println!("\n{}", line.dimmed());
    }
    println!();
}
