//! ccsetup - installer for a Claude Code power-user configuration bundle
//!
//! Copies bundled asset trees (agents, skills, commands, hooks, principles)
//! into `~/.claude` and non-destructively merges the bundled settings
//! template into the user's `settings.json`. Re-running is safe: existing
//! files are skipped unless `--force` is given, permission lists are unioned
//! without duplicates, hook descriptors are only appended when no
//! structurally equal descriptor is registered, and MCP servers already
//! configured by the user are never overridden.
//!
//! # Merge rules
//!
//! | Section | Rule |
//! |---------|------|
//! | `permissions.allow` | set union, destination order preserved |
//! | `hooks.<event>` | append descriptors absent by structural equality |
//! | `mcpServers` | add new names only, never override |
//!
//! # Quick Start
//!
//! ```no_run
//! use ccsetup::{pipeline, SetupOptions};
//!
//! let options = SetupOptions {
//!     config_dir: "config".into(),
//!     claude_dir: ccsetup::default_claude_dir().unwrap(),
//!     force: false,
//!     skip_backup: false,
//! };
//! let report = pipeline::run(&options);
//! println!("installed {} file(s), skipped {}", report.installed, report.skipped);
//! ```

pub mod backup;
pub mod bundle;
pub mod install;
pub mod instructions;
pub mod pipeline;
pub mod settings;

pub use backup::{backup_file, BackupTag};
pub use bundle::{
    default_claude_dir, default_config_dir, display_path, ASSET_CATEGORIES, GLOBAL_INSTRUCTIONS,
    SETTINGS_FILE, SETTINGS_TEMPLATE,
};
pub use install::{install_tree, InstallReport};
pub use instructions::{merge_instructions, InstructionsOutcome, MARKER};
pub use pipeline::{SetupOptions, SetupReport};
pub use settings::{
    merge_settings, merge_settings_file, HookCommand, HookEntry, MergeOutcome, Permissions,
    Settings,
};
