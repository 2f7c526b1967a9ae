//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// lsfg-vk configuration CLI - manage frame-generation profiles.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "lsfgctl", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "LSFGCTL_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Config file path (default: $XDG_CONFIG_HOME/lsfg-vk/conf.toml)
    #[arg(long, global = true, env = "LSFGCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Launch script path (default: ~/lsfg)
    #[arg(long, global = true, env = "LSFGCTL_SCRIPT")]
    pub script: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Configuration ===
    /// Show the effective configuration and profile roster
    Status,

    /// Set a configuration field
    Set(SetArgs),

    // === Profiles ===
    /// Manage per-game profiles
    #[command(subcommand)]
    Profile(ProfileCommands),

    // === DLL ===
    /// Locate Lossless.dll on this machine
    DetectDll,

    /// Record the Lossless.dll path in the config
    SetDll(SetDllArgs),

    // === Utilities ===
    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List profiles (current one marked)
    List,

    /// Create a new profile
    Create(ProfileCreateArgs),

    /// Delete a profile
    Delete(ProfileNameArgs),

    /// Rename a profile
    Rename(ProfileRenameArgs),

    /// Switch the current profile
    Use(ProfileNameArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Field name (e.g. multiplier, flow_scale, hdr_mode)
    pub field: String,

    /// New value
    pub value: String,

    /// Profile to modify (default: the current profile)
    #[arg(long, short = 'p')]
    pub profile: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ProfileCreateArgs {
    /// Name of the new profile
    pub name: String,

    /// Copy settings from an existing profile
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ProfileNameArgs {
    /// Profile name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ProfileRenameArgs {
    /// Existing profile name
    pub old: String,

    /// New profile name
    pub new: String,
}

#[derive(Parser, Debug)]
pub struct SetDllArgs {
    /// Path to Lossless.dll
    pub path: String,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
