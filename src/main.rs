//! lsfgctl - Configuration CLI for the lsfg-vk frame generation layer.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use clap::Parser;
use colored::Colorize;
use serde::Serialize;

use lsfgctl::cli::{self, Cli, Commands, ProfileCommands};
use lsfgctl::error::{LsfgError, Result};
use lsfgctl::logging::init_logging;
use lsfgctl::schema::{schema, FieldValue};
use lsfgctl::service::ConfigurationService;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Status) => cmd_status(cli),
        Some(Commands::Set(args)) => cmd_set(cli, args),
        Some(Commands::Profile(cmd)) => match cmd {
            ProfileCommands::List => cmd_profile_list(cli),
            ProfileCommands::Create(args) => cmd_profile_create(cli, args),
            ProfileCommands::Delete(args) => cmd_profile_delete(cli, args),
            ProfileCommands::Rename(args) => cmd_profile_rename(cli, args),
            ProfileCommands::Use(args) => cmd_profile_use(cli, args),
        },
        Some(Commands::DetectDll) => cmd_detect_dll(cli),
        Some(Commands::SetDll(args)) => cmd_set_dll(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

fn service_for(cli: &Cli) -> Result<ConfigurationService> {
    match (&cli.config, &cli.script) {
        (Some(config), Some(script)) => {
            Ok(ConfigurationService::new(config.clone(), script.clone()))
        }
        (config, script) => {
            let (default_config, default_script) = lsfgctl::service::default_paths()?;
            Ok(ConfigurationService::new(
                config.clone().unwrap_or(default_config),
                script.clone().unwrap_or(default_script),
            ))
        }
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "lsfgctl",
        version: VERSION,
        description: "Configuration and profile CLI for the lsfg-vk frame generation layer",
        status: "lsfgctl status --robot",
        set_field: "lsfgctl set <FIELD> <VALUE> [--profile <NAME>]",
        profiles: RobotProfiles {
            list: "lsfgctl profile list --robot",
            create: "lsfgctl profile create <NAME> [--from <NAME>]",
            delete: "lsfgctl profile delete <NAME>",
            rename: "lsfgctl profile rename <OLD> <NEW>",
            switch: "lsfgctl profile use <NAME>",
        },
        dll: RobotDll {
            detect: "lsfgctl detect-dll --robot",
            set: "lsfgctl set-dll <PATH>",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        paths: "Override with --config <PATH> and --script <PATH>",
    };

    println!("{}", serde_json::to_string_pretty(&help).unwrap());
}

fn print_human_quick_start() {
    println!(
        "{} {} - lsfg-vk configuration CLI\n",
        "lsfgctl".bold().cyan(),
        VERSION
    );

    println!("{}", "QUICK START".bold().underline());
    println!();
    println!("  {}  Show config and profiles", "lsfgctl status".green());
    println!("  {}  Set a field", "lsfgctl set multiplier 2".green());
    println!(
        "  {}  Create a profile",
        "lsfgctl profile create mygame".green()
    );
    println!("  {}  Switch profiles", "lsfgctl profile use mygame".green());
    println!("  {}  Find Lossless.dll", "lsfgctl detect-dll".green());
    println!();

    println!("{}", "ROBOT MODE (for scripts and agents)".bold().underline());
    println!();
    println!("  {}  JSON output", "lsfgctl --robot <command>".cyan());
    println!();

    println!("Run {} for full help", "lsfgctl --help".yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    status: &'static str,
    set_field: &'static str,
    profiles: RobotProfiles,
    dll: RobotDll,
    output_modes: OutputModes,
    paths: &'static str,
}

#[derive(Serialize)]
struct RobotProfiles {
    list: &'static str,
    create: &'static str,
    delete: &'static str,
    rename: &'static str,
    switch: &'static str,
}

#[derive(Serialize)]
struct RobotDll {
    detect: &'static str,
    set: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn cmd_status(cli: &Cli) -> Result<()> {
    let service = service_for(cli)?;
    let status = service.get_config();

    if cli.use_json() {
        output_json(cli, &status);
    } else {
        println!(
            "{}: {}",
            "Current profile".bold(),
            status.current_profile.green()
        );
        println!("{}: {}", "Profiles".bold(), status.profiles.join(", "));
        println!();
        for field in schema().fields() {
            if let Some(value) = status.config.get(field.name) {
                println!("  {} = {}", field.name.cyan(), render_value(value));
            }
        }
    }
    Ok(())
}

fn cmd_set(cli: &Cli, args: &cli::SetArgs) -> Result<()> {
    let service = service_for(cli)?;
    service.update_field(&args.field, &args.value, args.profile.as_deref())?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "field": args.field,
                "value": args.value,
                "profile": args.profile,
                "ok": true
            }),
        );
    } else if !cli.quiet {
        println!("{} = {}", args.field, args.value);
    }
    Ok(())
}

fn cmd_profile_list(cli: &Cli) -> Result<()> {
    let service = service_for(cli)?;
    let status = service.get_config();

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "profiles": status.profiles,
                "current": status.current_profile,
            }),
        );
    } else {
        for name in &status.profiles {
            if *name == status.current_profile {
                println!("{} {}", "*".green(), name.green());
            } else {
                println!("  {name}");
            }
        }
    }
    Ok(())
}

fn cmd_profile_create(cli: &Cli, args: &cli::ProfileCreateArgs) -> Result<()> {
    let service = service_for(cli)?;
    service.create_profile(&args.name, args.from.as_deref())?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({ "created": args.name, "from": args.from, "ok": true }),
        );
    } else if !cli.quiet {
        println!("Profile '{}' created", args.name);
    }
    Ok(())
}

fn cmd_profile_delete(cli: &Cli, args: &cli::ProfileNameArgs) -> Result<()> {
    let service = service_for(cli)?;
    service.delete_profile(&args.name)?;

    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "deleted": args.name, "ok": true }));
    } else if !cli.quiet {
        println!("Profile '{}' deleted", args.name);
    }
    Ok(())
}

fn cmd_profile_rename(cli: &Cli, args: &cli::ProfileRenameArgs) -> Result<()> {
    let service = service_for(cli)?;
    service.rename_profile(&args.old, &args.new)?;

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({ "renamed": args.old, "to": args.new, "ok": true }),
        );
    } else if !cli.quiet {
        println!("Profile '{}' renamed to '{}'", args.old, args.new);
    }
    Ok(())
}

fn cmd_profile_use(cli: &Cli, args: &cli::ProfileNameArgs) -> Result<()> {
    let service = service_for(cli)?;
    service.set_current_profile(&args.name)?;

    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "current": args.name, "ok": true }));
    } else if !cli.quiet {
        println!("Switched to profile '{}'", args.name);
    }
    Ok(())
}

fn cmd_detect_dll(cli: &Cli) -> Result<()> {
    let service = service_for(cli)?;
    let detection = service.detect_dll();

    if cli.use_json() {
        output_json(cli, &detection);
    } else if let Some(path) = &detection.path {
        println!("{}: {} ({})", "Found".green(), path.display(), detection.source);
    } else {
        println!("{}", "Lossless.dll not found".yellow());
        println!("Install Lossless Scaling via Steam, or set LSFG_DLL_PATH");
    }
    Ok(())
}

fn cmd_set_dll(cli: &Cli, args: &cli::SetDllArgs) -> Result<()> {
    let service = service_for(cli)?;
    service.set_dll_path(&args.path)?;

    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "dll": args.path, "ok": true }));
    } else if !cli.quiet {
        println!("DLL path set to {}", args.path);
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(cli, &serde_json::json!({ "version": VERSION }));
    } else {
        println!("lsfgctl {VERSION}");
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "lsfgctl", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Str(s) if s.is_empty() => "(unset)".to_string(),
        FieldValue::Str(s) => s.clone(),
    }
}

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data).unwrap()
    } else {
        serde_json::to_string_pretty(data).unwrap()
    };
    println!("{json}");
}

fn output_error(cli: &Cli, error: &LsfgError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        eprintln!("{}: {}", "Error".red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", "Hint".yellow(), suggestion);
        }
    }
}
