use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ticalabash::args::{flag_registry, FlagArity};
use ticalabash::config::{install_prefix, Config};
use ticalabash::dispatch::{
    DispatchRequest, Dispatcher, InvocationContext, KeystoreOptions, RunnerRegistry,
};
use ticalabash::logging::init_tracing;
use ticalabash::project::{resolve_project_dir, AssetTemplates};

/// Build w/Calabash
#[derive(Parser, Debug)]
#[command(
    name = "ticalabash",
    version,
    about = "Build w/Calabash",
    long_about = "Builds a project and injects the Calabash framework"
)]
struct Cli {
    /// Target platform (android, ios, iphone)
    #[arg(short = 'p', long, required_unless_present = "flags")]
    platform: Option<String>,

    /// The location of the keystore used to sign this application
    #[arg(short = 'K', long, value_name = "PATH")]
    keystore_location: Option<PathBuf>,

    /// The password of the keystore used to sign this application
    #[arg(short = 'P', long, value_name = "PASSWORD")]
    password: Option<String>,

    /// The alias of the keystore used to sign this application
    #[arg(short = 'A', long, value_name = "ALIAS")]
    alias: Option<String>,

    /// Titanium project directory (default: $SOURCE_ROOT/../.. or the current directory)
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/ticalabash/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// List the recognized Calabash flags and exit
    #[arg(long)]
    flags: bool,

    /// Build arguments, with Calabash flags mixed in
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if cli.flags {
        print_flags();
        return Ok(0);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_tracing(level);

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let source_root = std::env::var_os("SOURCE_ROOT");
    let project_dir = resolve_project_dir(cli.project_dir.as_deref(), source_root.as_deref(), &cwd);

    let prefix = install_prefix();
    let templates = AssetTemplates::from_assets_dir(&config.assets.resolve());
    let runners = RunnerRegistry::from_config(&config.runners, prefix.as_deref());
    let mut dispatcher = Dispatcher::new(templates, runners);

    let mut context = InvocationContext::new(KeystoreOptions {
        location: cli.keystore_location,
        password: cli.password,
        alias: cli.alias,
    });

    let platform = cli.platform.unwrap_or_default();
    let outcome = dispatcher.dispatch(
        &DispatchRequest {
            platform: &platform,
            raw_args: &cli.args,
            project_dir: &project_dir,
        },
        &mut context,
    )?;

    if !outcome.success() {
        tracing::warn!(exit_code = outcome.exit_code, "Platform runner failed");
    }
    Ok(outcome.exit_code)
}

fn print_flags() {
    for def in flag_registry() {
        let short = def.short.map(|s| format!(", {}", s)).unwrap_or_default();
        let value = match def.arity {
            FlagArity::RequiresValue => " <VALUE>",
            FlagArity::NoValue => "",
        };
        let note = if def.extracted {
            ""
        } else {
            " (passed to the build tool)"
        };
        println!(
            "  {:<24} {}{}",
            format!("{}{}{}", def.long, short, value),
            def.description,
            note
        );
    }
}
