//! # confpath demo application
//!
//! A sample CLI tool that shows how to wire
//! [confpath](https://docs.rs/confpath) into a real application. This is
//! **not** a real app. It exists to demonstrate and manually verify
//! confpath's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example confpath_demo -- echo
//! cargo run --example confpath_demo -- --help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                                          |
//! |--------------------------|-----------------------------------------------------------------------------|
//! | Struct defaults          | `cargo run --example confpath_demo -- echo`                                 |
//! | Per-user config file     | Write `confpath-demo.yaml` in the platform config dir, then run `echo`      |
//! | Config file flag         | `cargo run --example confpath_demo -- -f demo.yaml echo`                    |
//! | Assignment flag          | `cargo run --example confpath_demo -- -c server.port=8080 echo`             |
//! | Duration parsing         | `cargo run --example confpath_demo -- -c server.timeout=1m30s echo`         |
//! | String list              | `cargo run --example confpath_demo -- -c 'display.tags=["a", "b"]' echo`    |
//! | Env var override         | `CONFPATH_DEMO__DISPLAY__COLOR=red cargo run --example confpath_demo -- echo` |
//! | Single path echo         | `cargo run --example confpath_demo -- echo --key server.port`              |
//! | Settings listing         | `cargo run --example confpath_demo -- settings`                             |
//! | Save as YAML             | `cargo run --example confpath_demo -- dump out.yaml`                        |
//! | Debug logging            | `RUST_LOG=confpath=debug cargo run --example confpath_demo -- echo`         |

mod config;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confpath::{ConfigArgs, ConfpathError};

use config::DemoConfig;

const APP_NAME: &str = "confpath-demo";
const ENV_PREFIX: &str = "CONFPATH_DEMO";

/// confpath demo: a sample CLI app for showcasing confpath integration.
#[derive(Parser, Debug)]
#[command(name = "confpath-demo")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print resolved configuration values (colored by display.color).
    Echo {
        /// Print only this dotted path instead of all values.
        #[arg(long)]
        key: Option<String>,
    },
    /// List every settable path with its type and current value.
    Settings,
    /// Write the resolved configuration as YAML (stdout when no file given).
    Dump { file: Option<PathBuf> },
}

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn echo_all(config: &DemoConfig) -> Result<(), ConfpathError> {
    let color = ansi_color_code(&config.display.color);

    if config.verbose {
        println!(
            "{color}[verbose] Resolved configuration for {:?}{RESET}",
            config.name
        );
        println!();
    }

    let settings = confpath::settings(config)?;
    let max_key_len = settings.iter().map(|s| s.path.len()).max().unwrap_or(0);
    for s in &settings {
        let value = confpath::get(config, &s.path)?;
        println!("{color}{:<max_key_len$}{RESET}  {value}", s.path);
    }
    Ok(())
}

fn echo_key(config: &DemoConfig, key: &str) -> Result<(), ConfpathError> {
    let color = ansi_color_code(&config.display.color);
    let value = confpath::get(config, key)?;
    println!("{color}{key}{RESET}  {value}");
    Ok(())
}

/// Defaults, then the per-user file, then the environment, then `-f`/`-c`
/// flags in command-line order.
fn load(matches: &clap::ArgMatches) -> Result<DemoConfig, String> {
    let mut config = DemoConfig::default();
    confpath::Loader::new()
        .platform_file(APP_NAME)
        .env_prefix(ENV_PREFIX)
        .load_into(&mut config)
        .map_err(|e| e.to_string())?;
    confpath::apply_in_order(matches, &mut config).map_err(|e| e.to_string())?;
    Ok(config)
}

fn run(cli: Cli, config: &DemoConfig) -> Result<(), ConfpathError> {
    match cli.command {
        Commands::Echo { key: Some(k) } => echo_key(config, &k),
        Commands::Echo { key: None } => echo_all(config),
        Commands::Settings => confpath::print_settings(std::io::stdout(), config),
        Commands::Dump { file: Some(path) } => confpath::write_file(path, config),
        Commands::Dump { file: None } => confpath::write(std::io::stdout(), config),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = confpath::with_settings_help(Cli::command(), &DemoConfig::default())
        .unwrap_or_else(|e| {
            eprintln!("Failed to describe settings:\n{e}");
            std::process::exit(1);
        });
    let matches = command.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let config = load(&matches).unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e}");
        std::process::exit(1);
    });

    if let Err(e) = run(cli, &config) {
        eprintln!("Config error:\n{e}");
        std::process::exit(1);
    }
}
