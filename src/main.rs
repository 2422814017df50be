//! memfs CLI - run command scripts against an in-memory file table
//!
//! Every invocation starts from an empty table; nothing outlives the process.

use clap::{Parser, Subcommand};
use memfs::{Config, OutputFormat, Session, DEMO_SCRIPT};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "memfs")]
#[command(about = "An in-memory file table driven by command scripts")]
#[command(version)]
struct Cli {
    /// Path to a config file (default: ~/.config/memfs/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Report failing commands and keep going
    #[arg(short, long)]
    keep_going: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file (to --config, or the default location)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run a script file, or stdin when no file is given
    Run {
        /// Script path
        script: Option<PathBuf>,
    },

    /// Run the built-in demonstration script
    Demo,

    /// Print the commands understood by scripts
    Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        let path = match cli.config {
            Some(path) => path,
            None => Config::default_path()?,
        };
        if path.exists() && !force {
            anyhow::bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        Config::default().save_to(&path)?;
        output(
            &cli.format.unwrap_or_default(),
            &serde_json::json!({
                "status": "ok",
                "message": format!("Wrote config to {}", path.display())
            }),
        )?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let format = cli.format.unwrap_or(config.format);
    let keep_going = cli.keep_going || config.keep_going;

    let script = match cli.command {
        Commands::Run { script: Some(path) } => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        Commands::Run { script: None } => {
            let mut script = String::new();
            std::io::stdin().read_to_string(&mut script)?;
            script
        }
        Commands::Init { .. } => unreachable!("handled before loading config"),
        Commands::Demo => DEMO_SCRIPT.to_string(),
        Commands::Commands => {
            output(
                &format,
                &serde_json::json!({
                    "commands": [
                        "create NAME", "open NAME", "close FD",
                        "read FD SIZE", "write FD TEXT...", "ls",
                        "link TARGET ALIAS", "unlink ALIAS", "truncate NAME SIZE",
                        "stat NAME", "tell FD"
                    ]
                }),
            )?;
            return Ok(());
        }
    };

    let mut session = Session::new(keep_going);
    let mut printed = Ok(());
    let result = session.run(&script, |value| {
        if printed.is_ok() {
            printed = output(&format, value);
        }
    });
    printed?;

    match result {
        Ok(summary) => {
            log::info!(
                "{} command(s) executed, {} failed",
                summary.executed,
                summary.failed
            );
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
        Err(_) => std::process::exit(1),
    }

    Ok(())
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
