//! cmdkeys CLI - keybind-triggered chat macros
//!
//! Entry point for the `cmdkeys` tool:
//! - Terminal macro editor (`edit`)
//! - Profile inspection (`list`)
//! - Configuration file management (`config`)

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cmdkeys_core::{Keybind, Profile, ProfileStore};
use serde::Serialize;
use tracing::info;

mod config;
mod store;
mod tracing_setup;
mod tui;

use config::CliConfig;
use store::TomlProfileStore;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "cmdkeys",
    author,
    version,
    about = "Edit keybind-triggered chat macros in the terminal",
    long_about = "Bind keys to sequences of chat messages and commands. Each macro sends, \
                  cycles through or repeats its messages; `cmdkeys edit` arranges them \
                  with the mouse or keyboard."
)]
struct Cli {
    /// Config file location
    #[arg(long, global = true, env = "CMDKEYS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the macro editor
    Edit(EditArgs),
    /// List the macros of a profile
    List(ListArgs),
    /// Manage cmdkeys configuration (init, path, show)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Profile file (overrides the config file)
    #[arg(long, short)]
    profile: Option<PathBuf>,

    /// Macro to open first, counting from 1
    #[arg(long = "macro", short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    macro_number: u32,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Profile file (overrides the config file)
    #[arg(long, short)]
    profile: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// One macro as printed by `cmdkeys list`
#[derive(Debug, Serialize)]
struct MacroSummary<'a> {
    number: usize,
    keybind: &'a Keybind,
    alt_keybind: &'a Keybind,
    mode: &'static str,
    strategy: &'static str,
    space_ticks: u32,
    messages: Vec<MessageSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageSummary<'a> {
    text: &'a str,
    delay_ticks: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);

    match cli.command {
        Commands::Edit(args) => {
            let config = CliConfig::load(&config_path)?;
            tracing_setup::init(&TracingConfig {
                debug: cli.debug,
                log_file: Some(config.log_path()),
            })?;
            run_edit(args, config)?
        }
        Commands::List(args) => {
            init_stderr_tracing(cli.debug)?;
            let config = CliConfig::load(&config_path)?;
            run_list(args, &config)?
        }
        Commands::Config(args) => {
            init_stderr_tracing(cli.debug)?;
            config::run_config(args, &config_path)?
        }
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn init_stderr_tracing(debug: bool) -> Result<()> {
    tracing_setup::init(&TracingConfig {
        debug,
        log_file: None,
    })
}

fn run_edit(args: EditArgs, config: CliConfig) -> Result<()> {
    let path = args.profile.clone().unwrap_or_else(|| config.profile_path());
    let store = TomlProfileStore::new(&path);
    let profile = store
        .load()
        .with_context(|| format!("Failed to load profile: {:?}", path))?;

    let macro_index = usize::try_from(args.macro_number)
        .map(|n| n - 1)
        .context("Macro number out of range")?;
    if macro_index >= profile.macros.len() {
        return Err(anyhow!(
            "Profile has {} macros, cannot open macro {}",
            profile.macros.len(),
            args.macro_number
        ));
    }

    info!(path = %path.display(), macro_index, "starting editor");
    tui::run(store, profile, macro_index, &config)
}

fn run_list(args: ListArgs, config: &CliConfig) -> Result<()> {
    let path = args.profile.clone().unwrap_or_else(|| config.profile_path());
    let profile = TomlProfileStore::new(&path)
        .load()
        .with_context(|| format!("Failed to load profile: {:?}", path))?;

    let summaries = summarize(&profile);
    if args.json {
        let json = serde_json::to_string_pretty(&summaries)
            .context("Failed to serialize macros to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Profile: {} ({})", profile.name, path.display());
    for m in &summaries {
        println!(
            "{:>3}. {:<12} {:<6} {:<6} {} message(s)",
            m.number,
            m.keybind.to_string(),
            m.mode,
            m.strategy,
            m.messages.len()
        );
        for msg in &m.messages {
            if msg.delay_ticks > 0 {
                println!("       {} (+{} ticks)", msg.text, msg.delay_ticks);
            } else {
                println!("       {}", msg.text);
            }
        }
    }
    Ok(())
}

fn summarize(profile: &Profile) -> Vec<MacroSummary<'_>> {
    profile
        .macros
        .iter()
        .enumerate()
        .map(|(i, m)| MacroSummary {
            number: i + 1,
            keybind: &m.keybind,
            alt_keybind: &m.alt_keybind,
            mode: m.mode.label(),
            strategy: m.strategy.label(),
            space_ticks: m.space_ticks,
            messages: m
                .messages
                .iter()
                .map(|msg| MessageSummary {
                    text: &msg.text,
                    delay_ticks: msg.delay_ticks,
                })
                .collect(),
        })
        .collect()
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
