//! `~/.cmdkeys/config.toml` and the `cmdkeys config` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use cmdkeys_core::{Labels, LayoutConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

const TEMPLATE: &str = r#"# cmdkeys configuration

# Profile file edited by `cmdkeys edit` (default: ~/.cmdkeys/profile.toml)
# profile = "/path/to/profile.toml"

# Editor log, written while the terminal UI is open (default: ~/.cmdkeys/cmdkeys.log)
# log_file = "/path/to/cmdkeys.log"

# Row and widget sizes, in terminal cells
[layout]
# entry_width = 60
# spacing = 1

# Any editor label can be replaced
[labels]
# messages_header = "Messages"
# delete = "x"
"#;

/// Per-key overrides of the terminal cell layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_width_margin: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_small_button: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_margin: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_max_len: Option<usize>,
}

impl LayoutOverrides {
    pub fn apply(&self, base: LayoutConfig) -> LayoutConfig {
        LayoutConfig {
            item_height: self.item_height.unwrap_or(base.item_height),
            entry_width: self.entry_width.unwrap_or(base.entry_width),
            entry_height: self.entry_height.unwrap_or(base.entry_height),
            spacing: self.spacing.unwrap_or(base.spacing),
            row_width_margin: self.row_width_margin.unwrap_or(base.row_width_margin),
            min_small_button: self.min_small_button.unwrap_or(base.min_small_button),
            field_margin: self.field_margin.unwrap_or(base.field_margin),
            delay_max_len: self.delay_max_len.unwrap_or(base.delay_max_len),
        }
    }
}

/// One terminal cell per unit
pub fn cell_layout() -> LayoutConfig {
    LayoutConfig {
        item_height: 1,
        entry_width: 60,
        entry_height: 1,
        spacing: 1,
        row_width_margin: 2,
        min_small_button: 3,
        field_margin: 2,
        delay_max_len: 8,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub layout: LayoutOverrides,
    pub labels: Labels,
}

impl CliConfig {
    /// `~/.cmdkeys`, or `./.cmdkeys` without a home directory
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cmdkeys")
    }

    pub fn default_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load from `path`. A missing file is the default config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn profile_path(&self) -> PathBuf {
        self.profile
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("profile.toml"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("cmdkeys.log"))
    }

    /// Terminal cell layout with this file's overrides applied
    pub fn layout(&self) -> LayoutConfig {
        self.layout.apply(cell_layout())
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a commented config template
    Init(InitArgs),
    /// Show config file path
    Path,
    /// Print the effective configuration
    Show,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, config_path),
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Show => run_show(config_path),
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(config_path, TEMPLATE)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Run: cmdkeys edit");

    Ok(())
}

fn run_path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

fn run_show(config_path: &Path) -> Result<()> {
    let config = CliConfig::load(config_path)?;

    println!("# profile = {:?}", config.profile_path());
    println!("# log_file = {:?}", config.log_path());
    println!("# effective layout:");
    let layout = toml::to_string_pretty(&config.layout())
        .context("Failed to serialize layout to TOML")?;
    for line in layout.lines() {
        println!("#   {}", line);
    }
    println!();

    let toml_str =
        toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);

    Ok(())
}
