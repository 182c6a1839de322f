pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::MenuConfig;

/// Diagnostic front end: runs one query and prints what a chat layer would send.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "kantine")]
#[command(about = "Today's canteen menus at ITU and KUA")]
pub struct CliConfig {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Weekday to show, 0 = Monday .. 4 = Friday (default: today)
    #[arg(long)]
    pub day: Option<usize>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Directory for the billboard crops
    #[arg(long)]
    pub output_path: Option<String>,

    /// Print every source's week as JSON instead of the day's message
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_menu_config(&self) -> Result<MenuConfig> {
        let config = match &self.config {
            Some(path) => MenuConfig::from_file(path)?,
            None => MenuConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(day) = self.day {
            validation::validate_range("day", day, 0, 4)?;
        }
        if let Some(path) = &self.output_path {
            validation::validate_non_empty_string("output_path", path)?;
        }
        Ok(())
    }
}
