pub mod toml_config;

pub use toml_config::{SearchConfig, DEFAULT_BASE_URL};

#[cfg(feature = "cli")]
use crate::core::CategorySelector;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sports-search")]
#[command(about = "Search teams, players and venues on TheSportsDB")]
pub struct CliConfig {
    /// Search terms (joined with spaces)
    pub query: Vec<String>,

    /// all, participants (teams & players) or venues
    #[arg(short, long)]
    pub category: Option<CategorySelector>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Path to TOML configuration file
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print results as JSON")]
    pub json: bool,

    #[arg(long, help = "Show detail fields for every result")]
    pub details: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }

    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_file(path)?,
            None => SearchConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(user_agent) = &self.user_agent {
            config.api.user_agent = Some(user_agent.clone());
        }
        if let Some(category) = self.category {
            config.search.default_category = Some(category);
        }
        if self.verbose {
            config.logging.verbose = Some(true);
        }

        config.validate()?;
        Ok(config)
    }
}
