pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpGateway;
pub use config::SearchConfig;
pub use self::core::controller::{SearchController, SearchIntent, SearchSessionState, SessionPhase};
pub use self::core::orchestrator::SearchOrchestrator;
pub use self::core::{CategorySelector, SearchOutcome, UnifiedSearchRecord};
pub use utils::error::{Result, SearchError};
