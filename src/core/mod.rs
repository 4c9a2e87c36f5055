pub mod controller;
pub mod normalizer;
pub mod orchestrator;

pub use crate::domain::model::{
    CategorySelector, PlayerRecord, RawRecord, SearchOutcome, SubsearchKind, TeamRecord,
    UnifiedSearchRecord, VenueRecord,
};
pub use crate::domain::ports::{ConfigProvider, SearchGateway, SearchProvider};
pub use crate::utils::error::Result;
