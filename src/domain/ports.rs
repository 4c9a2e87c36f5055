use crate::domain::model::{CategorySelector, RawRecord, SearchOutcome, SubsearchKind};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端資料閘道：每個子搜尋一次 GET，不重試
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn fetch_category(&self, kind: SubsearchKind, query: &str) -> Result<Vec<RawRecord>>;
}

/// 搜尋能力，狀態控制器透過它發起搜尋
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, category: CategorySelector) -> SearchOutcome;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn user_agent(&self) -> Option<&str>;
    fn default_category(&self) -> CategorySelector;
}
