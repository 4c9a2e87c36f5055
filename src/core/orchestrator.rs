use crate::core::normalizer::normalize_all;
use crate::core::{
    CategorySelector, SearchGateway, SearchOutcome, SearchProvider, SubsearchKind,
    UnifiedSearchRecord,
};
use crate::utils::error::{Result, SearchError};
use async_trait::async_trait;

/// 搜尋協調器：依分類並行發出子搜尋、合併並排序結果
pub struct SearchOrchestrator<G: SearchGateway> {
    gateway: G,
}

impl<G: SearchGateway> SearchOrchestrator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn subsearch(&self, kind: SubsearchKind, query: &str) -> Result<Vec<UnifiedSearchRecord>> {
        let raw = self.gateway.fetch_category(kind, query).await?;
        Ok(normalize_all(raw))
    }

    // 失敗的子搜尋貢獻空集合，不影響其他子搜尋
    async fn best_effort(&self, kind: SubsearchKind, query: &str) -> Vec<UnifiedSearchRecord> {
        match self.subsearch(kind, query).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("🔶 Subsearch '{}' failed, skipping: {}", kind, e);
                Vec::new()
            }
        }
    }

    pub async fn search(&self, query: &str, category: CategorySelector) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        tracing::info!("🔍 Searching for '{}' in category: {}", query, category);

        let merged: Vec<UnifiedSearchRecord> = match category {
            CategorySelector::All => {
                let (teams, players, venues) = tokio::join!(
                    self.best_effort(SubsearchKind::Teams, query),
                    self.best_effort(SubsearchKind::Players, query),
                    self.best_effort(SubsearchKind::Venues, query),
                );
                teams.into_iter().chain(players).chain(venues).collect()
            }
            CategorySelector::Participants => {
                let (teams, players) = tokio::join!(
                    self.best_effort(SubsearchKind::Teams, query),
                    self.best_effort(SubsearchKind::Players, query),
                );
                teams.into_iter().chain(players).collect()
            }
            // 單一子搜尋沒有可退回的對象，錯誤原樣往上傳
            CategorySelector::Venues => self.subsearch(SubsearchKind::Venues, query).await?,
        };

        if merged.is_empty() {
            tracing::info!("No results for '{}' in category: {}", query, category);
            return Err(SearchError::NoResults);
        }

        tracing::info!("📊 Merged {} results for '{}'", merged.len(), query);
        Ok(merged)
    }
}

#[async_trait]
impl<G: SearchGateway> SearchProvider for SearchOrchestrator<G> {
    async fn search(&self, query: &str, category: CategorySelector) -> SearchOutcome {
        SearchOrchestrator::search(self, query, category).await
    }
}
