use crate::core::{CategorySelector, SearchOutcome, SearchProvider, UnifiedSearchRecord};
use crate::utils::error::SearchError;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// 搜尋工作階段所處的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Editing,
    Searching,
    Succeeded,
    Failed,
}

/// 展示層送進來的使用者意圖
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchIntent {
    QueryChanged(String),
    SearchSubmitted,
    CategorySelected(CategorySelector),
    ErrorDismissed,
}

/// 單一寫入者的工作階段狀態快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSessionState {
    pub query: String,
    pub category: CategorySelector,
    pub is_loading: bool,
    pub results: Vec<UnifiedSearchRecord>,
    pub error: Option<SearchError>,
    pub has_searched: bool,
    pub phase: SessionPhase,
}

impl SearchSessionState {
    pub fn new(category: CategorySelector) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(SearchError::user_friendly_message)
    }

    fn reset_search_state(&mut self) {
        self.results.clear();
        self.error = None;
        self.has_searched = false;
    }
}

/// 已完成的搜尋，附帶發出時的請求編號
#[derive(Debug)]
pub struct SearchResolution {
    pub request_id: u64,
    pub outcome: SearchOutcome,
}

/// 應用程式狀態控制器
///
/// 每次搜尋都在 tokio 上背景執行並帶有遞增的請求編號；完成結果經由 channel
/// 回到控制器，只有編號等於最新請求者才會寫入狀態。
pub struct SearchController<P: SearchProvider + 'static> {
    provider: Arc<P>,
    state: SearchSessionState,
    latest_request: u64,
    resolutions_tx: mpsc::UnboundedSender<SearchResolution>,
    resolutions_rx: mpsc::UnboundedReceiver<SearchResolution>,
    snapshots: watch::Sender<SearchSessionState>,
}

impl<P: SearchProvider + 'static> SearchController<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_category(provider, CategorySelector::default())
    }

    pub fn with_category(provider: Arc<P>, category: CategorySelector) -> Self {
        let state = SearchSessionState::new(category);
        let (resolutions_tx, resolutions_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(state.clone());

        Self {
            provider,
            state,
            latest_request: 0,
            resolutions_tx,
            resolutions_rx,
            snapshots,
        }
    }

    pub fn state(&self) -> &SearchSessionState {
        &self.state
    }

    /// 訂閱狀態快照，每次狀態變更都會推送
    pub fn subscribe(&self) -> watch::Receiver<SearchSessionState> {
        self.snapshots.subscribe()
    }

    pub fn latest_request_id(&self) -> u64 {
        self.latest_request
    }

    pub fn handle(&mut self, intent: SearchIntent) {
        tracing::debug!("Handling intent: {:?}", intent);

        match intent {
            SearchIntent::QueryChanged(text) => {
                self.state.query = text;
                if !self.state.is_loading {
                    self.state.phase = SessionPhase::Editing;
                }
            }
            SearchIntent::SearchSubmitted => self.submit(),
            SearchIntent::CategorySelected(category) => {
                if category == self.state.category {
                    return;
                }
                self.state.category = category;
                self.state.reset_search_state();

                if self.state.query.trim().is_empty() {
                    self.supersede_in_flight();
                    self.state.phase = SessionPhase::Idle;
                } else {
                    // 有查詢字串時自動以新分類重新搜尋
                    self.submit();
                    return;
                }
            }
            SearchIntent::ErrorDismissed => {
                self.state.error = None;
                if !self.state.is_loading {
                    self.state.phase = if self.state.results.is_empty() {
                        SessionPhase::Idle
                    } else {
                        SessionPhase::Succeeded
                    };
                }
            }
        }

        self.publish();
    }

    fn submit(&mut self) {
        if self.state.query.trim().is_empty() {
            self.supersede_in_flight();
            self.state.error = Some(SearchError::EmptyQuery);
            self.state.phase = SessionPhase::Failed;
            self.publish();
            return;
        }

        self.latest_request += 1;
        let request_id = self.latest_request;

        self.state.is_loading = true;
        self.state.error = None;
        self.state.results.clear();
        self.state.has_searched = true;
        self.state.phase = SessionPhase::Searching;
        self.publish();

        let provider = Arc::clone(&self.provider);
        let query = self.state.query.clone();
        let category = self.state.category;
        let tx = self.resolutions_tx.clone();

        tracing::debug!("Dispatching search #{} for '{}' ({})", request_id, query, category);

        tokio::spawn(async move {
            let outcome = provider.search(&query, category).await;
            // 接收端已關閉代表控制器已被釋放，結果無處可送
            let _ = tx.send(SearchResolution {
                request_id,
                outcome,
            });
        });
    }

    // 讓尚在進行中的搜尋失效
    fn supersede_in_flight(&mut self) {
        if self.state.is_loading {
            self.latest_request += 1;
            self.state.is_loading = false;
        }
    }

    /// 套用一筆搜尋結果；過期結果會被忽略並回傳 false
    pub fn apply_resolution(&mut self, resolution: SearchResolution) -> bool {
        if resolution.request_id != self.latest_request || !self.state.is_loading {
            tracing::debug!(
                "Ignoring stale response #{} (latest is #{})",
                resolution.request_id,
                self.latest_request
            );
            return false;
        }

        self.state.is_loading = false;
        match resolution.outcome {
            Ok(records) if !records.is_empty() => {
                self.state.results = records;
                self.state.phase = SessionPhase::Succeeded;
            }
            Ok(_) => {
                self.state.error = Some(SearchError::NoResults);
                self.state.phase = SessionPhase::Failed;
            }
            Err(e) => {
                tracing::debug!("Search #{} failed: {}", resolution.request_id, e);
                self.state.error = Some(e);
                self.state.phase = SessionPhase::Failed;
            }
        }

        self.publish();
        true
    }

    /// 等待下一筆搜尋結果並套用；回傳是否改變了狀態
    pub async fn next_resolution(&mut self) -> bool {
        match self.resolutions_rx.recv().await {
            Some(resolution) => self.apply_resolution(resolution),
            None => false,
        }
    }

    /// 持續處理結果直到沒有進行中的搜尋
    pub async fn settle(&mut self) -> &SearchSessionState {
        while self.state.is_loading {
            match self.resolutions_rx.recv().await {
                Some(resolution) => {
                    self.apply_resolution(resolution);
                }
                None => break,
            }
        }
        &self.state
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SubsearchKind;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn record(id: &str) -> UnifiedSearchRecord {
        UnifiedSearchRecord {
            id: id.to_string(),
            name: format!("Record {}", id),
            image_url: None,
            country: "Unknown".to_string(),
            category_label: "Soccer".to_string(),
            subtitle: None,
            show_category: true,
            kind: SubsearchKind::Teams,
        }
    }

    /// 依查詢字串回傳結果的搜尋替身，可用 oneshot 延後完成
    #[derive(Default)]
    struct ScriptedProvider {
        outcomes: Mutex<HashMap<String, SearchOutcome>>,
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
        calls: Mutex<Vec<(String, CategorySelector)>>,
        call_count: AtomicUsize,
    }

    impl ScriptedProvider {
        fn respond(self, query: &str, outcome: SearchOutcome) -> Self {
            self.outcomes
                .lock()
                .unwrap()
                .insert(query.to_string(), outcome);
            self
        }

        fn gate(&self, query: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(query.to_string(), rx);
            tx
        }

        fn calls(&self) -> Vec<(String, CategorySelector)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        async fn search(&self, query: &str, category: CategorySelector) -> SearchOutcome {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), category));

            let gate = self.gates.lock().unwrap().remove(query);
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            self.outcomes
                .lock()
                .unwrap()
                .get(query)
                .cloned()
                .unwrap_or(Err(SearchError::NoResults))
        }
    }

    fn controller(provider: ScriptedProvider) -> (SearchController<ScriptedProvider>, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        (SearchController::new(Arc::clone(&provider)), provider)
    }

    #[test]
    fn test_initial_state_is_idle_with_all_category() {
        let state = SearchSessionState::default();
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.category, CategorySelector::All);
        assert!(!state.is_loading);
        assert!(!state.has_searched);
        assert!(state.results.is_empty());
    }

    #[tokio::test]
    async fn test_query_change_only_edits() {
        let (mut controller, provider) = controller(ScriptedProvider::default());

        controller.handle(SearchIntent::QueryChanged("Arsenal".to_string()));

        assert_eq!(controller.state().query, "Arsenal");
        assert_eq!(controller.state().phase, SessionPhase::Editing);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_searches_and_succeeds() {
        let (mut controller, provider) = controller(
            ScriptedProvider::default().respond("Arsenal", Ok(vec![record("133604")])),
        );

        controller.handle(SearchIntent::QueryChanged("Arsenal".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);

        assert!(controller.state().is_loading);
        assert!(controller.state().has_searched);
        assert_eq!(controller.state().phase, SessionPhase::Searching);

        let state = controller.settle().await;
        assert!(!state.is_loading);
        assert_eq!(state.phase, SessionPhase::Succeeded);
        assert_eq!(state.results, vec![record("133604")]);
        assert_eq!(state.error, None);
        assert_eq!(provider.calls(), vec![("Arsenal".to_string(), CategorySelector::All)]);
    }

    #[tokio::test]
    async fn test_empty_query_fails_without_contacting_provider() {
        let (mut controller, provider) = controller(ScriptedProvider::default());

        controller.handle(SearchIntent::QueryChanged("   ".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);

        assert_eq!(controller.state().phase, SessionPhase::Failed);
        assert_eq!(controller.state().error, Some(SearchError::EmptyQuery));
        assert!(!controller.state().is_loading);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_dismissible() {
        let (mut controller, _provider) = controller(
            ScriptedProvider::default().respond("x", Err(SearchError::Server { status_code: 500 })),
        );

        controller.handle(SearchIntent::QueryChanged("x".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        controller.settle().await;

        assert_eq!(controller.state().phase, SessionPhase::Failed);
        assert_eq!(
            controller.state().error_message().as_deref(),
            Some("Server error occurred (Status: 500). Please try again later.")
        );

        controller.handle(SearchIntent::ErrorDismissed);

        assert_eq!(controller.state().error, None);
        assert_eq!(controller.state().phase, SessionPhase::Idle);
        assert_eq!(controller.state().query, "x");
        assert_eq!(controller.state().category, CategorySelector::All);
    }

    #[tokio::test]
    async fn test_empty_success_is_treated_as_no_results() {
        let (mut controller, _provider) =
            controller(ScriptedProvider::default().respond("x", Ok(Vec::new())));

        controller.handle(SearchIntent::QueryChanged("x".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        controller.settle().await;

        assert_eq!(controller.state().error, Some(SearchError::NoResults));
    }

    #[tokio::test]
    async fn test_category_switch_with_query_researches() {
        let (mut controller, provider) = controller(
            ScriptedProvider::default().respond("Messi", Ok(vec![record("34146370")])),
        );

        controller.handle(SearchIntent::QueryChanged("Messi".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        controller.settle().await;

        controller.handle(SearchIntent::CategorySelected(CategorySelector::Participants));
        assert_eq!(controller.state().phase, SessionPhase::Searching);
        controller.settle().await;

        assert_eq!(
            provider.calls(),
            vec![
                ("Messi".to_string(), CategorySelector::All),
                ("Messi".to_string(), CategorySelector::Participants),
            ]
        );
        assert_eq!(controller.state().phase, SessionPhase::Succeeded);
        assert_eq!(controller.state().category, CategorySelector::Participants);
    }

    #[tokio::test]
    async fn test_category_switch_without_query_resets_to_idle() {
        let (mut controller, provider) = controller(ScriptedProvider::default());

        controller.handle(SearchIntent::CategorySelected(CategorySelector::Venues));

        assert_eq!(controller.state().category, CategorySelector::Venues);
        assert_eq!(controller.state().phase, SessionPhase::Idle);
        assert!(!controller.state().has_searched);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_selecting_same_category_is_noop() {
        let (mut controller, provider) = controller(ScriptedProvider::default());

        controller.handle(SearchIntent::QueryChanged("Messi".to_string()));
        controller.handle(SearchIntent::CategorySelected(CategorySelector::All));

        assert_eq!(controller.state().phase, SessionPhase::Editing);
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_response_is_ignored() {
        let provider = ScriptedProvider::default()
            .respond("A", Ok(vec![record("a")]))
            .respond("B", Ok(vec![record("b")]));
        let release_a = provider.gate("A");
        let (mut controller, _provider) = controller(provider);

        controller.handle(SearchIntent::QueryChanged("A".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        controller.handle(SearchIntent::QueryChanged("B".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);

        // B 先完成
        assert!(controller.next_resolution().await);
        assert_eq!(controller.state().results, vec![record("b")]);

        // A 晚到，必須被忽略
        release_a.send(()).unwrap();
        assert!(!controller.next_resolution().await);
        assert_eq!(controller.state().results, vec![record("b")]);
        assert_eq!(controller.state().phase, SessionPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_apply_resolution_rejects_older_request_ids() {
        let (mut controller, _provider) = controller(ScriptedProvider::default());

        controller.handle(SearchIntent::QueryChanged("A".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        controller.handle(SearchIntent::SearchSubmitted);
        let latest = controller.latest_request_id();

        let applied = controller.apply_resolution(SearchResolution {
            request_id: latest - 1,
            outcome: Ok(vec![record("old")]),
        });
        assert!(!applied);
        assert!(controller.state().is_loading);

        let applied = controller.apply_resolution(SearchResolution {
            request_id: latest,
            outcome: Ok(vec![record("new")]),
        });
        assert!(applied);
        assert_eq!(controller.state().results, vec![record("new")]);
    }

    #[tokio::test]
    async fn test_empty_submit_supersedes_in_flight_search() {
        let provider = ScriptedProvider::default().respond("A", Ok(vec![record("a")]));
        let release_a = provider.gate("A");
        let (mut controller, _provider) = controller(provider);

        controller.handle(SearchIntent::QueryChanged("A".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        controller.handle(SearchIntent::QueryChanged(String::new()));
        controller.handle(SearchIntent::SearchSubmitted);

        release_a.send(()).unwrap();
        assert!(!controller.next_resolution().await);
        assert_eq!(controller.state().error, Some(SearchError::EmptyQuery));
        assert!(controller.state().results.is_empty());
    }

    #[tokio::test]
    async fn test_snapshots_are_published() {
        let (mut controller, _provider) =
            controller(ScriptedProvider::default().respond("x", Ok(vec![record("1")])));
        let mut snapshots = controller.subscribe();

        controller.handle(SearchIntent::QueryChanged("x".to_string()));
        controller.handle(SearchIntent::SearchSubmitted);
        assert!(snapshots.borrow_and_update().is_loading);

        controller.settle().await;
        let latest = snapshots.borrow_and_update().clone();
        assert_eq!(latest.phase, SessionPhase::Succeeded);
        assert_eq!(latest.results.len(), 1);
    }
}
