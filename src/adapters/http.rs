use crate::core::{
    ConfigProvider, PlayerRecord, RawRecord, SearchGateway, SubsearchKind, TeamRecord,
    VenueRecord,
};
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("sports-search/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Option<Vec<TeamRecord>>,
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    #[serde(default)]
    player: Option<Vec<PlayerRecord>>,
}

#[derive(Debug, Deserialize)]
struct VenuesResponse {
    #[serde(default)]
    venues: Option<Vec<VenueRecord>>,
}

/// 以 reqwest 實作的遠端資料閘道
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_user_agent(base_url, DEFAULT_USER_AGENT)
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::with_user_agent(
            config.base_url(),
            config.user_agent().unwrap_or(DEFAULT_USER_AGENT),
        )
    }

    pub fn with_user_agent(base_url: &str, user_agent: &str) -> Result<Self> {
        validate_url("api.base_url", base_url)?;

        // 不設定逾時，沿用 reqwest 預設值
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| SearchError::Construction {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 組出子搜尋的 URL，查詢字串以百分比編碼 (空白為 %20)
    pub fn endpoint_url(&self, kind: SubsearchKind, query: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, kind.endpoint());
        let mut url = Url::parse(&raw).map_err(|e| SearchError::Construction {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        // byte_serialize 會把字面上的 '+' 編成 %2B，剩下的 '+' 都是空白
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        url.set_query(Some(&format!("{}={}", kind.query_param(), encoded)));

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status != StatusCode::OK {
            return Err(SearchError::Server {
                status_code: status.as_u16(),
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Failed to decode {}: {}", std::any::type_name::<T>(), e);
            SearchError::from(e)
        })
    }
}

#[async_trait]
impl SearchGateway for HttpGateway {
    async fn fetch_category(&self, kind: SubsearchKind, query: &str) -> Result<Vec<RawRecord>> {
        let url = self.endpoint_url(kind, query)?;

        let records: Vec<RawRecord> = match kind {
            SubsearchKind::Teams => {
                let response: TeamsResponse = self.get_json(url).await?;
                response
                    .teams
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawRecord::Team)
                    .collect()
            }
            SubsearchKind::Players => {
                let response: PlayersResponse = self.get_json(url).await?;
                response
                    .player
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawRecord::Player)
                    .collect()
            }
            SubsearchKind::Venues => {
                let response: VenuesResponse = self.get_json(url).await?;
                response
                    .venues
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawRecord::Venue)
                    .collect()
            }
        };

        tracing::info!("Found {} {}", records.len(), kind);
        Ok(records)
    }
}
