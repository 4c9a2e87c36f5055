use crate::utils::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 來源未提供國家時的預設值
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// 來源未提供運動項目時的預設值
pub const DEFAULT_SPORT: &str = "Soccer";

/// 使用者選擇的搜尋範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySelector {
    #[default]
    All,
    #[serde(alias = "teams", alias = "players", alias = "teams-and-players")]
    Participants,
    Venues,
}

impl CategorySelector {
    /// 此範圍要發出的子搜尋，順序即合併順序
    pub fn subsearches(&self) -> &'static [SubsearchKind] {
        match self {
            CategorySelector::All => &[
                SubsearchKind::Teams,
                SubsearchKind::Players,
                SubsearchKind::Venues,
            ],
            CategorySelector::Participants => &[SubsearchKind::Teams, SubsearchKind::Players],
            CategorySelector::Venues => &[SubsearchKind::Venues],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategorySelector::All => "All",
            CategorySelector::Participants => "Teams & Players",
            CategorySelector::Venues => "Venues",
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategorySelector {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CategorySelector::All),
            "participants" | "teams" | "players" | "teams-and-players" => {
                Ok(CategorySelector::Participants)
            }
            "venues" => Ok(CategorySelector::Venues),
            other => Err(SearchError::InvalidConfigValue {
                field: "category".to_string(),
                value: other.to_string(),
                reason: "Valid categories: all, participants, venues".to_string(),
            }),
        }
    }
}

/// 單一遠端查詢的種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsearchKind {
    Teams,
    Players,
    Venues,
}

impl SubsearchKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            SubsearchKind::Teams => "searchteams.php",
            SubsearchKind::Players => "searchplayers.php",
            SubsearchKind::Venues => "searchvenues.php",
        }
    }

    pub fn query_param(&self) -> &'static str {
        match self {
            SubsearchKind::Teams | SubsearchKind::Venues => "t",
            SubsearchKind::Players => "p",
        }
    }
}

impl fmt::Display for SubsearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsearchKind::Teams => f.write_str("teams"),
            SubsearchKind::Players => f.write_str("players"),
            SubsearchKind::Venues => f.write_str("venues"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(rename = "idTeam", default)]
    pub id: Option<String>,
    #[serde(rename = "strTeam", default)]
    pub name: Option<String>,
    #[serde(rename = "strTeamBadge", default)]
    pub badge_url: Option<String>,
    #[serde(rename = "strBadge", default)]
    pub badge: Option<String>,
    #[serde(rename = "strCountry", default)]
    pub country: Option<String>,
    #[serde(rename = "strSport", default)]
    pub sport: Option<String>,
    #[serde(rename = "strLeague", default)]
    pub league: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "idPlayer", default)]
    pub id: Option<String>,
    #[serde(rename = "strPlayer", default)]
    pub name: Option<String>,
    #[serde(rename = "strThumb", default)]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "strNationality", default)]
    pub nationality: Option<String>,
    #[serde(rename = "strSport", default)]
    pub sport: Option<String>,
    #[serde(rename = "strTeam", default)]
    pub team: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    #[serde(rename = "idVenue", default)]
    pub id: Option<String>,
    #[serde(rename = "strVenue", default)]
    pub name: Option<String>,
    #[serde(rename = "strVenueThumb", default)]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "strThumb", default)]
    pub thumb: Option<String>,
    #[serde(rename = "strCountry", default)]
    pub country: Option<String>,
    #[serde(rename = "strLocation", default)]
    pub location: Option<String>,
}

/// 閘道解碼後、尚未正規化的原始記錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    Team(TeamRecord),
    Player(PlayerRecord),
    Venue(VenueRecord),
}

impl RawRecord {
    pub fn kind(&self) -> SubsearchKind {
        match self {
            RawRecord::Team(_) => SubsearchKind::Teams,
            RawRecord::Player(_) => SubsearchKind::Players,
            RawRecord::Venue(_) => SubsearchKind::Venues,
        }
    }
}

/// 統一的顯示記錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedSearchRecord {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub country: String,
    pub category_label: String,
    pub subtitle: Option<String>,
    pub show_category: bool,
    pub kind: SubsearchKind,
}

impl UnifiedSearchRecord {
    /// 詳細頁的欄位 (標題, 值)，省略空值與 "Unknown"
    pub fn detail_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();

        if !self.country.is_empty() && self.country != UNKNOWN_COUNTRY {
            fields.push(("Country", self.country.as_str()));
        }
        if self.show_category && !self.category_label.is_empty() {
            fields.push(("Sport", self.category_label.as_str()));
        }
        if let Some(subtitle) = self.subtitle.as_deref().filter(|s| !s.is_empty()) {
            let title = match self.kind {
                SubsearchKind::Teams => "League",
                SubsearchKind::Players => "Team",
                SubsearchKind::Venues => "Location",
            };
            fields.push((title, subtitle));
        }

        fields
    }
}

/// 依分類標籤分組，組內保留合併順序
pub fn group_by_category_label(
    records: &[UnifiedSearchRecord],
) -> BTreeMap<&str, Vec<&UnifiedSearchRecord>> {
    let mut groups: BTreeMap<&str, Vec<&UnifiedSearchRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.category_label.as_str())
            .or_default()
            .push(record);
    }
    groups
}

pub type SearchOutcome = Result<Vec<UnifiedSearchRecord>>;
