use crate::core::{
    PlayerRecord, RawRecord, SubsearchKind, TeamRecord, UnifiedSearchRecord, VenueRecord,
};
use crate::domain::model::{DEFAULT_SPORT, UNKNOWN_COUNTRY};

// 身分欄位為空字串時視同缺漏
fn identity(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn normalize_team(team: TeamRecord) -> Option<UnifiedSearchRecord> {
    let id = identity(team.id)?;
    let name = identity(team.name)?;

    Some(UnifiedSearchRecord {
        id,
        name,
        image_url: team.badge_url.or(team.badge),
        country: team.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        category_label: team.sport.unwrap_or_else(|| DEFAULT_SPORT.to_string()),
        subtitle: team.league,
        show_category: true,
        kind: SubsearchKind::Teams,
    })
}

pub fn normalize_player(player: PlayerRecord) -> Option<UnifiedSearchRecord> {
    let id = identity(player.id)?;
    let name = identity(player.name)?;

    Some(UnifiedSearchRecord {
        id,
        name,
        image_url: player.thumbnail_url,
        country: player
            .nationality
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        category_label: player.sport.unwrap_or_else(|| DEFAULT_SPORT.to_string()),
        subtitle: player.team,
        show_category: true,
        kind: SubsearchKind::Players,
    })
}

pub fn normalize_venue(venue: VenueRecord) -> Option<UnifiedSearchRecord> {
    let id = identity(venue.id)?;
    let name = identity(venue.name)?;

    Some(UnifiedSearchRecord {
        id,
        name,
        image_url: venue.thumbnail_url.or(venue.thumb),
        country: venue.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        category_label: String::new(),
        subtitle: venue.location,
        show_category: false,
        kind: SubsearchKind::Venues,
    })
}

/// 正規化單筆原始記錄；缺少 id 或名稱時回傳 None
pub fn normalize(raw: RawRecord) -> Option<UnifiedSearchRecord> {
    match raw {
        RawRecord::Team(team) => normalize_team(team),
        RawRecord::Player(player) => normalize_player(player),
        RawRecord::Venue(venue) => normalize_venue(venue),
    }
}

/// 正規化整批記錄，保留來源順序並靜默丟棄無法建構者
pub fn normalize_all(records: Vec<RawRecord>) -> Vec<UnifiedSearchRecord> {
    let total = records.len();
    let normalized: Vec<UnifiedSearchRecord> = records.into_iter().filter_map(normalize).collect();

    if normalized.len() < total {
        tracing::debug!(
            "Dropped {} of {} records without id or name",
            total - normalized.len(),
            total
        );
    }

    normalized
}
