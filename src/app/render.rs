use crate::core::controller::{SearchSessionState, SessionPhase};
use crate::core::UnifiedSearchRecord;
use crate::domain::model::group_by_category_label;
use std::fmt::Write;

// 場館沒有運動項目，分組標題改用這個
const VENUE_GROUP_HEADING: &str = "Venues";

/// 單筆結果的列表列
pub fn render_row(record: &UnifiedSearchRecord) -> String {
    let mut row = format!("{} [{}]", record.name, record.country);
    if let Some(subtitle) = record.subtitle.as_deref().filter(|s| !s.is_empty()) {
        row.push_str(" · ");
        row.push_str(subtitle);
    }
    row
}

/// 詳細頁：名稱、圖片與有意義的欄位
pub fn render_detail(record: &UnifiedSearchRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.name);
    if let Some(image) = &record.image_url {
        let _ = writeln!(out, "  Image: {}", image);
    }
    for (title, value) in record.detail_fields() {
        let _ = writeln!(out, "  {}: {}", title, value);
    }
    out
}

/// 將工作階段快照轉成終端機文字
pub fn render_session(state: &SearchSessionState) -> String {
    let mut out = String::new();

    if state.is_loading {
        out.push_str("Searching...\n");
        return out;
    }

    if let Some(message) = state.error_message() {
        let _ = writeln!(out, "❌ {}", message);
        return out;
    }

    if state.results.is_empty() {
        if state.phase != SessionPhase::Idle || state.has_searched {
            out.push_str("No results found\n");
        }
        return out;
    }

    let _ = writeln!(
        out,
        "🔍 {} result(s) for '{}' in {}",
        state.results.len(),
        state.query.trim(),
        state.category
    );

    for (label, records) in group_by_category_label(&state.results) {
        let heading = if label.is_empty() {
            VENUE_GROUP_HEADING
        } else {
            label
        };
        let _ = writeln!(out, "\n== {} ==", heading);
        for record in records {
            let _ = writeln!(out, "  {}", render_row(record));
        }
    }

    out
}
