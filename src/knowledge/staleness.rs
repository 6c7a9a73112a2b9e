//! Staleness Evaluator - 노후화 경고
//!
//! 위험 등급별 허용 일수를 넘긴 엔트리 id를 반환합니다.
//! high: 14일 초과, medium: 60일 초과, low/없음: 경고 없음.

use chrono::NaiveDate;

use super::entry::Entry;

/// ISO 날짜 파싱 (실패하면 None)
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// 엔트리 작성일로부터 경과 일수
pub fn age_in_days(entry: &Entry, today: NaiveDate) -> Option<i64> {
    let date = parse_date(entry.date.as_deref()?)?;
    Some((today - date).num_days())
}

/// 단일 엔트리 노후화 여부
pub fn is_stale(entry: &Entry, today: NaiveDate) -> bool {
    let Some(max_age) = entry.staleness_risk.and_then(|r| r.max_age_days()) else {
        return false;
    };

    match age_in_days(entry, today) {
        Some(age) => age > max_age,
        None => false,
    }
}

/// 노출되는 결과 중 노후화된 엔트리 id 목록 (입력 순서 유지)
pub fn stale_ids<'a, I>(visible: I, today: NaiveDate) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entry>,
{
    visible
        .into_iter()
        .filter(|e| is_stale(e, today))
        .map(|e| e.id.clone())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
