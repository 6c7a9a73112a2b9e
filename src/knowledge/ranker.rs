//! Ranker - 점수 정렬 및 limit 절단

use std::cmp::Ordering;

use super::entry::Entry;
use super::scorer::score;

/// 기본 결과 개수
pub const DEFAULT_LIMIT: usize = 10;

/// 점수가 매겨진 엔트리
#[derive(Debug, Clone, Copy)]
pub struct ScoredEntry<'a> {
    pub entry: &'a Entry,
    /// 쿼리가 없으면 None
    pub score: Option<f64>,
}

/// 점수 내림차순 비교 (NaN은 같다고 취급)
pub(crate) fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// 필터된 엔트리를 순위화
///
/// # Arguments
/// * `filtered` - pool order의 필터 결과
/// * `query_words` - None 또는 빈 목록이면 pool order 그대로 앞에서 `limit`개
/// * `limit` - 최대 결과 수
///
/// # Returns
/// 점수 0 제외, 점수 내림차순 (동점은 pool order) 결과
pub fn rank<'a>(
    filtered: &[&'a Entry],
    query_words: Option<&[String]>,
    limit: usize,
) -> Vec<ScoredEntry<'a>> {
    let words = match query_words {
        Some(words) if !words.is_empty() => words,
        _ => {
            return filtered
                .iter()
                .take(limit)
                .map(|&entry| ScoredEntry { entry, score: None })
                .collect();
        }
    };

    let mut scored: Vec<(&Entry, f64)> = filtered
        .iter()
        .map(|&entry| (entry, score(entry, words)))
        .filter(|(_, s)| *s > 0.0)
        .collect();

    // sort_by는 stable: 동점이면 pool order 유지
    scored.sort_by(|a, b| by_score_desc(a.1, b.1));
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(entry, s)| ScoredEntry {
            entry,
            score: Some(s),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
