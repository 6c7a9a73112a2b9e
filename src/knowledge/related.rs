//! Relation Expander - "함께 알아둘 것" 추천
//!
//! 두 단계로 나뉜 순수 함수입니다.
//! 1. graph hop: 상위 결과의 connections를 1-hop 따라가기
//! 2. proximity fallback: 링크가 부족하면 남은 풀에서 키워드 유사도로 채우기
//!
//! 대부분의 엔트리는 링크가 거의 없으므로 fallback이 실질적인 추천을 보장합니다.
//! 대상 풀은 공개 엔트리 전체입니다 (쿼리 필터 미적용).

use std::collections::{HashMap, HashSet};

use super::entry::Entry;
use super::ranker::by_score_desc;
use super::scorer::score;
use super::store::EntryPool;

/// 기본 추천 개수
pub const DEFAULT_RELATED_CAP: usize = 3;

/// 추천 엔트리와 쿼리 점수
#[derive(Debug, Clone, Copy)]
pub struct RelatedEntry<'a> {
    pub entry: &'a Entry,
    pub score: f64,
    pub via: RelationSource,
}

/// 추천 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationSource {
    /// 선언된 connection
    Connection,
    /// 키워드 근접도
    Proximity,
}

/// 1단계: connections 1-hop 탐색
///
/// 상위 결과가 참조하는 id 중 상위 결과가 아니고 풀에 존재하는 것이 후보가 됩니다.
/// 링크는 단방향이며, 상위 결과를 가리키는 엔트리는 따라가지 않습니다.
/// 여러 결과가 같은 후보를 참조하면 최대 점수를 사용하고,
/// 동점은 처음 발견된 순서를 유지합니다.
pub fn graph_hop<'a>(
    primaries: &[&Entry],
    pool: &'a EntryPool,
    query_words: &[String],
    cap: usize,
) -> Vec<RelatedEntry<'a>> {
    if cap == 0 {
        return Vec::new();
    }

    let primary_ids: HashSet<&str> = primaries.iter().map(|e| e.id.as_str()).collect();

    // 후보 id -> candidates 인덱스
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut candidates: Vec<RelatedEntry<'a>> = Vec::new();

    let mut consider = |entry: &'a Entry| {
        let s = score(entry, query_words);

        match slots.get(entry.id.as_str()) {
            Some(&i) => {
                if s > candidates[i].score {
                    candidates[i].score = s;
                }
            }
            None => {
                slots.insert(entry.id.as_str(), candidates.len());
                candidates.push(RelatedEntry {
                    entry,
                    score: s,
                    via: RelationSource::Connection,
                });
            }
        }
    };

    for primary in primaries {
        for conn in &primary.connections {
            if primary_ids.contains(conn.as_str()) {
                continue;
            }

            // 풀에 없는 id(dangling)는 조용히 무시
            if let Some(entry) = pool.get_public(conn) {
                consider(entry);
            }
        }
    }

    candidates.sort_by(|a, b| by_score_desc(a.score, b.score));
    candidates.truncate(cap);
    candidates
}

/// 2단계: 키워드 근접도 fallback
///
/// `exclude`에 없는 공개 엔트리 중 점수가 0보다 큰 것을
/// 점수 내림차순(동점은 pool order)으로 최대 `slots`개 반환합니다.
pub fn proximity_fallback<'a>(
    pool: &'a EntryPool,
    exclude: &HashSet<&str>,
    query_words: &[String],
    slots: usize,
) -> Vec<RelatedEntry<'a>> {
    if slots == 0 || query_words.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<RelatedEntry<'a>> = pool
        .public_entries()
        .filter(|e| !exclude.contains(e.id.as_str()))
        .map(|entry| RelatedEntry {
            entry,
            score: score(entry, query_words),
            via: RelationSource::Proximity,
        })
        .filter(|r| r.score > 0.0)
        .collect();

    found.sort_by(|a, b| by_score_desc(a.score, b.score));
    found.truncate(slots);
    found
}

/// 두 단계를 조합한 추천 목록
///
/// graph hop 결과가 먼저 오고, `cap`에 못 미치면 fallback으로 채웁니다.
/// 상위 결과에 포함된 id는 절대 반환하지 않습니다.
pub fn related_entries<'a>(
    primaries: &[&Entry],
    pool: &'a EntryPool,
    query_words: &[String],
    cap: usize,
) -> Vec<RelatedEntry<'a>> {
    let mut related = graph_hop(primaries, pool, query_words, cap);

    if related.len() < cap {
        let mut exclude: HashSet<&str> = primaries.iter().map(|e| e.id.as_str()).collect();
        exclude.extend(related.iter().map(|r| r.entry.id.as_str()));

        let fill = proximity_fallback(pool, &exclude, query_words, cap - related.len());
        related.extend(fill);
    }

    tracing::debug!(
        "Related entries: {} (cap={}, primaries={})",
        related.len(),
        cap,
        primaries.len()
    );

    related
}

// ============================================================================
// Tests
// ============================================================================
