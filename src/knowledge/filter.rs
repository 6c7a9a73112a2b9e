//! Filter - 점수 계산 전 구조적 필터
//!
//! - kind: 파티션 선택 (없으면 둘 다)
//! - category: 카테고리 부분 문자열 (대소문자 무시)
//! - since: 날짜 하한 (ISO 날짜라 사전순 = 시간순)
//!
//! 공개 쿼리는 항상 internal 엔트리를 제외합니다.

use super::entry::{Entry, Partition};
use super::store::EntryPool;

/// 구조적 필터 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub category: Option<String>,
    pub since: Option<String>,
    pub kind: Option<Partition>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn kind(mut self, kind: Partition) -> Self {
        self.kind = Some(kind);
        self
    }

    /// 엔트리가 조건을 만족하는지 (internal 여부는 보지 않음)
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(kind) = self.kind {
            if entry.partition != kind {
                return false;
            }
        }

        if let Some(ref category) = self.category {
            let needle = category.to_lowercase();
            if !entry
                .categories
                .iter()
                .any(|c| c.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        if let Some(ref since) = self.since {
            // 날짜 없는 엔트리는 제외하지 않음
            if let Some(ref date) = entry.date {
                if date.as_str() < since.as_str() {
                    return false;
                }
            }
        }

        true
    }

    /// 공개 엔트리에 필터 적용 (pool order 유지)
    pub fn apply<'a>(&self, pool: &'a EntryPool) -> Vec<&'a Entry> {
        pool.public_entries().filter(|e| self.matches(e)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
