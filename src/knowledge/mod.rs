//! Knowledge 모듈 - 정적 지식 블록 검색
//!
//! - Store: index.json 불변 스냅샷 (blocks + patterns)
//! - Scorer: 다중 필드 가중치 키워드 점수
//! - Filter / Ranker: 구조 필터 후 점수 정렬
//! - Gap: 임계값 기반 "매치 없음" 판정
//! - Related: 1-hop 링크 + 근접도 fallback 추천
//! - Staleness: 위험 등급별 노후화 경고

mod entry;
mod store;
mod scorer;
mod filter;
mod ranker;
mod gap;
mod related;
mod staleness;
mod retriever;

// Re-exports
pub use entry::{Entry, Partition, StalenessRisk};
pub use store::{EntryPool, IndexFile, PoolStats, get_data_dir};
pub use scorer::{score, tokenize, TOTAL_WEIGHT};
pub use filter::EntryFilter;
pub use ranker::{ScoredEntry, rank, DEFAULT_LIMIT};
pub use gap::{GapVerdict, detect, GAP_THRESHOLD};
pub use related::{
    RelatedEntry, RelationSource, graph_hop, proximity_fallback, related_entries,
    DEFAULT_RELATED_CAP,
};
pub use staleness::{age_in_days, is_stale, stale_ids};
pub use retriever::{
    BlockRetriever, ListItem, ListResponse, QueryRequest, QueryResponse, RelatedItem, ResultItem,
    list_entries, run_query, BROWSE_HINT, FETCH_HINT,
};
