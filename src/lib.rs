//! blockbase - 정적 지식 블록 키워드 검색
//!
//! 오프라인에서 생성된 index.json 스냅샷을 대상으로
//! 가중치 키워드 검색, gap 판정, 1-hop 추천, 노후화 경고를 제공합니다.

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod knowledge;

// Re-exports
pub use config::{Config, ContentLocation, Overrides};
pub use content::{
    BlockContent, ContentSource, FetchError, FsContentSource, HttpContentSource, validate_block_id,
};
pub use knowledge::{
    BlockRetriever, Entry, EntryFilter, EntryPool, ListResponse, Partition, QueryRequest,
    QueryResponse, StalenessRisk, get_data_dir,
};
