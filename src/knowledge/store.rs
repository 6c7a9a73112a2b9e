//! Entry Pool - index.json 스냅샷 저장소
//!
//! 오프라인에서 생성된 index.json을 한 번 읽어 불변 스냅샷으로 보관합니다.
//! 모든 쿼리는 이 스냅샷을 읽기만 하며, 교체는 새 스냅샷 로드로만 이뤄집니다.
//! 기본 위치: ~/.blockbase/index.json

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::entry::{Entry, Partition};

// ============================================================================
// Data Directory
// ============================================================================

/// 데이터 디렉토리 경로 (~/.blockbase/)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blockbase")
}

// ============================================================================
// Types
// ============================================================================

/// index.json 파일 형식
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexFile {
    /// 생성 시각 (예: "2026-10-01")
    #[serde(default)]
    pub generated: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Entry>,
    #[serde(default)]
    pub patterns: Vec<Entry>,
}

/// 스냅샷 통계
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub block_count: usize,
    pub pattern_count: usize,
    pub internal_count: usize,
    pub generated_at: String,
}

// ============================================================================
// EntryPool
// ============================================================================

/// 불변 엔트리 스냅샷
///
/// blocks 파티션 다음 patterns 파티션 순서로 보관합니다 (pool order).
/// 쿼리 중에는 절대 변경되지 않으므로 `Arc`로 공유하면 잠금이 필요 없습니다.
#[derive(Debug, Clone, Default)]
pub struct EntryPool {
    entries: Vec<Entry>,
    by_id: HashMap<String, usize>,
    generated_at: String,
}

impl EntryPool {
    /// 엔트리 목록으로 스냅샷 생성
    ///
    /// id가 중복되면 실패합니다.
    pub fn new(generated_at: impl Into<String>, entries: Vec<Entry>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id.clone(), i).is_some() {
                bail!("Duplicate entry id in snapshot: {}", entry.id);
            }
        }

        Ok(Self {
            entries,
            by_id,
            generated_at: generated_at.into(),
        })
    }

    /// index.json 구조에서 생성
    pub fn from_index(index: IndexFile) -> Result<Self> {
        let IndexFile {
            generated,
            blocks,
            patterns,
            ..
        } = index;

        let entries = blocks
            .into_iter()
            .map(|e| e.with_partition(Partition::Blocks))
            .chain(
                patterns
                    .into_iter()
                    .map(|e| e.with_partition(Partition::Patterns)),
            )
            .collect();

        Self::new(generated, entries)
    }

    /// JSON 문자열에서 생성
    pub fn from_json(json: &str) -> Result<Self> {
        let index: IndexFile =
            serde_json::from_str(json).context("Failed to parse index JSON")?;
        Self::from_index(index)
    }

    /// 파일에서 스냅샷 로드
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?;

        let pool = Self::from_json(&raw)
            .with_context(|| format!("Failed to load index: {}", path.display()))?;

        tracing::info!(
            "Loaded snapshot {:?} ({} entries, generated {})",
            path,
            pool.len(),
            pool.generated_at
        );

        Ok(pool)
    }

    /// 스냅샷 생성 시각
    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// 전체 엔트리 (internal 포함, pool order)
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// 공개 엔트리 (internal 제외)
    pub fn public_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.internal)
    }

    /// id로 조회 (internal 포함)
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// 공개 엔트리 중 id로 조회
    pub fn get_public(&self, id: &str) -> Option<&Entry> {
        self.get(id).filter(|e| !e.internal)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 스냅샷 통계
    pub fn stats(&self) -> PoolStats {
        let count = |p: Partition| self.entries.iter().filter(|e| e.partition == p).count();

        PoolStats {
            block_count: count(Partition::Blocks),
            pattern_count: count(Partition::Patterns),
            internal_count: self.entries.iter().filter(|e| e.internal).count(),
            generated_at: self.generated_at.clone(),
        }
    }

    /// 풀에 없는 connection id 목록 (진단용)
    pub fn dangling_connections(&self) -> Vec<(&str, &str)> {
        let known: HashSet<&str> = self.by_id.keys().map(String::as_str).collect();
        let known = &known;

        self.entries
            .iter()
            .flat_map(move |e| {
                e.connections
                    .iter()
                    .filter(move |c| !known.contains(c.as_str()))
                    .map(move |c| (e.id.as_str(), c.as_str()))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INDEX_JSON: &str = r#"{
        "generated": "2026-10-01",
        "version": "2",
        "blocks": [
            {"file": "a.md", "topic": "Alpha", "connections": ["missing.md"]},
            {"file": "b.md", "topic": "Beta", "internal": true}
        ],
        "patterns": [
            {"file": "p.md", "topic": "Pattern"}
        ]
    }"#;

    #[test]
    fn test_from_json_assigns_partitions() {
        let pool = EntryPool::from_json(INDEX_JSON).unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.generated_at(), "2026-10-01");
        assert_eq!(pool.get("a.md").unwrap().partition, Partition::Blocks);
        assert_eq!(pool.get("p.md").unwrap().partition, Partition::Patterns);

        // pool order: blocks 다음 patterns
        let ids: Vec<&str> = pool.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a.md", "b.md", "p.md"]);
    }

    #[test]
    fn test_public_entries_exclude_internal() {
        let pool = EntryPool::from_json(INDEX_JSON).unwrap();

        let ids: Vec<&str> = pool.public_entries().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a.md", "p.md"]);

        // internal도 id 조회는 가능
        assert!(pool.get("b.md").is_some());
        assert!(pool.get_public("b.md").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let entries = vec![Entry::new("a.md", "One"), Entry::new("a.md", "Two")];
        let err = EntryPool::new("2026-10-01", entries).unwrap_err();
        assert!(err.to_string().contains("a.md"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, INDEX_JSON).unwrap();

        let pool = EntryPool::load(&path).unwrap();
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(EntryPool::load(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_stats() {
        let pool = EntryPool::from_json(INDEX_JSON).unwrap();
        let stats = pool.stats();

        assert_eq!(stats.block_count, 2);
        assert_eq!(stats.pattern_count, 1);
        assert_eq!(stats.internal_count, 1);
    }

    #[test]
    fn test_dangling_connections() {
        let pool = EntryPool::from_json(INDEX_JSON).unwrap();
        assert_eq!(pool.dangling_connections(), vec![("a.md", "missing.md")]);
    }
}
