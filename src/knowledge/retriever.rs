//! 블록 검색기 - 필터 + 점수 + gap + 추천 + 노후화 통합
//!
//! 쿼리 흐름:
//! filter -> score -> rank -> gap detect -> (gap 아님) related + staleness -> 응답
//!
//! 파이프라인 자체는 스냅샷에 대한 순수 읽기이며 I/O가 없습니다.
//! 원문 조회(`get_block`)만 콘텐츠 저장소에 접근합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Config, ContentLocation};
use crate::content::{
    validate_block_id, BlockContent, ContentSource, FetchError, FsContentSource,
    HttpContentSource,
};

use super::entry::{Entry, Partition, StalenessRisk};
use super::filter::EntryFilter;
use super::gap::{detect, GAP_THRESHOLD};
use super::ranker::{rank, DEFAULT_LIMIT};
use super::related::{related_entries, DEFAULT_RELATED_CAP};
use super::scorer::tokenize;
use super::staleness::stale_ids;
use super::store::EntryPool;

/// 원문 조회 안내
pub const FETCH_HINT: &str =
    "Use get_block with an entry id (e.g. \"example-block.md\") to read the full content.";

/// 탐색 안내 (gap 응답과 목록 응답 공용)
pub const BROWSE_HINT: &str = "Use list_blocks to browse the available topics, \
     then get_block with an id (e.g. \"example-block.md\") to read one.";

// ============================================================================
// Types
// ============================================================================

/// 쿼리 입력
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryRequest {
    /// 자유 텍스트 (없으면 관련도 정렬 없음)
    pub topic: Option<String>,
    pub category: Option<String>,
    /// ISO 날짜 하한
    pub since: Option<String>,
    pub kind: Option<Partition>,
    /// 기본 10
    pub limit: Option<usize>,
}

impl QueryRequest {
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Default::default()
        }
    }

    fn filter(&self) -> EntryFilter {
        EntryFilter {
            category: self.category.clone(),
            since: self.since.clone(),
            kind: self.kind,
        }
    }
}

/// 쿼리 결과 항목
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub id: String,
    pub topic: String,
    pub summary: String,
    pub theory_delta: Option<String>,
    pub confidence: Option<String>,
    pub staleness_risk: Option<StalenessRisk>,
    pub environment_scope: Option<String>,
    /// 렌더링용 (응답 JSON에는 없음)
    #[serde(skip)]
    pub score: Option<f64>,
}

impl ResultItem {
    fn from_entry(entry: &Entry, score: Option<f64>) -> Self {
        Self {
            id: entry.id.clone(),
            topic: entry.topic.clone(),
            summary: entry.summary.clone(),
            theory_delta: entry.theory_delta.clone(),
            confidence: entry.confidence.clone(),
            staleness_risk: entry.staleness_risk,
            environment_scope: entry.environment_scope.clone(),
            score,
        }
    }
}

/// 추천 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    pub id: String,
    pub topic: String,
    pub summary: String,
}

/// 쿼리 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub results: Vec<ResultItem>,
    pub related_entries: Vec<RelatedItem>,
    pub gap_detected: bool,
    pub near_miss: bool,
    /// 소수점 둘째 자리, 쿼리가 없으면 null
    pub top_score: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub staleness_warning: Vec<String>,
    pub count: usize,
    pub snapshot_generated_at: String,
    pub hint: String,
}

/// 목록 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub id: String,
    pub topic: String,
    pub confidence: Option<String>,
    pub date: Option<String>,
}

/// 목록 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub blocks: Vec<ListItem>,
    pub patterns: Vec<ListItem>,
    pub total: usize,
    pub snapshot_generated_at: String,
    pub hint: String,
}

// ============================================================================
// Pipeline
// ============================================================================

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 쿼리 실행
///
/// # Arguments
/// * `pool` - 불변 스냅샷
/// * `request` - 쿼리 입력
/// * `today` - 노후화 기준일
pub fn run_query(pool: &EntryPool, request: &QueryRequest, today: NaiveDate) -> QueryResponse {
    // 공백뿐인 topic은 쿼리 없음으로 취급
    let words = request
        .topic
        .as_deref()
        .map(tokenize)
        .filter(|w| !w.is_empty());

    let filtered = request.filter().apply(pool);
    let limit = request.limit.unwrap_or(DEFAULT_LIMIT);
    let ranked = rank(&filtered, words.as_deref(), limit);

    let top_score = words
        .as_ref()
        .map(|_| ranked.first().and_then(|r| r.score).unwrap_or(0.0));
    let verdict = detect(ranked.len(), top_score);

    tracing::info!(
        "Query {:?}: {} filtered, {} ranked, top={:?}, gap={}, near_miss={}",
        request.topic,
        filtered.len(),
        ranked.len(),
        top_score,
        verdict.gap,
        verdict.near_miss
    );

    let snapshot_generated_at = pool.generated_at().to_string();
    let top_score_rounded = top_score.map(round2);

    if verdict.gap {
        let hint = if verdict.near_miss {
            format!(
                "No confident match: top score {:.2} is below the {:.2} threshold. \
                 Try broader keywords or use list_blocks to browse.",
                top_score.unwrap_or_default(),
                GAP_THRESHOLD
            )
        } else {
            BROWSE_HINT.to_string()
        };

        return QueryResponse {
            results: Vec::new(),
            related_entries: Vec::new(),
            gap_detected: true,
            near_miss: verdict.near_miss,
            top_score: top_score_rounded,
            staleness_warning: Vec::new(),
            count: 0,
            snapshot_generated_at,
            hint,
        };
    }

    let primaries: Vec<&Entry> = ranked.iter().map(|r| r.entry).collect();
    let query_words = words.as_deref().unwrap_or_default();

    let related = related_entries(&primaries, pool, query_words, DEFAULT_RELATED_CAP);
    let staleness_warning = stale_ids(primaries.iter().copied(), today);

    let results: Vec<ResultItem> = ranked
        .iter()
        .map(|r| ResultItem::from_entry(r.entry, r.score))
        .collect();

    QueryResponse {
        count: results.len(),
        results,
        related_entries: related
            .into_iter()
            .map(|r| RelatedItem {
                id: r.entry.id.clone(),
                topic: r.entry.topic.clone(),
                summary: r.entry.summary.clone(),
            })
            .collect(),
        gap_detected: false,
        near_miss: false,
        top_score: top_score_rounded,
        staleness_warning,
        snapshot_generated_at,
        hint: FETCH_HINT.to_string(),
    }
}

/// 공개 엔트리 목록 (internal 제외)
///
/// 선택되지 않은 파티션은 빈 배열입니다.
pub fn list_entries(pool: &EntryPool, kind: Option<Partition>) -> ListResponse {
    let items = |partition: Partition| -> Vec<ListItem> {
        if kind.is_some_and(|k| k != partition) {
            return Vec::new();
        }

        pool.public_entries()
            .filter(|e| e.partition == partition)
            .map(|e| ListItem {
                id: e.id.clone(),
                topic: e.topic.clone(),
                confidence: e.confidence.clone(),
                date: e.date.clone(),
            })
            .collect()
    };

    let blocks = items(Partition::Blocks);
    let patterns = items(Partition::Patterns);

    ListResponse {
        total: blocks.len() + patterns.len(),
        blocks,
        patterns,
        snapshot_generated_at: pool.generated_at().to_string(),
        hint: BROWSE_HINT.to_string(),
    }
}

// ============================================================================
// BlockRetriever
// ============================================================================

/// 블록 검색기
///
/// 스냅샷은 `Arc`로 공유되어 동시 쿼리에 잠금이 필요 없습니다.
pub struct BlockRetriever {
    pool: Arc<EntryPool>,
    content: Arc<dyn ContentSource>,
    fetch_timeout: Duration,
}

impl BlockRetriever {
    /// 새 검색기 생성
    pub fn new(pool: Arc<EntryPool>, content: Arc<dyn ContentSource>) -> Self {
        Self {
            pool,
            content,
            fetch_timeout: crate::content::DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// 원문 조회 타임아웃 지정
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// 설정으로 생성 (스냅샷 로드 + 콘텐츠 저장소 선택)
    pub fn from_config(config: &Config) -> Result<Self> {
        let pool = EntryPool::load(&config.index_path).context("Failed to load snapshot")?;

        let content: Arc<dyn ContentSource> = match &config.content {
            ContentLocation::Dir(root) => Arc::new(FsContentSource::new(root.clone())),
            ContentLocation::Url(url) => Arc::new(
                HttpContentSource::new(url, config.fetch_timeout)
                    .context("Failed to create HTTP content source")?,
            ),
        };

        tracing::debug!("Content source: {}", content.name());

        Ok(Self::new(Arc::new(pool), content).with_fetch_timeout(config.fetch_timeout))
    }

    /// 스냅샷 접근
    pub fn pool(&self) -> &EntryPool {
        &self.pool
    }

    /// 쿼리 (오늘 날짜 기준 노후화)
    pub fn query(&self, request: &QueryRequest) -> QueryResponse {
        self.query_at(request, Utc::now().date_naive())
    }

    /// 기준일을 지정한 쿼리
    pub fn query_at(&self, request: &QueryRequest, today: NaiveDate) -> QueryResponse {
        run_query(&self.pool, request, today)
    }

    /// 목록
    pub fn list(&self, kind: Option<Partition>) -> ListResponse {
        list_entries(&self.pool, kind)
    }

    /// 원문 조회 전체 제한 시간
    ///
    /// 저장소가 재시도를 포함한 예산을 알려주면 그 시간까지 기다립니다.
    fn fetch_deadline(&self) -> Duration {
        self.content
            .fetch_budget()
            .map_or(self.fetch_timeout, |budget| budget.max(self.fetch_timeout))
    }

    /// id로 원문 조회
    ///
    /// 형식이 잘못된 id는 저장소 접근 없이 거부합니다.
    /// 없거나, 저장소 오류거나, 시간이 초과되면 not found 응답을 반환합니다.
    pub async fn get_block(&self, id: &str) -> std::result::Result<BlockContent, FetchError> {
        validate_block_id(id)?;

        // internal 엔트리도 id 조회는 허용
        let partitions: Vec<Partition> = match self.pool.get(id) {
            Some(entry) => vec![entry.partition],
            None => Partition::ALL.to_vec(),
        };

        let lookup = async {
            for partition in partitions {
                match self.content.fetch(partition, id).await {
                    Ok(Some(text)) => return Some(text),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Content fetch failed for {}/{}: {:#}", partition, id, e);
                    }
                }
            }
            None
        };

        match tokio::time::timeout(self.fetch_deadline(), lookup).await {
            Ok(Some(text)) => Ok(BlockContent::found(id, text)),
            Ok(None) => Ok(BlockContent::not_found(id)),
            Err(_) => {
                tracing::warn!("Content fetch timed out after {:?}: {}", self.fetch_deadline(), id);
                Ok(BlockContent::not_found(id))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as Days;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (today() - Days::days(days)).format("%Y-%m-%d").to_string()
    }

    /// A: Retry Backoff, B: Caching Layer -> A, C: Unrelated
    fn scenario_pool() -> EntryPool {
        EntryPool::new(
            "2026-10-01T00:00:00Z",
            vec![
                Entry::new("retry-backoff.md", "Retry Backoff")
                    .with_categories(["networking"])
                    .with_date(days_ago(10))
                    .with_staleness(StalenessRisk::High),
                Entry::new("caching-layer.md", "Caching Layer")
                    .with_connections(["retry-backoff.md"]),
                Entry::new("unrelated.md", "Unrelated"),
            ],
        )
        .unwrap()
    }

    /// 상위 1건만 결과로 받는 쿼리
    fn top_one(topic: &str) -> QueryRequest {
        QueryRequest {
            limit: Some(1),
            ..QueryRequest::topic(topic)
        }
    }

    fn ids(results: &[ResultItem]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    fn related_ids(response: &QueryResponse) -> Vec<&str> {
        response
            .related_entries
            .iter()
            .map(|r| r.id.as_str())
            .collect()
    }

    #[test]
    fn test_scenario_retry() {
        let pool = scenario_pool();
        let response = run_query(&pool, &top_one("retry"), today());

        assert_eq!(ids(&response.results), vec!["retry-backoff.md"]);
        assert!(response.results[0].score.unwrap() > GAP_THRESHOLD);
        assert!(!response.gap_detected);
        assert!(!response.near_miss);
        assert_eq!(response.top_score, Some(0.4));
        assert_eq!(response.count, 1);

        // B는 connections 텍스트("retry-backoff.md")로 매치되어 fallback으로 추천
        assert_eq!(related_ids(&response), vec!["caching-layer.md"]);

        // 10일 < 14일
        assert!(response.staleness_warning.is_empty());
        assert_eq!(response.hint, FETCH_HINT);
    }

    #[test]
    fn test_linked_entry_ranks_below_primary_at_default_limit() {
        let pool = scenario_pool();
        let response = run_query(&pool, &QueryRequest::topic("retry"), today());

        // connections 가중치(0.5)만 매치된 B도 결과에 포함되며, 추천에서는 제외
        assert_eq!(
            ids(&response.results),
            vec!["retry-backoff.md", "caching-layer.md"]
        );
        assert!(response.related_entries.is_empty());
    }

    #[test]
    fn test_scenario_nonexistent() {
        let pool = scenario_pool();
        let response = run_query(&pool, &QueryRequest::topic("nonexistent-zzz"), today());

        assert!(response.results.is_empty());
        assert!(response.gap_detected);
        assert!(!response.near_miss);
        assert!(response.related_entries.is_empty());
        assert_eq!(response.top_score, Some(0.0));
        assert_eq!(response.count, 0);
        assert_eq!(response.hint, BROWSE_HINT);
    }

    #[test]
    fn test_near_miss_suppresses_results() {
        let pool = scenario_pool();
        // "retry zzz zzz": 3 / (7.5 * 3) = 0.133
        let response = run_query(&pool, &QueryRequest::topic("retry zzz zzz"), today());

        assert!(response.gap_detected);
        assert!(response.near_miss);
        assert!(response.results.is_empty());
        assert!(response.related_entries.is_empty());
        assert_eq!(response.top_score, Some(0.13));
        assert!(response.hint.contains("0.13"));
        assert!(response.hint.contains("0.20"));
    }

    #[test]
    fn test_threshold_exact_is_not_gap() {
        let pool = scenario_pool();
        // 3 / (7.5 * 2) = 0.2
        let response = run_query(&pool, &top_one("retry zzz"), today());

        assert!(!response.gap_detected);
        assert_eq!(ids(&response.results), vec!["retry-backoff.md"]);
    }

    #[test]
    fn test_staleness_warning_on_visible_results() {
        let pool = scenario_pool();
        let later = today() + Days::days(5);
        let response = run_query(&pool, &QueryRequest::topic("retry"), later);

        // B는 날짜가 없으므로 경고 대상 아님
        assert_eq!(response.staleness_warning, vec!["retry-backoff.md"]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["stalenessWarning"][0], "retry-backoff.md");
    }

    #[test]
    fn test_no_query_returns_pool_order() {
        let pool = scenario_pool();
        let request = QueryRequest {
            limit: Some(2),
            ..Default::default()
        };
        let response = run_query(&pool, &request, today());

        assert_eq!(
            ids(&response.results),
            vec!["retry-backoff.md", "caching-layer.md"]
        );
        assert!(!response.gap_detected);
        assert!(response.top_score.is_none());
    }

    #[test]
    fn test_blank_topic_is_no_query() {
        let pool = scenario_pool();
        let response = run_query(&pool, &QueryRequest::topic("   "), today());

        assert!(response.top_score.is_none());
        assert_eq!(response.count, 3);
    }

    #[test]
    fn test_filters_applied_before_scoring() {
        let pool = scenario_pool();
        let request = QueryRequest {
            topic: Some("retry".into()),
            category: Some("storage".into()),
            ..Default::default()
        };
        let response = run_query(&pool, &request, today());

        assert!(response.gap_detected);
        assert!(!response.near_miss);
    }

    #[test]
    fn test_response_json_shape() {
        let pool = scenario_pool();
        let response = run_query(&pool, &top_one("retry"), today());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["gapDetected"], false);
        assert_eq!(json["nearMiss"], false);
        assert_eq!(json["topScore"], 0.4);
        assert_eq!(json["count"], 1);
        assert_eq!(json["snapshotGeneratedAt"], "2026-10-01T00:00:00Z");
        assert_eq!(json["results"][0]["stalenessRisk"], "high");
        assert!(json["results"][0].get("theoryDelta").is_some());
        assert!(json["results"][0].get("environmentScope").is_some());
        assert!(json["results"][0].get("score").is_none());
        assert!(json.get("stalenessWarning").is_none());
        assert_eq!(json["relatedEntries"][0]["id"], "caching-layer.md");
    }

    #[test]
    fn test_no_query_top_score_serializes_null() {
        let pool = scenario_pool();
        let response = run_query(&pool, &QueryRequest::default(), today());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["topScore"].is_null());
    }

    #[test]
    fn test_list_excludes_internal_across_partitions() {
        let pool = EntryPool::new(
            "2026-10-01",
            vec![
                Entry::new("a.md", "A"),
                Entry::new("secret.md", "Secret").internal(),
                Entry::new("p.md", "P").with_partition(Partition::Patterns),
                Entry::new("q.md", "Q")
                    .with_partition(Partition::Patterns)
                    .internal(),
            ],
        )
        .unwrap();

        let response = list_entries(&pool, None);
        assert_eq!(response.blocks.len(), 1);
        assert_eq!(response.patterns.len(), 1);
        assert_eq!(response.total, 2);
        assert_eq!(response.blocks[0].id, "a.md");
        assert_eq!(response.patterns[0].id, "p.md");

        // gap 응답과 같은 탐색 안내
        assert_eq!(response.hint, BROWSE_HINT);

        let response = list_entries(&pool, Some(Partition::Patterns));
        assert!(response.blocks.is_empty());
        assert_eq!(response.total, 1);
    }

    #[test]
    fn test_query_request_deserialize() {
        let json = r#"{"topic": "retry", "kind": "patterns", "limit": 3}"#;
        let request: QueryRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.topic.as_deref(), Some("retry"));
        assert_eq!(request.kind, Some(Partition::Patterns));
        assert_eq!(request.limit, Some(3));
        assert!(request.category.is_none());
    }

    // ------------------------------------------------------------------
    // get_block
    // ------------------------------------------------------------------

    /// 호출 횟수를 세는 저장소
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentSource for CountingSource {
        async fn fetch(&self, _partition: Partition, _id: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    /// 응답하지 않는 저장소
    struct HangingSource;

    #[async_trait]
    impl ContentSource for HangingSource {
        async fn fetch(&self, _partition: Partition, _id: &str) -> Result<Option<String>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some("late".into()))
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    /// 재시도 끝에 응답하는 저장소
    struct RetryingSource;

    #[async_trait]
    impl ContentSource for RetryingSource {
        async fn fetch(&self, _partition: Partition, _id: &str) -> Result<Option<String>> {
            tokio::time::sleep(Duration::from_millis(60)).await;
            Ok(Some("# after retry\n".into()))
        }

        fn name(&self) -> &str {
            "retrying"
        }

        fn fetch_budget(&self) -> Option<Duration> {
            Some(Duration::from_secs(5))
        }
    }

    /// 항상 실패하는 저장소
    struct FailingSource;

    #[async_trait]
    impl ContentSource for FailingSource {
        async fn fetch(&self, _partition: Partition, _id: &str) -> Result<Option<String>> {
            anyhow::bail!("connection reset")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_get_block_rejects_before_io() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let retriever = BlockRetriever::new(Arc::new(scenario_pool()), source.clone());

        for bad in ["../secret.md", "no-extension"] {
            let err = retriever.get_block(bad).await.unwrap_err();
            assert_eq!(err, FetchError::InvalidId(bad.to_string()));
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        let payload = retriever.get_block("example-block.md").await.unwrap();
        assert!(!payload.found);
        // 모르는 id는 두 파티션 모두 확인
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_block_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("patterns")).unwrap();
        std::fs::write(dir.path().join("patterns").join("p.md"), "# P\n").unwrap();

        let pool = EntryPool::new(
            "2026-10-01",
            vec![Entry::new("p.md", "P")
                .with_partition(Partition::Patterns)
                .internal()],
        )
        .unwrap();
        let retriever =
            BlockRetriever::new(Arc::new(pool), Arc::new(FsContentSource::new(dir.path())));

        let payload = retriever.get_block("p.md").await.unwrap();
        assert!(payload.found);
        assert_eq!(payload.content.as_deref(), Some("# P\n"));

        let payload = retriever.get_block("missing.md").await.unwrap();
        assert!(!payload.found);
    }

    #[tokio::test]
    async fn test_get_block_timeout_is_not_found() {
        let retriever = BlockRetriever::new(Arc::new(scenario_pool()), Arc::new(HangingSource))
            .with_fetch_timeout(Duration::from_millis(20));

        let payload = retriever.get_block("retry-backoff.md").await.unwrap();
        assert!(!payload.found);
    }

    #[tokio::test]
    async fn test_get_block_waits_for_source_budget() {
        // 요청 타임아웃(20ms)보다 길어도 저장소 예산 안이면 성공
        let retriever = BlockRetriever::new(Arc::new(scenario_pool()), Arc::new(RetryingSource))
            .with_fetch_timeout(Duration::from_millis(20));

        let payload = retriever.get_block("retry-backoff.md").await.unwrap();
        assert!(payload.found);
        assert_eq!(payload.content.as_deref(), Some("# after retry\n"));
    }

    #[tokio::test]
    async fn test_get_block_source_error_is_not_found() {
        let retriever = BlockRetriever::new(Arc::new(scenario_pool()), Arc::new(FailingSource));

        let payload = retriever.get_block("retry-backoff.md").await.unwrap();
        assert!(!payload.found);
        assert!(payload.message.is_some());
    }
}
