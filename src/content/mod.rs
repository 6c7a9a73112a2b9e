//! 콘텐츠 모듈 - 파일명으로 블록 원문 조회
//!
//! 블록 원문은 인덱스와 별도로 저장됩니다 (로컬 디렉토리 또는 HTTP).
//! 조회는 요청마다 독립적이며, 실패하거나 시간 초과되면 not found로 처리합니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let source = FsContentSource::new("/srv/blockbase");
//! let content = source.fetch(Partition::Blocks, "retry-backoff.md").await?;
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::knowledge::Partition;

/// 기본 조회 타임아웃
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// 일시적 HTTP 오류 최대 재시도 횟수
const MAX_RETRIES: u32 = 2;
/// 재시도 초기 백오프 (ms)
const INITIAL_BACKOFF_MS: u64 = 200;

/// n번째 재시도 전 대기 시간 (1부터)
fn backoff_for(attempt: u32) -> Duration {
    Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1))
}

// ============================================================================
// Errors & Types
// ============================================================================

/// 블록 조회 거부 사유
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// 파일명 형식 오류 (스토리지 접근 전에 거부)
    #[error("invalid block id '{0}': expected a name like 'example-block.md'")]
    InvalidId(String),
}

/// 블록 조회 결과
///
/// not found는 에러가 아니라 정상 응답으로 표현합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockContent {
    pub id: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BlockContent {
    pub fn found(id: impl Into<String>, content: String) -> Self {
        Self {
            id: id.into(),
            found: true,
            content: Some(content),
            message: None,
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        let message = format!("Block '{}' not found. Use list_blocks to browse available ids.", id);
        Self {
            id,
            found: false,
            content: None,
            message: Some(message),
        }
    }
}

/// 블록 id 형식 검증 (`[A-Za-z0-9_-]+\.md`)
pub fn validate_block_id(id: &str) -> std::result::Result<(), FetchError> {
    static BLOCK_ID_RE: OnceLock<Regex> = OnceLock::new();
    let re = BLOCK_ID_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+\.md$").expect("valid block id regex"));

    if re.is_match(id) {
        Ok(())
    } else {
        Err(FetchError::InvalidId(id.to_string()))
    }
}

// ============================================================================
// ContentSource Trait
// ============================================================================

/// 콘텐츠 저장소 트레이트 (async)
///
/// 없으면 `Ok(None)`, 일시적 장애는 `Err`로 구분합니다.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// 파티션/파일명으로 원문 조회
    async fn fetch(&self, partition: Partition, id: &str) -> Result<Option<String>>;

    /// 저장소 이름
    fn name(&self) -> &str;

    /// 조회 1회에 걸릴 수 있는 최대 시간 (재시도 포함)
    ///
    /// `None`이면 호출자의 타임아웃만 적용됩니다.
    fn fetch_budget(&self) -> Option<Duration> {
        None
    }
}

// ============================================================================
// FsContentSource
// ============================================================================

/// 로컬 디렉토리 저장소 (`<root>/blocks/*.md`, `<root>/patterns/*.md`)
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn fetch(&self, partition: Partition, id: &str) -> Result<Option<String>> {
        let path = self.root.join(partition.as_str()).join(id);

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

// ============================================================================
// HttpContentSource
// ============================================================================

/// HTTP 저장소 (`<base>/<partition>/<id>`)
///
/// 404는 not found, 429/5xx는 지수 백오프로 재시도합니다.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    base: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpContentSource {
    /// 새 HTTP 저장소 생성
    ///
    /// # Arguments
    /// * `base_url` - 파티션 디렉토리를 담은 기본 URL
    /// * `timeout` - 요청 하나당 타임아웃
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // join이 마지막 경로를 덮어쓰지 않도록 '/'로 끝나게 함
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = Url::parse(&normalized)
            .with_context(|| format!("Invalid content URL: {}", base_url))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("blockbase/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base,
            client,
            timeout,
        })
    }

    /// 조회 URL 생성
    pub fn url_for(&self, partition: Partition, id: &str) -> Result<Url> {
        self.base
            .join(&format!("{}/{}", partition.as_str(), id))
            .context("Failed to build content URL")
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, partition: Partition, id: &str) -> Result<Option<String>> {
        let url = self.url_for(partition, id)?;
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = backoff_for(attempt);
                tracing::warn!(
                    "Retrying {} in {:?} (attempt {}/{})",
                    url,
                    backoff,
                    attempt,
                    MAX_RETRIES
                );
                tokio::time::sleep(backoff).await;
            }

            let response = match self.client.get(url.clone()).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(anyhow::anyhow!("Content request failed: {}", e));
                    continue;
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .context("Failed to read content body")?;
                return Ok(Some(body));
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(anyhow::anyhow!("Content server error ({})", status));
                continue;
            }

            anyhow::bail!("Unexpected content status ({}) for {}", status, url);
        }

        Err(last_error
            .unwrap_or_else(|| anyhow::anyhow!("Content fetch failed after {} retries", MAX_RETRIES)))
    }

    fn name(&self) -> &str {
        "http"
    }

    /// 요청별 타임아웃 x 시도 횟수 + 백오프 합계
    fn fetch_budget(&self) -> Option<Duration> {
        let backoff: Duration = (1..=MAX_RETRIES).map(backoff_for).sum();
        Some(self.timeout * (MAX_RETRIES + 1) + backoff)
    }
}

// ============================================================================
// Tests
// ============================================================================
