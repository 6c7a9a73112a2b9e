//! 설정 모듈 - 환경변수 + CLI 플래그
//!
//! 우선순위: CLI 플래그 > 환경변수 > 기본값 (~/.blockbase/)
//!
//! - `BLOCKBASE_INDEX`: 스냅샷 경로
//! - `BLOCKBASE_CONTENT_DIR`: blocks/, patterns/ 를 담은 디렉토리
//! - `BLOCKBASE_CONTENT_URL`: HTTP 콘텐츠 기본 URL (디렉토리보다 우선)
//! - `BLOCKBASE_FETCH_TIMEOUT_SECS`: 원문 조회 타임아웃 (초)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::content::DEFAULT_FETCH_TIMEOUT;
use crate::knowledge::get_data_dir;

pub const ENV_INDEX: &str = "BLOCKBASE_INDEX";
pub const ENV_CONTENT_DIR: &str = "BLOCKBASE_CONTENT_DIR";
pub const ENV_CONTENT_URL: &str = "BLOCKBASE_CONTENT_URL";
pub const ENV_FETCH_TIMEOUT: &str = "BLOCKBASE_FETCH_TIMEOUT_SECS";

/// 원문 저장 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    Dir(PathBuf),
    Url(String),
}

/// 실행 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub index_path: PathBuf,
    pub content: ContentLocation,
    pub fetch_timeout: Duration,
}

/// CLI에서 넘어오는 덮어쓰기 값
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub index: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
    pub content_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = get_data_dir();
        Self {
            index_path: data_dir.join("index.json"),
            content: ContentLocation::Dir(data_dir),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// 비어있지 않은 환경변수 값
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        Self::resolve(Overrides::default(), env_value)
    }

    /// CLI 플래그를 적용해 설정 로드
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::resolve(overrides, env_value)
    }

    /// 설정 결정 (환경 조회 함수 주입)
    pub fn resolve<F>(overrides: Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let index_path = overrides
            .index
            .or_else(|| env(ENV_INDEX).map(PathBuf::from))
            .unwrap_or(defaults.index_path);

        // 명시적 플래그가 환경변수보다 우선
        let content = match (overrides.content_url, overrides.content_dir) {
            (Some(url), _) => ContentLocation::Url(url),
            (None, Some(dir)) => ContentLocation::Dir(dir),
            (None, None) => match (env(ENV_CONTENT_URL), env(ENV_CONTENT_DIR)) {
                (Some(url), _) => ContentLocation::Url(url),
                (None, Some(dir)) => ContentLocation::Dir(PathBuf::from(dir)),
                (None, None) => defaults.content,
            },
        };

        let fetch_timeout = match env(ENV_FETCH_TIMEOUT) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a number of seconds: {}", ENV_FETCH_TIMEOUT, raw))?;
                Duration::from_secs(secs)
            }
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            index_path,
            content,
            fetch_timeout,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
