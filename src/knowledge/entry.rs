//! Entry - 지식 블록 레코드
//!
//! 오프라인 인덱싱 단계가 만든 index.json 레코드를 표현합니다.
//! 선택적 frontmatter 필드는 모두 기본값을 가집니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Partition
// ============================================================================

/// 엔트리 파티션 (`kind` 필터 대상)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// 일반 블록 (blocks/)
    #[default]
    Blocks,
    /// 패턴 (patterns/)
    Patterns,
}

impl Partition {
    /// 모든 파티션 (인덱스 순서)
    pub const ALL: [Partition; 2] = [Partition::Blocks, Partition::Patterns];

    /// 콘텐츠 디렉토리 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Blocks => "blocks",
            Partition::Patterns => "patterns",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blocks" => Ok(Partition::Blocks),
            "patterns" => Ok(Partition::Patterns),
            other => Err(format!("unknown kind '{}' (expected blocks | patterns)", other)),
        }
    }
}

// ============================================================================
// StalenessRisk
// ============================================================================

/// 노후화 위험 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalenessRisk {
    Low,
    Medium,
    High,
}

impl StalenessRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            StalenessRisk::Low => "low",
            StalenessRisk::Medium => "medium",
            StalenessRisk::High => "high",
        }
    }

    /// 등급별 허용 경과 일수 (초과하면 stale)
    ///
    /// `Low`는 기한이 없습니다.
    pub fn max_age_days(&self) -> Option<i64> {
        match self {
            StalenessRisk::Low => None,
            StalenessRisk::Medium => Some(60),
            StalenessRisk::High => Some(14),
        }
    }
}

impl FromStr for StalenessRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(StalenessRisk::Low),
            "medium" => Ok(StalenessRisk::Medium),
            "high" => Ok(StalenessRisk::High),
            other => Err(format!("unknown staleness_risk '{}'", other)),
        }
    }
}

/// 알 수 없는 등급은 로드 실패 대신 None으로 취급
fn lenient_staleness<'de, D>(deserializer: D) -> Result<Option<StalenessRisk>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse() {
        Ok(risk) => Some(risk),
        Err(e) => {
            tracing::warn!("Ignoring staleness risk: {}", e);
            None
        }
    }))
}

// ============================================================================
// Entry
// ============================================================================

/// 지식 엔트리
///
/// index.json의 `blocks[]` / `patterns[]` 레코드 하나에 해당합니다.
/// 파티션은 레코드가 들어있던 배열로 결정됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// 파일명 (예: `retry-backoff.md`)
    #[serde(rename = "file")]
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(default)]
    pub theory_delta: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// 다른 엔트리 id 목록 (풀에 없는 id는 무시)
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default, deserialize_with = "lenient_staleness")]
    pub staleness_risk: Option<StalenessRisk>,
    #[serde(default)]
    pub environment_scope: Option<String>,
    /// ISO `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// true면 공개 query/list에서 제외 (id 조회는 가능)
    #[serde(default)]
    pub internal: bool,
    #[serde(skip)]
    pub partition: Partition,
}

impl Entry {
    /// 최소 필드로 엔트리 생성
    pub fn new(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            summary: String::new(),
            claims: Vec::new(),
            theory_delta: None,
            categories: Vec::new(),
            connections: Vec::new(),
            confidence: None,
            staleness_risk: None,
            environment_scope: None,
            date: None,
            internal: false,
            partition: Partition::Blocks,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_connections<I, S>(mut self, connections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connections = connections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_claims<I, S>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claims = claims.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_theory_delta(mut self, delta: impl Into<String>) -> Self {
        self.theory_delta = Some(delta.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_staleness(mut self, risk: StalenessRisk) -> Self {
        self.staleness_risk = Some(risk);
        self
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"file": "retry-backoff.md", "topic": "Retry Backoff"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.id, "retry-backoff.md");
        assert_eq!(entry.topic, "Retry Backoff");
        assert!(entry.summary.is_empty());
        assert!(entry.categories.is_empty());
        assert!(entry.connections.is_empty());
        assert!(entry.date.is_none());
        assert!(entry.staleness_risk.is_none());
        assert!(!entry.internal);
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "file": "caching.md",
            "topic": "Caching Layer",
            "date": "2026-01-02",
            "categories": ["infra"],
            "connections": ["retry-backoff.md"],
            "summary": "Read-through cache",
            "claims": ["TTL must be jittered"],
            "confidence": "empirical",
            "staleness_risk": "medium",
            "theory_delta": "Docs say otherwise",
            "environment_scope": "linux",
            "internal": true
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.staleness_risk, Some(StalenessRisk::Medium));
        assert_eq!(entry.confidence.as_deref(), Some("empirical"));
        assert_eq!(entry.environment_scope.as_deref(), Some("linux"));
        assert_eq!(entry.connections, vec!["retry-backoff.md"]);
        assert!(entry.internal);
    }

    #[test]
    fn test_unknown_staleness_is_absent() {
        let json = r#"{"file": "x.md", "staleness_risk": "extreme"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(entry.staleness_risk.is_none());
    }

    #[test]
    fn test_null_date() {
        let json = r#"{"file": "x.md", "date": null}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(entry.date.is_none());
    }

    #[test]
    fn test_partition_parse() {
        assert_eq!("blocks".parse::<Partition>(), Ok(Partition::Blocks));
        assert_eq!("Patterns".parse::<Partition>(), Ok(Partition::Patterns));
        assert!("both".parse::<Partition>().is_err());
    }

    #[test]
    fn test_max_age_days() {
        assert_eq!(StalenessRisk::High.max_age_days(), Some(14));
        assert_eq!(StalenessRisk::Medium.max_age_days(), Some(60));
        assert_eq!(StalenessRisk::Low.max_age_days(), None);
    }
}
