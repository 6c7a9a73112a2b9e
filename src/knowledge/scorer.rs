//! Field Scorer - 다중 필드 가중치 키워드 점수
//!
//! 쿼리 단어가 각 필드에 부분 문자열로 포함되면 필드 가중치를 더하고,
//! (가중치 합 × 단어 수)로 나눠 0.0 ~ 1.0 범위로 정규화합니다.
//!
//! 토큰 경계가 아닌 substring 매칭이므로 "back"은 "Backoff"에 매칭됩니다.

use super::entry::Entry;

/// 필드 가중치: topic, summary, claims, theory_delta, connections
pub const TOPIC_WEIGHT: f64 = 3.0;
pub const SUMMARY_WEIGHT: f64 = 2.0;
pub const CLAIMS_WEIGHT: f64 = 1.0;
pub const THEORY_DELTA_WEIGHT: f64 = 1.0;
pub const CONNECTIONS_WEIGHT: f64 = 0.5;

/// 가중치 합 (7.5)
pub const TOTAL_WEIGHT: f64 =
    TOPIC_WEIGHT + SUMMARY_WEIGHT + CLAIMS_WEIGHT + THEORY_DELTA_WEIGHT + CONNECTIONS_WEIGHT;

// ============================================================================
// Tokenizer
// ============================================================================

/// 쿼리 텍스트를 소문자 단어 목록으로 분할
///
/// 공백 기준으로 나누며 빈 단어는 없습니다. 중복은 유지됩니다.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Scoring
// ============================================================================

/// 점수 계산용 소문자 필드
struct ScoredFields {
    fields: [(String, f64); 5],
}

impl ScoredFields {
    fn of(entry: &Entry) -> Self {
        Self {
            fields: [
                (entry.topic.to_lowercase(), TOPIC_WEIGHT),
                (entry.summary.to_lowercase(), SUMMARY_WEIGHT),
                (entry.claims.join(" ").to_lowercase(), CLAIMS_WEIGHT),
                (
                    entry.theory_delta.as_deref().unwrap_or_default().to_lowercase(),
                    THEORY_DELTA_WEIGHT,
                ),
                (entry.connections.join(" ").to_lowercase(), CONNECTIONS_WEIGHT),
            ],
        }
    }

    fn weight_for(&self, word: &str) -> f64 {
        self.fields
            .iter()
            .filter(|(text, _)| text.contains(word))
            .fold(0.0_f64, |acc, (_, weight)| acc + *weight)
    }
}

/// 엔트리와 쿼리 단어의 관련도 점수
///
/// # Arguments
/// * `entry` - 대상 엔트리
/// * `query_words` - `tokenize`로 만든 소문자 단어 목록
///
/// # Returns
/// 0.0 ~ 1.0 (모든 단어가 모든 필드에 있으면 1.0, 단어가 없으면 0.0)
pub fn score(entry: &Entry, query_words: &[String]) -> f64 {
    if query_words.is_empty() {
        return 0.0;
    }

    let fields = ScoredFields::of(entry);
    // 빈 합계가 -0.0이 되지 않도록 0.0에서 시작
    let total: f64 = query_words
        .iter()
        .fold(0.0, |acc, w| acc + fields.weight_for(w));

    total / (TOTAL_WEIGHT * query_words.len() as f64)
}

// ============================================================================
// Tests
// ============================================================================
