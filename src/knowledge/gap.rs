//! Gap Detector - "적절한 매치 없음" 판정
//!
//! 최상위 점수가 임계값 미만이면 gap으로 보고 결과를 숨깁니다.
//! 약한 신호라도 있었으면 near miss로 구분합니다.

use serde::Serialize;

/// 관련도 임계값 (이 값 미만이면 gap)
pub const GAP_THRESHOLD: f64 = 0.20;

/// Gap 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapVerdict {
    pub gap: bool,
    pub near_miss: bool,
}

/// Gap 판정
///
/// # Arguments
/// * `result_count` - gap 억제 전 결과 개수
/// * `top_score` - 쿼리가 있으면 최상위 점수, 없으면 None
pub fn detect(result_count: usize, top_score: Option<f64>) -> GapVerdict {
    let below = matches!(top_score, Some(s) if s < GAP_THRESHOLD);
    let gap = result_count == 0 || below;
    let near_miss = gap && result_count > 0 && top_score.is_some_and(|s| s > 0.0);

    GapVerdict { gap, near_miss }
}

// ============================================================================
// Tests
// ============================================================================
