//! 포트폴리오 분류와 후보 풀 엔티티.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 독립적으로 운용되는 두 포트폴리오 분류.
///
/// 각 분류는 자체 전략 파라미터와 포지션을 가집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// 안정 운용 (대형 광범위 지수 중심)
    Stable,
    /// 공격 운용 (섹터/테마 중심)
    Aggressive,
}

impl PoolKind {
    /// 두 분류 전체.
    pub const ALL: [PoolKind; 2] = [PoolKind::Stable, PoolKind::Aggressive];

    /// 발송 메시지에 쓰이는 중국어 표기.
    pub fn label(&self) -> &'static str {
        match self {
            PoolKind::Stable => "稳健仓",
            PoolKind::Aggressive => "激进仓",
        }
    }
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolKind::Stable => write!(f, "stable"),
            PoolKind::Aggressive => write!(f, "aggressive"),
        }
    }
}

/// 후보 풀의 ETF 한 종목.
///
/// 외부 셀렉터가 매주 갱신하는 랭킹 목록의 항목으로,
/// 엔진은 이 목록 안에서만 매수 후보를 고릅니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEtf {
    /// ETF 코드
    pub etf_code: String,
    /// ETF 이름
    pub name: String,
    /// 업종/테마
    pub industry: String,
    /// 기금 규모 (억 위안)
    pub fund_size: Decimal,
    /// 일평균 거래대금 (억 위안)
    pub avg_volume: Decimal,
    /// 추적 오차 (비율)
    pub tracking_error: Decimal,
    /// 선정 사유
    pub selection_reason: String,
}
