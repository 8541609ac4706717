//! 체결 거래 기록.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PoolKind;

/// 체결된 매매의 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// 원장에 추가되는 불변 거래 기록.
///
/// 매수/매도 실행마다 한 건씩 기록되며 수정·삭제되지 않습니다.
/// 트레일링 스탑의 "최근 매수 이후 최고가" 계산은 이 원장의 BUY
/// 기록만을 근거로 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 매매 방향
    pub action: TradeAction,
    /// ETF 코드
    pub etf_code: String,
    /// ETF 이름
    pub etf_name: String,
    /// 체결 기준 가격
    pub price: Decimal,
    /// 체결 비중
    pub position: Decimal,
    /// 실행 사유 (사람이 읽는 문자열)
    pub reason: String,
    /// 실현 수익률 (SELL에만 존재, 손실이면 음수)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_ratio: Option<Decimal>,
    /// 포트폴리오 분류
    pub pool: PoolKind,
    /// 기록 시각
    pub timestamp: DateTime<Utc>,
}
