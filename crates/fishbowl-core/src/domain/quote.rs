//! 일봉 시세 엔티티.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 일봉 OHLCV + 공급자 계산 이동평균.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 거래일
    pub trade_date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
    /// 공급자가 함께 내려주는 20일 이동평균 (초기 구간은 없음)
    ///
    /// 추세 강도 랭킹에만 사용하며, 매수/매도 판정용 이동평균은
    /// 엔진이 파라미터의 기간으로 직접 계산합니다.
    pub ma: Option<Decimal>,
}
