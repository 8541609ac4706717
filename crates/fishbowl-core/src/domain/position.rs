//! 포트폴리오별 현재 포지션.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 한 포트폴리오 분류의 현재 보유 상태.
///
/// 불변식: `etf_code`가 비어 있음 ⇔ `position == 0`.
/// `flat()`/`opened()` 생성자는 불변식을 보장하며, 외부에서 복원한
/// 스냅샷은 `invariant_holds()`로 검증해야 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    /// 보유 중인 ETF 코드 (빈 문자열 = 무포지션)
    pub etf_code: String,
    /// 보유 비중 (0 ~ max_position)
    pub position: Decimal,
    /// 평균 매수가
    pub avg_price: Decimal,
    /// 현재 고정 손절가
    pub stop_loss: Decimal,
}

impl Position {
    /// 무포지션 상태.
    pub fn flat() -> Self {
        Self::default()
    }

    /// 매수 체결 직후의 보유 상태.
    pub fn opened(
        etf_code: impl Into<String>,
        position: Decimal,
        avg_price: Decimal,
        stop_loss: Decimal,
    ) -> Self {
        Self {
            etf_code: etf_code.into(),
            position,
            avg_price,
            stop_loss,
        }
    }

    /// 무포지션 여부.
    pub fn is_flat(&self) -> bool {
        self.etf_code.is_empty()
    }

    /// 해당 코드를 보유 중인지 확인.
    pub fn holds(&self, etf_code: &str) -> bool {
        !self.is_flat() && self.etf_code == etf_code
    }

    /// 무포지션⇔보유 불변식 검사 (테스트 및 스냅샷 로드 검증용).
    pub fn invariant_holds(&self) -> bool {
        self.etf_code.is_empty() == self.position.is_zero()
    }
}
