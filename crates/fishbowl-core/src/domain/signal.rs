//! 전략 평가 결과 신호와 실행 결과.
//!
//! 액션별 필수 필드가 다르기 때문에 둘 다 tagged union으로 표현합니다.
//! HOLD에는 손절가가 없고, SELL에만 실현 수익률이 있는 식의 "이 액션일
//! 때만 존재하는 필드"를 타입으로 강제합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeAction;

/// 한 번의 평가가 내놓는 매매 신호.
///
/// 평가 때마다 새로 생성되는 일시적 값이며 직접 저장되지 않습니다.
/// 실행된 효과만 `Transaction`으로 원장에 남습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum Signal {
    /// 매수 신호
    Buy {
        /// 대상 ETF 코드
        etf_code: String,
        /// 대상 ETF 이름
        etf_name: String,
        /// 제안 매수가 (최근 종가)
        price: Decimal,
        /// 제안 비중
        position: Decimal,
        /// 고정 손절가
        stop_loss: Decimal,
        /// 신호 사유
        reason: String,
    },
    /// 매도 신호
    Sell {
        /// 대상 ETF 코드
        etf_code: String,
        /// 제안 매도가 (최근 종가)
        price: Decimal,
        /// 실현 수익률 (손실이면 음수)
        profit_ratio: Decimal,
        /// 신호 사유
        reason: String,
    },
    /// 관망 신호 (상태 변화 없음)
    Hold {
        /// 관련 ETF 코드 (없으면 빈 문자열)
        etf_code: String,
        /// 현재 보유 비중
        position: Decimal,
        /// 관망 사유
        reason: String,
    },
}

impl Signal {
    /// HOLD 신호 생성 헬퍼.
    pub fn hold(etf_code: impl Into<String>, position: Decimal, reason: impl Into<String>) -> Self {
        Signal::Hold {
            etf_code: etf_code.into(),
            position,
            reason: reason.into(),
        }
    }

    /// 액션 문자열 (로그·메시지용).
    pub fn action(&self) -> &'static str {
        match self {
            Signal::Buy { .. } => "BUY",
            Signal::Sell { .. } => "SELL",
            Signal::Hold { .. } => "HOLD",
        }
    }

    /// 신호 사유.
    pub fn reason(&self) -> &str {
        match self {
            Signal::Buy { reason, .. }
            | Signal::Sell { reason, .. }
            | Signal::Hold { reason, .. } => reason,
        }
    }
}

/// 실행 결과 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecStatus {
    /// 정상 처리 (BUY/SELL/HOLD 모두 포함)
    Success,
    /// 실행 거부 (예: 보유 종목 불일치)
    Error,
}

/// `execute()` 호출이 돌려주는 구조화된 결과.
///
/// 실패도 예외가 아닌 `Rejected` 변형으로 반환됩니다. 호출자는
/// `status()`로 성공 여부를 판별해야 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum ExecutionResult {
    /// 매수 체결
    Bought {
        /// 체결 ETF 코드
        etf_code: String,
        /// 체결 ETF 이름
        etf_name: String,
        /// 체결 가격
        price: Decimal,
        /// 체결 비중
        position: Decimal,
        /// 설정된 손절가
        stop_loss: Decimal,
        /// 결과 메시지
        message: String,
    },
    /// 매도 체결
    Sold {
        /// 체결 ETF 코드
        etf_code: String,
        /// 체결 가격
        price: Decimal,
        /// 실현 수익률
        profit_ratio: Decimal,
        /// 결과 메시지
        message: String,
    },
    /// 관망 (상태 변화 없음)
    Held {
        /// 관련 ETF 코드 (없으면 빈 문자열)
        etf_code: String,
        /// 현재 보유 비중
        position: Decimal,
        /// 결과 메시지
        message: String,
    },
    /// 실행 거부 (상태 변화 없음)
    Rejected {
        /// 거부된 액션
        #[serde(rename = "rejected_action")]
        action: TradeAction,
        /// 대상 ETF 코드
        etf_code: String,
        /// 거부 사유
        message: String,
    },
}

impl ExecutionResult {
    /// 성공/실패 상태.
    pub fn status(&self) -> ExecStatus {
        match self {
            ExecutionResult::Rejected { .. } => ExecStatus::Error,
            _ => ExecStatus::Success,
        }
    }

    /// 성공 여부.
    pub fn is_success(&self) -> bool {
        self.status() == ExecStatus::Success
    }

    /// 결과 메시지.
    pub fn message(&self) -> &str {
        match self {
            ExecutionResult::Bought { message, .. }
            | ExecutionResult::Sold { message, .. }
            | ExecutionResult::Held { message, .. }
            | ExecutionResult::Rejected { message, .. } => message,
        }
    }

    /// 관련 ETF 코드.
    pub fn etf_code(&self) -> &str {
        match self {
            ExecutionResult::Bought { etf_code, .. }
            | ExecutionResult::Sold { etf_code, .. }
            | ExecutionResult::Held { etf_code, .. }
            | ExecutionResult::Rejected { etf_code, .. } => etf_code,
        }
    }
}
