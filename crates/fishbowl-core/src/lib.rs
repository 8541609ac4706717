//! fishbowl 전략의 핵심 도메인 타입.
//!
//! 어항(鱼盆) 모델 ETF 추세추종 전략에서 공유되는 타입을 정의합니다:
//! - `domain` - 포지션, 거래 기록, 신호, 전략 파라미터 등 도메인 엔티티
//! - `provider` - 외부 데이터 공급자(시세, 후보 풀) trait
//! - `indicators` - 이동평균 등 순수 지표 계산
//!
//! 실제 매매 판단은 `fishbowl-strategy`, 메시지 발송은 `fishbowl-notify`가
//! 담당하며, 이 크레이트는 둘 사이의 공용 어휘만 제공합니다.

pub mod domain;
pub mod error;
pub mod indicators;
pub mod provider;

pub use domain::{
    ExecStatus, ExecutionResult, IpoListing, PoolEtf, PoolKind, Position, Quote, Signal,
    StrategyParams, StrategyParamsSet, TradeAction, Transaction,
};
pub use error::CoreError;
pub use provider::{CandidatePoolProvider, QuoteProvider};
