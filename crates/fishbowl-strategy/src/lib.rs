//! 어항(鱼盆) 모델 추세추종 전략 엔진.
//!
//! 20일 이동평균 돌파/이탈 규칙으로 포트폴리오 분류별 매수·매도·관망을
//! 판단하는 상태 기계와, 그 실행 내역을 기록하는 추가 전용 거래 원장을
//! 제공합니다.
//!
//! - `engine` - 신호 생성과 실행 (`evaluate` / `execute`)
//! - `ledger` - 거래 원장과 포지션 스냅샷 (JSON 파일 영속화)

pub mod engine;
pub mod ledger;

pub use engine::{EngineError, FishbowlEngine};
pub use ledger::{Ledger, LedgerError, PositionBook};
