//! 에러 타입 정의.

use thiserror::Error;

/// 코어 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 전략 파라미터 검증 실패 (기동 시 치명적)
    #[error("invalid strategy parameter: {0}")]
    InvalidParams(String),

    /// 외부 데이터 소스 에러 (엔진에서는 빈 데이터와 동일하게 취급)
    #[error("data source error: {0}")]
    DataSource(String),
}
