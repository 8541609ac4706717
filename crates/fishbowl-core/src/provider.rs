//! 외부 데이터 공급자 trait.
//!
//! 시세 수집·정제와 후보 풀 선별은 별도 시스템이 담당하고,
//! 전략 엔진은 이 동기 조회 인터페이스만 바라봅니다.
//! 평가 사이클이 호출자 스레드에서 동기적으로 돌기 때문에
//! async 경계를 두지 않습니다.

use chrono::NaiveDate;

use crate::domain::{PoolEtf, PoolKind, Quote};
use crate::error::CoreError;

/// 일봉 시세 공급자.
pub trait QuoteProvider: Send + Sync {
    /// 지정 구간의 일봉 시세를 오래된 순으로 반환.
    ///
    /// 데이터가 없으면 빈 벡터를 반환합니다. 엔진은 `Err`도 빈 데이터와
    /// 동일하게 HOLD로 처리하므로 공급자 장애가 평가를 중단시키지
    /// 않습니다.
    fn quotes(
        &self,
        etf_code: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Quote>, CoreError>;
}

/// 후보 풀 공급자.
pub trait CandidatePoolProvider: Send + Sync {
    /// 분류별 현재 후보 풀을 랭킹 순으로 반환.
    ///
    /// 풀이 아직 생성되지 않았으면 빈 벡터를 반환합니다.
    fn current_pool(&self, kind: PoolKind) -> Result<Vec<PoolEtf>, CoreError>;
}
