//! 포트폴리오별 전략 파라미터.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PoolKind;
use crate::error::CoreError;

/// 한 포트폴리오 분류의 불변 전략 파라미터.
///
/// 기동 시 한 번 로드되어 런타임에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// 이동평균 기간 (일)
    pub ma_period: usize,
    /// 신호 확인에 필요한 연속 세션 수
    pub confirm_days: usize,
    /// 최초 진입 비중
    pub initial_position: Decimal,
    /// 추가 매수 비중 (순서대로 적용)
    pub add_position: Vec<Decimal>,
    /// 고정 손절 비율
    pub stop_loss_ratio: Decimal,
    /// 트레일링 스탑 스텝 비율
    pub tracking_stop_ratio: Decimal,
    /// 최대 보유 비중
    pub max_position: Decimal,
}

impl StrategyParams {
    /// 안정 운용 기본 파라미터 (20일선, 3일 확인, 30% 진입).
    pub fn stable() -> Self {
        Self {
            ma_period: 20,
            confirm_days: 3,
            initial_position: Decimal::new(3, 1),
            add_position: vec![Decimal::new(2, 1), Decimal::new(1, 1)],
            stop_loss_ratio: Decimal::new(15, 2),
            tracking_stop_ratio: Decimal::new(5, 2),
            max_position: Decimal::new(7, 1),
        }
    }

    /// 공격 운용 기본 파라미터 (확인 기간이 짧고 비중이 작음).
    pub fn aggressive() -> Self {
        Self {
            ma_period: 20,
            confirm_days: 2,
            initial_position: Decimal::new(2, 1),
            add_position: vec![Decimal::new(15, 2)],
            stop_loss_ratio: Decimal::new(15, 2),
            tracking_stop_ratio: Decimal::new(3, 2),
            max_position: Decimal::new(5, 1),
        }
    }

    /// 파라미터 정합성 검사.
    ///
    /// 실패는 기동 시 치명적 에러로 취급해야 합니다.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ma_period < 2 {
            return Err(CoreError::InvalidParams(format!(
                "ma_period must be >= 2, got {}",
                self.ma_period
            )));
        }
        if self.confirm_days == 0 {
            return Err(CoreError::InvalidParams(
                "confirm_days must be >= 1".into(),
            ));
        }
        if self.confirm_days > self.ma_period {
            return Err(CoreError::InvalidParams(format!(
                "confirm_days ({}) must not exceed ma_period ({})",
                self.confirm_days, self.ma_period
            )));
        }
        let one = Decimal::ONE;
        if self.initial_position <= Decimal::ZERO || self.initial_position > one {
            return Err(CoreError::InvalidParams(format!(
                "initial_position must be in (0, 1], got {}",
                self.initial_position
            )));
        }
        if self.max_position <= Decimal::ZERO || self.max_position > one {
            return Err(CoreError::InvalidParams(format!(
                "max_position must be in (0, 1], got {}",
                self.max_position
            )));
        }
        let total: Decimal = self.initial_position + self.add_position.iter().sum::<Decimal>();
        if total > self.max_position {
            return Err(CoreError::InvalidParams(format!(
                "initial + add positions ({}) exceed max_position ({})",
                total, self.max_position
            )));
        }
        for ratio in [self.stop_loss_ratio, self.tracking_stop_ratio] {
            if ratio <= Decimal::ZERO || ratio >= one {
                return Err(CoreError::InvalidParams(format!(
                    "stop ratios must be in (0, 1), got {}",
                    ratio
                )));
            }
        }
        Ok(())
    }
}

/// 두 포트폴리오 분류의 파라미터 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParamsSet {
    /// 안정 운용 파라미터
    pub stable: StrategyParams,
    /// 공격 운용 파라미터
    pub aggressive: StrategyParams,
}

impl Default for StrategyParamsSet {
    fn default() -> Self {
        Self {
            stable: StrategyParams::stable(),
            aggressive: StrategyParams::aggressive(),
        }
    }
}

impl StrategyParamsSet {
    /// 분류별 파라미터 조회.
    pub fn get(&self, kind: PoolKind) -> &StrategyParams {
        match kind {
            PoolKind::Stable => &self.stable,
            PoolKind::Aggressive => &self.aggressive,
        }
    }

    /// 두 분류 모두 검증.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.stable.validate()?;
        self.aggressive.validate()
    }
}
