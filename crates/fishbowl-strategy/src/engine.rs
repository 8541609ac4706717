//! 어항 모델 신호 엔진.
//!
//! 포트폴리오 분류별 {무포지션, 보유} 상태 기계를 구동합니다.
//!
//! - 무포지션 → 보유 (BUY): 후보 풀에서 추세 강도가 가장 큰 종목이
//!   `confirm_days`일 연속 종가가 `ma_period`일선 위에 있고 이동평균이
//!   상승 중일 때.
//! - 보유 → 무포지션 (SELL): 고정 손절 > 균선 이탈 > 트레일링 스탑
//!   순서로 먼저 충족되는 조건이 사유가 됩니다.
//! - 그 외에는 HOLD. 데이터 부재는 에러가 아니라 HOLD입니다.
//!
//! 평가·실행은 호출자 스레드에서 동기적으로 수행되고, 분류별 포지션은
//! 각각의 뮤텍스로 직렬화되어 동시 호출에도 안전합니다.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use fishbowl_core::indicators::rolling_mean;
use fishbowl_core::{
    CandidatePoolProvider, CoreError, ExecutionResult, PoolEtf, PoolKind, Position, QuoteProvider,
    Signal, StrategyParams, StrategyParamsSet, TradeAction, Transaction,
};

use crate::ledger::{Ledger, LedgerError, PositionBook};

/// 엔진 치명적 에러.
///
/// 데이터 부재·배송 실패는 여기 포함되지 않습니다. 설정 오류와 저장소
/// 장애만이 평가 사이클을 중단시킵니다.
#[derive(Debug, Error)]
pub enum EngineError {
    /// 전략 파라미터 오류 (기동 시 치명적)
    #[error(transparent)]
    Config(#[from] CoreError),
    /// 원장/스냅샷 저장 실패
    #[error(transparent)]
    Storage(#[from] LedgerError),
    /// 복원된 포지션 스냅샷이 무포지션⇔보유 불변식을 위반
    #[error("position snapshot violates flat/held invariant for {0}")]
    CorruptSnapshot(PoolKind),
}

struct Store {
    ledger: Ledger,
    book: PositionBook,
}

/// 어항 모델 전략 엔진.
///
/// 시세/후보 풀 공급자와 저장소를 주입받아 생성합니다. 전역 상태가
/// 없으므로 테스트에서는 가짜 공급자와 메모리 저장소로 격리 가능합니다.
pub struct FishbowlEngine<Q, P> {
    quotes: Q,
    pool: P,
    params: StrategyParamsSet,
    stable: Mutex<Position>,
    aggressive: Mutex<Position>,
    store: Mutex<Store>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).normalize()
}

impl<Q: QuoteProvider, P: CandidatePoolProvider> FishbowlEngine<Q, P> {
    /// 엔진 생성. 파라미터 검증에 실패하거나 복원된 스냅샷이 손상되어
    /// 있으면 치명적 에러를 반환합니다.
    pub fn new(
        quotes: Q,
        pool: P,
        params: StrategyParamsSet,
        ledger: Ledger,
        book: PositionBook,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        for kind in PoolKind::ALL {
            if !book.get(kind).invariant_holds() {
                return Err(EngineError::CorruptSnapshot(kind));
            }
        }
        let stable = book.get(PoolKind::Stable);
        let aggressive = book.get(PoolKind::Aggressive);
        Ok(Self {
            quotes,
            pool,
            params,
            stable: Mutex::new(stable),
            aggressive: Mutex::new(aggressive),
            store: Mutex::new(Store { ledger, book }),
        })
    }

    fn slot(&self, kind: PoolKind) -> &Mutex<Position> {
        match kind {
            PoolKind::Stable => &self.stable,
            PoolKind::Aggressive => &self.aggressive,
        }
    }

    /// 현재 포지션 스냅샷.
    pub fn position(&self, kind: PoolKind) -> Position {
        lock(self.slot(kind)).clone()
    }

    /// 거래 내역 조회. 양쪽 경계가 `None`이면 전체 원장.
    pub fn history(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Transaction> {
        lock(&self.store).ledger.history(start, end)
    }

    /// 현재 상태에서 매매 신호를 평가. 상태를 변경하지 않습니다.
    pub fn evaluate(&self, kind: PoolKind) -> Signal {
        let pos = self.position(kind);
        self.evaluate_position(kind, &pos)
    }

    /// 신호를 평가하고 곧바로 실행. 분류별 포지션 잠금을 사이클 전체
    /// 동안 유지하므로 같은 분류의 동시 호출은 직렬화됩니다.
    pub fn execute(&self, kind: PoolKind) -> Result<ExecutionResult, EngineError> {
        let mut slot = lock(self.slot(kind));
        let signal = self.evaluate_position(kind, &slot);
        self.apply_locked(kind, &mut slot, signal)
    }

    /// 외부에서 평가한 신호를 실행.
    ///
    /// SELL 신호의 종목이 현재 보유와 다르면 상태 변경 없이
    /// `Rejected`를 돌려줍니다.
    pub fn apply(&self, kind: PoolKind, signal: Signal) -> Result<ExecutionResult, EngineError> {
        let mut slot = lock(self.slot(kind));
        self.apply_locked(kind, &mut slot, signal)
    }

    fn evaluate_position(&self, kind: PoolKind, pos: &Position) -> Signal {
        let params = self.params.get(kind);
        let pool = match self.pool.current_pool(kind) {
            Ok(pool) => pool,
            Err(e) => {
                warn!(%kind, error = %e, "candidate pool unavailable");
                Vec::new()
            }
        };
        if pool.is_empty() {
            warn!(%kind, "candidate pool is empty");
            return Signal::hold("", pos.position, "股票池为空");
        }

        // 보유 중이면 매도 조건부터 확인
        if !pos.is_flat() {
            if let Some(signal) = self.check_sell(kind, params, pos) {
                return signal;
            }
        }

        let Some(best) = self.select_best(&pool) else {
            return Signal::hold("", pos.position, "无符合条件的ETF");
        };
        if pos.holds(&best.etf_code) {
            return Signal::hold(best.etf_code.clone(), pos.position, "未触发卖出条件");
        }
        self.check_buy(best, params, pos.position)
    }

    /// 후보 풀에서 추세 강도 (종가 − MA)/MA 최대 종목 선택.
    /// 동률이면 풀의 랭킹 순서를 유지합니다.
    fn select_best<'a>(&self, pool: &'a [PoolEtf]) -> Option<&'a PoolEtf> {
        let mut best: Option<(&PoolEtf, Decimal)> = None;
        for etf in pool {
            let quotes = match self.quotes.quotes(&etf.etf_code, None, None) {
                Ok(quotes) => quotes,
                Err(e) => {
                    warn!(etf_code = %etf.etf_code, error = %e, "quote fetch failed, skipping candidate");
                    continue;
                }
            };
            let Some(last) = quotes.last() else {
                warn!(etf_code = %etf.etf_code, "no quote data, skipping candidate");
                continue;
            };
            let Some(ma) = last.ma else {
                debug!(etf_code = %etf.etf_code, "moving average not formed yet, skipping candidate");
                continue;
            };
            if ma.is_zero() {
                continue;
            }
            let strength = (last.close - ma) / ma;
            if best.map_or(true, |(_, s)| strength > s) {
                best = Some((etf, strength));
            }
        }
        best.map(|(etf, _)| etf)
    }

    fn check_buy(&self, etf: &PoolEtf, params: &StrategyParams, held_position: Decimal) -> Signal {
        let quotes = self
            .quotes
            .quotes(&etf.etf_code, None, None)
            .unwrap_or_default();
        if quotes.len() < params.ma_period {
            warn!(etf_code = %etf.etf_code, sessions = quotes.len(), "insufficient history for trend check");
            return Signal::hold(etf.etf_code.clone(), held_position, "数据不足");
        }
        let closes: Vec<Decimal> = quotes.iter().map(|q| q.close).collect();
        let len = closes.len();
        // 확인 창 전체가 완성된 이동평균 구간 위에 놓여야 하고,
        // 추세 비교를 위한 직전 값도 필요
        if len < params.ma_period + params.confirm_days {
            return Signal::hold(etf.etf_code.clone(), held_position, "未突破均线或趋势未确认");
        }
        let ma = rolling_mean(&closes, params.ma_period);
        let confirm_start = len - params.confirm_days;
        let price_break =
            (confirm_start..len).all(|i| ma[i].map_or(false, |m| closes[i] > m));
        let ma_trend = match (ma[len - 1], ma[len - 2]) {
            (Some(latest), Some(prev)) => latest > prev,
            _ => false,
        };

        if price_break && ma_trend {
            let price = closes[len - 1];
            let stop_loss = price * (Decimal::ONE - params.stop_loss_ratio);
            debug!(etf_code = %etf.etf_code, %price, %stop_loss, "buy signal confirmed");
            return Signal::Buy {
                etf_code: etf.etf_code.clone(),
                etf_name: etf.name.clone(),
                price,
                position: params.initial_position,
                stop_loss,
                reason: format!("{}天站稳{}日均线", params.confirm_days, params.ma_period),
            };
        }
        Signal::hold(etf.etf_code.clone(), held_position, "未突破均线或趋势未确认")
    }

    /// 매도 조건 검사. `Some`은 매도 신호 또는 데이터 부재 HOLD,
    /// `None`은 계속 보유입니다.
    fn check_sell(&self, kind: PoolKind, params: &StrategyParams, pos: &Position) -> Option<Signal> {
        let quotes = match self.quotes.quotes(&pos.etf_code, None, None) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(etf_code = %pos.etf_code, error = %e, "quote fetch failed for held instrument");
                Vec::new()
            }
        };
        let Some(last) = quotes.last() else {
            // 데이터가 없어도 포지션은 강제 청산하지 않는다.
            // 기존 손절가는 다음 유효 데이터 평가까지 유지된다.
            warn!(etf_code = %pos.etf_code, "no quote data for held instrument, holding");
            return Some(Signal::hold(pos.etf_code.clone(), pos.position, "无行情数据"));
        };
        let price = last.close;
        let profit_ratio = if pos.avg_price.is_zero() {
            Decimal::ZERO
        } else {
            (price - pos.avg_price) / pos.avg_price
        };

        // 1. 고정 손절
        if price <= pos.stop_loss {
            return Some(Signal::Sell {
                etf_code: pos.etf_code.clone(),
                price,
                profit_ratio,
                reason: format!("触发固定止损({}%)", percent(params.stop_loss_ratio)),
            });
        }

        // 2. 균선 이탈: 종가가 균선 아래이고 최근 확인 창의 최저 종가도 아래
        let closes: Vec<Decimal> = quotes.iter().map(|q| q.close).collect();
        if let Some(Some(ma)) = rolling_mean(&closes, params.ma_period).last() {
            let confirm = params.confirm_days.min(closes.len());
            let recent_min = closes[closes.len() - confirm..].iter().min().copied();
            if price < *ma && recent_min.map_or(false, |min| min < *ma) {
                return Some(Signal::Sell {
                    etf_code: pos.etf_code.clone(),
                    price,
                    profit_ratio,
                    reason: format!("{}天跌破{}日均线", params.confirm_days, params.ma_period),
                });
            }
        }

        // 3. 트레일링 스탑: 원장 내 최고 매수가 기준.
        //    BUY 기록이 없으면 적용하지 않는다.
        let max_buy = lock(&self.store)
            .ledger
            .highest_buy_price(kind, &pos.etf_code);
        if let Some(max_buy) = max_buy {
            if max_buy * (Decimal::ONE - params.tracking_stop_ratio) > price {
                return Some(Signal::Sell {
                    etf_code: pos.etf_code.clone(),
                    price,
                    profit_ratio,
                    reason: format!("触发跟踪止损({}%)", percent(params.tracking_stop_ratio)),
                });
            }
        }
        None
    }

    fn apply_locked(
        &self,
        kind: PoolKind,
        slot: &mut Position,
        signal: Signal,
    ) -> Result<ExecutionResult, EngineError> {
        match signal {
            Signal::Hold {
                etf_code,
                position,
                reason,
            } => Ok(ExecutionResult::Held {
                etf_code,
                position,
                message: reason,
            }),
            Signal::Sell {
                etf_code,
                price,
                profit_ratio,
                reason,
            } => self.apply_sell(kind, slot, etf_code, price, profit_ratio, reason),
            Signal::Buy {
                etf_code,
                etf_name,
                price,
                position,
                stop_loss,
                reason,
            } => {
                // 다른 종목 보유 중이면 먼저 청산 (회전 매매)
                if !slot.is_flat() && slot.etf_code != etf_code {
                    let held_code = slot.etf_code.clone();
                    let held_quotes = self.quotes.quotes(&held_code, None, None).unwrap_or_default();
                    let Some(last) = held_quotes.last() else {
                        warn!(etf_code = %held_code, "no quote data for held instrument, rotation skipped");
                        return Ok(ExecutionResult::Held {
                            etf_code: held_code,
                            position: slot.position,
                            message: "无行情数据，暂不换仓".into(),
                        });
                    };
                    let held_price = last.close;
                    let held_profit = if slot.avg_price.is_zero() {
                        Decimal::ZERO
                    } else {
                        (held_price - slot.avg_price) / slot.avg_price
                    };
                    let sold = self.apply_sell(
                        kind,
                        slot,
                        held_code,
                        held_price,
                        held_profit,
                        "换仓操作".into(),
                    )?;
                    if !sold.is_success() {
                        return Ok(sold);
                    }
                }
                if !slot.is_flat() {
                    // 동일 종목 재진입은 없음
                    return Ok(ExecutionResult::Held {
                        etf_code,
                        position: slot.position,
                        message: "未触发交易条件".into(),
                    });
                }

                *slot = Position::opened(etf_code.clone(), position, price, stop_loss);
                {
                    let mut store = lock(&self.store);
                    store.ledger.record(Transaction {
                        action: TradeAction::Buy,
                        etf_code: etf_code.clone(),
                        etf_name: etf_name.clone(),
                        price,
                        position,
                        reason: reason.clone(),
                        profit_ratio: None,
                        pool: kind,
                        timestamp: Utc::now(),
                    })?;
                    store.book.set(kind, slot.clone())?;
                }
                info!(%kind, %etf_code, %price, %position, "buy executed");
                Ok(ExecutionResult::Bought {
                    message: format!("买入{}，仓位{}%", etf_code, percent(position)),
                    etf_code,
                    etf_name,
                    price,
                    position,
                    stop_loss,
                })
            }
        }
    }

    fn apply_sell(
        &self,
        kind: PoolKind,
        slot: &mut Position,
        etf_code: String,
        price: Decimal,
        profit_ratio: Decimal,
        reason: String,
    ) -> Result<ExecutionResult, EngineError> {
        if !slot.holds(&etf_code) {
            error!(%kind, held = %slot.etf_code, signal = %etf_code, "position mismatch, sell rejected");
            return Ok(ExecutionResult::Rejected {
                action: TradeAction::Sell,
                etf_code,
                message: "持仓不匹配".into(),
            });
        }
        {
            let mut store = lock(&self.store);
            store.ledger.record(Transaction {
                action: TradeAction::Sell,
                etf_code: etf_code.clone(),
                etf_name: String::new(),
                price,
                position: slot.position,
                reason: reason.clone(),
                profit_ratio: Some(profit_ratio),
                pool: kind,
                timestamp: Utc::now(),
            })?;
            *slot = Position::flat();
            store.book.set(kind, slot.clone())?;
        }
        info!(%kind, %etf_code, %price, %profit_ratio, "sell executed");
        Ok(ExecutionResult::Sold {
            message: format!("卖出{}，{}", etf_code, reason),
            etf_code,
            price,
            profit_ratio,
        })
    }
}
