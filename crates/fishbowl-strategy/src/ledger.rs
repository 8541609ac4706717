//! 거래 원장과 포지션 스냅샷 저장소.
//!
//! 둘 다 JSON 파일 하나로 영속화되며 프로세스 재기동 후에도 그대로
//! 복원됩니다. 파일 경로 없이 `in_memory()`로 만들면 영속화 없이
//! 동작합니다 (테스트용).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use fishbowl_core::{PoolKind, Position, TradeAction, Transaction};

/// 저장소 에러. 기록 실패는 상위에서 치명적 에러로 취급합니다.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// 파일 입출력 실패
    #[error("ledger storage io error: {0}")]
    Io(#[from] std::io::Error),
    /// 직렬화/역직렬화 실패
    #[error("ledger serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T, LedgerError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw)?;
    Ok(())
}

/// 추가 전용 거래 원장.
///
/// 삽입 순서가 곧 저장 순서이며, 기록은 수정·삭제되지 않습니다.
#[derive(Debug)]
pub struct Ledger {
    path: Option<PathBuf>,
    entries: Vec<Transaction>,
}

impl Ledger {
    /// 파일 기반 원장을 연다. 파일이 없으면 빈 원장으로 시작.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries: Vec<Transaction> = load_json(&path)?;
        info!(count = entries.len(), path = %path.display(), "transaction ledger loaded");
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// 영속화 없는 메모리 원장.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
        }
    }

    /// 거래 한 건을 추가하고 즉시 영속화.
    pub fn record(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        debug!(action = %tx.action, etf_code = %tx.etf_code, pool = %tx.pool, "recording transaction");
        self.entries.push(tx);
        if let Some(path) = &self.path {
            save_json(path, &self.entries)?;
        }
        Ok(())
    }

    /// 날짜 구간으로 거래 내역을 조회 (삽입 순서 유지).
    ///
    /// 양쪽 경계가 모두 `None`이면 필터 없이 전체 원장을 반환합니다.
    pub fn history(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Transaction> {
        self.entries
            .iter()
            .filter(|tx| {
                let date = tx.timestamp.date_naive();
                start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
            })
            .cloned()
            .collect()
    }

    /// 해당 분류·종목의 BUY 기록 중 최고 매수가.
    ///
    /// BUY 기록이 없으면 `None` — 호출자는 트레일링 스탑을 적용하지
    /// 않아야 합니다.
    pub fn highest_buy_price(&self, pool: PoolKind, etf_code: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .filter(|tx| {
                tx.action == TradeAction::Buy && tx.pool == pool && tx.etf_code == etf_code
            })
            .map(|tx| tx.price)
            .max()
    }

    /// 기록 건수.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 원장이 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 포트폴리오 분류별 현재 포지션 스냅샷.
#[derive(Debug)]
pub struct PositionBook {
    path: Option<PathBuf>,
    positions: HashMap<PoolKind, Position>,
}

impl PositionBook {
    /// 파일 기반 스냅샷을 연다. 파일이 없으면 전 분류 무포지션.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let positions: HashMap<PoolKind, Position> = load_json(&path)?;
        info!(path = %path.display(), "position book loaded");
        Ok(Self {
            path: Some(path),
            positions,
        })
    }

    /// 영속화 없는 메모리 스냅샷.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            positions: HashMap::new(),
        }
    }

    /// 분류별 현재 포지션 (없으면 무포지션).
    pub fn get(&self, kind: PoolKind) -> Position {
        self.positions.get(&kind).cloned().unwrap_or_default()
    }

    /// 포지션을 갱신하고 즉시 영속화.
    pub fn set(&mut self, kind: PoolKind, position: Position) -> Result<(), LedgerError> {
        self.positions.insert(kind, position);
        if let Some(path) = &self.path {
            save_json(path, &self.positions)?;
        }
        Ok(())
    }
}
