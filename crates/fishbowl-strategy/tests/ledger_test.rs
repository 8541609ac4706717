//! 거래 원장·포지션 스냅샷 저장소 테스트.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use fishbowl_core::{PoolKind, Position, TradeAction, Transaction};
use fishbowl_strategy::{Ledger, PositionBook};

static SEQ: AtomicUsize = AtomicUsize::new(0);

fn temp_path(name: &str) -> PathBuf {
    let seq = SEQ.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "fishbowl-ledger-test-{}-{}-{}.json",
        std::process::id(),
        seq,
        name
    ))
}

fn tx(action: TradeAction, code: &str, pool: PoolKind, day: u32) -> Transaction {
    Transaction {
        action,
        etf_code: code.to_string(),
        etf_name: "沪深300ETF".to_string(),
        price: dec!(10.0),
        position: dec!(0.3),
        reason: "3天站稳20日均线".to_string(),
        profit_ratio: if action == TradeAction::Sell {
            Some(dec!(0.05))
        } else {
            None
        },
        pool,
        timestamp: Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap(),
    }
}

fn buy_at(code: &str, pool: PoolKind, price: rust_decimal::Decimal) -> Transaction {
    Transaction {
        price,
        ..tx(TradeAction::Buy, code, pool, 2)
    }
}

#[test]
fn test_history_keeps_insertion_order() {
    let mut ledger = Ledger::in_memory();
    ledger.record(tx(TradeAction::Buy, "510300", PoolKind::Stable, 2)).unwrap();
    ledger.record(tx(TradeAction::Sell, "510300", PoolKind::Stable, 10)).unwrap();
    ledger.record(tx(TradeAction::Buy, "512880", PoolKind::Stable, 16)).unwrap();

    let all = ledger.history(None, None);
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].etf_code, "510300");
    assert_eq!(all[0].action, TradeAction::Buy);
    assert_eq!(all[2].etf_code, "512880");
}

#[test]
fn test_history_date_bounds_are_inclusive() {
    let mut ledger = Ledger::in_memory();
    ledger.record(tx(TradeAction::Buy, "510300", PoolKind::Stable, 2)).unwrap();
    ledger.record(tx(TradeAction::Sell, "510300", PoolKind::Stable, 10)).unwrap();
    ledger.record(tx(TradeAction::Buy, "512880", PoolKind::Stable, 16)).unwrap();

    let from = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let to = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();

    let tail = ledger.history(Some(from), None);
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].action, TradeAction::Sell);

    let head = ledger.history(None, Some(from));
    assert_eq!(head.len(), 2);

    let window = ledger.history(Some(from), Some(to));
    assert_eq!(window.len(), 2);

    let none = ledger.history(Some(to), Some(from));
    assert!(none.is_empty());
}

#[test]
fn test_highest_buy_price_is_max_not_latest() {
    let mut ledger = Ledger::in_memory();
    ledger.record(buy_at("510300", PoolKind::Stable, dec!(10.0))).unwrap();
    ledger.record(buy_at("510300", PoolKind::Stable, dec!(12.0))).unwrap();
    ledger.record(buy_at("510300", PoolKind::Stable, dec!(11.0))).unwrap();
    // 다른 분류·종목과 매도 기록은 집계 대상이 아님
    ledger.record(buy_at("510300", PoolKind::Aggressive, dec!(15.0))).unwrap();
    ledger.record(tx(TradeAction::Sell, "510300", PoolKind::Stable, 20)).unwrap();

    assert_eq!(
        ledger.highest_buy_price(PoolKind::Stable, "510300"),
        Some(dec!(12.0))
    );
    assert_eq!(
        ledger.highest_buy_price(PoolKind::Aggressive, "510300"),
        Some(dec!(15.0))
    );
    assert_eq!(ledger.highest_buy_price(PoolKind::Stable, "512880"), None);
}

#[test]
fn test_ledger_survives_reopen() {
    let path = temp_path("ledger-reopen");
    {
        let mut ledger = Ledger::open(&path).unwrap();
        assert!(ledger.is_empty());
        ledger.record(tx(TradeAction::Buy, "510300", PoolKind::Stable, 2)).unwrap();
        ledger.record(tx(TradeAction::Sell, "510300", PoolKind::Stable, 10)).unwrap();
    }
    let reopened = Ledger::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    let all = reopened.history(None, None);
    assert_eq!(all[0].action, TradeAction::Buy);
    assert_eq!(all[1].action, TradeAction::Sell);
    assert_eq!(all[1].profit_ratio, Some(dec!(0.05)));
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_position_book_survives_reopen() {
    let path = temp_path("book-reopen");
    {
        let mut book = PositionBook::open(&path).unwrap();
        assert!(book.get(PoolKind::Stable).is_flat());
        book.set(
            PoolKind::Stable,
            Position::opened("510300", dec!(0.3), dec!(10.0), dec!(8.5)),
        )
        .unwrap();
    }
    let reopened = PositionBook::open(&path).unwrap();
    let pos = reopened.get(PoolKind::Stable);
    assert!(pos.holds("510300"));
    assert_eq!(pos.stop_loss, dec!(8.5));
    assert!(reopened.get(PoolKind::Aggressive).is_flat());
    std::fs::remove_file(&path).ok();
}
