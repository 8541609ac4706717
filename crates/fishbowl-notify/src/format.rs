//! 메시지 포매팅.
//!
//! 모든 함수는 순수합니다: 같은 입력과 시각이면 항상 같은 문자열을
//! 만듭니다. 본문은 중국어 레이아웃이고 시각은 북경시간으로
//! 표시합니다.

use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;
use rust_decimal::Decimal;

use fishbowl_core::{ExecutionResult, IpoListing, PoolEtf, PoolKind};

fn cf_prefix(now: DateTime<Utc>) -> String {
    format!(
        "CF系统时间：{}\n",
        now.with_timezone(&Shanghai).format("%Y-%m-%d %H:%M:%S")
    )
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).normalize()
}

/// 전략 실행 결과 메시지.
pub fn execution_message(result: &ExecutionResult, pool: PoolKind, now: DateTime<Utc>) -> String {
    let prefix = cf_prefix(now);
    let header = format!("【{}策略执行结果】", pool.label());

    match result {
        ExecutionResult::Bought {
            etf_code,
            etf_name,
            price,
            position,
            stop_loss,
            ..
        } => format!(
            "{prefix}{header}\n\
             操作：买入\n\
             ETF代码：{etf_code}\n\
             ETF名称：{etf_name}\n\
             建议价格：{price:.2}元\n\
             建议仓位：{:.0}%\n\
             止损价格：{stop_loss:.2}元\n\
             操作理由：{}",
            position * Decimal::ONE_HUNDRED,
            result.message(),
        ),
        ExecutionResult::Sold {
            etf_code,
            price,
            profit_ratio,
            ..
        } => format!(
            "{prefix}{header}\n\
             操作：卖出\n\
             ETF代码：{etf_code}\n\
             卖出价格：{price:.2}元\n\
             收益：{:.2}%\n\
             操作理由：{}",
            profit_ratio * Decimal::ONE_HUNDRED,
            result.message(),
        ),
        ExecutionResult::Held { position, .. } => format!(
            "{prefix}{header}\n\
             操作：持有\n\
             当前仓位：{:.0}%\n\
             理由：{}",
            position * Decimal::ONE_HUNDRED,
            result.message(),
        ),
        ExecutionResult::Rejected { action, .. } => format!(
            "{prefix}{header}\n\
             操作：{action}\n\
             信息：{}",
            result.message(),
        ),
    }
}

/// 주간 풀 구성 종목 한 건의 메시지.
pub fn pool_message(etf: &PoolEtf, pool: PoolKind, now: DateTime<Utc>) -> String {
    format!(
        "{}【本周{}ETF】\n\
         代码：{}\n\
         名称：{}\n\
         规模：{}亿\n\
         成交额：{}亿\n\
         跟踪误差：{}%\n\
         选择理由：{}",
        cf_prefix(now),
        pool.label(),
        etf.etf_code,
        etf.name,
        etf.fund_size.normalize(),
        etf.avg_volume.normalize(),
        percent(etf.tracking_error),
        etf.selection_reason,
    )
}

/// 신규 상장(新股申购) 안내 메시지.
pub fn ipo_message(listing: &IpoListing, now: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!(
            "CF系统时间：{}",
            now.with_timezone(&Shanghai).format("%Y-%m-%d %H:%M:%S")
        ),
        format!("【{}新股申购】", listing.market),
        format!("名称：{}", listing.name),
        format!("代码：{}", listing.code),
    ];
    for (key, value) in &listing.details {
        lines.push(format!("{key}：{value}"));
    }
    lines.push("\n风险提示：以上信息仅供参考，投资需谨慎".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use fishbowl_core::TradeAction;

    // 북경시간 2025-06-02 10:00:00
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap()
    }

    #[test]
    fn test_buy_message_layout() {
        let result = ExecutionResult::Bought {
            message: "买入510300，仓位30%".to_string(),
            etf_code: "510300".to_string(),
            etf_name: "沪深300ETF".to_string(),
            price: dec!(4.25),
            position: dec!(0.3),
            stop_loss: dec!(3.61),
        };
        let content = execution_message(&result, PoolKind::Stable, fixed_now());
        assert_eq!(
            content,
            "CF系统时间：2025-06-02 10:00:00\n\
             【稳健仓策略执行结果】\n\
             操作：买入\n\
             ETF代码：510300\n\
             ETF名称：沪深300ETF\n\
             建议价格：4.25元\n\
             建议仓位：30%\n\
             止损价格：3.61元\n\
             操作理由：买入510300，仓位30%"
        );
    }

    #[test]
    fn test_sell_message_layout() {
        let result = ExecutionResult::Sold {
            message: "卖出510300，触发固定止损(15%)".to_string(),
            etf_code: "510300".to_string(),
            price: dec!(8.40),
            profit_ratio: dec!(-0.16),
        };
        let content = execution_message(&result, PoolKind::Aggressive, fixed_now());
        assert_eq!(
            content,
            "CF系统时间：2025-06-02 10:00:00\n\
             【激进仓策略执行结果】\n\
             操作：卖出\n\
             ETF代码：510300\n\
             卖出价格：8.40元\n\
             收益：-16.00%\n\
             操作理由：卖出510300，触发固定止损(15%)"
        );
    }

    #[test]
    fn test_hold_message_layout() {
        let result = ExecutionResult::Held {
            etf_code: "510300".to_string(),
            position: dec!(0.3),
            message: "未触发交易条件".to_string(),
        };
        let content = execution_message(&result, PoolKind::Stable, fixed_now());
        assert_eq!(
            content,
            "CF系统时间：2025-06-02 10:00:00\n\
             【稳健仓策略执行结果】\n\
             操作：持有\n\
             当前仓位：30%\n\
             理由：未触发交易条件"
        );
    }

    #[test]
    fn test_rejected_message_layout() {
        let result = ExecutionResult::Rejected {
            action: TradeAction::Sell,
            etf_code: "510300".to_string(),
            message: "持仓不匹配".to_string(),
        };
        let content = execution_message(&result, PoolKind::Stable, fixed_now());
        assert_eq!(
            content,
            "CF系统时间：2025-06-02 10:00:00\n\
             【稳健仓策略执行结果】\n\
             操作：SELL\n\
             信息：持仓不匹配"
        );
    }

    #[test]
    fn test_pool_message_layout() {
        let etf = PoolEtf {
            etf_code: "510300".to_string(),
            name: "沪深300ETF".to_string(),
            industry: "宽基".to_string(),
            fund_size: dec!(950.5),
            avg_volume: dec!(12.3),
            tracking_error: dec!(0.005),
            selection_reason: "流动性充足".to_string(),
        };
        let content = pool_message(&etf, PoolKind::Stable, fixed_now());
        assert_eq!(
            content,
            "CF系统时间：2025-06-02 10:00:00\n\
             【本周稳健仓ETF】\n\
             代码：510300\n\
             名称：沪深300ETF\n\
             规模：950.5亿\n\
             成交额：12.3亿\n\
             跟踪误差：0.5%\n\
             选择理由：流动性充足"
        );
    }

    #[test]
    fn test_ipo_message_has_risk_footer() {
        let listing = IpoListing {
            market: "科创板".to_string(),
            name: "测试科技".to_string(),
            code: "688001".to_string(),
            details: vec![
                ("申购代码".to_string(), "787001".to_string()),
                ("发行价格".to_string(), "12.34".to_string()),
            ],
        };
        let content = ipo_message(&listing, fixed_now());
        assert_eq!(
            content,
            "CF系统时间：2025-06-02 10:00:00\n\
             【科创板新股申购】\n\
             名称：测试科技\n\
             代码：688001\n\
             申购代码：787001\n\
             发行价格：12.34\n\
             \n\
             风险提示：以上信息仅供参考，投资需谨慎"
        );
    }

    #[test]
    fn test_same_input_same_output() {
        let etf = PoolEtf {
            etf_code: "512880".to_string(),
            name: "证券ETF".to_string(),
            industry: "券商".to_string(),
            fund_size: dec!(300),
            avg_volume: dec!(8),
            tracking_error: dec!(0.01),
            selection_reason: "行业代表".to_string(),
        };
        let a = pool_message(&etf, PoolKind::Aggressive, fixed_now());
        let b = pool_message(&etf, PoolKind::Aggressive, fixed_now());
        assert_eq!(a, b);
    }
}
