//! 알림 배송 파이프라인.
//!
//! 전략 실행 결과·주간 풀 구성·신규 상장 안내를 기업용 위챗(企业微信)
//! Webhook으로 전송합니다. 본채널/재시도 큐, 전송 간격 제한, 거래시간
//! 게이트를 가진 단일 워커가 순서를 보장하며 배송합니다.
//!
//! - `types` - 메시지/에러/전송기·시계 트레이트
//! - `trading_hours` - 거래시간 판정 (북경시간 세션 + 휴장일)
//! - `wechat` - 기업용 위챗 Webhook 전송기
//! - `format` - 결정적 메시지 포매팅 (중국어 레이아웃)
//! - `dispatcher` - 큐잉과 배송 워커

pub mod dispatcher;
pub mod format;
pub mod trading_hours;
pub mod types;
pub mod wechat;

pub use dispatcher::{Notifier, NotifierConfig};
pub use trading_hours::TradingHours;
pub use types::{Clock, MessageSender, NotifyError, OutboundMessage, SystemClock};
pub use wechat::{WechatConfig, WechatSender};
