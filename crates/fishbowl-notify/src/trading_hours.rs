//! 거래시간 판정.
//!
//! A주 기준: 평일 09:30-11:30 / 13:00-15:00 (북경시간), 매년 반복되는
//! (월, 일) 휴장일 제외. 재시도 배송과 실패 처리 분기가 이 판정을
//! 따릅니다.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use tracing::warn;

/// 기본 휴장일 (월, 일): 원단, 청명절, 노동절, 국경절.
const DEFAULT_HOLIDAYS: [(u32, u32); 13] = [
    (1, 1),
    (1, 2),
    (1, 3),
    (4, 4),
    (4, 5),
    (5, 1),
    (5, 2),
    (5, 3),
    (10, 1),
    (10, 2),
    (10, 3),
    (10, 4),
    (10, 5),
];

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// 거래시간 테이블.
#[derive(Debug, Clone)]
pub struct TradingHours {
    /// 장중 세션 (시작, 끝). 양 끝 포함.
    sessions: Vec<(NaiveTime, NaiveTime)>,
    /// 매년 반복되는 휴장일 (월, 일)
    holidays: Vec<(u32, u32)>,
    /// 현지 시간대
    tz: Tz,
}

impl Default for TradingHours {
    fn default() -> Self {
        Self {
            sessions: vec![(hm(9, 30), hm(11, 30)), (hm(13, 0), hm(15, 0))],
            holidays: DEFAULT_HOLIDAYS.to_vec(),
            tz: chrono_tz::Asia::Shanghai,
        }
    }
}

impl TradingHours {
    /// 세션·휴장일·시간대를 직접 지정해 생성합니다.
    pub fn new(sessions: Vec<(NaiveTime, NaiveTime)>, holidays: Vec<(u32, u32)>, tz: Tz) -> Self {
        Self {
            sessions,
            holidays,
            tz,
        }
    }

    /// `TRADING_SESSIONS` 환경 변수(`09:30-11:30,13:00-15:00` 형식)로
    /// 세션을 재정의한 기본 테이블. 파싱 실패 시 기본값으로
    /// 되돌아갑니다.
    pub fn from_env() -> Self {
        let mut hours = Self::default();
        if let Ok(raw) = std::env::var("TRADING_SESSIONS") {
            match parse_sessions(&raw) {
                Some(sessions) => hours.sessions = sessions,
                None => warn!(%raw, "invalid TRADING_SESSIONS, using defaults"),
            }
        }
        hours
    }

    /// 주어진 시각이 거래시간인지 판정합니다.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.tz);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        if self.holidays.contains(&(local.month(), local.day())) {
            return false;
        }
        let time = local.time();
        self.sessions
            .iter()
            .any(|(start, end)| time >= *start && time <= *end)
    }
}

/// `09:30-11:30,13:00-15:00` 형식의 세션 문자열을 파싱합니다.
pub fn parse_sessions(raw: &str) -> Option<Vec<(NaiveTime, NaiveTime)>> {
    let mut sessions = Vec::new();
    for part in raw.split(',') {
        let (start, end) = part.trim().split_once('-')?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
        if start >= end {
            return None;
        }
        sessions.push((start, end));
    }
    if sessions.is_empty() {
        None
    } else {
        Some(sessions)
    }
}
