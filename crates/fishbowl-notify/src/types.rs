//! 배송 파이프라인 공용 타입.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 배송 대기 중인 메시지 한 건.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// 전송할 본문 (이미 포매팅 완료)
    pub content: String,
    /// 큐에 들어온 시각. 재시도 만료 판정에 사용.
    pub enqueued_at: DateTime<Utc>,
    /// 재시도 큐를 거친 메시지인지 여부
    pub is_retry: bool,
}

impl OutboundMessage {
    /// 본채널용 메시지를 생성합니다.
    pub fn new(content: impl Into<String>, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            enqueued_at,
            is_retry: false,
        }
    }

    /// 재시도 큐행 메시지를 생성합니다.
    pub fn retry(content: impl Into<String>, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            is_retry: true,
            ..Self::new(content, enqueued_at)
        }
    }
}

/// 전송 실패. 모든 변형이 재시도 가능으로 취급됩니다.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// 네트워크/요청 수준 실패
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Webhook이 200 외의 HTTP 상태를 반환
    #[error("webhook returned HTTP {0}")]
    HttpStatus(u16),
    /// HTTP 200이지만 API 에러 코드가 0이 아님
    #[error("webhook rejected message: errcode={errcode}, errmsg={errmsg}")]
    Api { errcode: i64, errmsg: String },
}

/// 메시지 전송기 추상화.
///
/// 워커는 이 트레이트만 알고 있으므로 테스트에서 가짜 전송기로
/// 교체할 수 있습니다.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// 메시지 한 건을 전송합니다. 성공/실패만 반환하며 재시도는
    /// 호출자(워커)의 책임입니다. `is_retry`로 재전송 여부를 알 수
    /// 있습니다.
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError>;

    /// 전송기 이름 (로그용).
    fn name(&self) -> &str;
}

#[async_trait]
impl<S: MessageSender + ?Sized> MessageSender for Arc<S> {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        (**self).send(message).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// 벽시계 추상화. 거래시간 판정과 만료 계산이 이 시계를 사용하므로
/// 테스트에서 고정 시각을 주입할 수 있습니다.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 UTC 시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors_mark_retry() {
        let now = Utc::now();
        let primary = OutboundMessage::new("普通消息", now);
        assert!(!primary.is_retry);
        assert_eq!(primary.enqueued_at, now);

        let retry = OutboundMessage::retry("重试消息", now);
        assert!(retry.is_retry);
        assert_eq!(retry.content, "重试消息");
    }
}
