//! 기업용 위챗(企业微信) Webhook 전송기.
//!
//! 텍스트 메시지를 `{"msgtype":"text","text":{"content":…}}` 형식으로
//! POST 합니다. HTTP 200이면서 응답 본문의 `errcode`가 0일 때만
//! 성공입니다.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::types::{MessageSender, NotifyError, OutboundMessage};

/// 전송기 설정.
#[derive(Debug, Clone)]
pub struct WechatConfig {
    /// Webhook URL (key 포함)
    pub webhook_url: String,
    /// 전송 활성화 여부
    pub enabled: bool,
}

impl WechatConfig {
    /// 새 설정을 생성합니다.
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            enabled: true,
        }
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// `WECHAT_WEBHOOK`이 없으면 `None`. `WECHAT_ENABLED=false`로
    /// 비활성화할 수 있습니다.
    pub fn from_env() -> Option<Self> {
        let webhook_url = std::env::var("WECHAT_WEBHOOK").ok()?;
        let enabled = std::env::var("WECHAT_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);
        Some(Self {
            webhook_url,
            enabled,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// 기업용 위챗 전송기.
pub struct WechatSender {
    config: WechatConfig,
    client: reqwest::Client,
}

impl WechatSender {
    /// 새 전송기를 생성합니다.
    pub fn new(config: WechatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 환경 변수에서 전송기를 생성합니다.
    pub fn from_env() -> Option<Self> {
        WechatConfig::from_env().map(Self::new)
    }

    /// 전송 가능 상태인지 확인합니다.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.webhook_url.is_empty()
    }

    async fn post(&self, content: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "msgtype": "text",
            "text": { "content": content }
        });

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            error!(status, "wechat webhook returned non-200 status");
            return Err(NotifyError::HttpStatus(status));
        }

        let body: WebhookResponse = response.json().await?;
        if body.errcode != 0 {
            error!(errcode = body.errcode, errmsg = %body.errmsg, "wechat webhook rejected message");
            return Err(NotifyError::Api {
                errcode: body.errcode,
                errmsg: body.errmsg,
            });
        }

        info!("wechat message delivered");
        Ok(())
    }
}

#[async_trait]
impl MessageSender for WechatSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        if !self.is_enabled() {
            debug!("wechat sender disabled, message skipped");
            return Ok(());
        }
        if message.is_retry {
            debug!("re-sending previously failed message");
        }
        self.post(&message.content).await
    }

    fn name(&self) -> &str {
        "wechat"
    }
}
