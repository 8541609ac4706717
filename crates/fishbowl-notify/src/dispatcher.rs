//! 배송 워커와 큐잉.
//!
//! 본채널 큐와 재시도 큐를 단일 워커가 소비합니다.
//!
//! - 본채널은 FIFO이고 연속 전송 사이에 최소 간격(기본 60초)을
//!   보장합니다. 간격은 직전 전송 시도 시점부터 측정합니다.
//! - 거래시간 안에서는 재시도 큐가 본채널보다 먼저 소비됩니다.
//! - 전송 실패 시 거래시간 안이면 재시도 큐 뒤에 붙고, 밖이면 경고와
//!   함께 버립니다.
//! - 큐가 비면 `Notify` 웨이크 또는 폴백 틱(기본 1초)까지 대기합니다.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fishbowl_core::{ExecutionResult, IpoListing, PoolEtf, PoolKind};

use crate::format;
use crate::trading_hours::TradingHours;
use crate::types::{Clock, MessageSender, OutboundMessage, SystemClock};

/// 배송 파이프라인 설정.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// 본채널 연속 전송 사이의 최소 간격
    pub message_interval: Duration,
    /// 큐가 비었을 때의 폴백 틱
    pub idle_poll: Duration,
    /// 재시도 메시지 처리 후의 짧은 지연
    pub retry_delay: Duration,
    /// 재시도 메시지 만료 기한. `None`이면 만료 없음.
    pub retry_expiry: Option<Duration>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            message_interval: Duration::from_secs(60),
            idle_poll: Duration::from_secs(1),
            retry_delay: Duration::from_secs(1),
            retry_expiry: None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn preview(content: &str) -> String {
    content.chars().take(20).collect()
}

struct Inner<S, C> {
    sender: S,
    clock: C,
    hours: TradingHours,
    config: NotifierConfig,
    primary: Mutex<VecDeque<OutboundMessage>>,
    retry: Mutex<VecDeque<OutboundMessage>>,
    wake: Notify,
}

impl<S, C: Clock> Inner<S, C> {
    /// 재시도 큐에서 만료되지 않은 첫 메시지를 꺼냅니다.
    fn pop_retry(&self) -> Option<OutboundMessage> {
        let now = self.clock.now();
        let mut retry = lock(&self.retry);
        while let Some(msg) = retry.pop_front() {
            if let Some(expiry) = self.config.retry_expiry {
                let age = now.signed_duration_since(msg.enqueued_at);
                if age.to_std().map_or(false, |age| age > expiry) {
                    warn!(preview = %preview(&msg.content), "retry message expired, purged");
                    continue;
                }
            }
            return Some(msg);
        }
        None
    }
}

/// 알림 배송기.
///
/// 큐잉은 동기·논블로킹이고 배송은 백그라운드 워커가 담당합니다.
/// `start()`/`stop()` 모두 멱등입니다.
pub struct Notifier<S, C = SystemClock> {
    inner: Arc<Inner<S, C>>,
    cancel: Mutex<Option<CancellationToken>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<S: MessageSender + 'static> Notifier<S, SystemClock> {
    /// 시스템 시계로 배송기를 생성합니다.
    pub fn new(sender: S, hours: TradingHours, config: NotifierConfig) -> Self {
        Self::with_clock(sender, SystemClock, hours, config)
    }
}

impl<S: MessageSender + 'static, C: Clock + 'static> Notifier<S, C> {
    /// 시계를 주입해 배송기를 생성합니다 (테스트용).
    pub fn with_clock(sender: S, clock: C, hours: TradingHours, config: NotifierConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                sender,
                clock,
                hours,
                config,
                primary: Mutex::new(VecDeque::new()),
                retry: Mutex::new(VecDeque::new()),
                wake: Notify::new(),
            }),
            cancel: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    /// 배송 워커를 기동합니다. 이미 기동 중이면 아무 일도 하지
    /// 않습니다.
    pub fn start(&self) {
        let mut cancel = lock(&self.cancel);
        if cancel.is_some() {
            debug!("notifier already running");
            return;
        }
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_worker(Arc::clone(&self.inner), token.clone()));
        *cancel = Some(token);
        *lock(&self.worker) = Some(handle);
        info!("notifier started");
    }

    /// 워커를 중지하고 종료를 기다립니다. 미발송 메시지는 큐에
    /// 남습니다. 기동 전이거나 이미 중지된 상태면 아무 일도 하지
    /// 않습니다.
    pub async fn stop(&self) {
        let token = lock(&self.cancel).take();
        let Some(token) = token else {
            return;
        };
        token.cancel();
        let handle = lock(&self.worker).take();
        if let Some(handle) = handle {
            if handle.await.is_err() {
                warn!("notifier worker panicked");
            }
        }
        info!(pending = self.pending(), "notifier stopped");
    }

    /// 본채널 큐에 메시지를 추가합니다. 논블로킹.
    pub fn enqueue(&self, content: impl Into<String>) {
        let msg = OutboundMessage::new(content, self.inner.clock.now());
        info!(preview = %preview(&msg.content), "message queued");
        lock(&self.inner.primary).push_back(msg);
        self.inner.wake.notify_one();
    }

    /// 재시도 큐에 메시지를 추가합니다. 논블로킹.
    pub fn enqueue_retry(&self, content: impl Into<String>) {
        let msg = OutboundMessage::retry(content, self.inner.clock.now());
        info!(preview = %preview(&msg.content), "retry message queued");
        lock(&self.inner.retry).push_back(msg);
        self.inner.wake.notify_one();
    }

    /// 두 큐에 남아 있는 메시지 수.
    pub fn pending(&self) -> usize {
        lock(&self.inner.primary).len() + lock(&self.inner.retry).len()
    }

    /// 전략 실행 결과를 큐잉합니다. 실패 결과는 보내지 않습니다.
    pub fn notify_execution(&self, result: &ExecutionResult, pool: PoolKind) {
        if !result.is_success() {
            warn!(%pool, message = %result.message(), "execution failed, notification skipped");
            return;
        }
        self.enqueue(format::execution_message(result, pool, self.inner.clock.now()));
    }

    /// 주간 풀 구성을 종목당 한 건씩 큐잉합니다 (분류별 최대 5건).
    pub fn notify_pool(&self, pool: PoolKind, etfs: &[PoolEtf]) {
        for etf in etfs.iter().take(5) {
            self.enqueue(format::pool_message(etf, pool, self.inner.clock.now()));
        }
    }

    /// 신규 상장 안내를 건당 한 메시지로 큐잉합니다.
    pub fn notify_ipo(&self, listings: &[IpoListing]) {
        for listing in listings {
            self.enqueue(format::ipo_message(listing, self.inner.clock.now()));
        }
    }
}

async fn run_worker<S: MessageSender, C: Clock>(inner: Arc<Inner<S, C>>, cancel: CancellationToken) {
    let mut last_attempt: Option<Instant> = None;

    loop {
        if cancel.is_cancelled() {
            break;
        }

        // 거래시간 안에서는 재시도 큐 우선
        if inner.hours.contains(inner.clock.now()) {
            if let Some(msg) = inner.pop_retry() {
                if let Err(e) = inner.sender.send(&msg).await {
                    warn!(sender = inner.sender.name(), error = %e, "retry send failed, re-queued");
                    lock(&inner.retry).push_back(msg);
                } else {
                    info!(sender = inner.sender.name(), "retry message delivered");
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = time::sleep(inner.config.retry_delay) => {}
                }
                continue;
            }
        }

        let msg = lock(&inner.primary).pop_front();
        if let Some(msg) = msg {
            // 직전 전송 시도로부터 최소 간격 보장
            if let Some(last) = last_attempt {
                let elapsed = last.elapsed();
                if elapsed < inner.config.message_interval {
                    let wait = inner.config.message_interval - elapsed;
                    debug!(wait_secs = wait.as_secs_f64(), "message interval not elapsed, waiting");
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            // 미발송 메시지는 버리지 않고 큐 앞에 되돌린다
                            lock(&inner.primary).push_front(msg);
                            break;
                        }
                        _ = time::sleep(wait) => {}
                    }
                }
            }

            last_attempt = Some(Instant::now());
            if let Err(e) = inner.sender.send(&msg).await {
                if inner.hours.contains(inner.clock.now()) {
                    warn!(sender = inner.sender.name(), error = %e, "send failed, queued for retry");
                    lock(&inner.retry).push_back(OutboundMessage {
                        is_retry: true,
                        ..msg
                    });
                } else {
                    warn!(sender = inner.sender.name(), error = %e, "send failed outside trading hours, dropped");
                }
            } else {
                info!(sender = inner.sender.name(), "message delivered");
            }
            continue;
        }

        // 큐가 비었으면 웨이크 또는 폴백 틱까지 대기
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = inner.wake.notified() => {}
            _ = time::sleep(inner.config.idle_poll) => {}
        }
    }
    debug!("notifier worker exited");
}
