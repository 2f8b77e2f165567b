// ==========================================
// 门店库存调拨系统 - 存储重试策略
// ==========================================
// 职责: 有界重试 + 线性退避，包裹候选筛选与落库阶段的存储调用
// 说明: 退避通过可注入的 RetryBackoff trait 实现，单测无需真实等待
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// 默认退避基础延迟（毫秒）
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

// ==========================================
// RetryError - 重试耗尽错误
// ==========================================

/// 重试耗尽后的错误，携带操作名与尝试次数
#[derive(Error, Debug)]
#[error("存储操作失败: operation={operation}, attempts={attempts}, 原因: {source}")]
pub struct RetryError {
    pub operation: String,
    pub attempts: u32,
    #[source]
    pub source: RepositoryError,
}

// ==========================================
// RetryBackoff Trait - 可注入退避
// ==========================================

/// 退避等待接口
///
/// 实现者: TokioBackoff（真实等待）、NoDelayBackoff（测试零等待）
#[async_trait]
pub trait RetryBackoff: Send + Sync {
    async fn wait(&self, delay: Duration);
}

/// 生产环境退避：tokio 定时器
pub struct TokioBackoff;

#[async_trait]
impl RetryBackoff for TokioBackoff {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// 测试退避：不等待
pub struct NoDelayBackoff;

#[async_trait]
impl RetryBackoff for NoDelayBackoff {
    async fn wait(&self, _delay: Duration) {}
}

// ==========================================
// RetryPolicy - 有界重试策略
// ==========================================

pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff: Box<dyn RetryBackoff>,
}

impl RetryPolicy {
    /// 构造函数
    ///
    /// # 参数
    /// - max_attempts: 最大尝试次数（>=1）
    /// - base_delay: 退避基础延迟
    /// - backoff: 退避实现
    pub fn new(max_attempts: u32, base_delay: Duration, backoff: Box<dyn RetryBackoff>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff,
        }
    }

    /// 生产默认策略：3 次尝试，线性退避 200ms
    pub fn default_policy() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            Box::new(TokioBackoff),
        )
    }

    /// 测试策略：3 次尝试，零等待
    pub fn no_delay() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            Box::new(NoDelayBackoff),
        )
    }

    /// 执行一个可重试的存储操作
    ///
    /// # 规则
    /// - 最多 max_attempts 次尝试
    /// - 第 n 次失败后等待 n × base_delay（线性退避）
    /// - 仅瞬时错误重试；非瞬时错误立即返回
    /// - 耗尽后返回最后一次错误，附带操作名与尝试次数
    pub async fn run<T, F, Fut>(&self, operation: &str, mut f: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RepositoryResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_transient() || attempt >= self.max_attempts {
                        return Err(RetryError {
                            operation: operation.to_string(),
                            attempts: attempt,
                            source: err,
                        });
                    }

                    let delay = self.base_delay * attempt;
                    warn!(
                        operation = operation,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "存储操作失败，准备重试"
                    );
                    self.backoff.wait(delay).await;
                }
            }
        }
    }
}
