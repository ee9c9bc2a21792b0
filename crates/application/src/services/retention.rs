//! 消息保留策略清扫
//!
//! 周期性后台任务：删除超过保留期限的消息以控制存储增长，
//! 独立于任何打开的会话。清扫不会通知在线会话——本地序列可能
//! 短暂显示已被清除的消息，直到下次重载。

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use domain::{MessageRepository, Timestamp};
use tracing::{error, info};

use crate::clock::Clock;
use crate::error::ApplicationError;

pub struct RetentionSweeper {
    message_repository: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl RetentionSweeper {
    /// 默认每天清扫一次
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn new(message_repository: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_repository,
            clock,
        }
    }

    /// 消息保留期限：7天
    pub fn retention_age() -> ChronoDuration {
        ChronoDuration::days(7)
    }

    /// 删除所有 `created_at < now - 7天` 的消息，跨全部房间，
    /// 返回删除数量。对同一个 `now` 重复执行是幂等的。
    pub async fn sweep(&self, now: Timestamp) -> Result<u64, ApplicationError> {
        let cutoff = now - Self::retention_age();
        let purged = self.message_repository.delete_created_before(cutoff).await?;
        if purged > 0 {
            info!(purged, %cutoff, "过期消息已清除");
        }
        Ok(purged)
    }

    /// 按固定周期循环清扫。失败只记录日志，下个周期继续。
    pub async fn run(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(err) = self.sweep(self.clock.now()).await {
                error!(error = %err, "保留策略清扫失败");
            }
        }
    }
}
