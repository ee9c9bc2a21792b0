//! 主应用程序入口
//!
//! 连接数据库、执行迁移，并常驻运行消息保留清扫任务。
//! 会话协调、房间管理等能力以库的形式由 application crate 提供。

use std::sync::Arc;

use application::{Clock, RetentionSweeper, SystemClock};
use domain::MessageRepository;
use infrastructure::{create_pg_pool, AppConfig, PgMessageRepository};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let message_repository: Arc<dyn MessageRepository> =
        Arc::new(PgMessageRepository::new(pg_pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 后台消息保留清扫任务
    let sweeper = RetentionSweeper::new(message_repository, clock);
    let sweep_period = std::time::Duration::from_secs(config.retention.sweep_period_secs);
    tokio::spawn(async move {
        sweeper.run(sweep_period).await;
    });

    tracing::info!("消息保留清扫服务已启动");
    tokio::signal::ctrl_c().await?;
    tracing::info!("收到退出信号，正在关闭");

    Ok(())
}
