//! PostgreSQL 持久化实现

mod message_repository_impl;
mod room_repository_impl;

pub use message_repository_impl::PgMessageRepository;
pub use room_repository_impl::PgRoomRepository;

use sqlx::postgres::PgPoolOptions;

/// 数据库连接池类型
pub type DbPool = sqlx::PgPool;

/// 创建 PostgreSQL 连接池
pub async fn create_pg_pool(url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// 把 sqlx 错误映射为仓储层错误
pub(crate) fn storage_error(err: sqlx::Error) -> domain::RepositoryError {
    domain::RepositoryError::storage(err.to_string())
}
