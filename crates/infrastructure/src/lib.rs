//! 基础设施层
//!
//! 提供 PostgreSQL 仓储实现、文件系统对象存储和环境配置。

pub mod blob;
pub mod config;
pub mod db;

pub use blob::FsBlobStore;
pub use config::{AppConfig, BlobConfig, BroadcastConfig, DatabaseConfig, RetentionConfig};
pub use db::{create_pg_pool, DbPool, PgMessageRepository, PgRoomRepository};
