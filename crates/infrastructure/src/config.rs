//! 统一配置中心
//!
//! 从环境变量加载应用配置。DATABASE_URL 是必需项，缺失时直接
//! panic，避免生产环境落到不安全的默认值；其余配置都有默认值。

use std::env;

use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 广播器配置
    pub broadcast: BroadcastConfig,
    /// 对象存储配置
    pub blob: BlobConfig,
    /// 消息保留配置
    pub retention: RetentionConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 广播器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastConfig {
    pub capacity: usize,
}

/// 对象存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    /// 文件落盘根目录
    pub root_dir: String,
    /// 生成公开URL时的前缀
    pub public_base_url: String,
}

/// 消息保留配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// 清扫周期（秒），默认每天一次
    pub sweep_period_secs: u64,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .expect("DATABASE_URL environment variable is required"),
                max_connections: env_parse("DB_MAX_CONNECTIONS", 5),
            },
            broadcast: BroadcastConfig {
                capacity: env_parse("BROADCAST_CAPACITY", 1000),
            },
            blob: BlobConfig {
                root_dir: env::var("BLOB_ROOT_DIR").unwrap_or_else(|_| "./blobs".to_string()),
                public_base_url: env::var("BLOB_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/blobs".to_string()),
            },
            retention: RetentionConfig {
                sweep_period_secs: env_parse("RETENTION_SWEEP_PERIOD_SECS", 24 * 60 * 60),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_falls_back_to_default() {
        assert_eq!(env_parse::<u32>("NO_SUCH_VARIABLE_12345", 7), 7);
    }
}
