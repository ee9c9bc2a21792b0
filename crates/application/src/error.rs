use domain::{DomainError, RepositoryError};
use thiserror::Error;

use crate::blob_store::UploadError;
use crate::broadcaster::BroadcastError;

/// 应用层错误类型
///
/// 所有错误都在触发动作（发送/删除/兑换/清扫）的边界上报并记录
/// 日志，不做自动重试。
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("领域错误: {0}")]
    Domain(#[from] DomainError),
    #[error("存储错误: {0}")]
    Repository(#[from] RepositoryError),
    #[error("上传错误: {0}")]
    Upload(#[from] UploadError),
    #[error("广播错误: {0}")]
    Broadcast(#[from] BroadcastError),
}

impl ApplicationError {
    /// 是否是验证类错误（空发送、缺失字段）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(DomainError::ValidationError { .. })
        )
    }
}
