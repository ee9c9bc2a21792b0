//! 领域模型错误定义
//!
//! 定义领域层和仓储层的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 房间相关错误
    #[error("房间错误: {message}")]
    RoomError { message: String },

    /// 消息相关错误
    #[error("消息错误: {message}")]
    MessageError { message: String },

    /// 当前状态下不允许的操作
    #[error("操作不被允许: {action}")]
    OperationNotAllowed { action: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建房间错误
    pub fn room_error(message: impl Into<String>) -> Self {
        Self::RoomError {
            message: message.into(),
        }
    }

    /// 创建消息错误
    pub fn message_error(message: impl Into<String>) -> Self {
        Self::MessageError {
            message: message.into(),
        }
    }

    /// 创建操作不允许错误
    pub fn operation_not_allowed(action: impl Into<String>) -> Self {
        Self::OperationNotAllowed {
            action: action.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 仓储层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// 资源不存在
    #[error("资源不存在: {entity} {id}")]
    NotFound { entity: String, id: String },

    /// 底层存储失败
    #[error("存储错误: {0}")]
    Storage(String),
}

impl RepositoryError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// 仓储层结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
