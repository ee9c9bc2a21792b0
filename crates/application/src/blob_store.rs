//! 二进制对象存储能力
//!
//! 图片和背景的存放由外部协作方负责，核心只依赖
//! `put(bytes, suggested_name) -> URL` 这一个能力。

use async_trait::async_trait;
use thiserror::Error;

/// 上传错误（配额、网络等）
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadError {
    #[error("上传失败: {0}")]
    Failed(String),
}

impl UploadError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 上传字节并返回可公开访问的URL。
    ///
    /// 上传要么完成要么失败，没有超时控制；失败由调用方上报，
    /// 进行中的动作随之放弃。
    async fn put(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String, UploadError>;
}
