//! 消息实体定义
//!
//! 消息是属于某个房间的不可变聊天内容单元（文本或图片引用），
//! 创建后从不原地更新，只会被作者删除或被保留策略批量清除。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::identity::AuthorSnapshot;
use crate::value_objects::{MessageId, RoomId, Timestamp};

/// 消息实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 消息唯一ID
    pub id: MessageId,
    /// 所属房间ID
    pub room_id: RoomId,
    /// 发送时刻的作者快照（非活引用）
    pub author: AuthorSnapshot,
    /// 文本内容
    pub content: Option<String>,
    /// 附件URL
    pub attachment_ref: Option<String>,
    /// 发送时间
    pub created_at: Timestamp,
}

impl Message {
    /// 创建新消息。
    ///
    /// 每次发送至少要有文本或附件之一；空白文本按缺失处理。
    /// 存储层不强制该约束，校验发生在这里（应用边界）。
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        author: AuthorSnapshot,
        content: Option<String>,
        attachment_ref: Option<String>,
        created_at: Timestamp,
    ) -> DomainResult<Self> {
        let content = content.filter(|c| !c.trim().is_empty());

        if content.is_none() && attachment_ref.is_none() {
            return Err(DomainError::validation_error(
                "content",
                "消息必须包含文本或附件",
            ));
        }

        Ok(Self {
            id,
            room_id,
            author,
            content,
            attachment_ref,
            created_at,
        })
    }

    /// 从存储加载消息（不做验证，入库时已验证）
    pub fn from_parts(
        id: MessageId,
        room_id: RoomId,
        author: AuthorSnapshot,
        content: Option<String>,
        attachment_ref: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            author,
            content,
            attachment_ref,
            created_at,
        }
    }

    /// 是否携带附件
    pub fn has_attachment(&self) -> bool {
        self.attachment_ref.is_some()
    }

    /// 是否由给定邮箱的参与者发送
    pub fn is_authored_by(&self, email: &str) -> bool {
        self.author.email == email
    }
}
