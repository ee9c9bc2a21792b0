//! 聊天同步引擎核心领域模型
//!
//! 包含房间、消息等核心实体，以及仓储接口和领域错误定义。
//! 身份与会话管理由外部提供方负责，这里只消费不透明的 `UserIdentity`。

pub mod errors;
pub mod identity;
pub mod message;
pub mod repositories;
pub mod room;
pub mod value_objects;

// 重新导出常用类型
pub use errors::{DomainError, DomainResult, RepositoryError, RepositoryResult};
pub use identity::{AuthorSnapshot, UserIdentity};
pub use message::Message;
pub use repositories::{MessageRepository, RoomRepository};
pub use room::Room;
pub use value_objects::{InviteToken, MessageId, RoomId, Timestamp};
