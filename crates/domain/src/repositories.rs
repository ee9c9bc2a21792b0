//! 仓储接口定义
//!
//! 持久化存储的抽象：点查、按创建时间排序的范围扫描、插入、
//! 删除以及条件删除（保留策略清扫使用）。具体实现见 infrastructure。

use async_trait::async_trait;

use crate::errors::RepositoryResult;
use crate::message::Message;
use crate::room::Room;
use crate::value_objects::{InviteToken, MessageId, RoomId, Timestamp};

/// 房间仓储接口
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 创建房间
    async fn create(&self, room: Room) -> RepositoryResult<Room>;

    /// 根据ID查找房间
    async fn find_by_id(&self, id: RoomId) -> RepositoryResult<Option<Room>>;

    /// 根据邀请令牌查找房间
    async fn find_by_invite_token(&self, token: &InviteToken) -> RepositoryResult<Option<Room>>;

    /// 列出某身份参与的全部房间（作为创建者或第二参与者）
    async fn list_for_identity(&self, email: &str) -> RepositoryResult<Vec<Room>>;

    /// 绑定第二位参与者（无条件更新，最后写入者胜出）
    async fn bind_second_identity(&self, id: RoomId, email: &str) -> RepositoryResult<()>;

    /// 更新聊天背景
    async fn update_background(&self, id: RoomId, url: &str) -> RepositoryResult<()>;

    /// 更新房间头像
    async fn update_avatar(&self, id: RoomId, url: &str) -> RepositoryResult<()>;

    /// 删除房间（级联删除其消息）
    async fn delete(&self, id: RoomId) -> RepositoryResult<()>;
}

/// 消息仓储接口
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 插入新消息
    async fn insert(&self, message: Message) -> RepositoryResult<Message>;

    /// 根据ID查找消息
    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>>;

    /// 获取房间全部消息，按创建时间升序
    async fn list_by_room(&self, room_id: RoomId) -> RepositoryResult<Vec<Message>>;

    /// 获取房间最新一条消息（列表预览用）
    async fn latest_by_room(&self, room_id: RoomId) -> RepositoryResult<Option<Message>>;

    /// 删除单条消息
    async fn delete_by_id(&self, id: MessageId) -> RepositoryResult<()>;

    /// 删除所有早于给定时刻的消息，跨全部房间，返回删除数量
    async fn delete_created_before(&self, cutoff: Timestamp) -> RepositoryResult<u64>;
}
