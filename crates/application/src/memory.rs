//! 内存存储实现（用于测试和简单部署）
//!
//! `InMemoryStore` 同时实现房间和消息两个仓储接口，共享同一份
//! 状态，以便房间删除可以级联清除其消息。生产部署使用
//! infrastructure 中的 PostgreSQL 实现。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use domain::{
    InviteToken, Message, MessageId, MessageRepository, RepositoryResult, Room, RoomId,
    RoomRepository, Timestamp,
};
use tokio::sync::RwLock;

use crate::blob_store::{BlobStore, UploadError};

#[derive(Default)]
struct StoreState {
    rooms: HashMap<RoomId, Room>,
    messages: HashMap<MessageId, Message>,
    /// 房间消息索引：房间ID -> 消息ID列表（插入顺序）
    room_messages: HashMap<RoomId, Vec<MessageId>>,
}

/// 内存中的房间/消息存储
#[derive(Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn create(&self, room: Room) -> RepositoryResult<Room> {
        let mut state = self.state.write().await;
        state.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: RoomId) -> RepositoryResult<Option<Room>> {
        let state = self.state.read().await;
        Ok(state.rooms.get(&id).cloned())
    }

    async fn find_by_invite_token(&self, token: &InviteToken) -> RepositoryResult<Option<Room>> {
        let state = self.state.read().await;
        Ok(state
            .rooms
            .values()
            .find(|room| &room.invite_token == token)
            .cloned())
    }

    async fn list_for_identity(&self, email: &str) -> RepositoryResult<Vec<Room>> {
        let state = self.state.read().await;
        let mut rooms: Vec<Room> = state
            .rooms
            .values()
            .filter(|room| room.is_participant(email))
            .cloned()
            .collect();
        rooms.sort_by_key(|room| room.created_at);
        Ok(rooms)
    }

    async fn bind_second_identity(&self, id: RoomId, email: &str) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let room = state
            .rooms
            .get_mut(&id)
            .ok_or_else(|| domain::RepositoryError::not_found("room", id.to_string()))?;
        room.bind_second_identity(email);
        Ok(())
    }

    async fn update_background(&self, id: RoomId, url: &str) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let room = state
            .rooms
            .get_mut(&id)
            .ok_or_else(|| domain::RepositoryError::not_found("room", id.to_string()))?;
        room.set_background(url);
        Ok(())
    }

    async fn update_avatar(&self, id: RoomId, url: &str) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let room = state
            .rooms
            .get_mut(&id)
            .ok_or_else(|| domain::RepositoryError::not_found("room", id.to_string()))?;
        room.set_avatar(url);
        Ok(())
    }

    async fn delete(&self, id: RoomId) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.rooms.remove(&id);
        // 级联删除房间消息
        if let Some(ids) = state.room_messages.remove(&id) {
            for message_id in ids {
                state.messages.remove(&message_id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert(&self, message: Message) -> RepositoryResult<Message> {
        let mut state = self.state.write().await;
        state
            .room_messages
            .entry(message.room_id)
            .or_default()
            .push(message.id);
        state.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        let state = self.state.read().await;
        Ok(state.messages.get(&id).cloned())
    }

    async fn list_by_room(&self, room_id: RoomId) -> RepositoryResult<Vec<Message>> {
        let state = self.state.read().await;
        let ids = state.room_messages.get(&room_id).cloned().unwrap_or_default();
        let mut messages: Vec<Message> = ids
            .into_iter()
            .filter_map(|id| state.messages.get(&id).cloned())
            .collect();
        messages.sort_by_key(|message| message.created_at);
        Ok(messages)
    }

    async fn latest_by_room(&self, room_id: RoomId) -> RepositoryResult<Option<Message>> {
        let messages = self.list_by_room(room_id).await?;
        Ok(messages.into_iter().next_back())
    }

    async fn delete_by_id(&self, id: MessageId) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if let Some(message) = state.messages.remove(&id) {
            if let Some(ids) = state.room_messages.get_mut(&message.room_id) {
                ids.retain(|message_id| *message_id != id);
            }
        }
        Ok(())
    }

    async fn delete_created_before(&self, cutoff: Timestamp) -> RepositoryResult<u64> {
        let mut state = self.state.write().await;
        let expired: Vec<(MessageId, RoomId)> = state
            .messages
            .values()
            .filter(|message| message.created_at < cutoff)
            .map(|message| (message.id, message.room_id))
            .collect();

        for (message_id, room_id) in &expired {
            state.messages.remove(message_id);
            if let Some(ids) = state.room_messages.get_mut(room_id) {
                ids.retain(|id| id != message_id);
            }
        }
        Ok(expired.len() as u64)
    }
}

/// 内存对象存储：记录上传并返回合成URL，可切换为失败模式。
#[derive(Default)]
pub struct MemoryBlobStore {
    uploads: RwLock<Vec<String>>,
    fail_uploads: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 让后续上传全部失败（模拟配额/网络故障）
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// 已完成的上传文件名
    pub async fn uploaded(&self) -> Vec<String> {
        self.uploads.read().await.clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, _bytes: Vec<u8>, suggested_name: &str) -> Result<String, UploadError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(UploadError::failed("模拟上传失败"));
        }
        let mut uploads = self.uploads.write().await;
        uploads.push(suggested_name.to_string());
        Ok(format!("memory://blobs/{suggested_name}"))
    }
}
