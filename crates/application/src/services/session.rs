//! 会话协调器
//!
//! 每个打开的聊天视图对应一个会话：加载初始历史、订阅广播通道、
//! 把到达的插入事件合并进本地有序序列，并把本地动作（发送、删除）
//! 转发给持久化存储。
//!
//! 会话之间不共享任何可变状态，共享资源只有存储和广播通道本身。
//! 本地序列的变更严格按接收顺序应用，不重排、不去重、不批处理。

use std::sync::Arc;

use domain::{
    AuthorSnapshot, DomainError, Message, MessageId, RepositoryError, RoomId, UserIdentity,
};
use tracing::{debug, info};

use crate::blob_store::BlobStore;
use crate::broadcaster::{MessageBroadcaster, MessageInserted, MessageStream};
use crate::clock::Clock;
use crate::error::ApplicationError;
use domain::{MessageRepository, RoomRepository};

/// 会话协调器的外部依赖
pub struct SessionDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub broadcaster: Arc<dyn MessageBroadcaster>,
    pub clock: Arc<dyn Clock>,
}

/// 房间的本地渲染状态（名称与背景）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub name: String,
    pub background_ref: Option<String>,
}

/// 待上传的附件字节
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl AttachmentUpload {
    /// 文件扩展名；文件名不含 `.` 时用 `bin` 兜底
    pub(crate) fn extension(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("bin")
    }
}

/// 发送请求：文本或附件至少其一
#[derive(Debug, Clone, Default)]
pub struct SendMessageRequest {
    pub content: Option<String>,
    pub attachment: Option<AttachmentUpload>,
}

/// 单个房间的会话协调器
pub struct SessionCoordinator {
    deps: SessionDependencies,
    room_id: RoomId,
    identity: UserIdentity,
    view: RoomView,
    transcript: Vec<Message>,
    stream: Option<MessageStream>,
}

impl SessionCoordinator {
    /// 打开房间：拉取全部历史（按创建时间升序）、读取房间名称与
    /// 背景、订阅广播通道。历史加载完成后返回；订阅保持到 `close`。
    pub async fn open(
        deps: SessionDependencies,
        room_id: RoomId,
        identity: UserIdentity,
    ) -> Result<Self, ApplicationError> {
        let room = deps
            .room_repository
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("room", room_id.to_string()))?;

        let transcript = deps.message_repository.list_by_room(room_id).await?;
        let stream = MessageStream::new(deps.broadcaster.subscribe(), room_id);

        info!(
            room_id = %room_id,
            participant = %identity.email,
            history = transcript.len(),
            "会话已打开"
        );

        Ok(Self {
            deps,
            room_id,
            identity,
            view: RoomView {
                name: room.name,
                background_ref: room.background_ref,
            },
            transcript,
            stream: Some(stream),
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn view(&self) -> &RoomView {
        &self.view
    }

    /// 本地有序消息序列
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// 订阅是否仍然存活
    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// 等待下一条属于本房间的插入事件并合并进本地序列。
    ///
    /// 合并规则：无条件追加到尾部。事件按通道投递顺序到达，
    /// 这里不做去重，也不按 created_at 重排。
    ///
    /// 返回 `None` 表示订阅已终止（通道断开），实时更新到此为止；
    /// 恢复的方式是显式重新打开会话，不做自动重连。
    pub async fn next_event(&mut self) -> Option<Message> {
        let stream = self.stream.as_mut()?;
        match stream.recv().await {
            Some(event) => {
                let message = event.message;
                self.transcript.push(message.clone());
                Some(message)
            }
            None => {
                debug!(room_id = %self.room_id, "订阅终止");
                self.stream = None;
                None
            }
        }
    }

    /// 发送消息。
    ///
    /// 附件先上传，拿到URL后才发出插入；上传失败则整个发送中止，
    /// 不产生任何消息记录。插入成功后通过广播通道回环到所有订阅者
    /// （包括发送者本人）——本地序列只经由该回环更新，发送本身不
    /// 追加。
    pub async fn send(&self, request: SendMessageRequest) -> Result<(), ApplicationError> {
        let content = request.content.filter(|c| !c.trim().is_empty());
        if content.is_none() && request.attachment.is_none() {
            return Err(DomainError::validation_error(
                "content",
                "消息必须包含文本或附件",
            )
            .into());
        }

        let attachment_ref = match request.attachment {
            Some(attachment) => {
                let name = format!(
                    "{}-{}.{}",
                    self.identity.id,
                    self.deps.clock.now().timestamp_millis(),
                    attachment.extension()
                );
                let url = self.deps.blob_store.put(attachment.bytes, &name).await?;
                Some(url)
            }
            None => None,
        };

        let message = Message::new(
            MessageId::new(),
            self.room_id,
            AuthorSnapshot::from(&self.identity),
            content,
            attachment_ref,
            self.deps.clock.now(),
        )?;

        let message = self.deps.message_repository.insert(message).await?;
        self.deps
            .broadcaster
            .broadcast(MessageInserted::new(message))
            .await?;
        Ok(())
    }

    /// 删除消息：先从本地视图移除，再删除存储记录。
    ///
    /// 删除不广播——其他订阅者要到下一次整体重载才会看到变化。
    /// 存储删除失败时消息已从本地视图消失，这一不一致是既定设计。
    pub async fn delete(&mut self, message_id: MessageId) -> Result<(), ApplicationError> {
        self.transcript.retain(|message| message.id != message_id);
        self.deps.message_repository.delete_by_id(message_id).await?;
        info!(room_id = %self.room_id, message_id = %message_id, "消息已删除");
        Ok(())
    }

    /// 更新聊天背景：上传后更新房间记录，并立即更新本地渲染状态
    /// （不广播）。
    pub async fn set_room_background(
        &mut self,
        image: AttachmentUpload,
    ) -> Result<(), ApplicationError> {
        let name = format!(
            "{}-bg-{}.{}",
            self.room_id,
            self.deps.clock.now().timestamp_millis(),
            image.extension()
        );
        let url = self.deps.blob_store.put(image.bytes, &name).await?;
        self.deps
            .room_repository
            .update_background(self.room_id, &url)
            .await?;
        self.view.background_ref = Some(url);
        Ok(())
    }

    /// 关闭会话：释放订阅，之后不再投递事件。
    ///
    /// 身份登出同样按会话关闭处理。
    pub fn close(&mut self) {
        self.stream = None;
        info!(room_id = %self.room_id, participant = %self.identity.email, "会话已关闭");
    }
}
