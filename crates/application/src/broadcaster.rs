//! 消息广播通道
//!
//! 面向全系统单一逻辑主题（所有消息插入事件）的发布/订阅原语。
//! 按房间过滤发生在消费端，不在通道本身。通道是显式注入的实例，
//! 不是进程级单例，便于在测试中替换。
//!
//! 语义：尽力而为、至少一次；投递顺序等于通道后端观察到的提交
//! 顺序；晚订阅者收不到历史事件（客户端打开时单独拉取历史）；
//! 传输断开表现为流终止，重连由调用方显式重新打开。

use async_trait::async_trait;
use domain::{Message, RoomId};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

/// 消息插入事件：随提交顺序投递给所有订阅者（包括发送者本人）。
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageInserted {
    pub message: Message,
}

impl MessageInserted {
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    pub fn room_id(&self) -> RoomId {
        self.message.room_id
    }
}

/// 广播/订阅错误
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("广播失败: {0}")]
    Failed(String),
}

impl BroadcastError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// 消息广播器接口
#[async_trait]
pub trait MessageBroadcaster: Send + Sync {
    /// 发布一个插入事件给当前所有订阅者
    async fn broadcast(&self, event: MessageInserted) -> Result<(), BroadcastError>;

    /// 订阅全量插入事件流（无回放）
    fn subscribe(&self) -> broadcast::Receiver<MessageInserted>;
}

/// 基于 tokio broadcast 的进程内广播器
#[derive(Clone)]
pub struct LocalMessageBroadcaster {
    sender: broadcast::Sender<MessageInserted>,
}

impl LocalMessageBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for LocalMessageBroadcaster {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl MessageBroadcaster for LocalMessageBroadcaster {
    async fn broadcast(&self, event: MessageInserted) -> Result<(), BroadcastError> {
        if self.sender.receiver_count() == 0 {
            return Ok(());
        }
        self.sender
            .send(event)
            .map_err(|err| BroadcastError::failed(err.to_string()))?;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<MessageInserted> {
        self.sender.subscribe()
    }
}

/// 单个房间的事件流：在消费端按 room_id 过滤全量主题。
pub struct MessageStream {
    receiver: broadcast::Receiver<MessageInserted>,
    room_id: RoomId,
}

impl MessageStream {
    pub fn new(receiver: broadcast::Receiver<MessageInserted>, room_id: RoomId) -> Self {
        Self { receiver, room_id }
    }

    /// 接收下一条属于本房间的插入事件。
    ///
    /// 返回 `None` 表示流终止（通道关闭或本订阅者落后太多被断开），
    /// 之后不会再有事件，重新订阅需要调用方显式重新打开会话。
    pub async fn recv(&mut self) -> Option<MessageInserted> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if event.room_id() == self.room_id {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(room_id = %self.room_id, skipped, "订阅落后，事件流终止");
                    return None;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain::{AuthorSnapshot, MessageId};

    use super::*;

    fn message_in(room_id: RoomId, text: &str) -> Message {
        Message::new(
            MessageId::new(),
            room_id,
            AuthorSnapshot {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                avatar: None,
            },
            Some(text.to_string()),
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_stream_filters_by_room() {
        let broadcaster = LocalMessageBroadcaster::new(16);
        let room_a = RoomId::new();
        let room_b = RoomId::new();
        let mut stream = MessageStream::new(broadcaster.subscribe(), room_a);

        broadcaster
            .broadcast(MessageInserted::new(message_in(room_b, "other room")))
            .await
            .unwrap();
        broadcaster
            .broadcast(MessageInserted::new(message_in(room_a, "for us")))
            .await
            .unwrap();

        let event = stream.recv().await.unwrap();
        assert_eq!(event.message.content.as_deref(), Some("for us"));
    }

    #[tokio::test]
    async fn test_stream_terminates_when_channel_closed() {
        let broadcaster = LocalMessageBroadcaster::new(16);
        let room_id = RoomId::new();
        let mut stream = MessageStream::new(broadcaster.subscribe(), room_id);

        drop(broadcaster);
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_terminates_when_lagging() {
        // 容量1的通道连发多条，订阅者落后被断开，流终止
        let broadcaster = LocalMessageBroadcaster::new(1);
        let room_id = RoomId::new();
        let mut stream = MessageStream::new(broadcaster.subscribe(), room_id);

        for text in ["one", "two", "three"] {
            broadcaster
                .broadcast(MessageInserted::new(message_in(room_id, text)))
                .await
                .unwrap();
        }

        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_ok() {
        let broadcaster = LocalMessageBroadcaster::new(16);
        let result = broadcaster
            .broadcast(MessageInserted::new(message_in(RoomId::new(), "hi")))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscriber() {
        let broadcaster = LocalMessageBroadcaster::new(16);
        let room_id = RoomId::new();

        // 保持一个早期订阅者，避免无人订阅时事件被直接丢弃
        let _early = broadcaster.subscribe();
        broadcaster
            .broadcast(MessageInserted::new(message_in(room_id, "before")))
            .await
            .unwrap();

        let mut late = MessageStream::new(broadcaster.subscribe(), room_id);
        broadcaster
            .broadcast(MessageInserted::new(message_in(room_id, "after")))
            .await
            .unwrap();

        let event = late.recv().await.unwrap();
        assert_eq!(event.message.content.as_deref(), Some("after"));
    }
}
