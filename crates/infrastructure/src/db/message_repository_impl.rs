//! 消息仓储的 PostgreSQL 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    AuthorSnapshot, Message, MessageId, MessageRepository, RepositoryResult, RoomId, Timestamp,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{storage_error, DbPool};

/// 数据库消息模型
#[derive(Debug, Clone, FromRow)]
struct DbMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub author_avatar: Option<String>,
    pub content: Option<String>,
    pub attachment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbMessage> for Message {
    fn from(row: DbMessage) -> Self {
        // 入库时已验证，加载不再校验
        Message::from_parts(
            MessageId::from(row.id),
            RoomId::from(row.room_id),
            AuthorSnapshot {
                name: row.author_name,
                email: row.author_email,
                avatar: row.author_avatar,
            },
            row.content,
            row.attachment_ref,
            row.created_at,
        )
    }
}

/// 消息仓储实现
pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, message: Message) -> RepositoryResult<Message> {
        sqlx::query(
            r#"
            INSERT INTO messages
                (id, room_id, author_name, author_email, author_avatar,
                 content, attachment_ref, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(message.id))
        .bind(Uuid::from(message.room_id))
        .bind(&message.author.name)
        .bind(&message.author.email)
        .bind(&message.author.avatar)
        .bind(&message.content)
        .bind(&message.attachment_ref)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(message)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        let row = sqlx::query_as::<_, DbMessage>("SELECT * FROM messages WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Message::from))
    }

    async fn list_by_room(&self, room_id: RoomId) -> RepositoryResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, DbMessage>(
            "SELECT * FROM messages WHERE room_id = $1 ORDER BY created_at ASC",
        )
        .bind(Uuid::from(room_id))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn latest_by_room(&self, room_id: RoomId) -> RepositoryResult<Option<Message>> {
        let row = sqlx::query_as::<_, DbMessage>(
            "SELECT * FROM messages WHERE room_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(Uuid::from(room_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(Message::from))
    }

    async fn delete_by_id(&self, id: MessageId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn delete_created_before(&self, cutoff: Timestamp) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected())
    }
}
