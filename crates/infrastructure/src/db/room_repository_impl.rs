//! 房间仓储的 PostgreSQL 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{InviteToken, RepositoryResult, Room, RoomId, RoomRepository};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{storage_error, DbPool};

/// 数据库房间模型
#[derive(Debug, Clone, FromRow)]
struct DbRoom {
    pub id: Uuid,
    pub name: String,
    pub owner_email: String,
    pub second_email: Option<String>,
    pub invite_token: String,
    pub avatar_ref: Option<String>,
    pub background_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbRoom> for Room {
    fn from(row: DbRoom) -> Self {
        Room::from_parts(
            RoomId::from(row.id),
            row.name,
            row.owner_email,
            row.second_email,
            InviteToken::new(row.invite_token),
            row.avatar_ref,
            row.background_ref,
            row.created_at,
        )
    }
}

/// 房间仓储实现
pub struct PgRoomRepository {
    pool: DbPool,
}

impl PgRoomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn create(&self, room: Room) -> RepositoryResult<Room> {
        sqlx::query(
            r#"
            INSERT INTO rooms
                (id, name, owner_email, second_email, invite_token,
                 avatar_ref, background_ref, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(room.id))
        .bind(&room.name)
        .bind(&room.owner_email)
        .bind(&room.second_email)
        .bind(room.invite_token.as_str())
        .bind(&room.avatar_ref)
        .bind(&room.background_ref)
        .bind(room.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(room)
    }

    async fn find_by_id(&self, id: RoomId) -> RepositoryResult<Option<Room>> {
        let row = sqlx::query_as::<_, DbRoom>("SELECT * FROM rooms WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Room::from))
    }

    async fn find_by_invite_token(&self, token: &InviteToken) -> RepositoryResult<Option<Room>> {
        let row = sqlx::query_as::<_, DbRoom>("SELECT * FROM rooms WHERE invite_token = $1")
            .bind(token.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Room::from))
    }

    async fn list_for_identity(&self, email: &str) -> RepositoryResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, DbRoom>(
            r#"
            SELECT * FROM rooms
            WHERE owner_email = $1 OR second_email = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn bind_second_identity(&self, id: RoomId, email: &str) -> RepositoryResult<()> {
        // 无条件 UPDATE：并发兑换时最后写入者胜出
        sqlx::query("UPDATE rooms SET second_email = $2 WHERE id = $1")
            .bind(Uuid::from(id))
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn update_background(&self, id: RoomId, url: &str) -> RepositoryResult<()> {
        sqlx::query("UPDATE rooms SET background_ref = $2 WHERE id = $1")
            .bind(Uuid::from(id))
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn update_avatar(&self, id: RoomId, url: &str) -> RepositoryResult<()> {
        sqlx::query("UPDATE rooms SET avatar_ref = $2 WHERE id = $1")
            .bind(Uuid::from(id))
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn delete(&self, id: RoomId) -> RepositoryResult<()> {
        // 消息通过外键 ON DELETE CASCADE 随房间一起删除
        sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
