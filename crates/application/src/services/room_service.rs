//! 房间管理服务
//!
//! 房间创建（带邀请令牌生成）、列表（带最新消息预览）、外观更新
//! 与删除。

use std::sync::Arc;

use domain::{
    DomainError, InviteToken, Message, Room, RoomId, UserIdentity,
};
use rand::Rng;
use tracing::info;

use crate::blob_store::BlobStore;
use crate::clock::Clock;
use crate::error::ApplicationError;
use crate::services::session::AttachmentUpload;
use domain::{MessageRepository, RoomRepository};

/// 邀请令牌长度
const INVITE_TOKEN_LEN: usize = 13;

#[derive(Debug, Clone)]
pub struct CreateRoomRequest {
    pub name: String,
    pub owner: UserIdentity,
}

/// 房间列表条目：房间本体加最新一条消息预览
#[derive(Debug, Clone)]
pub struct RoomOverview {
    pub room: Room,
    pub last_message: Option<Message>,
}

pub struct RoomServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub clock: Arc<dyn Clock>,
}

pub struct RoomService {
    deps: RoomServiceDependencies,
}

impl RoomService {
    pub fn new(deps: RoomServiceDependencies) -> Self {
        Self { deps }
    }

    /// 创建房间，生成随机邀请令牌
    pub async fn create_room(&self, request: CreateRoomRequest) -> Result<Room, ApplicationError> {
        let room = Room::new(
            RoomId::new(),
            request.name,
            request.owner.email.clone(),
            generate_invite_token(),
            self.deps.clock.now(),
        )?;

        let room = self.deps.room_repository.create(room).await?;
        info!(room_id = %room.id, owner = %room.owner_email, "房间已创建");
        Ok(room)
    }

    /// 列出某身份参与的全部房间，附带最新消息预览
    pub async fn list_rooms(
        &self,
        identity: &UserIdentity,
    ) -> Result<Vec<RoomOverview>, ApplicationError> {
        let rooms = self
            .deps
            .room_repository
            .list_for_identity(&identity.email)
            .await?;

        let mut overviews = Vec::with_capacity(rooms.len());
        for room in rooms {
            let last_message = self.deps.message_repository.latest_by_room(room.id).await?;
            overviews.push(RoomOverview { room, last_message });
        }
        Ok(overviews)
    }

    /// 更新房间头像：上传后写回房间记录，返回新URL
    pub async fn set_room_avatar(
        &self,
        room_id: RoomId,
        image: AttachmentUpload,
    ) -> Result<String, ApplicationError> {
        let name = format!(
            "{}-{}.{}",
            room_id,
            self.deps.clock.now().timestamp_millis(),
            image.extension()
        );
        let url = self.deps.blob_store.put(image.bytes, &name).await?;
        self.deps.room_repository.update_avatar(room_id, &url).await?;
        Ok(url)
    }

    /// 删除房间：仅限参与者；消息随房间级联删除
    pub async fn delete_room(
        &self,
        room_id: RoomId,
        identity: &UserIdentity,
    ) -> Result<(), ApplicationError> {
        let room = self
            .deps
            .room_repository
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| domain::RepositoryError::not_found("room", room_id.to_string()))?;

        if !room.is_participant(&identity.email) {
            return Err(DomainError::operation_not_allowed("删除他人房间").into());
        }

        self.deps.room_repository.delete(room_id).await?;
        info!(room_id = %room_id, by = %identity.email, "房间已删除");
        Ok(())
    }
}

/// 生成邀请令牌：小写字母数字随机串
fn generate_invite_token() -> InviteToken {
    let token: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(INVITE_TOKEN_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    InviteToken::new(token)
}
