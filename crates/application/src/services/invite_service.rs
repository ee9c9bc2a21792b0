//! 邀请兑换服务
//!
//! 把兑换身份绑定为房间的第二位参与者。

use std::sync::Arc;

use domain::{InviteToken, RepositoryError, RoomId, RoomRepository, UserIdentity};
use tracing::{info, warn};

use crate::error::ApplicationError;

pub struct InviteService {
    room_repository: Arc<dyn RoomRepository>,
}

impl InviteService {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    /// 兑换邀请令牌，返回对应房间ID。
    ///
    /// 绑定是无条件的 UPDATE：并发兑换时两次都会成功，最后写入者
    /// 胜出；已绑定的令牌再次兑换会直接改写 `second_email`。
    pub async fn redeem(
        &self,
        token: &InviteToken,
        identity: &UserIdentity,
    ) -> Result<RoomId, ApplicationError> {
        let room = self
            .room_repository
            .find_by_invite_token(token)
            .await?
            .ok_or_else(|| RepositoryError::not_found("invite", token.to_string()))?;

        if room.second_email.is_some() {
            warn!(room_id = %room.id, "已绑定的邀请再次兑换，覆盖第二参与者");
        }

        self.room_repository
            .bind_second_identity(room.id, &identity.email)
            .await?;

        info!(room_id = %room.id, participant = %identity.email, "邀请已兑换");
        Ok(room.id)
    }
}
