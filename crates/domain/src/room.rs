//! 房间实体定义
//!
//! 房间是一个双人聊天上下文，拥有自己的消息历史和外观设置。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{InviteToken, RoomId, Timestamp};

/// 房间实体
///
/// 不变式：一个房间至多两个参与者身份。`second_email` 在邀请被
/// 兑换前为空；重复兑换按最后写入者胜出覆盖（见应用层）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// 房间唯一ID
    pub id: RoomId,
    /// 房间名称
    pub name: String,
    /// 创建者邮箱
    pub owner_email: String,
    /// 第二位参与者邮箱（邀请兑换后填充）
    pub second_email: Option<String>,
    /// 邀请令牌
    pub invite_token: InviteToken,
    /// 房间头像URL
    pub avatar_ref: Option<String>,
    /// 聊天背景URL
    pub background_ref: Option<String>,
    /// 创建时间
    pub created_at: Timestamp,
}

impl Room {
    /// 创建新房间
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        owner_email: impl Into<String>,
        invite_token: InviteToken,
        created_at: Timestamp,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::validation_error("name", "房间名称不能为空"));
        }

        let owner_email = owner_email.into();
        if owner_email.is_empty() {
            return Err(DomainError::validation_error(
                "owner_email",
                "创建者邮箱不能为空",
            ));
        }

        Ok(Self {
            id,
            name,
            owner_email,
            second_email: None,
            invite_token,
            avatar_ref: None,
            background_ref: None,
            created_at,
        })
    }

    /// 从存储加载房间（不做验证，入库时已验证）
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: RoomId,
        name: String,
        owner_email: String,
        second_email: Option<String>,
        invite_token: InviteToken,
        avatar_ref: Option<String>,
        background_ref: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            owner_email,
            second_email,
            invite_token,
            avatar_ref,
            background_ref,
            created_at,
        }
    }

    /// 绑定第二位参与者。
    ///
    /// 已绑定的令牌再次兑换会直接覆盖。
    pub fn bind_second_identity(&mut self, email: impl Into<String>) {
        self.second_email = Some(email.into());
    }

    /// 更新聊天背景
    pub fn set_background(&mut self, url: impl Into<String>) {
        self.background_ref = Some(url.into());
    }

    /// 更新房间头像
    pub fn set_avatar(&mut self, url: impl Into<String>) {
        self.avatar_ref = Some(url.into());
    }

    /// 检查某个邮箱是否是房间参与者
    pub fn is_participant(&self, email: &str) -> bool {
        self.owner_email == email || self.second_email.as_deref() == Some(email)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn test_room() -> Room {
        Room::new(
            RoomId::new(),
            "Weekend plans",
            "u1@example.com",
            InviteToken::new("tok123"),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_room_has_no_second_participant() {
        let room = test_room();
        assert!(room.second_email.is_none());
        assert!(room.is_participant("u1@example.com"));
        assert!(!room.is_participant("u2@example.com"));
    }

    #[test]
    fn test_room_name_validation() {
        let result = Room::new(
            RoomId::new(),
            "   ",
            "u1@example.com",
            InviteToken::new("tok123"),
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bind_second_identity_overwrites() {
        let mut room = test_room();
        room.bind_second_identity("u2@example.com");
        assert!(room.is_participant("u2@example.com"));

        // 最后写入者胜出
        room.bind_second_identity("u3@example.com");
        assert_eq!(room.second_email.as_deref(), Some("u3@example.com"));
        assert!(!room.is_participant("u2@example.com"));
    }

    #[test]
    fn test_appearance_updates() {
        let mut room = test_room();
        room.set_background("https://cdn.example.com/bg.png");
        room.set_avatar("https://cdn.example.com/avatar.png");
        assert_eq!(
            room.background_ref.as_deref(),
            Some("https://cdn.example.com/bg.png")
        );
        assert_eq!(
            room.avatar_ref.as_deref(),
            Some("https://cdn.example.com/avatar.png")
        );
    }
}
