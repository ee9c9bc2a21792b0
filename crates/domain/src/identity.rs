//! 外部身份与作者快照
//!
//! 身份提供方（登录、资料维护）不在本系统范围内，这里只消费
//! 一个不透明的 `UserIdentity`。消息上保留的是发送时刻的值快照，
//! 而不是对身份的活引用——这是刻意的设计选择。

use serde::{Deserialize, Serialize};

/// 外部身份提供方暴露的当前用户。
///
/// `id` 由提供方分配，格式不做任何假设；参与者在房间内以
/// 邮箱作为标识。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_ref: Option<String>,
}

impl UserIdentity {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        avatar_ref: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: email.into(),
            avatar_ref,
        }
    }
}

/// 消息上反规范化保存的作者快照。
///
/// 记录发送时刻的名字、邮箱和头像，之后身份资料的变更不会
/// 回写到历史消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<&UserIdentity> for AuthorSnapshot {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            name: identity.display_name.clone(),
            email: identity.email.clone(),
            avatar: identity.avatar_ref.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_captures_identity_at_send_time() {
        let mut identity = UserIdentity::new(
            "user_1",
            "Alice",
            "alice@example.com",
            Some("https://example.com/alice.png".to_string()),
        );

        let snapshot = AuthorSnapshot::from(&identity);

        // 快照是值拷贝，身份后续变更不影响已有快照
        identity.display_name = "Alicia".to_string();
        assert_eq!(snapshot.name, "Alice");
        assert_eq!(snapshot.email, "alice@example.com");
        assert_eq!(
            snapshot.avatar,
            Some("https://example.com/alice.png".to_string())
        );
    }
}
