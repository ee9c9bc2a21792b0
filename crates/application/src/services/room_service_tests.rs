//! 房间管理服务单元测试

#[cfg(test)]
mod room_service_tests {
    use std::sync::Arc;

    use chrono::Utc;
    use domain::{
        AuthorSnapshot, Message, MessageId, MessageRepository, RoomRepository, UserIdentity,
    };

    use crate::clock::SystemClock;
    use crate::memory::{InMemoryStore, MemoryBlobStore};
    use crate::services::room_service::{
        CreateRoomRequest, RoomService, RoomServiceDependencies,
    };
    use crate::services::session::AttachmentUpload;
    use crate::ApplicationError;

    struct TestHarness {
        store: Arc<InMemoryStore>,
        service: RoomService,
    }

    impl TestHarness {
        fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let service = RoomService::new(RoomServiceDependencies {
                room_repository: store.clone(),
                message_repository: store.clone(),
                blob_store: Arc::new(MemoryBlobStore::new()),
                clock: Arc::new(SystemClock),
            });
            Self { store, service }
        }
    }

    fn identity(name: &str, email: &str) -> UserIdentity {
        UserIdentity::new(format!("id-{name}"), name, email, None)
    }

    #[tokio::test]
    async fn test_create_room_generates_invite_token() {
        let harness = TestHarness::new();
        let room = harness
            .service
            .create_room(CreateRoomRequest {
                name: "Plans".to_string(),
                owner: identity("Alice", "u1@example.com"),
            })
            .await
            .unwrap();

        assert_eq!(room.name, "Plans");
        assert_eq!(room.owner_email, "u1@example.com");
        assert!(room.second_email.is_none());

        let token = room.invite_token.as_str();
        assert_eq!(token.len(), 13);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_invite_tokens_are_unique_per_room() {
        let harness = TestHarness::new();
        let owner = identity("Alice", "u1@example.com");

        let a = harness
            .service
            .create_room(CreateRoomRequest {
                name: "A".to_string(),
                owner: owner.clone(),
            })
            .await
            .unwrap();
        let b = harness
            .service
            .create_room(CreateRoomRequest {
                name: "B".to_string(),
                owner,
            })
            .await
            .unwrap();

        assert_ne!(a.invite_token, b.invite_token);
    }

    #[tokio::test]
    async fn test_empty_room_name_rejected() {
        let harness = TestHarness::new();
        let result = harness
            .service
            .create_room(CreateRoomRequest {
                name: "  ".to_string(),
                owner: identity("Alice", "u1@example.com"),
            })
            .await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_list_rooms_includes_last_message_preview() {
        let harness = TestHarness::new();
        let owner = identity("Alice", "u1@example.com");

        let room = harness
            .service
            .create_room(CreateRoomRequest {
                name: "Plans".to_string(),
                owner: owner.clone(),
            })
            .await
            .unwrap();

        for text in ["first", "second"] {
            let message = Message::new(
                MessageId::new(),
                room.id,
                AuthorSnapshot::from(&owner),
                Some(text.to_string()),
                None,
                Utc::now(),
            )
            .unwrap();
            harness.store.insert(message).await.unwrap();
        }

        let overviews = harness.service.list_rooms(&owner).await.unwrap();
        assert_eq!(overviews.len(), 1);
        let preview = overviews[0].last_message.as_ref().unwrap();
        assert_eq!(preview.content.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_list_rooms_covers_second_participant() {
        let harness = TestHarness::new();
        let room = harness
            .service
            .create_room(CreateRoomRequest {
                name: "Plans".to_string(),
                owner: identity("Alice", "u1@example.com"),
            })
            .await
            .unwrap();
        harness
            .store
            .bind_second_identity(room.id, "u2@example.com")
            .await
            .unwrap();

        let u2 = identity("Bob", "u2@example.com");
        let overviews = harness.service.list_rooms(&u2).await.unwrap();
        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].room.id, room.id);

        let stranger = identity("Mallory", "u9@example.com");
        assert!(harness.service.list_rooms(&stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_room_avatar() {
        let harness = TestHarness::new();
        let room = harness
            .service
            .create_room(CreateRoomRequest {
                name: "Plans".to_string(),
                owner: identity("Alice", "u1@example.com"),
            })
            .await
            .unwrap();

        let url = harness
            .service
            .set_room_avatar(
                room.id,
                AttachmentUpload {
                    bytes: vec![0x89, 0x50],
                    filename: "avatar.png".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = RoomRepository::find_by_id(harness.store.as_ref(), room.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.avatar_ref.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn test_delete_room_cascades_to_messages() {
        let harness = TestHarness::new();
        let owner = identity("Alice", "u1@example.com");
        let room = harness
            .service
            .create_room(CreateRoomRequest {
                name: "Plans".to_string(),
                owner: owner.clone(),
            })
            .await
            .unwrap();

        let message = Message::new(
            MessageId::new(),
            room.id,
            AuthorSnapshot::from(&owner),
            Some("hello".to_string()),
            None,
            Utc::now(),
        )
        .unwrap();
        let message = harness.store.insert(message).await.unwrap();

        harness.service.delete_room(room.id, &owner).await.unwrap();

        assert!(RoomRepository::find_by_id(harness.store.as_ref(), room.id)
            .await
            .unwrap()
            .is_none());
        assert!(harness.store.list_by_room(room.id).await.unwrap().is_empty());
        assert!(MessageRepository::find_by_id(harness.store.as_ref(), message.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_room_requires_participant() {
        let harness = TestHarness::new();
        let room = harness
            .service
            .create_room(CreateRoomRequest {
                name: "Plans".to_string(),
                owner: identity("Alice", "u1@example.com"),
            })
            .await
            .unwrap();

        let stranger = identity("Mallory", "u9@example.com");
        let result = harness.service.delete_room(room.id, &stranger).await;
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }
}
