//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：会话协调、邀请兑换、保留策略
//! 清扫、房间管理，以及对外部适配器（对象存储、消息广播、时钟）
//! 的抽象。

pub mod blob_store;
pub mod broadcaster;
pub mod clock;
pub mod error;
pub mod memory;
pub mod services;

pub use blob_store::{BlobStore, UploadError};
pub use broadcaster::{
    BroadcastError, LocalMessageBroadcaster, MessageBroadcaster, MessageInserted, MessageStream,
};
pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use services::{
    AttachmentUpload, CreateRoomRequest, InviteService, RetentionSweeper, RoomOverview,
    RoomService, RoomServiceDependencies, RoomView, SendMessageRequest, SessionCoordinator,
    SessionDependencies,
};
