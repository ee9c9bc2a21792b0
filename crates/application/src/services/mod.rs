mod invite_service;
mod retention;
mod room_service;
mod session;

mod room_service_tests;

pub use invite_service::InviteService;
pub use retention::RetentionSweeper;
pub use room_service::{CreateRoomRequest, RoomOverview, RoomService, RoomServiceDependencies};
pub use session::{
    AttachmentUpload, RoomView, SendMessageRequest, SessionCoordinator, SessionDependencies,
};
