pub mod dispatcher;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;

pub use dispatcher::{run_notification_worker, NotificationDispatcher, NotificationJob};
pub use notification_handlers::{get_notifications, mark_notification_read, notification_stream};
pub use notification_models::{Notification, NotificationKind};
pub use notification_repository::NotificationRepository;
