mod achievement_service;
mod notification_service;
mod tip_service;

pub use achievement_service::AchievementService;
pub use notification_service::NotificationService;
pub use tip_service::TipService;
