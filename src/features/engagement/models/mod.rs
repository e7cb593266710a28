mod achievement;
mod notification;
mod tip;

pub use achievement::Achievement;
pub use notification::Notification;
pub use tip::Tip;
