pub mod engagement_handler;

pub use engagement_handler::{
    __path_list_achievements, __path_list_notifications, __path_list_tips,
    __path_mark_notification_read, list_achievements, list_notifications, list_tips,
    mark_notification_read,
};
