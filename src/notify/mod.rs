//! Validation error notifications

mod manager;
mod registry;

pub use manager::{
    ErrorNotificationManager, Notification, NotificationKind, Notifier, NotifierEvent,
    RecordingNotifier, Transition,
};
pub use registry::NotificationRegistry;

#[cfg(test)]
pub use manager::MockNotifier;
