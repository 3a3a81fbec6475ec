//! Field error tracking with deduplicated notifications
//!
//! Each field is either error-free or has an active error. Entering the
//! active state registers the field's error id and shows one notification;
//! staying active (even with a new message) shows nothing more; leaving it
//! unregisters the id and hides the notification.

use std::collections::BTreeMap;
use std::time::Duration;

use super::registry::NotificationRegistry;
use crate::form::{ErrorId, FieldName, ValidationError};

/// Visual category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
    Success,
}

/// A notification as handed to the display layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Set for field errors so they can be hidden again
    pub id: Option<ErrorId>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub auto_close: Duration,
}

/// Display layer for notifications
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn show(&mut self, notification: &Notification);
    fn hide(&mut self, id: &ErrorId);
}

/// Something a [`RecordingNotifier`] saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Shown(Notification),
    Hidden(ErrorId),
}

/// Notifier that keeps every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Vec<NotifierEvent>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[NotifierEvent] {
        &self.events
    }

    /// Notifications shown so far
    pub fn shown(&self) -> impl Iterator<Item = &Notification> {
        self.events.iter().filter_map(|e| match e {
            NotifierEvent::Shown(n) => Some(n),
            NotifierEvent::Hidden(_) => None,
        })
    }

    /// How many times a notification with `id` was shown
    pub fn shown_count(&self, id: &ErrorId) -> usize {
        self.shown().filter(|n| n.id.as_ref() == Some(id)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn show(&mut self, notification: &Notification) {
        self.events.push(NotifierEvent::Shown(notification.clone()));
    }

    fn hide(&mut self, id: &ErrorId) {
        self.events.push(NotifierEvent::Hidden(id.clone()));
    }
}

/// What happened to a field's error state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// no-error -> error-active, notification shown
    Raised,
    /// error-active -> error-active, nothing shown
    Kept,
    /// error-active -> no-error, notification hidden
    Cleared,
    /// no-error -> no-error
    Clean,
}

/// Per-session error state and notification driver
#[derive(Debug)]
pub struct ErrorNotificationManager<N> {
    registry: NotificationRegistry,
    errors: BTreeMap<FieldName, ValidationError>,
    notifier: N,
    error_title: String,
    error_auto_close: Duration,
}

impl<N: Notifier> ErrorNotificationManager<N> {
    pub fn new(notifier: N, error_title: impl Into<String>, error_auto_close: Duration) -> Self {
        Self {
            registry: NotificationRegistry::new(),
            errors: BTreeMap::new(),
            notifier,
            error_title: error_title.into(),
            error_auto_close,
        }
    }

    /// Feed one validator result for `field`
    pub fn apply(&mut self, field: FieldName, outcome: Option<ValidationError>) -> Transition {
        match outcome {
            Some(error) => {
                let id = error.error_id.clone();
                let message = error.message.clone();
                self.errors.insert(field, error);
                if self.registry.register(&id) {
                    tracing::debug!("Showing error notification {id}");
                    self.notifier.show(&Notification {
                        id: Some(id),
                        title: self.error_title.clone(),
                        message,
                        kind: NotificationKind::Error,
                        auto_close: self.error_auto_close,
                    });
                    Transition::Raised
                } else {
                    Transition::Kept
                }
            }
            None => {
                self.errors.remove(&field);
                let id = ErrorId::for_field(field);
                if self.registry.unregister(&id) {
                    tracing::debug!("Retracting error notification {id}");
                    self.notifier.hide(&id);
                    Transition::Cleared
                } else {
                    Transition::Clean
                }
            }
        }
    }

    /// Apply a full validation pass. Returns how many notifications were shown.
    pub fn sweep(&mut self, mut errors: BTreeMap<FieldName, ValidationError>) -> usize {
        FieldName::ALL
            .into_iter()
            .map(|field| self.apply(field, errors.remove(&field)))
            .filter(|t| *t == Transition::Raised)
            .count()
    }

    /// Show a notification that is not tied to a field
    pub fn announce(&mut self, notification: Notification) {
        self.notifier.show(&notification);
    }

    pub fn errors(&self) -> &BTreeMap<FieldName, ValidationError> {
        &self.errors
    }

    pub fn error(&self, field: FieldName) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn registry(&self) -> &NotificationRegistry {
        &self.registry
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
