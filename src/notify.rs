//! User-facing notifications (toasts).

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Surfaces notifications to the user. Rendering is up to the implementor.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
