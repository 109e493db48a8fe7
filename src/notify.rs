//! Notifications
//!
//! Advisory, user-facing emissions. The core only produces these; the
//! surface that renders them (toast, banner, log) is injected.

use std::sync::{Mutex, PoisonError};

/// How prominently a notification should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral advisory.
    Info,
    /// An action completed as requested.
    Success,
    /// Degraded but usable.
    Warning,
    /// Something failed and may need a retry.
    Error,
}

/// One advisory emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// One-line detail.
    pub description: String,
    /// Display severity.
    pub severity: Severity,
}

impl Notification {
    /// Build an info-severity notification.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_severity(title, description, Severity::Info)
    }

    /// Build a success-severity notification.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_severity(title, description, Severity::Success)
    }

    /// Build an error-severity notification.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_severity(title, description, Severity::Error)
    }

    fn with_severity(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver one notification to the surface.
    fn notify(&self, notification: Notification);
}

/// Notifier that forwards to `tracing`, mapping severity to level.
///
/// Useful as a default when no UI surface is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification {
            title,
            description,
            severity,
        } = notification;

        match severity {
            Severity::Info | Severity::Success => tracing::info!(%title, "{description}"),
            Severity::Warning => tracing::warn!(%title, "{description}"),
            Severity::Error => tracing::error!(%title, "{description}"),
        }
    }
}

/// Notifier that records every emission, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    recorded: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything notified so far, in emission order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl<N: Notifier> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_emission_order() {
        let notifier = RecordingNotifier::new();

        notifier.notify(Notification::success("Removed", "Item removed from cart"));
        notifier.notify(Notification::error("Fetch failed", "Could not load listings"));

        let recorded = notifier.recorded();

        assert_eq!(recorded.len(), 2);
        assert_eq!(
            recorded.first().map(|n| n.severity),
            Some(Severity::Success)
        );
        assert_eq!(recorded.last().map(|n| n.severity), Some(Severity::Error));
    }
}
