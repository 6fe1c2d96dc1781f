//! User-facing notices and the notifier collaborator.
//!
//! The host decides how notices look (toasts, alerts, a status line). A
//! missing host is represented by [`NoopNotifier`], never by probing.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use crate::api::ApiError;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }
}

/// Host-side notification and dialog surface.
pub trait Notifier {
    /// Show a transient notice.
    fn notify(&self, notice: Notice);

    /// Ask the operator to sign in again after an auth failure.
    fn prompt_login(&self) {}

    /// Ask a yes/no question. Hosts without dialogs decline.
    fn confirm(&self, _question: &str) -> bool {
        false
    }
}

/// Notifier that shows nothing and declines every confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Report an API failure exactly once: a login prompt for auth failures,
/// otherwise an error notice prefixed with `context`.
pub fn report_api_error(notifier: &dyn Notifier, context: &str, err: &ApiError) {
    log::warn!("{context}: {err}");
    if err.is_auth() {
        notifier.prompt_login();
    } else {
        notifier.notify(Notice::error(format!("{context}: {err}")));
    }
}
